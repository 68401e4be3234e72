/// Compute the high-order entropy (HOE) of a byte slice.
///
/// HOE = compressed_size / raw_size, where compression uses brotli at quality 2.
/// This approximates the normalized Kolmogorov complexity of the data.
///
/// Returns a value typically between 0 and 1, where:
/// - ~1.0 means the data is incompressible (random)
/// - <<1.0 means the data is highly structured/repetitive
///
/// Values slightly above 1.0 are possible due to compression overhead on random data.
pub fn high_order_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut compressed = Vec::new();
    let params = brotli::enc::BrotliEncoderParams {
        quality: 2,
        ..Default::default()
    };
    brotli::BrotliCompress(&mut &data[..], &mut compressed, &params)
        .expect("brotli compression should not fail on valid input");

    compressed.len() as f64 / data.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hoe_random_data_near_one() {
        // Pseudorandom data should be near-incompressible.
        use crate::rng::Xorshift64;
        let mut rng = Xorshift64::seed_from_u64(12345);
        let data: Vec<u8> = (0..8192).map(|_| (rng.next_u64() & 0xFF) as u8).collect();
        let hoe = high_order_entropy(&data);
        assert!(hoe > 0.9, "HOE of random data should be near 1.0, got {hoe}");
    }

    #[test]
    fn test_hoe_repeated_data_low() {
        // All-same-byte data should be highly compressible.
        let data = vec![42u8; 8192];
        let hoe = high_order_entropy(&data);
        assert!(hoe < 0.1, "HOE of repeated data should be well below 1.0, got {hoe}");
    }

    #[test]
    fn test_hoe_empty() {
        assert_eq!(high_order_entropy(&[]), 0.0);
    }
}
