//! Append-only run-length log: every epoch's `pair_steps` array, written
//! as little-endian `u32`s with no header or trailer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::ConfigError;

pub struct RunLog {
    writer: BufWriter<File>,
}

impl RunLog {
    pub fn create(path: &Path) -> Result<RunLog, ConfigError> {
        let file = File::create(path).map_err(|source| ConfigError::RunlogOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(RunLog { writer: BufWriter::new(file) })
    }

    /// Append one epoch's `pair_steps`, in index order, as little-endian
    /// `u32`s.
    pub fn append_epoch(&mut self, pair_steps: &[u32]) -> std::io::Result<()> {
        for &steps in pair_steps {
            self.writer.write_all(&steps.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_little_endian_u32s_in_order() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("bffsoup-runlog-test-{}.bin", std::process::id()));
        {
            let mut log = RunLog::create(&path).unwrap();
            log.append_epoch(&[1, 2, 3]).unwrap();
            log.append_epoch(&[0xDEAD_BEEF]).unwrap();
            log.flush().unwrap();
        }
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 4 * 4);
        assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &3u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &0xDEAD_BEEFu32.to_le_bytes());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn create_fails_for_unopenable_path() {
        let path = Path::new("/nonexistent-directory-for-bffsoup-test/out.bin");
        assert!(RunLog::create(path).is_err());
    }
}
