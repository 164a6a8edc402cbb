//! Output artifact naming and filesystem plumbing.
//!
//! Filenames are deterministic: the same record on the same calendar day
//! always produces the same name, so a rerun overwrites the earlier
//! artifact instead of accumulating near-duplicates. Writes go through a
//! sibling temp file plus rename so a crash mid-write never leaves a
//! truncated document behind.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::ContractGenError;

/// `{base}_{abbrev}_{YYYYMMDD}` — extension added by the assembler.
pub fn basename(base: &str, abbrev: &str, date: NaiveDate) -> String {
    format!("{}_{}_{}", base, abbrev, date.format("%Y%m%d"))
}

/// Create the output directory if it does not exist.
pub async fn ensure_output_dir(dir: &Path) -> Result<(), ContractGenError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ContractGenError::OutputDirFailed {
            path: dir.to_path_buf(),
            source: e,
        })
}

/// Atomic write: write to `<path>.tmp`, then rename over `path`.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ContractGenError> {
    let tmp_path = tmp_sibling(path);
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| ContractGenError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ContractGenError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_is_deterministic_per_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let a = basename("Transportation_Contract", "FL", date);
        let b = basename("Transportation_Contract", "FL", date);
        assert_eq!(a, "Transportation_Contract_FL_20240315");
        assert_eq!(a, b);
    }

    #[test]
    fn basename_differs_only_in_date_across_days() {
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        let a = basename("Transportation_Contract", "TX", d1);
        let b = basename("Transportation_Contract", "TX", d2);
        assert_ne!(a, b);
        assert_eq!(
            a.replace("20240315", ""),
            b.replace("20240316", "")
        );
    }

    #[test]
    fn tmp_sibling_keeps_directory() {
        let p = Path::new("/out/contract.pdf");
        assert_eq!(tmp_sibling(p), Path::new("/out/contract.pdf.tmp"));
    }

    #[tokio::test]
    async fn write_atomic_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.html");
        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "second");
        assert!(!dir.path().join("doc.html.tmp").exists());
    }
}
