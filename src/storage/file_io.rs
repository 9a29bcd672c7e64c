//! File I/O utilities with atomic writes

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::TriadError;

/// Read JSON from a file, returning `None` if the file doesn't exist
pub fn read_json_opt<T, P>(path: P) -> Result<Option<T>, TriadError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)
        .map_err(|e| TriadError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| TriadError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The target is either completely written or left untouched.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), TriadError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TriadError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| TriadError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| TriadError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| TriadError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| TriadError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        TriadError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Delete a file, treating "already gone" as success
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<bool, TriadError> {
    match fs::remove_file(path.as_ref()) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(TriadError::Storage(format!(
            "Failed to remove {}: {}",
            path.as_ref().display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: i32,
    }

    fn sample() -> Sample {
        Sample {
            name: "rent".into(),
            value: 42,
        }
    }

    #[test]
    fn test_read_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Option<Sample> = read_json_opt(temp_dir.path().join("none.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("sample.json");

        write_json_atomic(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join("sample.json.tmp").exists());
        assert_eq!(read_json_opt::<Sample, _>(&path).unwrap(), Some(sample()));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        let err = read_json_opt::<Sample, _>(&path).unwrap_err();
        assert!(matches!(err, TriadError::Storage(_)));
    }

    #[test]
    fn test_remove_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("s.json");
        write_json_atomic(&path, &sample()).unwrap();

        assert!(remove_if_exists(&path).unwrap());
        assert!(!remove_if_exists(&path).unwrap());
    }
}
