use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// WAL operation types
///
/// One JSON object per line: `{"op":"insert","doc":{...}}` or `{"op":"clear"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "doc", rename_all = "snake_case")]
pub enum WalOperation<T> {
    Insert(T),
    Clear,
}

/// Append-only journal for one document collection
pub struct Wal<T> {
    file: Arc<Mutex<File>>,
    path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Wal<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open WAL file {}", path.display()))?;

        Ok(Wal {
            file: Arc::new(Mutex::new(file)),
            path,
            _doc: PhantomData,
        })
    }

    pub fn log_operation(&self, op: &WalOperation<T>) -> Result<()> {
        let line = serde_json::to_string(op).context("Failed to encode WAL entry")?;
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow::anyhow!("WAL mutex poisoned"))?;
        writeln!(file, "{}", line).context("Failed to write to WAL")?;
        file.flush().context("Failed to flush WAL")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<WalOperation<T>>> {
        let file = File::open(&self.path).context("Failed to open WAL for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from WAL")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<WalOperation<T>>(line) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        wal = %self.path.display(),
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse WAL line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        value: u32,
    }

    fn doc(name: &str, value: u32) -> Doc {
        Doc {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_wal_line_format() {
        let line = serde_json::to_string(&WalOperation::Insert(doc("x", 1))).unwrap();
        assert_eq!(line, r#"{"op":"insert","doc":{"name":"x","value":1}}"#);

        let line = serde_json::to_string(&WalOperation::<Doc>::Clear).unwrap();
        assert_eq!(line, r#"{"op":"clear"}"#);
    }

    #[test]
    fn test_wal_log_and_replay() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let wal: Wal<Doc> = Wal::new(wal_path).unwrap();

        wal.log_operation(&WalOperation::Insert(doc("a", 1))).unwrap();
        wal.log_operation(&WalOperation::Clear).unwrap();
        wal.log_operation(&WalOperation::Insert(doc("b", 2))).unwrap();

        let operations = wal.replay().unwrap();
        assert_eq!(
            operations,
            vec![
                WalOperation::Insert(doc("a", 1)),
                WalOperation::Clear,
                WalOperation::Insert(doc("b", 2)),
            ]
        );
    }

    #[test]
    fn test_wal_reopen_keeps_entries() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        {
            let wal: Wal<Doc> = Wal::new(wal_path.clone()).unwrap();
            wal.log_operation(&WalOperation::Insert(doc("a", 1))).unwrap();
        }

        let wal: Wal<Doc> = Wal::new(wal_path).unwrap();
        wal.log_operation(&WalOperation::Insert(doc("b", 2))).unwrap();
        assert_eq!(wal.replay().unwrap().len(), 2);
    }

    #[test]
    fn test_wal_invalid_lines() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        fs::write(
            &wal_path,
            "not json\n{\"op\":\"insert\",\"doc\":{\"name\":\"a\",\"value\":1}}\n{\"op\":\"drop\"}\n",
        )
        .unwrap();

        let wal: Wal<Doc> = Wal::new(wal_path).unwrap();
        let operations = wal.replay().unwrap();

        assert_eq!(operations, vec![WalOperation::Insert(doc("a", 1))]);
    }
}
