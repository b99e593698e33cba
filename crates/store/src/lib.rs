use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use shared::protocol::IdentifierRecord;

pub const ROWS_FILE: &str = "data.json";
pub const IDENTIFIERS_FILE: &str = "tckn.json";

/// Append-only JSON batch files under one data directory.
///
/// Each file holds a single JSON array. Appending reads the existing
/// array (an absent file counts as empty), concatenates the new batch,
/// and overwrites the file. Deliberately not idempotent and without
/// schema validation: batches land verbatim, duplicates included.
#[derive(Clone)]
pub struct BatchStore {
    root: PathBuf,
}

impl BatchStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed to create data directory '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Appends a batch of row objects to `data.json`. Returns the total
    /// number of persisted records afterwards.
    pub async fn append_rows(&self, batch: Vec<Value>) -> Result<usize> {
        self.append(ROWS_FILE, batch).await
    }

    /// Wraps each identifier as `{"identifier": n}` and appends the
    /// batch to `tckn.json`.
    pub async fn append_identifiers(&self, identifiers: &[u64]) -> Result<usize> {
        let batch = identifiers
            .iter()
            .map(|&identifier| serde_json::to_value(IdentifierRecord { identifier }))
            .collect::<Result<Vec<_>, _>>()
            .context("failed to encode identifier batch")?;
        self.append(IDENTIFIERS_FILE, batch).await
    }

    async fn append(&self, file: &str, batch: Vec<Value>) -> Result<usize> {
        let path = self.root.join(file);
        let mut records = self.read_array(&path).await?;
        records.extend(batch);

        let serialized = serde_json::to_string_pretty(&records)
            .with_context(|| format!("failed to encode batch file '{}'", path.display()))?;
        fs::write(&path, serialized)
            .await
            .with_context(|| format!("failed to write batch file '{}'", path.display()))?;

        debug!(file, total = records.len(), "batch appended");
        Ok(records.len())
    }

    async fn read_array(&self, path: &Path) -> Result<Vec<Value>> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read batch file '{}'", path.display()))
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("batch file '{}' is not a JSON array", path.display()))
    }
}
