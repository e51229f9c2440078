use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::debug;

use crate::data::csv;
use crate::data::table::Table;
use crate::error::{EngineError, Result};

/// The engine's narrow boundary with durable storage: fetch a named tabular
/// dataset, and move opaque artifact blobs in and out by name. The engine
/// has no knowledge of where or how the bytes live.
pub trait ArtifactStore {
    fn fetch_dataset(&self, name: &str) -> Result<Table>;
    fn put_blob(&mut self, name: &str, bytes: &[u8]) -> Result<()>;
    fn get_blob(&self, name: &str) -> Result<Vec<u8>>;
}

/// Filesystem-directory store: datasets are CSV files, artifacts are plain
/// files, all under one root.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> DirStore {
        DirStore { root: root.into() }
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        fs::read(self.root.join(name)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                EngineError::NotFound(format!("'{name}' does not exist in the store"))
            } else {
                e.into()
            }
        })
    }
}

impl ArtifactStore for DirStore {
    fn fetch_dataset(&self, name: &str) -> Result<Table> {
        debug!("fetching dataset '{name}'");
        csv::parse_table(&self.read(name)?)
    }

    fn put_blob(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(name), bytes)?;
        debug!("stored blob '{name}' ({} bytes)", bytes.len());
        Ok(())
    }

    fn get_blob(&self, name: &str) -> Result<Vec<u8>> {
        self.read(name)
    }
}

/// In-memory store for tests and embedders.
#[derive(Debug, Default)]
pub struct MemStore {
    datasets: HashMap<String, Table>,
    blobs: HashMap<String, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> MemStore {
        MemStore::default()
    }

    pub fn insert_dataset(&mut self, name: impl Into<String>, table: Table) {
        self.datasets.insert(name.into(), table);
    }

    pub fn contains_blob(&self, name: &str) -> bool {
        self.blobs.contains_key(name)
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }
}

impl ArtifactStore for MemStore {
    fn fetch_dataset(&self, name: &str) -> Result<Table> {
        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("'{name}' does not exist in the store")))
    }

    fn put_blob(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get_blob(&self, name: &str) -> Result<Vec<u8>> {
        self.blobs
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("'{name}' does not exist in the store")))
    }
}
