use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::repository::traits::KeyValueStore;

const STORAGE_FILE_NAME: &str = "storage.json";
const DEFAULT_DIR_NAME: &str = ".wellness";

/// Default data directory, `~/.wellness`.
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

/// Key-value storage kept as one JSON object of string values on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
    file_path: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Could not create data directory {}", path.display()))?;
        path.push(STORAGE_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &BTreeMap::<String, String>::new())?;
            writer.flush()?;
            debug!(path = %path.display(), "created storage file");
        }

        Ok(FileStore { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        self.parse_entries()?
            .with_context(|| format!("Malformed storage file {}", self.file_path.display()))
    }

    /// Entries for a read-modify-write. A malformed file counts as empty so
    /// it gets overwritten; I/O errors still fail.
    fn read_entries_for_write(&self) -> Result<BTreeMap<String, String>> {
        match self.parse_entries()? {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "replacing malformed storage file");
                Ok(BTreeMap::new())
            }
        }
    }

    /// Outer error is I/O, inner is JSON.
    fn parse_entries(&self) -> Result<serde_json::Result<BTreeMap<String, String>>> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("Could not open storage file {}", self.file_path.display()))?;
        let mut content = String::new();
        BufReader::new(file)
            .read_to_string(&mut content)
            .with_context(|| format!("Could not read storage file {}", self.file_path.display()))?;
        Ok(serde_json::from_str(&content))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush()?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.read_entries()?;
        Ok(entries.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_entries_for_write()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
