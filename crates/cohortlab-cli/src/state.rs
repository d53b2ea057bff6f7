use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use cohortlab_analysis::store::{CohortStore, KeyValueBackend};

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub(crate) struct DirectoryBackend {
    dir: PathBuf,
}

impl DirectoryBackend {
    pub(crate) fn create(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for DirectoryBackend {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> io::Result<()> {
        // entries are replaced atomically
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path(key))
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

pub(crate) type DirectoryStore = CohortStore<DirectoryBackend>;

pub(crate) fn open_store(dir: &Path) -> anyhow::Result<DirectoryStore> {
    let backend = DirectoryBackend::create(dir)
        .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
    let store = CohortStore::open(backend)
        .with_context(|| format!("Failed to open state directory: {}", dir.display()))?;
    Ok(store)
}
