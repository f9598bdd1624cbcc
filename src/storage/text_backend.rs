use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{data_dir_in, ensure_dir, write_atomic},
    domain::EntityKind,
    errors::{FinanceError, Result},
};

use super::Storage;

const QUARANTINE_SUFFIX: &str = "bak";

/// Plain text files under `<base>/data`, one per entity kind.
#[derive(Debug, Clone)]
pub struct TextStorage {
    data_dir: PathBuf,
}

impl TextStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        ensure_dir(&data_dir).map_err(|err| FinanceError::LoadFailed {
            path: data_dir.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self { data_dir })
    }

    /// Storage rooted at the `data` directory of an application home.
    pub fn in_home(base: &Path) -> Result<Self> {
        Self::new(data_dir_in(base))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Storage for TextStorage {
    fn read(&self, kind: EntityKind) -> Result<Option<String>> {
        let path = self.location(kind);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => Err(
                FinanceError::StorageFormatInvalid(format!("{} is not valid UTF-8", path.display())),
            ),
            Err(err) => Err(FinanceError::LoadFailed {
                path,
                reason: err.to_string(),
            }),
        }
    }

    fn write(&self, kind: EntityKind, contents: &str) -> Result<()> {
        let path = self.location(kind);
        write_atomic(&path, contents).map_err(|err| FinanceError::SaveFailed {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        tracing::debug!(kind = kind.label(), path = %path.display(), "saved");
        Ok(())
    }

    fn quarantine(&self, kind: EntityKind) -> Result<PathBuf> {
        let path = self.location(kind);
        let target = quarantine_path(&path);
        fs::rename(&path, &target).map_err(|err| FinanceError::LoadFailed {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        Ok(target)
    }

    fn location(&self, kind: EntityKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }
}

fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(QUARANTINE_SUFFIX);
    PathBuf::from(name)
}
