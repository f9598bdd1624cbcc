pub mod text_backend;

use std::path::PathBuf;

use crate::domain::{decode_list, encode_list, EntityKind, StorageCodec};
use crate::errors::{FinanceError, Result};

/// Persistence backend holding one text document per entity kind.
pub trait Storage: Send + Sync {
    /// Raw document for `kind`, or `None` when nothing was saved yet.
    fn read(&self, kind: EntityKind) -> Result<Option<String>>;

    fn write(&self, kind: EntityKind, contents: &str) -> Result<()>;

    /// Moves an unreadable document aside and returns its new location.
    fn quarantine(&self, kind: EntityKind) -> Result<PathBuf>;

    fn location(&self, kind: EntityKind) -> PathBuf;
}

/// Result of loading one document, with a warning when it had to be reset.
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub warning: Option<String>,
}

pub fn load_list<T: StorageCodec>(storage: &dyn Storage) -> Result<Loaded<Vec<T>>> {
    load_with(storage, T::KIND, decode_list::<T>)
}

pub fn save_list<T: StorageCodec>(storage: &dyn Storage, items: &[T]) -> Result<()> {
    storage.write(T::KIND, &encode_list(items))
}

pub fn load_single<T: StorageCodec + Default>(storage: &dyn Storage) -> Result<Loaded<T>> {
    load_with(storage, T::KIND, |raw| {
        if raw.trim().is_empty() {
            Ok(T::default())
        } else {
            T::from_storage_string(raw.trim())
        }
    })
}

pub fn save_single<T: StorageCodec>(storage: &dyn Storage, item: &T) -> Result<()> {
    storage.write(T::KIND, &item.to_storage_string())
}

fn load_with<T, F>(storage: &dyn Storage, kind: EntityKind, decode: F) -> Result<Loaded<T>>
where
    T: Default,
    F: FnOnce(&str) -> Result<T>,
{
    let Some(raw) = storage.read(kind)? else {
        return Ok(Loaded {
            value: T::default(),
            warning: None,
        });
    };
    match decode(&raw) {
        Ok(value) => Ok(Loaded {
            value,
            warning: None,
        }),
        Err(FinanceError::StorageFormatInvalid(reason)) => {
            let moved = storage.quarantine(kind)?;
            tracing::warn!(
                kind = kind.label(),
                reason = %reason,
                moved = %moved.display(),
                "unreadable data file set aside"
            );
            Ok(Loaded {
                value: T::default(),
                warning: Some(format!(
                    "Stored {} data was unreadable ({}); it was moved to {} and an empty list was started.",
                    kind.label(),
                    reason,
                    moved.display()
                )),
            })
        }
        Err(other) => Err(other),
    }
}

pub use text_backend::TextStorage;
