use crate::{
    error::{Result, TrellisError},
    storage::Storage,
};
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;

/// File-based storage: each key is a JSON file under a root directory
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const EXTENSION: &'static str = "json";
    const TMP_EXTENSION: &'static str = "json.tmp";

    /// Creates a FileStorage rooted at `root`. The directory is created on
    /// first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    fn key_file(&self, key: &str) -> Result<PathBuf> {
        Self::check_key(key)?;
        Ok(self
            .root_path
            .join(format!("{}.{}", key, Self::EXTENSION)))
    }

    fn check_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if valid {
            Ok(())
        } else {
            Err(TrellisError::StorageError(format!(
                "invalid storage key '{}'",
                key
            )))
        }
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.key_file(key)?;

        match fs::read_to_string(&file_path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.key_file(key)?;
        self.ensure_directory_exists(&self.root_path).await?;

        // Readers only ever see the old or the new file, never a torn write.
        let tmp_path = file_path.with_extension(Self::TMP_EXTENSION);
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &file_path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file_path = self.key_file(key)?;

        match fs::remove_file(file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
