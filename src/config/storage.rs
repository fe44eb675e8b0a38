use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.base_path.join(path);
        match tokio::fs::read(full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        match tokio::fs::remove_file(self.base_path.join(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `$TRUCKSTOP_CONFIG_DIR`, else `$XDG_CONFIG_HOME/truckstop-proxy`, else
/// `$HOME/.config/truckstop-proxy`, else `./.truckstop-proxy`.
pub fn default_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TRUCKSTOP_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("truckstop-proxy");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("truckstop-proxy");
    }
    PathBuf::from(".truckstop-proxy")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_and_missing_files() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested"));

        assert_eq!(storage.read_file("absent.json").await.unwrap(), None);

        storage.write_file("saved.json", b"{}").await.unwrap();
        assert_eq!(
            storage.read_file("saved.json").await.unwrap(),
            Some(b"{}".to_vec())
        );

        storage.remove_file("saved.json").await.unwrap();
        storage.remove_file("saved.json").await.unwrap();
        assert_eq!(storage.read_file("saved.json").await.unwrap(), None);
    }
}
