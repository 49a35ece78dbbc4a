//! Filesystem infrastructure: implements `ManifestRepository` over
//! `<config_dir>/manifests/`.
//!
//! Directory work runs on the blocking pool via `tokio::task::spawn_blocking`,
//! since callers hold the workload manager's lock across these calls.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::application::ports::ManifestRepository;

/// Manifests are readable by the owner's group (for the runtime).
const MANIFEST_FILE_MODE: u32 = 0o640;

/// Manifest directory on the local filesystem.
pub struct ManifestDir {
    dir: PathBuf,
}

impl ManifestDir {
    /// Open `<config_dir>/manifests`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(config_dir: &Path) -> Result<Self> {
        let dir = config_dir.join("manifests");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn write_sync(path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content)
            .with_context(|| format!("writing manifest {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(MANIFEST_FILE_MODE))
                .with_context(|| format!("setting permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn list_sync(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("reading directory {}", dir.display()))?
        {
            let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn remove_sync(path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("removing manifest {}", path.display()))
    }

    fn remove_all_sync(dir: &Path) -> Result<()> {
        for path in Self::list_sync(dir)? {
            Self::remove_sync(&path)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ManifestRepository for ManifestDir {
    async fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        let target = path.clone();
        let content = content.to_string();
        tokio::task::spawn_blocking(move || Self::write_sync(&target, &content))
            .await
            .context("manifest write task panicked")??;
        Ok(path)
    }

    async fn list(&self) -> Result<Vec<PathBuf>> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || Self::list_sync(&dir))
            .await
            .context("manifest list task panicked")?
    }

    async fn read(&self, path: &Path) -> Result<String> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            std::fs::read_to_string(&path)
                .with_context(|| format!("reading manifest {}", path.display()))
        })
        .await
        .context("manifest read task panicked")?
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::remove_sync(&path))
            .await
            .context("manifest remove task panicked")?
    }

    async fn remove_all(&self) -> Result<()> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || Self::remove_all_sync(&dir))
            .await
            .context("manifest remove task panicked")?
    }
}
