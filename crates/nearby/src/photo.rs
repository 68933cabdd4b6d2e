use crate::places::{PhotoReference, PlacesClient, PlacesError};
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Failed to determine cache directory")]
    CacheDirNotFound,
    #[error(transparent)]
    Places(#[from] PlacesError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// On-disk store of downloaded place photos, keyed by photo reference.
#[derive(Debug, Clone)]
pub struct PhotoCache {
    dir: PathBuf,
}

impl PhotoCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_project_dirs() -> Result<Self, PhotoError> {
        let proj_dirs = ProjectDirs::from("org", "lunchwheel", "lunchwheel")
            .ok_or(PhotoError::CacheDirNotFound)?;
        Ok(Self::new(proj_dirs.cache_dir().join("photos")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// References are long opaque tokens, so the file name is their SHA-256.
    pub fn path_for(&self, reference: &PhotoReference) -> PathBuf {
        let digest = Sha256::digest(reference.as_str().as_bytes());
        let mut name = String::with_capacity(digest.len() * 2 + 4);
        for byte in digest {
            let _ = write!(name, "{:02x}", byte);
        }
        name.push_str(".jpg");
        self.dir.join(name)
    }

    /// Writes next to the target and renames, so `path` only ever holds a
    /// complete download.
    fn store(&self, path: &Path, bytes: &[u8]) -> Result<(), PhotoError> {
        fs_err::create_dir_all(&self.dir)?;
        let partial = path.with_extension("jpg.part");
        fs_err::write(&partial, bytes)?;
        fs_err::rename(&partial, path)?;
        Ok(())
    }

    pub async fn fetch(
        &self,
        places: &PlacesClient,
        reference: &PhotoReference,
    ) -> Result<PathBuf, PhotoError> {
        let path = self.path_for(reference);
        if path.exists() {
            return Ok(path);
        }

        let bytes = places.photo(reference).await?;
        self.store(&path, &bytes)?;
        log::debug!("Cached photo at {}", path.display());
        Ok(path)
    }
}
