use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "yrno_cache";

pub(crate) fn default_cache_dir() -> io::Result<PathBuf> {
    dirs::cache_dir()
        .map(|path| path.join(CACHE_DIR_NAME))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine system cache directory",
            )
        })
}

pub(crate) async fn ensure_cache_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("cache path exists but is not a directory: {}", path.display()),
        )),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            tokio::fs::create_dir_all(path).await
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn creates_missing_cache_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_cache_dir_exists(&nested).await.unwrap();
        assert!(nested.is_dir());

        // Idempotent on an existing directory.
        ensure_cache_dir_exists(&nested).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_a_file_in_the_way() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cache");
        tokio::fs::write(&file, "x").await.unwrap();

        assert!(ensure_cache_dir_exists(&file).await.is_err());
    }
}
