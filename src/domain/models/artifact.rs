//! Downloaded test bundles.

use std::path::{Path, PathBuf};

use super::repo_key::RepoKey;

/// A zip bundle of persisted tests, held only while it is being saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBundle {
    pub repo_key: RepoKey,
    pub filename: String,
    pub content: Vec<u8>,
}

impl ArtifactBundle {
    pub fn new(repo_key: RepoKey, content: Vec<u8>) -> Self {
        let filename = repo_key.bundle_filename();
        Self {
            repo_key,
            filename,
            content,
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Write the bundle into `dir` under its suggested filename.
    pub async fn write_to_dir(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.content).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_uses_deterministic_filename() {
        let bundle = ArtifactBundle::new(RepoKey::derive("https://x/y/Foo-Bar.git"), vec![1, 2, 3]);
        assert_eq!(bundle.filename, "Foo_Bar_tests.zip");
        assert_eq!(bundle.len(), 3);
    }

    #[tokio::test]
    async fn test_write_to_dir_creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("out");
        let bundle = ArtifactBundle::new(RepoKey::derive("repo"), b"PK\x03\x04".to_vec());

        let path = bundle.write_to_dir(&target).await.unwrap();

        assert_eq!(path, target.join("repo_tests.zip"));
        assert_eq!(std::fs::read(path).unwrap(), b"PK\x03\x04");
    }
}
