//! Store configuration.

use flate2::Compression;
use std::path::{Path, PathBuf};

/// Where the store lives and how objects are compressed on disk.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store root. Layout:
    ///   {root}/
    ///     ├── objects/<aa>/<38 hex>
    ///     └── refs/
    pub root: PathBuf,

    /// zlib level for new objects; any level reads back identically
    pub compression: Compression,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".git"),
            compression: Compression::default(),
        }
    }
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::builder().root(root).build()
    }

    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.root.join("objects")
    }

    pub fn refs_dir(&self) -> PathBuf {
        self.root.join("refs")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root = path.into();
        self
    }

    pub fn compression(mut self, level: Compression) -> Self {
        self.config.compression = level;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_is_dot_git() {
        let config = StoreConfig::default();
        assert_eq!(config.root, PathBuf::from(".git"));
        assert_eq!(config.objects_dir(), PathBuf::from(".git/objects"));
        assert_eq!(config.compression, Compression::default());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = StoreConfig::builder()
            .root("/tmp/store")
            .compression(Compression::best())
            .build();
        assert_eq!(config.refs_dir(), PathBuf::from("/tmp/store/refs"));
        assert_eq!(config.compression, Compression::best());
    }
}
