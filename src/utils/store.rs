//! Loose object storage.
//!
//! Each object lives in its own zlib-compressed file at
//! `<root>/objects/<first 2 hex>/<remaining 38 hex>`.

use crate::config::StoreConfig;
use crate::error::{ObjectError, Result};
use crate::utils::{
    Object, ObjectId, ObjectKind, TreeEntry, decode_frame, encode_frame, parse_tree_entries,
};
use flate2::{Decompress, FlushDecompress, Status, write::ZlibEncoder};
use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct ObjectStore {
    config: StoreConfig,
}

impl ObjectStore {
    /// Creates the store layout under `config.root`. Safe to call on an
    /// existing store.
    pub fn init(config: StoreConfig) -> Result<Self> {
        for dir in [config.root.clone(), config.objects_dir(), config.refs_dir()] {
            ensure_dir(&dir)?;
        }
        debug!(root = %config.root.display(), "initialized object store");
        Ok(Self { config })
    }

    /// Attaches to a store that was initialized earlier.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let objects_dir = config.objects_dir();
        if !objects_dir.is_dir() {
            return Err(ObjectError::StoreInit(format!(
                "{} is not an object store (missing objects directory)",
                config.root.display()
            )));
        }
        Ok(Self { config })
    }

    pub fn root(&self) -> &Path {
        self.config.root()
    }

    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir_name, file_name) = id.split_path();
        self.config.objects_dir().join(dir_name).join(file_name)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Stores `payload` as an object of `kind` and returns its address.
    pub fn put(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId> {
        let frame = encode_frame(kind, payload);
        let id = ObjectId::of_frame(&frame);
        let object_path = self.object_path(&id);

        if object_path.exists() {
            trace!(%id, "object already stored, skipping write");
            return Ok(id);
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), self.config.compression);
        encoder.write_all(&frame)?;
        let compressed = encoder.finish()?;

        let (dir_name, _) = id.split_path();
        let object_dir = self.config.objects_dir().join(dir_name);
        fs::create_dir_all(&object_dir)?;
        write_atomically(&object_dir, &object_path, &compressed)?;

        debug!(%id, %kind, size = payload.len(), compressed = compressed.len(), "stored object");
        Ok(id)
    }

    pub fn put_object(&self, object: &Object) -> Result<ObjectId> {
        self.put(object.kind, &object.payload)
    }

    /// Reads the object at a full 40-hex address.
    pub fn get(&self, address: &str) -> Result<Object> {
        let id = ObjectId::from_hex(address)?;
        self.get_id(&id)
    }

    pub fn get_id(&self, id: &ObjectId) -> Result<Object> {
        let object_path = self.object_path(id);
        let compressed = match fs::read(&object_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ObjectError::ObjectNotFound(id.to_hex()));
            }
            Err(err) => return Err(err.into()),
        };

        let frame = decompress(&compressed).map_err(|err| ObjectError::CorruptObject {
            address: id.to_hex(),
            reason: err.to_string(),
        })?;
        let object = decode_frame(&frame)?;

        debug!(%id, kind = %object.kind, size = object.size(), "read object");
        Ok(object)
    }

    /// Reads a tree object and decodes its entries.
    pub fn read_tree(&self, address: &str) -> Result<Vec<TreeEntry>> {
        let object = self.get(address)?;
        if object.kind != ObjectKind::Tree {
            return Err(ObjectError::MalformedTree(format!(
                "{} is a {}, not a tree",
                address, object.kind
            )));
        }
        parse_tree_entries(&object.payload)
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ObjectError::StoreInit(format!(
            "{} exists and is not a directory",
            dir.display()
        ))),
        Err(err) if err.kind() == ErrorKind::NotFound => fs::create_dir_all(dir).map_err(|err| {
            ObjectError::StoreInit(format!("cannot create {}: {}", dir.display(), err))
        }),
        Err(err) => Err(ObjectError::StoreInit(format!(
            "cannot inspect {}: {}",
            dir.display(),
            err
        ))),
    }
}

// Readers never observe a partially written object under its final name.
fn write_atomically(dir: &Path, object_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    let mut permissions = temp.as_file().metadata()?.permissions();
    permissions.set_readonly(true);
    temp.as_file().set_permissions(permissions)?;

    temp.persist(object_path).map_err(|err| err.error)?;
    Ok(())
}

/// Inflates a whole zlib stream; a stream that stops before its end marker is an error.
fn decompress(compressed: &[u8]) -> io::Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut decompressed = Vec::with_capacity(compressed.len().saturating_mul(2).max(64));

    loop {
        if decompressed.len() == decompressed.capacity() {
            decompressed.reserve(decompressed.capacity());
        }

        let (before_in, before_out) = (inflater.total_in(), inflater.total_out());
        let consumed = before_in as usize;
        let status = inflater
            .decompress_vec(&compressed[consumed..], &mut decompressed, FlushDecompress::None)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        if status == Status::StreamEnd {
            return Ok(decompressed);
        }

        let stalled = inflater.total_in() == before_in && inflater.total_out() == before_out;
        if stalled && decompressed.len() < decompressed.capacity() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "zlib stream ends before its end marker",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, ObjectStore) {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::init(StoreConfig::new(dir.path().join(".git"))).unwrap();
        (dir, store)
    }

    #[test]
    fn init_creates_layout_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join(".git"));
        ObjectStore::init(config.clone()).unwrap();
        ObjectStore::init(config.clone()).unwrap();
        assert!(config.objects_dir().is_dir());
        assert!(config.refs_dir().is_dir());
        ObjectStore::open(config).unwrap();
    }

    #[test]
    fn init_rejects_file_in_the_way() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(".git");
        fs::write(&root, b"not a directory").unwrap();
        let err = ObjectStore::init(StoreConfig::new(&root)).unwrap_err();
        assert!(matches!(err, ObjectError::StoreInit(_)));

        let root = dir.path().join("other");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("objects"), b"").unwrap();
        let err = ObjectStore::init(StoreConfig::new(&root)).unwrap_err();
        assert!(matches!(err, ObjectError::StoreInit(_)));
    }

    #[test]
    fn open_requires_initialized_store() {
        let dir = TempDir::new().unwrap();
        let err = ObjectStore::open(StoreConfig::new(dir.path())).unwrap_err();
        assert!(matches!(err, ObjectError::StoreInit(_)));
    }

    #[test]
    fn put_writes_fanout_path() {
        let (_dir, store) = store();
        let id = store.put(ObjectKind::Blob, b"hello\n").unwrap();
        assert_eq!(id.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");

        let path = store.root().join("objects/ce/013625030ba8dba906f756967f9e9ca394464a");
        assert_eq!(store.object_path(&id), path);
        assert!(path.is_file());
        assert!(store.contains(&id));
    }

    #[test]
    fn stored_file_is_plain_zlib_of_frame() {
        let (_dir, store) = store();
        let id = store.put(ObjectKind::Blob, b"hello\n").unwrap();
        let raw = fs::read(store.object_path(&id)).unwrap();
        assert_eq!(decompress(&raw).unwrap(), b"blob 6\0hello\n".to_vec());
    }

    #[test]
    fn get_returns_what_put_stored() {
        let (_dir, store) = store();
        let payload = vec![0u8, 1, 2, 0xff, 0, b'\n'];
        let id = store.put(ObjectKind::Blob, &payload).unwrap();
        let object = store.get(&id.to_hex()).unwrap();
        assert_eq!(object, Object::blob(payload));
    }

    #[test]
    fn large_compressible_payloads_round_trip() {
        let (_dir, store) = store();
        let payloads = [
            vec![7u8; 4096],
            vec![b'a'; 200],
            "hello\n".repeat(50).into_bytes(),
            vec![0u8; 1 << 20],
        ];

        for payload in payloads {
            let id = store.put(ObjectKind::Blob, &payload).unwrap();
            assert_eq!(store.get(&id.to_hex()).unwrap(), Object::blob(payload));
        }
    }

    #[test]
    fn every_truncated_prefix_is_corrupt() {
        let (_dir, store) = store();
        let id = store.put(ObjectKind::Blob, "hello\n".repeat(8).as_bytes()).unwrap();
        let raw = fs::read(store.object_path(&id)).unwrap();

        assert!(decompress(&raw).is_ok());
        for len in 0..raw.len() {
            assert!(decompress(&raw[..len]).is_err(), "prefix of {} bytes", len);
        }
    }

    #[test]
    fn get_missing_object() {
        let (_dir, store) = store();
        let err = store.get("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391").unwrap_err();
        assert!(matches!(err, ObjectError::ObjectNotFound(_)));
    }

    #[test]
    fn get_corrupt_object() {
        let (_dir, store) = store();
        let id = ObjectId::from_bytes([0x42; 20]);
        let path = store.object_path(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"definitely not zlib").unwrap();

        let err = store.get_id(&id).unwrap_err();
        assert!(matches!(err, ObjectError::CorruptObject { .. }));
    }

    #[test]
    fn read_tree_rejects_blobs() {
        let (_dir, store) = store();
        let id = store.put(ObjectKind::Blob, b"x").unwrap();
        let err = store.read_tree(&id.to_hex()).unwrap_err();
        assert!(matches!(err, ObjectError::MalformedTree(_)));
    }
}
