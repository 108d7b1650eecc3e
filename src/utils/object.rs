//! Object framing and addressing.
//!
//! A frame is `<kind> <decimal length>\0<payload>`; an object's address is the
//! SHA-1 of its frame.

use crate::error::{ObjectError, Result};
use sha1::{Digest, Sha1};
use std::{fmt, str::FromStr};

/// Object kinds understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(Self::Blob),
            "tree" => Ok(Self::Tree),
            "commit" => Ok(Self::Commit),
            "tag" => Ok(Self::Tag),
            _ => Err(ObjectError::MalformedFrame(format!(
                "unknown object kind '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A 20-byte SHA-1 object address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 20]);

impl ObjectId {
    pub const LEN: usize = 20;
    pub const HEX_LEN: usize = 40;

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parses a full 40-character address. Abbreviated addresses are rejected.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != Self::HEX_LEN {
            return Err(ObjectError::InvalidAddress(hex.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex, &mut bytes)
            .map_err(|_| ObjectError::InvalidAddress(hex.to_string()))?;
        Ok(Self(bytes))
    }

    /// Address of an already encoded frame.
    pub fn of_frame(frame: &[u8]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&Sha1::digest(frame)[..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Splits the hex form into the fan-out directory and file name.
    pub fn split_path(&self) -> (String, String) {
        let hex = self.to_hex();
        let (dir_name, file_name) = hex.split_at(2);
        (dir_name.to_string(), file_name.to_string())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// A decoded object: its kind plus the raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub kind: ObjectKind,
    pub payload: Vec<u8>,
}

impl Object {
    pub fn new(kind: ObjectKind, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    pub fn blob(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(ObjectKind::Blob, payload)
    }

    pub fn id(&self) -> ObjectId {
        hash_object(self.kind, &self.payload)
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

fn header(kind: ObjectKind, len: usize) -> String {
    format!("{} {}\0", kind.as_str(), len)
}

pub fn encode_frame(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let mut frame = header(kind, payload.len()).into_bytes();
    frame.extend_from_slice(payload);
    frame
}

/// Computes the address of `payload` framed as `kind` without building the frame.
pub fn hash_object(kind: ObjectKind, payload: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(header(kind, payload.len()).as_bytes());
    hasher.update(payload);

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hasher.finalize()[..]);
    ObjectId(bytes)
}

/// Splits a frame into kind and payload.
///
/// Only the header is scanned for delimiters. The payload is taken by the
/// declared length and may hold any bytes, NUL included.
pub fn decode_frame(frame: &[u8]) -> Result<Object> {
    let nul = frame
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ObjectError::MalformedFrame("missing NUL after header".to_string()))?;

    let header = std::str::from_utf8(&frame[..nul])
        .ok()
        .filter(|h| h.is_ascii())
        .ok_or_else(|| ObjectError::MalformedFrame("header is not ASCII".to_string()))?;

    let (kind, len) = header.split_once(' ').ok_or_else(|| {
        ObjectError::MalformedFrame(format!("header '{}' has no length field", header))
    })?;
    let kind = ObjectKind::parse(kind)?;
    let len = parse_length(len)?;

    let payload = &frame[nul + 1..];
    if payload.len() < len {
        return Err(ObjectError::MalformedFrame(format!(
            "declared length {} but only {} bytes follow the header",
            len,
            payload.len()
        )));
    }
    if payload.len() > len {
        return Err(ObjectError::MalformedFrame(format!(
            "{} trailing bytes after {}-byte payload",
            payload.len() - len,
            len
        )));
    }

    Ok(Object::new(kind, payload))
}

fn parse_length(digits: &str) -> Result<usize> {
    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if !well_formed {
        return Err(ObjectError::MalformedFrame(format!(
            "invalid length field '{}'",
            digits
        )));
    }
    digits
        .parse()
        .map_err(|_| ObjectError::MalformedFrame(format!("length '{}' out of range", digits)))
}
