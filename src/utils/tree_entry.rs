use crate::error::{ObjectError, Result};
use crate::utils::{ObjectId, ObjectKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: String, // e.g., "100644" or "40000"
    pub name: String, // e.g., "main.rs" or "src"
    pub id: ObjectId, // raw 20-byte address of the blob/tree
}

impl TreeEntry {
    pub fn new(mode: impl Into<String>, name: impl Into<String>, id: ObjectId) -> Self {
        Self {
            mode: mode.into(),
            name: name.into(),
            id,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut entry = Vec::new();
        entry.extend_from_slice(self.mode.as_bytes());
        entry.push(b' ');

        entry.extend_from_slice(self.name.as_bytes());
        entry.push(0); // NULL separator

        entry.extend_from_slice(self.id.as_bytes());
        entry
    }

    pub fn is_tree(&self) -> bool {
        self.mode == "40000" || self.mode == "040000"
    }

    /// Kind of the referenced object, as implied by the mode.
    pub fn kind(&self) -> ObjectKind {
        if self.is_tree() {
            ObjectKind::Tree
        } else if self.mode == "160000" {
            ObjectKind::Commit
        } else {
            ObjectKind::Blob
        }
    }
}

pub fn encode_tree(entries: &[TreeEntry]) -> Vec<u8> {
    entries.iter().flat_map(|entry| entry.to_bytes()).collect()
}

enum ParseState {
    ReadMode,
    ReadName,
    ReadHash,
    Done,
}

/// Decodes a tree payload into its entries, in stored order.
///
/// Mode and name are scanned up to their delimiters; the address is always
/// the next 20 bytes, whatever their values.
pub fn parse_tree_entries(payload: &[u8]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut offset = 0;
    let mut state = if payload.is_empty() {
        ParseState::Done
    } else {
        ParseState::ReadMode
    };

    let mut mode = String::new();
    let mut name = String::new();

    loop {
        match state {
            ParseState::ReadMode => {
                let field = read_until(payload, offset, b' ')
                    .ok_or_else(|| malformed(offset, "missing space after mode"))?;
                if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
                    return Err(malformed(offset, "mode is not a digit string"));
                }
                mode = String::from_utf8_lossy(field).into_owned();
                offset += field.len() + 1;
                state = ParseState::ReadName;
            }
            ParseState::ReadName => {
                let field = read_until(payload, offset, 0)
                    .ok_or_else(|| malformed(offset, "missing NUL after name"))?;
                name = std::str::from_utf8(field)
                    .ok()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| malformed(offset, "name is empty or not UTF-8"))?
                    .to_string();
                offset += field.len() + 1;
                state = ParseState::ReadHash;
            }
            ParseState::ReadHash => {
                let end = offset + ObjectId::LEN;
                let raw = payload
                    .get(offset..end)
                    .ok_or_else(|| malformed(offset, "truncated object address"))?;

                let mut bytes = [0u8; 20];
                bytes.copy_from_slice(raw);
                entries.push(TreeEntry {
                    mode: std::mem::take(&mut mode),
                    name: std::mem::take(&mut name),
                    id: ObjectId::from_bytes(bytes),
                });

                offset = end;
                state = if offset == payload.len() {
                    ParseState::Done
                } else {
                    ParseState::ReadMode
                };
            }
            ParseState::Done => return Ok(entries),
        }
    }
}

/// Names of the entries, in stored order.
pub fn entry_names(entries: &[TreeEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.name.as_str()).collect()
}

fn read_until(payload: &[u8], offset: usize, delimiter: u8) -> Option<&[u8]> {
    let rest = &payload[offset..];
    rest.iter()
        .position(|&b| b == delimiter)
        .map(|end| &rest[..end])
}

fn malformed(offset: usize, reason: &str) -> ObjectError {
    ObjectError::MalformedTree(format!("{} at byte {}", reason, offset))
}
