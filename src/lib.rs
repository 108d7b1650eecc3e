pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod utils;

pub use cli::cli;
pub use config::{StoreConfig, StoreConfigBuilder};
pub use error::{ObjectError, Result};
pub use utils::{
    Object, ObjectId, ObjectKind, ObjectStore, TreeEntry, decode_frame, encode_frame,
    encode_tree, entry_names, hash_object, parse_tree_entries,
};
