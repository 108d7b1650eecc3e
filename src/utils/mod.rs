pub mod object;
pub mod store;
pub mod tree_entry;

pub use object::*;
pub use store::*;
pub use tree_entry::*;
