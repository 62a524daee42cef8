//! Key/value storage adapters for persisted client state.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;
