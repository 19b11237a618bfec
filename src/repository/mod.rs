//! Durable collection documents.
//!
//! [`DurableFile`] is the leaf: one JSON document replaced atomically.
//! [`CollectionRepository`] adds the collection lock and the
//! read / write / read-modify-write surface the stores are built on.

mod collection;
mod durable_file;

pub use collection::CollectionRepository;
pub use durable_file::DurableFile;
