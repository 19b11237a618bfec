//! Fragments: reusable pieces of prompt text kept in named collections.
//!
//! A fragment is created once, edited any number of times (each text change
//! keeps the previous text in `history_log`) and may be deprecated, which
//! hides it from filtered views without removing anything.
//!
//! ```ignore
//! use fragment_store::{FragmentDraft, FragmentPatch, FragmentStore, StoreConfig};
//!
//! let store = FragmentStore::open(StoreConfig::new("data"))?;
//! let draft = FragmentDraft::new("You are a reviewer.").tags(["review"]);
//! let intro = store.create("prefixes", draft)?;
//! store.update("prefixes", &intro.id, FragmentPatch::new().text("You are a strict reviewer."))?;
//! store.deprecate("prefixes", &intro.id)?;
//! ```

mod collection_name;
mod filter;
mod model;
mod store;

pub use collection_name::CollectionName;
pub use filter::{collect_tags, FragmentFilter};
pub use model::{text_length, Fragment, FragmentDraft, FragmentPatch, HistoryEntry};
pub use store::FragmentStore;
