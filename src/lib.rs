//! Versioned prompt fragments on plain JSON files.
//!
//! A [`FragmentStore`] keeps named collections of [`Fragment`]s (`prefixes`,
//! `suffixes`, `phase/<id>`), one document per collection, with a per-edit
//! history of overwritten texts and soft deprecation. A [`GenerationLog`]
//! records every assembled prompt. [`assemble`] joins the chosen texts and
//! [`Library`] wires the pieces together from one [`StoreConfig`].

mod assemble;
mod compose;
mod config;
mod error;
mod fragment;
mod generation;
pub mod id;
mod library;
pub mod lock;
mod phase;
pub mod repository;

pub use assemble::assemble;
pub use compose::{compose, ComposedPrompt, PromptSelection};
pub use config::{StoreConfig, DATA_DIR_ENV};
pub use error::{ErrorKind, StoreError};
pub use fragment::{
    collect_tags, text_length, CollectionName, Fragment, FragmentDraft, FragmentFilter,
    FragmentPatch, FragmentStore, HistoryEntry,
};
pub use generation::{GenerationEvent, GenerationEventDraft, GenerationLog};
pub use library::Library;
pub use lock::{InMemoryLock, InMemoryLockManager, Lock, LockError, LockGuard, LockManager};
pub use phase::{Phase, PhaseCatalog};
