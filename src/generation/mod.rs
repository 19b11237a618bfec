//! Generation log: the audit trail of assembled prompts.

mod event;
mod log;

pub use event::{GenerationEvent, GenerationEventDraft};
pub use log::GenerationLog;
