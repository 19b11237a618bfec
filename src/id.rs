//! Identifier schemes.
//!
//! Plain fragments get a full v4 UUID. Phase fragments and generation events
//! get a readable prefix plus the first eight hex digits of a v4 UUID; those
//! 32 bits are not collision-proof at scale, which is acceptable only because
//! collections stay small and ids are never used as secrets. The fragment
//! store additionally re-draws ids that already exist in the target
//! collection.

use uuid::Uuid;

use crate::error::StoreError;

const SHORT_LEN: usize = 8;

/// Fresh id for a fragment in a non-phase collection.
pub fn generate_fragment_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fresh id for a fragment in the collection of phase `phase`:
/// `p<phase>_<8 hex digits>`.
pub fn generate_phase_id(phase: i64) -> Result<String, StoreError> {
    if phase < 1 {
        return Err(StoreError::invalid(format!(
            "phase must be a positive integer, got {phase}"
        )));
    }
    Ok(format!("p{phase}_{}", short_uuid()))
}

/// Fresh id for a generation event: `hist_<8 hex digits>`.
pub fn generate_history_id() -> String {
    format!("hist_{}", short_uuid())
}

/// Parse a phase id such as `"3"` into the number used by [`generate_phase_id`].
pub fn phase_number(phase_id: &str) -> Result<i64, StoreError> {
    match phase_id.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(StoreError::invalid(format!(
            "phase id must be a positive integer, got {phase_id:?}"
        ))),
    }
}

/// Draw ids from `generate` until one is not `taken`, giving up after
/// `attempts` draws with `Ok(None)`.
pub(crate) fn draw_unused(
    attempts: usize,
    mut generate: impl FnMut() -> Result<String, StoreError>,
    taken: impl Fn(&str) -> bool,
) -> Result<Option<String>, StoreError> {
    for _ in 0..attempts {
        let candidate = generate()?;
        if !taken(&candidate) {
            return Ok(Some(candidate));
        }
        tracing::debug!(id = %candidate, "generated id already taken, drawing again");
    }
    Ok(None)
}

fn short_uuid() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(SHORT_LEN);
    hex
}
