//! Final prompt text from its parts.

const SEPARATOR: &str = "\n\n";

/// Join the parts of a prompt in the fixed order prefix, phase, main, suffix.
///
/// Each part is trimmed; parts that are empty after trimming are dropped,
/// never reordered. The survivors are separated by a blank line.
pub fn assemble(prefix: &str, phase: &str, main: &str, suffix: &str) -> String {
    [prefix, phase, main, suffix]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
