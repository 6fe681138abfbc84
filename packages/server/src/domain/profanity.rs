//! Content filter capability the session needs from the outside.

/// A set of blocked words.
///
/// Implementations receive words already lower-cased; loading and refreshing
/// the underlying list is the implementation's business.
pub trait ProfanityFilter: Send + Sync {
    fn contains(&self, word: &str) -> bool;
}

/// `true` when any whitespace-delimited word of `text` is blocked
/// (case-insensitive, exact word match).
pub fn contains_profanity(filter: &dyn ProfanityFilter, text: &str) -> bool {
    text.split_whitespace()
        .any(|word| filter.contains(&word.to_lowercase()))
}

/// Filter that blocks nothing; used when no word list is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProfanityFilter;

impl ProfanityFilter for NoProfanityFilter {
    fn contains(&self, _word: &str) -> bool {
        false
    }
}
