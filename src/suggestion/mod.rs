//! Category suggestion from free-text transaction descriptions.
//!
//! [CategorySuggester] is the contract: given a description of at least
//! three characters, return a best-guess category label as free text, or
//! fail. The suggester never sees descriptions shorter than the minimum (the
//! endpoint rejects them first), its output is matched case-insensitively
//! against the catalog's labels, and a label that matches nothing falls back
//! to the catalog's designated "other" key. A failed suggestion is reported
//! to the user and leaves the category field for manual selection; it never
//! touches any existing transaction.

mod endpoint;
mod keyword;

pub use endpoint::suggest_category_endpoint;
pub use keyword::KeywordSuggester;

use crate::Error;

/// The minimum number of characters a description must have before a
/// suggestion is attempted. Shorter input is rejected client-side, before
/// the suggester is called at all.
pub const MIN_SUGGESTION_LENGTH: usize = 3;

/// Suggests a category label for a transaction description.
pub trait CategorySuggester: Send + Sync {
    /// Suggest a category label for `description`.
    ///
    /// The returned label is free text: callers must match it against the
    /// catalog themselves and decide what to do with labels the catalog does
    /// not recognize.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SuggestionFailed] if no suggestion could be
    /// produced.
    fn suggest(&self, description: &str) -> Result<String, Error>;
}
