//! A keyword-based category suggester.
//!
//! Matches the description against a fixed table of keyword patterns, the
//! same way auto-tagging rules match bank statement lines. The first
//! matching rule wins; a description that matches nothing suggests the
//! fallback label rather than failing, since a wrong-but-editable guess is
//! more useful than an error.

use crate::{Error, catalog, suggestion::CategorySuggester};

/// Keyword patterns and the catalog label each one suggests.
///
/// Matching is case-insensitive on the whole description. Order matters:
/// earlier rows win, so more specific keywords should come first.
const RULES: &[(&str, &str)] = &[
    ("salary", "Work"),
    ("payroll", "Work"),
    ("wages", "Work"),
    ("invoice", "Work"),
    ("freelance", "Work"),
    ("bonus", "Work"),
    ("rent", "Housing"),
    ("mortgage", "Housing"),
    ("power bill", "Housing"),
    ("electricity", "Housing"),
    ("internet", "Housing"),
    ("water bill", "Housing"),
    ("grocer", "Food"),
    ("supermarket", "Food"),
    ("coffee", "Food"),
    ("cafe", "Food"),
    ("restaurant", "Food"),
    ("lunch", "Food"),
    ("dinner", "Food"),
    ("pizza", "Food"),
    ("takeaway", "Food"),
    ("uber", "Transport"),
    ("taxi", "Transport"),
    ("fuel", "Transport"),
    ("petrol", "Transport"),
    ("parking", "Transport"),
    ("bus ", "Transport"),
    ("train", "Transport"),
    ("flight", "Transport"),
    ("pharmacy", "Health"),
    ("doctor", "Health"),
    ("dentist", "Health"),
    ("hospital", "Health"),
    ("gym", "Health"),
    ("clothes", "Apparel"),
    ("clothing", "Apparel"),
    ("shoes", "Apparel"),
    ("cinema", "Entertainment"),
    ("movie", "Entertainment"),
    ("netflix", "Entertainment"),
    ("spotify", "Entertainment"),
    ("concert", "Entertainment"),
    ("gift", "Gifts"),
    ("present for", "Gifts"),
    ("donation", "Gifts"),
    ("tuition", "Education"),
    ("textbook", "Education"),
    ("course", "Education"),
    ("university", "Education"),
    ("dividend", "Investments"),
    ("shares", "Investments"),
    ("etf", "Investments"),
    ("interest", "Investments"),
];

/// Suggests categories by matching keywords in the description.
#[derive(Debug, Clone, Default)]
pub struct KeywordSuggester;

impl KeywordSuggester {
    /// Create a new keyword suggester.
    pub fn new() -> Self {
        Self
    }
}

impl CategorySuggester for KeywordSuggester {
    fn suggest(&self, description: &str) -> Result<String, Error> {
        let description = description.to_lowercase();

        let label = RULES
            .iter()
            .find(|(keyword, _)| description.contains(keyword))
            .map(|(_, label)| *label)
            .unwrap_or(catalog::resolve_label(catalog::OTHER_KEY));

        Ok(label.to_string())
    }
}
