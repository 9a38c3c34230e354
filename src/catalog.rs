//! The static category catalog.
//!
//! Categories are identified by a stable key (e.g. "food") that maps to a
//! display label and an icon identifier. The catalog is fixed at compile time
//! and shared process-wide; there is no writer, so concurrent readers need no
//! locking.
//!
//! Transactions may reference keys that are not in the catalog (e.g. data
//! recorded under a category that was later removed from the list). Lookups
//! on unknown keys never fail: display code falls back to rendering the raw
//! key via [resolve_label].

/// A recognized transaction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// The stable key stored on transactions.
    pub key: &'static str,
    /// The label shown to users.
    pub label: &'static str,
    /// The icon identifier used by the front end.
    pub icon: &'static str,
}

/// The key of the designated fallback category.
///
/// Category suggestions that do not match any catalog label resolve to this
/// key rather than being rejected.
pub const OTHER_KEY: &str = "other";

/// Every category the application recognizes, in display order.
pub const CATALOG: &[Category] = &[
    Category {
        key: "food",
        label: "Food",
        icon: "utensils",
    },
    Category {
        key: "transport",
        label: "Transport",
        icon: "car",
    },
    Category {
        key: "housing",
        label: "Housing",
        icon: "home",
    },
    Category {
        key: "health",
        label: "Health",
        icon: "heart",
    },
    Category {
        key: "apparel",
        label: "Apparel",
        icon: "shirt",
    },
    Category {
        key: "entertainment",
        label: "Entertainment",
        icon: "film",
    },
    Category {
        key: "gifts",
        label: "Gifts",
        icon: "gift",
    },
    Category {
        key: "work",
        label: "Work",
        icon: "briefcase",
    },
    Category {
        key: "education",
        label: "Education",
        icon: "graduation-cap",
    },
    Category {
        key: "investments",
        label: "Investments",
        icon: "piggy-bank",
    },
    Category {
        key: OTHER_KEY,
        label: "Other",
        icon: "landmark",
    },
];

/// Look up a category by its key.
pub fn get(key: &str) -> Option<&'static Category> {
    CATALOG.iter().find(|category| category.key == key)
}

/// Resolve a category key to its display label.
///
/// Unknown keys are rendered verbatim so that transactions referencing a
/// category that is no longer in the catalog still display.
pub fn resolve_label(key: &str) -> &str {
    match get(key) {
        Some(category) => category.label,
        None => key,
    }
}

/// Find the key whose label matches `label`, ignoring case.
///
/// Used to map free-text suggestions back onto catalog keys.
pub fn key_for_label(label: &str) -> Option<&'static str> {
    let label = label.trim();

    CATALOG
        .iter()
        .find(|category| category.label.eq_ignore_ascii_case(label))
        .map(|category| category.key)
}

#[cfg(test)]
mod catalog_tests {
    use super::{CATALOG, OTHER_KEY, get, key_for_label, resolve_label};

    #[test]
    fn keys_are_unique() {
        for (i, category) in CATALOG.iter().enumerate() {
            for other in &CATALOG[i + 1..] {
                assert_ne!(category.key, other.key, "duplicate key {}", category.key);
            }
        }
    }

    #[test]
    fn contains_fallback_category() {
        assert!(get(OTHER_KEY).is_some());
    }

    #[test]
    fn resolves_known_key_to_label() {
        assert_eq!(resolve_label("food"), "Food");
    }

    #[test]
    fn unknown_key_falls_back_to_raw_key() {
        assert_eq!(resolve_label("crypto_misc"), "crypto_misc");
    }

    #[test]
    fn matches_labels_case_insensitively() {
        assert_eq!(key_for_label("food"), Some("food"));
        assert_eq!(key_for_label("FOOD"), Some("food"));
        assert_eq!(key_for_label(" Transport "), Some("transport"));
    }

    #[test]
    fn unknown_label_has_no_key() {
        assert_eq!(key_for_label("Cryptocurrency"), None);
    }
}
