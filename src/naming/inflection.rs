//! Pluralization and case conversion for generated SQL identifiers.
//!
//! Irregular nouns are matched against the *last* `_`-separated segment of a
//! snake_case identifier only, so compound names pluralize like their head
//! noun (`search_index` -> `search_indices`) while words that merely start
//! with an irregular noun are left to the regular rules (`oxford` ->
//! `oxfords`). Regular words fall back to the `inflector` crate.

use inflector::Inflector;

/// Irregular plurals the regular English rules get wrong.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    // People
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    // Body parts
    ("foot", "feet"),
    ("tooth", "teeth"),
    // Animals
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    // Latin/Greek
    ("index", "indices"),
    ("appendix", "appendices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("criterion", "criteria"),
];

/// Convert a specification identifier (`ContactInfo`, `firstName`) to
/// lower snake_case (`contact_info`, `first_name`).
pub fn snake_case(name: &str) -> String {
    name.to_snake_case()
}

/// Pluralize a single word, handling irregulars first then falling back to
/// inflector.
///
/// # Examples
/// ```ignore
/// assert_eq!(pluralize_word("customer"), "customers");
/// assert_eq!(pluralize_word("person"), "people");
/// ```
pub fn pluralize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();

    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *singular {
            return plural.to_string();
        }
        // Already plural?
        if lower == *plural {
            return plural.to_string();
        }
    }

    lower.to_plural()
}

/// Singularize a single word, handling irregulars first then falling back
/// to inflector.
pub fn singularize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();

    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *plural {
            return singular.to_string();
        }
        if lower == *singular {
            return singular.to_string();
        }
    }

    lower.to_singular()
}

/// Pluralize a snake_case identifier by pluralizing its last segment.
///
/// # Examples
/// ```ignore
/// assert_eq!(pluralize("search_index"), "search_indices");
/// assert_eq!(pluralize("contact_info"), "contact_infos");
/// ```
pub fn pluralize(snake: &str) -> String {
    map_last_segment(snake, pluralize_word)
}

/// Singularize a snake_case identifier by singularizing its last segment.
pub fn singularize(snake: &str) -> String {
    map_last_segment(snake, singularize_word)
}

fn map_last_segment(snake: &str, f: fn(&str) -> String) -> String {
    match snake.rsplit_once('_') {
        Some((head, last)) if !last.is_empty() => format!("{}_{}", head, f(last)),
        _ => f(snake),
    }
}
