//! Length-bounded identifier abbreviation.
//!
//! PostgreSQL silently truncates identifiers longer than 63 bytes, which can
//! make two distinct constraint names collide. Generated identifiers are
//! therefore shortened deterministically before they reach the IR.

use sha2::{Digest, Sha256};

/// Hard identifier limit of the storage engine (NAMEDATALEN - 1).
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Role prefixes that survive abbreviation verbatim.
pub const ROLE_PREFIXES: &[&str] = &["fk", "uk", "idx"];

/// Number of hex characters taken from the content hash.
const HASH_LEN: usize = 8;

/// How an over-long identifier is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbbreviateOptions {
    /// Maximum identifier length in bytes.
    pub limit: usize,
    /// Append a content hash of the original identifier when abbreviation
    /// alone is not enough. Without it the result is hard-truncated, which
    /// is lossy and only acceptable where uniqueness does not matter.
    pub hash_collisions: bool,
}

impl AbbreviateOptions {
    /// Default options for generated names: 63-byte limit with hashing.
    pub const HASHED: Self = Self {
        limit: MAX_IDENTIFIER_LENGTH,
        hash_collisions: true,
    };

    /// 63-byte limit with lossy truncation.
    pub const TRUNCATED: Self = Self {
        limit: MAX_IDENTIFIER_LENGTH,
        hash_collisions: false,
    };
}

impl Default for AbbreviateOptions {
    fn default() -> Self {
        Self::HASHED
    }
}

/// Shorten `ident` to at most `options.limit` bytes.
///
/// Identifiers within the limit are returned unchanged. Otherwise every
/// `_`-separated segment is cut to its first two characters, except a
/// leading role prefix (`fk`, `uk`, `idx`). If that is still too long the
/// result is either hashed (`{prefix}_{8 hex}` where the hash covers the
/// original identifier) or hard-truncated.
///
/// # Examples
/// ```ignore
/// let name = abbreviate("fk_people_contact_informations_primary_email_addresses_id", AbbreviateOptions::HASHED);
/// assert!(name.len() <= 63);
/// ```
pub fn abbreviate(ident: &str, options: AbbreviateOptions) -> String {
    if ident.len() <= options.limit {
        return ident.to_string();
    }

    let abbreviated = ident
        .split('_')
        .enumerate()
        .map(|(i, segment)| {
            if i == 0 && ROLE_PREFIXES.contains(&segment) {
                segment.to_string()
            } else {
                segment.chars().take(2).collect()
            }
        })
        .collect::<Vec<String>>()
        .join("_");

    if abbreviated.len() <= options.limit {
        return abbreviated;
    }

    if options.hash_collisions {
        let keep = options.limit.saturating_sub(HASH_LEN + 1);
        let mut result = truncate_bytes(&abbreviated, keep)
            .trim_end_matches('_')
            .to_string();
        result.push('_');
        result.push_str(&short_hash(ident));
        result
    } else {
        truncate_bytes(&abbreviated, options.limit).to_string()
    }
}

/// First eight hex characters of the SHA-256 digest of `value`.
pub fn short_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..HASH_LEN].to_string()
}

fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
