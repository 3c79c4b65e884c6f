// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cache key derivation for the external embedding store
//!
//! Keys are `"cache:" + sha1_hex("embedding::{model}::{normalized_text}")`.
//! The layout is shared with earlier deployments writing to the same store,
//! so existing entries stay addressable.

use sha1::{Digest, Sha1};

/// Prefix of every key written to the external store
pub const CACHE_KEY_PREFIX: &str = "cache:";

/// Length of a cache key: prefix plus 40 hex characters of SHA-1
pub const CACHE_KEY_LEN: usize = CACHE_KEY_PREFIX.len() + 40;

/// Whitespace as understood by existing key writers: Unicode `White_Space`
/// plus the ASCII information separators U+001C..=U+001F
fn is_key_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Normalizes text for key derivation
///
/// Lowercases, trims and collapses whitespace runs to a single space.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    lowered
        .split(is_key_whitespace)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the store key for a (model, text) pair
///
/// # Example
/// ```
/// use fabstir_embed_cache::cache::build_cache_key;
///
/// let a = build_cache_key("all-MiniLM-L6-v2", "  Hello   World ");
/// let b = build_cache_key("all-MiniLM-L6-v2", "hello world");
/// assert_eq!(a, b);
/// ```
pub fn build_cache_key(model: &str, text: &str) -> String {
    let normalized = normalize_text(text);

    let mut hasher = Sha1::new();
    hasher.update(b"embedding::");
    hasher.update(model.as_bytes());
    hasher.update(b"::");
    hasher.update(normalized.as_bytes());

    format!("{}{}", CACHE_KEY_PREFIX, hex::encode(hasher.finalize()))
}
