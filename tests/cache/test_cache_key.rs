// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Cache key layout shared with existing Redis deployments

use fabstir_embed_cache::cache::{build_cache_key, normalize_text, CACHE_KEY_LEN, CACHE_KEY_PREFIX};

#[test]
fn test_known_key_for_default_model() {
    assert_eq!(
        build_cache_key("sentence-transformers/all-MiniLM-L6-v2", "Shimano Twin Power"),
        "cache:6745643ae78b3e38f73447e254fc2a3df2b57d62"
    );
}

#[test]
fn test_spacing_and_case_share_a_key() {
    let model = "sentence-transformers/all-MiniLM-L6-v2";
    let expected = build_cache_key(model, "Shimano Twin Power");

    for variant in [
        "shimano twin power",
        "  SHIMANO   Twin\tPower ",
        "Shimano\nTwin\r\nPower",
        "Shimano\u{1f}Twin\u{1c}Power",
    ] {
        assert_eq!(build_cache_key(model, variant), expected, "variant {:?}", variant);
    }
}

#[test]
fn test_model_is_part_of_the_key() {
    assert_ne!(
        build_cache_key("model-a", "same text"),
        build_cache_key("model-b", "same text")
    );
}

#[test]
fn test_key_shape() {
    for text in ["", "a", "a much longer piece of text with Ünïcödé"] {
        let key = build_cache_key("m", text);
        assert!(key.starts_with(CACHE_KEY_PREFIX));
        assert_eq!(key.len(), CACHE_KEY_LEN);
        assert!(key[CACHE_KEY_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}

#[test]
fn test_normalize_text() {
    assert_eq!(normalize_text("  Hello \n World  "), "hello world");
    assert_eq!(normalize_text("   "), "");
}
