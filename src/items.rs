//! Item identifier lists and enchantment expansion
//!
//! Two newline-separated list files drive a run: enchantable resource base
//! names, each expanded into four identifiers (the base plus one per
//! enchantment level), and fixed item names taken verbatim. The expanded
//! enchantable sequence always precedes the fixed sequence.

use crate::config::ListsConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Suffixes appended to an enchantable base name, one per enchantment level
pub const ENCHANTMENT_SUFFIXES: [&str; 3] = ["_LEVEL1@1", "_LEVEL2@2", "_LEVEL3@3"];

/// Expand one enchantable base name into itself plus its three enchantment
/// variants, in level order
///
/// # Examples
///
/// ```
/// use albion_prices::items::expand_enchantable;
///
/// let variants = expand_enchantable("T4_ORE");
/// assert_eq!(
///     variants,
///     ["T4_ORE", "T4_ORE_LEVEL1@1", "T4_ORE_LEVEL2@2", "T4_ORE_LEVEL3@3"]
/// );
/// ```
pub fn expand_enchantable(base: &str) -> [String; 4] {
    [
        base.to_string(),
        format!("{base}{}", ENCHANTMENT_SUFFIXES[0]),
        format!("{base}{}", ENCHANTMENT_SUFFIXES[1]),
        format!("{base}{}", ENCHANTMENT_SUFFIXES[2]),
    ]
}

/// Read one newline-separated item list file
///
/// Lines are trimmed of surrounding whitespace; blank lines are skipped.
/// An unreadable file is a fatal list error naming the path.
pub fn read_item_list(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|source| Error::ItemList {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Load both configured lists and produce the full identifier sequence
///
/// Order is fixed: for each enchantable base name, the base followed by its
/// three variants; then every fixed name, verbatim. Both lists keep their
/// file order.
pub fn item_names(config: &ListsConfig) -> Result<Vec<String>> {
    let enchantable = read_item_list(&config.enchantable_path)?;
    let fixed = read_item_list(&config.fixed_path)?;
    let fixed_count = fixed.len();

    let mut names = Vec::with_capacity(enchantable.len() * 4 + fixed_count);
    for base in &enchantable {
        names.extend(expand_enchantable(base));
    }
    names.extend(fixed);

    info!(
        enchantable = enchantable.len(),
        fixed = fixed_count,
        total = names.len(),
        "item identifiers loaded"
    );

    Ok(names)
}
