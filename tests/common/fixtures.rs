//! Item list, token and configuration fixtures for integration tests

use albion_prices::{Cell, Config};
use std::path::PathBuf;
use tempfile::TempDir;

/// Shorthand for a text cell in expected-row assertions
pub fn text(value: &str) -> Cell {
    Cell::from(value)
}

/// A single-record price response: ORE priced in Lymhurst
pub const ORE_IN_LYMHURST: &str =
    r#"[{"item_id":"ORE","city":"Lymhurst","sell_price_min":120,"buy_price_max":90}]"#;

/// Build a one-record response body for the given item and city
pub fn price_body(item_id: &str, city: &str, sell_price_min: i64, buy_price_max: i64) -> String {
    format!(
        r#"[{{"item_id":"{}","city":"{}","sell_price_min":{},"buy_price_max":{}}}]"#,
        item_id, city, sell_price_min, buy_price_max
    )
}

/// Write the two identifier list files into `dir`, one identifier per line
pub fn write_item_lists(
    dir: &TempDir,
    enchantable: &[&str],
    fixed: &[&str],
) -> (PathBuf, PathBuf) {
    let enchantable_path = dir.path().join("enchantableResources.txt");
    let fixed_path = dir.path().join("unenchantableItems.txt");

    std::fs::write(&enchantable_path, enchantable.join("\n"))
        .unwrap_or_else(|e| panic!("failed to write enchantable list: {e}"));
    std::fs::write(&fixed_path, fixed.join("\n"))
        .unwrap_or_else(|e| panic!("failed to write fixed list: {e}"));

    (enchantable_path, fixed_path)
}

/// Write a stored token file into `dir` and return its path
pub fn write_token(dir: &TempDir, access_token: &str) -> PathBuf {
    let path = dir.path().join("token.json");
    let contents = format!(r#"{{"access_token":"{}","token_type":"Bearer"}}"#, access_token);
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("failed to write token file: {e}"));
    path
}

/// Build a pipeline configuration pointing at a mock price API
///
/// Writes the identifier lists into `dir` (keep the temp dir alive for the
/// test duration) and leaves everything else at its default.
pub fn pipeline_config(
    api_base_url: &str,
    dir: &TempDir,
    enchantable: &[&str],
    fixed: &[&str],
) -> Config {
    let (enchantable_path, fixed_path) = write_item_lists(dir, enchantable, fixed);

    let mut config = Config::default();
    config.api.base_url = api_base_url.to_string();
    config.lists.enchantable_path = enchantable_path;
    config.lists.fixed_path = fixed_path;
    config
}

/// Point a configuration's publish destination at a mock Sheets API
pub fn with_sheets(config: &mut Config, sheets_base_url: &str, token_path: PathBuf) {
    config.sheets.api_base_url = sheets_base_url.to_string();
    config.sheets.spreadsheet_id = "sheet-1".to_string();
    config.sheets.token_path = token_path;
}
