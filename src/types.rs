//! Core types for albion-prices

use serde::{Deserialize, Serialize, Serializer};

/// One cell of the assembled table
///
/// Serializes as a blank string, a JSON string, or a JSON number, which is
/// exactly what the spreadsheet API expects for empty, label, and price
/// cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// An unset cell (reserved first column, padding, header corner)
    Empty,
    /// A label cell (item identifier or city name)
    Text(String),
    /// A price cell
    Int(i64),
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Empty => serializer.serialize_str(""),
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Int(value) => serializer.serialize_i64(*value),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

/// One (item, city) price observation parsed from a response body
///
/// A price of 0 means the market had no data for that side of the book.
/// Unknown fields in the response are ignored; a type-mismatched field fails
/// the whole response.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PriceRecord {
    /// Identifier of the observed item
    pub item_id: String,
    /// City the observation belongs to
    pub city: String,
    /// Lowest current sell order price, 0 when absent
    #[serde(default)]
    pub sell_price_min: i64,
    /// Highest current buy order price, 0 when absent
    #[serde(default)]
    pub buy_price_max: i64,
}
