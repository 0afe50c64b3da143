//! The assembled price table
//!
//! Rows are items, columns are (city, field) pairs. Both axes grow as
//! records are folded in: the first record naming an item appends its row,
//! the first record naming a city claims the next two header columns. Once
//! assigned, an index never moves.

use crate::error::{Error, Result};
use crate::types::{Cell, PriceRecord};
use std::collections::HashMap;
use tracing::debug;

/// Sparse grid of item prices per city
///
/// Layout:
/// - Row 0 is the header: one empty corner cell, then each city's name
///   twice (its sell-min and buy-max columns).
/// - Every later row starts with the item identifier; city `i`'s pair sits
///   at columns `1 + 2*i` (sell-min) and `2 + 2*i` (buy-max).
/// - Rows are padded with empty cells only as far as the data written so
///   far requires, so row lengths differ until every city has reported for
///   every item (which may never happen).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
    item_rows: HashMap<String, usize>,
    cities: Vec<String>,
}

impl Table {
    /// Create a table holding only the header corner cell
    pub fn new() -> Self {
        Self {
            rows: vec![vec![Cell::Empty]],
            item_rows: HashMap::new(),
            cities: Vec::new(),
        }
    }

    /// Parse one response body and fold its records into the table
    ///
    /// Returns the number of records folded. A body that is not a JSON list
    /// of price records fails with a parse error naming the batch, and the
    /// table keeps its previous contents.
    pub fn fold_response(&mut self, batch: usize, body: &[u8]) -> Result<usize> {
        let records: Vec<PriceRecord> =
            serde_json::from_slice(body).map_err(|source| Error::Parse { batch, source })?;

        let count = records.len();
        for record in records {
            self.insert(record);
        }
        debug!(batch, records = count, "folded response");

        Ok(count)
    }

    /// Fold one record into the table
    ///
    /// A record for an already-written (item, city) pair overwrites the
    /// earlier values.
    pub fn insert(&mut self, record: PriceRecord) {
        let PriceRecord {
            item_id,
            city,
            sell_price_min,
            buy_price_max,
        } = record;

        let row = match self.item_rows.get(&item_id) {
            Some(&row) => row,
            None => {
                let row = self.rows.len();
                self.rows.push(vec![Cell::Text(item_id.clone())]);
                self.item_rows.insert(item_id, row);
                row
            }
        };

        let city_index = match self.cities.iter().position(|known| *known == city) {
            Some(index) => index,
            None => {
                let index = self.cities.len();
                self.rows[0].push(Cell::Text(city.clone()));
                self.rows[0].push(Cell::Text(city.clone()));
                self.cities.push(city);
                index
            }
        };

        let column = 1 + city_index * 2;
        let row_cells = &mut self.rows[row];
        if row_cells.len() < column + 2 {
            row_cells.resize(column + 2, Cell::Empty);
        }
        row_cells[column] = Cell::Int(sell_price_min);
        row_cells[column + 1] = Cell::Int(buy_price_max);
    }

    /// The grid as written so far, header row first
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of distinct items observed
    pub fn item_count(&self) -> usize {
        self.rows.len() - 1
    }

    /// Number of distinct cities observed
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Consume the table, yielding the raw rows for publishing
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
