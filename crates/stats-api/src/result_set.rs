//! Tabular `resultSets` payloads returned by the stats API.
//!
//! Every endpoint answers with one or more tables of the form
//! `{"name": .., "headers": [..], "rowSet": [[..], ..]}`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, StatsApiError};
use crate::parse::{parse_float, parse_i64, parse_int, parse_string};

/// Top-level response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    pub result_sets: Vec<ResultSet>,
}

impl StatsResponse {
    /// The first result set, which carries the primary table for every
    /// endpoint this crate calls.
    #[must_use]
    pub fn into_primary(self) -> Option<ResultSet> {
        self.result_sets.into_iter().next()
    }
}

/// One table from a response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.row_set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_set.is_empty()
    }

    /// Position of a column, matched case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Like [`ResultSet::column`], but a missing column is an error.
    ///
    /// # Errors
    /// Returns `MissingColumn` listing the available headers.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| StatsApiError::MissingColumn {
            result_set: self.name.clone(),
            column: name.to_string(),
            available: self.headers.join(", "),
        })
    }

    /// Iterates rows in response order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.row_set.iter().enumerate().map(|(index, values)| Row {
            index,
            table: self,
            values,
        })
    }
}

/// A borrowed row with column lookup by header name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    table: &'a ResultSet,
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Position of this row within the full response.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw cell. Short rows yield `None` for trailing columns.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.table.column(column).and_then(|i| self.values.get(i))
    }

    #[must_use]
    pub fn int(&self, column: &str) -> Option<i32> {
        parse_int(self.get(column))
    }

    #[must_use]
    pub fn i64(&self, column: &str) -> Option<i64> {
        parse_i64(self.get(column))
    }

    #[must_use]
    pub fn float(&self, column: &str) -> Option<f64> {
        parse_float(self.get(column))
    }

    #[must_use]
    pub fn string(&self, column: &str) -> Option<String> {
        parse_string(self.get(column))
    }

    /// True if the cell is absent or JSON null.
    #[must_use]
    pub fn is_null(&self, column: &str) -> bool {
        matches!(self.get(column), None | Some(Value::Null))
    }
}
