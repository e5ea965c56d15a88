//! In-memory tabular artifact passed between pipeline stages.
//!
//! A [`Table`] is an ordered set of named columns over rows of
//! dynamically typed [`Value`] cells. Columns can be added after
//! construction (goal and credit columns are discovered from the data),
//! in which case existing rows backfill `Null`. Stages consume a table
//! and return a new one; nothing mutates an artifact after handoff.

use std::collections::HashMap;

use crate::error::SchemaError;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view: `Int` widens to `f64`, everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Cell rendering used by the CSV artifact writer. `Null` is the
    /// empty string so it survives a round trip as `Null`.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Ordered columns over rows of [`Value`] cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an empty table with a fixed initial column order.
    pub fn with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for name in names {
            table.add_column(name.into());
        }
        table
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Add a column if absent, backfilling `Null` for existing rows.
    /// Returns the column's index either way.
    pub fn add_column(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.columns.len();
        self.index.insert(name.clone(), idx);
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        idx
    }

    /// Remove a column from the schema and from every row.
    pub fn drop_column(&mut self, name: &str) -> Result<(), SchemaError> {
        let idx = self.column_index(name).ok_or_else(|| SchemaError::MissingColumn {
            column: name.to_string(),
        })?;
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        self.index = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Ok(())
    }

    /// Append an all-`Null` row and return its index.
    pub fn push_row(&mut self) -> usize {
        self.rows.push(vec![Value::Null; self.columns.len()]);
        self.rows.len() - 1
    }

    pub fn set(&mut self, row: usize, col: usize, value: Value) {
        self.rows[row][col] = value;
    }

    /// Set a cell by column name. The column must already exist.
    pub fn set_named(
        &mut self,
        row: usize,
        name: &str,
        value: Value,
    ) -> Result<(), SchemaError> {
        let idx = self.column_index(name).ok_or_else(|| SchemaError::MissingColumn {
            column: name.to_string(),
        })?;
        self.rows[row][idx] = value;
        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> &Value {
        &self.rows[row][col]
    }

    /// Cell lookup by column name; `Null` for a column the table does
    /// not have (used by stages probing optional columns).
    pub fn get_named(&self, row: usize, name: &str) -> &Value {
        match self.column_index(name) {
            Some(idx) => &self.rows[row][idx],
            None => &Value::Null,
        }
    }

    /// Numeric cell under a required column, with `Null` read as the
    /// caller-supplied default.
    pub fn f64_or(
        &self,
        row: usize,
        name: &str,
        default: f64,
    ) -> Result<f64, SchemaError> {
        let idx = self.column_index(name).ok_or_else(|| SchemaError::MissingColumn {
            column: name.to_string(),
        })?;
        match &self.rows[row][idx] {
            Value::Null => Ok(default),
            v => v.as_f64().ok_or_else(|| SchemaError::TypeMismatch {
                column: name.to_string(),
                row,
                expected: "numeric",
                found: v.render(),
            }),
        }
    }

    /// Replace every `Null` cell in a column with `value`.
    pub fn fill_null(&mut self, name: &str, value: Value) -> Result<(), SchemaError> {
        let idx = self.column_index(name).ok_or_else(|| SchemaError::MissingColumn {
            column: name.to_string(),
        })?;
        for row in &mut self.rows {
            if row[idx].is_null() {
                row[idx] = value.clone();
            }
        }
        Ok(())
    }

    /// Exact-match string substitution over a column. Non-string and
    /// unmatched cells pass through unchanged.
    pub fn replace_in_column(
        &mut self,
        name: &str,
        substitutions: &[(&str, &str)],
    ) -> Result<(), SchemaError> {
        let idx = self.column_index(name).ok_or_else(|| SchemaError::MissingColumn {
            column: name.to_string(),
        })?;
        for row in &mut self.rows {
            if let Value::Str(s) = &row[idx]
                && let Some((_, to)) = substitutions.iter().find(|(from, _)| *from == s.as_str())
            {
                row[idx] = Value::Str((*to).to_string());
            }
        }
        Ok(())
    }

    /// Row indices, in stable order.
    pub fn row_indices(&self) -> std::ops::Range<usize> {
        0..self.rows.len()
    }
}
