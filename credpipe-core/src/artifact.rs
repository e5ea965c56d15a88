//! Stage-boundary artifact IO.
//!
//! Artifacts are CSV files with a header row. Writes go to a `.tmp`
//! sibling and are renamed into place so a failed run never leaves a
//! half-written file looking complete. Reads parse cells under a
//! declared column-type schema; the explicit integer typing keeps
//! large identifiers from being coerced into approximate floats.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::table::{Table, Value};

/// Cell type a schema declares for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Str,
}

/// Declared column types for reading an artifact back from CSV.
///
/// Exact column names take precedence; prefix rules cover the columns
/// whose names are discovered from the data (`Goal_*`, `VER_*`).
/// Undeclared columns read as strings.
pub struct Schema {
    declared: Vec<(&'static str, ColumnType)>,
    prefixes: Vec<(&'static str, ColumnType)>,
}

impl Schema {
    /// Schema shared by the raw, cleaned, and transformed project
    /// tables. Identifier columns are 64-bit integers, nullable via
    /// empty cells.
    pub fn project_table() -> Self {
        Self {
            declared: vec![
                ("id", ColumnType::Int),
                ("estimated_annual_credits", ColumnType::Int),
                ("sustaincert_id", ColumnType::Int),
                ("poa_project_id", ColumnType::Int),
                ("crediting_days", ColumnType::Int),
                ("latitude", ColumnType::Float),
                ("longitude", ColumnType::Float),
            ],
            prefixes: vec![("Goal_", ColumnType::Bool), ("VER_", ColumnType::Float)],
        }
    }

    fn type_of(&self, column: &str) -> ColumnType {
        if let Some((_, ty)) = self.declared.iter().find(|(name, _)| *name == column) {
            return *ty;
        }
        if let Some((_, ty)) = self
            .prefixes
            .iter()
            .find(|(prefix, _)| column.starts_with(prefix))
        {
            return *ty;
        }
        ColumnType::Str
    }
}

/// Write a table as CSV, atomically: parent directories are created,
/// the body goes to a `.tmp` sibling, then a rename publishes it.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp_path).map_err(SchemaError::from)?;
        writer
            .write_record(table.columns())
            .map_err(SchemaError::from)?;
        for row in table.row_indices() {
            let record: Vec<String> = (0..table.num_columns())
                .map(|col| table.get(row, col).render())
                .collect();
            writer.write_record(&record).map_err(SchemaError::from)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    debug!(path = %path.display(), rows = table.num_rows(), "artifact written");
    Ok(())
}

/// Read a CSV artifact under a declared schema. Empty cells are
/// `Null`; a non-empty cell that fails its declared type is a schema
/// error naming the column and row.
pub fn read_table(path: &Path, schema: &Schema) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).map_err(SchemaError::from)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(SchemaError::from)?
        .iter()
        .map(str::to_string)
        .collect();
    let types: Vec<ColumnType> = headers.iter().map(|h| schema.type_of(h)).collect();

    let mut table = Table::with_columns(headers.iter().cloned());
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(SchemaError::from)?;
        let row = table.push_row();
        for (col, cell) in record.iter().enumerate() {
            let value = parse_cell(cell, types[col]).map_err(|found| {
                SchemaError::TypeMismatch {
                    column: headers[col].clone(),
                    row: row_idx,
                    expected: type_label(types[col]),
                    found,
                }
            })?;
            table.set(row, col, value);
        }
    }

    debug!(path = %path.display(), rows = table.num_rows(), "artifact read");
    Ok(table)
}

fn type_label(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Int => "integer",
        ColumnType::Float => "float",
        ColumnType::Bool => "boolean",
        ColumnType::Str => "string",
    }
}

fn parse_cell(cell: &str, ty: ColumnType) -> std::result::Result<Value, String> {
    if cell.is_empty() {
        return Ok(Value::Null);
    }
    match ty {
        ColumnType::Int => cell
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| cell.to_string()),
        ColumnType::Float => cell
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| cell.to_string()),
        ColumnType::Bool => match cell {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            other => Err(other.to_string()),
        },
        ColumnType::Str => Ok(Value::Str(cell.to_string())),
    }
}
