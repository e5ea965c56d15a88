//! Cleaning stage: schema normalization over the raw merged table.
//!
//! Rules run in a fixed order because later rules read earlier rules'
//! output (the clamp in rule 6 requires the zero-fill of rule 2).
//! `clean` is a pure transform and a fixed point: applying it to its
//! own output changes nothing.

use tracing::info;

use crate::error::Result;
use crate::table::{Table, Value};

/// Exact-match typo corrections for the `size` field.
const SIZE_FIXES: &[(&str, &str)] = &[
    ("Micro scale", "Micro Scale"),
    ("Microscale", "Micro Scale"),
    ("Large scale", "Large Scale"),
];

/// Country-code remapping. `XZ` marks international waters and is
/// folded into `US`; `TL` (Timor-Leste) is mapped back to the legacy
/// `TP` code the continent table resolves.
const COUNTRY_FIXES: &[(&str, &str)] = &[("XZ", "US"), ("TL", "TP")];

/// Administrative columns with no analytical relevance.
const DROPPED_COLUMNS: &[&str] = &["status", "state"];

pub struct Cleaner;

impl Cleaner {
    /// Apply every cleaning rule, returning a new table. Row count and
    /// `id` identity are preserved; only cell values and the column
    /// set change.
    pub fn clean(raw: &Table) -> Result<Table> {
        let mut table = raw.clone();

        // 1. Unobserved goal cells become explicit `false`.
        let goal_columns: Vec<String> = table
            .columns()
            .iter()
            .filter(|c| c.starts_with("Goal_"))
            .cloned()
            .collect();
        for column in &goal_columns {
            table.fill_null(column, Value::Bool(false))?;
        }

        // 2. Credit columns default to zero, created when the harvest
        //    saw no VER entries at all.
        for column in ["VER_issued_credits", "VER_retired_credits"] {
            table.add_column(column);
            table.fill_null(column, Value::Float(0.0))?;
        }

        // 3. Drop administrative columns. Absence is fine so the
        //    cleaner stays a fixed point on its own output.
        for column in DROPPED_COLUMNS {
            if table.has_column(column) {
                table.drop_column(column)?;
            }
        }

        // 4. Categorical typo correction.
        if table.has_column("size") {
            table.replace_in_column("size", SIZE_FIXES)?;
        }

        // 5. Country-code remapping.
        if table.has_column("country_code") {
            table.replace_in_column("country_code", COUNTRY_FIXES)?;
        }

        // 6. Retired credits can never exceed issued credits; excess
        //    is a registry data artifact and is clamped down.
        for row in table.row_indices() {
            let issued = table.f64_or(row, "VER_issued_credits", 0.0)?;
            let retired = table.f64_or(row, "VER_retired_credits", 0.0)?;
            if retired > issued {
                table.set_named(row, "VER_retired_credits", Value::Float(issued))?;
            }
        }

        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "cleaning complete"
        );
        Ok(table)
    }
}
