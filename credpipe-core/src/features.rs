//! Transformation stage: derived features over the cleaned table.
//!
//! Appends crediting-period duration, percentage-sold metrics, the
//! continent name, and the sector/type decomposition. Existing columns
//! are never removed; `type` is rewritten in place by the split after
//! `sector` has been read from the original value.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::continent::continent_name;
use crate::error::{ComputationError, Result};
use crate::table::{Table, Value};

/// Scale qualifier the source taxonomy overloads as a `type` prefix
/// that is not itself a sector or type value.
const SMALL_LOW_PREFIX: &str = "Small, Low";

pub struct FeatureDeriver;

impl FeatureDeriver {
    /// Derive all features using the current date for the
    /// crediting-period clamp.
    pub fn derive(cleaned: &Table) -> Result<Table> {
        Self::derive_with_today(cleaned, Utc::now().date_naive())
    }

    /// Crediting-day policy: clamp-to-today. A crediting period whose
    /// declared end date lies in the future is counted as running
    /// until `today`; an elapsed period uses its declared span. A
    /// period that has not started yet therefore yields a negative
    /// span, which the percentage guard's callers carry through
    /// unchanged rather than masking as missing data.
    pub fn derive_with_today(cleaned: &Table, today: NaiveDate) -> Result<Table> {
        let mut table = cleaned.clone();

        let days_col = table.add_column("crediting_days");
        for row in table.row_indices() {
            let start = parse_date(table.get_named(row, "crediting_period_start_date"));
            let end = parse_date(table.get_named(row, "crediting_period_end_date"));
            let days = match (start, end) {
                (Some(start), Some(end)) => {
                    let effective_end = if end > today { today } else { end };
                    Value::Int((effective_end - start).num_days())
                }
                _ => Value::Null,
            };
            table.set(row, days_col, days);
        }

        let sold_col = table.add_column("VER_sold_percentage");
        for row in table.row_indices() {
            let retired = table.f64_or(row, "VER_retired_credits", 0.0)?;
            let issued = table.f64_or(row, "VER_issued_credits", 0.0)?;
            table.set(row, sold_col, Value::Float(percentage(retired, issued)));
        }

        let per_day_col = table.add_column("VER_sold_percentage_per_day");
        for row in table.row_indices() {
            let sold = table.f64_or(row, "VER_sold_percentage", 0.0)?;
            let days = table.f64_or(row, "crediting_days", 0.0)?;
            table.set(row, per_day_col, Value::Float(percentage(sold, days)));
        }

        let continent_col = table.add_column("continent_code");
        for row in table.row_indices() {
            let value = match table.get_named(row, "country_code") {
                Value::Str(code) => match continent_name(code) {
                    Some(continent) => Value::from(continent),
                    None => {
                        let id = table.get_named(row, "id").as_i64().unwrap_or(-1);
                        return Err(ComputationError::UnknownCountry {
                            code: code.clone(),
                            id,
                        }
                        .into());
                    }
                },
                _ => Value::Null,
            };
            table.set(row, continent_col, value);
        }

        // `sector` reads the original `type` value, so it is written
        // before `type` is rewritten.
        let sector_col = table.add_column("sector");
        let type_col =
            table
                .column_index("type")
                .ok_or_else(|| crate::error::SchemaError::MissingColumn {
                    column: "type".to_string(),
                })?;
        for row in table.row_indices() {
            let (sector, new_type) = match table.get(row, type_col) {
                Value::Str(project_type) => {
                    let (sector, ty) = split_type(project_type);
                    (Value::Str(sector), Value::Str(ty))
                }
                _ => (Value::Null, Value::Null),
            };
            table.set(row, sector_col, sector);
            table.set(row, type_col, new_type);
        }

        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "feature derivation complete"
        );
        Ok(table)
    }
}

/// Ratio as a percentage, with a divide-by-zero guard: a zero operand
/// on either side yields `0`. A genuinely zero numerator over a
/// nonzero denominator shares the guard and is also `0`.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if numerator == 0.0 || denominator == 0.0 {
        return 0.0;
    }
    (numerator / denominator) * 100.0
}

/// Split a registry `type` value on `" - "` into (sector, type).
///
/// Without the delimiter both halves are the original string. When the
/// first part is the `"Small, Low"` scale qualifier, the sector is
/// forced to `"Electricity"` and the type takes the second part.
fn split_type(project_type: &str) -> (String, String) {
    let mut parts = project_type.splitn(2, " - ");
    let first = parts.next().unwrap_or(project_type);
    let second = parts.next();

    let sector = match second {
        None => project_type.to_string(),
        Some(_) if first == SMALL_LOW_PREFIX => "Electricity".to_string(),
        Some(second) => second.to_string(),
    };
    let ty = match second {
        Some(second) if first == SMALL_LOW_PREFIX => second.to_string(),
        _ => first.to_string(),
    };
    (sector, ty)
}

/// Parse a registry date cell: RFC 3339 timestamp or plain
/// `YYYY-MM-DD`. Anything else is `None`.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CredpipeError;
    use pretty_assertions::assert_eq;

    fn cleaned_row(
        country: &str,
        project_type: &str,
        issued: f64,
        retired: f64,
        start: &str,
        end: &str,
    ) -> Table {
        let mut table = Table::with_columns([
            "id",
            "country_code",
            "type",
            "VER_issued_credits",
            "VER_retired_credits",
            "crediting_period_start_date",
            "crediting_period_end_date",
        ]);
        let row = table.push_row();
        table.set_named(row, "id", Value::Int(1)).unwrap();
        table.set_named(row, "country_code", Value::from(country)).unwrap();
        table.set_named(row, "type", Value::from(project_type)).unwrap();
        table
            .set_named(row, "VER_issued_credits", Value::Float(issued))
            .unwrap();
        table
            .set_named(row, "VER_retired_credits", Value::Float(retired))
            .unwrap();
        table
            .set_named(row, "crediting_period_start_date", Value::from(start))
            .unwrap();
        table
            .set_named(row, "crediting_period_end_date", Value::from(end))
            .unwrap();
        table
    }

    #[test]
    fn percentage_guards_zero_operands() {
        assert_eq!(percentage(0.0, 50.0), 0.0);
        assert_eq!(percentage(50.0, 0.0), 0.0);
        assert_eq!(percentage(25.0, 50.0), 50.0);
    }

    #[test]
    fn split_handles_plain_sector_type_pairs() {
        assert_eq!(
            split_type("Energy - Wind"),
            ("Wind".to_string(), "Energy".to_string())
        );
    }

    #[test]
    fn split_small_low_prefix_forces_electricity_sector() {
        assert_eq!(
            split_type("Small, Low - Biogas"),
            ("Electricity".to_string(), "Biogas".to_string())
        );
    }

    #[test]
    fn split_without_delimiter_passes_through() {
        assert_eq!(
            split_type("SoloValue"),
            ("SoloValue".to_string(), "SoloValue".to_string())
        );
    }

    #[test]
    fn crediting_days_use_declared_span_for_elapsed_periods() {
        let table = cleaned_row(
            "US",
            "Energy - Wind",
            100.0,
            50.0,
            "2015-01-01",
            "2015-01-31",
        );
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let derived = FeatureDeriver::derive_with_today(&table, today).unwrap();
        assert_eq!(derived.get_named(0, "crediting_days"), &Value::Int(30));
    }

    #[test]
    fn crediting_days_clamp_future_end_dates_to_today() {
        let table = cleaned_row(
            "US",
            "Energy - Wind",
            100.0,
            50.0,
            "2024-01-01",
            "2030-01-01",
        );
        let today = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        let derived = FeatureDeriver::derive_with_today(&table, today).unwrap();
        assert_eq!(derived.get_named(0, "crediting_days"), &Value::Int(10));
    }

    #[test]
    fn crediting_days_are_negative_for_unstarted_periods() {
        let table = cleaned_row(
            "US",
            "Energy - Wind",
            100.0,
            50.0,
            "2030-01-01",
            "2031-01-01",
        );
        let today = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        let derived = FeatureDeriver::derive_with_today(&table, today).unwrap();
        // End clamps to today while the start stays in the future.
        let days = derived
            .get_named(0, "crediting_days")
            .as_i64()
            .unwrap();
        assert!(days < 0);
        // The negative span flows into the per-day metric unchanged.
        let per_day = derived
            .get_named(0, "VER_sold_percentage_per_day")
            .as_f64()
            .unwrap();
        assert!(per_day < 0.0);
    }

    #[test]
    fn crediting_days_accept_rfc3339_timestamps() {
        let table = cleaned_row(
            "US",
            "Energy - Wind",
            1.0,
            1.0,
            "2020-01-01T00:00:00Z",
            "2020-01-11T00:00:00Z",
        );
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let derived = FeatureDeriver::derive_with_today(&table, today).unwrap();
        assert_eq!(derived.get_named(0, "crediting_days"), &Value::Int(10));
    }

    #[test]
    fn missing_dates_leave_crediting_days_null() {
        let mut table = cleaned_row("US", "Energy - Wind", 1.0, 1.0, "", "");
        let row = 0;
        table
            .set_named(row, "crediting_period_start_date", Value::Null)
            .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let derived = FeatureDeriver::derive_with_today(&table, today).unwrap();
        assert_eq!(derived.get_named(0, "crediting_days"), &Value::Null);
        // Null crediting days read as zero, so the per-day metric
        // falls into the percentage guard.
        assert_eq!(
            derived.get_named(0, "VER_sold_percentage_per_day"),
            &Value::Float(0.0)
        );
    }

    #[test]
    fn sold_percentage_and_per_day_metrics() {
        let table = cleaned_row(
            "KE",
            "Energy - Wind",
            200.0,
            50.0,
            "2015-01-01",
            "2015-01-31",
        );
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let derived = FeatureDeriver::derive_with_today(&table, today).unwrap();
        assert_eq!(
            derived.get_named(0, "VER_sold_percentage"),
            &Value::Float(25.0)
        );
        // 25% over 30 days.
        let per_day = derived
            .get_named(0, "VER_sold_percentage_per_day")
            .as_f64()
            .unwrap();
        assert!((per_day - 83.33333333333334).abs() < 1e-9);
    }

    #[test]
    fn continent_resolves_from_country_code() {
        let table = cleaned_row("TP", "Energy - Wind", 0.0, 0.0, "", "");
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let derived = FeatureDeriver::derive_with_today(&table, today).unwrap();
        assert_eq!(derived.get_named(0, "continent_code"), &Value::from("Asia"));
    }

    #[test]
    fn unmapped_country_code_is_a_computation_error() {
        let table = cleaned_row("ZZ", "Energy - Wind", 0.0, 0.0, "", "");
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = FeatureDeriver::derive_with_today(&table, today).unwrap_err();
        assert!(matches!(
            err,
            CredpipeError::Computation(ComputationError::UnknownCountry { .. })
        ));
    }

    #[test]
    fn existing_columns_survive_derivation() {
        let table = cleaned_row("US", "Energy - Wind", 1.0, 1.0, "", "");
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let derived = FeatureDeriver::derive_with_today(&table, today).unwrap();
        for column in table.columns() {
            assert!(derived.has_column(column), "lost column {column}");
        }
        assert_eq!(derived.get_named(0, "sector"), &Value::from("Wind"));
        assert_eq!(derived.get_named(0, "type"), &Value::from("Energy"));
    }
}
