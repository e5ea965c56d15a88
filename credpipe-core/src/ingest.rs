//! Ingestion stage: paginated harvest, goal flattening, and credit
//! aggregation.
//!
//! The registry exposes no total count or next-cursor; the only
//! end-of-data signal is a page with zero records, so the fetcher
//! walks 1-based pages until one comes back empty (or the configured
//! page cap trips). Goal tags and credit summaries then widen each
//! project row into the flat raw table.

use tracing::{debug, info};

use crate::error::{Result, SchemaError, TransportError};
use crate::registry::{ProjectRecord, RegistrySource};
use crate::table::{Table, Value};

/// Scalar project attributes, in raw-table column order. Goal and
/// credit columns are appended after these as they are discovered.
const SCALAR_COLUMNS: &[&str] = &[
    "id",
    "gs_id",
    "name",
    "country_code",
    "size",
    "type",
    "status",
    "state",
    "methodology",
    "latitude",
    "longitude",
    "estimated_annual_credits",
    "sustaincert_id",
    "poa_project_id",
    "created_at",
    "updated_at",
    "crediting_period_start_date",
    "crediting_period_end_date",
];

// ── Paginated fetch ───────────────────────────────────────────

/// Walks the projects listing page by page, strictly in order.
pub struct PaginatedFetcher<'a> {
    source: &'a dyn RegistrySource,
    max_pages: u32,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(source: &'a dyn RegistrySource, max_pages: u32) -> Self {
        Self { source, max_pages }
    }

    /// Fetch every project, pages concatenated in request order.
    ///
    /// Terminates only on an empty page; `max_pages` non-empty pages
    /// without one is treated as a transport-level failure rather than
    /// an infinite loop.
    pub async fn fetch(&self, certified_only: bool) -> Result<Vec<ProjectRecord>> {
        let mut projects = Vec::new();
        let mut page = 1u32;

        loop {
            if page > self.max_pages {
                return Err(TransportError::PageLimitExceeded {
                    limit: self.max_pages,
                }
                .into());
            }

            let records = self.source.list_projects(page, certified_only).await?;
            if records.is_empty() {
                debug!(page, "empty page, pagination complete");
                break;
            }

            debug!(page, count = records.len(), "fetched projects page");
            projects.extend(records);
            page += 1;
        }

        info!(total = projects.len(), "registry project harvest complete");
        Ok(projects)
    }
}

// ── Goal flattening ───────────────────────────────────────────

/// Derive a column name from a goal label: the token before the first
/// colon, spaces replaced with underscores.
/// `"Goal 7: Affordable and Clean Energy"` becomes `Goal_7`.
pub fn goal_column_name(label: &str) -> String {
    let prefix = label.split(':').next().unwrap_or(label);
    prefix.replace(' ', "_")
}

/// Flattens fetched records into the raw table: one row per project,
/// scalar attributes plus one boolean column per goal label seen
/// anywhere in the batch.
pub struct GoalFlattener;

impl GoalFlattener {
    /// Two passes: discover the union of goal columns first so the
    /// schema is fixed before any row is populated, then fill rows.
    /// A (project, goal) pair that was observed gets `true`; every
    /// other goal cell stays `Null` for the cleaning stage to default
    /// to `false`.
    pub fn flatten(records: &[ProjectRecord]) -> Result<Table> {
        let mut table = Table::with_columns(SCALAR_COLUMNS.iter().copied());

        for record in records {
            for goal in &record.sustainable_development_goals {
                table.add_column(goal_column_name(&goal.name));
            }
        }

        for record in records {
            let row = table.push_row();
            table.set_named(row, "id", Value::Int(record.id))?;
            table.set_named(row, "gs_id", opt_str(&record.gs_id))?;
            table.set_named(row, "name", opt_str(&record.name))?;
            table.set_named(row, "country_code", opt_str(&record.country_code))?;
            table.set_named(row, "size", opt_str(&record.size))?;
            table.set_named(row, "type", opt_str(&record.project_type))?;
            table.set_named(row, "status", opt_str(&record.status))?;
            table.set_named(row, "state", opt_str(&record.state))?;
            table.set_named(row, "methodology", opt_str(&record.methodology))?;
            table.set_named(row, "latitude", opt_f64(record.latitude))?;
            table.set_named(row, "longitude", opt_f64(record.longitude))?;
            table.set_named(
                row,
                "estimated_annual_credits",
                opt_i64(record.estimated_annual_credits),
            )?;
            table.set_named(row, "sustaincert_id", opt_i64(record.sustaincert_id))?;
            table.set_named(row, "poa_project_id", opt_i64(record.poa_project_id))?;
            table.set_named(row, "created_at", opt_str(&record.created_at))?;
            table.set_named(row, "updated_at", opt_str(&record.updated_at))?;
            table.set_named(
                row,
                "crediting_period_start_date",
                opt_str(&record.crediting_period_start_date),
            )?;
            table.set_named(
                row,
                "crediting_period_end_date",
                opt_str(&record.crediting_period_end_date),
            )?;

            for goal in &record.sustainable_development_goals {
                table.set_named(row, &goal_column_name(&goal.name), Value::Bool(true))?;
            }
        }

        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "flattened projects into raw table"
        );
        Ok(table)
    }
}

fn opt_str(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::Str(s.clone()),
        None => Value::Null,
    }
}

fn opt_f64(value: Option<f64>) -> Value {
    value.map(Value::Float).unwrap_or(Value::Null)
}

fn opt_i64(value: Option<i64>) -> Value {
    value.map(Value::Int).unwrap_or(Value::Null)
}

// ── Credit aggregation ────────────────────────────────────────

/// Folds each project's (product, status) credit breakdown into
/// `VER_<status>_credits` columns on the raw table.
pub struct CreditAggregator<'a> {
    source: &'a dyn RegistrySource,
}

impl<'a> CreditAggregator<'a> {
    pub fn new(source: &'a dyn RegistrySource) -> Self {
        Self { source }
    }

    /// One summary request per row, in row order. Only `VER` product
    /// entries land in the table; a project with no VER entries keeps
    /// `Null` cells for the cleaning stage to zero-fill. The column
    /// set is the union of statuses observed across all projects.
    pub async fn augment(&self, table: &mut Table) -> Result<()> {
        let id_col = table
            .column_index("id")
            .ok_or_else(|| SchemaError::MissingColumn {
                column: "id".to_string(),
            })?;

        for row in table.row_indices() {
            let id = table.get(row, id_col).as_i64().ok_or_else(|| {
                SchemaError::TypeMismatch {
                    column: "id".to_string(),
                    row,
                    expected: "integer",
                    found: table.get(row, id_col).render(),
                }
            })?;

            let products = self.source.credit_summary(id).await?;
            for product in &products {
                if product.product != "VER" {
                    continue;
                }
                for entry in &product.summary {
                    let column = format!(
                        "{}_{}_credits",
                        product.product,
                        entry.status.to_lowercase()
                    );
                    let col = table.add_column(column);
                    table.set(row, col, Value::Float(entry.total));
                }
            }
        }

        info!(rows = table.num_rows(), "credit summaries merged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CredpipeError;
    use crate::registry::{CreditProduct, CreditStatusTotal, GoalEntry};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct FakeSource {
        pages: Vec<Vec<ProjectRecord>>,
        summaries: HashMap<i64, Vec<CreditProduct>>,
        endless: bool,
    }

    impl FakeSource {
        fn with_pages(pages: Vec<Vec<ProjectRecord>>) -> Self {
            Self {
                pages,
                summaries: HashMap::new(),
                endless: false,
            }
        }
    }

    #[async_trait]
    impl RegistrySource for FakeSource {
        async fn list_projects(
            &self,
            page: u32,
            _certified_only: bool,
        ) -> Result<Vec<ProjectRecord>> {
            if self.endless {
                return Ok(vec![project(page as i64, &[])]);
            }
            Ok(self
                .pages
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_default())
        }

        async fn credit_summary(&self, project_id: i64) -> Result<Vec<CreditProduct>> {
            Ok(self.summaries.get(&project_id).cloned().unwrap_or_default())
        }
    }

    fn project(id: i64, goals: &[&str]) -> ProjectRecord {
        ProjectRecord {
            id,
            sustainable_development_goals: goals
                .iter()
                .map(|name| GoalEntry {
                    name: (*name).to_string(),
                })
                .collect(),
            ..ProjectRecord::default()
        }
    }

    fn ver_summary(entries: &[(&str, f64)]) -> Vec<CreditProduct> {
        vec![CreditProduct {
            product: "VER".to_string(),
            summary: entries
                .iter()
                .map(|(status, total)| CreditStatusTotal {
                    status: (*status).to_string(),
                    total: *total,
                })
                .collect(),
        }]
    }

    #[tokio::test]
    async fn fetch_concatenates_pages_until_empty() {
        let source = FakeSource::with_pages(vec![
            vec![project(1, &[]), project(2, &[])],
            vec![project(3, &[])],
            vec![],
        ]);
        let fetched = PaginatedFetcher::new(&source, 100).fetch(true).await.unwrap();
        let ids: Vec<i64> = fetched.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fetch_of_empty_registry_is_empty() {
        let source = FakeSource::with_pages(vec![vec![]]);
        let fetched = PaginatedFetcher::new(&source, 100).fetch(false).await.unwrap();
        assert!(fetched.is_empty());
    }

    #[tokio::test]
    async fn endless_listing_trips_the_page_cap() {
        let mut source = FakeSource::with_pages(vec![]);
        source.endless = true;
        let err = PaginatedFetcher::new(&source, 3).fetch(true).await.unwrap_err();
        assert!(matches!(
            err,
            CredpipeError::Transport(TransportError::PageLimitExceeded { limit: 3 })
        ));
    }

    #[test]
    fn goal_column_name_takes_colon_prefix() {
        assert_eq!(
            goal_column_name("Goal 7: Affordable and Clean Energy"),
            "Goal_7"
        );
        assert_eq!(goal_column_name("Goal 13: Climate Action"), "Goal_13");
        // No colon: the whole label, underscored.
        assert_eq!(goal_column_name("Climate Action"), "Climate_Action");
    }

    #[test]
    fn flatten_builds_union_of_goal_columns() {
        let records = vec![
            project(1, &["Goal 7: Affordable and Clean Energy"]),
            project(2, &["Goal 13: Climate Action", "Goal 7: Affordable and Clean Energy"]),
            project(3, &[]),
        ];
        let table = GoalFlattener::flatten(&records).unwrap();

        assert!(table.has_column("Goal_7"));
        assert!(table.has_column("Goal_13"));
        assert_eq!(table.num_rows(), 3);

        assert_eq!(table.get_named(0, "Goal_7"), &Value::Bool(true));
        assert_eq!(table.get_named(0, "Goal_13"), &Value::Null);
        assert_eq!(table.get_named(1, "Goal_7"), &Value::Bool(true));
        assert_eq!(table.get_named(1, "Goal_13"), &Value::Bool(true));
        assert_eq!(table.get_named(2, "Goal_7"), &Value::Null);
    }

    #[test]
    fn flatten_carries_scalar_attributes() {
        let mut record = project(42, &[]);
        record.country_code = Some("KE".to_string());
        record.project_type = Some("Energy - Wind".to_string());
        record.latitude = Some(-1.29);
        record.sustaincert_id = Some(9_000_000_001);

        let table = GoalFlattener::flatten(&[record]).unwrap();
        assert_eq!(table.get_named(0, "id"), &Value::Int(42));
        assert_eq!(table.get_named(0, "country_code"), &Value::from("KE"));
        assert_eq!(table.get_named(0, "type"), &Value::from("Energy - Wind"));
        assert_eq!(table.get_named(0, "latitude"), &Value::Float(-1.29));
        // Large identifiers stay integral.
        assert_eq!(
            table.get_named(0, "sustaincert_id"),
            &Value::Int(9_000_000_001)
        );
        assert_eq!(table.get_named(0, "size"), &Value::Null);
    }

    #[tokio::test]
    async fn augment_folds_only_ver_products() {
        let mut source = FakeSource::with_pages(vec![]);
        source
            .summaries
            .insert(1, ver_summary(&[("Issued", 100.0), ("Retired", 40.0)]));
        source.summaries.insert(
            2,
            vec![CreditProduct {
                product: "PlanVivo".to_string(),
                summary: vec![CreditStatusTotal {
                    status: "Issued".to_string(),
                    total: 7.0,
                }],
            }],
        );

        let mut table = GoalFlattener::flatten(&[project(1, &[]), project(2, &[])]).unwrap();
        CreditAggregator::new(&source).augment(&mut table).await.unwrap();

        assert_eq!(
            table.get_named(0, "VER_issued_credits"),
            &Value::Float(100.0)
        );
        assert_eq!(
            table.get_named(0, "VER_retired_credits"),
            &Value::Float(40.0)
        );
        // Non-VER products contribute no columns for their rows.
        assert_eq!(table.get_named(1, "VER_issued_credits"), &Value::Null);
        assert!(!table.has_column("PlanVivo_issued_credits"));
    }

    #[tokio::test]
    async fn augment_without_any_ver_entries_adds_no_columns() {
        let source = FakeSource::with_pages(vec![]);
        let mut table = GoalFlattener::flatten(&[project(5, &[])]).unwrap();
        let before = table.num_columns();
        CreditAggregator::new(&source).augment(&mut table).await.unwrap();
        assert_eq!(table.num_columns(), before);
    }
}
