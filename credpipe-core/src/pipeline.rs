//! End-to-end orchestration of the harvest pipeline.
//!
//! Stages run strictly in sequence: paginated fetch, goal flattening,
//! credit aggregation, raw persist, clean, cleaned persist, feature
//! derivation, transformed persist. Any stage failure aborts the run
//! wrapped with the stage name; later artifacts are never published.

use tracing::info;

use crate::artifact::{Schema, read_table, write_table};
use crate::clean::Cleaner;
use crate::config::PipelineConfig;
use crate::error::{Result, Stage};
use crate::features::FeatureDeriver;
use crate::ingest::{CreditAggregator, GoalFlattener, PaginatedFetcher};
use crate::registry::RegistrySource;
use crate::table::Table;

pub struct Pipeline<'a> {
    config: PipelineConfig,
    source: &'a dyn RegistrySource,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: PipelineConfig, source: &'a dyn RegistrySource) -> Self {
        Self { config, source }
    }

    /// Harvest the registry and publish the raw merged table.
    pub async fn run_ingestion(&self) -> Result<Table> {
        self.ingest()
            .await
            .map_err(|e| e.in_stage(Stage::Ingestion))
    }

    /// Clean the raw artifact and publish the cleaned table.
    pub fn run_cleaning(&self) -> Result<Table> {
        self.clean().map_err(|e| e.in_stage(Stage::Cleaning))
    }

    /// Derive features over the cleaned artifact and publish the
    /// transformed table.
    pub fn run_transformation(&self) -> Result<Table> {
        self.transform()
            .map_err(|e| e.in_stage(Stage::Transformation))
    }

    /// Full pass: ingest, clean, transform. Returns the final table.
    pub async fn run(&self) -> Result<Table> {
        self.run_ingestion().await?;
        self.run_cleaning()?;
        self.run_transformation()
    }

    async fn ingest(&self) -> Result<Table> {
        info!(
            base_url = %self.config.api.base_url,
            certified_only = self.config.api.certified_only,
            "starting registry harvest"
        );

        let fetcher = PaginatedFetcher::new(self.source, self.config.api.max_pages);
        let records = fetcher.fetch(self.config.api.certified_only).await?;

        let mut table = GoalFlattener::flatten(&records)?;
        CreditAggregator::new(self.source).augment(&mut table).await?;

        write_table(&self.config.paths.raw, &table)?;
        info!(path = %self.config.paths.raw.display(), "raw artifact published");
        Ok(table)
    }

    fn clean(&self) -> Result<Table> {
        let raw = read_table(&self.config.paths.raw, &Schema::project_table())?;
        let cleaned = Cleaner::clean(&raw)?;
        write_table(&self.config.paths.cleaned, &cleaned)?;
        info!(path = %self.config.paths.cleaned.display(), "cleaned artifact published");
        Ok(cleaned)
    }

    fn transform(&self) -> Result<Table> {
        let cleaned = read_table(&self.config.paths.cleaned, &Schema::project_table())?;
        let transformed = FeatureDeriver::derive(&cleaned)?;
        write_table(&self.config.paths.transformed, &transformed)?;
        info!(
            path = %self.config.paths.transformed.display(),
            "transformed artifact published"
        );
        Ok(transformed)
    }
}
