//! End-to-end insight extraction over stored trajectories
//!
//! One extraction run walks the record pool fold by fold:
//!
//! 1. Records are categorized (first-trial success / recovered-on-retry /
//!    never-solved) and dealt into training folds.
//! 2. For each recovered record, every failed trial is paired with the
//!    final successful one into a compare critique.
//! 3. First-trial successes are shuffled into batches and summarized into
//!    success critiques.
//! 4. Each critique goes to the language model; the response is parsed
//!    into operations, sanitized against the current insight list, and
//!    applied.
//!
//! Model failures abort the run with [`DistillError::Lm`]; malformed
//! individual operations are tallied and skipped instead.

use crate::error::DistillError;
use crate::llm::LanguageModel;
use crate::ops::{parse_operations, sanitize};
use crate::prompts::{compare_prompt, success_prompt};
use hindsight_core::{
    allocate_folds, categorize, shuffle_chunks, ApplyStats, InsightStore, TrajectoryId,
    TrajectoryRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default number of training folds.
pub const DEFAULT_NUM_FOLDS: usize = 2;

/// Default number of exemplars per success critique.
pub const DEFAULT_SUCCESS_BATCH_SIZE: usize = 8;

/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

/// Tuning for one extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Number of folds the record pool is dealt into
    pub num_folds: usize,

    /// How many successful exemplars share one success critique
    pub success_batch_size: usize,

    /// Seed for the fold and batch shuffles
    pub seed: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            num_folds: DEFAULT_NUM_FOLDS,
            success_batch_size: DEFAULT_SUCCESS_BATCH_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

impl ExtractConfig {
    /// Set the number of folds.
    #[must_use]
    pub fn with_num_folds(mut self, num_folds: usize) -> Self {
        self.num_folds = num_folds;
        self
    }

    /// Set the success batch size.
    #[must_use]
    pub fn with_success_batch_size(mut self, success_batch_size: usize) -> Self {
        self.success_batch_size = success_batch_size;
        self
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), DistillError> {
        if self.num_folds == 0 {
            return Err(DistillError::InvalidConfig(
                "num_folds must be nonzero".into(),
            ));
        }
        if self.success_batch_size == 0 {
            return Err(DistillError::InvalidConfig(
                "success_batch_size must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

/// Tally of one extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractReport {
    /// Folds walked
    pub folds: usize,

    /// Compare critiques sent to the model
    pub compare_prompts: usize,

    /// Success critiques sent to the model
    pub success_prompts: usize,

    /// Operations recovered from model responses
    pub operations_parsed: usize,

    /// Outcome tally of applying the sanitized operations
    pub stats: ApplyStats,
}

/// Insight extraction pipeline
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    /// Create an extractor with the given tuning.
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// The extractor's tuning.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Run one extraction pass over `records`, revising `insights` in place.
    ///
    /// Records are expected to carry the ids a [`hindsight_core::TrajectoryStore`]
    /// assigned them. The insight store keeps all operations applied before
    /// a model failure.
    ///
    /// # Errors
    ///
    /// - [`DistillError::InvalidConfig`] for zero folds or batch size
    /// - [`DistillError::Lm`] when the model fails mid-run
    pub async fn extract(
        &self,
        records: &[TrajectoryRecord],
        insights: &mut InsightStore,
        model: &dyn LanguageModel,
    ) -> Result<ExtractReport, DistillError> {
        self.config.validate()?;

        let categories = categorize(records);
        let ids: Vec<TrajectoryId> = records.iter().map(|r| r.id).collect();
        let by_id: BTreeMap<TrajectoryId, &TrajectoryRecord> =
            records.iter().map(|r| (r.id, r)).collect();

        let folds = allocate_folds(&ids, self.config.num_folds, self.config.seed)?;
        let mut report = ExtractReport {
            folds: folds.len(),
            ..ExtractReport::default()
        };

        log::info!(
            "extracting insights from {} records ({} success, {} compare, {} fail) over {} folds",
            records.len(),
            categories.success.len(),
            categories.compare.len(),
            categories.fail.len(),
            folds.len()
        );

        for (fold, pool) in &folds {
            let scoped = categories.in_pool(pool);
            log::debug!(
                "fold {fold}: {} compare records, {} success records in pool",
                scoped.compare.len(),
                scoped.success.len()
            );

            for id in &scoped.compare {
                let Some(record) = by_id.get(id) else {
                    continue;
                };
                let Some((successful, earlier)) = record.trials.split_last() else {
                    continue;
                };

                for failed in earlier.iter().filter(|trial| !trial.success) {
                    let prompt = compare_prompt(&record.question, failed, successful, insights);
                    report.compare_prompts += 1;

                    let response = model.complete(&prompt).await?;
                    apply_response(insights, &response, &mut report);
                }
            }

            let success_ids: Vec<TrajectoryId> = scoped.success.iter().copied().collect();
            for chunk in shuffle_chunks(&success_ids, self.config.success_batch_size, self.config.seed)
            {
                let exemplars: Vec<String> = chunk
                    .iter()
                    .filter_map(|id| by_id.get(id))
                    .filter_map(|record| record.exemplar())
                    .collect();
                if exemplars.is_empty() {
                    continue;
                }

                let prompt = success_prompt(&exemplars, insights);
                report.success_prompts += 1;

                let response = model.complete(&prompt).await?;
                apply_response(insights, &response, &mut report);
            }
        }

        log::info!(
            "extraction done: {} prompts, {} operations ({} applied, {} skipped, {} failed)",
            report.compare_prompts + report.success_prompts,
            report.operations_parsed,
            report.stats.applied,
            report.stats.skipped,
            report.stats.failed
        );

        Ok(report)
    }
}

fn apply_response(insights: &mut InsightStore, response: &str, report: &mut ExtractReport) {
    let operations = parse_operations(response);
    report.operations_parsed += operations.len();

    let sanitized = sanitize(operations, insights);
    let stats = insights.apply_all(&sanitized);
    report.stats.merge(stats);
}
