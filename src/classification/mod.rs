//! Rule-based classification of crawled job postings and company profiles.

pub mod batch;
pub mod domain;
pub mod employment;
pub mod import;
pub mod industry;
pub mod patterns;
pub mod rules;

pub use batch::{
    BatchConfig, BatchError, BatchOutput, BatchReport, BatchRunner, ChunkExecutionError,
    ChunkFailurePolicy,
};
pub use domain::{CompanyRecord, EmploymentCategory, IndustryResult, IndustryRule, JobRecord};
pub use employment::{EmploymentClassifier, EmploymentExplanation, SignalKind, SignalOutcome};
pub use industry::{IndustryClassifier, IndustryExplanation, RuleMatch};
pub use rules::{
    EmploymentKeywords, EmploymentRuleSet, IndustryRuleSet, ReloadSchedule, RuleLoadError,
    RuleSnapshot, RuleSnapshotSummary, RuleSource, RuleStore, SnapshotOrigin,
};

use std::sync::Arc;

/// Entry point for collaborators: classifies against whatever snapshot the store currently serves.
pub struct Classifier {
    store: Arc<RuleStore>,
    runner: BatchRunner,
}

impl Classifier {
    pub fn new(store: Arc<RuleStore>, batch: BatchConfig) -> Self {
        Self {
            store,
            runner: BatchRunner::new(batch),
        }
    }

    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    pub fn batch_config(&self) -> &BatchConfig {
        self.runner.config()
    }

    pub fn classify_job(&self, job: &JobRecord) -> EmploymentCategory {
        self.employment().classify(job)
    }

    pub fn explain_job(&self, job: &JobRecord) -> EmploymentExplanation {
        self.employment().explain(job)
    }

    pub fn classify_company(&self, company: &CompanyRecord) -> IndustryResult {
        self.industry().classify(company)
    }

    pub fn explain_company(&self, company: &CompanyRecord) -> IndustryExplanation {
        self.industry().explain(company)
    }

    /// Classifies postings in chunks of `chunk_size`; each chunk reads the current snapshot once.
    pub async fn classify_batch(
        &self,
        jobs: Vec<JobRecord>,
        chunk_size: usize,
    ) -> Result<BatchOutput<JobRecord, EmploymentCategory>, BatchError> {
        let store = Arc::clone(&self.store);
        self.runner
            .run(
                jobs,
                chunk_size,
                move |chunk: &[JobRecord]| {
                    let classifier = EmploymentClassifier::new(store.current_employment_rules());
                    chunk.iter().map(|job| classifier.classify(job)).collect()
                },
                |_| EmploymentCategory::FullTimeSocial,
            )
            .await
    }

    pub async fn classify_company_batch(
        &self,
        companies: Vec<CompanyRecord>,
        chunk_size: usize,
    ) -> Result<BatchOutput<CompanyRecord, IndustryResult>, BatchError> {
        let store = Arc::clone(&self.store);
        self.runner
            .run(
                companies,
                chunk_size,
                move |chunk: &[CompanyRecord]| {
                    let classifier = IndustryClassifier::new(store.current_industry_rules());
                    chunk
                        .iter()
                        .map(|company| classifier.classify(company))
                        .collect()
                },
                |_| IndustryResult::unknown(),
            )
            .await
    }

    fn employment(&self) -> EmploymentClassifier {
        EmploymentClassifier::new(self.store.current_employment_rules())
    }

    fn industry(&self) -> IndustryClassifier {
        IndustryClassifier::new(self.store.current_industry_rules())
    }
}
