use super::{
    EmploymentKeywords, EmploymentRuleSet, IndustryRuleSet, RuleLoadError, RuleSnapshot,
    SnapshotOrigin,
};
use crate::classification::domain::IndustryRule;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Rule files a store reloads from. A missing path keeps that half on the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSource {
    pub employment_path: Option<PathBuf>,
    pub industry_path: Option<PathBuf>,
}

impl RuleSource {
    pub fn new(employment_path: Option<PathBuf>, industry_path: Option<PathBuf>) -> Self {
        Self {
            employment_path,
            industry_path,
        }
    }

    fn is_empty(&self) -> bool {
        self.employment_path.is_none() && self.industry_path.is_none()
    }
}

/// Owns the active [`RuleSnapshot`] and replaces it atomically on reload.
///
/// Readers clone the snapshot `Arc` under a read lock held only for the clone,
/// so classification never runs while holding a lock and never observes a
/// snapshot assembled from two different reloads.
pub struct RuleStore {
    source: RuleSource,
    current: RwLock<Arc<RuleSnapshot>>,
    versions: AtomicU64,
    loaded: AtomicBool,
    reload_lock: tokio::sync::Mutex<()>,
}

impl RuleStore {
    /// Creates a store serving the built-in defaults until the first successful reload.
    pub fn new(source: RuleSource) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(RuleSnapshot::defaults(0))),
            versions: AtomicU64::new(0),
            loaded: AtomicBool::new(false),
            reload_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RuleSource::default())
    }

    /// Creates a store and attempts an initial load.
    ///
    /// Failure is logged and the defaults stay active.
    pub async fn open(source: RuleSource) -> Self {
        let store = Self::new(source);
        if !store.source.is_empty() {
            let _ = store.reload().await;
        }
        store
    }

    pub fn source(&self) -> &RuleSource {
        &self.source
    }

    pub fn snapshot(&self) -> Arc<RuleSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_employment_rules(&self) -> Arc<EmploymentRuleSet> {
        self.snapshot().employment.clone()
    }

    pub fn current_industry_rules(&self) -> Arc<IndustryRuleSet> {
        self.snapshot().industry.clone()
    }

    /// Whether any rule file has loaded successfully since the store was created.
    pub fn has_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Rebuilds the snapshot from the configured files and publishes it.
    ///
    /// On failure the current snapshot stays in effect: the last good file load,
    /// or the built-in defaults if nothing has loaded yet.
    pub async fn reload(&self) -> Result<Arc<RuleSnapshot>, RuleLoadError> {
        let _serialized = self.reload_lock.lock().await;

        match self.build_snapshot().await {
            Ok((employment, industry)) => {
                let origin = if self.source.is_empty() {
                    SnapshotOrigin::Defaults
                } else {
                    SnapshotOrigin::File
                };
                let snapshot = Arc::new(RuleSnapshot {
                    version: self.versions.fetch_add(1, Ordering::AcqRel) + 1,
                    loaded_at: Utc::now(),
                    origin,
                    employment: Arc::new(employment),
                    industry: Arc::new(industry),
                });
                self.publish(snapshot.clone());
                if origin == SnapshotOrigin::File {
                    self.loaded.store(true, Ordering::Release);
                }

                let summary = snapshot.summary();
                info!(
                    version = summary.version,
                    industry_rules = summary.industry_rules,
                    raw_types = summary.raw_types,
                    "classification rules reloaded"
                );
                Ok(snapshot)
            }
            Err(err) => {
                let current = self.snapshot();
                warn!(
                    error = %err,
                    version = current.version,
                    origin = ?current.origin,
                    "rule reload failed, keeping current snapshot"
                );
                Err(err)
            }
        }
    }

    /// Fire-and-forget reload for operator triggers such as a freshly uploaded rule file.
    pub fn trigger_reload(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let _ = store.reload().await;
        })
    }

    /// Reloads on a fixed period until the returned handle is stopped or dropped.
    pub fn schedule_reload(self: &Arc<Self>, interval: Duration) -> ReloadSchedule {
        let store = Arc::clone(self);
        let period = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; startup loading is the caller's job.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                debug!(?period, "scheduled rule reload");
                let _ = store.reload().await;
            }
        });

        ReloadSchedule { task: Some(task) }
    }

    fn publish(&self, snapshot: Arc<RuleSnapshot>) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = snapshot;
    }

    async fn build_snapshot(&self) -> Result<(EmploymentRuleSet, IndustryRuleSet), RuleLoadError> {
        let employment = match &self.source.employment_path {
            Some(path) => {
                let keywords: EmploymentKeywords = read_json(path).await?;
                EmploymentRuleSet::from_keywords(keywords)?
            }
            None => EmploymentRuleSet::defaults().as_ref().clone(),
        };

        let industry = match &self.source.industry_path {
            Some(path) => {
                let rules: Vec<IndustryRule> = read_json(path).await?;
                IndustryRuleSet::new(rules)
            }
            None => IndustryRuleSet::defaults().as_ref().clone(),
        };

        Ok((employment, industry))
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, RuleLoadError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => RuleLoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => RuleLoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

    serde_json::from_str(&raw).map_err(|source| RuleLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Handle to the periodic reload task. Dropping it stops the schedule.
pub struct ReloadSchedule {
    task: Option<JoinHandle<()>>,
}

impl ReloadSchedule {
    pub fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ReloadSchedule {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
