// src/services/metrics_manager.rs
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::DispatchError;
use crate::services::fallback::FallbackCategory;

/// How one dispatch ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    Success,
    NetworkFailure,
    Timeout,
    HttpError,
    MalformedReply,
}

impl DispatchOutcome {
    pub fn of<T>(result: &Result<T, DispatchError>) -> Self {
        match result {
            Ok(_) => DispatchOutcome::Success,
            Err(DispatchError::NetworkFailure(_)) => DispatchOutcome::NetworkFailure,
            Err(DispatchError::Timeout { .. }) => DispatchOutcome::Timeout,
            Err(DispatchError::HttpError { .. }) => DispatchOutcome::HttpError,
            Err(DispatchError::MalformedReply(_)) => DispatchOutcome::MalformedReply,
        }
    }

    pub fn is_failure(self) -> bool {
        self != DispatchOutcome::Success
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct MetricsData {
    pub dispatch_outcomes: HashMap<DispatchOutcome, u64>,
    pub fallback_usage: HashMap<FallbackCategory, u64>,
}

impl MetricsData {
    pub fn outcome(&self, outcome: DispatchOutcome) -> u64 {
        self.dispatch_outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn fallback(&self, category: FallbackCategory) -> u64 {
        self.fallback_usage.get(&category).copied().unwrap_or(0)
    }

    pub fn total_dispatches(&self) -> u64 {
        self.dispatch_outcomes.values().sum()
    }

    /// Share of dispatches that ended in any failure kind.
    pub fn failure_rate(&self) -> f64 {
        let total = self.total_dispatches();
        if total == 0 {
            return 0.0;
        }
        let failed: u64 = self
            .dispatch_outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_failure())
            .map(|(_, count)| count)
            .sum();
        failed as f64 / total as f64
    }
}

/// Dispatch and fallback counters shared by every widget handle.
#[derive(Debug, Clone, Default)]
pub struct MetricsManager {
    inner: Arc<RwLock<MetricsData>>,
}

impl MetricsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one dispatch, plus the canned reply category when one was used.
    pub async fn record(&self, outcome: DispatchOutcome, fallback: Option<FallbackCategory>) {
        let mut data = self.inner.write().await;
        *data.dispatch_outcomes.entry(outcome).or_default() += 1;
        if let Some(category) = fallback {
            *data.fallback_usage.entry(category).or_default() += 1;
        }
    }

    pub async fn snapshot(&self) -> MetricsData {
        self.inner.read().await.clone()
    }
}
