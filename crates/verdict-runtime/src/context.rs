//! Per-evaluation context
//!
//! Everything an evaluator needs besides the node itself: the tenant, the
//! trigger object, the data model, the evaluation options and the caller's
//! cancellation flag. A context is built fresh for every evaluation.

use crate::error::{Result, RuntimeError};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use verdict_core::{DataModel, TriggerObject};

/// Cloneable cancellation signal shared between a caller and an evaluation
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Evaluation options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Skip every store read and return type-correct placeholders
    pub fake_values: bool,

    /// Stop `And`/`Or` at the first deciding child
    pub short_circuit: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            fake_values: false,
            short_circuit: true,
        }
    }
}

impl EvaluationOptions {
    /// Options for dry-run validation
    pub fn dry_run() -> Self {
        Self {
            fake_values: true,
            short_circuit: false,
        }
    }
}

/// Context of a single evaluation
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    /// Tenant the evaluation runs for
    pub organization_id: String,

    /// Object the decision is computed for
    pub trigger: Arc<TriggerObject>,

    /// Tenant data model
    pub data_model: Arc<DataModel>,

    pub options: EvaluationOptions,

    /// Reference time for time functions
    pub now: DateTime<Utc>,

    pub cancellation: CancellationFlag,
}

impl EvaluationContext {
    pub fn new(
        organization_id: impl Into<String>,
        trigger: Arc<TriggerObject>,
        data_model: Arc<DataModel>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            trigger,
            data_model,
            options: EvaluationOptions::default(),
            now: Utc::now(),
            cancellation: CancellationFlag::new(),
        }
    }

    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Fail with `Cancelled` once the caller has cancelled
    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            Err(RuntimeError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_shared_between_clones() {
        let flag = CancellationFlag::new();
        let ctx = EvaluationContext::new(
            "org-1",
            Arc::new(TriggerObject::new("transactions")),
            Arc::new(DataModel::new()),
        )
        .with_cancellation(flag.clone());

        assert!(ctx.check_cancelled().is_ok());
        flag.cancel();
        assert!(matches!(ctx.check_cancelled(), Err(RuntimeError::Cancelled)));
    }

    #[test]
    fn test_default_options() {
        let options = EvaluationOptions::default();
        assert!(!options.fake_values);
        assert!(options.short_circuit);
        assert!(EvaluationOptions::dry_run().fake_values);
    }
}
