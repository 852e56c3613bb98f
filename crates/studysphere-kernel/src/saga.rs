//! Multi-step store mutations with per-step tracking.
//!
//! The store has no transactions and no folder objects, so renaming or
//! deleting a folder is many independent calls. A [`Saga`] is the plan for
//! such a mutation: a list of [`PlannedOp`]s executed in order, stopping at
//! the first failure. Nothing is rolled back. The [`SagaReport`] says
//! exactly which steps ran, which failed, and which never started, so a
//! half-finished rename (old and new keys both present) is visible to the
//! caller instead of hidden behind one error string.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::{ObjectStore, StoreError};

/// One store call in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlannedOp {
    Copy { from: String, to: String },
    Remove { keys: Vec<String> },
}

impl fmt::Display for PlannedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedOp::Copy { from, to } => write!(f, "copy {} -> {}", from, to),
            PlannedOp::Remove { keys } => write!(f, "remove {} key(s)", keys.len()),
        }
    }
}

/// The step that stopped a saga.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub op: PlannedOp,
    pub error: StoreError,
}

/// Outcome of running a saga.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SagaReport {
    pub completed: Vec<PlannedOp>,
    pub failed: Option<StepFailure>,
    /// Steps never attempted because an earlier one failed.
    pub skipped: Vec<PlannedOp>,
}

impl SagaReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }

    /// Failed, but only after at least one step changed the store.
    pub fn is_partial(&self) -> bool {
        self.failed.is_some() && !self.completed.is_empty()
    }

    /// Keys created by completed copies.
    pub fn written_keys(&self) -> Vec<&str> {
        self.completed
            .iter()
            .filter_map(|op| match op {
                PlannedOp::Copy { to, .. } => Some(to.as_str()),
                PlannedOp::Remove { .. } => None,
            })
            .collect()
    }

    /// Keys deleted by completed removals.
    pub fn removed_keys(&self) -> Vec<&str> {
        self.completed
            .iter()
            .flat_map(|op| match op {
                PlannedOp::Copy { .. } => &[][..],
                PlannedOp::Remove { keys } => keys.as_slice(),
            })
            .map(String::as_str)
            .collect()
    }

    /// Keys a failed removal (or a skipped one) left behind.
    pub fn stranded_keys(&self) -> Vec<&str> {
        self.failed
            .iter()
            .map(|f| &f.op)
            .chain(self.skipped.iter())
            .flat_map(|op| match op {
                PlannedOp::Copy { .. } => &[][..],
                PlannedOp::Remove { keys } => keys.as_slice(),
            })
            .map(String::as_str)
            .collect()
    }
}

impl fmt::Display for SagaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.completed.len() + self.skipped.len() + usize::from(self.failed.is_some());
        write!(f, "{} of {} step(s) completed", self.completed.len(), total)?;
        if let Some(failure) = &self.failed {
            write!(f, "; {} failed: {}", failure.op, failure.error)?;
        }
        if !self.skipped.is_empty() {
            write!(f, "; {} skipped", self.skipped.len())?;
        }
        Ok(())
    }
}

/// A planned multi-step mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saga {
    ops: Vec<PlannedOp>,
}

impl Saga {
    pub fn new(ops: Vec<PlannedOp>) -> Self {
        Self { ops }
    }

    /// Copy the file, then remove the original.
    pub fn rename_file(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        Self::new(vec![
            PlannedOp::Copy {
                from: from.clone(),
                to: to.into(),
            },
            PlannedOp::Remove { keys: vec![from] },
        ])
    }

    /// Copy every key under `from_prefix` to the same place under
    /// `to_prefix`, then remove all the originals in one call.
    ///
    /// Keys not under `from_prefix` are ignored. An empty folder plans
    /// nothing.
    pub fn rename_folder(from_prefix: &str, to_prefix: &str, keys: &[String]) -> Self {
        let from_prefix = from_prefix.trim_matches('/');
        let to_prefix = to_prefix.trim_matches('/');

        let mut ops = Vec::new();
        let mut originals = Vec::new();
        for key in keys {
            let Some(rest) = key
                .strip_prefix(from_prefix)
                .and_then(|r| r.strip_prefix('/'))
            else {
                continue;
            };
            ops.push(PlannedOp::Copy {
                from: key.clone(),
                to: format!("{}/{}", to_prefix, rest),
            });
            originals.push(key.clone());
        }
        if !originals.is_empty() {
            ops.push(PlannedOp::Remove { keys: originals });
        }
        Self::new(ops)
    }

    /// Remove `keys` in one call, even when there are none.
    pub fn delete(keys: Vec<String>) -> Self {
        Self::new(vec![PlannedOp::Remove { keys }])
    }

    pub fn ops(&self) -> &[PlannedOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Run every step in order, stopping at the first failure.
    pub async fn execute(self, store: &dyn ObjectStore) -> SagaReport {
        let mut report = SagaReport::default();
        let mut ops = self.ops.into_iter();

        for op in ops.by_ref() {
            let result = match &op {
                PlannedOp::Copy { from, to } => store.copy(from, to).await,
                PlannedOp::Remove { keys } => store.remove(keys).await,
            };
            match result {
                Ok(()) => {
                    tracing::debug!(bucket = store.bucket(), "saga step ok: {}", op);
                    report.completed.push(op);
                }
                Err(error) => {
                    tracing::warn!(bucket = store.bucket(), "saga step failed: {}: {}", op, error);
                    report.failed = Some(StepFailure { op, error });
                    break;
                }
            }
        }

        report.skipped = ops.collect();
        report
    }
}
