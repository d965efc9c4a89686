//! Consistency monitor: the sticky `Consistent`/`Inconsistent` flag.
//!
//! The flag only moves back to `Consistent` when a synchronization observes
//! the reasoner reporting a consistent store. Nothing is rolled back when the
//! store becomes inconsistent; callers issue compensating writes and
//! synchronize again.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::explain::{ConflictExplainer, ExplanationHook};
use crate::manipulator::Manipulator;
use crate::ontology::{ChangeDescriptor, Ontology};
use crate::reasoner::{Reasoner, ReasonerError, ReasonerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsistencyState {
    #[default]
    Consistent,
    Inconsistent,
}

impl ConsistencyState {
    pub fn is_consistent(self) -> bool {
        matches!(self, ConsistencyState::Consistent)
    }
}

impl fmt::Display for ConsistencyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyState::Consistent => write!(f, "consistent"),
            ConsistencyState::Inconsistent => write!(f, "inconsistent"),
        }
    }
}

/// Tracks the consistency state of one reference.
pub struct ConsistencyMonitor {
    reference: String,
    state: ConsistencyState,
    hook: Arc<dyn ExplanationHook>,
    last_explanation: Option<String>,
}

impl ConsistencyMonitor {
    /// A monitor starting `Consistent`, explaining with [`ConflictExplainer`].
    pub fn new(reference: impl Into<String>) -> Self {
        Self::with_hook(reference, Arc::new(ConflictExplainer::default()))
    }

    pub fn with_hook(reference: impl Into<String>, hook: Arc<dyn ExplanationHook>) -> Self {
        Self {
            reference: reference.into(),
            state: ConsistencyState::Consistent,
            hook,
            last_explanation: None,
        }
    }

    pub fn state(&self) -> ConsistencyState {
        self.state
    }

    pub fn is_consistent(&self) -> bool {
        self.state.is_consistent()
    }

    pub fn set_hook(&mut self, hook: Arc<dyn ExplanationHook>) {
        self.hook = hook;
    }

    /// Text produced by the hook on the most recent transition to inconsistent.
    pub fn last_explanation(&self) -> Option<&str> {
        self.last_explanation.as_deref()
    }

    /// Flush pending writes, re-classify and record the verdict.
    ///
    /// While inconsistent, only the check runs: the buffer is left alone and
    /// the current store is re-classified to see whether earlier compensating
    /// writes resolved the clash.
    pub fn synchronize(
        &mut self,
        ontology: &mut Ontology,
        reasoner: &mut dyn Reasoner,
        manipulator: &mut Manipulator,
    ) -> ConsistencyState {
        if !self.is_consistent() {
            return self.recheck(ontology, reasoner);
        }
        let start = Instant::now();
        let result = manipulator
            .flush(ontology, reasoner)
            .and_then(|_| reasoner.classify(ontology));
        self.conclude(ontology, reasoner, result, start)
    }

    /// Apply `changes` (not the buffer), re-classify and record the verdict.
    ///
    /// The changes are applied in either state; while inconsistent they are
    /// usually the compensating writes.
    pub fn synchronize_with(
        &mut self,
        ontology: &mut Ontology,
        reasoner: &mut dyn Reasoner,
        changes: &[ChangeDescriptor],
    ) -> ConsistencyState {
        let start = Instant::now();
        let applied = Manipulator::apply(ontology, reasoner, changes);
        if !self.is_consistent() {
            return self.recheck(ontology, reasoner);
        }
        let result = applied.and_then(|_| reasoner.classify(ontology));
        self.conclude(ontology, reasoner, result, start)
    }

    /// Record an inconsistency signal raised outside synchronization.
    pub fn notify_inconsistent(&mut self, ontology: &Ontology, reasoner: &dyn Reasoner) {
        if self.is_consistent() {
            self.enter_inconsistent(ontology, reasoner);
        } else {
            tracing::debug!(reference = %self.reference, "inconsistency signal while already inconsistent");
        }
    }

    fn recheck(&mut self, ontology: &Ontology, reasoner: &mut dyn Reasoner) -> ConsistencyState {
        match reasoner.classify(ontology) {
            Ok(()) if reasoner.is_consistent() => {
                tracing::info!(reference = %self.reference, "ontology is consistent again");
                self.state = ConsistencyState::Consistent;
                self.last_explanation = None;
            }
            Ok(()) | Err(ReasonerError::InconsistentOntology) => {
                tracing::warn!(reference = %self.reference, "ontology is still inconsistent");
            }
            Err(err) => {
                tracing::error!(reference = %self.reference, error = %err, "reasoner failed during recheck");
            }
        }
        self.state
    }

    fn conclude(
        &mut self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        result: ReasonerResult<()>,
        start: Instant,
    ) -> ConsistencyState {
        match result {
            Ok(()) if reasoner.is_consistent() => {
                tracing::debug!(
                    reference = %self.reference,
                    reasoner = reasoner.name(),
                    elapsed_ns = start.elapsed().as_nanos() as u64,
                    "synchronized reasoner"
                );
            }
            Ok(()) | Err(ReasonerError::InconsistentOntology) => {
                self.enter_inconsistent(ontology, reasoner);
            }
            Err(err) => {
                tracing::error!(reference = %self.reference, error = %err, "reasoner failed during synchronization");
            }
        }
        self.state
    }

    fn enter_inconsistent(&mut self, ontology: &Ontology, reasoner: &dyn Reasoner) {
        self.state = ConsistencyState::Inconsistent;
        let conflicts = reasoner.conflicts();
        let explanation = self.hook.explain(ontology, &conflicts);
        tracing::warn!(
            reference = %self.reference,
            conflicts = conflicts.len(),
            "ontology became inconsistent"
        );
        if !explanation.is_empty() {
            tracing::warn!(reference = %self.reference, "{explanation}");
        }
        self.last_explanation = Some(explanation);
    }
}

impl fmt::Debug for ConsistencyMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsistencyMonitor")
            .field("reference", &self.reference)
            .field("state", &self.state)
            .field("last_explanation", &self.last_explanation)
            .finish()
    }
}
