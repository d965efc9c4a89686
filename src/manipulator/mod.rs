//! Manipulator: write operations and the change buffer.
//!
//! Every write is first turned into an ordered list of
//! [`ChangeDescriptor`]s by a builder in [`changes`]. In immediate mode the
//! list is applied to the store straight away and the reasoner is told; in
//! buffered mode it is appended to the [`ChangeBuffer`] and nothing reaches
//! the store until [`Manipulator::flush`].
//!
//! Replace operations are a single descriptor list (removals then the
//! addition), so under buffering both halves always land in the same flush.

pub mod changes;

use std::borrow::Cow;

use crate::ontology::{ChangeDescriptor, Ontology};
use crate::reasoner::{Reasoner, ReasonerResult};

/// Ordered, pending changes of one manipulator.
#[derive(Debug, Clone, Default)]
pub struct ChangeBuffer {
    changes: Vec<ChangeDescriptor>,
}

impl ChangeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, changes: impl IntoIterator<Item = ChangeDescriptor>) {
        self.changes.extend(changes);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn as_slice(&self) -> &[ChangeDescriptor] {
        &self.changes
    }

    /// Empty the buffer, returning its contents in submission order.
    pub fn take(&mut self) -> Vec<ChangeDescriptor> {
        std::mem::take(&mut self.changes)
    }
}

/// Outcome of submitting a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// Applied to the store; `effective` descriptors changed it.
    Applied { effective: usize },
    /// Appended to the buffer, which now holds `pending` descriptors.
    Buffered { pending: usize },
}

/// Routes write operations either to the store or to the change buffer.
#[derive(Debug, Clone, Default)]
pub struct Manipulator {
    buffering: bool,
    buffer: ChangeBuffer,
}

impl Manipulator {
    pub fn new(buffering: bool) -> Self {
        Self {
            buffering,
            buffer: ChangeBuffer::new(),
        }
    }

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    /// Switch modes. Pending changes stay buffered until the next flush.
    pub fn set_buffering(&mut self, buffering: bool) {
        self.buffering = buffering;
    }

    /// Pending changes, in the order they will be applied.
    pub fn buffered_changes(&self) -> &[ChangeDescriptor] {
        self.buffer.as_slice()
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// The store as it will look once the buffer is flushed.
    ///
    /// Builders that read existing values (replace, rename, remove-entity)
    /// run against this view so that buffered values are taken into account.
    pub fn projected<'a>(&self, ontology: &'a Ontology) -> Cow<'a, Ontology> {
        if self.buffer.is_empty() {
            Cow::Borrowed(ontology)
        } else {
            let mut view = ontology.clone();
            view.apply(self.buffer.as_slice());
            Cow::Owned(view)
        }
    }

    /// Apply or buffer a write, depending on the mode.
    ///
    /// In immediate mode the reasoner is notified after the store changed; an
    /// inconsistency it reports is returned once the changes are in place.
    pub fn submit(
        &mut self,
        ontology: &mut Ontology,
        reasoner: &mut dyn Reasoner,
        changes: Vec<ChangeDescriptor>,
    ) -> ReasonerResult<Submitted> {
        if changes.is_empty() {
            return Ok(Submitted::Applied { effective: 0 });
        }
        if self.buffering {
            self.buffer.extend(changes);
            return Ok(Submitted::Buffered {
                pending: self.buffer.len(),
            });
        }
        let effective = Self::apply(ontology, reasoner, &changes)?;
        Ok(Submitted::Applied { effective })
    }

    /// Apply the whole buffer in order and empty it.
    ///
    /// The buffer is drained before the reasoner is told, so an inconsistency
    /// reported here does not leave the changes pending.
    pub fn flush(
        &mut self,
        ontology: &mut Ontology,
        reasoner: &mut dyn Reasoner,
    ) -> ReasonerResult<usize> {
        if self.buffer.is_empty() {
            return Ok(0);
        }
        let changes = self.buffer.take();
        tracing::debug!(changes = changes.len(), "flushing change buffer");
        Self::apply(ontology, reasoner, &changes)
    }

    /// Apply changes directly, bypassing the buffer.
    pub fn apply(
        ontology: &mut Ontology,
        reasoner: &mut dyn Reasoner,
        changes: &[ChangeDescriptor],
    ) -> ReasonerResult<usize> {
        let effective = ontology.apply(changes);
        if effective > 0 {
            reasoner.ontology_changed(ontology)?;
        }
        Ok(effective)
    }
}
