//! Revision chains.
//!
//! Each [`Revision`] owns a shared [`Source`] and points back at the revision
//! it was appended to. The first revision is the *origin*, the newest the
//! *tip*. Parents are never rewritten, so a chain cannot form a cycle.

use std::sync::Arc;

use crate::diff::{DiffView, full_diff, summary_diff};
use crate::source::Source;

#[derive(Debug)]
pub struct Revision {
    source: Arc<Source>,
    parent: Option<Arc<Revision>>,
}

impl Revision {
    /// A chain of one.
    #[must_use]
    pub fn new(source: impl Into<Arc<Source>>) -> Arc<Self> {
        Arc::new(Self {
            source: source.into(),
            parent: None,
        })
    }

    /// A new revision whose parent is `self`.
    #[must_use]
    pub fn append(self: &Arc<Self>, source: impl Into<Arc<Source>>) -> Arc<Self> {
        Arc::new(Self {
            source: source.into(),
            parent: Some(Arc::clone(self)),
        })
    }

    #[must_use]
    pub const fn source(&self) -> &Arc<Source> {
        &self.source
    }

    #[must_use]
    pub const fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// This revision, then its parent, back to the origin.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> + '_ {
        std::iter::successors(Some(self), |r| r.parent.as_deref())
    }

    /// The root of the chain.
    #[must_use]
    pub fn origin(&self) -> &Self {
        self.ancestors().last().unwrap_or(self)
    }

    /// Number of revisions before this one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }
}

/// A handle on the tip of a chain.
#[derive(Debug, Clone, Default)]
pub struct Revisions {
    tip: Option<Arc<Revision>>,
}

impl Revisions {
    #[must_use]
    pub const fn new() -> Self {
        Self { tip: None }
    }

    /// Append a source; it becomes the new tip.
    pub fn push(&mut self, source: impl Into<Arc<Source>>) -> &Arc<Revision> {
        let next = match &self.tip {
            Some(tip) => tip.append(source),
            None => Revision::new(source),
        };
        self.tip.insert(next)
    }

    #[must_use]
    pub const fn tip(&self) -> Option<&Arc<Revision>> {
        self.tip.as_ref()
    }

    #[must_use]
    pub fn origin(&self) -> Option<&Revision> {
        self.tip.as_deref().map(Revision::origin)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tip.as_ref().map_or(0, |t| t.depth() + 1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tip.is_none()
    }

    /// Full diff from origin to tip, or `None` for an empty chain.
    #[must_use]
    pub fn full_diff(&self) -> Option<DiffView> {
        let (origin, tip) = self.ends()?;
        Some(full_diff(origin, tip))
    }

    /// Summary diff from origin to tip, or `None` for an empty chain.
    #[must_use]
    pub fn summary_diff(&self, context: usize) -> Option<DiffView> {
        let (origin, tip) = self.ends()?;
        Some(summary_diff(origin, tip, context))
    }

    fn ends(&self) -> Option<(&Source, &Source)> {
        let tip = self.tip.as_deref()?;
        Some((tip.origin().source().as_ref(), tip.source().as_ref()))
    }
}
