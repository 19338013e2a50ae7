//! Operator redirection.
//!
//! Drawing primitives emit content-stream operators through [`OperatorSink`]
//! and never learn where they land: the page, or whichever transparency
//! group is on top of the group stack.

/// Where written operators currently go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Content stream of the page at this index
    Page(usize),
    /// Content stream of the group with this object id
    Group(u32),
}

/// Sink for content-stream operators.
///
/// Implemented by [`Composer`](super::Composer); drawing code should depend
/// on this trait only.
pub trait OperatorSink {
    /// Append an operator to the current destination.
    fn write(&mut self, operator: &str);

    /// Insert an operator before everything already in the current
    /// destination.
    fn prepend(&mut self, operator: &str);

    /// The current destination.
    fn destination(&self) -> Destination;
}

/// The single redirection slot of a document.
#[derive(Debug, Clone)]
pub(crate) struct Redirection {
    target: Destination,
}

impl Redirection {
    pub(crate) fn new(page: usize) -> Self {
        Self {
            target: Destination::Page(page),
        }
    }

    pub(crate) fn target(&self) -> Destination {
        self.target
    }

    pub(crate) fn redirect_to(&mut self, target: Destination) {
        log::trace!("Redirecting operators from {:?} to {:?}", self.target, target);
        self.target = target;
    }

    pub(crate) fn redirect_to_page(&mut self, page: usize) {
        self.redirect_to(Destination::Page(page));
    }
}
