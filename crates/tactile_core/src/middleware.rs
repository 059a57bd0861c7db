//! Onion-style middleware
//!
//! Each middleware receives a [`Next`] continuation, the call context and the
//! processor. Calling [`Next::proceed`] runs the rest of the chain and returns
//! once it has finished, so code after `proceed` runs "on the way out".
//! Not calling it stops the event there.
//!
//! ```text
//! dispatch ─▶ m1 ──proceed──▶ m2 ──proceed──▶ m3
//!             m1 ◀─────────── m2 ◀───────────┘
//! ```

use std::rc::Rc;

use crate::error::Result;
use crate::processor::EventProcessor;

/// A handler in the dispatch chain
pub trait Middleware<C> {
    fn handle(&self, next: Next<'_, C>, ctx: &mut C, processor: &EventProcessor<C>) -> Result<()>;
}

/// Shared handle to a middleware
pub type BoxedMiddleware<C> = Rc<dyn Middleware<C>>;

/// Adapter turning a closure into a [`Middleware`]
pub struct MiddlewareFn<F>(pub F);

impl<C, F> Middleware<C> for MiddlewareFn<F>
where
    F: Fn(Next<'_, C>, &mut C, &EventProcessor<C>) -> Result<()>,
{
    fn handle(&self, next: Next<'_, C>, ctx: &mut C, processor: &EventProcessor<C>) -> Result<()> {
        (self.0)(next, ctx, processor)
    }
}

/// Continuation over the remainder of the chain
///
/// Consumed by [`proceed`](Next::proceed), so the rest of the chain runs at
/// most once per dispatch.
pub struct Next<'a, C> {
    rest: &'a [BoxedMiddleware<C>],
    processor: &'a EventProcessor<C>,
}

impl<'a, C> Next<'a, C> {
    pub(crate) fn new(rest: &'a [BoxedMiddleware<C>], processor: &'a EventProcessor<C>) -> Self {
        Self { rest, processor }
    }

    /// Run the remainder of the chain
    pub fn proceed(self, ctx: &mut C) -> Result<()> {
        match self.rest.split_first() {
            Some((head, rest)) => head.handle(Next::new(rest, self.processor), ctx, self.processor),
            None => Ok(()),
        }
    }

    /// Number of middleware still to run after this one
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }
}
