//! Event processor
//!
//! An [`EventProcessor`] owns a [`State`] map and an ordered middleware chain.
//! [`dispatch`](EventProcessor::dispatch) builds a call context for the event,
//! then threads it through the chain onion-style.
//!
//! Everything is synchronous and single-threaded. Middleware may read and
//! write state and dispatch further events while handling one; nested
//! dispatches run to completion before control returns to the middleware that
//! started them. State is never batched: each middleware sees the values left
//! by everything that ran before it.
//!
//! # Example
//!
//! ```rust
//! use tactile_core::{EventData, EventProcessor};
//!
//! let processor = EventProcessor::<EventData<&str, u32>>::new();
//!
//! processor
//!     .use_fn(|next, ctx, processor| {
//!         processor.update("seen", |n: Option<usize>| n.unwrap_or(0) + 1);
//!         next.proceed(ctx)
//!     })
//!     .use_fn(|_next, ctx, processor| {
//!         // Chain ends here
//!         processor.set("last", ctx.event.to_string());
//!         Ok(())
//!     });
//!
//! processor.dispatch("click", [7]);
//! assert_eq!(processor.get::<usize>("seen"), Some(1));
//! assert_eq!(processor.get::<String>("last"), Some("click".to_string()));
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::error::{DispatchError, PanicPayload, Result};
use crate::fault::{self, FaultPolicy};
use crate::middleware::{BoxedMiddleware, Middleware, MiddlewareFn, Next};
use crate::state::State;

/// A call context that can be built from a dispatched event
pub trait CallContext: Sized {
    /// The event type carried by the context
    type Event;
    /// The type of the extra caller arguments
    type Arg;

    fn from_dispatch(event: Self::Event, args: Vec<Self::Arg>) -> Self;
}

/// The plain call context: the event and the caller's arguments
#[derive(Clone, Debug, PartialEq)]
pub struct EventData<E, A = ()> {
    pub event: E,
    pub args: Vec<A>,
}

impl<E, A> CallContext for EventData<E, A> {
    type Event = E;
    type Arg = A;

    fn from_dispatch(event: E, args: Vec<A>) -> Self {
        Self { event, args }
    }
}

/// Shared state plus an ordered middleware chain
pub struct EventProcessor<C> {
    state: RefCell<State>,
    chain: RefCell<Vec<BoxedMiddleware<C>>>,
    faults: Rc<dyn FaultPolicy>,
    depth: Cell<usize>,
}

impl<C> EventProcessor<C> {
    /// Create a processor with empty state
    ///
    /// The fault policy follows the process-wide [`FaultMode`](crate::fault::FaultMode).
    /// In production mode faults are queued on the current thread and the
    /// host must drain them each turn with
    /// [`surface_deferred`](crate::fault::surface_deferred) or
    /// [`take_deferred`](crate::fault::take_deferred). The queue is unbounded
    /// and logs a warning every
    /// [`PENDING_WARN_THRESHOLD`](crate::fault::PENDING_WARN_THRESHOLD) undrained faults.
    pub fn new() -> Self {
        Self::with_state(State::new())
    }

    /// Create a processor seeded with initial state
    pub fn with_state(state: State) -> Self {
        Self {
            state: RefCell::new(state),
            chain: RefCell::new(Vec::new()),
            faults: fault::policy(),
            depth: Cell::new(0),
        }
    }

    /// Replace the fault policy chosen from the process-wide mode
    pub fn with_fault_policy(mut self, policy: impl FaultPolicy + 'static) -> Self {
        self.faults = Rc::new(policy);
        self
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Get a clone of the value at `key`
    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.state.borrow().get(key)
    }

    /// Replace the value at `key`
    pub fn set<T: 'static>(&self, key: impl Into<String>, value: T) -> &Self {
        self.state.borrow_mut().insert(key, value);
        self
    }

    /// Replace the value at `key` with `f(current)`
    ///
    /// `f` runs exactly once, with no borrow of the state held, so it may
    /// itself use the processor.
    pub fn update<T, F>(&self, key: &str, f: F) -> &Self
    where
        T: Clone + 'static,
        F: FnOnce(Option<T>) -> T,
    {
        let current = self.get::<T>(key);
        let next = f(current);
        self.set(key, next)
    }

    /// Remove the value at `key` (no-op if absent)
    pub fn delete(&self, key: &str) -> &Self {
        self.state.borrow_mut().remove(key);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.borrow().contains(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.borrow().keys()
    }

    /// Number of state entries
    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Borrow the value at `key` for the duration of `f`
    ///
    /// `f` must not touch the processor's state.
    pub fn read<T: 'static, R>(&self, key: &str, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.state.borrow().get_ref::<T>(key).map(f)
    }

    /// Mutate the value at `key` in place, inserting `T::default()` first if
    /// needed
    ///
    /// `f` must not touch the processor's state.
    pub fn modify<T: Default + 'static, R>(&self, key: &str, f: impl FnOnce(&mut T) -> R) -> R {
        self.state.borrow_mut().with_default(key, f)
    }

    // =========================================================================
    // Middleware
    // =========================================================================

    /// Append a middleware to the chain
    pub fn use_middleware(&self, middleware: impl Middleware<C> + 'static) -> &Self {
        self.chain.borrow_mut().push(Rc::new(middleware));
        self
    }

    /// Append a closure middleware to the chain
    pub fn use_fn<F>(&self, f: F) -> &Self
    where
        F: Fn(Next<'_, C>, &mut C, &EventProcessor<C>) -> Result<()> + 'static,
    {
        self.use_middleware(MiddlewareFn(f))
    }

    /// Append several middleware, keeping their order
    pub fn use_all<I>(&self, middleware: I) -> &Self
    where
        I: IntoIterator<Item = BoxedMiddleware<C>>,
    {
        self.chain.borrow_mut().extend(middleware);
        self
    }

    pub fn middleware_count(&self) -> usize {
        self.chain.borrow().len()
    }

    /// Current dispatch nesting (0 outside of any dispatch)
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatch an event with caller arguments through the chain
    pub fn dispatch<I>(&self, event: C::Event, args: I)
    where
        C: CallContext,
        I: IntoIterator<Item = C::Arg>,
    {
        let mut ctx = C::from_dispatch(event, args.into_iter().collect());
        self.dispatch_context(&mut ctx);
    }

    /// Dispatch an event without caller arguments
    pub fn emit(&self, event: C::Event)
    where
        C: CallContext,
    {
        self.dispatch(event, std::iter::empty());
    }

    /// Thread an already-built call context through the chain
    ///
    /// A middleware fault stops the chain and goes to the fault policy; this
    /// method always returns normally.
    pub fn dispatch_context(&self, ctx: &mut C) {
        // Middleware added while dispatching only sees later events
        let chain: Vec<BoxedMiddleware<C>> = self.chain.borrow().clone();
        let depth = self.depth.get();
        self.depth.set(depth + 1);
        tracing::trace!(depth, middleware = chain.len(), "dispatch");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| Next::new(&chain, self).proceed(ctx)));

        self.depth.set(depth);
        let fault = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(error)) => error,
            Err(payload) => DispatchError::Panicked(PanicPayload::new(payload)),
        };
        self.faults.handle(fault);
    }
}

impl<C> Default for EventProcessor<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventProcessor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventProcessor")
            .field("state", &self.state.borrow())
            .field("middleware", &self.middleware_count())
            .field("depth", &self.depth.get())
            .finish()
    }
}
