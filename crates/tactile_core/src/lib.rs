//! Tactile Core
//!
//! This crate provides the device-independent event engine the Tactile input
//! pipeline is built on:
//!
//! - **State**: a schema-less, type-erased key-value map owned by each processor
//! - **Middleware**: an ordered, onion-style chain with explicit continuations
//! - **Fault Policy**: isolation of failing middleware, reported in development
//!   and deferred in production
//!
//! # Example
//!
//! ```rust
//! use tactile_core::{EventData, EventProcessor};
//!
//! let processor = EventProcessor::<EventData<&str>>::new();
//!
//! let value = processor
//!     .set("key", 0)
//!     .update("key", |v: Option<i32>| v.unwrap_or(0) + 1)
//!     .update("key", |v: Option<i32>| v.unwrap_or(0) + 1)
//!     .get::<i32>("key");
//!
//! assert_eq!(value, Some(2));
//! ```

pub mod error;
pub mod fault;
pub mod middleware;
pub mod processor;
pub mod state;

pub use error::{DispatchError, PanicPayload, Result};
pub use fault::{DeferFaults, FaultMode, FaultPolicy, ReportFaults};
pub use middleware::{BoxedMiddleware, Middleware, MiddlewareFn, Next};
pub use processor::{CallContext, EventData, EventProcessor};
pub use state::{keys, State};
