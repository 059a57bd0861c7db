//! Device adapters
//!
//! Middleware that annotates the rich call context from raw host events:
//!
//! - [`Classify`]: the issuing device and abstract event type
//! - [`PointerAdapter`]: canonical pointers for mouse and touch contacts
//! - [`KeyAdapter`]: the set of pressed keys
//! - [`WheelAdapter`]: position and targets of wheel events
//!
//! Adapters only annotate and always continue the chain.

mod classify;
mod key;
mod pointer;
mod wheel;

use std::rc::Rc;

use tactile_core::BoxedMiddleware;

pub use classify::{classify_input, Classify};
pub use key::{KeyAdapter, PressedKeys};
pub use pointer::PointerAdapter;
pub use wheel::WheelAdapter;

use crate::data::RichEventData;
use crate::pointer::EntityId;

/// The standard adapter stack, classifier first
pub fn default_adapters<ID: EntityId>(track_unidentified: bool) -> Vec<BoxedMiddleware<RichEventData<ID>>> {
    let mut adapters: Vec<BoxedMiddleware<RichEventData<ID>>> = Vec::with_capacity(4);
    adapters.push(Rc::new(Classify));
    adapters.push(Rc::new(KeyAdapter::new().cmd_is_ctrl(true)));
    adapters.push(Rc::new(PointerAdapter::new().track_unidentified(track_unidentified)));
    adapters.push(Rc::new(WheelAdapter::new()));
    adapters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_adapters() {
        let adapters = default_adapters::<u32>(false);
        assert_eq!(adapters.len(), 4);
    }
}
