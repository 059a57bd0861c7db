//! Tactile Input
//!
//! Canonical pointers and multi-contact transform gestures on top of the
//! [`tactile_core`] event processor.
//!
//! A typical chain runs the device adapters first, then the [`Gesturizer`],
//! then application middleware:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use tactile_input::prelude::*;
//!
//! let processor = InputProcessor::<&str>::new();
//! let names = Rc::new(RefCell::new(Vec::new()));
//!
//! processor
//!     .use_all(default_adapters(false))
//!     .use_middleware(Gesturizer::default());
//!
//! let seen = Rc::clone(&names);
//! processor.use_fn(move |next, ctx, _| {
//!     if let Event::Gesture(gesture) = &ctx.event {
//!         seen.borrow_mut().push(gesture.kind.name());
//!     }
//!     next.proceed(ctx)
//! });
//!
//! let touch = |event| Event::Input(HostEvent::new(InputEvent::Touch(event), 0.0));
//! processor.dispatch(
//!     touch(TouchEvent::Started { id: 1, kind: ContactKind::Finger, x: 0.0, y: 0.0, pressure: 0.5 }),
//!     ["photo"],
//! );
//! processor.emit(touch(TouchEvent::Moved { id: 1, x: 8.0, y: 2.0, pressure: 0.5 }));
//! processor.emit(touch(TouchEvent::Ended { id: 1, x: 8.0, y: 2.0 }));
//!
//! assert_eq!(*names.borrow(), ["gesturestart", "gesturemove", "gestureend"]);
//! ```

pub mod adapters;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod gesturizer;
pub mod input;
pub mod mapper;
pub mod pointer;
pub mod transform;

pub use adapters::{default_adapters, Classify, KeyAdapter, PointerAdapter, WheelAdapter};
pub use config::GesturizerConfig;
pub use data::{Action, DeviceType, Event, EventType, InputProcessor, RichEventData};
pub use error::{InputError, Result};
pub use geometry::{Affine2D, Point, Transform, Vec2};
pub use gesture::{GestureContext, GestureEvent, GestureEventKind, TransformGesture};
pub use gesturizer::{filter_pointers, Gesturizer};
pub use mapper::{map_mouse, MouseMap};
pub use pointer::{DeviceMetadata, EntityId, Pointer, PointerDetail, PointerKey};
pub use transform::TransformData;

/// Prelude for building an input chain
pub mod prelude {
    pub use crate::adapters::{default_adapters, Classify, KeyAdapter, PointerAdapter, WheelAdapter};
    pub use crate::config::GesturizerConfig;
    pub use crate::data::{Action, DeviceType, Event, EventType, InputProcessor, RichEventData};
    pub use crate::geometry::{Point, Transform};
    pub use crate::gesture::{GestureEvent, GestureEventKind};
    pub use crate::gesturizer::Gesturizer;
    pub use crate::input::{
        ContactKind, HostEvent, InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton,
        MouseEvent, TouchEvent,
    };
    pub use crate::mapper::{map_mouse, MouseMap};
    pub use crate::pointer::PointerKey;
    pub use crate::transform::TransformData;
    pub use tactile_core::{DispatchError, EventProcessor, Middleware, Next};
}
