//! The rich call context threaded through the input middleware chain
//!
//! Adapters annotate each dispatched host event with the device that issued
//! it, its abstract lifecycle phase, the entities it targets and the pointers
//! it produced. Everything downstream (gesturizer, mappers, application
//! middleware) reads those annotations instead of the raw host event.

use std::rc::Rc;

use indexmap::IndexMap;
use tactile_core::{CallContext, EventProcessor};

use crate::gesture::GestureEvent;
use crate::input::HostEvent;
use crate::pointer::Pointer;

/// Devices that can dispatch events to the middleware chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Key,
    Mouse,
    Touch,
    Wheel,
}

/// Abstract event types giving different devices a uniform interface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Key released
    Up,
    /// Key pressed
    Down,
    /// A pointer contact started
    Start,
    /// A pointer contact moved
    Move,
    /// A pointer contact ended or was cancelled
    End,
    Wheel,
}

/// An application-defined action triggered by an event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Action {
    pub kind: String,
    pub params: IndexMap<String, String>,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: IndexMap::new(),
        }
    }

    /// Builder-style parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Events travelling through the chain
#[derive(Clone, Debug)]
pub enum Event<ID> {
    /// A raw host event
    Input(HostEvent),
    /// A synthetic gesture lifecycle event
    Gesture(GestureEvent<ID>),
}

impl<ID> Event<ID> {
    pub fn as_input(&self) -> Option<&HostEvent> {
        match self {
            Event::Input(host) => Some(host),
            Event::Gesture(_) => None,
        }
    }

    pub fn as_gesture(&self) -> Option<&GestureEvent<ID>> {
        match self {
            Event::Gesture(gesture) => Some(gesture),
            Event::Input(_) => None,
        }
    }
}

/// Call context annotated by the input adapters
#[derive(Debug)]
pub struct RichEventData<ID> {
    pub event: Event<ID>,
    /// Caller arguments; the first one names the entity a contact starts on
    pub args: Vec<ID>,
    /// The device that issued the event (set by `Classify`)
    pub device: Option<DeviceType>,
    /// The abstract event type (set by `Classify`)
    pub event_type: Option<EventType>,
    /// The entities this event targets (set by the device's adapter)
    pub ids: Option<Vec<ID>>,
    /// The pointers produced by this event (set by the device's adapter)
    pub pointers: Option<Vec<Rc<Pointer<ID>>>>,
    /// Pointers not associated to any entity, when tracked
    pub unidentified_pointers: Option<Vec<Pointer<ID>>>,
    /// Actions generated by mappers or custom middleware
    pub actions: Option<Vec<Action>>,
    /// Set by adapters that consumed the host event
    pub default_prevented: bool,
}

impl<ID> RichEventData<ID> {
    pub fn new(event: Event<ID>, args: Vec<ID>) -> Self {
        Self {
            event,
            args,
            device: None,
            event_type: None,
            ids: None,
            pointers: None,
            unidentified_pointers: None,
            actions: None,
            default_prevented: false,
        }
    }

    pub fn push_action(&mut self, action: Action) {
        self.actions.get_or_insert_with(Vec::new).push(action);
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

impl<ID> CallContext for RichEventData<ID> {
    type Event = Event<ID>;
    type Arg = ID;

    fn from_dispatch(event: Event<ID>, args: Vec<ID>) -> Self {
        Self::new(event, args)
    }
}

/// Processor running the rich input chain
pub type InputProcessor<ID> = EventProcessor<RichEventData<ID>>;
