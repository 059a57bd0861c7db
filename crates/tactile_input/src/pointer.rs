//! Canonical, device-agnostic pointer records
//!
//! A [`Pointer`] stands for one active physical contact: the mouse, a finger or
//! a pen. It is created when the contact starts, shared as an `Rc` between the
//! `"pointers"` state map and the call contexts of the events it takes part
//! in, and dropped from the map when the contact ends.
//!
//! The record itself is never replaced while the contact lives. Updates only
//! swap its [`PointerDetail`], so `Rc::ptr_eq` tells "the same contact,
//! updated" apart from "a new contact".

use std::cell::Cell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::data::DeviceType;
use crate::geometry::Point;
use crate::input::{MouseButton, Modifiers};

/// Application-defined key of the entity a contact manipulates
pub trait EntityId: Clone + Eq + Hash + fmt::Debug + 'static {}

impl<T> EntityId for T where T: Clone + Eq + Hash + fmt::Debug + 'static {}

/// Slot of a pointer in the shared pointer map
///
/// There is one slot for the mouse and one per touch or pen identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKey {
    Mouse,
    Touch(u64),
    Pen(u64),
}

/// Per-update pointer state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerDetail {
    pub key: PointerKey,
    pub position: Point,
    /// Contact pressure (0.0 - 1.0); mouse pointers report 1.0 while a button is held
    pub pressure: f32,
    /// Milliseconds on the host clock
    pub timestamp: f64,
}

/// Immutable facts captured when the contact started
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceMetadata {
    pub device: DeviceType,
    pub start_time: f64,
    /// The mouse button that started the contact
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
}

/// One active contact
pub struct Pointer<ID> {
    id: Option<ID>,
    detail: Cell<PointerDetail>,
    device: DeviceMetadata,
}

impl<ID> Pointer<ID> {
    pub fn new(id: Option<ID>, detail: PointerDetail, device: DeviceMetadata) -> Self {
        Self {
            id,
            detail: Cell::new(detail),
            device,
        }
    }

    /// The entity this contact manipulates (None for unidentified contacts)
    pub fn id(&self) -> Option<&ID> {
        self.id.as_ref()
    }

    pub fn detail(&self) -> PointerDetail {
        self.detail.get()
    }

    /// Replace the detail in place
    pub fn set_detail(&self, detail: PointerDetail) {
        self.detail.set(detail);
    }

    pub fn device(&self) -> &DeviceMetadata {
        &self.device
    }

    pub fn key(&self) -> PointerKey {
        self.detail.get().key
    }

    pub fn position(&self) -> Point {
        self.detail.get().position
    }
}

impl<ID: fmt::Debug> fmt::Debug for Pointer<ID> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pointer")
            .field("id", &self.id)
            .field("detail", &self.detail.get())
            .field("device", &self.device)
            .finish()
    }
}

/// The shared pointer map, in contact start order
pub type Pointers<ID> = IndexMap<PointerKey, Rc<Pointer<ID>>>;
