//! Mouse and touch adapter
//!
//! Turns mouse and touch host events into canonical [`Pointer`]s. A contact
//! starts on the entity named by the first caller argument; the pointer is
//! stored in the shared `"pointers"` map under its [`PointerKey`] and updated
//! in place until the contact ends.

use std::marker::PhantomData;
use std::rc::Rc;

use tactile_core::{keys, EventProcessor, Middleware, Next, Result};

use crate::data::{DeviceType, Event, EventType, RichEventData};
use crate::geometry::Point;
use crate::input::{ContactKind, InputEvent, Modifiers, MouseButton, MouseEvent, TouchEvent};
use crate::pointer::{DeviceMetadata, EntityId, Pointer, PointerDetail, PointerKey, Pointers};

/// What a single mouse or touch event tells about its contact
#[derive(Clone, Copy, Debug)]
struct Contact {
    key: PointerKey,
    device: DeviceType,
    /// None when the event carries no position (mouse leave, touch cancel)
    position: Option<Point>,
    pressure: f32,
    button: Option<MouseButton>,
    modifiers: Modifiers,
    timestamp: f64,
}

impl Contact {
    fn from_input(input: &InputEvent, timestamp: f64) -> Option<Self> {
        match input {
            InputEvent::Mouse(mouse) => Some(Self {
                key: PointerKey::Mouse,
                device: DeviceType::Mouse,
                position: mouse.position(),
                pressure: match mouse {
                    MouseEvent::ButtonReleased { .. } | MouseEvent::Left => 0.0,
                    _ => 1.0,
                },
                button: mouse.button(),
                modifiers: mouse.modifiers(),
                timestamp,
            }),
            InputEvent::Touch(touch) => {
                let key = match touch {
                    TouchEvent::Started {
                        kind: ContactKind::Pen, ..
                    } => PointerKey::Pen(touch.id()),
                    _ => PointerKey::Touch(touch.id()),
                };
                Some(Self {
                    key,
                    device: DeviceType::Touch,
                    position: touch.position(),
                    pressure: touch.pressure(),
                    button: None,
                    modifiers: Modifiers::default(),
                    timestamp,
                })
            }
            InputEvent::Keyboard(_) | InputEvent::Scroll { .. } => None,
        }
    }

    fn detail(&self, key: PointerKey, fallback: Point) -> PointerDetail {
        PointerDetail {
            key,
            position: self.position.unwrap_or(fallback),
            pressure: self.pressure,
            timestamp: self.timestamp,
        }
    }

    fn pointer<ID>(&self, id: Option<ID>) -> Pointer<ID> {
        Pointer::new(
            id,
            self.detail(self.key, Point::ZERO),
            DeviceMetadata {
                device: self.device,
                start_time: self.timestamp,
                button: self.button,
                modifiers: self.modifiers,
            },
        )
    }
}

/// Generates and tracks pointers for mouse and touch events
#[derive(Debug)]
pub struct PointerAdapter<ID> {
    track_unidentified: bool,
    _marker: PhantomData<fn() -> ID>,
}

impl<ID: EntityId> PointerAdapter<ID> {
    pub fn new() -> Self {
        Self {
            track_unidentified: false,
            _marker: PhantomData,
        }
    }

    /// Record contacts not associated to an entity in
    /// `unidentified_pointers`
    pub fn track_unidentified(mut self, track: bool) -> Self {
        self.track_unidentified = track;
        self
    }

    fn adapt(&self, ctx: &mut RichEventData<ID>, processor: &EventProcessor<RichEventData<ID>>) {
        if !matches!(ctx.device, Some(DeviceType::Mouse | DeviceType::Touch)) {
            return;
        }
        let Event::Input(host) = &ctx.event else {
            return;
        };
        let Some(contact) = Contact::from_input(&host.input, host.timestamp) else {
            return;
        };

        if contact.key == PointerKey::Mouse {
            if let Some(position) = contact.position {
                processor.set(keys::MOUSE_POSITION, position);
            }
        }

        match ctx.event_type {
            Some(EventType::Start) => self.start(&contact, ctx, processor),
            Some(event_type @ (EventType::Move | EventType::End)) => {
                self.update(&contact, event_type, ctx, processor)
            }
            _ => {}
        }

        if self.track_unidentified && ctx.ids.is_none() {
            ctx.prevent_default();
            ctx.unidentified_pointers = Some(vec![contact.pointer(None)]);
        }
    }

    fn start(
        &self,
        contact: &Contact,
        ctx: &mut RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) {
        let Some(id) = ctx.args.first().cloned() else {
            return;
        };
        ctx.prevent_default();

        let pointer = Rc::new(contact.pointer(Some(id.clone())));
        processor.modify(keys::POINTERS, |pointers: &mut Pointers<ID>| {
            if pointers.insert(contact.key, Rc::clone(&pointer)).is_some() {
                tracing::trace!(key = ?contact.key, "pointer restarted before it ended");
            }
        });
        tracing::trace!(?id, key = ?contact.key, "pointer start");

        ctx.ids = Some(vec![id]);
        ctx.pointers = Some(vec![pointer]);
    }

    fn update(
        &self,
        contact: &Contact,
        event_type: EventType,
        ctx: &mut RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) {
        let found = processor
            .read(keys::POINTERS, |pointers: &Pointers<ID>| lookup(pointers, contact.key))
            .flatten();
        let Some((key, pointer)) = found else {
            return;
        };
        ctx.prevent_default();

        pointer.set_detail(contact.detail(key, pointer.position()));
        if event_type == EventType::End {
            processor.modify(keys::POINTERS, |pointers: &mut Pointers<ID>| {
                pointers.shift_remove(&key);
            });
            tracing::trace!(key = ?key, "pointer end");
        }

        ctx.ids = Some(pointer.id().cloned().into_iter().collect());
        ctx.pointers = Some(vec![pointer]);
    }
}

/// Find the stored pointer for `key`
///
/// Only touch start events tell a pen from a finger, so later events of a
/// pen contact arrive with a touch key.
fn lookup<ID>(pointers: &Pointers<ID>, key: PointerKey) -> Option<(PointerKey, Rc<Pointer<ID>>)> {
    let find = |key: PointerKey| pointers.get(&key).map(|pointer| (key, Rc::clone(pointer)));
    match key {
        PointerKey::Touch(id) | PointerKey::Pen(id) => {
            find(PointerKey::Touch(id)).or_else(|| find(PointerKey::Pen(id)))
        }
        PointerKey::Mouse => find(PointerKey::Mouse),
    }
}

impl<ID: EntityId> Default for PointerAdapter<ID> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ID: EntityId> Middleware<RichEventData<ID>> for PointerAdapter<ID> {
    fn handle(
        &self,
        next: Next<'_, RichEventData<ID>>,
        ctx: &mut RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) -> Result<()> {
        self.adapt(ctx, processor);
        next.proceed(ctx)
    }
}
