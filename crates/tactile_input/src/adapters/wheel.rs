//! Wheel adapter
//!
//! Wheel events carry no position, so the adapter places them at the last
//! mouse position recorded by the [`PointerAdapter`](super::PointerAdapter).
//! They target the entity of the active mouse pointer, or the first caller
//! argument when no mouse contact is down.

use std::marker::PhantomData;
use std::rc::Rc;

use tactile_core::{keys, EventProcessor, Middleware, Next, Result};

use crate::data::{DeviceType, Event, RichEventData};
use crate::geometry::Point;
use crate::input::InputEvent;
use crate::pointer::{DeviceMetadata, EntityId, Pointer, PointerDetail, PointerKey, Pointers};

/// Annotates wheel events with a position and target ids
#[derive(Debug)]
pub struct WheelAdapter<ID> {
    _marker: PhantomData<fn() -> ID>,
}

impl<ID: EntityId> WheelAdapter<ID> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<ID: EntityId> Default for WheelAdapter<ID> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ID: EntityId> Middleware<RichEventData<ID>> for WheelAdapter<ID> {
    fn handle(
        &self,
        next: Next<'_, RichEventData<ID>>,
        ctx: &mut RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) -> Result<()> {
        let scroll = match (&ctx.device, &ctx.event) {
            (Some(DeviceType::Wheel), Event::Input(host)) => match &host.input {
                InputEvent::Scroll { modifiers, .. } => Some((host.timestamp, *modifiers)),
                _ => None,
            },
            _ => None,
        };
        let Some((timestamp, modifiers)) = scroll else {
            return next.proceed(ctx);
        };

        let mouse_owner = processor
            .read(keys::POINTERS, |pointers: &Pointers<ID>| {
                pointers.get(&PointerKey::Mouse).and_then(|p| p.id().cloned())
            })
            .flatten();
        let id = mouse_owner.or_else(|| ctx.args.first().cloned());
        let position = processor.get::<Point>(keys::MOUSE_POSITION).unwrap_or_default();

        let pointer = Pointer::new(
            id.clone(),
            PointerDetail {
                key: PointerKey::Mouse,
                position,
                pressure: 0.0,
                timestamp,
            },
            DeviceMetadata {
                device: DeviceType::Wheel,
                start_time: timestamp,
                button: None,
                modifiers,
            },
        );

        if let Some(id) = id {
            ctx.ids = Some(vec![id]);
        }
        ctx.pointers = Some(vec![Rc::new(pointer)]);
        next.proceed(ctx)
    }
}
