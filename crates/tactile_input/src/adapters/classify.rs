//! Device and event type classification

use tactile_core::{EventProcessor, Middleware, Next, Result};

use crate::data::{DeviceType, Event, EventType, RichEventData};
use crate::input::{InputEvent, KeyState, MouseEvent, TouchEvent};

/// Annotates `device` and `event_type` from the host event
///
/// Must run before the adapters. Gesture events are left untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Classify;

/// The device and abstract event type of a host input event
pub fn classify_input(input: &InputEvent) -> (DeviceType, EventType) {
    match input {
        InputEvent::Mouse(mouse) => {
            let event_type = match mouse {
                MouseEvent::ButtonPressed { .. } => EventType::Start,
                MouseEvent::Moved { .. } => EventType::Move,
                MouseEvent::ButtonReleased { .. } | MouseEvent::Left => EventType::End,
            };
            (DeviceType::Mouse, event_type)
        }
        InputEvent::Touch(touch) => {
            let event_type = match touch {
                TouchEvent::Started { .. } => EventType::Start,
                TouchEvent::Moved { .. } => EventType::Move,
                TouchEvent::Ended { .. } | TouchEvent::Cancelled { .. } => EventType::End,
            };
            (DeviceType::Touch, event_type)
        }
        InputEvent::Keyboard(key) => {
            let event_type = match key.state {
                KeyState::Pressed => EventType::Down,
                KeyState::Released => EventType::Up,
            };
            (DeviceType::Key, event_type)
        }
        InputEvent::Scroll { .. } => (DeviceType::Wheel, EventType::Wheel),
    }
}

impl<ID> Middleware<RichEventData<ID>> for Classify {
    fn handle(
        &self,
        next: Next<'_, RichEventData<ID>>,
        ctx: &mut RichEventData<ID>,
        _processor: &EventProcessor<RichEventData<ID>>,
    ) -> Result<()> {
        if let Event::Input(host) = &ctx.event {
            let (device, event_type) = classify_input(&host.input);
            ctx.device = Some(device);
            ctx.event_type = Some(event_type);
        }
        next.proceed(ctx)
    }
}
