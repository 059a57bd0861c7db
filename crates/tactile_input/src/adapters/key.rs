//! Keyboard adapter

use indexmap::IndexSet;
use tactile_core::{keys, EventProcessor, Middleware, Next, Result};

use crate::data::{DeviceType, Event, EventType, RichEventData};
use crate::input::{InputEvent, Key};

/// Keys currently held down, in press order
pub type PressedKeys = IndexSet<Key>;

/// Tracks pressed keys in the `"keys"` state
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyAdapter {
    cmd_is_ctrl: bool,
}

impl KeyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the Meta (Command) key as Ctrl
    pub fn cmd_is_ctrl(mut self, enabled: bool) -> Self {
        self.cmd_is_ctrl = enabled;
        self
    }

    fn normalize(&self, key: &Key) -> Key {
        match key {
            Key::Meta if self.cmd_is_ctrl => Key::Ctrl,
            other => other.clone(),
        }
    }
}

impl<ID> Middleware<RichEventData<ID>> for KeyAdapter {
    fn handle(
        &self,
        next: Next<'_, RichEventData<ID>>,
        ctx: &mut RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) -> Result<()> {
        if ctx.device == Some(DeviceType::Key) {
            if let Event::Input(host) = &ctx.event {
                if let InputEvent::Keyboard(keyboard) = &host.input {
                    let key = self.normalize(&keyboard.key);
                    match ctx.event_type {
                        Some(EventType::Down) => processor.modify(keys::KEYS, |pressed: &mut PressedKeys| {
                            pressed.insert(key);
                        }),
                        Some(EventType::Up) => processor.modify(keys::KEYS, |pressed: &mut PressedKeys| {
                            pressed.shift_remove(&key);
                        }),
                        _ => {}
                    }
                }
            }
        }
        next.proceed(ctx)
    }
}
