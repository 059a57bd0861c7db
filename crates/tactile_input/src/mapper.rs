//! Mouse interaction mapping
//!
//! Turns mouse button presses and releases into application [`Action`]s.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tactile_core::{EventProcessor, Middleware, Next, Result};

use crate::data::{Action, DeviceType, Event, EventType, RichEventData};
use crate::input::{InputEvent, MouseButton};

/// Produces the action for a mapped interaction, if any
pub type ActionFn<ID> = Rc<dyn Fn(&RichEventData<ID>) -> Option<Action>>;

/// Mouse button to action table
pub struct MouseMap<ID> {
    entries: FxHashMap<MouseButton, ActionFn<ID>>,
}

impl<ID> MouseMap<ID> {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Map `button` to the action returned by `f`
    pub fn on<F>(mut self, button: MouseButton, f: F) -> Self
    where
        F: Fn(&RichEventData<ID>) -> Option<Action> + 'static,
    {
        self.entries.insert(button, Rc::new(f));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<ID> Default for MouseMap<ID> {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware appending mapped actions to `ctx.actions`
pub struct MouseMapper<ID> {
    map: MouseMap<ID>,
    filter: Option<SmallVec<[EventType; 2]>>,
}

/// Map mouse starts and ends through `map`, optionally only for the event
/// types in `filter`
///
/// Moves are never mapped.
pub fn map_mouse<ID, I>(map: MouseMap<ID>, filter: Option<I>) -> MouseMapper<ID>
where
    I: IntoIterator<Item = EventType>,
{
    MouseMapper {
        map,
        filter: filter.map(|types| types.into_iter().collect()),
    }
}

impl<ID> MouseMapper<ID> {
    fn matches(&self, event_type: EventType) -> bool {
        event_type != EventType::Move
            && self
                .filter
                .as_ref()
                .map_or(true, |types| types.contains(&event_type))
    }

    fn button(ctx: &RichEventData<ID>) -> Option<MouseButton> {
        match &ctx.event {
            Event::Input(host) => match &host.input {
                InputEvent::Mouse(mouse) => mouse.button(),
                _ => None,
            },
            Event::Gesture(_) => None,
        }
    }
}

impl<ID> fmt::Debug for MouseMapper<ID> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MouseMapper")
            .field("buttons", &self.map.len())
            .field("filter", &self.filter)
            .finish()
    }
}

impl<ID> Middleware<RichEventData<ID>> for MouseMapper<ID> {
    fn handle(
        &self,
        next: Next<'_, RichEventData<ID>>,
        ctx: &mut RichEventData<ID>,
        _processor: &EventProcessor<RichEventData<ID>>,
    ) -> Result<()> {
        let mapped = match (ctx.device, ctx.event_type) {
            (Some(DeviceType::Mouse), Some(event_type)) if self.matches(event_type) => {
                Self::button(ctx).and_then(|button| self.map.entries.get(&button).cloned())
            }
            _ => None,
        };
        if let Some(action) = mapped.and_then(|f| f(&*ctx)) {
            ctx.push_action(action);
        }
        next.proceed(ctx)
    }
}
