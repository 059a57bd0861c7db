//! Gesturizer middleware
//!
//! Folds the shared pointer set into one [`TransformGesture`] per entity and
//! emits `gesturestart`, `gesturemove` and `gestureend` events through the
//! same processor. It reads the annotations written by the adapters
//! (`event_type`, `ids`, `pointers`) and the shared `"pointers"` map, and
//! keeps its own records under `"gestures"`.
//!
//! Per entity, a gesture is either absent or active:
//!
//! - **start**: creates a gesture from the entity's pointers. If one is
//!   already active, a new contact joined: the gesture is split (ended and
//!   restarted) or rebased in place depending on
//!   [`GesturizerConfig::split_on_pointer_set_change`].
//! - **move**: retargets the active gesture.
//! - **end**: retargets the gesture with the contacts that just ended plus
//!   those still down. If some remain it is split or rebased, otherwise it
//!   ends and is removed.
//!
//! Moves and ends for entities without a gesture, and starts with no
//! matching pointers, are dropped silently.

use std::fmt;
use std::rc::Rc;

use tactile_core::{keys, EventProcessor, Middleware, Next, Result};

use crate::config::GesturizerConfig;
use crate::data::{Event, EventType, RichEventData};
use crate::gesture::{GestureEvent, GestureEventKind, Gestures, TransformGesture};
use crate::pointer::{EntityId, Pointer, Pointers};
use crate::transform::TransformData;

/// Predicate deciding whether a pointer takes part in gestures
pub type PointerFilter<ID> = Rc<dyn Fn(&Pointer<ID>, &RichEventData<ID>) -> bool>;

/// The pointers in `pointers` that belong to `id` and pass `predicate`
pub fn filter_pointers<ID, F>(pointers: &[Rc<Pointer<ID>>], id: &ID, predicate: F) -> Vec<Rc<Pointer<ID>>>
where
    ID: PartialEq,
    F: Fn(&Pointer<ID>) -> bool,
{
    pointers
        .iter()
        .filter(|pointer| {
            let pointer: &Pointer<ID> = pointer;
            pointer.id() == Some(id) && predicate(pointer)
        })
        .cloned()
        .collect()
}

/// Middleware managing transform gestures
pub struct Gesturizer<ID> {
    config: GesturizerConfig,
    filter: Option<PointerFilter<ID>>,
}

impl<ID: EntityId> Gesturizer<ID> {
    pub fn new(config: GesturizerConfig) -> Self {
        Self {
            config,
            filter: None,
        }
    }

    /// Only count pointers for which `filter` returns true
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Pointer<ID>, &RichEventData<ID>) -> bool + 'static,
    {
        self.filter = Some(Rc::new(filter));
        self
    }

    pub fn config(&self) -> &GesturizerConfig {
        &self.config
    }

    fn process(&self, ctx: &RichEventData<ID>, processor: &EventProcessor<RichEventData<ID>>) {
        let (Some(ids), Some(_)) = (ctx.ids.as_ref(), ctx.pointers.as_ref()) else {
            return;
        };
        let Some(shared) = processor.read(keys::POINTERS, |pointers: &Pointers<ID>| {
            pointers.values().cloned().collect::<Vec<_>>()
        }) else {
            return;
        };

        match ctx.event_type {
            Some(EventType::Start) => ids.iter().for_each(|id| self.start(id, &shared, ctx, processor)),
            Some(EventType::Move) => ids.iter().for_each(|id| self.retarget(id, &shared, ctx, processor)),
            Some(EventType::End) => ids.iter().for_each(|id| self.end(id, &shared, ctx, processor)),
            _ => {}
        }
    }

    fn start(
        &self,
        id: &ID,
        shared: &[Rc<Pointer<ID>>],
        ctx: &RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) {
        let pointers = self.pointers_for(shared, id, ctx);
        if pointers.is_empty() {
            tracing::trace!(?id, "start without matching pointers");
            return;
        }
        let snapshot = TransformData::from_pointers(&pointers);

        match load(processor, id) {
            None => begin(id, snapshot, processor),
            Some(gesture) if self.config.split_on_pointer_set_change => {
                tracing::debug!(?id, pointers = pointers.len(), "gesture split on join");
                emit(processor, GestureEventKind::End, &gesture);
                discard(processor, id);
                begin(id, snapshot, processor);
            }
            Some(mut gesture) => {
                tracing::debug!(?id, pointers = pointers.len(), "gesture rebased on join");
                gesture.rebase(snapshot);
                store(processor, gesture);
            }
        }
    }

    fn retarget(
        &self,
        id: &ID,
        shared: &[Rc<Pointer<ID>>],
        ctx: &RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) {
        let Some(mut gesture) = load(processor, id) else {
            tracing::trace!(?id, "move without gesture");
            return;
        };
        let pointers = self.pointers_for(shared, id, ctx);
        if pointers.is_empty() {
            return;
        }

        gesture.set_target(TransformData::from_pointers(&pointers));
        store(processor, gesture.clone());
        emit(processor, GestureEventKind::Move, &gesture);
    }

    fn end(
        &self,
        id: &ID,
        shared: &[Rc<Pointer<ID>>],
        ctx: &RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) {
        let Some(mut gesture) = load(processor, id) else {
            tracing::trace!(?id, "end without gesture");
            return;
        };
        let ended = self.pointers_for(ctx.pointers.as_deref().unwrap_or_default(), id, ctx);
        let remaining = self.pointers_for(shared, id, ctx);

        let mut contributing = ended;
        for pointer in &remaining {
            if !contributing.iter().any(|p| Rc::ptr_eq(p, pointer)) {
                contributing.push(Rc::clone(pointer));
            }
        }
        // Filtered out lifts keep the last target
        if !contributing.is_empty() {
            gesture.set_target(TransformData::from_pointers(&contributing));
        }

        if remaining.is_empty() {
            tracing::debug!(?id, "gesture end");
            discard(processor, id);
            emit(processor, GestureEventKind::End, &gesture);
        } else if self.config.split_on_pointer_set_change {
            tracing::debug!(?id, pointers = remaining.len(), "gesture split on lift");
            store(processor, gesture.clone());
            emit(processor, GestureEventKind::End, &gesture);
            discard(processor, id);
            begin(id, TransformData::from_pointers(&remaining), processor);
        } else {
            tracing::debug!(?id, pointers = remaining.len(), "gesture rebased on lift");
            gesture.rebase(TransformData::from_pointers(&remaining));
            store(processor, gesture);
        }
    }

    fn pointers_for(
        &self,
        pointers: &[Rc<Pointer<ID>>],
        id: &ID,
        ctx: &RichEventData<ID>,
    ) -> Vec<Rc<Pointer<ID>>> {
        filter_pointers(pointers, id, |pointer| {
            self.filter.as_ref().map_or(true, |filter| filter(pointer, ctx))
        })
    }
}

impl<ID: EntityId> Default for Gesturizer<ID> {
    fn default() -> Self {
        Self::new(GesturizerConfig::default())
    }
}

impl<ID> fmt::Debug for Gesturizer<ID> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gesturizer")
            .field("config", &self.config)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl<ID: EntityId> Middleware<RichEventData<ID>> for Gesturizer<ID> {
    fn handle(
        &self,
        next: Next<'_, RichEventData<ID>>,
        ctx: &mut RichEventData<ID>,
        processor: &EventProcessor<RichEventData<ID>>,
    ) -> Result<()> {
        self.process(ctx, processor);
        next.proceed(ctx)
    }
}

fn load<ID: EntityId>(
    processor: &EventProcessor<RichEventData<ID>>,
    id: &ID,
) -> Option<TransformGesture<ID>> {
    processor
        .read(keys::GESTURES, |gestures: &Gestures<ID>| gestures.get(id).cloned())
        .flatten()
}

fn store<ID: EntityId>(processor: &EventProcessor<RichEventData<ID>>, gesture: TransformGesture<ID>) {
    processor.modify(keys::GESTURES, |gestures: &mut Gestures<ID>| {
        gestures.insert(gesture.id().clone(), gesture);
    });
}

fn discard<ID: EntityId>(processor: &EventProcessor<RichEventData<ID>>, id: &ID) {
    processor.modify(keys::GESTURES, |gestures: &mut Gestures<ID>| {
        gestures.remove(id);
    });
}

fn begin<ID: EntityId>(id: &ID, snapshot: TransformData, processor: &EventProcessor<RichEventData<ID>>) {
    debug_assert!(load(processor, id).is_none(), "two live gestures for {id:?}");
    tracing::debug!(?id, pointers = snapshot.pointer_count(), "gesture start");

    let gesture = TransformGesture::new(id.clone(), snapshot);
    store(processor, gesture.clone());
    emit(processor, GestureEventKind::Start, &gesture);
}

fn emit<ID: EntityId>(
    processor: &EventProcessor<RichEventData<ID>>,
    kind: GestureEventKind,
    gesture: &TransformGesture<ID>,
) {
    processor.emit(Event::Gesture(GestureEvent::new(kind, gesture)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::data::{DeviceType, InputProcessor};
    use crate::geometry::Point;
    use crate::input::{HostEvent, InputEvent, Modifiers, TouchEvent};
    use crate::pointer::{DeviceMetadata, PointerDetail, PointerKey};

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPSILON
    }

    fn touch(key: u64, entity: u32, x: f32, y: f32) -> Rc<Pointer<u32>> {
        pointer(PointerKey::Touch(key), entity, x, y)
    }

    fn pen(key: u64, entity: u32, x: f32, y: f32) -> Rc<Pointer<u32>> {
        pointer(PointerKey::Pen(key), entity, x, y)
    }

    fn pointer(key: PointerKey, entity: u32, x: f32, y: f32) -> Rc<Pointer<u32>> {
        Rc::new(Pointer::new(
            Some(entity),
            PointerDetail {
                key,
                position: Point::new(x, y),
                pressure: 0.5,
                timestamp: 0.0,
            },
            DeviceMetadata {
                device: DeviceType::Touch,
                start_time: 0.0,
                button: None,
                modifiers: Modifiers::default(),
            },
        ))
    }

    /// Drives the gesturizer with hand-built adapter annotations
    struct Harness {
        processor: InputProcessor<u32>,
        events: Rc<RefCell<Vec<GestureEvent<u32>>>>,
        after: Rc<RefCell<Vec<Option<EventType>>>>,
    }

    impl Harness {
        fn new(gesturizer: Gesturizer<u32>) -> Self {
            let processor = InputProcessor::new();
            let events = Rc::new(RefCell::new(Vec::new()));
            let after = Rc::new(RefCell::new(Vec::new()));

            processor.use_middleware(gesturizer);
            let e = Rc::clone(&events);
            let a = Rc::clone(&after);
            processor.use_fn(move |next, ctx: &mut RichEventData<u32>, _| {
                match &ctx.event {
                    Event::Gesture(gesture) => e.borrow_mut().push(gesture.clone()),
                    Event::Input(_) => a.borrow_mut().push(ctx.event_type),
                }
                next.proceed(ctx)
            });

            Self {
                processor,
                events,
                after,
            }
        }

        fn split() -> Self {
            Self::new(Gesturizer::default())
        }

        fn rebase() -> Self {
            Self::new(Gesturizer::new(
                GesturizerConfig::new().split_on_pointer_set_change(false),
            ))
        }

        fn send(&self, event_type: EventType, pointers: &[Rc<Pointer<u32>>]) {
            let mut ids: Vec<u32> = Vec::new();
            for pointer in pointers {
                if let Some(id) = pointer.id() {
                    if !ids.contains(id) {
                        ids.push(*id);
                    }
                }
            }

            let host = HostEvent::new(InputEvent::Touch(TouchEvent::Cancelled { id: 0 }), 0.0);
            let mut ctx = RichEventData::new(Event::Input(host), Vec::new());
            ctx.device = Some(DeviceType::Touch);
            ctx.event_type = Some(event_type);
            ctx.ids = Some(ids);
            ctx.pointers = Some(pointers.to_vec());
            self.processor.dispatch_context(&mut ctx);
        }

        fn start(&self, pointers: &[Rc<Pointer<u32>>]) {
            self.processor.modify(keys::POINTERS, |map: &mut Pointers<u32>| {
                for pointer in pointers {
                    map.insert(pointer.key(), Rc::clone(pointer));
                }
            });
            self.send(EventType::Start, pointers);
        }

        fn move_to(&self, pointer: &Rc<Pointer<u32>>, x: f32, y: f32) {
            let mut detail = pointer.detail();
            detail.position = Point::new(x, y);
            pointer.set_detail(detail);
            self.send(EventType::Move, std::slice::from_ref(pointer));
        }

        fn end(&self, pointers: &[Rc<Pointer<u32>>]) {
            self.processor.modify(keys::POINTERS, |map: &mut Pointers<u32>| {
                for pointer in pointers {
                    map.shift_remove(&pointer.key());
                }
            });
            self.send(EventType::End, pointers);
        }

        fn kinds(&self) -> Vec<GestureEventKind> {
            self.events.borrow().iter().map(|e| e.kind).collect()
        }

        fn last(&self) -> GestureEvent<u32> {
            self.events.borrow().last().cloned().expect("no gesture event")
        }

        fn live(&self, id: u32) -> bool {
            self.processor
                .read(keys::GESTURES, |g: &Gestures<u32>| g.contains_key(&id))
                .unwrap_or(false)
        }
    }

    use GestureEventKind::{End, Move, Start};

    #[test]
    fn test_filter_pointers() {
        let pointers = vec![touch(1, 1, 0.0, 0.0), touch(2, 2, 0.0, 0.0), pen(3, 1, 0.0, 0.0)];

        assert_eq!(filter_pointers(&pointers, &1, |_| true).len(), 2);
        assert_eq!(filter_pointers(&pointers, &2, |_| true).len(), 1);
        let fingers = filter_pointers(&pointers, &1, |p| matches!(p.key(), PointerKey::Touch(_)));
        assert_eq!(fingers.len(), 1);
        assert!(Rc::ptr_eq(&fingers[0], &pointers[0]));
    }

    #[test]
    fn test_start_end_without_moves() {
        let h = Harness::split();
        let p1 = touch(1, 7, 10.0, 10.0);
        let p2 = touch(2, 7, 10.0, 10.0);

        h.start(&[p1.clone(), p2.clone()]);
        let start = h.last();
        assert_eq!(start.id, 7);
        assert!(start.transform.is_identity(EPSILON));
        assert!(h.live(7));

        h.end(&[p1, p2]);
        assert_eq!(h.kinds(), vec![Start, End]);
        assert!(!h.live(7));
    }

    #[test]
    fn test_moves_retarget_against_origin() {
        let h = Harness::split();
        let p1 = touch(1, 1, 0.0, 0.0);

        h.start(&[p1.clone()]);
        h.move_to(&p1, 5.0, 0.0);
        h.move_to(&p1, 5.0, 5.0);

        let event = h.last();
        assert_eq!(h.kinds(), vec![Start, Move, Move]);
        assert_eq!(event.origin.centroid(), Point::new(0.0, 0.0));
        assert!(approx_eq(event.transform.translation.x, 5.0));
        assert!(approx_eq(event.transform.translation.y, 5.0));
    }

    #[test]
    fn test_pinch_reports_scale() {
        let h = Harness::split();
        let p1 = touch(1, 1, -1.0, 0.0);
        let p2 = touch(2, 1, 1.0, 0.0);

        h.start(&[p1.clone(), p2.clone()]);
        p1.set_detail(PointerDetail {
            position: Point::new(-3.0, 0.0),
            ..p1.detail()
        });
        h.move_to(&p2, 3.0, 0.0);

        assert!(approx_eq(h.last().transform.scale, 3.0));
    }

    #[test]
    fn test_join_splits_with_fresh_context() {
        let h = Harness::split();
        let p1 = touch(1, 1, 0.0, 0.0);
        let p2 = touch(2, 1, 4.0, 0.0);

        h.start(&[p1]);
        let first = h.last().context;
        first.insert("tool", "lasso".to_string());

        h.start(&[p2]);

        assert_eq!(h.kinds(), vec![Start, End, Start]);
        let events = h.events.borrow();
        assert!(events[1].context.ptr_eq(&first));
        assert!(!events[2].context.ptr_eq(&first));
        assert!(!events[2].context.contains("tool"));
        assert_eq!(events[2].origin.pointer_count(), 2);
    }

    #[test]
    fn test_join_rebases_in_place() {
        let h = Harness::rebase();
        let p1 = touch(1, 1, 0.0, 0.0);
        let p2 = touch(2, 1, 4.0, 0.0);

        h.start(&[p1.clone()]);
        let context = h.last().context;
        h.move_to(&p1, 2.0, 0.0);
        h.start(&[p2.clone()]);

        assert_eq!(h.kinds(), vec![Start, Move]);

        // Nothing moved since the join
        h.move_to(&p2, 4.0, 0.0);
        let event = h.last();
        assert!(event.context.ptr_eq(&context));
        assert!(approx_eq(event.transform.translation.x, 2.0));
        assert!(approx_eq(event.transform.scale, 1.0));
    }

    #[test]
    fn test_lift_splits_when_pointers_remain() {
        let h = Harness::split();
        let p1 = touch(1, 1, 0.0, 0.0);
        let p2 = touch(2, 1, 4.0, 0.0);

        h.start(&[p1.clone(), p2.clone()]);
        h.end(&[p1]);
        assert_eq!(h.kinds(), vec![Start, End, Start]);
        assert!(h.live(1));

        {
            let events = h.events.borrow();
            // The ended contact is still part of the final target
            assert_eq!(events[1].target.pointer_count(), 2);
            assert_eq!(events[2].origin.pointer_count(), 1);
            assert!(!events[2].context.ptr_eq(&events[1].context));
        }

        h.end(&[p2]);
        assert_eq!(h.kinds(), vec![Start, End, Start, End]);
        assert!(!h.live(1));
    }

    #[test]
    fn test_lift_rebases_when_pointers_remain() {
        let h = Harness::rebase();
        let p1 = touch(1, 1, 0.0, 0.0);
        let p2 = touch(2, 1, 4.0, 0.0);

        h.start(&[p1.clone(), p2.clone()]);
        let context = h.last().context;
        h.end(&[p1]);
        assert_eq!(h.kinds(), vec![Start]);
        assert!(h.live(1));

        h.move_to(&p2, 6.0, 1.0);
        h.end(&[p2]);

        assert_eq!(h.kinds(), vec![Start, Move, End]);
        let end = h.last();
        assert!(end.context.ptr_eq(&context));
        assert!(approx_eq(end.transform.translation.x, 2.0));
        assert!(approx_eq(end.transform.translation.y, 1.0));
        assert!(!h.live(1));
    }

    #[test]
    fn test_restart_never_resurrects_context() {
        let h = Harness::split();
        let p1 = touch(1, 1, 0.0, 0.0);

        h.start(&[p1.clone()]);
        h.last().context.insert("selected", true);
        h.end(&[p1.clone()]);
        h.start(&[p1]);

        assert_eq!(h.kinds(), vec![Start, End, Start]);
        assert!(!h.last().context.contains("selected"));
    }

    #[test]
    fn test_filtered_pointers_count_as_absent() {
        let h = Harness::new(
            Gesturizer::default().with_filter(|p: &Pointer<u32>, _| matches!(p.key(), PointerKey::Touch(_))),
        );
        let finger = touch(1, 1, 0.0, 0.0);
        let stylus = pen(2, 1, 8.0, 0.0);

        h.start(&[stylus.clone()]);
        assert!(h.kinds().is_empty());

        h.start(&[finger.clone()]);
        assert_eq!(h.kinds(), vec![Start]);
        assert_eq!(h.last().origin.pointer_count(), 1);

        // The pen is still down but does not keep the gesture alive
        h.end(&[finger]);
        assert_eq!(h.kinds(), vec![Start, End]);
        assert!(!h.live(1));
    }

    #[test]
    fn test_filtered_last_lift_still_ends() {
        let h = Harness::new(Gesturizer::default().with_filter(|p: &Pointer<u32>, _| p.detail().pressure > 0.0));
        let finger = touch(1, 1, 0.0, 0.0);

        h.start(&[finger.clone()]);
        h.move_to(&finger, 3.0, 4.0);
        finger.set_detail(PointerDetail {
            pressure: 0.0,
            ..finger.detail()
        });
        h.end(&[finger]);

        assert_eq!(h.kinds(), vec![Start, Move, End]);
        assert!(!h.live(1));
        // The excluded lift leaves the last target in place
        assert_eq!(h.last().target.centroid(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_staggered_lift_rebases_silently() {
        let h = Harness::rebase();
        let p1 = touch(1, 1, 0.0, 0.0);
        let p2 = touch(2, 1, 4.0, 0.0);
        let p3 = touch(3, 1, 2.0, 4.0);

        h.start(&[p1.clone(), p2.clone(), p3.clone()]);
        h.end(&[p1]);
        h.move_to(&p2, 5.0, 0.0);
        h.end(&[p2]);
        h.move_to(&p3, 3.0, 4.0);
        h.end(&[p3]);

        assert_eq!(h.kinds(), vec![Start, Move, Move, End]);
        assert!(!h.live(1));
    }

    #[test]
    fn test_move_and_end_without_gesture_are_dropped() {
        let h = Harness::split();
        let p1 = touch(1, 1, 0.0, 0.0);

        h.move_to(&p1, 1.0, 1.0);
        h.end(&[p1]);

        assert!(h.kinds().is_empty());
        assert!(!h.live(1));
    }

    #[test]
    fn test_entities_are_independent() {
        let h = Harness::split();
        let a = touch(1, 1, 0.0, 0.0);
        let b = touch(2, 2, 5.0, 5.0);

        h.start(&[a.clone()]);
        h.start(&[b.clone()]);
        h.move_to(&a, 1.0, 0.0);
        h.end(&[b]);

        let ids: Vec<(GestureEventKind, u32)> = h.events.borrow().iter().map(|e| (e.kind, e.id)).collect();
        assert_eq!(ids, vec![(Start, 1), (Start, 2), (Move, 1), (End, 2)]);
        assert!(h.live(1));
        assert!(!h.live(2));
    }

    #[test]
    fn test_chain_continues_after_gesturizer() {
        let h = Harness::split();
        let p1 = touch(1, 1, 0.0, 0.0);

        h.start(&[p1.clone()]);
        h.end(&[p1]);

        // Gesture events run the whole chain before the input event resumes
        assert_eq!(
            *h.after.borrow(),
            vec![Some(EventType::Start), Some(EventType::End)]
        );
    }
}
