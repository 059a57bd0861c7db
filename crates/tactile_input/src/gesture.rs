//! Transform gestures
//!
//! A [`TransformGesture`] tracks, for one entity, the net manipulation since
//! its origin snapshot was captured. Moving the target recomputes the
//! transform against the unchanged origin. Rebasing moves the origin to a new
//! snapshot but folds the transform reached so far into a base, so the
//! reported transform stays continuous when the pointer set changes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tactile_core::State;

use crate::geometry::Transform;
use crate::transform::TransformData;

/// Application-owned bag of gesture-scoped values
///
/// Cloning shares the bag: every event of one gesture carries the same
/// context, so values written while handling `gesturestart` are visible in
/// the following `gesturemove` and `gestureend` events. A new gesture gets a
/// fresh, empty context.
#[derive(Clone, Default)]
pub struct GestureContext {
    values: Rc<RefCell<State>>,
}

impl GestureContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.values.borrow().get(key)
    }

    pub fn insert<T: 'static>(&self, key: impl Into<String>, value: T) {
        self.values.borrow_mut().insert(key, value);
    }

    pub fn remove(&self, key: &str) -> bool {
        self.values.borrow_mut().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains(key)
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Whether both handles refer to the same bag
    pub fn ptr_eq(&self, other: &GestureContext) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
    }
}

impl fmt::Debug for GestureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GestureContext")
            .field(&self.values.borrow())
            .finish()
    }
}

/// Per-entity gesture record
#[derive(Clone, Debug)]
pub struct TransformGesture<ID> {
    id: ID,
    origin: TransformData,
    target: TransformData,
    /// Transform accumulated before the last rebase
    base: Transform,
    transform: Transform,
    context: GestureContext,
}

impl<ID> TransformGesture<ID> {
    /// Start a gesture with `origin = target = snapshot`
    pub fn new(id: ID, snapshot: TransformData) -> Self {
        Self {
            id,
            origin: snapshot.clone(),
            target: snapshot,
            base: Transform::IDENTITY,
            transform: Transform::IDENTITY,
            context: GestureContext::new(),
        }
    }

    pub fn id(&self) -> &ID {
        &self.id
    }

    pub fn origin(&self) -> &TransformData {
        &self.origin
    }

    pub fn target(&self) -> &TransformData {
        &self.target
    }

    /// Net transform since the gesture started
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn context(&self) -> &GestureContext {
        &self.context
    }

    /// Move the target and recompute the transform against the origin
    pub fn set_target(&mut self, target: TransformData) {
        self.transform = self.base.then(&self.origin.transform_to(&target));
        self.target = target;
    }

    /// Reset the origin (and target) to `snapshot`, keeping the transform
    /// reached so far
    pub fn rebase(&mut self, snapshot: TransformData) {
        self.base = self.transform;
        self.origin = snapshot.clone();
        self.target = snapshot;
    }
}

/// Active gestures, keyed by entity id
pub type Gestures<ID> = FxHashMap<ID, TransformGesture<ID>>;

/// Gesture lifecycle event kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureEventKind {
    Start,
    Move,
    End,
}

impl GestureEventKind {
    /// The conventional event name
    pub fn name(&self) -> &'static str {
        match self {
            GestureEventKind::Start => "gesturestart",
            GestureEventKind::Move => "gesturemove",
            GestureEventKind::End => "gestureend",
        }
    }
}

/// A gesture lifecycle event
#[derive(Clone, Debug)]
pub struct GestureEvent<ID> {
    pub kind: GestureEventKind,
    pub id: ID,
    pub origin: TransformData,
    pub target: TransformData,
    pub transform: Transform,
    pub context: GestureContext,
}

impl<ID: Clone> GestureEvent<ID> {
    /// Capture the current state of `gesture`
    pub fn new(kind: GestureEventKind, gesture: &TransformGesture<ID>) -> Self {
        Self {
            kind,
            id: gesture.id.clone(),
            origin: gesture.origin.clone(),
            target: gesture.target.clone(),
            transform: gesture.transform,
            context: gesture.context.clone(),
        }
    }
}
