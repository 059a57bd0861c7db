//! End-to-end tests of the public processor API

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tactile_core::{DeferFaults, DispatchError, EventData, EventProcessor, Middleware, Next, Result, State};

#[derive(Clone, Debug, PartialEq)]
enum Msg {
    Click(u32),
    Log(String),
}

type Ctx = EventData<Msg, u32>;

/// Counts events per kind and re-dispatches a log line for every click
struct ClickLogger;

impl Middleware<Ctx> for ClickLogger {
    fn handle(&self, next: Next<'_, Ctx>, ctx: &mut Ctx, processor: &EventProcessor<Ctx>) -> Result<()> {
        if let Msg::Click(n) = ctx.event {
            processor.update("clicks", |c: Option<u32>| c.unwrap_or(0) + 1);
            processor.emit(Msg::Log(format!("click {n} with {:?}", ctx.args)));
        }
        next.proceed(ctx)
    }
}

#[test]
fn test_disjoint_keys_do_not_interfere() {
    let processor = EventProcessor::<Ctx>::with_state(State::new().with("a", 1i32));

    processor
        .set("b", "two".to_string())
        .update("a", |v: Option<i32>| v.unwrap_or(0) + 10)
        .delete("c")
        .set("c", vec![3u8])
        .delete("b");

    assert_eq!(processor.get::<i32>("a"), Some(11));
    assert_eq!(processor.get::<String>("b"), None);
    assert_eq!(processor.get::<Vec<u8>>("c"), Some(vec![3]));
    assert_eq!(processor.len(), 2);
    assert!(processor.contains("a"));
}

#[test]
fn test_reentrant_logging_chain() {
    let processor = EventProcessor::<Ctx>::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    processor.use_middleware(ClickLogger);
    let sink = Rc::clone(&log);
    processor.use_fn(move |next, ctx: &mut Ctx, _| {
        if let Msg::Log(line) = &ctx.event {
            sink.borrow_mut().push(line.clone());
        }
        next.proceed(ctx)
    });

    processor.dispatch(Msg::Click(1), [10, 20]);
    processor.dispatch(Msg::Click(2), []);

    assert_eq!(processor.get::<u32>("clicks"), Some(2));
    assert_eq!(
        *log.borrow(),
        vec!["click 1 with [10, 20]".to_string(), "click 2 with []".to_string()]
    );
}

#[test]
fn test_faults_are_isolated_per_dispatch() {
    let faults = DeferFaults::isolated();
    let processor = EventProcessor::<Ctx>::new().with_fault_policy(faults.clone());
    let reached = Rc::new(Cell::new(0));

    processor.use_fn(|next, ctx: &mut Ctx, _| match ctx.event {
        Msg::Click(0) => Err(DispatchError::msg("zero is not clickable")),
        _ => next.proceed(ctx),
    });
    let r = Rc::clone(&reached);
    processor.use_fn(move |next, ctx, _| {
        r.set(r.get() + 1);
        next.proceed(ctx)
    });

    processor.emit(Msg::Click(0));
    processor.emit(Msg::Click(1));

    assert_eq!(reached.get(), 1);
    let deferred = faults.take();
    assert_eq!(deferred.len(), 1);
    assert_eq!(deferred[0].to_string(), "Middleware failed: zero is not clickable");
}

#[test]
#[should_panic(expected = "deferred boom")]
fn test_deferred_panic_resurfaces() {
    let faults = DeferFaults::isolated();
    let processor = EventProcessor::<Ctx>::new().with_fault_policy(faults.clone());
    processor.use_fn(|_next, _ctx, _| panic!("deferred boom"));

    processor.emit(Msg::Click(3));
    assert_eq!(faults.pending(), 1);

    faults.surface();
}
