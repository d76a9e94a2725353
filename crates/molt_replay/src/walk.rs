//! Recursive source-tree walker.
//!
//! Replaces every reachable stream with a per-generation view fed by a
//! logging tap and rewrites factories so their products are instrumented at
//! invocation time, while leaving the tree's observable shape and values
//! untouched.

use crate::state::InstrumentState;
use molt_core::{
    Observer, Path, Source, SourceFactory, SourceRef, SourceTree, Subject, SubscriptionId, Value,
    SCOPE_KEY,
};
use std::rc::{Rc, Weak};

/// Instrument every stream reachable from `tree` under `path`.
///
/// Streams become tapped per-generation views registered in the proxy table;
/// structured records are rebuilt key by key (the scope metadata key passes
/// through untouched); factories are wrapped so each invocation instruments
/// its product under `path/name(args)`; sequences and absent values pass
/// through unchanged.
pub fn instrument_tree(
    tree: SourceTree,
    path: &Path,
    state: &Rc<InstrumentState>,
) -> SourceTree {
    match tree {
        SourceTree::Stream(stream) => SourceTree::Stream(tap_stream(stream, path.clone(), state)),
        SourceTree::Structured(map) => {
            let mut rebuilt = indexmap::IndexMap::with_capacity(map.len());
            for (key, value) in map {
                if key == SCOPE_KEY {
                    rebuilt.insert(key, value);
                    continue;
                }
                let child_path = path.key(&key);
                rebuilt.insert(key, instrument_tree(value, &child_path, state));
            }
            SourceTree::Structured(rebuilt)
        }
        SourceTree::Factory(factory) => {
            SourceTree::Factory(wrap_factory(factory, path.clone(), state.clone()))
        }
        passthrough @ (SourceTree::Sequence(_) | SourceTree::Absent) => passthrough,
    }
}

/// One generation's view of an instrumented stream.
///
/// Subscribers sit on the view's fanout, which the tap feeds from the
/// underlying stream; replays inject into the fanout directly. Injecting
/// into the view passes through to the underlying stream, so it behaves
/// like the outside world producing the value. Cancelling the tap quiesces
/// the view without touching the underlying stream, which a successor
/// generation may still be observing.
struct StreamView {
    upstream: SourceRef,
    fanout: Rc<Subject>,
}

impl Source for StreamView {
    fn subscribe(&self, observer: Observer) -> SubscriptionId {
        self.fanout.subscribe(observer)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.fanout.unsubscribe(id);
    }

    fn inject(&self, value: Value) {
        self.upstream.inject(value);
    }
}

/// Build the view for `path`: register its fanout as the replay proxy and
/// attach the tap that records and forwards every underlying emission.
fn tap_stream(stream: SourceRef, path: Path, state: &Rc<InstrumentState>) -> SourceRef {
    let fanout = Rc::new(Subject::new());
    state.register_proxy(path.clone(), fanout.clone());

    // Weak: the tap closure lives inside the underlying stream, which the
    // state's tap list keeps alive. A strong handle here would cycle.
    let weak: Weak<InstrumentState> = Rc::downgrade(state);
    let tap_path = path.clone();
    let forward = fanout.clone();
    let id = stream.subscribe(Box::new(move |value| {
        if let Some(state) = weak.upgrade() {
            state.record(tap_path.clone(), value.clone());
        }
        forward.emit(value.clone());
    }));
    state.register_tap(stream.clone(), id);

    tracing::debug!(path = %path, "tapped stream");
    Rc::new(StreamView {
        upstream: stream,
        fanout,
    })
}

/// Wrap a factory so each invocation instruments its product under a path
/// segment derived from the factory's name and stringified arguments.
fn wrap_factory(factory: SourceFactory, path: Path, state: Rc<InstrumentState>) -> SourceFactory {
    let name = factory.name().to_string();
    SourceFactory::new(name, move |args| {
        let call_path = path.call(factory.name(), args);
        tracing::debug!(path = %call_path, "factory invoked");
        let produced = factory.invoke(args);
        instrument_tree(produced, &call_path, &state)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use molt_core::{Source, Subject, Value};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn subject() -> Rc<Subject> {
        Rc::new(Subject::new())
    }

    #[test]
    fn test_view_passes_injection_through_to_the_underlying_stream() {
        let state = Rc::new(InstrumentState::new());
        let raw = subject();
        let tree = instrument_tree(SourceTree::Stream(raw.clone()), &Path::root(), &state);
        let view = tree.as_stream().unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        view.subscribe(Box::new(move |v| sink.borrow_mut().push(v.clone())));

        // Injecting into the view behaves like the underlying stream
        // producing the value: recorded, and delivered to view subscribers.
        view.inject(json!(1));
        assert_eq!(*seen.borrow(), vec![json!(1)]);
        assert_eq!(state.log_len(), 1);

        raw.emit(json!(2));
        assert_eq!(*seen.borrow(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_disposed_generation_view_goes_quiet() {
        let state = Rc::new(InstrumentState::new());
        let shared = subject();
        let tree = instrument_tree(
            SourceTree::Stream(shared.clone()),
            &Path::root(),
            &state,
        );
        let view = tree.as_stream().unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        view.subscribe(Box::new(move |v| sink.borrow_mut().push(v.clone())));

        shared.emit(json!(1));
        state.dispose_taps();

        // The underlying stream lives on; the disposed generation's view
        // neither records nor delivers anything further.
        shared.emit(json!(2));
        assert_eq!(*seen.borrow(), vec![json!(1)]);
        assert_eq!(state.log_len(), 1);
    }

    #[test]
    fn test_events_flow_unchanged_and_get_logged() {
        let state = Rc::new(InstrumentState::new());
        let raw = subject();
        let tree = instrument_tree(SourceTree::Stream(raw.clone()), &Path::root(), &state);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        tree.as_stream()
            .unwrap()
            .subscribe(Box::new(move |v| sink.borrow_mut().push(v.clone())));

        raw.emit(json!({"button": "left"}));

        assert_eq!(*seen.borrow(), vec![json!({"button": "left"})]);
        let log = state.log_snapshot();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].path.as_str(), ":root");
        assert_eq!(log[0].event, json!({"button": "left"}));
    }

    #[test]
    fn test_structured_paths() {
        let state = Rc::new(InstrumentState::new());
        let tree = SourceTree::structured([
            ("a", SourceTree::Stream(subject())),
            ("b", SourceTree::Stream(subject())),
        ]);

        instrument_tree(tree, &Path::empty(), &state);

        let paths: Vec<String> = state
            .proxy_paths()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }

    #[test]
    fn test_nested_structured_paths() {
        let state = Rc::new(InstrumentState::new());
        let tree = SourceTree::structured([(
            "outer",
            SourceTree::structured([("inner", SourceTree::Stream(subject()))]),
        )]);

        instrument_tree(tree, &Path::empty(), &state);
        assert_eq!(state.proxy_paths()[0].as_str(), "/outer/inner");
    }

    #[test]
    fn test_scope_key_passes_through_uninstrumented() {
        let state = Rc::new(InstrumentState::new());
        let scope_stream = subject();
        let tree = SourceTree::structured([
            (SCOPE_KEY, SourceTree::Stream(scope_stream.clone())),
            ("real", SourceTree::Stream(subject())),
        ]);

        let rebuilt = instrument_tree(tree, &Path::empty(), &state);

        // Same keys, but the scope entry picked up no tap and no proxy.
        assert!(rebuilt.get(SCOPE_KEY).is_some());
        assert_eq!(scope_stream.observer_count(), 0);
        let paths: Vec<String> = state
            .proxy_paths()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(paths, vec!["/real"]);
    }

    #[test]
    fn test_sequence_and_absent_pass_through() {
        let state = Rc::new(InstrumentState::new());

        let seq = instrument_tree(
            SourceTree::Sequence(vec![json!(1), json!(2)]),
            &Path::empty(),
            &state,
        );
        assert!(matches!(seq, SourceTree::Sequence(ref v) if v.len() == 2));

        let absent = instrument_tree(SourceTree::Absent, &Path::empty(), &state);
        assert!(matches!(absent, SourceTree::Absent));

        assert!(state.proxy_paths().is_empty());
    }

    #[test]
    fn test_factory_products_are_instrumented_per_arguments() {
        let state = Rc::new(InstrumentState::new());
        let factory = SourceFactory::new("times", |_args: &[Value]| {
            SourceTree::Stream(Rc::new(Subject::new()))
        });

        let tree = instrument_tree(SourceTree::Factory(factory), &Path::root(), &state);
        let wrapped = tree.as_factory().unwrap();
        assert_eq!(wrapped.name(), "times");

        let two = wrapped.invoke(&[json!(2)]);
        let three = wrapped.invoke(&[json!(3)]);

        let paths: Vec<String> = state
            .proxy_paths()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(paths, vec![":root/times(2)", ":root/times(3)"]);

        two.as_stream().unwrap().inject(json!(10));
        three.as_stream().unwrap().inject(json!(30));

        let log = state.log_snapshot();
        assert_eq!(log[0].path.as_str(), ":root/times(2)");
        assert_eq!(log[1].path.as_str(), ":root/times(3)");
    }

    #[test]
    fn test_factory_same_arguments_alias_one_path() {
        let state = Rc::new(InstrumentState::new());
        let factory = SourceFactory::new("times", |_args: &[Value]| {
            SourceTree::Stream(Rc::new(Subject::new()))
        });

        let tree = instrument_tree(SourceTree::Factory(factory), &Path::root(), &state);
        let wrapped = tree.as_factory().unwrap();

        wrapped.invoke(&[json!(2)]);
        wrapped.invoke(&[json!(2)]);

        assert_eq!(state.proxy_paths().len(), 1);
    }

    #[test]
    fn test_factory_returning_record() {
        let state = Rc::new(InstrumentState::new());
        let factory = SourceFactory::new("select", |_args: &[Value]| {
            SourceTree::structured([("events", SourceTree::Stream(Rc::new(Subject::new())))])
        });

        let tree = instrument_tree(SourceTree::Factory(factory), &Path::root(), &state);
        tree.as_factory().unwrap().invoke(&[json!("button")]);

        assert_eq!(
            state.proxy_paths()[0].as_str(),
            ":root/select(button)/events"
        );
    }
}
