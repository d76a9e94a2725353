//! Push-stream contract and the reference `Subject` implementation.
//!
//! The engine only requires two capabilities from a stream: subscribing a
//! callback, and injecting a value as if the stream had produced it
//! natively. Combinators are out of scope and belong to the application.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Event payload value. Drivers may emit anything JSON-shaped.
pub type Value = serde_json::Value;

/// Callback invoked for every value a stream emits.
pub type Observer = Box<dyn FnMut(&Value)>;

/// Handle identifying one subscription on one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The consumed reactive-stream contract.
///
/// Everything runs on one logical event loop; implementations use interior
/// mutability and are shared as [`SourceRef`].
pub trait Source {
    /// Register an observer; it is called for every subsequent emission.
    fn subscribe(&self, observer: Observer) -> SubscriptionId;

    /// Remove a previously registered observer. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Push a value into the stream as if it had been produced internally.
    /// All current observers see it.
    fn inject(&self, value: Value);
}

/// Shared handle to a stream.
pub type SourceRef = Rc<dyn Source>;

/// Multicast push stream: the reference [`Source`] implementation used by
/// drivers, runtimes, and tests.
pub struct Subject {
    next_id: Cell<u64>,
    observers: RefCell<Vec<(SubscriptionId, Observer)>>,
    retired: RefCell<Vec<SubscriptionId>>,
    pending: RefCell<VecDeque<Value>>,
    broadcasting: Cell<bool>,
}

impl Subject {
    /// Create an empty subject.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            observers: RefCell::new(Vec::new()),
            retired: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            broadcasting: Cell::new(false),
        }
    }

    /// Emit a value to every current observer.
    pub fn emit(&self, value: Value) {
        self.broadcast(value);
    }

    /// Number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    fn broadcast(&self, value: Value) {
        self.pending.borrow_mut().push_back(value);

        // Re-entrant emission (an observer emitting back into this subject)
        // is queued and drained by the outermost broadcast.
        if self.broadcasting.get() {
            return;
        }
        self.broadcasting.set(true);

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(next) = next else { break };

            // The observer list is detached during delivery so observers may
            // subscribe or unsubscribe without aliasing the borrow.
            let mut active = self.observers.take();
            for (_, observer) in active.iter_mut() {
                observer(&next);
            }

            let added = self.observers.take();
            active.extend(added);

            let retired = std::mem::take(&mut *self.retired.borrow_mut());
            if !retired.is_empty() {
                active.retain(|(id, _)| !retired.contains(id));
            }
            *self.observers.borrow_mut() = active;
        }

        self.broadcasting.set(false);
    }
}

impl Source for Subject {
    fn subscribe(&self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.observers.borrow_mut().push((id, observer));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if self.broadcasting.get() {
            self.retired.borrow_mut().push(id);
            return;
        }
        self.observers.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    fn inject(&self, value: Value) {
        self.broadcast(value);
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscribe_and_emit() {
        let subject = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        subject.subscribe(Box::new(move |v| sink.borrow_mut().push(v.clone())));

        subject.emit(json!(1));
        subject.emit(json!("two"));

        assert_eq!(*seen.borrow(), vec![json!(1), json!("two")]);
    }

    #[test]
    fn test_multicast() {
        let subject = Subject::new();
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));

        let a2 = a.clone();
        subject.subscribe(Box::new(move |_| a2.set(a2.get() + 1)));
        let b2 = b.clone();
        subject.subscribe(Box::new(move |_| b2.set(b2.get() + 1)));

        subject.emit(json!(0));
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let subject = Subject::new();
        let seen = Rc::new(Cell::new(0));

        let sink = seen.clone();
        let id = subject.subscribe(Box::new(move |_| sink.set(sink.get() + 1)));

        subject.emit(json!(0));
        subject.unsubscribe(id);
        subject.emit(json!(1));

        assert_eq!(seen.get(), 1);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_ignored() {
        let a = Subject::new();
        let b = Subject::new();
        let id = a.subscribe(Box::new(|_| {}));
        b.unsubscribe(id);
        assert_eq!(a.observer_count(), 1);
    }

    #[test]
    fn test_inject_reaches_observers() {
        let subject = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        subject.subscribe(Box::new(move |v| sink.borrow_mut().push(v.clone())));

        subject.inject(json!({"x": 1}));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_subscribe_during_broadcast_misses_inflight_value() {
        let subject = Rc::new(Subject::new());
        let late = Rc::new(Cell::new(0));

        let subject2 = subject.clone();
        let late2 = late.clone();
        subject.subscribe(Box::new(move |_| {
            let late3 = late2.clone();
            subject2.subscribe(Box::new(move |_| late3.set(late3.get() + 1)));
        }));

        subject.emit(json!(0));
        assert_eq!(late.get(), 0);

        subject.emit(json!(1));
        assert_eq!(late.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_broadcast() {
        let subject = Rc::new(Subject::new());
        let seen = Rc::new(Cell::new(0));

        let sink = seen.clone();
        let id = subject.subscribe(Box::new(move |_| sink.set(sink.get() + 1)));

        let subject2 = subject.clone();
        subject.subscribe(Box::new(move |_| subject2.unsubscribe(id)));

        subject.emit(json!(0));
        subject.emit(json!(1));

        // First emission delivered, then retired.
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_reentrant_emit_is_queued_in_order() {
        let subject = Rc::new(Subject::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let subject2 = subject.clone();
        subject.subscribe(Box::new(move |v| {
            if v == &json!("first") {
                subject2.emit(json!("second"));
            }
        }));

        let sink = seen.clone();
        subject.subscribe(Box::new(move |v| sink.borrow_mut().push(v.clone())));

        subject.emit(json!("first"));
        assert_eq!(*seen.borrow(), vec![json!("first"), json!("second")]);
    }
}
