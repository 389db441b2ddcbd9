//! Change notification boundary.
//!
//! All engine mutations surface through `ChangeEvent` and `ChangeNotifier`.
//! Delivery is synchronous and in registration order; nothing here suspends
//! or locks.


use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

///
/// ChangeEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChangeEvent {
    /// Diagnostics changed for a field. An empty field name is the
    /// aggregate ping: something changed somewhere below this node,
    /// carrying no field identity.
    Messages { field: String },

    /// A resolved property's value changed. Distinct from message changes.
    Property { name: String },
}

impl ChangeEvent {
    #[must_use]
    pub fn messages(field: impl Into<String>) -> Self {
        Self::Messages {
            field: field.into(),
        }
    }

    #[must_use]
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property { name: name.into() }
    }

    /// The field-less "changed somewhere in this subtree" ping.
    #[must_use]
    pub const fn aggregate() -> Self {
        Self::Messages {
            field: String::new(),
        }
    }

    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Messages { field } if field.is_empty())
    }
}

type Observer = Rc<dyn Fn(&ChangeEvent)>;

#[derive(Default)]
struct Observers {
    next_id: u64,
    entries: Vec<(u64, Observer)>,
}

///
/// ChangeNotifier
///
/// Observer list with deterministic, registration-order delivery. Clones
/// share the same list.
///
/// Delivery is synchronous and fire-and-forget: an observer that mutates
/// the state it was notified about re-enters the engine recursively. That
/// recursion is documented behavior, not guarded against.
///

#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Rc<RefCell<Observers>>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Dropping the returned handle unsubscribes
    /// deterministically.
    pub fn subscribe(&self, observer: impl Fn(&ChangeEvent) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, Rc::new(observer)));

        Subscription {
            observers: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver `event` to every observer in registration order.
    pub fn emit(&self, event: &ChangeEvent) {
        // snapshot first: observers may subscribe or emit reentrantly
        let snapshot: Vec<Observer> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();

        for observer in snapshot {
            observer(event);
        }
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

///
/// Subscription
///
/// Cancellation handle for one registered observer. Dropping it removes
/// the observer; an already-dropped notifier makes the drop a no-op.
///

pub struct Subscription {
    observers: Weak<RefCell<Observers>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
