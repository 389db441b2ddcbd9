
use crate::{
    error::Error,
    message::{Message, Severity},
    notify::{ChangeEvent, ChangeNotifier, Subscription},
    path,
    store::MessageStore,
};
use std::{cell::RefCell, rc::Rc};

///
/// ChildEntry
///
/// One attached child: name, shared handle, and the live subscription that
/// bridges the child's message signals upward. Dropping the entry drops the
/// subscription and detaches deterministically.
///

struct ChildEntry {
    name: String,
    node: ValidationNode,
    _subscription: Subscription,
}

#[derive(Default)]
struct NodeInner {
    store: RefCell<MessageStore>,
    children: RefCell<Vec<ChildEntry>>,
    notifier: ChangeNotifier,
}

///
/// ValidationNode
///
/// One unit of the diagnostics tree: a local message store plus named,
/// subscribed child nodes. Cloning the handle shares the node, so a parent
/// can reference a child whose lifetime belongs to the application object
/// graph.
///
/// Every public message operation consults the dotted-path splitter first:
/// a composite name whose head matches an attached child is forwarded to
/// that child with the tail, leaving the local store untouched. Otherwise
/// the full name addresses the local store.
///
/// Single logical thread, no locking. Notifications are synchronous and
/// fire-and-forget: a change handler that mutates the field it was just
/// notified about re-enters the engine recursively.
///

#[derive(Clone, Default)]
pub struct ValidationNode {
    inner: Rc<NodeInner>,
}

impl ValidationNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // message reporting
    // ------------------------------------------------------------------

    /// Add one diagnostic under `field`, routing composite names to the
    /// matching child. Duplicate nonzero codes are silently dropped.
    pub fn add_message(&self, field: &str, message: Message) {
        if let Some((child, tail)) = self.route(field) {
            child.add_message(&tail, message);
            return;
        }

        let added = self.inner.store.borrow_mut().add(field, message);
        if added {
            self.changed(field);
        }
    }

    /// Add a blocking validation error. `code == 0` means uncoded.
    pub fn add_error(&self, field: &str, text: impl Into<String>, code: u32) {
        self.add_message(field, Message::error(text).with_code(code));
    }

    pub fn add_runtime_error(&self, field: &str, text: impl Into<String>, code: u32) {
        self.add_message(field, Message::runtime_error(text).with_code(code));
    }

    pub fn add_warning(&self, field: &str, text: impl Into<String>, code: u32) {
        self.add_message(field, Message::warning(text).with_code(code));
    }

    pub fn add_info(&self, field: &str, text: impl Into<String>, code: u32) {
        self.add_message(field, Message::info(text).with_code(code));
    }

    /// Remove every message under `field` whose text equals `text`. A known
    /// field signals even when nothing matched; callers clear defensively
    /// and rely on the signal to refresh.
    pub fn remove_by_text(&self, field: &str, text: &str) {
        if let Some((child, tail)) = self.route(field) {
            child.remove_by_text(&tail, text);
            return;
        }

        let known = self.inner.store.borrow_mut().remove_by_text(field, text);
        if known {
            self.changed(field);
        }
    }

    /// Remove every message under `field` carrying `code`. Same signal
    /// contract as [`Self::remove_by_text`].
    pub fn remove_by_code(&self, field: &str, code: u32) {
        if let Some((child, tail)) = self.route(field) {
            child.remove_by_code(&tail, code);
            return;
        }

        let known = self.inner.store.borrow_mut().remove_by_code(field, code);
        if known {
            self.changed(field);
        }
    }

    /// Empty one field's message list.
    pub fn clear_field(&self, field: &str) {
        if let Some((child, tail)) = self.route(field) {
            child.clear_field(&tail);
            return;
        }

        let known = self.inner.store.borrow_mut().clear_field(field);
        if known {
            self.changed(field);
        }
    }

    /// Empty every local field, signaling each in first-seen order, then
    /// recurse into attached children when `with_children` is set.
    pub fn clear_all(&self, with_children: bool) {
        let names = self.inner.store.borrow_mut().clear_all();
        for name in &names {
            self.changed(name);
        }

        if with_children {
            for child in self.child_handles() {
                child.clear_all(true);
            }
        }
    }

    // ------------------------------------------------------------------
    // queries
    // ------------------------------------------------------------------

    /// Copy of `field`'s messages, stable-sorted ascending by severity.
    #[must_use]
    pub fn messages(&self, field: &str) -> Vec<Message> {
        if let Some((child, tail)) = self.route(field) {
            return child.messages(&tail);
        }

        self.inner.store.borrow().get(field)
    }

    /// Copy of `field`'s messages of exactly `severity`, insertion order.
    #[must_use]
    pub fn messages_by_severity(&self, field: &str, severity: Severity) -> Vec<Message> {
        if let Some((child, tail)) = self.route(field) {
            return child.messages_by_severity(&tail, severity);
        }

        self.inner.store.borrow().get_by_severity(field, severity)
    }

    /// True iff this node or any attached child (transitively) holds a
    /// `ValidationError`-severity message. Children are checked in
    /// attachment order, short-circuiting.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        if self.inner.store.borrow().has_errors() {
            return true;
        }

        self.child_handles().iter().any(ValidationNode::has_errors)
    }

    /// All local messages, plus every child's (recursively) when
    /// `with_children` is set. Children contribute in attachment order.
    #[must_use]
    pub fn all_messages(&self, with_children: bool) -> Vec<Message> {
        let mut messages = self.inner.store.borrow().all_messages();

        if with_children {
            for child in self.child_handles() {
                messages.extend(child.all_messages(true));
            }
        }

        messages
    }

    /// Local field names, plus each child's names prefixed with the child
    /// name when `with_children` is set. A child's empty-named entries are
    /// skipped when prefixing.
    #[must_use]
    pub fn field_names(&self, with_children: bool) -> Vec<String> {
        let mut names = self.inner.store.borrow().field_names();

        if with_children {
            let children = self.inner.children.borrow();
            for entry in children.iter() {
                let nested = entry
                    .node
                    .field_names(true)
                    .into_iter()
                    .filter(|name| !name.is_empty())
                    .map(|name| path::combine(&entry.name, &name));
                names.extend(nested);
            }
        }

        names
    }

    // ------------------------------------------------------------------
    // validation chain
    // ------------------------------------------------------------------

    /// Attach `child` under `name` and subscribe to its message signals,
    /// re-raising them here as the field-less aggregate ping. No-op when
    /// `name` is already attached.
    pub fn attach_child(&self, name: &str, child: &Self) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "child name must not be empty".to_string(),
            ));
        }

        let mut children = self.inner.children.borrow_mut();
        if children.iter().any(|entry| entry.name == name) {
            return Ok(());
        }

        let notifier = self.inner.notifier.clone();
        let subscription = child.subscribe(move |event| {
            if matches!(event, ChangeEvent::Messages { .. }) {
                notifier.emit(&ChangeEvent::aggregate());
            }
        });

        children.push(ChildEntry {
            name: name.to_string(),
            node: child.clone(),
            _subscription: subscription,
        });

        Ok(())
    }

    /// Detach the child registered under `name`, dropping its subscription.
    /// No-op when absent.
    pub fn detach_child(&self, name: &str) {
        self.inner
            .children
            .borrow_mut()
            .retain(|entry| entry.name != name);
    }

    /// True when a child is attached under `name`.
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.inner
            .children
            .borrow()
            .iter()
            .any(|entry| entry.name == name)
    }

    /// Register a change observer. Dropping the handle unsubscribes.
    pub fn subscribe(&self, observer: impl Fn(&ChangeEvent) + 'static) -> Subscription {
        self.inner.notifier.subscribe(observer)
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    /// Route `field`: composite head matching an attached child forwards
    /// the tail there; anything else is local.
    fn route(&self, field: &str) -> Option<(Self, String)> {
        let parts = path::split(field);
        if !parts.is_composite() {
            return None;
        }

        self.inner
            .children
            .borrow()
            .iter()
            .find(|entry| entry.name == parts.head)
            .map(|entry| (entry.node.clone(), parts.tail.to_string()))
    }

    /// Child handles in attachment order, cloned out so child operations
    /// run without holding the children borrow.
    fn child_handles(&self) -> Vec<Self> {
        self.inner
            .children
            .borrow()
            .iter()
            .map(|entry| entry.node.clone())
            .collect()
    }

    fn changed(&self, field: &str) {
        self.inner.notifier.emit(&ChangeEvent::messages(field));
    }
}
