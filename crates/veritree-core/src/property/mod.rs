//! Dynamic property overlay.
//!
//! Descriptors are declared at runtime and resolved after a host's static
//! fields. Fixed-schema hosts share one descriptor set per type key through
//! the process-wide registry; open-schema hosts own a private set, so every
//! instance may expose a different ad-hoc shape.

#[cfg(test)]
mod tests;

use crate::{
    error::Error,
    model::HostModel,
    notify::{ChangeEvent, ChangeNotifier, Subscription},
    value::{FieldKind, Value},
};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

///
/// PropertyDescriptor
///
/// One runtime-declared property: name, declared kind, free-form attribute
/// tags, and the owning type key. Append-only; descriptors are never
/// removed in normal operation.
///

#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub attributes: Vec<String>,
    pub owner: &'static str,
}

type DescriptorSet = Rc<RefCell<Vec<PropertyDescriptor>>>;

// Process-wide descriptor sets, one per host type key. The engine is a
// single-logical-thread model, so thread-local state is the whole story;
// a concurrent host needs its own synchronization discipline on top.
thread_local! {
    static REGISTRY: RefCell<BTreeMap<&'static str, DescriptorSet>> =
        RefCell::new(BTreeMap::new());
}

fn shared_descriptors(type_key: &'static str) -> DescriptorSet {
    REGISTRY.with(|registry| Rc::clone(registry.borrow_mut().entry(type_key).or_default()))
}

/// Drop every registered shared descriptor set. Test hook; live bags keep
/// their already-resolved sets.
pub fn reset_registry() {
    REGISTRY.with(|registry| registry.borrow_mut().clear());
}

///
/// SchemaScope
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchemaScope {
    /// Descriptor set shared by every instance of the owning type.
    Shared,
    /// Descriptor set private to one instance (open schema).
    Instance,
}

///
/// PropertyBag
///
/// Per-instance dynamic property state: the resolved descriptor set, the
/// assigned values, and the property-change notifier. A declared but
/// never-assigned property reads as its declared kind's default.
///

pub struct PropertyBag {
    scope: SchemaScope,
    owner: &'static str,
    descriptors: DescriptorSet,
    values: RefCell<BTreeMap<String, Value>>,
    notifier: ChangeNotifier,
}

impl PropertyBag {
    /// Bag for a fixed-schema host: descriptors shared registry-wide under
    /// `type_key`.
    #[must_use]
    pub fn shared(type_key: &'static str) -> Self {
        Self {
            scope: SchemaScope::Shared,
            owner: type_key,
            descriptors: shared_descriptors(type_key),
            values: RefCell::new(BTreeMap::new()),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Bag for an open-schema host: a private descriptor set per instance.
    #[must_use]
    pub fn instance(type_key: &'static str) -> Self {
        Self {
            scope: SchemaScope::Instance,
            owner: type_key,
            descriptors: DescriptorSet::default(),
            values: RefCell::new(BTreeMap::new()),
            notifier: ChangeNotifier::new(),
        }
    }

    #[must_use]
    pub const fn scope(&self) -> SchemaScope {
        self.scope
    }

    /// Declare a dynamic property. No-op when a same-name descriptor
    /// already exists in this scope.
    pub fn declare(&self, name: &str, kind: FieldKind, attributes: Vec<String>) {
        let mut descriptors = self.descriptors.borrow_mut();
        if descriptors.iter().any(|d| d.name == name) {
            return;
        }
        descriptors.push(PropertyDescriptor {
            name: name.to_string(),
            kind,
            attributes,
            owner: self.owner,
        });
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.descriptors.borrow().iter().any(|d| d.name == name)
    }

    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.descriptors
            .borrow()
            .iter()
            .find(|d| d.name == name)
            .cloned()
    }

    /// Stored value for `name`, else the declared kind's default, else
    /// `PropertyNotFound`.
    pub fn dynamic_value(&self, name: &str) -> Result<Value, Error> {
        if let Some(value) = self.values.borrow().get(name) {
            return Ok(value.clone());
        }

        self.descriptor(name)
            .map(|d| d.kind.default_value())
            .ok_or_else(|| Error::not_found(name))
    }

    /// Kind-checked write. `TypeMismatch` leaves the stored value
    /// untouched; fires a property-changed notification only when the
    /// stored value actually changed.
    pub fn set_dynamic(&self, name: &str, value: Value) -> Result<(), Error> {
        let descriptor = self.descriptor(name).ok_or_else(|| Error::not_found(name))?;
        if !descriptor.kind.accepts(&value) {
            return Err(Error::mismatch(name, &descriptor.kind, &value));
        }

        let changed = {
            let mut values = self.values.borrow_mut();
            match values.get(name) {
                Some(current) if *current == value => false,
                _ => {
                    values.insert(name.to_string(), value);
                    true
                }
            }
        };
        if changed {
            self.notify_property(name);
        }

        Ok(())
    }

    /// Raise the property-changed notification for `name`. Hosts with
    /// custom static setters call this after a confirmed change.
    pub fn notify_property(&self, name: &str) {
        self.notifier.emit(&ChangeEvent::property(name));
    }

    /// Register a property-change observer. Dropping the handle
    /// unsubscribes.
    pub fn subscribe(&self, observer: impl Fn(&ChangeEvent) + 'static) -> Subscription {
        self.notifier.subscribe(observer)
    }
}

///
/// PropertyHost
///
/// Two-tier property resolution over a host: statically declared fields
/// first, the dynamic bag second. The static preference on a name collision
/// is deliberate and load-bearing for callers.
///

pub trait PropertyHost: HostModel {
    fn bag(&self) -> &PropertyBag;

    /// Declare a dynamic property on this host's scope.
    fn declare_property(&self, name: &str, kind: FieldKind, attributes: Vec<String>) {
        self.bag().declare(name, kind, attributes);
    }

    /// Resolve and read `name`: static field first, then dynamic.
    fn get_value(&self, name: &str) -> Result<Value, Error> {
        if let Some(value) = self.static_value(name) {
            return Ok(value);
        }

        self.bag().dynamic_value(name)
    }

    /// Resolve and write `name`, enforcing the resolved declared kind.
    /// Fires a property-changed notification only on actual change.
    fn set_value(&mut self, name: &str, value: Value) -> Result<(), Error> {
        let static_kind = self.static_kind(name).cloned();
        if let Some(kind) = static_kind {
            if !kind.accepts(&value) {
                return Err(Error::mismatch(name, &kind, &value));
            }
            let changed = self.write_static(name, value)?;
            if changed {
                self.bag().notify_property(name);
            }
            return Ok(());
        }

        self.bag().set_dynamic(name, value)
    }

    /// True when `name` resolves statically or dynamically.
    fn resolves(&self, name: &str) -> bool {
        self.static_kind(name).is_some() || self.bag().has_property(name)
    }
}

///
/// DynamicModel
///
/// The fully dynamic host: no static fields and an instance-scoped
/// descriptor set, so every instance may expose a different schema. The
/// open-schema counterpart of a fixed-schema host built over
/// `PropertyBag::shared`.
///

pub struct DynamicModel {
    bag: PropertyBag,
}

impl DynamicModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bag: PropertyBag::instance(Self::type_key()),
        }
    }
}

impl Default for DynamicModel {
    fn default() -> Self {
        Self::new()
    }
}

impl HostModel for DynamicModel {
    fn type_key() -> &'static str {
        "veritree.DynamicModel"
    }

    fn static_fields(&self) -> &'static [crate::model::FieldModel] {
        &[]
    }

    fn static_value(&self, _name: &str) -> Option<Value> {
        None
    }

    fn write_static(&mut self, name: &str, _value: Value) -> Result<bool, Error> {
        Err(Error::not_found(name))
    }
}

impl PropertyHost for DynamicModel {
    fn bag(&self) -> &PropertyBag {
        &self.bag
    }
}
