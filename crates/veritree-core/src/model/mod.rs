use crate::{
    error::Error,
    value::{FieldKind, Value},
};

///
/// FieldModel
///
/// Static field metadata for one host type: name plus declared kind. The
/// ordered model slice is the "known fields of this concrete variant"
/// capability; no runtime type introspection is involved.
///

#[derive(Clone, Debug)]
pub struct FieldModel {
    pub name: &'static str,
    pub kind: FieldKind,
}

///
/// HostModel
///
/// Implemented by data objects that expose statically declared fields to
/// the property resolver. Statically declared names always shadow
/// same-named dynamic descriptors.
///

pub trait HostModel {
    /// Registry key under which this type's shared dynamic descriptors are
    /// declared.
    fn type_key() -> &'static str;

    /// Ordered static field models.
    fn static_fields(&self) -> &'static [FieldModel];

    /// Read a static field by name; `None` when the name is not static.
    fn static_value(&self, name: &str) -> Option<Value>;

    /// Write a static field through its own setter. Returns `Ok(true)` when
    /// the stored value changed per the field's own equality, `Ok(false)`
    /// when the new value compared equal. The caller has already checked
    /// kind assignability.
    fn write_static(&mut self, name: &str, value: Value) -> Result<bool, Error>;

    /// Declared kind of a static field, if the name is static.
    fn static_kind(&self, name: &str) -> Option<&FieldKind> {
        self.static_fields()
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.kind)
    }
}
