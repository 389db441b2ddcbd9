
use crate::message::{Message, Severity};

///
/// FieldEntry
///

#[derive(Clone, Debug)]
struct FieldEntry {
    name: String,
    messages: Vec<Message>,
}

///
/// MessageStore
///
/// Field name → ordered message list for one node's own (non-nested)
/// fields. Entries keep first-seen order, which fixes the signal order of
/// `clear_all`. The store is pure state; mutation methods report whether
/// the owning node should signal the field, so the node can release its
/// borrow before fanning out notifications.
///

#[derive(Clone, Debug, Default)]
pub struct MessageStore {
    fields: Vec<FieldEntry>,
}

impl MessageStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append `message` to `field`'s list. Returns true when stored; false
    /// when an existing message with the same nonzero code suppressed the
    /// insert (silent dedup, no signal).
    pub fn add(&mut self, field: &str, message: Message) -> bool {
        let entry = self.entry_mut_or_insert(field);
        if message.is_coded() && entry.messages.iter().any(|m| m.code == message.code) {
            return false;
        }
        entry.messages.push(message);

        true
    }

    /// Remove every message whose text equals `text`. Returns true when the
    /// field is known — callers signal even if nothing matched — and false
    /// for a field never seen.
    pub fn remove_by_text(&mut self, field: &str, text: &str) -> bool {
        match self.entry_mut(field) {
            Some(entry) => {
                entry.messages.retain(|m| m.text != text);
                true
            }
            None => false,
        }
    }

    /// Remove every message carrying `code`. Same signal contract as
    /// [`Self::remove_by_text`].
    pub fn remove_by_code(&mut self, field: &str, code: u32) -> bool {
        match self.entry_mut(field) {
            Some(entry) => {
                entry.messages.retain(|m| m.code != code);
                true
            }
            None => false,
        }
    }

    /// Empty `field`'s list, keeping the entry (and its first-seen slot).
    pub fn clear_field(&mut self, field: &str) -> bool {
        match self.entry_mut(field) {
            Some(entry) => {
                entry.messages.clear();
                true
            }
            None => false,
        }
    }

    /// Drop every field entry, returning the former names in first-seen
    /// order so the caller can signal each one.
    pub fn clear_all(&mut self) -> Vec<String> {
        self.fields.drain(..).map(|entry| entry.name).collect()
    }

    /// Copy of `field`'s messages, stable-sorted ascending by severity:
    /// equal severities keep insertion order.
    #[must_use]
    pub fn get(&self, field: &str) -> Vec<Message> {
        let mut messages = self
            .entry(field)
            .map(|entry| entry.messages.clone())
            .unwrap_or_default();
        messages.sort_by_key(|m| m.severity);

        messages
    }

    /// Copy of `field`'s messages of exactly `severity`, in insertion order.
    #[must_use]
    pub fn get_by_severity(&self, field: &str, severity: Severity) -> Vec<Message> {
        self.entry(field)
            .map(|entry| {
                entry
                    .messages
                    .iter()
                    .filter(|m| m.severity == severity)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True iff any field holds a `ValidationError`-severity message.
    /// Warnings, infos, and runtime errors do not block.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.fields
            .iter()
            .any(|entry| entry.messages.iter().any(|m| m.severity == Severity::ValidationError))
    }

    /// Every stored message across all fields, in first-seen field order.
    #[must_use]
    pub fn all_messages(&self) -> Vec<Message> {
        self.fields
            .iter()
            .flat_map(|entry| entry.messages.iter().cloned())
            .collect()
    }

    /// Field names in first-seen order (cleared fields included).
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|entry| entry.name.clone()).collect()
    }

    fn entry(&self, field: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|entry| entry.name == field)
    }

    fn entry_mut(&mut self, field: &str) -> Option<&mut FieldEntry> {
        self.fields.iter_mut().find(|entry| entry.name == field)
    }

    fn entry_mut_or_insert(&mut self, field: &str) -> &mut FieldEntry {
        if let Some(index) = self.fields.iter().position(|entry| entry.name == field) {
            return &mut self.fields[index];
        }
        self.fields.push(FieldEntry {
            name: field.to_string(),
            messages: Vec::new(),
        });

        self.fields.last_mut().expect("entry just pushed")
    }
}
