
/// Separator for composite field names.
pub const SEPARATOR: char = '.';

///
/// SplitName
///
/// A field name split at the first separator. A local name has an empty
/// tail; a composite name addresses a nested node via its head. Malformed
/// names (leading/trailing separator, empty segment) leave one half empty
/// and therefore degrade to local lookup.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SplitName<'a> {
    pub head: &'a str,
    pub tail: &'a str,
}

impl SplitName<'_> {
    /// True when the name addresses a nested node: both halves non-empty.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        !self.head.is_empty() && !self.tail.is_empty()
    }
}

/// Split `name` at the first separator; a name without one is all head.
#[must_use]
pub fn split(name: &str) -> SplitName<'_> {
    match name.split_once(SEPARATOR) {
        Some((head, tail)) => SplitName { head, tail },
        None => SplitName {
            head: name,
            tail: "",
        },
    }
}

/// Join `head` and `tail` with the separator. The inverse of [`split`] for
/// well-formed input; an empty half yields the other half unchanged.
#[must_use]
pub fn combine(head: &str, tail: &str) -> String {
    if head.is_empty() {
        return tail.to_string();
    }
    if tail.is_empty() {
        return head.to_string();
    }
    format!("{head}{SEPARATOR}{tail}")
}
