//! Exact-match field filters.

use crate::document::Document;
use serde_json::Value;

/// An exact-match filter over an entity's declared fields.
///
/// A filter is an ordered sequence of `(field name, expected value)`
/// pairs combined as a conjunction: an entity matches when every named
/// field of its document form equals the expected value exactly. There
/// are no partial-match, range, or ordering semantics.
///
/// Values are compared in document form, so identifiers and references
/// match against their hex string form, and a number never equals a
/// numeric string.
///
/// # Example
///
/// ```
/// use docstore_core::Filter;
///
/// let filter = Filter::new().eq("name", "Eve").eq("city", "Berlin");
/// assert_eq!(filter.fields().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Vec<(String, Value)>,
}

impl Filter {
    /// Creates an empty filter, which matches every entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact-equality condition on a field.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// The conditions in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Returns true if the filter has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Evaluates the filter against a document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

impl FromIterator<(String, Value)> for Filter {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
