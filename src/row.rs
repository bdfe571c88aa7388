use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

/// One record of a table: an insertion-ordered mapping from column name to
/// [Value].
///
/// There is no schema behind a row. Inserts and updates may introduce column
/// names no other row has, and two rows of the same table may disagree on
/// their column sets. Order is preserved so that `DESCRIBE` and rendered
/// output list columns the way they were first written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    /// Creates a new, empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `column`, if any.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Sets `column` to `value`.
    ///
    /// An existing column keeps its position and is overwritten; a new
    /// column is appended at the end.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Value::Text(s) => write!(f, "{}: '{}'", name, s)?,
                other => write!(f, "{}: {}", name, other)?,
            }
        }
        write!(f, "}}")
    }
}

// A row is a flat JSON object; field order survives the round trip because
// serialization walks the vector and deserialization appends in map order.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of column values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some((column, value)) = access.next_entry::<String, Value>()? {
                    row.insert(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}
