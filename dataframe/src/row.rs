use std::sync::Arc;

use crate::Value;

/// A record: named fields with dynamically typed values.
///
/// Rows are immutable, deriving a field produces a new row with the field appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a new `Row` from `(name, value)` pairs.
    ///
    /// A repeated name shadows the earlier one.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        for (name, value) in fields {
            let name = name.into();
            match names.iter().position(|n| *n == name) {
                Some(i) => values[i] = value,
                None => {
                    names.push(name);
                    values.push(value);
                }
            }
        }

        Self {
            names: names.into(),
            values,
        }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let i = self.names.iter().position(|n| n == name)?;
        self.values.get(i)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Derives a new row with `name` appended, or replaced if it was already there.
    pub fn with_field(&self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();

        if let Some(i) = self.names.iter().position(|n| *n == name) {
            let mut values = self.values.clone();
            values[i] = value;

            return Self {
                names: Arc::clone(&self.names),
                values,
            };
        }

        let names: Vec<String> = self.names.iter().cloned().chain([name]).collect();
        let mut values = Vec::with_capacity(self.values.len() + 1);
        values.extend_from_slice(&self.values);
        values.push(value);

        Self {
            names: names.into(),
            values,
        }
    }

    /// Iterates over the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Row {
    type Error = String;

    fn try_from(object: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let fields = object
            .into_iter()
            .map(|(name, value)| {
                let value = Value::try_from(value).map_err(|e| format!("field {name:?}: {e}"))?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self::new(fields))
    }
}
