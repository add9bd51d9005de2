use std::fmt;

use indexmap::IndexMap;

/// Value stored under a record label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// True when the value carries no visible content after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Accumulated result of one wizard session, keyed by human-readable label.
///
/// Labels keep the position of their first insertion; writing an existing
/// label replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedRecord {
    entries: IndexMap<String, FieldValue>,
}

impl SharedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.entries.get(label)
    }

    pub fn text(&self, label: &str) -> Option<&str> {
        self.get(label).and_then(FieldValue::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Only a full session reset does this.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<L, V> FromIterator<(L, V)> for SharedRecord
where
    L: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut record = SharedRecord::new();
        for (label, value) in iter {
            record.insert(label, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwriting_keeps_first_position() {
        let mut record = SharedRecord::new();
        record.insert("Nombre", "Ana");
        record.insert("Correo", "ana@correo.cl");
        record.insert("Nombre", "Ana Rojas");

        let labels: Vec<_> = record.labels().collect();
        assert_eq!(labels, vec!["Nombre", "Correo"]);
        assert_eq!(record.text("Nombre"), Some("Ana Rojas"));
    }

    #[test]
    fn blank_detection_covers_lists() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(FieldValue::List(Vec::new()).is_blank());
        assert!(FieldValue::from(vec![" ", ""]).is_blank());
        assert!(!FieldValue::from(vec!["", "Lino"]).is_blank());
    }

    #[test]
    fn lists_display_comma_separated() {
        let value = FieldValue::from(vec!["Lino", "Lana"]);
        assert_eq!(value.to_string(), "Lino, Lana");
    }
}
