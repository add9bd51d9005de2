use serde::Serialize;

use crate::wizard::record::SharedRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

/// Display-ready projection of a finished record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.rows
            .iter()
            .map(|row| (row.label.as_str(), row.value.as_str()))
            .collect()
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| format!("{}: {}", row.label, row.value))
            .collect()
    }
}

pub struct SummaryBuilder;

impl SummaryBuilder {
    /// Keeps record order, drops blank values and joins lists with `", "`.
    pub fn build(record: &SharedRecord) -> Summary {
        let rows = record
            .iter()
            .filter(|(_, value)| !value.is_blank())
            .map(|(label, value)| SummaryRow {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect();
        Summary { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::record::FieldValue;

    #[test]
    fn blank_entries_are_dropped_and_lists_joined() {
        let mut record = SharedRecord::new();
        record.insert("A", "");
        record.insert("B", "x");
        record.insert("C", FieldValue::from(vec!["p", "q"]));

        let summary = SummaryBuilder::build(&record);
        assert_eq!(summary.pairs(), vec![("B", "x"), ("C", "p, q")]);
    }

    #[test]
    fn order_is_not_resorted() {
        let record: SharedRecord = [("Zeta", "1"), ("Alfa", "2"), ("Medio", "  ")]
            .into_iter()
            .collect();
        let summary = SummaryBuilder::build(&record);
        assert_eq!(summary.lines(), vec!["Zeta: 1", "Alfa: 2"]);
    }
}
