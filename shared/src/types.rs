//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// An ordered, closed list of category labels.
///
/// Codes are positions in the list and never change after construction, so
/// the encoding seen at inference time matches the one used for training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl CategorySet {
    /// Build a set from labels in their canonical order. Duplicates keep the
    /// first position.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !unique.contains(&label) {
                unique.push(label);
            }
        }
        Self { labels: unique }
    }

    pub fn encode(&self, label: &str) -> Option<u32> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|idx| idx as u32)
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.labels.get(code as usize).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.encode(label).is_some()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Labelled choice offered by the input form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormOption {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_year: Option<i32>,
}
