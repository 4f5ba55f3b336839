use crate::domain::ids::CardId;
use crate::error::TrellisError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Priority of a card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Rank used for sorting, low to high
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TrellisError::InvalidPriority(s.to_string())),
        }
    }
}

/// A kanban card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl Card {
    /// Creates a card with an empty description, no labels and low priority
    pub fn new(id: CardId, title: String) -> Self {
        Self {
            id,
            title,
            description: String::new(),
            labels: Vec::new(),
            priority: Priority::Low,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Shallow-merges the fields present in `patch`. Labels are replaced
    /// wholesale, never merged.
    pub fn apply_patch(&mut self, patch: &CardPatch) {
        if let Some(title) = &patch.title {
            self.title = super::fallback_title(title);
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(labels) = &patch.labels {
            self.labels = labels.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }

    /// Case-insensitive match against title, description and labels.
    /// `query` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query)
            || self.description.to_lowercase().contains(query)
            || self
                .labels
                .iter()
                .any(|label| label.to_lowercase().contains(query))
    }
}

/// Partial update for a card; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl CardPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.labels.is_none()
            && self.priority.is_none()
    }
}

/// Splits comma-separated label input, trimming each label and dropping
/// empty ones.
pub fn parse_labels(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Card {
        Card::new(CardId::from("c1"), "Write docs".to_string())
            .with_description("for the store")
            .with_labels(["docs", "v1"])
            .with_priority(Priority::Medium)
    }

    #[test]
    fn test_new_card_defaults() {
        let card = Card::new(CardId::from("c1"), "Title".to_string());
        assert_eq!(card.description, "");
        assert!(card.labels.is_empty());
        assert_eq!(card.priority, Priority::Low);
    }

    #[test]
    fn test_patch_priority_only() {
        let mut card = sample();
        card.apply_patch(&CardPatch::default().priority(Priority::High));

        assert_eq!(card.priority, Priority::High);
        assert_eq!(card.title, "Write docs");
        assert_eq!(card.description, "for the store");
        assert_eq!(card.labels, vec!["docs", "v1"]);
    }

    #[test]
    fn test_patch_replaces_labels_wholesale() {
        let mut card = sample();
        card.apply_patch(&CardPatch::default().labels(["urgent"]));
        assert_eq!(card.labels, vec!["urgent"]);

        card.apply_patch(&CardPatch::default().labels(Vec::<String>::new()));
        assert!(card.labels.is_empty());
    }

    #[test]
    fn test_patch_blank_title_becomes_untitled() {
        let mut card = sample();
        card.apply_patch(&CardPatch::default().title("   "));
        assert_eq!(card.title, "Untitled");
    }

    #[test]
    fn test_patch_title_is_stored_as_given() {
        let mut card = sample();
        card.apply_patch(&CardPatch::default().title("  Write more docs "));
        assert_eq!(card.title, "  Write more docs ");
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: CardPatch = serde_json::from_str(r#"{"priority":"high"}"#).unwrap();
        assert_eq!(patch, CardPatch::default().priority(Priority::High));
        assert!(!patch.is_empty());
        assert!(CardPatch::default().is_empty());
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::Low.to_string(), "low");
    }

    #[test]
    fn test_card_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "c1",
                "title": "Write docs",
                "description": "for the store",
                "labels": ["docs", "v1"],
                "priority": "medium"
            })
        );
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(parse_labels("a, b,,c "), vec!["a", "b", "c"]);
        assert!(parse_labels("").is_empty());
        assert!(parse_labels(" , ").is_empty());
    }

    #[test]
    fn test_matches_lowercase() {
        let card = sample();
        assert!(card.matches_lowercase("docs"));
        assert!(card.matches_lowercase("store"));
        assert!(card.matches_lowercase("v1"));
        assert!(!card.matches_lowercase("missing"));
    }
}
