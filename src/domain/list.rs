use crate::domain::ids::{CardId, ListId};
use serde::{Deserialize, Serialize};

/// A column of card references. `card_ids` is the only authority for the
/// order of cards in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub card_ids: Vec<CardId>,
}

impl List {
    pub fn new(id: ListId, title: String) -> Self {
        Self {
            id,
            title,
            card_ids: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }

    pub fn contains(&self, card_id: &CardId) -> bool {
        self.card_ids.contains(card_id)
    }

    pub fn position(&self, card_id: &CardId) -> Option<usize> {
        self.card_ids.iter().position(|id| id == card_id)
    }
}
