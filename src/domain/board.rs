use crate::domain::{
    card::{Card, CardPatch},
    ids::{BoardId, CardId, ListId},
    list::List,
};
use crate::error::{Result, TrellisError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Kanban board: ordered lists plus a flat pool of cards referenced by id
/// from exactly one list each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub list_order: Vec<ListId>,
    #[serde(default)]
    pub lists: HashMap<ListId, List>,
    #[serde(default)]
    pub cards: HashMap<CardId, Card>,
}

/// Overview line for a board, as shown in a board picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: BoardId,
    pub title: String,
    pub list_count: usize,
    pub card_count: usize,
}

impl Board {
    pub fn new(id: BoardId, title: String) -> Self {
        Self {
            id,
            title,
            list_order: Vec::new(),
            lists: HashMap::new(),
            cards: HashMap::new(),
        }
    }

    pub fn list(&self, list_id: &ListId) -> Result<&List> {
        self.lists
            .get(list_id)
            .ok_or_else(|| TrellisError::ListNotFound(list_id.to_string()))
    }

    fn list_mut(&mut self, list_id: &ListId) -> Result<&mut List> {
        self.lists
            .get_mut(list_id)
            .ok_or_else(|| TrellisError::ListNotFound(list_id.to_string()))
    }

    pub fn card(&self, card_id: &CardId) -> Result<&Card> {
        self.cards
            .get(card_id)
            .ok_or_else(|| TrellisError::CardNotFound(card_id.to_string()))
    }

    /// Lists in display order
    pub fn ordered_lists(&self) -> impl Iterator<Item = &List> {
        self.list_order.iter().filter_map(|id| self.lists.get(id))
    }

    /// Cards of a list in display order
    pub fn cards_in_list(&self, list_id: &ListId) -> Result<Vec<&Card>> {
        let list = self.list(list_id)?;
        Ok(list
            .card_ids
            .iter()
            .filter_map(|id| self.cards.get(id))
            .collect())
    }

    /// The list currently holding `card_id`
    pub fn list_of(&self, card_id: &CardId) -> Option<&List> {
        self.ordered_lists().find(|list| list.contains(card_id))
    }

    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            list_count: self.list_order.len(),
            card_count: self.cards.len(),
        }
    }

    /// Searches cards by title, description or label (case-insensitive).
    /// Results come back in display order.
    pub fn search_cards(&self, query: &str) -> Vec<&Card> {
        let query_lower = query.to_lowercase();
        self.ordered_lists()
            .flat_map(|list| list.card_ids.iter())
            .filter_map(|id| self.cards.get(id))
            .filter(|card| card.matches_lowercase(&query_lower))
            .collect()
    }

    pub(crate) fn add_list(&mut self, list_id: ListId, title: String) {
        self.list_order.push(list_id.clone());
        self.lists.insert(list_id.clone(), List::new(list_id, title));
    }

    pub(crate) fn rename_list(&mut self, list_id: &ListId, title: String) -> Result<()> {
        self.list_mut(list_id)?.title = title;
        Ok(())
    }

    /// Removes the list and every card it referenced
    pub(crate) fn remove_list(&mut self, list_id: &ListId) -> Result<()> {
        let list = self
            .lists
            .remove(list_id)
            .ok_or_else(|| TrellisError::ListNotFound(list_id.to_string()))?;

        for card_id in &list.card_ids {
            self.cards.remove(card_id);
        }
        self.list_order.retain(|id| id != list_id);
        Ok(())
    }

    pub(crate) fn add_card(&mut self, list_id: &ListId, card_id: CardId, title: String) -> Result<()> {
        self.list_mut(list_id)?.card_ids.push(card_id.clone());
        self.cards.insert(card_id.clone(), Card::new(card_id, title));
        Ok(())
    }

    pub(crate) fn patch_card(&mut self, card_id: &CardId, patch: &CardPatch) -> Result<()> {
        let card = self
            .cards
            .get_mut(card_id)
            .ok_or_else(|| TrellisError::CardNotFound(card_id.to_string()))?;
        card.apply_patch(patch);
        Ok(())
    }

    pub(crate) fn remove_card(&mut self, list_id: &ListId, card_id: &CardId) -> Result<()> {
        if !self.cards.contains_key(card_id) {
            return Err(TrellisError::CardNotFound(card_id.to_string()));
        }
        let list = self.list_mut(list_id)?;
        let position = list
            .position(card_id)
            .ok_or_else(|| TrellisError::CardNotInList {
                card: card_id.to_string(),
                list: list_id.to_string(),
            })?;

        list.card_ids.remove(position);
        self.cards.remove(card_id);
        Ok(())
    }

    /// Removes the card id at `source_index` of the source list and inserts it
    /// at `dest_index` of the destination list. `dest_index` is a position in
    /// the destination as it is after the removal.
    pub(crate) fn move_card(
        &mut self,
        source_list: &ListId,
        dest_list: &ListId,
        source_index: usize,
        dest_index: usize,
    ) -> Result<()> {
        let source_len = self.list(source_list)?.len();
        let dest_len = self.list(dest_list)?.len();

        if source_index >= source_len {
            return Err(TrellisError::IndexOutOfBounds {
                list: source_list.to_string(),
                index: source_index,
                len: source_len,
            });
        }

        let dest_len_after_removal = if source_list == dest_list {
            source_len - 1
        } else {
            dest_len
        };
        if dest_index > dest_len_after_removal {
            return Err(TrellisError::IndexOutOfBounds {
                list: dest_list.to_string(),
                index: dest_index,
                len: dest_len_after_removal,
            });
        }

        let moved = self.list_mut(source_list)?.card_ids.remove(source_index);
        self.list_mut(dest_list)?.card_ids.insert(dest_index, moved);
        Ok(())
    }

    /// Checks referential integrity of the board
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TrellisError::InvalidImport(msg));

        if self.list_order.len() != self.lists.len() {
            return invalid(format!(
                "board {}: listOrder has {} entries but {} lists exist",
                self.id,
                self.list_order.len(),
                self.lists.len()
            ));
        }

        let mut seen_lists = HashSet::new();
        let mut seen_cards = HashSet::new();
        for list_id in &self.list_order {
            if !seen_lists.insert(list_id) {
                return invalid(format!("board {}: list {} ordered twice", self.id, list_id));
            }
            let Some(list) = self.lists.get(list_id) else {
                return invalid(format!("board {}: dangling list {}", self.id, list_id));
            };
            if &list.id != list_id {
                return invalid(format!(
                    "board {}: list keyed {} has id {}",
                    self.id, list_id, list.id
                ));
            }
            for card_id in &list.card_ids {
                if !self.cards.contains_key(card_id) {
                    return invalid(format!(
                        "board {}: list {} references missing card {}",
                        self.id, list_id, card_id
                    ));
                }
                if !seen_cards.insert(card_id) {
                    return invalid(format!(
                        "board {}: card {} appears in more than one place",
                        self.id, card_id
                    ));
                }
            }
        }

        if seen_cards.len() != self.cards.len() {
            return invalid(format!(
                "board {}: {} cards are not referenced by any list",
                self.id,
                self.cards.len() - seen_cards.len()
            ));
        }

        for (card_id, card) in &self.cards {
            if &card.id != card_id {
                return invalid(format!(
                    "board {}: card keyed {} has id {}",
                    self.id, card_id, card.id
                ));
            }
        }

        Ok(())
    }
}
