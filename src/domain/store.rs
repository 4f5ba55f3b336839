use crate::domain::{
    board::{Board, BoardSummary},
    card::{Card, Priority},
    ids::{BoardId, CardId, IdGenerator, ListId},
    list::List,
};
use crate::error::{Result, TrellisError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Root of the persisted state: every board, plus the order they are shown in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub board_order: Vec<BoardId>,
    pub boards: HashMap<BoardId, Board>,
}

impl Store {
    /// `{boardOrder: [], boards: {}}`
    pub fn empty() -> Self {
        Self::default()
    }

    /// The demo state used on first run: one board with three lists and two
    /// starter cards.
    pub fn demo(ids: &mut dyn IdGenerator) -> Self {
        let board_id = ids.board_id();
        let todo = ids.list_id();
        let doing = ids.list_id();
        let done = ids.list_id();
        let welcome = ids.card_id();
        let drag_me = ids.card_id();

        let mut board = Board::new(board_id.clone(), "My Trello Board".to_string());
        for (id, title, cards) in [
            (todo, "To Do", vec![welcome.clone()]),
            (doing, "Doing", vec![drag_me.clone()]),
            (done, "Done", Vec::new()),
        ] {
            let mut list = List::new(id.clone(), title.to_string());
            list.card_ids = cards;
            board.list_order.push(id.clone());
            board.lists.insert(id, list);
        }

        board.cards.insert(
            welcome.clone(),
            Card::new(welcome, "Welcome 🎉".to_string())
                .with_description("Edit me")
                .with_labels(["starter"])
                .with_priority(Priority::Medium),
        );
        board.cards.insert(
            drag_me.clone(),
            Card::new(drag_me, "Drag me →".to_string()),
        );

        Self {
            board_order: vec![board_id.clone()],
            boards: HashMap::from([(board_id, board)]),
        }
    }

    pub fn board(&self, board_id: &BoardId) -> Result<&Board> {
        self.boards
            .get(board_id)
            .ok_or_else(|| TrellisError::BoardNotFound(board_id.to_string()))
    }

    pub(crate) fn board_mut(&mut self, board_id: &BoardId) -> Result<&mut Board> {
        self.boards
            .get_mut(board_id)
            .ok_or_else(|| TrellisError::BoardNotFound(board_id.to_string()))
    }

    pub fn contains_list_id(&self, list_id: &ListId) -> bool {
        self.boards.values().any(|board| board.lists.contains_key(list_id))
    }

    pub fn contains_card_id(&self, card_id: &CardId) -> bool {
        self.boards.values().any(|board| board.cards.contains_key(card_id))
    }

    /// Boards in display order
    pub fn ordered_boards(&self) -> impl Iterator<Item = &Board> {
        self.board_order.iter().filter_map(|id| self.boards.get(id))
    }

    pub fn board_summaries(&self) -> Vec<BoardSummary> {
        self.ordered_boards().map(Board::summary).collect()
    }

    /// Checks that every ordered id resolves, every entry is ordered exactly
    /// once, ids match their keys, and list and card ids are unique across
    /// boards.
    pub fn validate(&self) -> Result<()> {
        if self.board_order.len() != self.boards.len() {
            return Err(TrellisError::InvalidImport(format!(
                "boardOrder has {} entries but {} boards exist",
                self.board_order.len(),
                self.boards.len()
            )));
        }

        let mut seen_boards = HashSet::new();
        let mut seen_lists = HashSet::new();
        let mut seen_cards = HashSet::new();
        for board_id in &self.board_order {
            if !seen_boards.insert(board_id) {
                return Err(TrellisError::InvalidImport(format!(
                    "board {} ordered twice",
                    board_id
                )));
            }
            let board = self.boards.get(board_id).ok_or_else(|| {
                TrellisError::InvalidImport(format!("dangling board {}", board_id))
            })?;
            if &board.id != board_id {
                return Err(TrellisError::InvalidImport(format!(
                    "board keyed {} has id {}",
                    board_id, board.id
                )));
            }
            board.validate()?;

            if let Some(list_id) = board.list_order.iter().find(|id| !seen_lists.insert(*id)) {
                return Err(TrellisError::InvalidImport(format!(
                    "list {} appears on more than one board",
                    list_id
                )));
            }
            if let Some(card_id) = board.cards.keys().find(|id| !seen_cards.insert(*id)) {
                return Err(TrellisError::InvalidImport(format!(
                    "card {} appears on more than one board",
                    card_id
                )));
            }
        }

        Ok(())
    }

    /// Builds a store from arbitrary JSON, rejecting anything that does not
    /// have the expected shape or breaks referential integrity.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let store: Store = serde_json::from_value(value)
            .map_err(|e| TrellisError::InvalidImport(e.to_string()))?;
        store.validate()?;
        Ok(store)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| TrellisError::InvalidImport(e.to_string()))?;
        Self::from_json_value(value)
    }
}
