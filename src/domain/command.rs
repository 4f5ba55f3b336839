//! The closed set of state transitions and the pure reducer that applies
//! them.
//!
//! Commands carry every input they need, including freshly generated ids,
//! so applying one is deterministic. [`Store::apply`] never touches the
//! store it is called on: it works on a copy and either returns it as the
//! next store or drops it on error.

use crate::domain::{
    board::Board,
    card::CardPatch,
    fallback_title,
    ids::{BoardId, CardId, ListId},
    normalize_title,
    store::Store,
};
use crate::error::{Result, TrellisError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    CreateBoard {
        board_id: BoardId,
        title: String,
    },
    EditBoardTitle {
        board_id: BoardId,
        title: String,
    },
    DeleteBoard {
        board_id: BoardId,
    },
    AddList {
        board_id: BoardId,
        list_id: ListId,
        title: String,
    },
    EditList {
        board_id: BoardId,
        list_id: ListId,
        title: String,
    },
    DeleteList {
        board_id: BoardId,
        list_id: ListId,
    },
    AddCard {
        board_id: BoardId,
        list_id: ListId,
        card_id: CardId,
        title: String,
    },
    EditCard {
        board_id: BoardId,
        card_id: CardId,
        patch: CardPatch,
    },
    DeleteCard {
        board_id: BoardId,
        list_id: ListId,
        card_id: CardId,
    },
    MoveCard {
        board_id: BoardId,
        source_list_id: ListId,
        dest_list_id: ListId,
        source_index: usize,
        dest_index: usize,
    },
    ClearAll,
    /// Installs a whole store, as done by import
    Replace {
        store: Store,
    },
}

impl Command {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateBoard { .. } => "create_board",
            Self::EditBoardTitle { .. } => "edit_board_title",
            Self::DeleteBoard { .. } => "delete_board",
            Self::AddList { .. } => "add_list",
            Self::EditList { .. } => "edit_list",
            Self::DeleteList { .. } => "delete_list",
            Self::AddCard { .. } => "add_card",
            Self::EditCard { .. } => "edit_card",
            Self::DeleteCard { .. } => "delete_card",
            Self::MoveCard { .. } => "move_card",
            Self::ClearAll => "clear_all",
            Self::Replace { .. } => "replace",
        }
    }

    pub fn board_id(&self) -> Option<&BoardId> {
        match self {
            Self::CreateBoard { board_id, .. }
            | Self::EditBoardTitle { board_id, .. }
            | Self::DeleteBoard { board_id }
            | Self::AddList { board_id, .. }
            | Self::EditList { board_id, .. }
            | Self::DeleteList { board_id, .. }
            | Self::AddCard { board_id, .. }
            | Self::EditCard { board_id, .. }
            | Self::DeleteCard { board_id, .. }
            | Self::MoveCard { board_id, .. } => Some(board_id),
            Self::ClearAll | Self::Replace { .. } => None,
        }
    }

    /// True when applying the command cannot change any state
    pub fn is_noop(&self) -> bool {
        match self {
            Self::MoveCard {
                source_list_id,
                dest_list_id,
                source_index,
                dest_index,
                ..
            } => source_list_id == dest_list_id && source_index == dest_index,
            Self::EditCard { patch, .. } => patch.is_empty(),
            _ => false,
        }
    }
}

impl Store {
    /// Returns the store that results from applying `command`.
    pub fn apply(&self, command: &Command) -> Result<Store> {
        match command {
            Command::ClearAll => Ok(Store::empty()),
            Command::Replace { store } => {
                store.validate()?;
                Ok(store.clone())
            }
            Command::CreateBoard { board_id, title } => {
                if self.boards.contains_key(board_id) {
                    return Err(TrellisError::DuplicateId(board_id.to_string()));
                }
                let mut next = self.clone();
                next.board_order.push(board_id.clone());
                next.boards.insert(
                    board_id.clone(),
                    Board::new(board_id.clone(), normalize_title(title)),
                );
                Ok(next)
            }
            Command::DeleteBoard { board_id } => {
                self.board(board_id)?;
                let mut next = self.clone();
                next.boards.remove(board_id);
                next.board_order.retain(|id| id != board_id);
                Ok(next)
            }
            _ => self.apply_to_board(command),
        }
    }

    fn apply_to_board(&self, command: &Command) -> Result<Store> {
        let Some(board_id) = command.board_id() else {
            return Ok(self.clone());
        };
        match command {
            Command::AddList { list_id, .. } if self.contains_list_id(list_id) => {
                return Err(TrellisError::DuplicateId(list_id.to_string()));
            }
            Command::AddCard { card_id, .. } if self.contains_card_id(card_id) => {
                return Err(TrellisError::DuplicateId(card_id.to_string()));
            }
            _ => {}
        }
        let mut next = self.clone();
        let board = next.board_mut(board_id)?;

        match command {
            Command::EditBoardTitle { title, .. } => board.title = fallback_title(title),
            Command::AddList { list_id, title, .. } => {
                board.add_list(list_id.clone(), normalize_title(title))
            }
            Command::EditList { list_id, title, .. } => {
                board.rename_list(list_id, fallback_title(title))?
            }
            Command::DeleteList { list_id, .. } => board.remove_list(list_id)?,
            Command::AddCard {
                list_id,
                card_id,
                title,
                ..
            } => board.add_card(list_id, card_id.clone(), normalize_title(title))?,
            Command::EditCard { card_id, patch, .. } => board.patch_card(card_id, patch)?,
            Command::DeleteCard {
                list_id, card_id, ..
            } => board.remove_card(list_id, card_id)?,
            Command::MoveCard {
                source_list_id,
                dest_list_id,
                source_index,
                dest_index,
                ..
            } => board.move_card(source_list_id, dest_list_id, *source_index, *dest_index)?,
            Command::CreateBoard { .. }
            | Command::DeleteBoard { .. }
            | Command::ClearAll
            | Command::Replace { .. } => {}
        }

        Ok(next)
    }
}
