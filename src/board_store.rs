//! The board store service.
//!
//! [`BoardStore`] owns the current [`Store`] snapshot together with an
//! injected [`Storage`] slot and [`IdGenerator`]. Every command goes through
//! [`BoardStore::dispatch`]: the pure reducer builds the next snapshot, the
//! snapshot is installed, and it is then written to the slot. Writes are
//! best-effort; a failed write is logged and the in-memory state stays
//! authoritative.

use crate::{
    config::StoreConfig,
    domain::{
        BoardId, CardId, CardPatch, Command, IdGenerator, ListId, Store, UuidGenerator,
    },
    error::{Result, TrellisError},
    storage::Storage,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct BoardStore<S: Storage, G: IdGenerator = UuidGenerator> {
    storage: S,
    ids: G,
    config: StoreConfig,
    state: Arc<Store>,
}

impl<S: Storage> BoardStore<S, UuidGenerator> {
    /// Opens a store with random ids and the default configuration
    pub async fn open(storage: S) -> Self {
        Self::open_with(storage, UuidGenerator, StoreConfig::default()).await
    }
}

impl<S: Storage, G: IdGenerator> BoardStore<S, G> {
    /// Loads the persisted state from `storage`.
    ///
    /// Never fails: a missing, unreadable or invalid persisted state is
    /// replaced by the demo board (or an empty store when
    /// `config.seed_demo_board` is off) and that fallback is written back.
    pub async fn open_with(storage: S, mut ids: G, config: StoreConfig) -> Self {
        let loaded = Self::load_persisted(&storage, &config).await;
        let needs_write = loaded.is_none();
        let state = loaded.unwrap_or_else(|| {
            if config.seed_demo_board {
                info!(key = %config.storage_key, "seeding demo board");
                Store::demo(&mut ids)
            } else {
                info!(key = %config.storage_key, "starting with an empty store");
                Store::empty()
            }
        });

        let store = Self {
            storage,
            ids,
            config,
            state: Arc::new(state),
        };
        if needs_write {
            store.persist().await;
        }
        store
    }

    async fn load_persisted(storage: &S, config: &StoreConfig) -> Option<Store> {
        let key = config.storage_key.as_str();
        let raw = match storage.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "no persisted state");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted state");
                return None;
            }
        };

        match Store::from_json_str(&raw) {
            Ok(store) => {
                info!(key, boards = store.board_order.len(), "loaded persisted state");
                Some(store)
            }
            Err(e) => {
                warn!(key, error = %e, "discarding malformed persisted state");
                None
            }
        }
    }

    /// Current snapshot. Later commands never modify it.
    pub fn state(&self) -> Arc<Store> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Applies a fully specified command and persists the result.
    ///
    /// On error nothing changes, neither in memory nor in storage. Commands
    /// that cannot change anything (a drop on the same slot, an empty patch)
    /// are still checked against the current state but are not written.
    pub async fn dispatch(&mut self, command: Command) -> Result<Arc<Store>> {
        let next = match self.state.apply(&command) {
            Ok(next) => next,
            Err(e) => {
                debug!(command = command.kind(), error = %e, "command rejected");
                return Err(e);
            }
        };

        if command.is_noop() {
            return Ok(self.state());
        }

        debug!(
            command = command.kind(),
            board = command.board_id().map(BoardId::as_str),
            "applied command"
        );
        self.state = Arc::new(next);
        self.persist().await;
        Ok(self.state())
    }

    async fn persist(&self) {
        let serialized = if self.config.pretty_json {
            serde_json::to_string_pretty(self.state.as_ref())
        } else {
            serde_json::to_string(self.state.as_ref())
        };
        let json = match serialized {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize state");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.config.storage_key, &json).await {
            warn!(
                key = %self.config.storage_key,
                error = %e,
                "failed to persist state; keeping in-memory copy"
            );
        }
    }

    // Skip ids already present, e.g. from a counter restarted over
    // persisted state.
    fn fresh_board_id(&mut self) -> BoardId {
        loop {
            let id = self.ids.board_id();
            if !self.state.boards.contains_key(&id) {
                return id;
            }
        }
    }

    fn fresh_list_id(&mut self) -> ListId {
        loop {
            let id = self.ids.list_id();
            if !self.state.contains_list_id(&id) {
                return id;
            }
        }
    }

    fn fresh_card_id(&mut self) -> CardId {
        loop {
            let id = self.ids.card_id();
            if !self.state.contains_card_id(&id) {
                return id;
            }
        }
    }

    pub async fn create_board(&mut self, title: &str) -> Result<BoardId> {
        let board_id = self.fresh_board_id();
        self.dispatch(Command::CreateBoard {
            board_id: board_id.clone(),
            title: title.to_string(),
        })
        .await?;
        Ok(board_id)
    }

    pub async fn edit_board_title(&mut self, board_id: &BoardId, title: &str) -> Result<()> {
        self.dispatch(Command::EditBoardTitle {
            board_id: board_id.clone(),
            title: title.to_string(),
        })
        .await?;
        Ok(())
    }

    /// Deletes the board along with all of its lists and cards
    pub async fn delete_board(&mut self, board_id: &BoardId) -> Result<()> {
        self.dispatch(Command::DeleteBoard {
            board_id: board_id.clone(),
        })
        .await?;
        Ok(())
    }

    pub async fn add_list(&mut self, board_id: &BoardId, title: &str) -> Result<ListId> {
        let list_id = self.fresh_list_id();
        self.dispatch(Command::AddList {
            board_id: board_id.clone(),
            list_id: list_id.clone(),
            title: title.to_string(),
        })
        .await?;
        Ok(list_id)
    }

    pub async fn edit_list(
        &mut self,
        board_id: &BoardId,
        list_id: &ListId,
        title: &str,
    ) -> Result<()> {
        self.dispatch(Command::EditList {
            board_id: board_id.clone(),
            list_id: list_id.clone(),
            title: title.to_string(),
        })
        .await?;
        Ok(())
    }

    /// Deletes the list and every card in it
    pub async fn delete_list(&mut self, board_id: &BoardId, list_id: &ListId) -> Result<()> {
        self.dispatch(Command::DeleteList {
            board_id: board_id.clone(),
            list_id: list_id.clone(),
        })
        .await?;
        Ok(())
    }

    pub async fn add_card(
        &mut self,
        board_id: &BoardId,
        list_id: &ListId,
        title: &str,
    ) -> Result<CardId> {
        let card_id = self.fresh_card_id();
        self.dispatch(Command::AddCard {
            board_id: board_id.clone(),
            list_id: list_id.clone(),
            card_id: card_id.clone(),
            title: title.to_string(),
        })
        .await?;
        Ok(card_id)
    }

    pub async fn edit_card(
        &mut self,
        board_id: &BoardId,
        card_id: &CardId,
        patch: CardPatch,
    ) -> Result<()> {
        self.dispatch(Command::EditCard {
            board_id: board_id.clone(),
            card_id: card_id.clone(),
            patch,
        })
        .await?;
        Ok(())
    }

    pub async fn delete_card(
        &mut self,
        board_id: &BoardId,
        list_id: &ListId,
        card_id: &CardId,
    ) -> Result<()> {
        self.dispatch(Command::DeleteCard {
            board_id: board_id.clone(),
            list_id: list_id.clone(),
            card_id: card_id.clone(),
        })
        .await?;
        Ok(())
    }

    /// Moves the card at `source_index` of `source_list` to `dest_index` of
    /// `dest_list`, where `dest_index` counts positions after the card has
    /// been taken out of the source list. This is what a drag-and-drop
    /// library reports on drop.
    pub async fn move_card(
        &mut self,
        board_id: &BoardId,
        source_list: &ListId,
        dest_list: &ListId,
        source_index: usize,
        dest_index: usize,
    ) -> Result<()> {
        self.dispatch(Command::MoveCard {
            board_id: board_id.clone(),
            source_list_id: source_list.clone(),
            dest_list_id: dest_list.clone(),
            source_index,
            dest_index,
        })
        .await?;
        Ok(())
    }

    pub async fn clear_all(&mut self) -> Result<()> {
        self.dispatch(Command::ClearAll).await?;
        Ok(())
    }

    pub fn export_json(&self) -> Arc<Store> {
        self.state()
    }

    pub fn export_json_string(&self) -> Result<String> {
        let json = if self.config.pretty_json {
            serde_json::to_string_pretty(self.state.as_ref())?
        } else {
            serde_json::to_string(self.state.as_ref())?
        };
        Ok(json)
    }

    /// Replaces the whole state with `value` once it has been checked for
    /// shape and referential integrity. Invalid input leaves the current
    /// state untouched.
    pub async fn import_json(&mut self, value: serde_json::Value) -> Result<()> {
        let store = Store::from_json_value(value).map_err(|e| {
            warn!(error = %e, "rejected import");
            e
        })?;
        self.dispatch(Command::Replace { store }).await?;
        Ok(())
    }

    pub async fn import_json_str(&mut self, text: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| TrellisError::InvalidImport(e.to_string()))?;
        self.import_json(value).await
    }
}
