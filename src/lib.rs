//! # Trellis Core
//!
//! Board state for a kanban app: boards holding ordered lists, lists
//! holding ordered cards, drag-and-drop reordering, and persistence of the
//! whole state into a single key-value slot.
//!
//! The data model lives in [`domain`] and is changed only through
//! [`Command`]s applied by a pure reducer. [`BoardStore`] wires the reducer
//! to an injected [`Storage`] slot and id generator.
//!
//! ```no_run
//! use trellis_core::{storage::MemoryStorage, BoardStore};
//!
//! # async fn demo() -> trellis_core::Result<()> {
//! let mut store = BoardStore::open(MemoryStorage::new()).await;
//! let board = store.create_board("Roadmap").await?;
//! let todo = store.add_list(&board, "To Do").await?;
//! store.add_card(&board, &todo, "Write the announcement").await?;
//! # Ok(())
//! # }
//! ```

pub mod board_store;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use board_store::BoardStore;
pub use config::StoreConfig;
pub use domain::{
    board::{Board, BoardSummary},
    card::{Card, CardPatch, Priority},
    command::Command,
    ids::{BoardId, CardId, IdGenerator, ListId, SequentialIds, UuidGenerator},
    list::List,
    store::Store,
};
pub use error::{Result, TrellisError};
pub use storage::Storage;
