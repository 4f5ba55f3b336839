use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Opaque identifier of a board
    BoardId
);
string_id!(
    /// Opaque identifier of a list, unique across all boards
    ListId
);
string_id!(
    /// Opaque identifier of a card, unique across all boards
    CardId
);

/// Source of fresh entity ids.
///
/// Every id handed out must be unique for the lifetime of the persisted
/// data; ids are never reused after deletion.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;

    fn board_id(&mut self) -> BoardId {
        BoardId(self.next_id())
    }

    fn list_id(&mut self) -> ListId {
        ListId(self.next_id())
    }

    fn card_id(&mut self) -> CardId {
        CardId(self.next_id())
    }
}

/// Random UUID v4 ids
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic ids of the form `{prefix}{n}`, starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id-")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
