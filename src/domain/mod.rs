pub mod board;
pub mod card;
pub mod command;
pub mod ids;
pub mod list;
pub mod sorting;
pub mod store;

pub use board::{Board, BoardSummary};
pub use card::{parse_labels, Card, CardPatch, Priority};
pub use command::Command;
pub use ids::{BoardId, CardId, IdGenerator, ListId, SequentialIds, UuidGenerator};
pub use list::List;
pub use sorting::{sort_card_refs, sort_cards, SortField, SortOrder};
pub use store::Store;

/// Title used when a title input is blank
pub const UNTITLED: &str = "Untitled";

/// Trims a title; blank input becomes [`UNTITLED`].
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Keeps a title as given unless it is blank, in which case it becomes
/// [`UNTITLED`]. Used for renames, which are not trimmed.
pub fn fallback_title(title: &str) -> String {
    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Sprint 4 "), "Sprint 4");
        assert_eq!(normalize_title(""), UNTITLED);
        assert_eq!(normalize_title("\t\n"), UNTITLED);
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(fallback_title(" Sprint 4 "), " Sprint 4 ");
        assert_eq!(fallback_title("  "), UNTITLED);
    }
}
