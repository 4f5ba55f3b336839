use crate::domain::card::Card;
use std::cmp::Ordering;
use std::str::FromStr;

/// Fields available for sorting cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Priority,
    LabelCount,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "priority" => Ok(SortField::Priority),
            "labels" | "label-count" => Ok(SortField::LabelCount),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: id, title, priority, label-count",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Sorts a view of cards in place.
///
/// This only reorders the slice it is given; a list's `card_ids` stays the
/// authority for display order. The sort is stable, so cards that compare
/// equal keep their list order.
///
/// # Examples
/// ```
/// use trellis_core::domain::card::{Card, Priority};
/// use trellis_core::domain::ids::CardId;
/// use trellis_core::domain::sorting::{sort_cards, SortField, SortOrder};
///
/// let mut cards = vec![
///     Card::new(CardId::from("a"), "Low".to_string()),
///     Card::new(CardId::from("b"), "High".to_string()).with_priority(Priority::High),
/// ];
///
/// sort_cards(&mut cards, SortField::Priority, SortOrder::Descending);
/// assert_eq!(cards[0].id.as_str(), "b");
/// ```
pub fn sort_cards(cards: &mut [Card], field: SortField, order: SortOrder) {
    cards.sort_by(|a, b| directed(compare_cards(a, b, field), order));
}

/// Same as [`sort_cards`] for borrowed cards, e.g. from `Board::cards_in_list`
pub fn sort_card_refs(cards: &mut [&Card], field: SortField, order: SortOrder) {
    cards.sort_by(|a, b| directed(compare_cards(a, b, field), order));
}

fn directed(cmp: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => cmp,
        SortOrder::Descending => cmp.reverse(),
    }
}

fn compare_cards(a: &Card, b: &Card, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.as_str().cmp(b.id.as_str()),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortField::LabelCount => a.labels.len().cmp(&b.labels.len()),
    }
}
