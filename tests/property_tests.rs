//! Property-based tests for the board reducer.
//!
//! Random command sequences are generated against whatever ids currently
//! exist, then checked for referential integrity and move semantics.

use proptest::prelude::*;

use trellis_core::domain::{CardPatch, Command, IdGenerator, Priority, SequentialIds, Store};

/// Abstract operation; the numbers pick existing entities modulo their count.
#[derive(Debug, Clone)]
enum Op {
    CreateBoard,
    DeleteBoard(usize),
    AddList(usize),
    DeleteList(usize, usize),
    AddCard(usize, usize),
    EditCard(usize, usize, usize, u8),
    DeleteCard(usize, usize, usize),
    MoveCard(usize, usize, usize, usize, usize),
    ClearAll,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::CreateBoard),
        1 => any::<usize>().prop_map(Op::DeleteBoard),
        3 => any::<usize>().prop_map(Op::AddList),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(b, l)| Op::DeleteList(b, l)),
        5 => (any::<usize>(), any::<usize>()).prop_map(|(b, l)| Op::AddCard(b, l)),
        2 => (any::<usize>(), any::<usize>(), any::<usize>(), 0u8..3)
            .prop_map(|(b, l, c, p)| Op::EditCard(b, l, c, p)),
        2 => (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(b, l, c)| Op::DeleteCard(b, l, c)),
        6 => (any::<usize>(), any::<usize>(), any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(b, s, d, si, di)| Op::MoveCard(b, s, d, si, di)),
        1 => Just(Op::ClearAll),
    ]
}

fn pick<T: Clone>(items: &[T], n: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[n % items.len()].clone())
    }
}

/// Turns an abstract op into a command that is valid for `store`, or `None`
/// if the store has nothing for it to act on.
fn resolve(store: &Store, op: &Op, ids: &mut SequentialIds) -> Option<Command> {
    let board_of = |n: usize| pick(&store.board_order, n);

    Some(match *op {
        Op::CreateBoard => Command::CreateBoard {
            board_id: ids.board_id(),
            title: "Board".to_string(),
        },
        Op::DeleteBoard(b) => Command::DeleteBoard {
            board_id: board_of(b)?,
        },
        Op::AddList(b) => Command::AddList {
            board_id: board_of(b)?,
            list_id: ids.list_id(),
            title: "List".to_string(),
        },
        Op::DeleteList(b, l) => {
            let board_id = board_of(b)?;
            let list_id = pick(&store.boards[&board_id].list_order, l)?;
            Command::DeleteList { board_id, list_id }
        }
        Op::AddCard(b, l) => {
            let board_id = board_of(b)?;
            let list_id = pick(&store.boards[&board_id].list_order, l)?;
            Command::AddCard {
                board_id,
                list_id,
                card_id: ids.card_id(),
                title: "Card".to_string(),
            }
        }
        Op::EditCard(b, l, c, p) => {
            let board_id = board_of(b)?;
            let board = &store.boards[&board_id];
            let list_id = pick(&board.list_order, l)?;
            let card_id = pick(&board.lists[&list_id].card_ids, c)?;
            let priority = [Priority::Low, Priority::Medium, Priority::High][p as usize];
            Command::EditCard {
                board_id,
                card_id,
                patch: CardPatch::default().priority(priority),
            }
        }
        Op::DeleteCard(b, l, c) => {
            let board_id = board_of(b)?;
            let board = &store.boards[&board_id];
            let list_id = pick(&board.list_order, l)?;
            let card_id = pick(&board.lists[&list_id].card_ids, c)?;
            Command::DeleteCard {
                board_id,
                list_id,
                card_id,
            }
        }
        Op::MoveCard(b, s, d, si, di) => {
            let board_id = board_of(b)?;
            let board = &store.boards[&board_id];
            let source_list_id = pick(&board.list_order, s)?;
            let dest_list_id = pick(&board.list_order, d)?;
            let source_len = board.lists[&source_list_id].card_ids.len();
            if source_len == 0 {
                return None;
            }
            let dest_len = if source_list_id == dest_list_id {
                source_len - 1
            } else {
                board.lists[&dest_list_id].card_ids.len()
            };
            Command::MoveCard {
                board_id,
                source_list_id,
                dest_list_id,
                source_index: si % source_len,
                dest_index: di % (dest_len + 1),
            }
        }
        Op::ClearAll => Command::ClearAll,
    })
}

proptest! {
    /// Any sequence of valid commands keeps every ordered id resolvable and
    /// every card in exactly one list.
    #[test]
    fn commands_never_leave_dangling_ids(ops in prop::collection::vec(op(), 1..80)) {
        let mut ids = SequentialIds::new("p");
        let mut store = Store::demo(&mut ids);

        for op in &ops {
            let Some(command) = resolve(&store, op, &mut ids) else {
                continue;
            };
            let next = store.apply(&command);
            prop_assert!(next.is_ok(), "{:?} failed: {:?}", command, next);
            store = next.unwrap();
            prop_assert!(store.validate().is_ok(), "after {:?}: {:?}", command, store.validate());
        }
    }

    /// A cross-list move takes exactly the card at the source index and puts
    /// it at the destination index.
    #[test]
    fn cross_list_move_relocates_one_card(
        source_len in 1usize..8,
        dest_len in 0usize..8,
        si in any::<usize>(),
        di in any::<usize>(),
    ) {
        let mut ids = SequentialIds::new("m");
        let board_id = ids.board_id();
        let (l1, l2) = (ids.list_id(), ids.list_id());
        let mut store = Store::empty()
            .apply(&Command::CreateBoard { board_id: board_id.clone(), title: "B".to_string() })
            .unwrap();
        for list_id in [&l1, &l2] {
            store = store
                .apply(&Command::AddList {
                    board_id: board_id.clone(),
                    list_id: list_id.clone(),
                    title: "L".to_string(),
                })
                .unwrap();
        }
        for (list_id, count) in [(&l1, source_len), (&l2, dest_len)] {
            for _ in 0..count {
                store = store
                    .apply(&Command::AddCard {
                        board_id: board_id.clone(),
                        list_id: list_id.clone(),
                        card_id: ids.card_id(),
                        title: "C".to_string(),
                    })
                    .unwrap();
            }
        }

        let source_index = si % source_len;
        let dest_index = di % (dest_len + 1);
        let moved = store.boards[&board_id].lists[&l1].card_ids[source_index].clone();

        let next = store
            .apply(&Command::MoveCard {
                board_id: board_id.clone(),
                source_list_id: l1.clone(),
                dest_list_id: l2.clone(),
                source_index,
                dest_index,
            })
            .unwrap();

        let src = &next.boards[&board_id].lists[&l1].card_ids;
        let dst = &next.boards[&board_id].lists[&l2].card_ids;
        prop_assert!(!src.contains(&moved));
        prop_assert_eq!(&dst[dest_index], &moved);
        prop_assert_eq!(src.len(), source_len - 1);
        prop_assert_eq!(dst.len(), dest_len + 1);
    }

    /// Dropping a card back where it was picked up changes nothing.
    #[test]
    fn same_slot_move_is_identity(len in 1usize..10, i in any::<usize>()) {
        let mut ids = SequentialIds::new("s");
        let mut store = Store::demo(&mut ids);
        let board_id = store.board_order[0].clone();
        let list_id = store.boards[&board_id].list_order[2].clone();
        for _ in 0..len {
            store = store
                .apply(&Command::AddCard {
                    board_id: board_id.clone(),
                    list_id: list_id.clone(),
                    card_id: ids.card_id(),
                    title: "C".to_string(),
                })
                .unwrap();
        }

        let index = i % len;
        let next = store
            .apply(&Command::MoveCard {
                board_id: board_id.clone(),
                source_list_id: list_id.clone(),
                dest_list_id: list_id.clone(),
                source_index: index,
                dest_index: index,
            })
            .unwrap();
        prop_assert_eq!(next, store);
    }

    /// Creating anything under an id that is already taken fails and leaves
    /// the store as it was.
    #[test]
    fn taken_ids_are_rejected(ops in prop::collection::vec(op(), 0..40), n in any::<usize>()) {
        let mut ids = SequentialIds::new("t");
        let mut store = Store::demo(&mut ids);
        for op in &ops {
            if let Some(command) = resolve(&store, op, &mut ids) {
                store = store.apply(&command).unwrap();
            }
        }

        for board in store.ordered_boards() {
            let board_id = board.id.clone();
            let dup_board = store
                .apply(&Command::CreateBoard { board_id: board_id.clone(), title: "Dup".to_string() });
            prop_assert!(dup_board.is_err());

            let Some(list_id) = pick(&board.list_order, n) else { continue };
            let dup_list = store
                .apply(&Command::AddList {
                    board_id: board_id.clone(),
                    list_id: list_id.clone(),
                    title: "Dup".to_string(),
                });
            prop_assert!(dup_list.is_err());

            let Some(card_id) = pick(&board.lists[&list_id].card_ids, n) else { continue };
            let dup_card = store
                .apply(&Command::AddCard {
                    board_id,
                    list_id,
                    card_id,
                    title: "Dup".to_string(),
                });
            prop_assert!(dup_card.is_err());
        }
        prop_assert!(store.validate().is_ok());
    }

    /// Exported state imports back to an equal store.
    #[test]
    fn export_import_roundtrip(ops in prop::collection::vec(op(), 0..40)) {
        let mut ids = SequentialIds::new("r");
        let mut store = Store::demo(&mut ids);
        for op in &ops {
            if let Some(command) = resolve(&store, op, &mut ids) {
                store = store.apply(&command).unwrap();
            }
        }

        let text = serde_json::to_string(&store).unwrap();
        let imported = Store::from_json_str(&text).unwrap();
        prop_assert_eq!(imported, store);
    }
}
