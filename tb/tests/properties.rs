//! Property tests for board ordering and recycle bin bounds

use proptest::prelude::*;

use taskboard::board::BoardState;
use taskboard::domain::{Column, Task};
use taskboard::recycle::RecycleBin;
use taskboard::state::KanbanState;

fn board_with_columns(count: usize) -> BoardState {
    BoardState::new((0..count).map(|i| Column::new(format!("c{}", i), format!("Column {}", i))).collect())
}

fn column_ids(board: &BoardState) -> Vec<String> {
    board.columns().iter().map(|c| c.id.clone()).collect()
}

proptest! {
    #[test]
    fn move_column_matches_remove_then_insert(count in 1usize..8, from in 0usize..8, to in 0usize..8) {
        let mut board = board_with_columns(count);
        let mut expected = column_ids(&board);

        let changed = board.move_column(from, to);

        if from < count && to < count && from != to {
            let moved = expected.remove(from);
            expected.insert(to, moved);
            prop_assert!(changed);
        } else {
            prop_assert!(!changed);
        }
        prop_assert_eq!(column_ids(&board), expected);
    }

    #[test]
    fn added_task_appears_once_with_owner(ids in prop::collection::vec("[a-z]{1,4}", 1..20), target in 0usize..3) {
        let mut board = BoardState::default();
        let column_id = board.columns()[target].id.clone();

        for id in &ids {
            board.add_task(&column_id, Task::new(id.clone(), "x"));
        }

        let column = board.column(&column_id).unwrap();
        for id in &ids {
            let hits: Vec<&Task> = column.tasks.iter().filter(|t| &t.id == id).collect();
            prop_assert_eq!(hits.len(), 1);
            prop_assert_eq!(&hits[0].column_id, &column_id);
        }
    }

    #[test]
    fn moved_task_lands_at_destination_tail(count in 1usize..6, pick in 0usize..6, dest in 0usize..3) {
        let mut board = BoardState::default();
        for i in 0..count {
            board.add_task("todo", Task::new(format!("t{}", i), "x"));
        }
        board.add_task("done", Task::new("existing", "x"));
        let task_id = format!("t{}", pick % count);
        let to = board.columns()[dest].id.clone();

        prop_assert!(board.move_task("todo", &to, &task_id));

        let destination = board.column(&to).unwrap();
        let last = destination.tasks.last().unwrap();
        prop_assert_eq!(&last.id, &task_id);
        prop_assert_eq!(&last.column_id, &to);
        if to != "todo" {
            prop_assert!(!board.column("todo").unwrap().contains_task(&task_id));
        }
    }

    #[test]
    fn bin_keeps_most_recent_up_to_capacity(capacity in 1usize..10, deletes in 0usize..30) {
        let mut state = KanbanState::new(BoardState::default(), RecycleBin::new(capacity));
        for i in 0..deletes {
            let id = format!("t{}", i);
            state.add_task("todo", Task::new(id.clone(), "x"));
            state.delete_task("todo", &id);
        }

        let bin = state.bin();
        prop_assert_eq!(bin.len(), deletes.min(capacity));
        let ids: Vec<&str> = bin.iter().map(|e| e.id()).collect();
        let expected: Vec<String> = (0..deletes).rev().take(capacity).map(|i| format!("t{}", i)).collect();
        prop_assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn task_never_on_board_and_in_bin(ops in prop::collection::vec((0u8..4, 0usize..5), 0..40)) {
        let mut state = KanbanState::default();
        for (op, n) in ops {
            let id = format!("t{}", n);
            match op {
                // Ids are caller-supplied; only add ones not already in play
                0 => {
                    if state.board().find_task(&id).is_none() && state.bin().get(&id).is_none() {
                        state.add_task("todo", Task::new(id, "x"));
                    }
                }
                1 => { state.delete_task("todo", &id); }
                2 => { state.restore_task(&id); }
                _ => { state.move_task("todo", "done", &id); }
            }
        }

        for entry in state.bin().iter() {
            prop_assert!(state.board().find_task(entry.id()).is_none());
        }
    }
}
