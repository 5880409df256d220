//! Property-based tests for the queue
//!
//! Uses proptest to check the reordering invariants over random operation
//! sequences and shuffles.

use cyfral_core::{ItemKind, PlaylistItem};
use cyfral_playback::shuffle::pick_other_index;
use cyfral_playback::{MoveDirection, Queue};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ===== Helpers =====

fn items(n: usize) -> Vec<PlaylistItem> {
    (0..n)
        .map(|i| {
            PlaylistItem::new(
                format!("t{i}"),
                format!("Track {i}"),
                "Lil Cyfral",
                format!("/audio/t{i}.mp3"),
                ItemKind::Track,
            )
        })
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Move(usize, MoveDirection),
    Reorder(usize, usize),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..12, any::<bool>()).prop_map(|(i, up)| {
            Op::Move(i, if up { MoveDirection::Up } else { MoveDirection::Down })
        }),
        (0usize..12, 0usize..12).prop_map(|(from, to)| Op::Reorder(from, to)),
    ]
}

fn sorted_ids(queue: &Queue) -> Vec<String> {
    let mut ids: Vec<_> = queue.items().iter().map(|i| i.id.clone()).collect();
    ids.sort();
    ids
}

// ===== Property Tests =====

proptest! {
    /// Property: reordering never changes the length, the item set, or
    /// anything at or before the current index
    #[test]
    fn reordering_keeps_prefix_and_items(
        len in 1usize..10,
        current in 0usize..10,
        ops in prop::collection::vec(arbitrary_op(), 1..40)
    ) {
        let current = current % len;
        let mut queue = Queue::new(items(len));
        queue.set_current(current);

        let expected_set = sorted_ids(&queue);
        let prefix: Vec<_> = queue.items()[..=current].to_vec();

        for op in ops {
            match op {
                Op::Move(i, dir) => { queue.move_item(i, dir); }
                Op::Reorder(from, to) => { queue.reorder(from, to); }
            }

            prop_assert_eq!(queue.len(), len);
            prop_assert_eq!(&queue.items()[..=current], &prefix[..]);
            prop_assert_eq!(queue.current_index(), Some(current));
        }

        prop_assert_eq!(sorted_ids(&queue), expected_set);
    }

    /// Property: shuffling pins the current item first and keeps every item
    #[test]
    fn shuffle_pins_current(len in 1usize..30, current in 0usize..30, seed in any::<u64>()) {
        let current = current % len;
        let mut queue = Queue::new(items(len));
        queue.set_current(current);
        let playing = queue.current_item().cloned();
        let expected_set = sorted_ids(&queue);

        let mut rng = StdRng::seed_from_u64(seed);
        queue.pin_current_and_shuffle(&mut rng);

        prop_assert_eq!(queue.current_index(), Some(0));
        prop_assert_eq!(queue.current_item().cloned(), playing.clone());
        prop_assert_eq!(sorted_ids(&queue), expected_set);

        let master = items(len);
        queue.restore(&master);
        prop_assert_eq!(queue.items(), &master[..]);
        prop_assert_eq!(queue.current_item().cloned(), playing);
    }

    /// Property: the shuffle pick is in range and never the current index
    #[test]
    fn other_index_excludes_current(len in 2usize..50, current in 0usize..50, seed in any::<u64>()) {
        let current = current % len;
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..20 {
            let pick = pick_other_index(len, Some(current), &mut rng);
            prop_assert!(pick.is_some());
            let pick = pick.unwrap();
            prop_assert!(pick < len);
            prop_assert_ne!(pick, current);
        }
    }
}
