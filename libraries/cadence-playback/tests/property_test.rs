//! Property-based tests for the play queue
//!
//! Uses proptest to drive random operation sequences and check that the
//! cursor always points at a real song and that play order stays a
//! permutation of the list.

use cadence_core::{Song, SongId};
use cadence_playback::PlayQueue;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Advance(bool),
    Retreat(bool),
    RemoveCurrent(bool),
    Shuffle(bool),
    Replace(Vec<i64>),
}

fn arbitrary_ids() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::hash_set(1i64..200, 0..25).prop_map(|set| set.into_iter().collect())
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Advance),
        any::<bool>().prop_map(Op::Retreat),
        any::<bool>().prop_map(Op::RemoveCurrent),
        any::<bool>().prop_map(Op::Shuffle),
        arbitrary_ids().prop_map(Op::Replace),
    ]
}

fn songs(ids: &[i64]) -> Vec<Song> {
    ids.iter()
        .map(|&id| Song::new(SongId::new(id), format!("Song {id}"), "Artist", 60_000, format!("file:///{id}.mp3")))
        .collect()
}

proptest! {
    /// Property: the cursor never dangles
    #[test]
    fn current_is_always_a_queued_song(
        initial in arbitrary_ids(),
        ops in prop::collection::vec(arbitrary_op(), 0..60)
    ) {
        let mut queue = PlayQueue::new();
        queue.replace(songs(&initial));

        for op in ops {
            match op {
                Op::Advance(wrap) => { queue.advance(wrap); }
                Op::Retreat(wrap) => { queue.retreat(wrap); }
                Op::RemoveCurrent(wrap) => { queue.remove_current(wrap); }
                Op::Shuffle(on) => queue.set_shuffled(on),
                Op::Replace(ids) => { queue.replace(songs(&ids)); }
            }

            match queue.current() {
                Some(song) => prop_assert!(queue.songs().iter().any(|s| s.id == song.id)),
                None => prop_assert!(queue.is_empty()),
            }
        }
    }

    /// Property: walking forward from a fresh shuffle visits every song once
    #[test]
    fn shuffled_walk_visits_every_song(ids in arbitrary_ids()) {
        prop_assume!(!ids.is_empty());

        let mut queue = PlayQueue::new();
        queue.replace(songs(&ids));
        queue.set_shuffled(true);

        let mut seen = HashSet::new();
        seen.insert(queue.current().unwrap().id);
        while let Some(song) = queue.advance(false) {
            prop_assert!(seen.insert(song.id), "song visited twice");
        }
        prop_assert_eq!(seen.len(), ids.len());
    }

    /// Property: removing the current song shrinks the queue by exactly one
    /// and never leaves the removed song reachable
    #[test]
    fn remove_current_drops_exactly_one(ids in arbitrary_ids(), steps in 0usize..30, wrap in any::<bool>()) {
        prop_assume!(!ids.is_empty());

        let mut queue = PlayQueue::new();
        queue.replace(songs(&ids));
        for _ in 0..steps {
            queue.advance(true);
        }

        let removed = queue.current().unwrap().id;
        queue.remove_current(wrap);

        prop_assert_eq!(queue.len(), ids.len() - 1);
        prop_assert!(queue.position_of(removed).is_none());
    }
}
