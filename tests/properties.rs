//! Property-based tests for room membership.

mod common;

use chat_room::{Client, Room};
use common::Probe;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(u32),
    Remove(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(0u32..6).prop_map(Op::Add), (0u32..6).prop_map(Op::Remove)]
}

/// Property: who() is sorted no matter the insertion order
#[test]
fn prop_who_is_sorted() {
    proptest!(|(names in prop::collection::vec("[a-z]{1,6}", 0..20))| {
        let room = Room::new("p");
        for (i, name) in names.iter().enumerate() {
            room.add(Probe::new(i as u32, name));
        }

        let mut expected = names.clone();
        expected.sort();
        prop_assert_eq!(room.who(), expected);
    });
}

/// Property: count tracks adds minus removed entries, and remove reports
/// whether anything matched
#[test]
fn prop_count_matches_model() {
    proptest!(|(ops in prop::collection::vec(op(), 0..60))| {
        let room = Room::new("p");
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                Op::Add(id) => {
                    room.add(Probe::new(id, &format!("n{id}")));
                    model.push(id);
                }
                Op::Remove(id) => {
                    let expected = model.contains(&id);
                    model.retain(|&m| m != id);
                    prop_assert_eq!(room.remove(&*Probe::new(id, "")), expected);
                }
            }
            prop_assert_eq!(room.number_of_clients(), model.len());
            prop_assert_eq!(room.is_empty(), model.is_empty());
        }
    });
}

/// Property: get_client returns the earliest surviving member with that name
#[test]
fn prop_get_client_is_first_match() {
    proptest!(|(entries in prop::collection::vec((0u32..8, "[ab]"), 1..20), drop_id in 0u32..8)| {
        let room = Room::new("p");
        for (id, name) in &entries {
            room.add(Probe::new(*id, name));
        }
        room.remove(&*Probe::new(drop_id, ""));

        for name in ["a", "b"] {
            let expected = entries
                .iter()
                .find(|(id, n)| *id != drop_id && n == name)
                .map(|(id, _)| *id);
            let found = room.get_client(name).map(|c| {
                c.as_any().downcast_ref::<Probe>().map(|p| p.id)
            });
            prop_assert_eq!(found.flatten(), expected);
        }
    });
}
