mod common;

use std::sync::{Arc, Mutex};
use std::thread;

use chat_room::{Client, Message, Room};
use common::Probe;

#[test]
fn delivery_follows_insertion_order() {
    let room = Room::new("ordered");
    let log = Arc::new(Mutex::new(Vec::new()));
    for (id, name) in ["zoe", "adam", "mia"].into_iter().enumerate() {
        room.add(Probe::logging(id as u32, name, &log));
    }

    room.send(Message::chat("host", "go"));

    assert_eq!(*log.lock().unwrap(), ["zoe", "adam", "mia"]);
    assert_eq!(room.who(), ["adam", "mia", "zoe"]);
}

#[test]
fn each_member_receives_exactly_once() {
    let room = Room::new("once");
    let members: Vec<_> = (0..5).map(|i| Probe::new(i, &format!("m{i}"))).collect();
    for m in &members {
        room.add(m.clone());
    }

    room.send(Message::chat("a", "1"));
    room.tell("2");

    for m in &members {
        assert_eq!(m.inbox(), ["<a> 1", "* 2"]);
    }
    assert_eq!(room.get_messages(), ["<a> 1", "* 2"]);
}

#[test]
fn duplicate_adds_are_kept_and_removed_together() {
    let room = Room::new("dups");
    let p = Probe::new(1, "twice");
    room.add(p.clone());
    room.add(p.clone());
    assert_eq!(room.number_of_clients(), 2);

    room.tell("echo");
    assert_eq!(p.inbox(), ["* echo", "* echo"]);

    assert!(room.remove(&*p));
    assert!(room.is_empty());
    assert!(!room.remove(&*p));
}

#[test]
fn get_client_skips_removed_members() {
    let room = Room::new("lookup");
    room.add(Probe::new(1, "sam"));
    room.add(Probe::new(2, "sam"));

    room.remove(&*Probe::new(1, "ignored"));

    let found = room.get_client("sam").unwrap();
    assert!(found.equals(&*Probe::new(2, "")));
    assert!(room.present("sam"));
    assert!(!room.present("Sam"));
    assert!(room.get_client("pat").is_none());
}

#[test]
fn concurrent_membership_changes_keep_count() {
    let room = Arc::new(Room::new("busy"));

    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let room = Arc::clone(&room);
            thread::spawn(move || {
                for i in 0..100 {
                    room.add(Probe::new(t * 1000 + i, &format!("t{t}-{i}")));
                }
                for i in (0..100).step_by(2) {
                    assert!(room.remove(&*Probe::new(t * 1000 + i, "")));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(room.number_of_clients(), 8 * 50);
    assert_eq!(room.who().len(), 8 * 50);
}

#[test]
fn concurrent_sends_reach_everyone_and_are_logged() {
    let room = Arc::new(Room::new("loud"));
    let members: Vec<_> = (0..4).map(|i| Probe::new(i, &format!("m{i}"))).collect();
    for m in &members {
        room.add(m.clone());
    }

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let room = Arc::clone(&room);
            thread::spawn(move || {
                for i in 0..50 {
                    room.send(Message::chat(format!("s{t}"), i.to_string()));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for m in &members {
        assert_eq!(m.inbox().len(), 200);
    }
    assert_eq!(room.get_messages().len(), 200);
}

#[test]
fn sends_tolerate_churn() {
    let room = Arc::new(Room::new("churn"));
    let steady = Probe::new(0, "steady");
    room.add(steady.clone());

    let churner = {
        let room = Arc::clone(&room);
        thread::spawn(move || {
            for i in 1..200 {
                let p = Probe::new(i, "passing");
                room.add(p.clone());
                room.remove(&*p);
            }
        })
    };
    for i in 0..200 {
        room.tell(i.to_string());
    }
    churner.join().unwrap();

    assert_eq!(steady.inbox().len(), 200);
    assert_eq!(room.who(), ["steady"]);
}
