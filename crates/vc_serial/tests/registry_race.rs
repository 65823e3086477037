//! First use of a registry from many threads at once.

use std::sync::{Arc, Barrier};
use std::thread;

use vc_serial::derive::Serial;
use vc_serial::{Described, EnumTable, Enumerated, MemberRegistry};

#[derive(Serial, Default, Debug, PartialEq)]
struct Contended {
    left: u32,
    right: Vec<String>,
}

#[derive(Serial, Default, Debug, Clone, PartialEq)]
enum Side {
    #[default]
    Left,
    Right,
}

const THREADS: usize = 16;

fn race<R: Send + 'static>(f: fn() -> R) -> Vec<R> {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                f()
            })
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn one_member_registry_per_type() {
    let seen = race(|| Contended::registry() as *const MemberRegistry<Contended> as usize);
    assert!(seen.iter().all(|&addr| addr == seen[0]));
    assert_eq!(Contended::registry().len(), 2);
}

#[test]
fn one_enum_table_per_type() {
    let seen = race(|| Side::table() as *const EnumTable<Side> as usize);
    assert!(seen.iter().all(|&addr| addr == seen[0]));
    assert_eq!(Side::table().name_of(&Side::Right), Some("Right"));
}

#[test]
fn concurrent_round_trips() {
    let texts = race(|| {
        let value = Contended {
            left: 9,
            right: vec![String::from("r")],
        };
        let text = vc_serial::to_json(&value).unwrap();
        vc_serial::from_json::<Contended>(&text).unwrap()
    });
    assert!(texts.iter().all(|value| value.left == 9 && value.right == ["r"]));
}
