use musicnbrain_core::drag::DragSession;
use musicnbrain_core::performance::{Confidence, FieldUpdate, Performance};
use musicnbrain_core::readiness::PublishGate;
use musicnbrain_core::roster::{Roster, RosterConfig};

/// Small deterministic generator so sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}

fn assert_dense(roster: &Roster, step: &str) {
    let orders: Vec<u32> = roster.entries().iter().map(|p| p.order).collect();
    let expected: Vec<u32> = (1..=roster.len() as u32).collect();
    assert_eq!(orders, expected, "order not dense after {step}");
    assert_eq!(roster.summary().total, roster.len(), "stale summary after {step}");
}

#[test]
fn order_stays_dense_under_random_operations() {
    for seed in 0..20u64 {
        let mut rng = Lcg(seed);
        let mut roster = Roster::new("1", RosterConfig::default());

        for _ in 0..200 {
            let len = roster.len();
            let step = match rng.next(6) {
                0 | 1 => {
                    roster.add();
                    "add"
                }
                2 => {
                    // Unknown ids half the time.
                    let id = if len > 0 && rng.next(2) == 0 {
                        roster.entries()[rng.next(len)].id.clone()
                    } else {
                        "missing".to_string()
                    };
                    roster.delete(&id);
                    "delete"
                }
                3 => {
                    roster.move_up(rng.next(len + 1));
                    "move_up"
                }
                4 => {
                    roster.move_down(rng.next(len + 1));
                    "move_down"
                }
                _ => {
                    roster.reorder(rng.next(len + 1), rng.next(len + 1));
                    "reorder"
                }
            };
            assert_dense(&roster, step);
        }
    }
}

#[test]
fn reorder_is_splice_and_move_up_is_swap() {
    let make = || {
        let entries = ["A", "B", "C", "D"]
            .iter()
            .map(|n| {
                let mut p = Performance::blank(*n, "1", 0, Confidence::High);
                p.name = n.to_string();
                p
            })
            .collect();
        Roster::from_entries("1", entries, RosterConfig::default()).unwrap()
    };
    let names = |r: &Roster| -> Vec<String> { r.entries().iter().map(|p| p.name.clone()).collect() };

    let mut spliced = make();
    spliced.reorder(0, 2);
    assert_eq!(names(&spliced), ["B", "C", "A", "D"]);

    let mut swapped = make();
    swapped.move_up(1);
    assert_eq!(names(&swapped), ["B", "A", "C", "D"]);

    let mut dragged = make();
    let mut drag = DragSession::start(0);
    drag.hover(2);
    drag.finish(&mut dragged);
    assert_eq!(names(&dragged), names(&spliced));
}

#[test]
fn incomplete_row_blocks_minimal_gate() {
    let entries = (1..=3)
        .map(|i| {
            let mut p = Performance::blank(i.to_string(), "1", 0, Confidence::High);
            p.name = format!("Performer {i}");
            p.piece = format!("Piece {i}");
            p
        })
        .collect();
    let mut roster = Roster::from_entries(
        "1",
        entries,
        RosterConfig {
            default_confidence: Confidence::High,
            publish_gate: PublishGate::NamePiece,
        },
    )
    .unwrap();
    assert!(roster.can_publish());

    let id = roster.add();
    roster.update_field(&id, FieldUpdate::Piece("X".into()));
    assert!(!roster.can_publish());
}

#[test]
fn edit_add_and_move_scenario() {
    let mut tommy = Performance::blank("1", "1", 1, Confidence::Low);
    tommy.name = "Tommy".into();
    tommy.piece = "Fur Elise".into();
    tommy.duration = 4;
    let mut roster = Roster::from_entries("1", vec![tommy], RosterConfig::default()).unwrap();

    assert!(roster.update_field("1", FieldUpdate::parse("name", "Tommy Lee").unwrap()));
    let new_id = roster.add();
    assert_eq!(roster.get(&new_id).unwrap().order, 2);
    assert!(roster.move_up(1));

    let entries = roster.entries();
    assert_eq!(entries[0].id, new_id);
    assert_eq!(entries[0].order, 1);
    assert!(entries[0].name.is_empty());
    assert!(entries[0].piece.is_empty());
    assert_eq!(entries[1].id, "1");
    assert_eq!(entries[1].order, 2);
    assert_eq!(entries[1].name, "Tommy Lee");
    assert_eq!(entries[1].confidence, Confidence::Low);
}
