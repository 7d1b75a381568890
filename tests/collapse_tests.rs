//! Collapse and cascade scenarios, driven through textual snapshots

use ntetris::core::{pattern_for, LoweringResult, RubbleEvent, Scene, Shape};
use ntetris::types::{PieceKind, Player};

fn settle(scene: &mut Scene) -> Vec<usize> {
    let mut steps = Vec::new();
    loop {
        let moved = scene.advance_rubble().unwrap();
        if moved == 0 {
            return steps;
        }
        steps.push(moved);
    }
}

fn collapsed_columns(events: &[RubbleEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            RubbleEvent::ColumnCollapsed(col) => Some(*col),
            _ => None,
        })
        .collect()
}

#[test]
fn test_two_columns_collapse_and_rubble_slides_to_the_wall() {
    let mut scene = Scene::from_pretty_print(
        "[   ][ O ][ O ][ O ]\n\
         [ O ][ O ][ O ][ O ]\n\
         [ O ][ O ][ O ][ O ]\n\
         [ O ][ R ][ R ][   ]",
    )
    .unwrap();

    assert_eq!(
        scene.drop_shape(Player::Right),
        Ok(Some(LoweringResult::BecameRubble))
    );
    let events = scene.drain_events();
    assert_eq!(collapsed_columns(&events), vec![1, 2]);
    let first_collapse = events
        .iter()
        .position(|e| *e == RubbleEvent::ColumnCollapsed(1))
        .unwrap();
    assert!(events[..first_collapse]
        .iter()
        .any(|e| matches!(e, RubbleEvent::Removed(s) if s.horizontal_offset() == 1)));

    assert_eq!(
        scene.pretty_print(),
        "[   ][   ][   ][<00]\n\
         [ O ][   ][   ][<00]\n\
         [ O ][   ][   ][<00]\n\
         [ O ][   ][   ][   ]"
    );

    assert_eq!(settle(&mut scene), vec![3, 3, 3]);
    assert_eq!(
        scene.pretty_print(),
        "[   ][ O ][   ][   ]\n\
         [ O ][ O ][   ][   ]\n\
         [ O ][ O ][   ][   ]\n\
         [ O ][   ][   ][   ]"
    );
    assert!(!scene.has_falling_rubble());
}

#[test]
fn test_left_player_collapse_is_mirrored() {
    let mut scene = Scene::from_pretty_print(
        "[ O ][ O ][ O ][   ]\n\
         [ O ][ O ][ O ][ O ]\n\
         [ O ][ O ][ O ][ O ]\n\
         [   ][ L ][ L ][ O ]",
    )
    .unwrap();

    scene.drop_shape(Player::Left).unwrap();
    // scanned from the far edge back toward the spawn edge
    assert_eq!(collapsed_columns(&scene.drain_events()), vec![2, 1]);
    assert_eq!(
        scene.pretty_print(),
        "[>03][   ][   ][   ]\n\
         [>03][   ][   ][ O ]\n\
         [>03][   ][   ][ O ]\n\
         [   ][   ][   ][ O ]"
    );

    assert_eq!(settle(&mut scene), vec![3, 3, 3]);
    assert_eq!(
        scene.pretty_print(),
        "[   ][   ][ O ][   ]\n\
         [   ][   ][ O ][ O ]\n\
         [   ][   ][ O ][ O ]\n\
         [   ][   ][   ][ O ]"
    );
}

#[test]
fn test_bar_through_divider_holes() {
    let mut scene = Scene::new(6, 6).unwrap();
    scene.add_rubble_column_with_hole(3, 1).unwrap();
    scene.add_rubble_column_with_hole(4, 1).unwrap();
    scene.add_rubble_column_with_hole(5, 2).unwrap();
    let bar = Shape::player(pattern_for(PieceKind::I), 0, 1, 1);
    assert_eq!(scene.attempt_add_player_shape(Player::Left, bar), Ok(true));

    assert_eq!(
        scene.drop_shape(Player::Left),
        Ok(Some(LoweringResult::BecameRubble))
    );
    assert_eq!(
        scene.pretty_print(),
        "[   ][   ][   ][   ][   ][ O ]\n\
         [   ][>05][>05][   ][   ][ O ]\n\
         [   ][   ][   ][   ][   ][   ]\n\
         [   ][   ][   ][   ][   ][ O ]\n\
         [   ][   ][   ][   ][   ][ O ]\n\
         [   ][   ][   ][   ][   ][ O ]"
    );

    // the pair travels as a train and stops against the surviving column
    assert_eq!(settle(&mut scene), vec![2, 2, 2]);
    assert_eq!(
        scene.pretty_print(),
        "[   ][   ][   ][   ][   ][ O ]\n\
         [   ][   ][   ][ O ][ O ][ O ]\n\
         [   ][   ][   ][   ][   ][   ]\n\
         [   ][   ][   ][   ][   ][ O ]\n\
         [   ][   ][   ][   ][   ][ O ]\n\
         [   ][   ][   ][   ][   ][ O ]"
    );
}

#[test]
fn test_gap_ends_the_falling_cluster() {
    let mut scene = Scene::from_pretty_print(
        "[   ][ O ][   ][ O ]\n\
         [ O ][ O ][   ][ O ]\n\
         [ O ][ O ][   ][ O ]\n\
         [ O ][ R ][ R ][   ]",
    )
    .unwrap();

    scene.drop_shape(Player::Right).unwrap();
    assert_eq!(collapsed_columns(&scene.drain_events()), vec![1]);
    // only the piece's own leftover cell touches the gap
    let falling: Vec<(i32, i32)> = scene
        .rubble()
        .filter(|s| s.is_falling())
        .map(|s| (s.horizontal_offset(), s.vertical_offset()))
        .collect();
    assert_eq!(falling, vec![(2, 3)]);

    assert_eq!(settle(&mut scene), vec![1, 1]);
    assert_eq!(
        scene.pretty_print(),
        "[   ][   ][   ][ O ]\n\
         [ O ][   ][   ][ O ]\n\
         [ O ][   ][   ][ O ]\n\
         [ O ][ O ][   ][   ]"
    );
}

#[test]
fn test_falling_cell_completing_a_column_cascades() {
    let mut scene = Scene::from_pretty_print(
        "[ O ][   ][<00]\n\
         [ O ][ O ][   ]",
    )
    .unwrap();

    assert_eq!(scene.advance_rubble(), Ok(1));
    let events = scene.drain_events();
    let moved = Shape::falling_rubble(1, 0, -1, Some(0), Some(Player::Right));
    assert_eq!(
        events,
        vec![
            RubbleEvent::Amended {
                old: Shape::falling_rubble(2, 0, -1, Some(0), Some(Player::Right)),
                new: moved.clone(),
            },
            RubbleEvent::Removed(moved),
            RubbleEvent::Removed(Shape::rubble(1, 1)),
            RubbleEvent::ColumnCollapsed(1),
        ]
    );
    assert_eq!(scene.pretty_print(), "[ O ][   ][   ]\n[ O ][   ][   ]");
    assert_eq!(scene.advance_rubble(), Ok(0));
}

#[test]
fn test_falling_rubble_waits_for_player_moving_the_same_way() {
    let mut scene = Scene::from_pretty_print("[ R ][<--][   ]").unwrap();
    assert_eq!(scene.advance_rubble(), Ok(0));
    assert!(scene.has_falling_rubble());

    let mut opposed = Scene::from_pretty_print("[ L ][<--][   ]").unwrap();
    assert_eq!(opposed.advance_rubble(), Ok(1));
    assert_eq!(opposed.rubble_at(1, 0), Some(&Shape::rubble(1, 0)));
}

#[test]
fn test_identical_scenes_evolve_identically() {
    let text = "[   ][ O ][ O ][ O ]\n\
                [ O ][ O ][ O ][ O ]\n\
                [ O ][ O ][ O ][ O ]\n\
                [ O ][ R ][ R ][   ]";
    let run = || {
        let mut scene = Scene::from_pretty_print(text).unwrap();
        scene.drop_shape(Player::Right).unwrap();
        settle(&mut scene);
        (scene.pretty_print(), scene.drain_events())
    };
    assert_eq!(run(), run());
}
