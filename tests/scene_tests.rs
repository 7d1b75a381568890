//! Scene tests - piece lifecycle and collision

use ntetris::core::{pattern_for, LoweringResult, Pattern, RubbleEvent, Scene, Shape, SimError};
use ntetris::types::{PieceKind, Player};

fn piece(rows: &[&str], h: i32, v: i32, player: Player) -> Shape {
    Shape::player(Pattern::parse(rows).unwrap(), h, v, player.fall_speed())
}

#[test]
fn test_pieces_meeting_head_on_both_become_rubble() {
    let mut scene = Scene::new(6, 2).unwrap();
    assert_eq!(
        scene.attempt_add_player_shape(Player::Left, piece(&["X"], 2, 0, Player::Left)),
        Ok(true)
    );
    assert_eq!(
        scene.attempt_add_player_shape(Player::Right, piece(&["X"], 3, 0, Player::Right)),
        Ok(true)
    );

    assert_eq!(
        scene.lower_shape(Player::Left),
        Ok(Some(LoweringResult::BecameRubble))
    );
    assert!(scene.player_shape(Player::Left).is_none());
    assert!(scene.player_shape(Player::Right).is_none());
    assert_eq!(scene.rubble_at(2, 0), Some(&Shape::rubble(2, 0)));
    assert_eq!(scene.rubble_at(3, 0), Some(&Shape::rubble(3, 0)));
    assert_eq!(scene.rubble_count(), 2);
}

#[test]
fn test_lowering_into_rubble_converts_in_place() {
    let mut scene = Scene::new(8, 3).unwrap();
    scene.add_rubble(Shape::rubble(3, 1)).unwrap();
    scene.drain_events();
    scene
        .attempt_add_player_shape(Player::Left, piece(&["XX"], 1, 0, Player::Left))
        .unwrap();

    assert_eq!(
        scene.lower_shape(Player::Left),
        Ok(Some(LoweringResult::Lowered))
    );
    assert_eq!(
        scene.lower_shape(Player::Left),
        Ok(Some(LoweringResult::BecameRubble))
    );
    assert_eq!(
        scene.drain_events(),
        vec![
            RubbleEvent::Added(Shape::rubble(2, 0)),
            RubbleEvent::Added(Shape::rubble(2, 1)),
        ]
    );
}

#[test]
fn test_hard_drop_runs_to_a_terminal_result() {
    let mut scene = Scene::new(10, 4).unwrap();
    scene
        .attempt_add_player_shape(
            Player::Right,
            Shape::player(pattern_for(PieceKind::T), 8, 0, -1),
        )
        .unwrap();
    assert_eq!(
        scene.drop_shape(Player::Right),
        Ok(Some(LoweringResult::ReachedBottom))
    );
    assert!(scene.player_shape(Player::Right).is_none());
    assert_eq!(scene.rubble_count(), 0);
    assert_eq!(scene.drop_shape(Player::Right), Ok(None));
}

#[test]
fn test_spawn_contract_violations() {
    let mut scene = Scene::new(6, 4).unwrap();
    assert_eq!(
        scene.attempt_add_player_shape(Player::Left, Shape::player(Pattern::single_block(), 0, 0, 0)),
        Err(SimError::StationaryPlayerShape(Player::Left))
    );
    assert!(matches!(
        scene.attempt_add_player_shape(Player::Left, piece(&["XX"], 0, 3, Player::Left)),
        Err(SimError::ShapeOutOfBounds { .. })
    ));
}

#[test]
fn test_spawn_rejected_by_other_player() {
    let mut scene = Scene::new(6, 4).unwrap();
    scene
        .attempt_add_player_shape(Player::Left, piece(&["X", "X"], 0, 0, Player::Left))
        .unwrap();
    assert_eq!(
        scene.attempt_add_player_shape(Player::Right, piece(&["X"], 1, 0, Player::Right)),
        Ok(false)
    );
    assert!(scene.player_shape(Player::Right).is_none());
}

#[test]
fn test_vertical_shift_into_other_player_converts_both() {
    let mut scene = Scene::new(6, 3).unwrap();
    scene
        .attempt_add_player_shape(Player::Left, piece(&["X"], 2, 0, Player::Left))
        .unwrap();
    scene
        .attempt_add_player_shape(Player::Right, piece(&["X"], 2, 1, Player::Right))
        .unwrap();
    assert_eq!(scene.move_player_shape_vertically(Player::Left, 1), Ok(false));
    assert!(scene.player_shape(Player::Left).is_none());
    assert!(scene.player_shape(Player::Right).is_none());
    assert_eq!(scene.rubble_count(), 2);
}

#[test]
fn test_vertical_shift_blocked_by_rubble() {
    let mut scene = Scene::new(6, 3).unwrap();
    scene.add_rubble(Shape::rubble(1, 1)).unwrap();
    scene
        .attempt_add_player_shape(Player::Left, piece(&["X"], 1, 0, Player::Left))
        .unwrap();
    assert_eq!(scene.move_player_shape_vertically(Player::Left, 1), Ok(false));
    assert_eq!(
        scene.player_shape(Player::Left).map(Shape::vertical_offset),
        Some(0)
    );
}

#[test]
fn test_rotation_blocked_by_bounds_and_rubble() {
    let mut scene = Scene::new(8, 4).unwrap();
    let bar = Shape::player(pattern_for(PieceKind::I), 2, 0, 1);
    scene.attempt_add_player_shape(Player::Left, bar.clone()).unwrap();
    // rotated bar would start at row -1
    assert!(!scene.rotate_players_shape(Player::Left));
    assert_eq!(scene.player_shape(Player::Left), Some(&bar));

    scene.move_player_shape_vertically(Player::Left, 1).unwrap();
    scene.add_rubble(Shape::rubble(3, 3)).unwrap();
    assert!(!scene.rotate_players_shape(Player::Left));

    let mut open = Scene::new(8, 4).unwrap();
    open.attempt_add_player_shape(Player::Left, bar.with_vertical_offset(1))
        .unwrap();
    assert!(open.rotate_players_shape(Player::Left));
    let rotated = open.player_shape(Player::Left).unwrap();
    assert_eq!(rotated.pattern(), &pattern_for(PieceKind::Dash));
    assert_eq!((rotated.horizontal_offset(), rotated.vertical_offset()), (3, 0));
}

#[test]
fn test_no_piece_means_no_op() {
    let mut scene = Scene::new(6, 4).unwrap();
    assert_eq!(scene.lower_shape(Player::Left), Ok(None));
    assert_eq!(scene.move_player_shape_vertically(Player::Right, 1), Ok(false));
    assert!(!scene.rotate_players_shape(Player::Left));
    assert!(scene.remove_player_shape(Player::Left).is_none());
}
