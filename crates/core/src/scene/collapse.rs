//! Rubble collapse, cascade and single-step rubble motion.
//!
//! A collapse scans the fall-axis span a player's piece covered, mirrored per
//! player by a [`FallDirection`]. Full columns are removed; the rubble behind
//! the first collapsed column (toward the triggering player's spawn edge) is
//! then set falling toward the gap, one row cluster at a time.

use log::{debug, error, log_enabled, Level};

use super::{RubbleEvent, Scene};
use crate::error::{Result, SimError};
use crate::types::Player;

/// Outcome of [`Scene::move_rubble`] for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubbleMove {
    /// Empty cell or static rubble.
    Idle,
    /// Waiting on a neighbour falling the same way.
    Blocked,
    /// Hit an obstacle and became static.
    Stopped,
    /// Moved into column `col`.
    Moved { col: i32 },
}

/// Scan geometry of a collapse triggered by one player.
#[derive(Debug, Clone, Copy)]
struct FallDirection {
    drop_speed: i32,
}

impl FallDirection {
    fn of(player: Player) -> Self {
        Self {
            drop_speed: player.fall_speed(),
        }
    }

    fn scan_step(self) -> i32 {
        -self.drop_speed
    }

    /// Span positions in scan order: away from the far edge first.
    fn scan(self, start: i32, span: i32) -> impl Iterator<Item = i32> {
        let origin = if self.drop_speed > 0 {
            start + span - 1
        } else {
            start
        };
        let step = self.scan_step();
        (0..span).map(move |i| origin + i * step)
    }

    /// Columns behind `first`, walking toward the player's spawn edge.
    fn cascade(self, first: i32, width: i32) -> impl Iterator<Item = i32> {
        let step = self.scan_step();
        std::iter::successors(Some(first + step), move |x| Some(x + step))
            .take_while(move |x| (0..width).contains(x))
    }

    fn is_beyond(self, col: i32, last: i32) -> bool {
        (col - last) * self.scan_step() > 0
    }

    fn wall(self, first: i32, width: i32) -> i32 {
        (first + self.drop_speed).clamp(0, width - 1)
    }
}

fn same_direction(a: i32, b: i32) -> bool {
    a.signum() == b.signum()
}

impl Scene {
    fn column_is_full(&self, col: i32) -> bool {
        (0..self.height as i32).all(|row| self.rubble_at(col, row).is_some())
    }

    fn collapse_column(&mut self, col: i32) {
        for row in 0..self.height as i32 {
            if let Some(idx) = self.index(col, row) {
                if let Some(shape) = self.rubble[idx].take() {
                    self.events.push(RubbleEvent::Removed(shape));
                }
            }
        }
        self.events.push(RubbleEvent::ColumnCollapsed(col as usize));
    }

    /// Collapse full columns within `span` columns from `start`, then set the
    /// rubble behind them falling toward the gap on behalf of `player`.
    pub(super) fn maybe_collapse_rubble(&mut self, player: Player, start: i32, span: i32) -> Result<()> {
        let dir = FallDirection::of(player);
        let width = self.width as i32;

        let mut collapsed: Option<(i32, i32)> = None;
        for col in dir.scan(start, span) {
            if !(0..width).contains(&col) || !self.column_is_full(col) {
                continue;
            }
            self.collapse_column(col);
            debug!("player {} collapsed column {}", player, col);
            collapsed = Some(match collapsed {
                Some((first, _)) => (first, col),
                None => (col, col),
            });
        }
        let Some((first, last)) = collapsed else {
            return Ok(());
        };

        let wall = dir.wall(first, width);
        let mut cluster_ended = vec![false; self.height];
        for col in dir.cascade(first, width) {
            for row in 0..self.height {
                if cluster_ended[row] {
                    continue;
                }
                let Some(idx) = self.index(col, row as i32) else {
                    continue;
                };
                match self.rubble[idx].as_ref() {
                    Some(shape) => {
                        let falling = shape.with_fall(dir.drop_speed, Some(wall), Some(player));
                        if &falling != shape {
                            let old = shape.clone();
                            self.rubble[idx] = Some(falling.clone());
                            self.events.push(RubbleEvent::Amended { old, new: falling });
                        }
                    }
                    None if dir.is_beyond(col, last) => cluster_ended[row] = true,
                    None => {}
                }
            }
        }
        Ok(())
    }

    /// Advance the rubble cell at `(col, row)` by one step of its own speed.
    pub fn move_rubble(&mut self, col: i32, row: i32) -> Result<RubbleMove> {
        let Some(shape) = self.rubble_at(col, row).cloned() else {
            return Ok(RubbleMove::Idle);
        };
        if !shape.is_falling() {
            return Ok(RubbleMove::Idle);
        }

        let speed = shape.horizontal_speed();
        let candidate = col + speed;
        let new_shape = if shape.invisible_wall() == Some(candidate)
            || !(0..self.width as i32).contains(&candidate)
        {
            debug!("{:?} hit invisible wall {}, stopped", shape, candidate);
            shape.stop_falling()
        } else if let Some(other) = self.rubble_at(candidate, row) {
            if same_direction(speed, other.horizontal_speed()) {
                return Ok(RubbleMove::Blocked);
            }
            debug!("{:?} hit rubble {:?}, stopped", shape, other);
            shape.stop_falling()
        } else if let Some(piece) = self.player_with_element_at(candidate, row) {
            if same_direction(speed, piece.horizontal_speed()) {
                return Ok(RubbleMove::Blocked);
            }
            debug!("{:?} hit player piece, stopped", shape);
            shape.stop_falling()
        } else {
            shape.with_horizontal_offset(candidate)
        };

        self.take_cell(&shape)?;
        self.put_cell(new_shape.clone())?;
        self.events.push(RubbleEvent::Amended {
            old: shape,
            new: new_shape.clone(),
        });

        if !new_shape.is_falling() {
            return Ok(RubbleMove::Stopped);
        }
        if let Some(cause) = new_shape.fall_caused_by() {
            self.maybe_collapse_rubble(cause, candidate, 1)?;
        }
        Ok(RubbleMove::Moved { col: candidate })
    }

    /// One discrete rubble step, resolved to a fixed point.
    ///
    /// Every falling cell moves or stops at most once. Cells blocked by a
    /// neighbour falling the same way are retried in later sweeps of the same
    /// step, so a train of cells advances together. Returns the number of
    /// cells that moved or stopped.
    pub fn advance_rubble(&mut self) -> Result<usize> {
        let limit = self.width * self.height;
        let mut settled = vec![false; self.rubble.len()];
        let mut changes = 0;

        for sweep in 0..=limit {
            let mut progressed = false;
            for col in 0..self.width as i32 {
                for row in 0..self.height as i32 {
                    let Some(idx) = self.index(col, row) else {
                        continue;
                    };
                    if settled[idx] {
                        continue;
                    }
                    match self.move_rubble(col, row)? {
                        RubbleMove::Idle | RubbleMove::Blocked => {}
                        RubbleMove::Stopped => {
                            settled[idx] = true;
                            progressed = true;
                            changes += 1;
                        }
                        RubbleMove::Moved { col: to } => {
                            if let Some(dest) = self.index(to, row) {
                                settled[dest] = true;
                            }
                            progressed = true;
                            changes += 1;
                        }
                    }
                }
            }
            if !progressed {
                return Ok(changes);
            }
            if log_enabled!(Level::Debug) {
                debug!("rubble sweep {}:\n{}", sweep, self.pretty_print());
            }
        }

        let snapshot = self.pretty_print();
        error!("stuck resolving rubble after {} sweeps:\n{}", limit, snapshot);
        Err(SimError::StuckResolution {
            iterations: limit,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    #[test]
    fn test_scan_order_is_mirrored() {
        let left: Vec<_> = FallDirection::of(Player::Left).scan(3, 3).collect();
        let right: Vec<_> = FallDirection::of(Player::Right).scan(3, 3).collect();
        assert_eq!(left, vec![5, 4, 3]);
        assert_eq!(right, vec![3, 4, 5]);
    }

    #[test]
    fn test_cascade_walks_toward_spawn_edge() {
        let left: Vec<_> = FallDirection::of(Player::Left).cascade(2, 6).collect();
        let right: Vec<_> = FallDirection::of(Player::Right).cascade(2, 6).collect();
        assert_eq!(left, vec![1, 0]);
        assert_eq!(right, vec![3, 4, 5]);
    }

    #[test]
    fn test_wall_is_clamped() {
        assert_eq!(FallDirection::of(Player::Left).wall(5, 6), 5);
        assert_eq!(FallDirection::of(Player::Left).wall(2, 6), 3);
        assert_eq!(FallDirection::of(Player::Right).wall(0, 6), 0);
        assert_eq!(FallDirection::of(Player::Right).wall(3, 6), 2);
    }

    #[test]
    fn test_is_beyond() {
        let left = FallDirection::of(Player::Left);
        assert!(left.is_beyond(1, 2));
        assert!(!left.is_beyond(3, 2));
        let right = FallDirection::of(Player::Right);
        assert!(right.is_beyond(3, 2));
        assert!(!right.is_beyond(2, 2));
    }

    #[test]
    fn test_static_rubble_is_idle() {
        let mut scene = Scene::new(4, 2).unwrap();
        scene.add_rubble(Shape::rubble(1, 0)).unwrap();
        assert_eq!(scene.move_rubble(1, 0), Ok(RubbleMove::Idle));
        assert_eq!(scene.move_rubble(2, 0), Ok(RubbleMove::Idle));
    }

    #[test]
    fn test_rubble_stops_at_wall() {
        let mut scene = Scene::new(6, 2).unwrap();
        scene
            .add_rubble(Shape::falling_rubble(4, 0, -1, Some(2), Some(Player::Right)))
            .unwrap();
        assert_eq!(scene.move_rubble(4, 0), Ok(RubbleMove::Moved { col: 3 }));
        assert_eq!(scene.move_rubble(3, 0), Ok(RubbleMove::Stopped));
        assert_eq!(scene.rubble_at(3, 0), Some(&Shape::rubble(3, 0)));
    }

    #[test]
    fn test_train_moves_in_one_step() {
        let mut scene = Scene::new(6, 2).unwrap();
        for col in [3, 4, 5] {
            scene
                .add_rubble(Shape::falling_rubble(col, 0, -1, Some(0), Some(Player::Right)))
                .unwrap();
        }
        assert_eq!(scene.advance_rubble(), Ok(3));
        let cols: Vec<_> = scene.rubble().map(Shape::horizontal_offset).collect();
        assert_eq!(cols, vec![2, 3, 4]);
    }

    #[test]
    fn test_opposite_directions_stop_each_other() {
        let mut scene = Scene::new(6, 1).unwrap();
        scene
            .add_rubble(Shape::falling_rubble(2, 0, 1, None, None))
            .unwrap();
        scene
            .add_rubble(Shape::falling_rubble(3, 0, -1, None, None))
            .unwrap();
        scene.advance_rubble().unwrap();
        assert!(!scene.has_falling_rubble());
        assert_eq!(scene.rubble_count(), 2);
    }
}
