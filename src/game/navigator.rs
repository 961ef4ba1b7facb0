//! Greedy one-step navigation toward the nearest target.
//!
//! The navigator is pure: given the board it always produces the same
//! heading. It keeps a one-cell margin inside the real wall, so a snake that
//! still has a safe move never steps onto the outer ring.

use super::{
    direction::Direction,
    state::{GameState, Position},
};

/// Result of picking a target for the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSelection {
    /// Nearest target, steered toward regardless of the radius
    pub pursuit: Option<Position>,
    /// The pursuit target, when it is inside the capture radius
    pub capture: Option<Position>,
}

/// Pick the nearest target to `head`; ties go to the earlier target
pub fn select_target(head: Position, targets: &[Position], radius: u32) -> TargetSelection {
    let nearest = targets.iter().fold(None, |best: Option<(Position, f64)>, &t| {
        let dist = head.distance_to(t);
        match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((t, dist)),
        }
    });

    TargetSelection {
        pursuit: nearest.map(|(t, _)| t),
        capture: nearest
            .filter(|&(_, dist)| dist <= f64::from(radius))
            .map(|(t, _)| t),
    }
}

/// Heading selection over a fixed grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    width: i32,
    height: i32,
}

impl Navigator {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
        }
    }

    pub fn for_state(state: &GameState) -> Self {
        Self::new(state.grid_width, state.grid_height)
    }

    /// A cell is safe when it is off the outer ring and not on the snake
    pub fn is_safe(&self, pos: Position, body: &[Position]) -> bool {
        let inside_margin =
            pos.x >= 1 && pos.x < self.width - 1 && pos.y >= 1 && pos.y < self.height - 1;
        inside_margin && !body.contains(&pos)
    }

    /// Every heading whose next cell is safe, in scan order
    pub fn safe_moves(&self, head: Position, body: &[Position]) -> Vec<Direction> {
        Direction::SCAN_ORDER
            .into_iter()
            .filter(|&dir| self.is_safe(head.moved_in_direction(dir), body))
            .collect()
    }

    /// Choose the heading for the next tick.
    ///
    /// Inside hook range the snake prefers a straight axis step toward the
    /// target. Otherwise, or if both axis steps are unsafe, it takes the
    /// safe cardinal move that lands closest to the target. With no safe
    /// move at all the current heading is kept.
    pub fn next_direction(
        &self,
        head: Position,
        target: Option<Position>,
        current: Direction,
        body: &[Position],
        radius: u32,
    ) -> Direction {
        let Some(target) = target else {
            return current;
        };

        if head.distance_to(target) <= f64::from(radius) {
            let axis_moves = [
                Direction::toward_x(target.x - head.x),
                Direction::toward_y(target.y - head.y),
            ];
            if let Some(dir) = self.closest_safe(head, target, body, axis_moves.into_iter().flatten())
            {
                return dir;
            }
        }

        self.closest_safe(head, target, body, Direction::SCAN_ORDER)
            .unwrap_or(current)
    }

    /// First safe candidate with the smallest resulting distance to `target`
    fn closest_safe(
        &self,
        head: Position,
        target: Position,
        body: &[Position],
        candidates: impl IntoIterator<Item = Direction>,
    ) -> Option<Direction> {
        candidates
            .into_iter()
            .filter_map(|dir| {
                let next = head.moved_in_direction(dir);
                self.is_safe(next, body)
                    .then(|| (dir, next.distance_to(target)))
            })
            .fold(None, |best: Option<(Direction, f64)>, (dir, dist)| match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((dir, dist)),
            })
            .map(|(dir, _)| dir)
    }
}
