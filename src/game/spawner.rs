//! Target placement.
//!
//! Targets are drawn from a region padded away from every wall and never
//! land on a blocked cell. Placement is bounded: a spawner either returns a
//! free cell or reports that none is left.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::warn;

use super::{error::SpawnError, state::Position};

/// Inclusive rectangle of cells targets may occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRegion {
    pub min: Position,
    pub max: Position,
}

impl SpawnRegion {
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// All cells of the region in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.min.y..=self.max.y)
            .flat_map(move |y| (self.min.x..=self.max.x).map(move |x| Position::new(x, y)))
    }
}

/// Source of new target cells
pub trait TargetSpawner {
    /// Pick a cell inside `region` that is not in `blocked`
    fn spawn(&mut self, region: SpawnRegion, blocked: &[Position]) -> Result<Position, SpawnError>;
}

/// Uniform random placement with a bounded retry budget
pub struct RandomSpawner {
    rng: StdRng,
    max_attempts: usize,
}

impl RandomSpawner {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_attempts,
        }
    }

    /// Deterministic spawner for reproducible runs
    pub fn seeded(seed: u64, max_attempts: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_attempts,
        }
    }
}

impl TargetSpawner for RandomSpawner {
    fn spawn(&mut self, region: SpawnRegion, blocked: &[Position]) -> Result<Position, SpawnError> {
        if region.is_empty() {
            return Err(SpawnError::NoSpace { attempts: 0 });
        }

        for _ in 0..self.max_attempts {
            let pos = Position::new(
                self.rng.gen_range(region.min.x..=region.max.x),
                self.rng.gen_range(region.min.y..=region.max.y),
            );
            if !blocked.contains(&pos) {
                return Ok(pos);
            }
        }

        warn!(
            attempts = self.max_attempts,
            "random target placement kept colliding, sampling free cells"
        );

        let free: Vec<Position> = region.cells().filter(|p| !blocked.contains(p)).collect();
        free.choose(&mut self.rng)
            .copied()
            .ok_or(SpawnError::NoSpace {
                attempts: self.max_attempts,
            })
    }
}

/// Replays a fixed sequence of cells, skipping any that are blocked or
/// outside the region
#[derive(Debug, Clone, Default)]
pub struct ScriptedSpawner {
    queue: VecDeque<Position>,
}

impl ScriptedSpawner {
    pub fn new(cells: impl IntoIterator<Item = Position>) -> Self {
        Self {
            queue: cells.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl TargetSpawner for ScriptedSpawner {
    fn spawn(&mut self, region: SpawnRegion, blocked: &[Position]) -> Result<Position, SpawnError> {
        while let Some(pos) = self.queue.pop_front() {
            if region.contains(pos) && !blocked.contains(&pos) {
                return Ok(pos);
            }
        }
        Err(SpawnError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(min: (i32, i32), max: (i32, i32)) -> SpawnRegion {
        SpawnRegion {
            min: Position::new(min.0, min.1),
            max: Position::new(max.0, max.1),
        }
    }

    #[test]
    fn test_region_cells() {
        let r = region((2, 2), (3, 4));
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Position::new(2, 2));
        assert_eq!(cells[5], Position::new(3, 4));
        assert!(region((3, 2), (2, 4)).is_empty());
    }

    #[test]
    fn test_random_spawn_stays_in_region() {
        let mut spawner = RandomSpawner::seeded(7, 100);
        let r = region((2, 2), (7, 7));
        for _ in 0..200 {
            let pos = spawner.spawn(r, &[]).unwrap();
            assert!(r.contains(pos));
        }
    }

    #[test]
    fn test_random_spawn_avoids_blocked() {
        let mut spawner = RandomSpawner::seeded(11, 50);
        let r = region((2, 2), (4, 4));
        let blocked: Vec<_> = r.cells().filter(|p| *p != Position::new(3, 3)).collect();
        for _ in 0..20 {
            assert_eq!(spawner.spawn(r, &blocked).unwrap(), Position::new(3, 3));
        }
    }

    #[test]
    fn test_random_spawn_falls_back_to_free_cells() {
        // A single attempt almost never hits the only free cell, so the
        // exact fallback has to find it
        let mut spawner = RandomSpawner::seeded(3, 1);
        let r = region((0, 0), (9, 9));
        let blocked: Vec<_> = r.cells().filter(|p| *p != Position::new(9, 0)).collect();
        assert_eq!(spawner.spawn(r, &blocked).unwrap(), Position::new(9, 0));
    }

    #[test]
    fn test_random_spawn_reports_no_space() {
        let mut spawner = RandomSpawner::seeded(5, 10);
        let r = region((2, 2), (3, 3));
        let blocked: Vec<_> = r.cells().collect();
        assert_eq!(
            spawner.spawn(r, &blocked),
            Err(SpawnError::NoSpace { attempts: 10 })
        );
    }

    #[test]
    fn test_seeded_spawners_agree() {
        let r = region((2, 2), (20, 20));
        let mut a = RandomSpawner::seeded(42, 10);
        let mut b = RandomSpawner::seeded(42, 10);
        for _ in 0..10 {
            assert_eq!(a.spawn(r, &[]), b.spawn(r, &[]));
        }
    }

    #[test]
    fn test_scripted_spawner_skips_blocked() {
        let r = region((2, 2), (7, 7));
        let mut spawner = ScriptedSpawner::new([
            Position::new(3, 3),
            Position::new(0, 0),
            Position::new(4, 4),
        ]);

        assert_eq!(
            spawner.spawn(r, &[Position::new(3, 3)]),
            Ok(Position::new(4, 4))
        );
        assert_eq!(spawner.remaining(), 0);
        assert_eq!(spawner.spawn(r, &[]), Err(SpawnError::Exhausted));
    }
}
