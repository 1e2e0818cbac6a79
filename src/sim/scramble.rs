//! Randomized scramble routine
//!
//! A scramble is a cooperative, tick-driven task: every step it checks that
//! the turn engine is idle, issues one random turn and waits a fixed delay.
//! If a turn is still animating it retries after a short delay instead of
//! queueing.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::lattice::{Axis, Sign};
use super::turn::Puzzle;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Scramble {
    rng: Pcg32,
    total: u32,
    issued: u32,
    /// Seconds until the next attempt
    cooldown: f32,
    cancelled: bool,
}

impl Scramble {
    pub fn new(count: u32, seed: u64) -> Self {
        log::info!("Scramble of {} turns (seed {})", count, seed);
        Self {
            rng: Pcg32::seed_from_u64(seed),
            total: count,
            issued: 0,
            cooldown: 0.0,
            cancelled: false,
        }
    }

    /// Stop issuing turns. A turn already animating still completes.
    pub fn cancel(&mut self) {
        if !self.is_finished() {
            log::info!("Scramble cancelled after {}/{} turns", self.issued, self.total);
        }
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled || self.issued >= self.total
    }

    /// Turns issued / total turns
    pub fn progress(&self) -> (u32, u32) {
        (self.issued, self.total)
    }

    /// Advance by `dt` seconds, issuing at most one turn.
    ///
    /// Returns `true` while the scramble still has turns to issue.
    pub fn tick(&mut self, puzzle: &mut Puzzle, dt: f32) -> bool {
        if self.is_finished() {
            return false;
        }

        self.cooldown -= dt.max(0.0);
        if self.cooldown > 0.0 {
            return true;
        }

        if puzzle.is_turning() {
            self.cooldown = SCRAMBLE_RETRY_DELAY;
            return true;
        }

        let (axis, layer, direction) = self.random_turn();
        if puzzle.begin_turn(axis, layer, direction) {
            self.issued += 1;
        }
        self.cooldown = SCRAMBLE_STEP_DELAY;

        if self.is_finished() {
            log::info!("Scramble issued all {} turns", self.total);
            return false;
        }
        true
    }

    fn random_turn(&mut self) -> (Axis, i32, Sign) {
        let axis = Axis::ALL[self.rng.random_range(0..Axis::ALL.len())];
        let layer = self.rng.random_range(-HALF..=HALF);
        let direction = if self.rng.random_bool(0.5) {
            Sign::Pos
        } else {
            Sign::Neg
        };
        (axis, layer, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(scramble: &mut Scramble, puzzle: &mut Puzzle) {
        for _ in 0..10_000 {
            let running = scramble.tick(puzzle, DT);
            puzzle.tick(DT);
            if !running && !puzzle.is_turning() {
                return;
            }
        }
        panic!("scramble never finished");
    }

    #[test]
    fn test_scramble_issues_all_turns() {
        let mut puzzle = Puzzle::new();
        let mut scramble = Scramble::new(12, 7);
        run(&mut scramble, &mut puzzle);
        assert_eq!(scramble.progress(), (12, 12));
        assert!(scramble.is_finished());
        assert!(!puzzle.is_turning());
    }

    #[test]
    fn test_scramble_is_deterministic() {
        let mut a = Puzzle::new();
        let mut b = Puzzle::new();
        run(&mut Scramble::new(20, 42), &mut a);
        run(&mut Scramble::new(20, 42), &mut b);

        for (ca, cb) in a.lattice().cubelets().iter().zip(b.lattice().cubelets()) {
            assert_eq!(ca.position, cb.position);
            assert_eq!(ca.orientation, cb.orientation);
        }
    }

    #[test]
    fn test_scramble_waits_for_active_turn() {
        let mut puzzle = Puzzle::new();
        puzzle.begin_turn(Axis::X, 0, Sign::Pos);

        let mut scramble = Scramble::new(3, 1);
        assert!(scramble.tick(&mut puzzle, DT));
        assert_eq!(scramble.progress().0, 0);
    }

    #[test]
    fn test_cancel_stops_issuing() {
        let mut puzzle = Puzzle::new();
        let mut scramble = Scramble::new(30, 3);
        scramble.tick(&mut puzzle, DT);
        assert_eq!(scramble.progress().0, 1);

        scramble.cancel();
        assert!(scramble.is_cancelled());
        // Let the in-flight turn finish
        while puzzle.is_turning() {
            puzzle.tick(DT);
        }
        assert!(!scramble.tick(&mut puzzle, 1.0));
        assert!(!puzzle.is_turning());
        assert_eq!(scramble.progress().0, 1);
    }

    #[test]
    fn test_scramble_keeps_poses_on_grid() {
        let mut puzzle = Puzzle::new();
        run(&mut Scramble::new(40, 99), &mut puzzle);
        for c in puzzle.lattice().cubelets() {
            let mut snapped = c.clone();
            snapped.snap();
            assert_eq!(snapped.position, c.position);
            assert_eq!(snapped.orientation, c.orientation);
            assert!(c.orientation.is_normalized());
        }
    }
}
