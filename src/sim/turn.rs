//! Turn engine: animated 90-degree layer rotations
//!
//! A turn attaches one layer to a transient pivot. While it animates, the
//! displayed pose of each selected cubelet is `pivot * stored pose`; the
//! stored poses are untouched until the turn commits, at which point the
//! pivot is baked in and every pose is snapped back onto the grid.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use super::lattice::{Axis, Lattice, Sign};
use crate::consts::*;

/// An in-flight layer rotation
#[derive(Debug, Clone)]
pub struct Turn {
    pub axis: Axis,
    /// Grid index of the layer along `axis`
    pub layer: i32,
    pub direction: Sign,
    /// Cubelet IDs attached to the pivot
    pub selected: Vec<usize>,
    /// Final angle (radians, ±π/2)
    pub target: f32,
    /// Angle applied so far (radians)
    pub progress: f32,
    /// Angular speed (radians/sec)
    pub speed: f32,
}

impl Turn {
    /// Current pivot rotation
    #[inline]
    pub fn pivot(&self) -> Quat {
        Quat::from_axis_angle(self.axis.unit(), self.progress)
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.target - self.progress
    }

    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.selected.contains(&id)
    }

    /// Fraction of the turn completed (0-1)
    pub fn fraction(&self) -> f32 {
        (self.progress / self.target).clamp(0.0, 1.0)
    }
}

/// Lattice plus the (at most one) active turn
#[derive(Debug, Clone)]
pub struct Puzzle {
    lattice: Lattice,
    active: Option<Turn>,
    /// Angular speed given to new turns (radians/sec)
    pub turn_speed: f32,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl Puzzle {
    pub fn new() -> Self {
        Self::with_turn_speed(TURN_SPEED)
    }

    pub fn with_turn_speed(turn_speed: f32) -> Self {
        Self {
            lattice: Lattice::build(),
            active: None,
            turn_speed,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn active_turn(&self) -> Option<&Turn> {
        self.active.as_ref()
    }

    #[inline]
    pub fn is_turning(&self) -> bool {
        self.active.is_some()
    }

    /// Start rotating layer `layer` along `axis`.
    ///
    /// Returns `false` (and does nothing) while another turn is in progress.
    /// Callers are expected to retry or drop the request.
    pub fn begin_turn(&mut self, axis: Axis, layer: i32, direction: Sign) -> bool {
        if self.active.is_some() {
            log::trace!(
                "Rejected turn {}{} {:?}: turn in progress",
                axis.as_str(),
                layer,
                direction
            );
            return false;
        }

        let selected = self.lattice.select_layer(axis, layer);
        log::debug!(
            "Begin turn {}{} {:?} ({} cubelets)",
            axis.as_str(),
            layer,
            direction,
            selected.len()
        );
        self.active = Some(Turn {
            axis,
            layer,
            direction,
            selected,
            target: direction.to_f32() * FRAC_PI_2,
            progress: 0.0,
            speed: self.turn_speed,
        });
        true
    }

    /// Advance the active turn. Returns `true` if a turn committed this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(turn) = &mut self.active else {
            return false;
        };

        let remaining = turn.remaining();
        let step = remaining.abs().min(turn.speed * dt.max(0.0));
        turn.progress += step * remaining.signum();

        if turn.remaining().abs() >= TURN_EPSILON {
            return false;
        }

        // Snap the pivot to exactly ±90° before baking it in
        turn.progress = turn.target;
        if let Some(turn) = self.active.take() {
            self.commit(&turn);
        }
        true
    }

    fn commit(&mut self, turn: &Turn) {
        let pivot = turn.pivot();
        for &id in &turn.selected {
            if let Some(c) = self.lattice.get_mut(id) {
                c.position = pivot * c.position;
                c.orientation = pivot * c.orientation;
                c.snap();
            }
        }
        log::debug!(
            "Committed turn {}{} {:?}",
            turn.axis.as_str(),
            turn.layer,
            turn.direction
        );
    }

    /// Rebuild the lattice in its solved state. Rejected while turning.
    pub fn reset(&mut self) -> bool {
        if self.is_turning() {
            return false;
        }
        let frame = self.lattice.frame;
        self.lattice = Lattice::build();
        self.lattice.frame = frame;
        true
    }

    /// Lattice-space pose of a cubelet as currently displayed (pivot applied)
    pub fn local_pose(&self, id: usize) -> Option<(Vec3, Quat)> {
        let c = self.lattice.get(id)?;
        match &self.active {
            Some(turn) if turn.contains(id) => {
                let pivot = turn.pivot();
                Some((pivot * c.position, pivot * c.orientation))
            }
            _ => Some((c.position, c.orientation)),
        }
    }

    /// World-space pose of a cubelet as currently displayed
    pub fn world_pose(&self, id: usize) -> Option<(Vec3, Quat)> {
        let (pos, rot) = self.local_pose(id)?;
        let frame = self.lattice.frame;
        Some((frame * pos, frame * rot))
    }

    /// Whether every outer face shows a single color (false while turning)
    pub fn is_solved(&self) -> bool {
        !self.is_turning() && super::solved::is_solved(&self.lattice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lattice::Face;
    use glam::IVec3;

    fn finish(puzzle: &mut Puzzle) {
        for _ in 0..1000 {
            if puzzle.tick(1.0 / 60.0) {
                return;
            }
        }
        panic!("turn never finished");
    }

    #[test]
    fn test_begin_turn_rejected_while_turning() {
        let mut puzzle = Puzzle::new();
        assert!(puzzle.begin_turn(Axis::X, 1, Sign::Pos));
        assert!(!puzzle.begin_turn(Axis::Y, 0, Sign::Neg));
        assert_eq!(puzzle.active_turn().unwrap().axis, Axis::X);

        finish(&mut puzzle);
        assert!(!puzzle.is_turning());
        assert!(puzzle.begin_turn(Axis::Y, 0, Sign::Neg));
    }

    #[test]
    fn test_turn_selects_nine_cubelets() {
        let mut puzzle = Puzzle::new();
        puzzle.begin_turn(Axis::Z, -1, Sign::Pos);
        let turn = puzzle.active_turn().unwrap();
        assert_eq!(turn.selected.len(), 9);
        assert_eq!(turn.target, FRAC_PI_2);
    }

    #[test]
    fn test_turn_advances_at_speed() {
        let mut puzzle = Puzzle::with_turn_speed(1.0);
        puzzle.begin_turn(Axis::Y, 1, Sign::Neg);
        assert!(!puzzle.tick(0.5));
        let turn = puzzle.active_turn().unwrap();
        assert!((turn.progress + 0.5).abs() < 1e-6);
        assert!((turn.fraction() - 0.5 / FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dt_makes_no_progress() {
        let mut puzzle = Puzzle::new();
        puzzle.begin_turn(Axis::X, 0, Sign::Pos);
        assert!(!puzzle.tick(0.0));
        assert_eq!(puzzle.active_turn().unwrap().progress, 0.0);
    }

    #[test]
    fn test_stored_pose_untouched_until_commit() {
        let mut puzzle = Puzzle::new();
        let id = puzzle.lattice().cubelet_at(IVec3::new(1, 1, 1)).unwrap().id;
        let before = puzzle.lattice().get(id).unwrap().position;

        puzzle.begin_turn(Axis::X, 1, Sign::Pos);
        puzzle.tick(0.05);
        assert_eq!(puzzle.lattice().get(id).unwrap().position, before);

        // Displayed pose follows the pivot
        let (shown, _) = puzzle.local_pose(id).unwrap();
        assert!((shown - before).length() > 0.1);
        assert!((shown.length() - before.length()).abs() < 1e-4);
    }

    #[test]
    fn test_quarter_turn_moves_corner() {
        let mut puzzle = Puzzle::new();
        let id = puzzle.lattice().cubelet_at(IVec3::new(1, 1, 1)).unwrap().id;

        // +90° about X takes +Y to +Z and +Z to -Y
        puzzle.begin_turn(Axis::X, 1, Sign::Pos);
        finish(&mut puzzle);

        let c = puzzle.lattice().get(id).unwrap();
        assert_eq!(c.grid(), IVec3::new(1, -1, 1));
        assert_eq!(c.position, IVec3::new(1, -1, 1).as_vec3() * SPACING);
        // Its white (+Y) sticker now faces +Z
        assert!((c.face_normal(Face::PosY) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_commit_is_snapped() {
        let mut puzzle = Puzzle::new();
        let turns = [
            (Axis::X, 1, Sign::Pos),
            (Axis::Y, 0, Sign::Neg),
            (Axis::Z, -1, Sign::Pos),
            (Axis::X, 0, Sign::Neg),
            (Axis::Y, 1, Sign::Pos),
        ];
        for _ in 0..4 {
            for (axis, layer, dir) in turns {
                assert!(puzzle.begin_turn(axis, layer, dir));
                finish(&mut puzzle);
            }
        }
        for c in puzzle.lattice().cubelets() {
            assert_eq!(c.position, c.grid().as_vec3() * SPACING);
            let mut resnapped = c.clone();
            resnapped.snap();
            assert_eq!(resnapped.position, c.position);
            assert_eq!(resnapped.orientation, c.orientation);
        }
    }

    #[test]
    fn test_inverse_turn_restores_stickers() {
        let mut puzzle = Puzzle::new();
        puzzle.begin_turn(Axis::Y, -1, Sign::Pos);
        finish(&mut puzzle);
        puzzle.begin_turn(Axis::Y, -1, Sign::Neg);
        finish(&mut puzzle);

        for c in puzzle.lattice().cubelets() {
            assert_eq!(c.grid(), c.home);
            for face in Face::ALL {
                assert!((c.face_normal(face) - face.normal()).length() < 1e-6);
            }
        }
    }

    #[test]
    fn test_reset_rejected_while_turning() {
        let mut puzzle = Puzzle::new();
        puzzle.begin_turn(Axis::Z, 1, Sign::Neg);
        assert!(!puzzle.reset());
        finish(&mut puzzle);
        assert!(!puzzle.is_solved());
        assert!(puzzle.reset());
        assert!(puzzle.is_solved());
    }
}
