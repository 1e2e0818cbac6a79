//! Drag-to-turn resolution
//!
//! A puzzle drag starts on a cubelet face. Once the pointer has moved far
//! enough, the screen-space delta is lifted into world space using the camera
//! basis, flattened onto the grabbed face, and crossed with the face normal to
//! get a rotation axis. That axis is snapped to the dominant lattice axis.

use glam::{Vec2, Vec3};

use super::camera::CameraBasis;
use crate::consts::*;
use crate::settings::DragMode;
use crate::sim::{Axis, Lattice, Puzzle, Sign};

/// A resolved turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRequest {
    pub axis: Axis,
    pub layer: i32,
    pub direction: Sign,
}

/// Result of feeding a pointer position to a puzzle drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStep {
    /// Not far enough from the start point yet
    Pending,
    /// Moved, but the geometry does not pick a well-defined turn
    Ambiguous,
    /// The drag resolved into a turn
    Turn(TurnRequest),
}

/// Drag that started on a cubelet face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PuzzleDrag {
    pub pointer_id: i32,
    /// Screen position (pixels) at pointer-down
    pub start: Vec2,
    /// Grabbed cubelet ID
    pub cubelet: usize,
    /// World-space outward normal of the grabbed face
    pub normal: Vec3,
    /// Whether the pointer has exceeded the drag threshold
    moved: bool,
}

impl PuzzleDrag {
    pub fn new(pointer_id: i32, start: Vec2, cubelet: usize, normal: Vec3) -> Self {
        Self {
            pointer_id,
            start,
            cubelet,
            normal,
            moved: false,
        }
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Feed the current pointer position.
    ///
    /// `threshold` is in pixels; once exceeded it no longer applies to this
    /// drag.
    pub fn update(
        &mut self,
        pos: Vec2,
        threshold: f32,
        mode: DragMode,
        basis: &CameraBasis,
        puzzle: &Puzzle,
    ) -> DragStep {
        let delta = pos - self.start;
        if !self.moved && delta.length() < threshold {
            return DragStep::Pending;
        }
        self.moved = true;

        let (dx, dy) = mode.constrain(delta.x, delta.y);
        let lattice = puzzle.lattice();
        let Some((axis, direction)) = turn_axis(self.normal, dx, dy, basis, lattice) else {
            log::trace!("Ambiguous drag ({dx}, {dy})");
            return DragStep::Ambiguous;
        };
        let Some(cubelet) = lattice.get(self.cubelet) else {
            return DragStep::Ambiguous;
        };

        DragStep::Turn(TurnRequest {
            axis,
            layer: cubelet.grid_along(axis),
            direction,
        })
    }
}

/// Rotation axis (in the lattice frame) for a screen drag of `(dx, dy)`
/// pixels on a face with world normal `normal`.
///
/// Screen y grows downward, so screen-up maps to `+basis.up`. Returns `None`
/// when the drag vanishes, runs parallel to the normal, or yields no axis.
pub fn turn_axis(
    normal: Vec3,
    dx: f32,
    dy: f32,
    basis: &CameraBasis,
    lattice: &Lattice,
) -> Option<(Axis, Sign)> {
    let drag = basis.right * dx - basis.up * dy;
    if drag.length_squared() < DRAG_EPSILON_SQ {
        return None;
    }
    let drag = drag.normalize();

    let on_face = drag - normal * drag.dot(normal);
    if on_face.length_squared() < DRAG_EPSILON_SQ {
        return None;
    }
    let on_face = on_face.normalize();

    let axis = normal.cross(on_face);
    if axis.length_squared() < DRAG_EPSILON_SQ {
        return None;
    }

    let local = lattice.to_local_dir(axis.normalize());
    if local.length_squared() < DRAG_EPSILON_SQ {
        return None;
    }
    Some(Axis::dominant(local))
}
