//! Solved-state oracle
//!
//! The sticker a cubelet shows in a direction is re-derived from its
//! orientation on every query; there is no separate face table to keep in
//! sync with the poses.

use glam::Vec3;

use super::lattice::{Cubelet, Face, Lattice, Sticker};

/// Sticker on the local face of `cubelet` most aligned with `dir`.
///
/// Faces are scanned in `Face::ALL` order and the first maximum wins, so an
/// exact tie between two faces resolves to the earlier one.
pub fn sticker_facing(cubelet: &Cubelet, dir: Vec3) -> Sticker {
    let mut best = Face::ALL[0];
    let mut best_dot = f32::NEG_INFINITY;
    for face in Face::ALL {
        let d = cubelet.face_normal(face).dot(dir);
        if d > best_dot {
            best_dot = d;
            best = face;
        }
    }
    cubelet.sticker(best)
}

/// Whether every outer face of a resting lattice shows a single color
pub fn is_solved(lattice: &Lattice) -> bool {
    Face::ALL.iter().all(|&face| face_is_uniform(lattice, face))
}

fn face_is_uniform(lattice: &Lattice, face: Face) -> bool {
    let dir = face.normal();
    let mut expected = None;
    for c in lattice.cubelets() {
        if c.grid_along(face.axis()) != face.extreme_index() {
            continue;
        }
        let color = sticker_facing(c, dir);
        match expected {
            None => expected = Some(color),
            Some(e) if e != color => return false,
            Some(_) => {}
        }
    }
    expected.is_some()
}
