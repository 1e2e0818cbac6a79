//! Ray casting against the cubelets
//!
//! Each cubelet is treated as an oriented box of edge `CUBELET_SIZE` at its
//! displayed pose (active turn and lattice frame applied). The nearest box
//! entered by the ray wins.

use glam::{Quat, Vec3};

use crate::consts::*;
use crate::sim::{Axis, Face, Puzzle, Sign};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }
}

/// Result of a successful hit test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Cubelet ID
    pub cubelet: usize,
    /// Local face struck
    pub face: Face,
    /// World-space outward normal of the struck face
    pub normal: Vec3,
    /// Distance along the ray
    pub distance: f32,
}

/// Finds the cubelet under a pointer ray
pub trait HitTest {
    fn hit_test(&self, puzzle: &Puzzle, ray: &Ray) -> Option<Hit>;
}

/// Hit tester using one oriented box per cubelet
#[derive(Debug, Clone, Copy)]
pub struct BoxHitTester {
    pub half_extent: f32,
}

impl Default for BoxHitTester {
    fn default() -> Self {
        Self {
            half_extent: CUBELET_SIZE * 0.5,
        }
    }
}

impl HitTest for BoxHitTester {
    fn hit_test(&self, puzzle: &Puzzle, ray: &Ray) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for c in puzzle.lattice().cubelets() {
            let Some((pos, rot)) = puzzle.world_pose(c.id) else {
                continue;
            };
            let Some((t, face)) = ray_box(ray, pos, rot, self.half_extent) else {
                continue;
            };
            if best.is_none_or(|b| t < b.distance) {
                best = Some(Hit {
                    cubelet: c.id,
                    face,
                    normal: (rot * face.normal()).normalize(),
                    distance: t,
                });
            }
        }
        best
    }
}

/// Slab test against a box centered at `center` with orientation `rot`.
///
/// Returns the entry distance and the local face entered. Rays starting
/// inside the box do not hit it.
pub fn ray_box(ray: &Ray, center: Vec3, rot: Quat, half: f32) -> Option<(f32, Face)> {
    let inv = rot.inverse();
    let origin = inv * (ray.origin - center);
    let dir = inv * ray.dir;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut entered = None;

    for axis in Axis::ALL {
        let o = axis.component(origin);
        let d = axis.component(dir);
        if d.abs() < 1e-8 {
            if o.abs() > half {
                return None;
            }
            continue;
        }
        let t1 = (-half - o) / d;
        let t2 = (half - o) / d;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
        if near > t_enter {
            t_enter = near;
            // Entering through the face that opposes the ray direction
            entered = Some(Face::new(axis, Sign::of(-d)));
        }
        t_exit = t_exit.min(far);
    }

    if t_enter > t_exit || t_enter < 0.0 {
        return None;
    }
    entered.map(|face| (t_enter, face))
}
