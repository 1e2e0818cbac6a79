//! Arcball orbit camera
//!
//! The camera pose is kept purely as (target, radius, orientation). The eye
//! sits at `target + orientation * (0, 0, radius)` and its up vector is
//! `orientation * +Y`, so the camera always looks at the target without a
//! separate look-at step.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::hit::Ray;
use crate::consts::*;

/// Map normalized device coordinates onto the unit arcball hemisphere.
///
/// Points inside the unit circle are lifted onto the sphere; points outside
/// are pulled onto its rim (z = 0).
pub fn project_to_sphere(ndc: Vec2) -> Vec3 {
    let d2 = ndc.length_squared();
    if d2 <= 1.0 {
        Vec3::new(ndc.x, ndc.y, (1.0 - d2).sqrt())
    } else {
        Vec3::new(ndc.x, ndc.y, 0.0).normalize()
    }
}

/// Orthonormal camera frame in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitCamera {
    /// Point the camera orbits and looks at
    pub target: Vec3,
    radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Fraction of zoom velocity lost per 60 Hz frame
    pub damping: f32,
    /// Radial velocity added per unit of wheel delta
    pub zoom_speed: f32,
    velocity: f32,
    orientation: Quat,
    sensitivity: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Last projected arcball point while an orbit drag is active
    #[serde(skip)]
    drag_prev: Option<Vec3>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::from(INITIAL_EYE), Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Camera orbiting `target`, starting at `eye`
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let (radius, dir) = if offset.length_squared() > 0.0 {
            (offset.length(), offset.normalize())
        } else {
            (FALLBACK_RADIUS, Vec3::Z)
        };

        Self {
            target,
            radius: radius.clamp(MIN_RADIUS, MAX_RADIUS),
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            damping: ZOOM_DAMPING,
            zoom_speed: ZOOM_SPEED,
            velocity: 0.0,
            orientation: Quat::from_rotation_arc(Vec3::Z, dir),
            sensitivity: 1.0,
            fov_y: FOV_Y,
            drag_prev: None,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn radial_velocity(&self) -> f32 {
        self.velocity
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Set arcball sensitivity, clamped to [0.05, 5]. Non-finite values are
    /// ignored.
    pub fn set_sensitivity(&mut self, value: f32) {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite camera sensitivity");
            return;
        }
        self.sensitivity = value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.target + self.orientation * Vec3::new(0.0, 0.0, self.radius)
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// World-space frame with `forward` pointing at the target
    pub fn basis(&self) -> CameraBasis {
        let forward = (-(self.orientation * Vec3::Z)).normalize();
        let right = forward.cross(self.up()).normalize();
        let up = right.cross(forward).normalize();
        CameraBasis { forward, right, up }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_prev.is_some()
    }

    /// Start an orbit drag at `ndc`
    pub fn begin_drag(&mut self, ndc: Vec2) {
        self.drag_prev = Some(project_to_sphere(ndc));
    }

    /// Continue an orbit drag. Returns `true` if the orientation changed.
    pub fn drag_to(&mut self, ndc: Vec2) -> bool {
        let Some(prev) = self.drag_prev else {
            return false;
        };
        let curr = project_to_sphere(ndc);
        self.drag_prev = Some(curr);

        let delta = Quat::from_rotation_arc(prev.normalize(), curr.normalize());
        let axis = delta.xyz();
        let axis_len = axis.length();
        if axis_len <= 1e-10 {
            return false;
        }

        let angle = 2.0 * axis_len.atan2(delta.w);
        let scaled = Quat::from_axis_angle(axis / axis_len, angle * self.sensitivity);
        // Post-multiply: the delta is expressed in camera space
        self.orientation = (self.orientation * scaled).normalize();
        true
    }

    pub fn end_drag(&mut self) {
        self.drag_prev = None;
    }

    /// Accumulate zoom velocity from a wheel delta
    pub fn scroll(&mut self, delta_y: f32) {
        if delta_y.is_finite() {
            self.velocity += delta_y * self.zoom_speed;
        }
    }

    /// Integrate zoom velocity, clamp the radius and damp the velocity
    pub fn tick(&mut self, dt: f32) {
        let frames = dt.max(0.0) * 60.0;
        self.radius += self.velocity * frames;

        // Inverted bounds resolve to `max_radius`
        let clamped = self.radius.max(self.min_radius).min(self.max_radius);
        if clamped != self.radius {
            self.radius = clamped;
            self.velocity = 0.0;
        }

        self.velocity *= (1.0 - self.damping).powf(frames);
    }

    /// Ray from the eye through a point in normalized device coordinates
    pub fn ray_through(&self, ndc: Vec2, aspect: f32) -> Ray {
        let basis = self.basis();
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * aspect;
        let dir = basis.forward + basis.right * (ndc.x * half_w) + basis.up * (ndc.y * half_h);
        Ray::new(self.eye(), dir)
    }
}
