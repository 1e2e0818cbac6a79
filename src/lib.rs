//! Spin Cube - an interactive 3x3x3 twisty cube
//!
//! Core modules:
//! - `sim`: Lattice model, turn engine, solved-state oracle, scrambler
//! - `input`: Arcball orbit camera, hit-testing, drag-to-turn resolution
//! - `session`: Pointer routing, per-frame tick, UI controls
//! - `renderer`: Per-cubelet instance data for the external renderer
//! - `settings`: User preferences

pub mod input;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::{FrameReport, PointerButton, PointerEvent, Session};
pub use settings::{DragMode, Settings};

/// Puzzle configuration constants
pub mod consts {
    /// Cubelets per edge
    pub const GRID: i32 = 3;
    /// Largest grid coordinate magnitude ((GRID - 1) / 2)
    pub const HALF: i32 = (GRID - 1) / 2;
    /// Distance between neighbouring cubelet centers
    pub const SPACING: f32 = 1.08;
    /// Edge length of a single cubelet
    pub const CUBELET_SIZE: f32 = 1.0;

    /// Default layer turn speed (radians/sec)
    pub const TURN_SPEED: f32 = 10.0;
    /// A turn commits once the remaining angle drops below this (radians)
    pub const TURN_EPSILON: f32 = 1e-4;

    /// Orbit radius limits
    pub const MIN_RADIUS: f32 = 6.0;
    pub const MAX_RADIUS: f32 = 20.0;
    /// Per-frame (60 Hz) damping applied to the zoom velocity
    pub const ZOOM_DAMPING: f32 = 0.12;
    /// Radial velocity added per unit of wheel delta
    pub const ZOOM_SPEED: f32 = 0.004;
    /// Radius used when the camera starts on top of the target
    pub const FALLBACK_RADIUS: f32 = 10.0;
    /// Initial camera eye position
    pub const INITIAL_EYE: [f32; 3] = [6.2, 5.2, 7.2];
    /// Vertical field of view (radians, 50 degrees)
    pub const FOV_Y: f32 = 50.0 * std::f32::consts::PI / 180.0;

    /// Arcball sensitivity bounds
    pub const MIN_SENSITIVITY: f32 = 0.05;
    pub const MAX_SENSITIVITY: f32 = 5.0;

    /// Pointer travel (pixels) before a puzzle drag resolves into a turn
    pub const DRAG_THRESHOLD: f32 = 10.0;
    /// Squared length below which drag vectors are considered degenerate
    pub const DRAG_EPSILON_SQ: f32 = 1e-8;

    /// Scramble pacing (seconds)
    pub const SCRAMBLE_STEP_DELAY: f32 = 0.14;
    pub const SCRAMBLE_RETRY_DELAY: f32 = 0.02;
    /// Turns in a default scramble
    pub const SCRAMBLE_LENGTH: u32 = 22;

    /// Longest frame step accepted by the session tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;
}

/// Grid index of a lattice-space coordinate component
#[inline]
pub fn grid_index(value: f32) -> i32 {
    (value / consts::SPACING).round() as i32
}

/// Round a lattice-space position to the nearest grid point
#[inline]
pub fn snap_position(pos: glam::Vec3) -> glam::Vec3 {
    (pos / consts::SPACING).round() * consts::SPACING
}
