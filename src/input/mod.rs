//! Camera and pointer geometry
//!
//! Turns 2D pointer movement into 3D rotations: arcball orbiting for the
//! camera and face-drag resolution for layer turns.

pub mod camera;
pub mod drag;
pub mod hit;

pub use camera::{CameraBasis, OrbitCamera, project_to_sphere};
pub use drag::{DragStep, PuzzleDrag, TurnRequest, turn_axis};
pub use hit::{BoxHitTester, Hit, HitTest, Ray, ray_box};
