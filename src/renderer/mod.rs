//! Rendering surface
//!
//! The renderer itself is external; this module only produces the per-frame
//! data it consumes: one instance per cubelet plus the camera pose.

pub mod instance;

pub use instance::{CameraPose, CubeletInstance, colors, hex_to_rgba};
