//! GPU instance data for cubelets

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::consts::CUBELET_SIZE;
use crate::sim::Sticker;

/// Per-cubelet instance: world pose plus sticker colors in local face order
/// (+X, -X, +Y, -Y, +Z, -Z)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CubeletInstance {
    pub translation: [f32; 3],
    pub scale: f32,
    /// Unit quaternion (x, y, z, w)
    pub rotation: [f32; 4],
    /// Packed 0xRRGGBB per face
    pub colors: [u32; 6],
    pub _pad: [u32; 2],
}

impl CubeletInstance {
    pub fn new(translation: Vec3, rotation: Quat, stickers: &[Sticker; 6]) -> Self {
        Self {
            translation: translation.to_array(),
            scale: CUBELET_SIZE,
            rotation: rotation.to_array(),
            colors: stickers.map(Sticker::hex),
            _pad: [0; 2],
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_array(self.rotation),
            Vec3::from_array(self.translation),
        )
    }
}

/// Camera pose handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
}

impl CameraPose {
    pub const Z_NEAR: f32 = 0.1;
    pub const Z_FAR: f32 = 200.0;

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, Self::Z_NEAR, Self::Z_FAR) * self.view()
    }
}

/// Unpack 0xRRGGBB into linear-ish RGBA floats
pub fn hex_to_rgba(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

/// Scene colors outside the puzzle itself
pub mod colors {
    pub const BACKGROUND: u32 = 0x070a12;
}
