//! Cubelet lattice: 27 poses on a fixed 3x3x3 grid
//!
//! Every cubelet stores its pose in lattice space. At rest the position is an
//! exact multiple of `SPACING` and the orientation maps each local axis onto a
//! signed lattice axis.

use glam::{IVec3, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{grid_index, snap_position};

/// One of the three lattice axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Component of `v` along this axis
    #[inline]
    pub fn component(self, v: Vec3) -> f32 {
        v[self.index()]
    }

    /// Axis of the largest-magnitude component of `v`, with its sign.
    ///
    /// Ties resolve toward X, then Y. A zero component counts as positive.
    pub fn dominant(v: Vec3) -> (Axis, Sign) {
        let a = v.abs();
        let axis = if a.x >= a.y && a.x >= a.z {
            Axis::X
        } else if a.y >= a.z {
            Axis::Y
        } else {
            Axis::Z
        };
        (axis, Sign::of(axis.component(v)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Rotation direction / axis orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Pos,
    Neg,
}

impl Sign {
    /// Sign of `value`; zero is treated as positive
    #[inline]
    pub fn of(value: f32) -> Self {
        if value < 0.0 { Sign::Neg } else { Sign::Pos }
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        match self {
            Sign::Pos => 1.0,
            Sign::Neg => -1.0,
        }
    }

    #[inline]
    pub fn to_i32(self) -> i32 {
        match self {
            Sign::Pos => 1,
            Sign::Neg => -1,
        }
    }

    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }
}

/// Local face of a cubelet, in sticker order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    /// Enumeration order used for sticker storage and alignment search
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    pub fn new(axis: Axis, sign: Sign) -> Self {
        match (axis, sign) {
            (Axis::X, Sign::Pos) => Face::PosX,
            (Axis::X, Sign::Neg) => Face::NegX,
            (Axis::Y, Sign::Pos) => Face::PosY,
            (Axis::Y, Sign::Neg) => Face::NegY,
            (Axis::Z, Sign::Pos) => Face::PosZ,
            (Axis::Z, Sign::Neg) => Face::NegZ,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn axis(self) -> Axis {
        match self {
            Face::PosX | Face::NegX => Axis::X,
            Face::PosY | Face::NegY => Axis::Y,
            Face::PosZ | Face::NegZ => Axis::Z,
        }
    }

    pub fn sign(self) -> Sign {
        match self {
            Face::PosX | Face::PosY | Face::PosZ => Sign::Pos,
            Face::NegX | Face::NegY | Face::NegZ => Sign::Neg,
        }
    }

    /// Outward unit normal in the cubelet's local frame
    #[inline]
    pub fn normal(self) -> Vec3 {
        self.axis().unit() * self.sign().to_f32()
    }

    /// Grid index of the outer layer this face direction points at
    #[inline]
    pub fn extreme_index(self) -> i32 {
        HALF * self.sign().to_i32()
    }
}

/// Sticker colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sticker {
    Red,
    Orange,
    White,
    Yellow,
    Green,
    Blue,
    /// Filler for faces that point into the puzzle
    Interior,
}

impl Sticker {
    /// Color of the outer face pointing along `face` in the solved puzzle
    pub fn for_face(face: Face) -> Self {
        match face {
            Face::PosX => Sticker::Red,
            Face::NegX => Sticker::Orange,
            Face::PosY => Sticker::White,
            Face::NegY => Sticker::Yellow,
            Face::PosZ => Sticker::Green,
            Face::NegZ => Sticker::Blue,
        }
    }

    /// Packed 0xRRGGBB color
    pub fn hex(self) -> u32 {
        match self {
            Sticker::Red => 0xe53935,
            Sticker::Orange => 0xff8f00,
            Sticker::White => 0xffffff,
            Sticker::Yellow => 0xffeb3b,
            Sticker::Green => 0x43a047,
            Sticker::Blue => 0x1e88e5,
            Sticker::Interior => 0x10131a,
        }
    }
}

/// One of the 27 small cubes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cubelet {
    /// Stable identity (index into the lattice)
    pub id: usize,
    /// Grid coordinate at build time
    pub home: IVec3,
    /// Lattice-space position
    pub position: Vec3,
    /// Lattice-space orientation
    pub orientation: Quat,
    /// Sticker per local face, indexed by `Face::index`
    stickers: [Sticker; 6],
}

impl Cubelet {
    fn new(id: usize, home: IVec3) -> Self {
        let stickers = Face::ALL.map(|face| {
            if home[face.axis().index()] == face.extreme_index() {
                Sticker::for_face(face)
            } else {
                Sticker::Interior
            }
        });
        Self {
            id,
            home,
            position: home.as_vec3() * SPACING,
            orientation: Quat::IDENTITY,
            stickers,
        }
    }

    /// Current grid coordinate, tolerant of small drift
    pub fn grid(&self) -> IVec3 {
        IVec3::new(
            grid_index(self.position.x),
            grid_index(self.position.y),
            grid_index(self.position.z),
        )
    }

    /// Grid index along one axis
    #[inline]
    pub fn grid_along(&self, axis: Axis) -> i32 {
        grid_index(axis.component(self.position))
    }

    #[inline]
    pub fn sticker(&self, face: Face) -> Sticker {
        self.stickers[face.index()]
    }

    pub fn stickers(&self) -> &[Sticker; 6] {
        &self.stickers
    }

    /// Lattice-space direction of a local face normal
    #[inline]
    pub fn face_normal(&self, face: Face) -> Vec3 {
        self.orientation * face.normal()
    }

    /// Round the pose onto the grid, removing accumulated float drift
    pub fn snap(&mut self) {
        self.position = snap_position(self.position);
        self.orientation = snap_orientation(self.orientation);
    }
}

/// Round a rotation to the nearest rotation that maps every axis onto a
/// signed axis.
///
/// Works on the rotated basis vectors rather than Euler angles so the result
/// stays well-defined near gimbal lock. Snapping is idempotent.
pub fn snap_orientation(q: Quat) -> Quat {
    let m = Mat3::from_quat(q.normalize());
    let (x_axis, x_sign) = Axis::dominant(m.x_axis);
    let x = x_axis.unit() * x_sign.to_f32();

    // The rotated Y must land on one of the two axes X did not take
    let mut y_candidates = Axis::ALL.into_iter().filter(|&a| a != x_axis);
    let (first, second) = match (y_candidates.next(), y_candidates.next()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Quat::IDENTITY,
    };
    let y_axis = if first.component(m.y_axis).abs() >= second.component(m.y_axis).abs() {
        first
    } else {
        second
    };
    let y = y_axis.unit() * Sign::of(y_axis.component(m.y_axis)).to_f32();

    Quat::from_mat3(&Mat3::from_cols(x, y, x.cross(y))).normalize()
}

/// The full set of 27 cubelets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    cubelets: Vec<Cubelet>,
    /// Orientation of the whole puzzle in world space
    pub frame: Quat,
}

impl Default for Lattice {
    fn default() -> Self {
        Self::build()
    }
}

impl Lattice {
    /// Instantiate 27 cubelets at their solved rest poses
    pub fn build() -> Self {
        let mut cubelets = Vec::with_capacity((GRID * GRID * GRID) as usize);
        for x in -HALF..=HALF {
            for y in -HALF..=HALF {
                for z in -HALF..=HALF {
                    let id = cubelets.len();
                    cubelets.push(Cubelet::new(id, IVec3::new(x, y, z)));
                }
            }
        }
        log::debug!("Built lattice with {} cubelets", cubelets.len());
        Self {
            cubelets,
            frame: Quat::IDENTITY,
        }
    }

    pub fn cubelets(&self) -> &[Cubelet] {
        &self.cubelets
    }

    pub fn get(&self, id: usize) -> Option<&Cubelet> {
        self.cubelets.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut Cubelet> {
        self.cubelets.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.cubelets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubelets.is_empty()
    }

    /// IDs of all cubelets whose grid coordinate along `axis` equals `index`.
    ///
    /// An index outside the grid simply selects nothing.
    pub fn select_layer(&self, axis: Axis, index: i32) -> Vec<usize> {
        self.cubelets
            .iter()
            .filter(|c| c.grid_along(axis) == index)
            .map(|c| c.id)
            .collect()
    }

    /// Cubelet currently occupying a grid coordinate
    pub fn cubelet_at(&self, grid: IVec3) -> Option<&Cubelet> {
        self.cubelets.iter().find(|c| c.grid() == grid)
    }

    /// World direction -> lattice-space direction
    #[inline]
    pub fn to_local_dir(&self, dir: Vec3) -> Vec3 {
        self.frame.inverse() * dir
    }
}
