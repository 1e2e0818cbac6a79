//! Puzzle simulation module
//!
//! All puzzle logic lives here. This module must stay free of rendering and
//! platform concerns:
//! - Poses live in lattice space; the lattice frame maps them to world space
//! - Turns are the only way cubelets move
//! - Seeded RNG only (scrambles are reproducible)

pub mod lattice;
pub mod scramble;
pub mod solved;
pub mod turn;

pub use lattice::{Axis, Cubelet, Face, Lattice, Sign, Sticker, snap_orientation};
pub use scramble::Scramble;
pub use solved::{is_solved, sticker_facing};
pub use turn::{Puzzle, Turn};
