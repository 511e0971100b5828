//! Classic sector/portal software renderer.
//!
//! * [`world`] holds the level description, camera and texture data.
//! * [`renderer`] turns a level + camera into a palette-indexed frame.
//! * [`fixed`] is the Q16.16 scalar every renderer stage works in.

pub mod config;
pub mod fixed;
pub mod renderer;
pub mod world;
