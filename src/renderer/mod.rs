//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches renderer internals directly.*
//! It loads a [`Level`], hands the renderer a [`CameraPose`] each frame and
//! supplies a palette-indexed target buffer through a [`Frame`].
//!
//! * Back-ends implement [`Renderer`]; [`classic::RendererContext`] is the
//!   fixed-point portal renderer.
//! * A helper blanket‐impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.
//! * Sprites and models plug in through [`SectorObjects`], which is called
//!   for every drawn sector with the window it is visible through.

use crate::{
    fixed::Fixed16,
    world::{CameraPose, Colormap, Level, SectorId, TextureBank},
};

pub mod classic;

pub use classic::{FrameCounters, RendererContext};

/// Everything `draw` reads or writes outside the renderer.
pub struct Frame<'a> {
    /// `width * height` palette indices, row-major.
    pub display: &'a mut [u8],
    pub colormap: &'a Colormap,
    pub textures: &'a TextureBank,
}

/// Read-only snapshot of one depth slot of the clip window stack.
///
/// Column arrays are indexed by screen x and cover the full width; only
/// `min_x ..= max_x` is meaningful.
#[derive(Clone, Copy, Debug)]
pub struct WindowView<'a> {
    pub depth: usize,
    pub min_x: i32,
    pub max_x: i32,
    pub top: &'a [i32],
    pub bot: &'a [i32],
    /// Nearest wall depth drawn so far in each column.
    pub depth_1d: &'a [Fixed16],
}

impl WindowView<'_> {
    /// `true` if column `x` still has at least one drawable row.
    #[inline]
    pub fn is_open(&self, x: i32) -> bool {
        x >= self.min_x
            && x <= self.max_x
            && self.top[x as usize] <= self.bot[x as usize]
    }
}

/// Hook for sprite / model submission inside the sector traversal.
pub trait SectorObjects {
    /// Called once per drawn sector, after its walls, with the window the
    /// sector was entered through.
    fn draw_objects(&mut self, sector: SectorId, view: &WindowView<'_>, display: &mut [u8]);
}

/// Hook that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObjects;

impl SectorObjects for NoObjects {
    fn draw_objects(&mut self, _: SectorId, _: &WindowView<'_>, _: &mut [u8]) {}
}

/// A renderer that keeps per-level and per-resolution state between frames.
///
/// Calls must not overlap: `setup_level` and `change_resolution` reallocate
/// buffers `draw` relies on.
pub trait Renderer {
    /// (Re)initialise projection tables, arena and per-sector render state.
    /// Must be called before the first `draw` of a level.
    fn setup_level(&mut self, level: &Level, width: usize, height: usize);

    /// Rebuild resolution-dependent tables. Returns `false` (and does
    /// nothing) when the resolution is unchanged.
    fn change_resolution(&mut self, width: usize, height: usize) -> bool;

    /// Update frame-scoped camera constants; precedes every `draw`.
    fn set_camera(&mut self, pose: &CameraPose);

    /// Clear `frame.display` and render the level from the camera sector.
    fn draw(&mut self, frame: &mut Frame<'_>, objects: &mut dyn SectorObjects);

    /// Re-derive cached render state of one sector after a game-logic change.
    fn update_sector(&mut self, level: &Level, id: SectorId);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame(&mut self, display: &mut [u8], colormap: &Colormap, textures: &TextureBank) {
        let mut frame = Frame {
            display,
            colormap,
            textures,
        };
        self.draw(&mut frame, &mut NoObjects);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
