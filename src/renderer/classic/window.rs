use crate::{fixed::Fixed16, renderer::WindowView};

use super::projection::Projection;

/// Clip state of one adjoin depth.
///
/// `top`/`bot` narrow while the sector at this depth draws its walls;
/// `clip_top`/`clip_bot` keep the window the sector was entered through.
/// Rows are inclusive, a column with `top > bot` is fully occluded.
#[derive(Clone, Debug, Default)]
pub struct WindowSlot {
    pub top: Vec<i32>,
    pub bot: Vec<i32>,
    pub clip_top: Vec<i32>,
    pub clip_bot: Vec<i32>,
    pub depth: Vec<Fixed16>,
    pub min_x: i32,
    pub max_x: i32,
}

impl WindowSlot {
    fn resize(&mut self, width: usize) {
        for v in [&mut self.top, &mut self.bot, &mut self.clip_top, &mut self.clip_bot] {
            v.resize(width, 0);
        }
        self.depth.resize(width, Fixed16::MAX);
    }

    fn fill_full(&mut self, proj: &Projection) {
        self.top.fill(proj.min_screen_y);
        self.bot.fill(proj.max_screen_y);
        self.clip_top.fill(proj.min_screen_y);
        self.clip_bot.fill(proj.max_screen_y);
        self.depth.fill(Fixed16::MAX);
        self.min_x = proj.min_screen_x;
        self.max_x = proj.max_screen_x;
    }

    #[inline(always)]
    pub fn is_open(&self, x: i32) -> bool {
        self.top[x as usize] <= self.bot[x as usize]
    }

    /// Rows above `row` are done in column `x`.
    #[inline(always)]
    pub fn narrow_top(&mut self, x: i32, row: i32) {
        let t = &mut self.top[x as usize];
        *t = (*t).max(row);
    }

    /// Rows below `row` are done in column `x`.
    #[inline(always)]
    pub fn narrow_bot(&mut self, x: i32, row: i32) {
        let b = &mut self.bot[x as usize];
        *b = (*b).min(row);
    }

    #[inline(always)]
    pub fn occlude(&mut self, x: i32) {
        let c = x as usize;
        self.top[c] = self.bot[c] + 1;
    }

    #[inline(always)]
    pub fn write_depth(&mut self, x: i32, z: Fixed16) {
        let d = &mut self.depth[x as usize];
        *d = (*d).min(z);
    }
}

/// Depth-indexed stack of clip windows.
///
/// One slot per depth in `0..=MAX_ADJOIN_DEPTH`; the camera sector draws at
/// depth 1. Slots are sized once per resolution and refilled each frame.
#[derive(Clone, Debug, Default)]
pub struct WindowStack {
    width: usize,
    slots: Vec<WindowSlot>,
}

impl WindowStack {
    pub fn new(slots: usize) -> Self {
        Self {
            width: 0,
            slots: vec![WindowSlot::default(); slots],
        }
    }

    pub fn depth_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn resize(&mut self, width: usize) {
        self.width = width;
        for s in &mut self.slots {
            s.resize(width);
        }
    }

    /// Every slot back to the full screen.
    pub fn reset(&mut self, proj: &Projection) {
        if self.width != proj.width {
            self.resize(proj.width);
        }
        for s in &mut self.slots {
            s.fill_full(proj);
        }
    }

    #[inline(always)]
    pub fn slot(&self, depth: usize) -> &WindowSlot {
        &self.slots[depth]
    }

    #[inline(always)]
    pub fn slot_mut(&mut self, depth: usize) -> &mut WindowSlot {
        &mut self.slots[depth]
    }

    /// Forget the depth written by an earlier visit of this depth.
    pub fn clear_depth(&mut self, depth: usize) {
        self.slots[depth].depth.fill(Fixed16::MAX);
    }

    /// Build the window of depth `depth + 1` from the live window at
    /// `depth` intersected with `extent(x) = (first_row, last_row)` over
    /// columns `x0 ..= x1`.
    ///
    /// Returns the trimmed column range, or `None` when nothing is visible.
    pub fn push(
        &mut self,
        depth: usize,
        x0: i32,
        x1: i32,
        extent: impl Fn(i32) -> (i32, i32),
    ) -> Option<(i32, i32)> {
        let (lo, hi) = self.slots.split_at_mut(depth + 1);
        let parent = &lo[depth];
        let child = &mut hi[0];

        let mut first = None;
        let mut last = x0;
        for x in x0.max(parent.min_x)..=x1.min(parent.max_x) {
            let c = x as usize;
            let (open_top, open_bot) = extent(x);
            let top = parent.top[c].max(open_top);
            let bot = parent.bot[c].min(open_bot);
            child.top[c] = top;
            child.bot[c] = bot;
            child.clip_top[c] = top;
            child.clip_bot[c] = bot;
            child.depth[c] = Fixed16::MAX;
            if top <= bot {
                if first.is_none() {
                    first = Some(x);
                }
                last = x;
            }
        }

        let first = first?;
        child.min_x = first;
        child.max_x = last;
        Some((first, last))
    }

    /// Live (narrowing) window of `depth`.
    pub fn live(&self, depth: usize) -> WindowView<'_> {
        let s = &self.slots[depth];
        WindowView {
            depth,
            min_x: s.min_x,
            max_x: s.max_x,
            top: &s.top,
            bot: &s.bot,
            depth_1d: &s.depth,
        }
    }

    /// Window `depth` was entered through.
    pub fn clip(&self, depth: usize) -> WindowView<'_> {
        let s = &self.slots[depth];
        WindowView {
            depth,
            min_x: s.min_x,
            max_x: s.max_x,
            top: &s.clip_top,
            bot: &s.clip_bot,
            depth_1d: &s.depth,
        }
    }

    /// `top <= bot + 1` for every column of the slot's range.
    pub fn is_consistent(&self, depth: usize) -> bool {
        let s = &self.slots[depth];
        (s.min_x..=s.max_x).all(|x| s.top[x as usize] <= s.bot[x as usize] + 1)
    }
}
