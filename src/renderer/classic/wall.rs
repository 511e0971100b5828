use std::ops::Range;

use crate::{
    fixed::Fixed16,
    renderer::Frame,
    world::{Colormap, Texture},
};

use super::{
    RendererContext,
    frame::FrameState,
    projection::Projection,
    sector::{RenderWall, ViewVertex},
};

/// Walls are clipped where they cross this view depth.
pub const NEAR_PLANE: Fixed16 = Fixed16::HALF;

/// Texture density of walls and flats.
pub const TEXELS_PER_UNIT: i32 = 8;

/// The four ways a wall can be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallPart {
    /// Full height, mid texture.
    Solid,
    /// Upper strip above a lower neighbour ceiling.
    TopOnly,
    /// Lower strip below a higher neighbour floor.
    BottomOnly,
    /// Mid texture across the opening, transparent walls only.
    Portal,
}

/// One projected screen column of a wall.
///
/// Rows are inclusive; for solid walls the `next_*` rows equal the own rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WallColumn {
    pub z: Fixed16,
    /// Texture column in texels, offset included.
    pub u: Fixed16,
    pub ceil_row: i32,
    pub floor_row: i32,
    pub next_ceil_row: i32,
    pub next_floor_row: i32,
}

impl WallColumn {
    /// First row of the opening into the neighbour.
    #[inline(always)]
    pub fn portal_top(&self) -> i32 {
        self.ceil_row.max(self.next_ceil_row)
    }

    /// Last row of the opening into the neighbour.
    #[inline(always)]
    pub fn portal_bot(&self) -> i32 {
        self.floor_row.min(self.next_floor_row)
    }
}

/// Screen extent of a back-face culled, near-clipped wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallProjection {
    /// Inclusive column range, already clamped to the screen.
    pub x0: i32,
    pub x1: i32,
    pub v0: ViewVertex,
    pub v1: ViewVertex,
    /// Texture u at the clipped endpoints.
    pub u0: Fixed16,
    pub u1: Fixed16,
}

/// A wall ready to be rasterized over `x0 ..= x1`.
#[derive(Clone, Debug)]
pub struct WallSegment {
    pub x0: i32,
    pub x1: i32,
    /// Column samples in the arena, one per screen column.
    pub cols: Range<usize>,
    pub wall: RenderWall,
    pub ceil_h: Fixed16,
    pub floor_h: Fixed16,
    /// Neighbour `(floor, ceiling)` for adjoining walls.
    pub next: Option<(Fixed16, Fixed16)>,
    /// Sector ambient plus the wall's light offset.
    pub ambient: i32,
}

/// Project wall `a -> b` (view space) to screen columns.
///
/// Returns `None` for walls facing away, behind the near plane or outside
/// the screen.
pub fn project_wall(
    a: ViewVertex,
    b: ViewVertex,
    length: Fixed16,
    proj: &Projection,
) -> Option<WallProjection> {
    // Walls wind clockwise, so the camera must be on their right.
    let side = b.x.0 as i128 * a.z.0 as i128 - a.x.0 as i128 * b.z.0 as i128;
    if side <= 0 {
        return None;
    }
    if a.z < NEAR_PLANE && b.z < NEAR_PLANE {
        return None;
    }

    let (mut v0, mut v1) = (a, b);
    let (mut u0, mut u1) = (Fixed16::ZERO, length);
    if a.z < NEAR_PLANE || b.z < NEAR_PLANE {
        let t = (NEAR_PLANE - a.z) / (b.z - a.z);
        let clipped = ViewVertex {
            x: a.x + (b.x - a.x) * t,
            z: NEAR_PLANE,
        };
        if a.z < NEAR_PLANE {
            v0 = clipped;
            u0 = length * t;
        } else {
            v1 = clipped;
            u1 = length * t;
        }
    }

    let sx = |v: ViewVertex| {
        proj.screen_x_mid + Fixed16::mul_div(v.x, proj.focal_length, v.z).round()
    };
    let (sx0, sx1) = (sx(v0), sx(v1));
    let x0 = sx0.max(proj.min_screen_x);
    let x1 = (sx1 - 1).min(proj.max_screen_x);
    if x0 > x1 {
        return None;
    }
    Some(WallProjection {
        x0,
        x1,
        v0,
        v1,
        u0,
        u1,
    })
}

/// Screen row where height `h` meets the wall at depth `z`.
#[inline(always)]
fn row_at(frame: &FrameState, proj: &Projection, h: Fixed16, z: Fixed16) -> i32 {
    (frame.half_height - Fixed16::mul_div(h - frame.eye_height, proj.focal_len_aspect, z)).ceil()
}

/// Intersect each column's view ray with the wall and record depth,
/// texture u and wall rows.
pub fn fill_columns(
    proj: &Projection,
    frame: &FrameState,
    wp: &WallProjection,
    seg: &WallSegment,
    cols: &mut [WallColumn],
) {
    let (a, b) = (wp.v0, wp.v1);
    let (dx, dz) = (b.x - a.x, b.z - a.z);
    let du = wp.u1 - wp.u0;

    for (x, col) in (seg.x0..=seg.x1).zip(cols.iter_mut()) {
        let s = proj.x_over_y[x as usize];
        let denom = dx - s * dz;
        let t = if denom == Fixed16::ZERO {
            Fixed16::ZERO
        } else {
            ((s * a.z - a.x) / denom).clamp(Fixed16::ZERO, Fixed16::ONE)
        };
        let z = (a.z + dz * t).max(NEAR_PLANE);

        let ceil_row = row_at(frame, proj, seg.ceil_h, z);
        let floor_row = row_at(frame, proj, seg.floor_h, z) - 1;
        let (next_ceil_row, next_floor_row) = match seg.next {
            Some((nf, nc)) => (row_at(frame, proj, nc, z), row_at(frame, proj, nf, z) - 1),
            None => (ceil_row, floor_row),
        };

        *col = WallColumn {
            z,
            u: wp.u0 + du * t + seg.wall.u_offset,
            ceil_row,
            floor_row,
            next_ceil_row,
            next_floor_row,
        };
    }
}

/// Texture mapping for one vertical run.
struct ColumnPaint<'t> {
    tex: &'t Texture,
    shade: &'t [u8; 256],
    u: i32,
    v: i64,
    dv: i64,
    see_through: bool,
}

/// Write rows `y0 ..= y1` of column `x`.
#[inline(always)]
fn paint_column(display: &mut [u8], width: usize, x: i32, y0: i32, y1: i32, p: ColumnPaint<'_>) {
    let mut v = p.v;
    let mut idx = y0 as usize * width + x as usize;
    for _ in y0..=y1 {
        let texel = p.tex.texel(p.u, (v >> 16) as i32);
        if !(p.see_through && texel == 0) {
            display[idx] = p.shade[texel as usize];
        }
        v += p.dv;
        idx += width;
    }
}

impl RendererContext {
    /// Single dispatch for every wall variant over the segment's columns.
    pub(super) fn draw_wall_part(
        &mut self,
        part: WallPart,
        seg: &WallSegment,
        depth: usize,
        out: &mut Frame<'_>,
    ) {
        if part == WallPart::Portal && !seg.wall.transparent {
            return;
        }

        let Self {
            proj,
            frame,
            windows,
            arena,
            ..
        } = self;
        let slot = windows.slot_mut(depth);
        let columns = arena.columns.slice(seg.cols.clone());
        let colormap: &Colormap = out.colormap;
        let width = proj.width;

        let (tex_id, anchor) = match part {
            WallPart::Solid | WallPart::Portal => (seg.wall.mid_tex, seg.ceil_h),
            WallPart::TopOnly => (seg.wall.top_tex, seg.ceil_h),
            WallPart::BottomOnly => (
                seg.wall.bot_tex,
                seg.next.map_or(seg.floor_h, |(nf, _)| nf),
            ),
        };
        let tex = out.textures.texture_or_missing(tex_id);
        let anchor_dy = anchor - frame.eye_height;

        for (x, c) in (seg.x0..=seg.x1).zip(columns) {
            // Strips never leave the wall's own rows, whatever the neighbour heights.
            let (first, last) = match part {
                WallPart::Solid => (c.ceil_row, c.floor_row),
                WallPart::TopOnly => (c.ceil_row, (c.next_ceil_row - 1).min(c.floor_row)),
                WallPart::BottomOnly => ((c.next_floor_row + 1).max(c.ceil_row), c.floor_row),
                WallPart::Portal => (c.portal_top(), c.portal_bot()),
            };
            let col = x as usize;
            let y0 = first.max(slot.top[col]);
            let y1 = last.min(slot.bot[col]);

            if y0 <= y1 {
                // Texel rows per screen row at this depth.
                let k = c.z / proj.focal_len_aspect;
                let dy = Fixed16::from_int(y0) - frame.half_height;
                let v = (anchor_dy + dy * k).0 as i64 * TEXELS_PER_UNIT as i64
                    + seg.wall.v_offset.0 as i64;
                let light = frame.light_level(seg.ambient, c.z, &colormap.light_source_ramp);
                paint_column(
                    out.display,
                    width,
                    x,
                    y0,
                    y1,
                    ColumnPaint {
                        tex,
                        shade: colormap.row(light),
                        u: c.u.floor(),
                        v,
                        dv: k.0 as i64 * TEXELS_PER_UNIT as i64,
                        see_through: part == WallPart::Portal,
                    },
                );
            }

            match part {
                WallPart::TopOnly => slot.narrow_top(x, c.portal_top()),
                WallPart::BottomOnly => slot.narrow_bot(x, c.portal_bot()),
                WallPart::Solid | WallPart::Portal => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vv(x: i32, z: i32) -> ViewVertex {
        ViewVertex {
            x: Fixed16::from_int(x),
            z: Fixed16::from_int(z),
        }
    }

    #[test]
    fn front_wall_spans_screen() {
        let proj = Projection::new(320, 200);
        let wp = project_wall(vv(-32, 32), vv(32, 32), Fixed16::from_int(512), &proj).unwrap();
        assert_eq!((wp.x0, wp.x1), (0, 319));
        assert_eq!(wp.u1, Fixed16::from_int(512));
    }

    #[test]
    fn back_face_is_culled() {
        let proj = Projection::new(320, 200);
        assert!(project_wall(vv(32, 32), vv(-32, 32), Fixed16::ONE, &proj).is_none());
    }

    #[test]
    fn near_clip_keeps_visible_part() {
        let proj = Projection::new(320, 200);
        // crosses the near plane, left end behind the camera
        let wp = project_wall(vv(-8, -8), vv(8, 24), Fixed16::from_int(64), &proj).unwrap();
        assert_eq!(wp.v0.z, NEAR_PLANE);
        assert!(wp.u0 > Fixed16::ZERO && wp.u0 < Fixed16::from_int(64));
        assert_eq!(wp.x1, proj.screen_x_mid + 53 - 1);
        // entirely behind
        assert!(project_wall(vv(-8, -8), vv(8, -2), Fixed16::ONE, &proj).is_none());
    }

    #[test]
    fn adjacent_walls_share_a_column_edge() {
        let proj = Projection::new(320, 200);
        let left = project_wall(vv(-40, 20), vv(3, 35), Fixed16::ONE, &proj).unwrap();
        let right = project_wall(vv(3, 35), vv(40, 20), Fixed16::ONE, &proj).unwrap();
        assert_eq!(left.x1 + 1, right.x0);
    }

    #[test]
    fn portal_rows_are_the_overlap() {
        let c = WallColumn {
            z: Fixed16::from_int(32),
            u: Fixed16::ZERO,
            ceil_row: 20,
            floor_row: 179,
            next_ceil_row: 60,
            next_floor_row: 139,
        };
        assert_eq!((c.portal_top(), c.portal_bot()), (60, 139));
        let wide = WallColumn {
            next_ceil_row: 5,
            next_floor_row: 190,
            ..c
        };
        assert_eq!((wide.portal_top(), wide.portal_bot()), (20, 179));
    }
}
