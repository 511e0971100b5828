use crate::{
    fixed::Fixed16,
    renderer::Frame,
    world::{SectorId, Texture},
};

use super::{RendererContext, wall::TEXELS_PER_UNIT};

/// Everything a floor or ceiling span needs besides its row.
struct FlatPlane<'t> {
    height: Fixed16,
    tex: &'t Texture,
    offset: (Fixed16, Fixed16),
}

impl RendererContext {
    /// Floor and ceiling of sector `id` over the window it was entered
    /// through, one horizontal span per open run of columns.
    pub(super) fn draw_flats(&mut self, id: SectorId, depth: usize, out: &mut Frame<'_>) {
        let Self {
            proj,
            frame,
            windows,
            sectors,
            counters,
            ..
        } = self;
        let sector = &sectors[id as usize];
        let view = windows.clip(depth);
        if view.min_x > view.max_x {
            return;
        }

        let ceil = FlatPlane {
            height: sector.ceil_h,
            tex: out.textures.texture_or_missing(sector.ceil_tex),
            offset: sector.ceil_offset,
        };
        let floor = FlatPlane {
            height: sector.floor_h,
            tex: out.textures.texture_or_missing(sector.floor_tex),
            offset: sector.floor_offset,
        };

        let cols = view.min_x as usize..=view.max_x as usize;
        let (Some(y_min), Some(y_max)) = (
            view.top[cols.clone()].iter().min().copied(),
            view.bot[cols].iter().max().copied(),
        ) else {
            return;
        };

        let horizon = proj.horizon_row(frame.height_in_pixels);
        let step = proj.column_step;
        let width = proj.width;
        let ramp = &out.colormap.light_source_ramp;

        for y in y_min..=y_max {
            // The horizon row is infinitely far away.
            if y == horizon {
                continue;
            }
            let plane = if y < horizon { &ceil } else { &floor };
            let z = Fixed16::mul3(
                frame.eye_height - plane.height,
                proj.focal_len_aspect,
                proj.row_reciprocal(y, frame.height_in_pixels),
            );
            // Eye on the far side of the plane.
            if z <= Fixed16::ZERO {
                continue;
            }

            let shade = out.colormap.row(frame.light_level(sector.ambient, z, ramp));
            let lateral = z * step;
            let (du, dv) = (lateral * frame.cos_yaw, lateral * frame.sin_yaw);
            let row = &mut out.display[y as usize * width..][..width];

            let mut emit = |xs: i32, xe: i32| {
                let (wx, wz) = frame.view_to_world(z * proj.x_over_y[xs as usize], z);
                let mut u = wx.0 as i64 * TEXELS_PER_UNIT as i64 + plane.offset.0 .0 as i64;
                let mut v = wz.0 as i64 * TEXELS_PER_UNIT as i64 + plane.offset.1 .0 as i64;
                let step_u = du.0 as i64 * TEXELS_PER_UNIT as i64;
                let step_v = dv.0 as i64 * TEXELS_PER_UNIT as i64;
                for px in &mut row[xs as usize..=xe as usize] {
                    *px = shade[plane.tex.texel((u >> 16) as i32, (v >> 16) as i32) as usize];
                    u += step_u;
                    v += step_v;
                }
                counters.flat_spans += 1;
            };

            let mut xs = i32::MIN; // sentinel “no run”
            for x in view.min_x..=view.max_x {
                let c = x as usize;
                let inside = view.top[c] <= y && y <= view.bot[c];
                if inside {
                    if xs == i32::MIN {
                        // run starts
                        xs = x;
                    }
                } else if xs != i32::MIN {
                    // run ends
                    emit(xs, x - 1);
                    xs = i32::MIN;
                }
            }
            if xs != i32::MIN {
                // tail-run
                emit(xs, view.max_x);
            }
        }
    }
}
