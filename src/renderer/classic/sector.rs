use std::ops::Range;

use log::debug;

use crate::{
    fixed::Fixed16,
    renderer::{Frame, SectorObjects},
    world::{Level, SectorId, TextureId, Vertex, WallFlags},
};

use super::{
    RendererContext,
    wall::{self, WallPart, WallSegment},
};

/// View-space vertex: `x` to the right, `z` forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewVertex {
    pub x: Fixed16,
    pub z: Fixed16,
}

/// Render-side copy of a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderWall {
    pub v0: u16,
    pub v1: u16,
    /// Neighbour visibility recurses into; `None` for solid walls.
    pub next: Option<SectorId>,
    pub top_tex: TextureId,
    pub mid_tex: TextureId,
    pub bot_tex: TextureId,
    pub u_offset: Fixed16,
    pub v_offset: Fixed16,
    pub light: i32,
    pub transparent: bool,
    /// Length in texels.
    pub length: Fixed16,
}

/// Per-sector render state, re-derived by `update_sector`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSector {
    pub floor_h: Fixed16,
    pub ceil_h: Fixed16,
    pub ambient: i32,
    pub floor_tex: TextureId,
    pub ceil_tex: TextureId,
    pub floor_offset: (Fixed16, Fixed16),
    pub ceil_offset: (Fixed16, Fixed16),
    pub vertices: Vec<Vertex>,
    pub walls: Vec<RenderWall>,
    /// Frame this sector was last drawn in.
    pub draw_frame: u32,
}

impl RenderSector {
    pub fn from_level(level: &Level, id: SectorId) -> Self {
        let s = level.sector(id);
        let vertices = level.sector_vertices(id).to_vec();
        let walls = level
            .sector_walls(id)
            .iter()
            .map(|w| {
                let a = vertices[w.v0 as usize];
                let b = vertices[w.v1 as usize];
                RenderWall {
                    v0: w.v0,
                    v1: w.v1,
                    next: w
                        .adjoin
                        .filter(|_| w.is_traversable())
                        .map(|adj| adj.sector),
                    top_tex: w.top_tex,
                    mid_tex: w.mid_tex,
                    bot_tex: w.bot_tex,
                    u_offset: w.u_offset,
                    v_offset: w.v_offset,
                    light: w.light as i32,
                    transparent: w.flags.contains(WallFlags::TRANSPARENT),
                    length: Fixed16::length(b.x - a.x, b.z - a.z).mul_int(wall::TEXELS_PER_UNIT),
                }
            })
            .collect();

        Self {
            floor_h: s.floor_h,
            ceil_h: s.ceil_h,
            ambient: s.ambient,
            floor_tex: s.floor_tex,
            ceil_tex: s.ceil_tex,
            floor_offset: s.floor_offset,
            ceil_offset: s.ceil_offset,
            vertices,
            walls,
            draw_frame: 0,
        }
    }
}

impl RendererContext {
    /// Draw sector `id` through the window at `depth`, recursing into every
    /// visible adjoin.
    pub(super) fn draw_sector(
        &mut self,
        id: SectorId,
        depth: usize,
        out: &mut Frame<'_>,
        objects: &mut dyn SectorObjects,
    ) {
        self.sectors[id as usize].draw_frame = self.frame.draw_frame;
        self.counters.sectors_drawn += 1;
        self.counters.max_adjoin_depth = self.counters.max_adjoin_depth.max(depth);
        self.windows.clear_depth(depth);

        // Flats first, bounded by the incoming window; walls paint over them.
        self.draw_flats(id, depth, out);

        match self.transform_sector(id) {
            Some(verts) => {
                let wall_count = self.sectors[id as usize].walls.len();
                let budget = self.config.max_wall_count;
                if wall_count > budget {
                    self.counters.wall_budget_hits += 1;
                    debug!("sector {id}: {wall_count} walls over budget {budget}");
                }
                for i in 0..wall_count.min(budget) {
                    self.process_wall(id, i, verts.clone(), depth, out, objects);
                }
            }
            None => self.counters.arena_exhausted += 1,
        }

        let view = self.windows.clip(depth);
        objects.draw_objects(id, &view, out.display);
    }

    /// Transform the sector's vertices into the arena, once per visit.
    fn transform_sector(&mut self, id: SectorId) -> Option<Range<usize>> {
        let sector = &self.sectors[id as usize];
        let range = self.arena.vertices.alloc(sector.vertices.len())?;
        let dst = self.arena.vertices.slice_mut(range.clone());
        for (out, v) in dst.iter_mut().zip(&sector.vertices) {
            let (x, z) = self.frame.to_view(v.x, v.z);
            *out = ViewVertex { x, z };
        }
        Some(range)
    }

    fn process_wall(
        &mut self,
        id: SectorId,
        index: usize,
        verts: Range<usize>,
        depth: usize,
        out: &mut Frame<'_>,
        objects: &mut dyn SectorObjects,
    ) {
        self.counters.walls_processed += 1;

        let sector = &self.sectors[id as usize];
        let w = sector.walls[index];
        let (a, b) = {
            let vs = self.arena.vertices.slice(verts);
            (vs[w.v0 as usize], vs[w.v1 as usize])
        };
        let Some(proj) = wall::project_wall(a, b, w.length, &self.proj) else {
            return;
        };

        let slot = self.windows.slot(depth);
        let x0 = proj.x0.max(slot.min_x);
        let x1 = proj.x1.min(slot.max_x);
        if x0 > x1 {
            return;
        }

        let next = w.next.map(|n| {
            let s = &self.sectors[n as usize];
            (s.floor_h, s.ceil_h)
        });
        let seg = WallSegment {
            x0,
            x1,
            cols: 0..0,
            wall: w,
            ceil_h: sector.ceil_h,
            floor_h: sector.floor_h,
            next,
            ambient: sector.ambient + w.light,
        };

        let Some(cols) = self.arena.columns.alloc((x1 - x0 + 1) as usize) else {
            self.counters.arena_exhausted += 1;
            return;
        };
        let seg = WallSegment { cols, ..seg };
        wall::fill_columns(
            &self.proj,
            &self.frame,
            &proj,
            &seg,
            self.arena.columns.slice_mut(seg.cols.clone()),
        );
        self.counters.wall_segments += 1;

        match w.next {
            None => self.draw_wall_part(WallPart::Solid, &seg, depth, out),
            Some(next) => {
                self.draw_wall_part(WallPart::TopOnly, &seg, depth, out);
                self.draw_wall_part(WallPart::BottomOnly, &seg, depth, out);
                self.counters.adjoin_segments += 1;
                self.traverse_portal(next, &seg, depth, out, objects);
                self.draw_wall_part(WallPart::Portal, &seg, depth, out);
            }
        }

        // Whatever this wall covers is finished for this depth.
        let slot = self.windows.slot_mut(depth);
        let columns = self.arena.columns.slice(seg.cols.clone());
        for (x, c) in (seg.x0..=seg.x1).zip(columns) {
            slot.occlude(x);
            slot.write_depth(x, c.z);
        }
    }

    fn traverse_portal(
        &mut self,
        next: SectorId,
        seg: &WallSegment,
        depth: usize,
        out: &mut Frame<'_>,
        objects: &mut dyn SectorObjects,
    ) {
        if depth >= self.config.max_adjoin_depth {
            self.counters.depth_cap_hits += 1;
            return;
        }
        if self.sectors[next as usize].draw_frame == self.frame.draw_frame {
            self.counters.reentry_skips += 1;
            return;
        }

        let columns = self.arena.columns.slice(seg.cols.clone());
        let x0 = seg.x0;
        let opened = self.windows.push(depth, seg.x0, seg.x1, |x| {
            let c = &columns[(x - x0) as usize];
            (c.portal_top(), c.portal_bot())
        });
        if opened.is_some() {
            self.draw_sector(next, depth + 1, out, objects);
        }
    }
}
