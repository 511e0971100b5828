//! Programmatic level construction.
//!
//! Asset loading is somebody else's job; tests, the demo and tools build
//! levels here and get a validated [`Level`] back.

use log::debug;

use crate::{
    fixed::Fixed16,
    world::{
        geometry::{Adjoin, Level, LevelError, Sector, SectorId, Vertex, VertexId, Wall, WallId},
        texture::TextureId,
    },
};

/// Load-time description of one sector; every wall starts with `wall_tex`.
#[derive(Clone, Copy, Debug)]
pub struct SectorDesc {
    pub floor_h: f32,
    pub ceil_h: f32,
    pub ambient: i32,
    pub floor_tex: TextureId,
    pub ceil_tex: TextureId,
    pub wall_tex: TextureId,
}

pub struct LevelBuilder {
    level: Level,
}

impl LevelBuilder {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            level: Level {
                name: name.into(),
                ..Level::default()
            },
        }
    }

    /// Append a sector with one wall per outline edge.
    ///
    /// Counter-clockwise outlines are reversed so walls always wind
    /// clockwise; wall `i` then runs from the `i`-th to the next vertex of
    /// the stored order.
    pub fn sector(&mut self, desc: SectorDesc, outline: &[(f32, f32)]) -> SectorId {
        let id = self.level.sectors.len() as SectorId;
        let mut pts: Vec<Vertex> = outline.iter().map(|&(x, z)| Vertex::from_f32(x, z)).collect();
        let area2: i128 = (0..pts.len())
            .map(|i| {
                let a = pts[i];
                let b = pts[(i + 1) % pts.len()];
                a.x.0 as i128 * b.z.0 as i128 - b.x.0 as i128 * a.z.0 as i128
            })
            .sum();
        if area2 > 0 {
            pts.reverse();
        }

        let n = pts.len();
        let vtx_offset = self.level.vertices.len();
        let wall_offset = self.level.walls.len();
        self.level.vertices.extend(pts);
        for i in 0..n {
            self.level.walls.push(Wall::solid(
                i as VertexId,
                ((i + 1) % n) as VertexId,
                desc.wall_tex,
            ));
        }
        self.level.sectors.push(Sector {
            floor_h: Fixed16::from_f32(desc.floor_h),
            ceil_h: Fixed16::from_f32(desc.ceil_h),
            ambient: desc.ambient,
            floor_tex: desc.floor_tex,
            ceil_tex: desc.ceil_tex,
            floor_offset: (Fixed16::ZERO, Fixed16::ZERO),
            ceil_offset: (Fixed16::ZERO, Fixed16::ZERO),
            wall_offset,
            wall_count: n,
            vtx_offset,
            vtx_count: n,
        });
        id
    }

    pub fn sector_mut(&mut self, id: SectorId) -> &mut Sector {
        &mut self.level.sectors[id as usize]
    }

    pub fn wall_mut(&mut self, sector: SectorId, wall: WallId) -> &mut Wall {
        let off = self.level.sectors[sector as usize].wall_offset;
        &mut self.level.walls[off + wall as usize]
    }

    /// Connect two walls as each other's mirror.
    pub fn link(&mut self, a: SectorId, wa: WallId, b: SectorId, wb: WallId) {
        self.wall_mut(a, wa).adjoin = Some(Adjoin { sector: b, mirror: wb });
        self.wall_mut(b, wb).adjoin = Some(Adjoin { sector: a, mirror: wa });
    }

    /// Link every unlinked pair of walls whose endpoints coincide in
    /// opposite order. Returns the number of portals created.
    pub fn link_shared_edges(&mut self) -> usize {
        let mut edges = Vec::with_capacity(self.level.walls.len());
        for (s, sector) in self.level.sectors.iter().enumerate() {
            for w in 0..sector.wall_count {
                edges.push((s as SectorId, w as WallId));
            }
        }

        let mut linked = 0;
        for i in 0..edges.len() {
            for j in i + 1..edges.len() {
                let (sa, wa) = edges[i];
                let (sb, wb) = edges[j];
                if sa == sb
                    || self.level.sector_walls(sa)[wa as usize].adjoin.is_some()
                    || self.level.sector_walls(sb)[wb as usize].adjoin.is_some()
                {
                    continue;
                }
                let (a0, a1) = self.level.wall_endpoints(sa, wa);
                let (b0, b1) = self.level.wall_endpoints(sb, wb);
                if a0 == b1 && a1 == b0 {
                    self.link(sa, wa, sb, wb);
                    linked += 1;
                }
            }
        }
        linked
    }

    pub fn build(self) -> Result<Level, LevelError> {
        self.level.validate()?;
        debug!(
            "level `{}`: {} sectors, {} walls, {} vertices",
            self.level.name,
            self.level.sectors.len(),
            self.level.walls.len(),
            self.level.vertices.len()
        );
        Ok(self.level)
    }
}
