use bitflags::bitflags;
use smallvec::SmallVec;

use crate::{fixed::Fixed16, world::texture::TextureId};

pub type SectorId = u16;
pub type WallId = u16;
pub type VertexId = u16;

/// Runtime snapshot of one level (immutable after load).
///
/// Sector `i` owns the contiguous slices
/// `walls[wall_offset .. wall_offset + wall_count]` and
/// `vertices[vtx_offset .. vtx_offset + vtx_count]`; walls address vertices
/// relative to their sector's slice.
#[derive(Clone, Debug, Default)]
pub struct Level {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub walls: Vec<Wall>,
    pub sectors: Vec<Sector>,
}

/*----------------------- simple primitives --------------------------*/

/// Top-down position, `x` to the right and `z` away from the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vertex {
    pub x: Fixed16,
    pub z: Fixed16,
}

impl Vertex {
    pub fn new(x: Fixed16, z: Fixed16) -> Self {
        Self { x, z }
    }

    pub fn from_f32(x: f32, z: f32) -> Self {
        Self::new(Fixed16::from_f32(x), Fixed16::from_f32(z))
    }
}

/// Non-owning link to the wall on the other side of a portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Adjoin {
    pub sector: SectorId,
    /// Index of the mirror wall inside `sector`'s wall slice.
    pub mirror: WallId,
}

/*----------------------------- walls --------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct WallFlags: u16 {
        /// Mid texture is painted across the portal; texel 0 is see-through.
        const TRANSPARENT  = 0x0001;
        /// Adjoin exists for game logic but renders as a solid wall.
        const SOLID_ADJOIN = 0x0002;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    pub v0: VertexId,
    pub v1: VertexId,
    pub adjoin: Option<Adjoin>,
    pub top_tex: TextureId,
    pub mid_tex: TextureId,
    pub bot_tex: TextureId,
    /// Texel offsets.
    pub u_offset: Fixed16,
    pub v_offset: Fixed16,
    /// Added to the sector ambient.
    pub light: i8,
    pub flags: WallFlags,
}

impl Wall {
    pub fn solid(v0: VertexId, v1: VertexId, tex: TextureId) -> Self {
        Self {
            v0,
            v1,
            adjoin: None,
            top_tex: tex,
            mid_tex: tex,
            bot_tex: tex,
            u_offset: Fixed16::ZERO,
            v_offset: Fixed16::ZERO,
            light: 0,
            flags: WallFlags::empty(),
        }
    }

    /// `true` when visibility may recurse through this wall.
    #[inline]
    pub fn is_traversable(&self) -> bool {
        self.adjoin.is_some() && !self.flags.contains(WallFlags::SOLID_ADJOIN)
    }
}

/*---------------------------- sectors -------------------------------*/

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sector {
    pub floor_h: Fixed16,
    pub ceil_h: Fixed16,
    /// `0..=31`; 31 and above is fullbright.
    pub ambient: i32,
    pub floor_tex: TextureId,
    pub ceil_tex: TextureId,
    pub floor_offset: (Fixed16, Fixed16),
    pub ceil_offset: (Fixed16, Fixed16),
    pub wall_offset: usize,
    pub wall_count: usize,
    pub vtx_offset: usize,
    pub vtx_count: usize,
}

/// Problems found while checking a level before it reaches the renderer.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("sector {0} has fewer than three walls or is not wound clockwise")]
    DegenerateSector(SectorId),

    #[error("sector {0} references walls or vertices past the level arrays")]
    SliceOutOfRange(SectorId),

    #[error("wall {wall} of sector {sector} uses vertex {vertex} outside its sector")]
    VertexOutOfRange {
        sector: SectorId,
        wall: WallId,
        vertex: VertexId,
    },

    #[error("wall {wall} of sector {sector} adjoins missing sector {target}")]
    AdjoinOutOfRange {
        sector: SectorId,
        wall: WallId,
        target: SectorId,
    },

    #[error("wall {wall} of sector {sector} mirrors missing wall {mirror}")]
    MirrorOutOfRange {
        sector: SectorId,
        wall: WallId,
        mirror: WallId,
    },

    #[error("mirror of wall {wall} in sector {sector} does not point back")]
    MirrorMismatch { sector: SectorId, wall: WallId },

    #[error("{0} sectors exceed the 16-bit sector id range")]
    TooManySectors(usize),
}

impl Level {
    #[inline]
    pub fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id as usize]
    }

    #[inline]
    pub fn sector_walls(&self, id: SectorId) -> &[Wall] {
        let s = self.sector(id);
        &self.walls[s.wall_offset..s.wall_offset + s.wall_count]
    }

    #[inline]
    pub fn sector_vertices(&self, id: SectorId) -> &[Vertex] {
        let s = self.sector(id);
        &self.vertices[s.vtx_offset..s.vtx_offset + s.vtx_count]
    }

    /// World-space endpoints of wall `w` of sector `id`.
    pub fn wall_endpoints(&self, id: SectorId, w: WallId) -> (Vertex, Vertex) {
        let wall = &self.sector_walls(id)[w as usize];
        let vtx = self.sector_vertices(id);
        (vtx[wall.v0 as usize], vtx[wall.v1 as usize])
    }

    /// Check every cross-reference the renderer indexes blindly.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.sectors.len() > SectorId::MAX as usize {
            return Err(LevelError::TooManySectors(self.sectors.len()));
        }

        for (i, s) in self.sectors.iter().enumerate() {
            let id = i as SectorId;
            if s.wall_offset + s.wall_count > self.walls.len()
                || s.vtx_offset + s.vtx_count > self.vertices.len()
            {
                return Err(LevelError::SliceOutOfRange(id));
            }
            if s.wall_count < 3 || s.vtx_count < 3 {
                return Err(LevelError::DegenerateSector(id));
            }

            for (w, wall) in self.sector_walls(id).iter().enumerate() {
                let w = w as WallId;
                for v in [wall.v0, wall.v1] {
                    if v as usize >= s.vtx_count {
                        return Err(LevelError::VertexOutOfRange {
                            sector: id,
                            wall: w,
                            vertex: v,
                        });
                    }
                }
            }
            if self.signed_area2(id) >= 0 {
                return Err(LevelError::DegenerateSector(id));
            }
        }

        // Second pass: adjoins may point forward.
        for i in 0..self.sectors.len() {
            let id = i as SectorId;
            for (w, wall) in self.sector_walls(id).iter().enumerate() {
                let Some(adj) = wall.adjoin else { continue };
                let w = w as WallId;
                if adj.sector as usize >= self.sectors.len() {
                    return Err(LevelError::AdjoinOutOfRange {
                        sector: id,
                        wall: w,
                        target: adj.sector,
                    });
                }
                let mirror = self
                    .sector_walls(adj.sector)
                    .get(adj.mirror as usize)
                    .ok_or(LevelError::MirrorOutOfRange {
                        sector: id,
                        wall: w,
                        mirror: adj.mirror,
                    })?;
                if mirror.adjoin != Some(Adjoin { sector: id, mirror: w }) {
                    return Err(LevelError::MirrorMismatch { sector: id, wall: w });
                }
            }
        }
        Ok(())
    }

    /// Twice the signed area of the sector outline, negative when clockwise.
    fn signed_area2(&self, id: SectorId) -> i128 {
        let vtx = self.sector_vertices(id);
        self.sector_walls(id)
            .iter()
            .map(|w| {
                let a = vtx[w.v0 as usize];
                let b = vtx[w.v1 as usize];
                a.x.0 as i128 * b.z.0 as i128 - b.x.0 as i128 * a.z.0 as i128
            })
            .sum()
    }

    /// Crossing-number test against the outline of sector `id`.
    pub fn contains(&self, id: SectorId, x: Fixed16, z: Fixed16) -> bool {
        let vtx = self.sector_vertices(id);
        let (px, pz) = (x.0 as i128, z.0 as i128);
        let mut inside = false;
        for w in self.sector_walls(id) {
            let a = vtx[w.v0 as usize];
            let b = vtx[w.v1 as usize];
            let (ax, az) = (a.x.0 as i128, a.z.0 as i128);
            let (bx, bz) = (b.x.0 as i128, b.z.0 as i128);
            if (az > pz) == (bz > pz) {
                continue;
            }
            // x of the edge at height pz, compared without dividing.
            let lhs = (px - ax) * (bz - az);
            let rhs = (bx - ax) * (pz - az);
            if (bz > az && lhs < rhs) || (bz < az && lhs > rhs) {
                inside = !inside;
            }
        }
        inside
    }

    /// First sector whose outline contains `(x, z)`.
    pub fn sector_at(&self, x: Fixed16, z: Fixed16) -> Option<SectorId> {
        (0..self.sectors.len())
            .map(|i| i as SectorId)
            .find(|&id| self.contains(id, x, z))
    }

    /// Distinct sectors reachable through one adjoin, in wall order.
    pub fn neighbors(&self, id: SectorId) -> SmallVec<[SectorId; 8]> {
        let mut out = SmallVec::new();
        for adj in self.sector_walls(id).iter().filter_map(|w| w.adjoin) {
            if !out.contains(&adj.sector) {
                out.push(adj.sector);
            }
        }
        out
    }
}
