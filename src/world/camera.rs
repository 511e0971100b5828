use glam::{Vec2, Vec3};

use crate::{
    fixed::Fixed16,
    world::geometry::{Level, SectorId},
};

/// Pitch is clamped so the horizon never leaves the screen.
pub const MAX_PITCH: f32 = 0.6;

/// Camera constants in renderer units, handed to `Renderer::set_camera`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraPose {
    pub cos_yaw: Fixed16,
    pub sin_yaw: Fixed16,
    pub sin_pitch: Fixed16,
    pub x: Fixed16,
    /// Absolute eye height.
    pub y: Fixed16,
    pub z: Fixed16,
    pub sector: Option<SectorId>,
}

/// Player view-point in world space.
///
/// * `pos.x`/`pos.z` span the floor plan, `pos.y` is the absolute eye height.
/// * `yaw = 0` looks down +z; positive yaw turns left.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: Vec3,
    pub yaw: f32,   // radians
    pub pitch: f32, // radians, positive looks up
    pub sector: Option<SectorId>,
}

impl Camera {
    pub fn new(pos: Vec3, yaw: f32, sector: Option<SectorId>) -> Self {
        Self {
            pos,
            yaw,
            pitch: 0.0,
            sector,
        }
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the x–z plane.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(-s, c)
    }

    /// Unit vector pointing to the camera's right on the x–z plane.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(c, s)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe), preserving eye-height.
    pub fn step(&mut self, forward: f32, side: f32) {
        let f = self.forward();
        let r = self.right();
        self.pos.x += f.x * forward + r.x * side;
        self.pos.z += f.y * forward + r.y * side;
    }

    /// Rotate around the vertical axis (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
    }

    /// Tilt the view, clamped to `±MAX_PITCH`.
    pub fn look(&mut self, delta_pitch: f32) {
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Re-resolve the containing sector after a move.
    ///
    /// Checks the current sector, then its neighbours, then every sector.
    /// Leaves `sector` untouched when the point is outside the level, so a
    /// camera nudged into a wall keeps rendering from its last sector.
    pub fn relocate(&mut self, level: &Level) -> Option<SectorId> {
        let (x, z) = (Fixed16::from_f32(self.pos.x), Fixed16::from_f32(self.pos.z));
        let found = match self.sector {
            Some(cur) if level.contains(cur, x, z) => Some(cur),
            Some(cur) => level
                .neighbors(cur)
                .into_iter()
                .find(|&n| level.contains(n, x, z))
                .or_else(|| level.sector_at(x, z)),
            None => level.sector_at(x, z),
        };
        if found.is_some() {
            self.sector = found;
        }
        found
    }

    /// Fixed-point snapshot for the renderer.
    pub fn pose(&self) -> CameraPose {
        let (s, c) = self.yaw.sin_cos();
        CameraPose {
            cos_yaw: Fixed16::from_f32(c),
            sin_yaw: Fixed16::from_f32(s),
            sin_pitch: Fixed16::from_f32(self.pitch.sin()),
            x: Fixed16::from_f32(self.pos.x),
            y: Fixed16::from_f32(self.pos.y),
            z: Fixed16::from_f32(self.pos.z),
            sector: self.sector,
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
