use crate::{
    config::LightMode,
    fixed::Fixed16,
    renderer::classic::projection::Projection,
    world::{CameraPose, LIGHT_RAMP_LEN, SectorId},
};

pub const MAX_LIGHT_LEVEL: i32 = 31;

/// Ambient adjustment of the dark lighting mode.
const DARK_AMBIENT: i32 = -9;

/// Camera constants for the frame being drawn.
#[derive(Clone, Debug, Default)]
pub struct FrameState {
    pub cos_yaw: Fixed16,
    pub sin_yaw: Fixed16,
    pub x_trans: Fixed16,
    pub z_trans: Fixed16,
    pub eye_height: Fixed16,
    pub camera_x: Fixed16,
    pub camera_z: Fixed16,

    /// Horizon row including the pitch offset.
    pub half_height: Fixed16,
    /// Screen height shifted by the whole-pixel part of the pitch offset.
    pub height_in_pixels: i32,

    pub sector: Option<SectorId>,

    pub light_mode: LightMode,
    pub world_ambient: i32,
    pub camera_light: bool,

    /// Advances on every camera setup and every draw.
    pub draw_frame: u32,
}

impl FrameState {
    pub fn setup(&mut self, pose: &CameraPose, proj: &Projection, mode: LightMode) {
        let (c, s) = (pose.cos_yaw, pose.sin_yaw);
        self.cos_yaw = c;
        self.sin_yaw = s;
        self.camera_x = pose.x;
        self.camera_z = pose.z;
        self.eye_height = pose.y;
        self.x_trans = -pose.x * c - pose.z * s;
        self.z_trans = -pose.z * c + pose.x * s;

        let pitch_offset = pose.sin_pitch * proj.focal_len_aspect;
        self.half_height = proj.half_height + pitch_offset;
        self.height_in_pixels = proj.height as i32 + pitch_offset.floor();

        self.sector = pose.sector;
        self.set_light_mode(mode);
        self.draw_frame = self.draw_frame.wrapping_add(1);
    }

    pub(super) fn set_light_mode(&mut self, mode: LightMode) {
        self.light_mode = mode;
        (self.world_ambient, self.camera_light) = match mode {
            LightMode::Off => (MAX_LIGHT_LEVEL, false),
            LightMode::Normal => (0, true),
            LightMode::Dark => (DARK_AMBIENT, true),
        };
    }

    /// World position to view space: `x` to the right, `z` forward.
    #[inline(always)]
    pub fn to_view(&self, x: Fixed16, z: Fixed16) -> (Fixed16, Fixed16) {
        let (c, s) = (self.cos_yaw, self.sin_yaw);
        (x * c + z * s + self.x_trans, -x * s + z * c + self.z_trans)
    }

    /// View-space point back to world space.
    #[inline(always)]
    pub fn view_to_world(&self, xv: Fixed16, zv: Fixed16) -> (Fixed16, Fixed16) {
        let (c, s) = (self.cos_yaw, self.sin_yaw);
        (
            self.camera_x + xv * c - zv * s,
            self.camera_z + xv * s + zv * c,
        )
    }

    /// Colormap row for a surface of `ambient` seen at depth `z`.
    #[inline]
    pub fn light_level(&self, ambient: i32, z: Fixed16, ramp: &[u8; LIGHT_RAMP_LEN]) -> usize {
        if self.light_mode == LightMode::Off || ambient >= MAX_LIGHT_LEVEL {
            return MAX_LIGHT_LEVEL as usize;
        }
        let mut light = ambient + self.world_ambient - (z.floor() >> 4);
        if self.camera_light {
            let d = (z.0 >> 14).clamp(0, LIGHT_RAMP_LEN as i32 - 1) as usize;
            let lamp = MAX_LIGHT_LEVEL - (ramp[d] as i32 + self.world_ambient);
            light = light.max(lamp);
        }
        light.clamp(0, MAX_LIGHT_LEVEL) as usize
    }
}
