mod builder;
mod camera;
pub mod demo;
mod geometry;
mod texture;

pub use builder::{LevelBuilder, SectorDesc};

pub use camera::{Camera, CameraPose, MAX_PITCH};

pub use geometry::{
    Adjoin, Level, LevelError, Sector, SectorId, Vertex, VertexId, Wall, WallFlags, WallId,
};

pub use texture::{
    Colormap, LIGHT_LEVELS, LIGHT_RAMP_LEN, NO_TEXTURE, Palette, Texture, TextureBank,
    TextureError, TextureId,
};
