// Palette-indexed texture storage plus the shading tables the renderer reads.
// The renderer and level data interact through `TextureId` only.

use std::collections::HashMap;

use std::ops::{Index, IndexMut};

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Light levels in a colormap, darkest first.
pub const LIGHT_LEVELS: usize = 32;

/// Entries of the camera light-source ramp.
pub const LIGHT_RAMP_LEN: usize = 128;

/// 8-bit palette indices in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u8>,
}

/// Convenience checkerboard 8×8.
impl Default for Texture {
    fn default() -> Self {
        const LIGHT_IDX: u8 = 8;
        const DARK_IDX: u8 = 16;
        let mut pix = vec![0u8; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT_IDX } else { DARK_IDX };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

impl Texture {
    /// Single-colour texture.
    pub fn solid<S: Into<String>>(name: S, w: usize, h: usize, index: u8) -> Self {
        Texture {
            name: name.into(),
            w,
            h,
            pixels: vec![index; w * h],
        }
    }

    /// Texel at wrapped coordinates; `u` runs across, `v` down.
    #[inline(always)]
    pub fn texel(&self, u: i32, v: i32) -> u8 {
        let x = u.rem_euclid(self.w as i32) as usize;
        let y = v.rem_euclid(self.h as i32) as usize;
        self.pixels[y * self.w + x]
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Width or height is zero, or pixel count does not match.
    #[error("texture `{0}` has inconsistent dimensions")]
    BadSize(String),
}

/// 0x00RRGGBB for every palette index.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette(pub [u32; 256]);
impl Default for Palette {
    fn default() -> Self {
        Palette([0u32; 256])
    }
}
impl Index<usize> for Palette {
    type Output = u32;
    fn index(&self, idx: usize) -> &u32 {
        &self.0[idx]
    }
}
impl IndexMut<usize> for Palette {
    fn index_mut(&mut self, idx: usize) -> &mut u32 {
        &mut self.0[idx]
    }
}

/// Shading tables: one remap row per light level plus the camera light ramp.
///
/// `base[31]` is full brightness; `light_source_ramp[d]` is how much the
/// camera light falls off at quarter-unit distance `d`.
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    pub base: Box<[[u8; 256]; LIGHT_LEVELS]>,
    pub light_source_ramp: [u8; LIGHT_RAMP_LEN],
}

impl Default for Colormap {
    fn default() -> Self {
        Colormap {
            base: Box::new([[0u8; 256]; LIGHT_LEVELS]),
            light_source_ramp: [0u8; LIGHT_RAMP_LEN],
        }
    }
}

impl Colormap {
    /// Every level maps an index to itself and the ramp is flat.
    pub fn identity() -> Self {
        let mut cm = Colormap::default();
        for row in cm.base.iter_mut() {
            for (i, v) in row.iter_mut().enumerate() {
                *v = i as u8;
            }
        }
        cm
    }

    #[inline(always)]
    pub fn row(&self, light: usize) -> &[u8; 256] {
        &self.base[light.min(LIGHT_LEVELS - 1)]
    }
}

impl Index<usize> for Colormap {
    type Output = [u8; 256];
    fn index(&self, idx: usize) -> &Self::Output {
        &self.base[idx]
    }
}
impl IndexMut<usize> for Colormap {
    fn index_mut(&mut self, idx: usize) -> &mut [u8; 256] {
        &mut self.base[idx]
    }
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about asset files; that’s the loader’s job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Rasterizer lookup: unknown ids fall back to the checkerboard.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the pixel buffer
    ///   does not match `w × h` (`BadSize`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.w == 0 || tex.h == 0 || tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::BadSize(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", Texture::solid("RED", 2, 2, 0x00)).unwrap();
        let blue = bank.insert("BLUE", Texture::solid("BLUE", 2, 2, 0xFF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id_or_missing("NOPE"), NO_TEXTURE);

        assert_eq!(bank.texture(red).unwrap().pixels[0], 0x00);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF);
    }

    #[test]
    fn duplicate_and_bad_size_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", Texture::solid("WOOD", 1, 1, 1)).unwrap();
        let err = bank.insert("WOOD", Texture::solid("WOOD", 1, 1, 2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));

        let mut broken = Texture::solid("HOLE", 4, 4, 3);
        broken.pixels.pop();
        assert_eq!(
            bank.insert("HOLE", broken).unwrap_err(),
            TextureError::BadSize("HOLE".into())
        );
        // checker + first WOOD
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn missing_id_falls_back_to_checker() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn texel_wraps_negative_coords() {
        let tex = Texture::default();
        assert_eq!(tex.texel(0, 0), tex.texel(8, -8));
        assert_ne!(tex.texel(-1, 0), tex.texel(0, 0));
    }

    #[test]
    fn identity_colormap_is_identity() {
        let cm = Colormap::identity();
        assert_eq!(cm.row(0)[200], 200);
        assert_eq!(cm.row(99)[7], 7);
        assert_eq!(cm[31][255], 255);
    }
}
