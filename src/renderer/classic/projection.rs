use crate::fixed::Fixed16;

/// Resolution-dependent constants and lookup tables.
///
/// Rebuilt only by [`Projection::rebuild`]; read-only while a frame is drawn.
#[derive(Clone, Debug, Default)]
pub struct Projection {
    pub width: usize,
    pub height: usize,

    pub half_width: Fixed16,
    /// Unpitched horizon; the camera adds its pitch offset per frame.
    pub half_height: Fixed16,
    pub focal_length: Fixed16,
    /// Vertical focal length, corrected for non-16:10 screens.
    pub focal_len_aspect: Fixed16,

    pub screen_x_mid: i32,
    pub min_screen_x: i32,
    pub max_screen_x: i32,
    pub min_screen_y: i32,
    pub max_screen_y: i32,

    /// Lateral view-space distance covered by one column at unit depth.
    pub column_step: Fixed16,

    /// `half_width / (x - mid)`, with `half_width` at the centre column.
    pub y_over_x: Vec<Fixed16>,
    /// `(x - mid) / half_width`, zero at the centre column.
    pub x_over_y: Vec<Fixed16>,
    /// `1 / (i - height - half_height)` for `i` in `0 .. 3 * height`.
    pub rcp_y_minus_half_height: Vec<Fixed16>,

    /// Bumped on every rebuild.
    pub generation: u64,
}

impl Projection {
    pub fn new(width: usize, height: usize) -> Self {
        let mut p = Projection::default();
        p.rebuild(width, height);
        p
    }

    #[inline]
    pub fn matches(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }

    /// Recompute every table for `width × height`.
    ///
    /// # Panics
    /// On a zero dimension.
    pub fn rebuild(&mut self, width: usize, height: usize) {
        assert!(width > 0 && height > 0, "resolution must be non-zero, got {width}x{height}");

        let (w, h) = (width as i32, height as i32);
        let half_w = w >> 1;
        let half_h = h >> 1;

        self.width = width;
        self.height = height;
        self.half_width = Fixed16::from_int(half_w);
        self.half_height = Fixed16::from_int(half_h);
        self.focal_length = self.half_width;
        // Legacy content was authored for 320x200; other aspect ratios keep
        // the vertical field of view of that mode.
        self.focal_len_aspect = if w * 10 / h == 16 {
            self.half_width
        } else {
            Fixed16::from_int(half_h * 8 / 5)
        };

        self.screen_x_mid = half_w;
        self.min_screen_x = 0;
        self.max_screen_x = w - 1;
        self.min_screen_y = 1;
        self.max_screen_y = h - 1;
        self.column_step = self.focal_length.recip();

        self.y_over_x.clear();
        self.x_over_y.clear();
        self.y_over_x.reserve(width);
        self.x_over_y.reserve(width);
        for x in 0..w {
            let off = x - half_w;
            if off == 0 {
                self.y_over_x.push(self.half_width);
                self.x_over_y.push(Fixed16::ZERO);
            } else {
                self.y_over_x.push(self.half_width / Fixed16::from_int(off));
                self.x_over_y.push(Fixed16::from_int(off) / self.half_width);
            }
        }

        self.rcp_y_minus_half_height.clear();
        self.rcp_y_minus_half_height.extend((0..3 * h).map(|i| {
            let d = i - h - half_h;
            if d == 0 {
                Fixed16::ONE
            } else {
                Fixed16(Fixed16::ONE.0 / d)
            }
        }));

        self.generation += 1;
    }

    /// `1 / (y - horizon)` for screen row `y` when the pitched frame is
    /// `height_in_pixels` tall.
    #[inline(always)]
    pub fn row_reciprocal(&self, y: i32, height_in_pixels: i32) -> Fixed16 {
        let idx = y + 2 * self.height as i32 - height_in_pixels;
        let last = self.rcp_y_minus_half_height.len() as i32 - 1;
        self.rcp_y_minus_half_height[idx.clamp(0, last) as usize]
    }

    /// Screen row at infinite distance.
    #[inline(always)]
    pub fn horizon_row(&self, height_in_pixels: i32) -> i32 {
        height_in_pixels - self.height as i32 + self.half_height.floor()
    }
}
