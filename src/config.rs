//! Renderer tunables.
//!
//! Everything the traversal caps or pre-allocates lives here so a caller can
//! size the renderer once and get a deterministic per-frame budget.

/// Hard upper bound for portal recursion; window stack slots are sized by it.
pub const MAX_ADJOIN_DEPTH: usize = 40;

/// Per-sector wall budget inherited from the legacy renderer.
pub const DEFAULT_MAX_WALL_COUNT: usize = 0xffff;

/// Global lighting mode read at camera setup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum LightMode {
    /// Everything fullbright.
    Off,
    /// Sector ambient plus camera light.
    #[default]
    Normal,
    /// Ambient pulled down by nine levels, camera light still on.
    Dark,
}

impl LightMode {
    /// Next mode in `Off -> Normal -> Dark -> Off` order.
    pub fn cycle(self) -> Self {
        match self {
            LightMode::Off => LightMode::Normal,
            LightMode::Normal => LightMode::Dark,
            LightMode::Dark => LightMode::Off,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("adjoin depth {requested} outside 1..={max}")]
    DepthOutOfRange { requested: usize, max: usize },

    #[error("arena pool `{0}` has zero capacity")]
    ZeroArena(&'static str),

    #[error("per-sector wall budget must be at least one")]
    ZeroWallBudget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererConfig {
    /// Recursion cap, the camera sector counts as depth 1.
    pub max_adjoin_depth: usize,
    /// Walls of one sector processed per visit; the rest are skipped.
    pub max_wall_count: usize,
    /// View-space vertices available per frame.
    pub arena_vertices: usize,
    /// Projected wall columns available per frame.
    pub arena_columns: usize,
    pub light_mode: LightMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_adjoin_depth: MAX_ADJOIN_DEPTH,
            max_wall_count: DEFAULT_MAX_WALL_COUNT,
            arena_vertices: 1 << 16,
            arena_columns: 1 << 18,
            light_mode: LightMode::Normal,
        }
    }
}

impl RendererConfig {
    /// Same defaults with a different recursion cap.
    pub fn with_depth(max_adjoin_depth: usize) -> Self {
        Self {
            max_adjoin_depth,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ADJOIN_DEPTH).contains(&self.max_adjoin_depth) {
            return Err(ConfigError::DepthOutOfRange {
                requested: self.max_adjoin_depth,
                max: MAX_ADJOIN_DEPTH,
            });
        }
        if self.max_wall_count == 0 {
            return Err(ConfigError::ZeroWallBudget);
        }
        if self.arena_vertices == 0 {
            return Err(ConfigError::ZeroArena("vertices"));
        }
        if self.arena_columns == 0 {
            return Err(ConfigError::ZeroArena("columns"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RendererConfig::default();
        assert_eq!(cfg.max_adjoin_depth, 40);
        assert_eq!(cfg.max_wall_count, 0xffff);
        assert_eq!(cfg.light_mode, LightMode::Normal);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn depth_bounds_checked() {
        assert_eq!(
            RendererConfig::with_depth(0).validate(),
            Err(ConfigError::DepthOutOfRange { requested: 0, max: 40 })
        );
        assert!(RendererConfig::with_depth(1).validate().is_ok());
        assert!(RendererConfig::with_depth(41).validate().is_err());
    }

    #[test]
    fn zero_pools_rejected() {
        let cfg = RendererConfig {
            arena_columns: 0,
            ..RendererConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroArena("columns")));

        let cfg = RendererConfig {
            max_wall_count: 0,
            ..RendererConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroWallBudget));
    }

    #[test]
    fn light_mode_cycles_back() {
        let m = LightMode::Off;
        assert_eq!(m.cycle().cycle().cycle(), m);
        assert_eq!(LightMode::default().cycle(), LightMode::Dark);
    }
}
