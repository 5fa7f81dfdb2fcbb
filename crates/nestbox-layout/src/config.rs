//! Engine configuration.
//!
//! [`LayoutConfig`] is the explicit configuration value every layout
//! operation receives. It can be deserialized from a document's settings
//! (all fields default), overridden from the environment, and validated
//! before an engine is built from it.

use std::fmt;

use nestbox_core::geometry::{Sides, Size};
use serde::{Deserialize, Serialize};

/// Environment variable selecting the packing strategy (`grid` or `flow`).
const ENV_LAYOUT_ALGORITHM: &str = "NESTBOX_LAYOUT_ALGORITHM";
/// Environment variable overriding pixels per grid unit.
const ENV_GRID_SIZE: &str = "NESTBOX_GRID_SIZE";
/// Environment variable overriding the side/bottom margin.
const ENV_MARGIN: &str = "NESTBOX_MARGIN";
/// Environment variable overriding the label (top) margin.
const ENV_LABEL_MARGIN: &str = "NESTBOX_LABEL_MARGIN";

/// Seed used by the free-space packer's randomized fallback unless configured.
pub const DEFAULT_FREE_SPACE_SEED: u64 = 0x6e65_7374_626f_7821;

/// Identifier of a packing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithmType {
    /// Track grid: columns as wide as their widest child, rows as tall as their tallest.
    #[default]
    Grid,
    /// Shelf packing that wraps at the parent's interior edge.
    Flow,
}

impl LayoutAlgorithmType {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(Self::Grid),
            "flow" | "mixed-flow" | "mixed_flow" => Some(Self::Flow),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Flow => "flow",
        }
    }
}

impl fmt::Display for LayoutAlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spacing around and between children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Left/right/bottom inset of a parent's interior, and the gap between siblings.
    pub margin: i32,
    /// Top inset of a parent's interior (room for the parent's label).
    pub label_margin: i32,
}

impl Margins {
    /// Interior insets of a parent.
    #[must_use]
    pub const fn insets(&self) -> Sides {
        Sides::new(self.label_margin, self.margin, self.margin, self.margin)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            margin: 1,
            label_margin: 2,
        }
    }
}

/// Leaf width/height pinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedDimensions {
    pub leaf_fixed_width: bool,
    pub leaf_fixed_height: bool,
    pub leaf_width: i32,
    pub leaf_height: i32,
}

impl FixedDimensions {
    /// Pin both axes to `width` x `height`.
    #[must_use]
    pub const fn both(width: i32, height: i32) -> Self {
        Self {
            leaf_fixed_width: true,
            leaf_fixed_height: true,
            leaf_width: width,
            leaf_height: height,
        }
    }
}

impl Default for FixedDimensions {
    fn default() -> Self {
        Self {
            leaf_fixed_width: false,
            leaf_fixed_height: false,
            leaf_width: 4,
            leaf_height: 3,
        }
    }
}

/// Global minimum node size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    pub min_width: i32,
    pub min_height: i32,
}

impl SizeLimits {
    /// Clamp `size` up to the minimums.
    #[must_use]
    pub fn clamp(&self, size: Size) -> Size {
        Size::new(
            size.width.max(self.min_width),
            size.height.max(self.min_height),
        )
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: 1,
            min_height: 1,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pixels per grid unit; converts pointer deltas into grid units.
    pub grid_size: u32,
    pub margins: Margins,
    pub fixed_dimensions: FixedDimensions,
    pub limits: SizeLimits,
    /// Size given to new nodes when no fixed dimension applies.
    pub default_node_size: Size,
    /// Active packing strategy.
    pub algorithm: LayoutAlgorithmType,
    /// Seed for the free-space packer's randomized fallback.
    pub free_space_seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            margins: Margins::default(),
            fixed_dimensions: FixedDimensions::default(),
            limits: SizeLimits::default(),
            default_node_size: Size::new(4, 3),
            algorithm: LayoutAlgorithmType::default(),
            free_space_seed: DEFAULT_FREE_SPACE_SEED,
        }
    }
}

impl LayoutConfig {
    /// Defaults overridden from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through a custom environment lookup (for tests).
    ///
    /// Unparsable values are ignored with a warning.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = get_env(ENV_LAYOUT_ALGORITHM) {
            match LayoutAlgorithmType::parse(&value) {
                Some(algorithm) => config.algorithm = algorithm,
                None => ignored_override(ENV_LAYOUT_ALGORITHM, &value),
            }
        }
        if let Some(value) = get_env(ENV_GRID_SIZE) {
            match value.trim().parse::<u32>() {
                Ok(grid_size) if grid_size > 0 => config.grid_size = grid_size,
                _ => ignored_override(ENV_GRID_SIZE, &value),
            }
        }
        if let Some(value) = get_env(ENV_MARGIN) {
            match value.trim().parse::<i32>() {
                Ok(margin) if margin >= 0 => config.margins.margin = margin,
                _ => ignored_override(ENV_MARGIN, &value),
            }
        }
        if let Some(value) = get_env(ENV_LABEL_MARGIN) {
            match value.trim().parse::<i32>() {
                Ok(label_margin) if label_margin >= 0 => config.margins.label_margin = label_margin,
                _ => ignored_override(ENV_LABEL_MARGIN, &value),
            }
        }

        config
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if self.margins.margin < 0 {
            return Err(ConfigError::NegativeMargin {
                field: "margin",
                value: self.margins.margin,
            });
        }
        if self.margins.label_margin < 0 {
            return Err(ConfigError::NegativeMargin {
                field: "label_margin",
                value: self.margins.label_margin,
            });
        }
        if self.limits.min_width < 1 || self.limits.min_height < 1 {
            return Err(ConfigError::InvalidMinimum {
                min_width: self.limits.min_width,
                min_height: self.limits.min_height,
            });
        }
        let fixed = &self.fixed_dimensions;
        if fixed.leaf_width < 1 || fixed.leaf_height < 1 {
            return Err(ConfigError::InvalidFixedDimensions {
                width: fixed.leaf_width,
                height: fixed.leaf_height,
            });
        }
        if self.default_node_size.width < 1 || self.default_node_size.height < 1 {
            return Err(ConfigError::InvalidDefaultSize {
                width: self.default_node_size.width,
                height: self.default_node_size.height,
            });
        }
        Ok(())
    }

    /// Convert a pointer delta in pixels into grid units (rounded to nearest).
    #[must_use]
    pub fn pixels_to_grid(&self, pixels: f64) -> i32 {
        let scaled = (pixels / f64::from(self.grid_size.max(1))).round();
        if scaled >= f64::from(i32::MAX) {
            i32::MAX
        } else if scaled <= f64::from(i32::MIN) {
            i32::MIN
        } else {
            scaled as i32
        }
    }

    /// Size of a freshly created leaf, after pinning and minimums.
    #[must_use]
    pub fn new_leaf_size(&self) -> Size {
        let fixed = &self.fixed_dimensions;
        let mut size = self.default_node_size;
        if fixed.leaf_fixed_width {
            size.width = fixed.leaf_width;
        }
        if fixed.leaf_fixed_height {
            size.height = fixed.leaf_height;
        }
        self.limits.clamp(size)
    }
}

fn ignored_override(key: &str, value: &str) {
    tracing::warn!(key, value, "ignoring unparsable layout override");
}

/// Configuration rejected by [`LayoutConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroGridSize,
    NegativeMargin { field: &'static str, value: i32 },
    InvalidMinimum { min_width: i32, min_height: i32 },
    InvalidFixedDimensions { width: i32, height: i32 },
    InvalidDefaultSize { width: i32, height: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroGridSize => write!(f, "grid size must be greater than zero"),
            Self::NegativeMargin { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::InvalidMinimum {
                min_width,
                min_height,
            } => write!(
                f,
                "minimum node size must be at least 1x1, got {min_width}x{min_height}"
            ),
            Self::InvalidFixedDimensions { width, height } => write!(
                f,
                "fixed leaf dimensions must be at least 1x1, got {width}x{height}"
            ),
            Self::InvalidDefaultSize { width, height } => write!(
                f,
                "default node size must be at least 1x1, got {width}x{height}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
