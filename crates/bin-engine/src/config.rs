use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Legal range and default of a numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamBounds {
    pub min: f64,
    pub default: f64,
    pub max: f64,
}

impl ParamBounds {
    pub const fn new(min: f64, default: f64, max: f64) -> Self {
        Self { min, default, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    fn check(&self, field: &'static str, value: f64) -> Result<(), ConfigError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

pub const GRID_COUNT_BOUNDS: ParamBounds = ParamBounds::new(1.0, 1.0, 1e9);
/// Height in units; the body is one unit shorter than this.
pub const HEIGHT_BOUNDS: ParamBounds = ParamBounds::new(2.0, 6.0, 50.0);
pub const MAGNET_RADIUS_BOUNDS: ParamBounds = ParamBounds::new(0.5, 3.25, 4.25);
pub const MAGNET_DEPTH_BOUNDS: ParamBounds = ParamBounds::new(0.5, 2.4, 4.0);
pub const LABEL_WIDTH_BOUNDS: ParamBounds = ParamBounds::new(1.0, 13.0, 100.0);
pub const LABEL_OFFSET_BOUNDS: ParamBounds = ParamBounds::new(0.0, 0.5, 100.0);
pub const WALL_THICKNESS_BOUNDS: ParamBounds = ParamBounds::new(1.2, 1.6, 10.0);
pub const FINGER_SLIDE_HEIGHT_BOUNDS: ParamBounds = ParamBounds::new(2.0, 10.0, 15.0);

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown {field} value {value:?}")]
    UnknownVariant { field: &'static str, value: String },
}

/// Generates `FromStr`, `Display` and the string conversions serde goes
/// through, so that a bad value in a preset reports the same error as a bad
/// value from any other source.
macro_rules! config_enum {
    ($name:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim().to_ascii_uppercase().replace('-', "_");
                match key.as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ConfigError::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConfigError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.as_str().to_string()
            }
        }
    };
}

/// How a filled bin is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FillType {
    /// Solid up to the top, flat cap, no lip.
    Complete,
    /// Solid body, the stacking lip is kept.
    UntilLip,
}

config_enum!(FillType, "fill type", { Complete => "COMPLETE", UntilLip => "UNTIL_LIP" });

/// Cross-section of the stacking lip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LipShape {
    Sharp,
    Rounded,
}

config_enum!(LipShape, "lip shape", { Sharp => "SHARP", Rounded => "ROUNDED" });

/// Edge treatment of the finger slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FingerSlideType {
    Chamfer,
    Rounded,
}

config_enum!(FingerSlideType, "finger slide type", { Chamfer => "CHAMFER", Rounded => "ROUNDED" });

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnetOptions {
    pub radius: f64,
    pub depth: f64,
}

impl Default for MagnetOptions {
    fn default() -> Self {
        Self {
            radius: MAGNET_RADIUS_BOUNDS.default,
            depth: MAGNET_DEPTH_BOUNDS.default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelOptions {
    pub width: f64,
    /// Distance from the top of the bin down to the top of the label.
    pub offset: f64,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            width: LABEL_WIDTH_BOUNDS.default,
            offset: LABEL_OFFSET_BOUNDS.default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FingerSlideOptions {
    pub kind: FingerSlideType,
    pub height: f64,
}

impl Default for FingerSlideOptions {
    fn default() -> Self {
        Self {
            kind: FingerSlideType::Rounded,
            height: FINGER_SLIDE_HEIGHT_BOUNDS.default,
        }
    }
}

/// Everything a bin is generated from.
///
/// Optional features are `None` when switched off. Label and finger slide
/// only apply to hollow bins; the lip is ignored when the bin is completely
/// filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinConfig {
    pub rows: u32,
    pub columns: u32,
    pub height: u32,
    pub magnets: Option<MagnetOptions>,
    pub fill: Option<FillType>,
    pub lip: Option<LipShape>,
    pub label: Option<LabelOptions>,
    pub finger_slide: Option<FingerSlideOptions>,
    pub wall_thickness: f64,
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            height: HEIGHT_BOUNDS.default as u32,
            magnets: Some(MagnetOptions::default()),
            fill: None,
            lip: Some(LipShape::Sharp),
            label: Some(LabelOptions::default()),
            finger_slide: Some(FingerSlideOptions::default()),
            wall_thickness: WALL_THICKNESS_BOUNDS.default,
        }
    }
}

impl BinConfig {
    /// A default bin of the given grid size.
    pub fn grid(rows: u32, columns: u32) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    pub fn is_hollow(&self) -> bool {
        self.fill.is_none()
    }

    /// The lip actually built: none when the bin is completely filled.
    pub fn effective_lip(&self) -> Option<LipShape> {
        match self.fill {
            Some(FillType::Complete) => None,
            _ => self.lip,
        }
    }

    /// Check every numeric parameter against its bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        GRID_COUNT_BOUNDS.check("rows", f64::from(self.rows))?;
        GRID_COUNT_BOUNDS.check("columns", f64::from(self.columns))?;
        HEIGHT_BOUNDS.check("height", f64::from(self.height))?;
        WALL_THICKNESS_BOUNDS.check("wall thickness", self.wall_thickness)?;
        if let Some(magnets) = &self.magnets {
            MAGNET_RADIUS_BOUNDS.check("magnet radius", magnets.radius)?;
            MAGNET_DEPTH_BOUNDS.check("magnet depth", magnets.depth)?;
        }
        if let Some(label) = &self.label {
            LABEL_WIDTH_BOUNDS.check("label width", label.width)?;
            LABEL_OFFSET_BOUNDS.check("label offset", label.offset)?;
        }
        if let Some(slide) = &self.finger_slide {
            FINGER_SLIDE_HEIGHT_BOUNDS.check("finger slide height", slide.height)?;
        }
        Ok(())
    }
}
