//! Gridfinity dimension table, in millimetres.

use crate::config::LipShape;

/// Grid pitch.
pub const UNIT_SIZE: f64 = 42.0;
pub const UNIT_HEIGHT: f64 = 7.0;
/// Gap left on each side of a unit so neighbouring bins fit.
pub const UNIT_SEPARATOR: f64 = 0.25;

pub const LAYER1_HEIGHT: f64 = 0.8;
pub const LAYER2_HEIGHT: f64 = 1.8;
pub const LAYER3_HEIGHT: f64 = 2.15;
pub const LAYER4_HEIGHT: f64 = 2.25;
pub const BASE_HEIGHT: f64 = LAYER1_HEIGHT + LAYER2_HEIGHT + LAYER3_HEIGHT + LAYER4_HEIGHT;

pub const BASE_FILLET: f64 = 0.8;
/// Degrees.
pub const BASE_DRAFT_ANGLE: f64 = 45.0;
/// Side of the square the first base layer is drawn from. The two 45° layers
/// widen it to the unit size minus the separators.
pub const BOTTOM_SIZE: f64 = UNIT_SIZE - 2.0 * (LAYER1_HEIGHT + LAYER3_HEIGHT + UNIT_SEPARATOR);
/// Coordinate of the outer wall relative to the first base layer sketch.
pub const WALL_OFFSET: f64 = -(LAYER1_HEIGHT + LAYER3_HEIGHT);
/// Distance from the base edge to a magnet centre.
pub const MAGNET_CLEARANCE: f64 = 4.8;

pub const BODY_FILLET: f64 = 3.75;
pub const BODY_INTERNAL_FILLET: f64 = 2.55;

pub const TOP_HEIGHT: f64 = 4.4;
pub const LIP_WIDTH: f64 = 2.6;
pub const LIP_HEIGHT: f64 = 5.8;
pub const ROUNDED_LIP_FILLET: f64 = 0.5;

/// Lip cross-section as (height above the body top, inset from the outer
/// wall). The first point is repeated to close the outline.
const SHARP_LIP: [(f64, f64); 6] = [
    (-2.6, 0.0),
    (4.4, 0.0),
    (2.5, 1.9),
    (0.7, 1.9),
    (0.0, 2.6),
    (-2.6, 0.0),
];

const ROUNDED_LIP: [(f64, f64); 8] = [
    (-2.6, 0.0),
    (4.4, 0.0),
    (4.4, 0.55),
    (3.05, 1.9),
    (1.25, 1.9),
    (0.55, 2.6),
    (0.0, 2.6),
    (-2.6, 0.0),
];

pub fn lip_profile(shape: LipShape) -> &'static [(f64, f64)] {
    match shape {
        LipShape::Sharp => &SHARP_LIP,
        LipShape::Rounded => &ROUNDED_LIP,
    }
}

/// Outer size of `units` grid cells along one axis.
pub fn footprint(units: u32) -> f64 {
    UNIT_SIZE * f64::from(units) - 2.0 * UNIT_SEPARATOR
}

/// Height of the body between the base and the top.
pub fn body_height(height_units: u32) -> f64 {
    UNIT_HEIGHT * f64::from(height_units.saturating_sub(1))
}

/// Total height of a bin with a flat top or a lip.
pub fn bin_height(height_units: u32) -> f64 {
    BASE_HEIGHT + body_height(height_units) + TOP_HEIGHT
}
