use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vec3::Vec3;

/// Axis-aligned outward direction used to pick faces and extreme edges.
///
/// Front faces the viewer (-Y); rows grow towards Back (+Y) and columns
/// towards Right (+X).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl Orientation {
    pub fn normal(self) -> Vec3 {
        match self {
            Orientation::Top => [0.0, 0.0, 1.0],
            Orientation::Bottom => [0.0, 0.0, -1.0],
            Orientation::Left => [-1.0, 0.0, 0.0],
            Orientation::Right => [1.0, 0.0, 0.0],
            Orientation::Front => [0.0, -1.0, 0.0],
            Orientation::Back => [0.0, 1.0, 0.0],
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::Top => "top",
            Orientation::Bottom => "bottom",
            Orientation::Left => "left",
            Orientation::Right => "right",
            Orientation::Front => "front",
            Orientation::Back => "back",
        };
        f.write_str(name)
    }
}
