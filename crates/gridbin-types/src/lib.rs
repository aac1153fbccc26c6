pub mod curve;
pub mod orientation;
pub mod plane;
pub mod topo;
pub mod vec3;

pub use curve::*;
pub use orientation::*;
pub use plane::*;
pub use topo::*;
pub use vec3::Vec3;
