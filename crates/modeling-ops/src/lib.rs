pub mod boolean;
pub mod chamfer;
pub mod diff;
pub mod draft;
pub mod extrude;
pub mod fillet;
pub mod kernel_ext;
pub mod lifecycle;
pub mod pattern;
pub mod query;
pub mod sketch;
pub mod sweep;
pub mod types;

pub use boolean::{merge_parts, subtract_parts};
pub use chamfer::execute_chamfer;
pub use diff::{snapshot, DiffResult, TopoSnapshot};
pub use draft::execute_draft;
pub use extrude::{execute_extrude, wall_extrude, WallExtrude, WallExtrusion};
pub use fillet::execute_fillet;
pub use kernel_ext::KernelBundle;
pub use lifecycle::{center_part, remove_bodies, remove_sketches, rename_part};
pub use pattern::execute_linear_pattern;
pub use query::*;
pub use sketch::create_profile;
pub use sweep::execute_sweep;
pub use types::*;
