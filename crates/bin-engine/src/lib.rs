//! Parametric Gridfinity bins.
//!
//! A bin is built in stages against any [`modeling_ops::KernelBundle`]:
//! stepped feet with optional magnet sockets, the walls and cavity, a flat
//! cap or stacking lip, then the finger slide and label. [`generate`] runs
//! them in order and returns the finished solid with the stage log.

pub mod base;
pub mod body;
pub mod builder;
pub mod config;
pub mod dims;
pub mod error;
pub mod finger_slide;
pub mod label;
pub mod pipeline;
pub mod stages;
pub mod top;

pub use base::BaseHandle;
pub use body::BodyHandle;
pub use builder::BinBuilder;
pub use config::*;
pub use error::BuildError;
pub use pipeline::{bin_name, generate, GeneratedBin};
pub use stages::{Stage, StageId, StageKind, StageLog};
pub use top::TopHandle;
