//! JSON preset files holding a bin configuration.

pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;

pub use errors::{LoadError, SaveError};
pub use load::{load_preset, Preset};
pub use metadata::PresetMetadata;
pub use save::{save_preset, FORMAT_ID, FORMAT_VERSION};
