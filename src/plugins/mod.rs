pub mod plugin;
pub mod registry;
pub mod types;

pub use plugin::{ActionSpec, InputSpec, Metadata, OutputSpec, Params, Plugin};
