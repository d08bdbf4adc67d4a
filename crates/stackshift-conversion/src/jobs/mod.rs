//! Conversion jobs: records, progress events and the staged runner

pub mod events;
pub mod model;
pub mod runner;

pub use events::{JobEvent, JobEventBus};
pub use model::{ConversionJob, ConversionLayer, JobStage, JobStatus, ProjectRecord, ProjectStatus};
pub use runner::{transpile_options, JobRunner};
