//! Whole-stack conversion for stackshift
//!
//! Sits on top of detection, parsing and emission:
//!
//! - [`TechStackConverter`] converts a project between tech stacks through
//!   the line-oriented parser.
//! - [`JobRunner`] executes a [`ConversionJob`] in discrete stages, publishing
//!   a [`JobEvent`] per stage and honouring cancellation between stages.
//! - [`archive`] turns uploaded zips into project files and converted files
//!   back into a zip.

pub mod archive;
pub mod converter;
pub mod error;
pub mod jobs;
pub mod mapping;
pub mod stack;
pub mod store;

pub use archive::{read_project_archive, write_converted_archive};
pub use converter::TechStackConverter;
pub use error::{ConversionError, Result};
pub use jobs::{
    transpile_options, ConversionJob, ConversionLayer, JobEvent, JobEventBus, JobRunner, JobStage, JobStatus,
    ProjectRecord, ProjectStatus,
};
pub use mapping::{component_to_uir, parse_literal};
pub use stack::{LineMapping, TechStack, TechStackConversionRequest, TechStackConversionResult};
pub use store::{ConversionStore, InMemoryStore};
