//! Persistence seam for projects, jobs and produced archives

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::jobs::{ConversionJob, ProjectRecord};

/// Read/write target for conversion state.
///
/// Implementations store clones; callers never hold references into the store.
#[async_trait]
pub trait ConversionStore: Send + Sync {
    /// Insert or replace a project
    async fn save_project(&self, project: &ProjectRecord) -> Result<()>;

    async fn find_project(&self, id: &str) -> Result<Option<ProjectRecord>>;

    /// Remove a project and its jobs; `false` when it did not exist
    async fn delete_project(&self, id: &str) -> Result<bool>;

    /// Insert or replace a job
    async fn save_job(&self, job: &ConversionJob) -> Result<()>;

    async fn find_job(&self, id: &str) -> Result<Option<ConversionJob>>;

    /// Jobs of one project, oldest first
    async fn jobs_for_project(&self, project_id: &str) -> Result<Vec<ConversionJob>>;

    /// Keep the zip produced by a job
    async fn save_archive(&self, job_id: &str, bytes: Vec<u8>) -> Result<()>;

    async fn find_archive(&self, job_id: &str) -> Result<Option<Vec<u8>>>;
}
