//! In-memory conversion store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::ConversionStore;
use crate::error::Result;
use crate::jobs::{ConversionJob, ProjectRecord};

/// Thread-safe in-memory [`ConversionStore`].
///
/// Concurrent reads, exclusive writes; everything is cloned in and out.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    projects: RwLock<HashMap<String, ProjectRecord>>,
    jobs: RwLock<HashMap<String, ConversionJob>>,
    archives: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial projects (useful for testing)
    pub fn with_projects(projects: Vec<ProjectRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.projects.write();
            for project in projects {
                map.insert(project.id.clone(), project);
            }
        }
        store
    }

    pub fn project_count(&self) -> usize {
        self.projects.read().len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.read().len()
    }
}

#[async_trait]
impl ConversionStore for InMemoryStore {
    async fn save_project(&self, project: &ProjectRecord) -> Result<()> {
        self.projects.write().insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn find_project(&self, id: &str) -> Result<Option<ProjectRecord>> {
        Ok(self.projects.read().get(id).cloned())
    }

    async fn delete_project(&self, id: &str) -> Result<bool> {
        let removed = self.projects.write().remove(id).is_some();
        if removed {
            let mut jobs = self.jobs.write();
            let job_ids: Vec<String> = jobs
                .values()
                .filter(|job| job.project_id == id)
                .map(|job| job.id.clone())
                .collect();
            let mut archives = self.archives.write();
            for job_id in job_ids {
                jobs.remove(&job_id);
                archives.remove(&job_id);
            }
        }
        Ok(removed)
    }

    async fn save_job(&self, job: &ConversionJob) -> Result<()> {
        self.jobs.write().insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn find_job(&self, id: &str) -> Result<Option<ConversionJob>> {
        Ok(self.jobs.read().get(id).cloned())
    }

    async fn jobs_for_project(&self, project_id: &str) -> Result<Vec<ConversionJob>> {
        let mut jobs: Vec<ConversionJob> = self
            .jobs
            .read()
            .values()
            .filter(|job| job.project_id == project_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(jobs)
    }

    async fn save_archive(&self, job_id: &str, bytes: Vec<u8>) -> Result<()> {
        self.archives.write().insert(job_id.to_string(), bytes);
        Ok(())
    }

    async fn find_archive(&self, job_id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.archives.read().get(job_id).cloned())
    }
}
