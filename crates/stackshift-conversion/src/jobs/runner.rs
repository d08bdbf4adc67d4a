//! Staged execution of conversion jobs

use std::sync::Arc;

use dashmap::DashMap;
use stackshift_config::{ConfigManager, OutputConfig, ParsingMode, StackshiftConfig};
use stackshift_detect::{DetectionTables, LanguageDetector, ProjectFile};
use stackshift_generation::{TranspileOptions, Transpiler};
use stackshift_parsers::{DiagnosticSeverity, LineParser, UIRNode};
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::events::{JobEvent, JobEventBus};
use super::model::{ConversionJob, JobStage, JobStatus, ProjectRecord, ProjectStatus};
use crate::archive::write_converted_archive;
use crate::converter::unconverted_warnings;
use crate::error::{ConversionError, Result};
use crate::mapping::component_to_uir;
use crate::store::ConversionStore;

/// Emission options taken from the `output` config section
pub fn transpile_options(output: &OutputConfig) -> TranspileOptions {
    TranspileOptions {
        project_name: output.project_name.clone(),
        package_id: output.package_id.clone(),
        include_source_comments: output.include_source_comments,
        readme_timestamp: output.readme_timestamp,
    }
}

/// Runs conversion jobs stage by stage.
///
/// Runs against the same project are serialised; runs against different
/// projects proceed independently. Clones share the store, the event bus,
/// the project locks and the cancellation tokens.
#[derive(Clone)]
pub struct JobRunner {
    store: Arc<dyn ConversionStore>,
    detector: Arc<LanguageDetector>,
    transpiler: Transpiler,
    line_parser: LineParser,
    mode: ParsingMode,
    default_options: TranspileOptions,
    bus: JobEventBus,
    project_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    cancellations: Arc<DashMap<String, CancellationToken>>,
}

impl std::fmt::Debug for JobRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("mode", &self.mode)
            .field("default_options", &self.default_options)
            .field("active_projects", &self.project_locks.len())
            .finish()
    }
}

impl JobRunner {
    /// Runner with the built-in detection tables and the AST parser
    pub fn new(store: Arc<dyn ConversionStore>) -> Result<Self> {
        Self::with_tables(store, DetectionTables::builtin())
    }

    pub fn with_tables(store: Arc<dyn ConversionStore>, tables: DetectionTables) -> Result<Self> {
        Ok(Self {
            store,
            detector: Arc::new(LanguageDetector::new(tables)?),
            transpiler: Transpiler::new()?,
            line_parser: LineParser::new(),
            mode: ParsingMode::default(),
            default_options: TranspileOptions::default(),
            bus: JobEventBus::new(),
            project_locks: Arc::new(DashMap::new()),
            cancellations: Arc::new(DashMap::new()),
        })
    }

    /// Runner wired from loaded configuration
    pub fn from_config(
        store: Arc<dyn ConversionStore>,
        manager: &ConfigManager,
        config: &StackshiftConfig,
    ) -> Result<Self> {
        let tables = manager.detection_tables(config)?;
        Ok(Self::with_tables(store, tables)?
            .with_parsing_mode(config.parsing.mode)
            .with_default_options(transpile_options(&config.output)))
    }

    pub fn with_parsing_mode(mut self, mode: ParsingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_default_options(mut self, options: TranspileOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn parsing_mode(&self) -> ParsingMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<dyn ConversionStore> {
        &self.store
    }

    pub fn events(&self) -> &JobEventBus {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.bus.subscribe()
    }

    /// A pending job carrying this runner's default options
    pub fn new_job(
        &self,
        project_id: impl Into<String>,
        from_framework: impl Into<String>,
        to_framework: impl Into<String>,
    ) -> ConversionJob {
        ConversionJob::new(project_id, from_framework, to_framework).with_options(self.default_options.clone())
    }

    /// Request cancellation. Takes effect at the next stage boundary, and
    /// also applies to a job that has not started yet. Returns `false` when
    /// the job has already finished.
    pub async fn cancel(&self, job_id: &str) -> Result<bool> {
        if let Some(job) = self.store.find_job(job_id).await? {
            if job.status.is_terminal() {
                debug!(job_id = %job_id, status = ?job.status, "Job already finished; nothing to cancel");
                return Ok(false);
            }
        }
        info!(job_id = %job_id, "Cancellation requested");
        self.token(job_id).cancel();
        Ok(true)
    }

    /// Drop a pending cancellation for a job that will never be run
    pub fn forget(&self, job_id: &str) {
        self.cancellations.remove(job_id);
    }

    /// Projects with a run in flight or waiting for the project lock
    pub fn active_projects(&self) -> usize {
        self.project_locks.len()
    }

    /// Cancellation tokens held for jobs that have not finished
    pub fn pending_cancellations(&self) -> usize {
        self.cancellations.len()
    }

    fn token(&self, job_id: &str) -> CancellationToken {
        self.cancellations.entry(job_id.to_string()).or_default().clone()
    }

    fn project_lock(&self, project_id: &str) -> Arc<Mutex<()>> {
        self.project_locks.entry(project_id.to_string()).or_default().clone()
    }

    /// Run a job to completion, failure or cancellation.
    ///
    /// The returned job is in a terminal state and has been saved. Pipeline
    /// errors are recorded on the job rather than returned; only store
    /// failures come back as `Err`.
    pub async fn run(&self, job: ConversionJob, files: Vec<ProjectFile>) -> Result<ConversionJob> {
        let job_id = job.id.clone();
        let project_id = job.project_id.clone();
        let lock = self.project_lock(&project_id);
        let outcome = {
            let _guard = lock.lock().await;
            self.run_locked(job, files).await
        };

        self.cancellations.remove(&job_id);
        drop(lock);
        // Only the map holds the lock once no other run is waiting on it
        self.project_locks
            .remove_if(&project_id, |_, lock| Arc::strong_count(lock) == 1);
        outcome
    }

    async fn run_locked(&self, mut job: ConversionJob, files: Vec<ProjectFile>) -> Result<ConversionJob> {
        let token = self.token(&job.id);

        let mut project = match self.store.find_project(&job.project_id).await? {
            Some(project) => project,
            None => ProjectRecord::new(&job.project_id, &job.project_id, Vec::new()),
        };
        project.files = files;
        job.status = JobStatus::Processing;
        job.error = None;

        let outcome = self.execute(&mut job, &mut project, &token).await;

        match outcome {
            Ok(()) => {
                job.status = JobStatus::Completed;
                job.enter(JobStage::Done);
                project.status = ProjectStatus::Completed;
                project.progress = job.progress;
                info!(job_id = %job.id, stage = %job.stage, "Job completed");
            }
            Err(ConversionError::Cancelled(_)) => {
                job.status = JobStatus::Cancelled;
                job.touch();
                project.status = ProjectStatus::Uploaded;
                info!(job_id = %job.id, stage = %job.stage, "Job cancelled");
            }
            Err(e) => {
                warn!(job_id = %job.id, stage = %job.stage, error = %e, "Job failed");
                job.status = JobStatus::Failed;
                job.error = Some(e.to_string());
                job.touch();
                project.status = ProjectStatus::Failed;
            }
        }
        project.touch();
        self.store.save_project(&project).await?;
        self.store.save_job(&job).await?;
        self.bus.publish(JobEvent::snapshot(&job));
        Ok(job)
    }

    async fn execute(
        &self,
        job: &mut ConversionJob,
        project: &mut ProjectRecord,
        token: &CancellationToken,
    ) -> Result<()> {
        project.status = ProjectStatus::Analyzing;
        self.advance(job, project, JobStage::Detecting, token).await?;
        let analysis = self.detector.analyze_project(&project.files);
        if job.from_framework.trim().is_empty() {
            job.from_framework = analysis
                .frameworks
                .first()
                .cloned()
                .ok_or_else(|| ConversionError::UnknownSourceFramework(job.project_id.clone()))?;
            debug!(job_id = %job.id, from = %job.from_framework, "Using detected source framework");
        }
        project.original_tech_stack = Some(analysis);

        project.status = ProjectStatus::Converting;
        self.advance(job, project, JobStage::Parsing, token).await?;
        let (nodes, mut warnings) = self.parse(job, &project.files);

        self.advance(job, project, JobStage::Emitting, token).await?;
        let mut result = self
            .transpiler
            .emit_project(&nodes, &job.from_framework, &job.to_framework, &job.options);
        warnings.append(&mut result.warnings);
        result.warnings = warnings;

        self.advance(job, project, JobStage::Packaging, token).await?;
        let archive = write_converted_archive(&result.files)?;
        self.store.save_archive(&job.id, archive).await?;
        project.converted_files = result.files.clone();
        job.result = Some(result);
        Ok(())
    }

    /// Stage boundary: honour cancellation, then record and announce the stage
    async fn advance(
        &self,
        job: &mut ConversionJob,
        project: &mut ProjectRecord,
        stage: JobStage,
        token: &CancellationToken,
    ) -> Result<()> {
        tokio::task::yield_now().await;
        if token.is_cancelled() {
            return Err(ConversionError::Cancelled(job.id.clone()));
        }
        job.enter(stage);
        project.progress = job.progress;
        project.touch();
        info!(job_id = %job.id, stage = %stage, progress = job.progress, "Job stage");
        self.store.save_job(job).await?;
        self.store.save_project(project).await?;
        self.bus.publish(JobEvent::snapshot(job));
        Ok(())
    }

    /// UIR nodes for the job's layer plus the warnings gathered on the way
    fn parse(&self, job: &ConversionJob, files: &[ProjectFile]) -> (Vec<UIRNode>, Vec<String>) {
        let from = job.from_framework.as_str();
        let mut nodes = Vec::new();
        let mut warnings = Vec::new();

        let structure = (self.mode == ParsingMode::Heuristic || job.layer.includes_backend()).then(|| {
            let (structure, diagnostics) = self.line_parser.parse_project(files, from).into_parts();
            warnings.extend(
                diagnostics
                    .iter()
                    .filter(|d| d.severity >= DiagnosticSeverity::Warning)
                    .map(ToString::to_string),
            );
            structure
        });

        if job.layer.includes_frontend() {
            match (self.mode, &structure) {
                (ParsingMode::Heuristic, Some(structure)) => {
                    nodes = structure
                        .ui
                        .components
                        .iter()
                        .map(|component| component_to_uir(component, from))
                        .collect();
                }
                _ => {
                    let (parsed, parse_warnings) = self.transpiler.parse_project(files, from);
                    nodes = parsed;
                    warnings.extend(parse_warnings);
                }
            }
        }
        if job.layer.includes_backend() {
            if let Some(structure) = &structure {
                warnings.extend(unconverted_warnings(structure));
            }
        }

        debug!(job_id = %job.id, mode = %self.mode, nodes = nodes.len(), "Parsed project");
        (nodes, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn runner() -> JobRunner {
        JobRunner::new(Arc::new(InMemoryStore::new())).unwrap()
    }

    fn app_files() -> Vec<ProjectFile> {
        vec![ProjectFile::new(
            "src/App.jsx",
            "import React from 'react';\n\nconst App = () => {\n  return <div>Hi</div>;\n};\n\nexport default App;\n",
        )]
    }

    #[tokio::test]
    async fn test_run_completes_with_archive() {
        let runner = runner();
        let job = runner.new_job("p1", "react", "typescript");
        let job = runner.run(job, app_files()).await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.stage, JobStage::Done);
        assert_eq!(job.progress, 100);
        let result = job.result.as_ref().unwrap();
        assert!(result.file("src/components/App.tsx").is_some());

        let archive = runner.store().find_archive(&job.id).await.unwrap().unwrap();
        assert!(!archive.is_empty());

        let project = runner.store().find_project("p1").await.unwrap().unwrap();
        assert_eq!(project.status, ProjectStatus::Completed);
        assert_eq!(project.progress, 100);
        assert_eq!(project.converted_files.len(), result.files.len());
        assert!(project.original_tech_stack.is_some());
    }

    #[tokio::test]
    async fn test_events_follow_stage_order() {
        let runner = runner();
        let mut events = runner.subscribe();
        let job = runner.run(runner.new_job("p1", "react", "vue"), app_files()).await.unwrap();

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            assert_eq!(event.job_id, job.id);
            seen.push((event.stage, event.progress, event.status));
        }
        assert_eq!(
            seen,
            vec![
                (JobStage::Detecting, 0, JobStatus::Processing),
                (JobStage::Parsing, 20, JobStatus::Processing),
                (JobStage::Emitting, 40, JobStatus::Processing),
                (JobStage::Packaging, 60, JobStatus::Processing),
                (JobStage::Done, 100, JobStatus::Completed),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let runner = runner();
        let job = runner.new_job("p1", "react", "vue");
        assert!(runner.cancel(&job.id).await.unwrap());
        let job = runner.run(job, app_files()).await.unwrap();

        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.stage, JobStage::Queued);
        assert_eq!(job.progress, 0);
        assert!(job.result.is_none());
        assert!(runner.store().find_archive(&job.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_finished_runs_release_locks_and_tokens() {
        let runner = runner();
        let first = runner.new_job("p1", "react", "vue");
        let second = runner.new_job("p1", "react", "angular");
        let (a, b) = tokio::join!(runner.run(first, app_files()), runner.run(second, app_files()));
        let (a, _) = (a.unwrap(), b.unwrap());
        assert_eq!(runner.active_projects(), 0);
        assert_eq!(runner.pending_cancellations(), 0);

        assert!(!runner.cancel(&a.id).await.unwrap());
        assert_eq!(runner.pending_cancellations(), 0);
    }

    #[tokio::test]
    async fn test_forget_unrun_cancellation() {
        let runner = runner();
        let job = runner.new_job("p1", "react", "vue");
        assert!(runner.cancel(&job.id).await.unwrap());
        assert_eq!(runner.pending_cancellations(), 1);
        runner.forget(&job.id);
        assert_eq!(runner.pending_cancellations(), 0);
    }

    #[tokio::test]
    async fn test_undetectable_source_fails_job_and_project() {
        let runner = runner();
        let job = runner.new_job("p1", "", "flutter");
        let job = runner
            .run(job, vec![ProjectFile::new("notes.txt", "nothing to see")])
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.stage, JobStage::Detecting);
        assert!(job.error.as_deref().unwrap_or_default().contains("source framework"));
        let project = runner.store().find_project("p1").await.unwrap().unwrap();
        assert_eq!(project.status, ProjectStatus::Failed);
    }

    #[tokio::test]
    async fn test_detected_source_framework_is_recorded() {
        let runner = runner();
        let job = runner.new_job("p1", "", "typescript");
        let job = runner.run(job, app_files()).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.from_framework, "react");
    }

    #[tokio::test]
    async fn test_heuristic_mode_uses_line_parser() {
        let runner = runner().with_parsing_mode(ParsingMode::Heuristic);
        let files = vec![ProjectFile::new(
            "src/components/Counter.jsx",
            "const Counter = () => {\n  const [count, setCount] = useState(0);\n  return <div>{count}</div>;\n};\n",
        )];
        let job = runner.run(runner.new_job("p1", "react", "flutter"), files).await.unwrap();
        let result = job.result.unwrap();
        let widget = result.file("lib/widgets/counter_widget.dart").unwrap();
        assert!(widget.content.contains("int count = 0;"));
    }

    #[tokio::test]
    async fn test_backend_layer_reports_routes() {
        let runner = runner();
        let files = vec![ProjectFile::new(
            "server.js",
            "const express = require('express');\nconst app = express();\napp.post('/login', login);\napp.listen(3000);\n",
        )];
        let job = runner
            .new_job("p1", "express", "typescript")
            .with_layer(crate::jobs::ConversionLayer::Backend);
        let job = runner.run(job, files).await.unwrap();
        let result = job.result.unwrap();
        assert!(result.warnings.iter().any(|w| w == "1 routes were not converted"));
        assert!(result.files.iter().all(|f| f.original_path.is_empty()));
    }

    #[test]
    fn test_transpile_options_from_config() {
        let mut output = OutputConfig::default();
        output.project_name = "ported".to_string();
        output.readme_timestamp = false;
        let options = transpile_options(&output);
        assert_eq!(options.project_name, "ported");
        assert!(!options.readme_timestamp);
        assert_eq!(options.package_id, "com.example.app");
    }
}
