//! Conversion job and project records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stackshift_detect::{ProjectFile, TechStackAnalysis};
use stackshift_generation::{ConversionResult, ConvertedFile, TranspileOptions};
use uuid::Uuid;

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled)
    }
}

/// Pipeline stage a job is in. Stages run strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStage {
    Queued,
    Detecting,
    Parsing,
    Emitting,
    Packaging,
    Done,
}

impl JobStage {
    /// Stages that do work, in order
    pub const WORK: [JobStage; 4] = [
        JobStage::Detecting,
        JobStage::Parsing,
        JobStage::Emitting,
        JobStage::Packaging,
    ];

    /// Number of stage transitions from `Queued` to `Done`
    pub const TRANSITIONS: u8 = 5;

    /// Stages completed by the time a job enters this one
    pub fn completed(&self) -> u8 {
        match self {
            JobStage::Queued | JobStage::Detecting => 0,
            JobStage::Parsing => 1,
            JobStage::Emitting => 2,
            JobStage::Packaging => 3,
            JobStage::Done => Self::TRANSITIONS,
        }
    }

    /// Percentage reported while in this stage
    pub fn progress(&self) -> u8 {
        (u16::from(self.completed()) * 100 / u16::from(Self::TRANSITIONS)) as u8
    }
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobStage::Queued => "queued",
            JobStage::Detecting => "detecting",
            JobStage::Parsing => "parsing",
            JobStage::Emitting => "emitting",
            JobStage::Packaging => "packaging",
            JobStage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Which part of the project a job converts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionLayer {
    /// UI components only
    #[default]
    Frontend,
    /// Services, routes and models; reported, not translated
    Backend,
    /// Both of the above
    Full,
}

impl ConversionLayer {
    pub fn includes_frontend(&self) -> bool {
        matches!(self, ConversionLayer::Frontend | ConversionLayer::Full)
    }

    pub fn includes_backend(&self) -> bool {
        matches!(self, ConversionLayer::Backend | ConversionLayer::Full)
    }
}

/// A single conversion run against a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionJob {
    pub id: String,
    pub project_id: String,
    /// Empty means "use the first detected framework"
    pub from_framework: String,
    pub to_framework: String,
    pub layer: ConversionLayer,
    pub options: TranspileOptions,
    pub status: JobStatus,
    pub stage: JobStage,
    /// 0 to 100
    pub progress: u8,
    pub result: Option<ConversionResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversionJob {
    pub fn new(
        project_id: impl Into<String>,
        from_framework: impl Into<String>,
        to_framework: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            from_framework: from_framework.into(),
            to_framework: to_framework.into(),
            layer: ConversionLayer::default(),
            options: TranspileOptions::default(),
            status: JobStatus::Pending,
            stage: JobStage::Queued,
            progress: 0,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_layer(mut self, layer: ConversionLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_options(mut self, options: TranspileOptions) -> Self {
        self.options = options;
        self
    }

    /// Move to `stage`, updating progress to match
    pub fn enter(&mut self, stage: JobStage) {
        self.stage = stage;
        self.progress = stage.progress();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Uploaded,
    Analyzing,
    Converting,
    Completed,
    Failed,
}

/// An uploaded project and what has been derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub files: Vec<ProjectFile>,
    pub original_tech_stack: Option<TechStackAnalysis>,
    pub converted_files: Vec<ConvertedFile>,
    pub status: ProjectStatus,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, files: Vec<ProjectFile>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            files,
            original_tech_stack: None,
            converted_files: Vec::new(),
            status: ProjectStatus::Uploaded,
            progress: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
