use std::io::Cursor;
use std::sync::Arc;

use stackshift_config::{ConfigManager, ParsingMode, StackshiftConfig};
use stackshift_conversion::{
    read_project_archive, ConversionStore, InMemoryStore, JobRunner, JobStage, JobStatus, ProjectRecord,
};
use stackshift_detect::ProjectFile;

fn files() -> Vec<ProjectFile> {
    vec![
        ProjectFile::new(
            "src/App.jsx",
            "import React from 'react';\n\nexport default function App() {\n  return <main>Hello</main>;\n}\n",
        ),
        ProjectFile::new(
            "src/components/Button.jsx",
            "import React from 'react';\n\nconst Button = ({ label = 'Go' }) => {\n  return <button>{label}</button>;\n};\n\nexport default Button;\n",
        ),
        ProjectFile::binary("public/logo.png", 2048),
    ]
}

#[tokio::test]
async fn test_runs_on_one_project_do_not_interleave() {
    let runner = JobRunner::new(Arc::new(InMemoryStore::new())).unwrap();
    let mut events = runner.subscribe();

    let first = runner.new_job("shared", "react", "vue");
    let second = runner.new_job("shared", "react", "angular");
    let (a, b) = tokio::join!(runner.run(first, files()), runner.run(second, files()));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.status, JobStatus::Completed);
    assert_eq!(b.status, JobStatus::Completed);

    let mut order = Vec::new();
    while let Ok(event) = events.try_recv() {
        order.push(event.job_id);
    }
    assert_eq!(order.len(), 10);
    let first_job = order[0].clone();
    assert!(order[..5].iter().all(|id| *id == first_job));
    assert!(order[5..].iter().all(|id| *id != first_job));

    let project = runner.store().find_project("shared").await.unwrap().unwrap();
    let jobs = runner.store().jobs_for_project("shared").await.unwrap();
    assert_eq!(jobs.len(), 2);
    let last = if first_job == a.id { &b } else { &a };
    assert_eq!(
        project.converted_files,
        last.result.as_ref().unwrap().files,
        "the project keeps the output of the run that finished last"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_spawned_runs_on_separate_projects() {
    let runner = JobRunner::new(Arc::new(InMemoryStore::new())).unwrap();
    let mut handles = Vec::new();
    for (project, target) in [("p1", "flutter"), ("p2", "kotlin"), ("p3", "typescript")] {
        let runner = runner.clone();
        let job = runner.new_job(project, "react", target);
        handles.push(tokio::spawn(async move { runner.run(job, files()).await }));
    }
    for handle in handles {
        let job = handle.await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
    }
    for project in ["p1", "p2", "p3"] {
        assert!(runner.store().find_project(project).await.unwrap().is_some());
    }
}

#[tokio::test]
async fn test_archive_holds_converted_files() {
    let runner = JobRunner::new(Arc::new(InMemoryStore::new())).unwrap();
    let job = runner.run(runner.new_job("p1", "react", "typescript"), files()).await.unwrap();

    let bytes = runner.store().find_archive(&job.id).await.unwrap().unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    assert!(archive.by_name("src/components/App.tsx").is_ok());
    assert!(archive.by_name("src/components/Button.tsx").is_ok());
    assert!(archive.by_name("package.json").is_ok());
    assert!(archive.by_name("README.md").is_ok());

    let read = read_project_archive(&bytes, &Default::default()).unwrap();
    assert_eq!(read.len(), job.result.unwrap().files.len());
}

#[tokio::test]
async fn test_existing_project_is_updated() {
    let store = Arc::new(InMemoryStore::with_projects(vec![ProjectRecord::new("p1", "Shop", Vec::new())]));
    let runner = JobRunner::new(store.clone()).unwrap();
    runner.run(runner.new_job("p1", "react", "vue"), files()).await.unwrap();

    let project = store.find_project("p1").await.unwrap().unwrap();
    assert_eq!(project.name, "Shop");
    assert_eq!(project.files.len(), 3);
    let analysis = project.original_tech_stack.unwrap();
    assert_eq!(analysis.frameworks.first().map(String::as_str), Some("react"));
}

#[tokio::test]
async fn test_runner_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[parsing]\nmode = \"heuristic\"\n[output]\nproject_name = \"ported\"\nreadme_timestamp = false\n",
    )
    .unwrap();
    let manager = ConfigManager::with_path(&path).with_env_prefix("STACKSHIFT_JOB_TEST");
    let config: StackshiftConfig = manager.load_config().unwrap();

    let runner = JobRunner::from_config(Arc::new(InMemoryStore::new()), &manager, &config).unwrap();
    assert_eq!(runner.parsing_mode(), ParsingMode::Heuristic);

    let job = runner.run(runner.new_job("p1", "react", "flutter"), files()).await.unwrap();
    assert_eq!(job.stage, JobStage::Done);
    let result = job.result.unwrap();
    let readme = result.file("README.md").unwrap();
    assert!(readme.content.contains("# ported"));
    assert!(!readme.content.contains("Generated at"));
    assert!(result.file("lib/widgets/button_widget.dart").is_some());
}

#[tokio::test]
async fn test_same_named_components_keep_one_archive_entry() {
    let runner = JobRunner::new(Arc::new(InMemoryStore::new())).unwrap();
    let files = vec![
        ProjectFile::new("src/admin/Button.jsx", "const Button = () => <button>Admin</button>;\n"),
        ProjectFile::new("src/shop/Button.jsx", "const Button = () => <button>Shop</button>;\n"),
    ];
    let job = runner.run(runner.new_job("p1", "react", "typescript"), files).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed, "{:?}", job.error);

    let result = job.result.as_ref().unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].file, "src/shop/Button.jsx");

    let bytes = runner.store().find_archive(&job.id).await.unwrap().unwrap();
    let converted = read_project_archive(&bytes, &Default::default()).unwrap();
    let buttons = converted
        .iter()
        .filter(|f| f.path == "src/components/Button.tsx")
        .count();
    assert_eq!(buttons, 1);
}
