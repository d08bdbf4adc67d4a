//! Project-level files appended after per-node emission

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::emitters::UirEmitter;
use crate::error::Result;
use crate::models::{ConvertedFile, EmitContext, FileType};
use crate::renderer::{names, TemplateRenderer};

/// Builds manifests, entry points and the README
#[derive(Debug, Clone)]
pub struct ProjectScaffolder {
    renderer: Arc<TemplateRenderer>,
}

impl ProjectScaffolder {
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self { renderer }
    }

    /// Project files for the target, if there is one, followed by `README.md`.
    ///
    /// `emitted` are the files produced so far; the README summarises them
    /// together with the project files.
    pub fn scaffold(
        &self,
        emitter: Option<&dyn UirEmitter>,
        to_framework: &str,
        emitted: &[ConvertedFile],
        ctx: &EmitContext,
    ) -> Result<Vec<ConvertedFile>> {
        let mut files = match emitter {
            Some(emitter) => emitter.project_files(ctx)?,
            None => Vec::new(),
        };
        let listed: Vec<&ConvertedFile> = emitted.iter().chain(files.iter()).collect();
        let readme = self.readme(&listed, to_framework, ctx)?;
        files.push(readme);
        debug!("Scaffolded {} project files", files.len());
        Ok(files)
    }

    /// Summary of the converted project
    pub fn readme(&self, files: &[&ConvertedFile], to_framework: &str, ctx: &EmitContext) -> Result<ConvertedFile> {
        let generated_at = if ctx.options.readme_timestamp {
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
        } else {
            String::new()
        };
        let rows: Vec<_> = files
            .iter()
            .map(|f| {
                json!({
                    "path": f.new_path,
                    "type": f.file_type.to_string(),
                    "lines": f.line_count,
                })
            })
            .collect();
        let data = json!({
            "projectName": ctx.options.project_name,
            "fromFramework": ctx.from_framework,
            "toFramework": to_framework,
            "generatedAt": generated_at,
            "fileCount": files.len(),
            "lineCount": files.iter().map(|f| f.line_count).sum::<usize>(),
            "components": ctx.component_names,
            "files": rows,
        });
        let content = self.renderer.render(names::README, &data)?;
        Ok(ConvertedFile::project("README.md", content, FileType::Documentation, "markdown"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::EmitterRegistry;
    use crate::models::{TargetFramework, TranspileOptions};

    fn scaffolder() -> ProjectScaffolder {
        ProjectScaffolder::new(Arc::new(TemplateRenderer::new().unwrap()))
    }

    #[test]
    fn test_readme_counts() {
        let options = TranspileOptions {
            readme_timestamp: false,
            ..TranspileOptions::default()
        };
        let mut ctx = EmitContext::new("react", options);
        ctx.component_names = vec!["App".into()];
        let a = ConvertedFile::new("App.jsx", "src/components/App.tsx", "a\nb\n".into(), FileType::Component, "typescript");
        let b = ConvertedFile::project("package.json", "{}".into(), FileType::Config, "json");
        let readme = scaffolder().readme(&[&a, &b], "typescript", &ctx).unwrap();

        assert_eq!(readme.new_path, "README.md");
        assert_eq!(readme.file_type, FileType::Documentation);
        assert!(readme.content.contains("# converted_app"));
        assert!(readme.content.contains("Converted from react to typescript."));
        assert!(readme.content.contains("- Files: 2"));
        assert!(readme.content.contains("- Lines: 3"));
        assert!(readme.content.contains("| src/components/App.tsx | component | 2 |"));
        assert!(!readme.content.contains("Generated at"));
    }

    #[test]
    fn test_readme_timestamp() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let readme = scaffolder().readme(&[], "flutter", &ctx).unwrap();
        assert!(readme.content.contains("Generated at "));
    }

    #[test]
    fn test_scaffold_without_emitter_is_readme_only() {
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let files = scaffolder().scaffold(None, "cobol", &[], &ctx).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].new_path, "README.md");
    }

    #[test]
    fn test_scaffold_lists_project_files() {
        let registry = EmitterRegistry::new().unwrap();
        let emitter = registry.get(TargetFramework::Flutter).unwrap();
        let ctx = EmitContext::new("react", TranspileOptions::default());
        let files = scaffolder().scaffold(Some(emitter.as_ref()), "flutter", &[], &ctx).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.new_path.as_str()).collect();
        assert_eq!(paths, vec!["pubspec.yaml", "lib/main.dart", "README.md"]);
        assert!(files[2].content.contains("| pubspec.yaml | config |"));
    }
}
