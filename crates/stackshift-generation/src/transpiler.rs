//! Whole-project transpilation: parse, flatten to UIR, emit, scaffold.

use std::sync::Arc;

use stackshift_detect::ProjectFile;
use stackshift_parsers::{AstParser, DiagnosticSeverity, UIRNode, UirGenerator};
use tracing::{debug, info, warn};

use crate::emitters::EmitterRegistry;
use crate::error::Result;
use crate::models::{ConversionResult, ConvertedFile, EmissionError, EmitContext, TargetFramework, TranspileOptions};
use crate::renderer::TemplateRenderer;
use crate::scaffold::ProjectScaffolder;

/// Drives the AST path from uploaded files to emitted files
#[derive(Debug, Clone)]
pub struct Transpiler {
    parser: AstParser,
    generator: UirGenerator,
    registry: EmitterRegistry,
    scaffolder: ProjectScaffolder,
}

impl Transpiler {
    /// Transpiler with every built-in emitter
    pub fn new() -> Result<Self> {
        let renderer = Arc::new(TemplateRenderer::new()?);
        Ok(Self::with_registry(
            EmitterRegistry::with_renderer(renderer.clone()),
            renderer,
        ))
    }

    /// Transpiler with a caller-assembled registry
    pub fn with_registry(registry: EmitterRegistry, renderer: Arc<TemplateRenderer>) -> Self {
        Self {
            parser: AstParser::new(),
            generator: UirGenerator::new(),
            registry,
            scaffolder: ProjectScaffolder::new(renderer),
        }
    }

    pub fn registry(&self) -> &EmitterRegistry {
        &self.registry
    }

    /// Convert every parseable file to the target framework.
    ///
    /// Never fails as a whole: skipped files become warnings and nodes that
    /// cannot be emitted become entries in `errors`.
    pub fn transpile_project(
        &self,
        files: &[ProjectFile],
        from_framework: &str,
        to_framework: &str,
        options: &TranspileOptions,
    ) -> ConversionResult {
        let (nodes, mut warnings) = self.parse_project(files, from_framework);
        let mut result = self.emit_project(&nodes, from_framework, to_framework, options);
        warnings.append(&mut result.warnings);
        ConversionResult::from_parts(result.files, result.errors, warnings)
    }

    /// UIR nodes for every parseable file, plus a warning per skipped file
    /// and per diagnostic at warning level or above
    pub fn parse_project(&self, files: &[ProjectFile], from_framework: &str) -> (Vec<UIRNode>, Vec<String>) {
        let mut warnings = Vec::new();
        let mut nodes = Vec::new();

        for file in files {
            if file.is_binary() {
                debug!(path = %file.path, "Skipping binary file");
                warnings.push(format!("skipped {}: binary file", file.path));
                continue;
            }
            if !AstParser::supports(&file.path) {
                debug!(path = %file.path, "Skipping unsupported file");
                warnings.push(format!("skipped {}: unsupported file type", file.path));
                continue;
            }
            let tree = match self.parser.parse_file(&file.path, &file.content) {
                Ok(tree) => tree,
                Err(e) => {
                    warn!(path = %file.path, error = %e, "Parse failed");
                    warnings.push(format!("skipped {}: {}", file.path, e));
                    continue;
                }
            };
            let (file_nodes, diagnostics) = self.generator.generate_uir(&tree, from_framework).into_parts();
            warnings.extend(
                diagnostics
                    .iter()
                    .filter(|d| d.severity >= DiagnosticSeverity::Warning)
                    .map(ToString::to_string),
            );
            nodes.extend(file_nodes);
        }
        (nodes, warnings)
    }

    /// Emit already-built UIR nodes and append the project files.
    ///
    /// An unrecognised target drops every node; only the README is produced.
    pub fn emit_project(
        &self,
        nodes: &[UIRNode],
        from_framework: &str,
        to_framework: &str,
        options: &TranspileOptions,
    ) -> ConversionResult {
        let mut ctx = EmitContext::new(from_framework, options.clone());
        let mut files: Vec<ConvertedFile> = Vec::new();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let emitter = TargetFramework::from_name(to_framework).and_then(|t| self.registry.get(t));
        match &emitter {
            Some(emitter) => {
                for node in nodes {
                    match emitter.emit(node, &ctx) {
                        Ok(Some(file)) => {
                            if let Some(first) = files.iter().find(|f| f.new_path == file.new_path) {
                                warn!(node = %node.id, path = %file.new_path, "Output path already taken");
                                errors.push(EmissionError {
                                    file: node.metadata.source_file.clone(),
                                    node: node.name.clone(),
                                    message: format!(
                                        "output path {} is already used by {}",
                                        file.new_path, first.original_path
                                    ),
                                });
                                continue;
                            }
                            if node.is_component() {
                                ctx.component_names.push(node.name.clone());
                            }
                            files.push(file);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!(node = %node.id, error = %e, "Emission failed");
                            errors.push(EmissionError {
                                file: node.metadata.source_file.clone(),
                                node: node.name.clone(),
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }
            None => {
                debug!(to = to_framework, "No emitter for target; dropping {} nodes", nodes.len());
                if !nodes.is_empty() {
                    warnings.push(format!(
                        "no emitter for target '{}'; {} nodes were dropped",
                        to_framework,
                        nodes.len()
                    ));
                }
            }
        }

        match self
            .scaffolder
            .scaffold(emitter.as_deref(), to_framework, &files, &ctx)
        {
            Ok(project) => files.extend(project),
            Err(e) => {
                warn!(error = %e, "Scaffolding failed");
                errors.push(EmissionError {
                    file: String::new(),
                    node: "project".to_string(),
                    message: e.to_string(),
                });
            }
        }

        info!(
            from = from_framework,
            to = to_framework,
            files = files.len(),
            errors = errors.len(),
            "Transpile complete"
        );
        ConversionResult::from_parts(files, errors, warnings)
    }

    /// Emit a single node, `None` when the target is unknown or the node has no file
    pub fn emit_node(&self, node: &UIRNode, to_framework: &str, ctx: &EmitContext) -> Result<Option<ConvertedFile>> {
        match TargetFramework::from_name(to_framework).and_then(|t| self.registry.get(t)) {
            Some(emitter) => emitter.emit(node, ctx),
            None => Ok(None),
        }
    }
}
