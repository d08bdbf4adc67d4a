//! Heuristic line-oriented project parser.
//!
//! This is the fallback path. Files are routed by path substring, then
//! scanned line by line with regexes and a brace counter. Output is
//! best-effort: line ranges drift when braces appear in strings or comments
//! and many fields stay empty. Anything the scan could not handle is
//! reported as a [`Diagnostic`] instead of being dropped silently.

pub mod angular;
pub mod common;
pub mod react;
pub mod sections;
pub mod vue;

use std::fmt;

use stackshift_detect::ProjectFile;
use tracing::{debug, info};

use crate::error::{Diagnostic, PartialResult};
use crate::structure::{
    ComponentDefinition, ExportDefinition, ImportDefinition, ParsedProjectStructure,
    StylingApproach,
};

pub use common::FileCategories;

/// Which component sub-parser a project uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentFramework {
    #[default]
    React,
    Vue,
    Angular,
}

impl ComponentFramework {
    /// Map a framework name; anything unrecognised falls back to React
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "vue" | "vuejs" | "nuxt" | "nuxtjs" => ComponentFramework::Vue,
            "angular" | "angularjs" => ComponentFramework::Angular,
            _ => ComponentFramework::React,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentFramework::React => "react",
            ComponentFramework::Vue => "vue",
            ComponentFramework::Angular => "angular",
        }
    }
}

impl fmt::Display for ComponentFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-file state shared by the sub-parsers
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    pub path: &'a str,
    pub content: &'a str,
    pub lines: Vec<&'a str>,
    pub imports: Vec<ImportDefinition>,
    pub exports: Vec<ExportDefinition>,
    pub styling: StylingApproach,
    pub dependencies: Vec<String>,
}

impl<'a> FileContext<'a> {
    pub fn new(path: &'a str, content: &'a str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let imports = common::extract_imports(&lines);
        let exports = common::extract_exports(&lines);
        let dependencies = common::dependencies(&imports);
        Self {
            path,
            content,
            styling: common::detect_styling(content),
            lines,
            imports,
            exports,
            dependencies,
        }
    }

    fn extension(&self) -> String {
        stackshift_detect::models::extension_of(self.path).unwrap_or_default()
    }
}

/// Line-oriented structural parser
#[derive(Debug, Default, Clone, Copy)]
pub struct LineParser;

impl LineParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse every file into one project structure.
    ///
    /// Never fails: files that match no category, blocks that run to end of
    /// file and unreadable manifests are reported as diagnostics.
    pub fn parse_project(&self, files: &[ProjectFile], framework: &str) -> PartialResult<ParsedProjectStructure> {
        let framework = ComponentFramework::from_name(framework);
        let mut structure = ParsedProjectStructure::default();
        let mut diagnostics = Vec::new();

        for file in files {
            if file.is_binary() {
                debug!(path = %file.path, "Skipping binary file");
                continue;
            }
            self.parse_file(file, framework, &mut structure, &mut diagnostics);
        }

        info!(
            framework = %framework,
            components = structure.ui.components.len(),
            diagnostics = diagnostics.len(),
            "Line parse complete"
        );
        PartialResult::with_diagnostics(structure, diagnostics)
    }

    fn parse_file(
        &self,
        file: &ProjectFile,
        framework: ComponentFramework,
        structure: &mut ParsedProjectStructure,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let categories = FileCategories::for_path(&file.path);
        let ctx = FileContext::new(&file.path, &file.content);
        let script = common::SCRIPT_EXTENSIONS.contains(&ctx.extension().as_str());

        if categories.ui {
            let components = self.components(&ctx, framework, diagnostics);
            if let Some(page) = sections::page(&ctx, &components) {
                structure.ui.pages.push(page);
            }
            structure.ui.layouts.extend(sections::layouts(&ctx, &components));
            structure.ui.components.extend(components);
        }

        if categories.style {
            structure.ui.styles.push(sections::style(&ctx));
        }

        if categories.logic {
            if sections::is_store_file(&ctx) {
                structure.logic.stores.extend(sections::stores(&ctx));
            } else if sections::is_utility_file(ctx.path) {
                structure.logic.utilities.extend(sections::exported_declarations(&ctx));
            } else {
                structure.logic.services.extend(sections::exported_declarations(&ctx));
            }
        }

        if categories.routes {
            structure.routes.routes.extend(sections::router_routes(&ctx));
        }
        let server_routes = if script { sections::server_routes(&ctx) } else { Vec::new() };
        let has_server_routes = !server_routes.is_empty();
        structure.routes.routes.extend(server_routes);

        if categories.data {
            structure.data.models.extend(sections::models(&ctx, diagnostics));
        }

        if categories.config {
            if let Some((definition, manifest)) = sections::config(&ctx, diagnostics) {
                structure.config.files.push(definition);
                if manifest.is_some() {
                    structure.config.package = manifest;
                }
            }
        }

        if categories.is_empty() && !has_server_routes {
            debug!(path = %file.path, "File matched no category");
            diagnostics.push(Diagnostic::info(&file.path, "file matched no category and was not parsed"));
        }
    }

    fn components(
        &self,
        ctx: &FileContext<'_>,
        framework: ComponentFramework,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<ComponentDefinition> {
        match (ctx.extension().as_str(), framework) {
            ("vue", _) => vue::parse_components(ctx, diagnostics),
            ("svelte", _) => {
                diagnostics.push(Diagnostic::info(ctx.path, "svelte components are not parsed"));
                Vec::new()
            }
            (_, ComponentFramework::Angular) => angular::parse_components(ctx, diagnostics),
            _ => react::parse_components(ctx, diagnostics),
        }
    }
}
