//! Project structure produced by the line-oriented parser.
//!
//! Every definition carries `file_path` plus 1-based `line_start`/`line_end`
//! pointing back into the uploaded file. These are positional references
//! only; nothing here borrows from the source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a component is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// Function component with state or hooks
    Functional,
    /// Class component
    Class,
    /// Function component with neither state nor hooks
    Stateless,
}

/// How a component gets its styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylingApproach {
    CssModules,
    StyledComponents,
    Tailwind,
    Stylesheet,
    Inline,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDefinition {
    pub name: String,
    pub prop_type: String,
    pub required: bool,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDefinition {
    pub name: String,
    pub state_type: String,
    pub initial_value: Option<String>,
    pub setter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub name: String,
    pub handler: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDefinition {
    pub source: String,
    pub default_import: Option<String>,
    pub specifiers: Vec<String>,
    pub line: usize,
}

impl ImportDefinition {
    /// Relative imports point into the project itself
    pub fn is_relative(&self) -> bool {
        self.source.starts_with('.') || self.source.starts_with('/')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDefinition {
    pub name: String,
    pub is_default: bool,
    pub line: usize,
}

/// The central unit of conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub props: Vec<PropDefinition>,
    pub state: Vec<StateDefinition>,
    pub hooks: Vec<String>,
    pub imports: Vec<ImportDefinition>,
    pub exports: Vec<ExportDefinition>,
    pub events: Vec<EventDefinition>,
    /// Capitalised tags rendered by the component
    pub children: Vec<String>,
    pub styling: StylingApproach,
    /// Non-relative import sources
    pub dependencies: Vec<String>,
    /// Framework-specific extras such as an Angular selector
    pub metadata: BTreeMap<String, String>,
}

impl ComponentDefinition {
    pub fn make_id(file_path: &str, name: &str, line_start: usize) -> String {
        format!("{}#{}@{}", file_path, name, line_start)
    }

    pub fn line_count(&self) -> usize {
        self.line_end.saturating_sub(self.line_start) + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDefinition {
    pub name: String,
    pub route: String,
    pub file_path: String,
    pub component_id: Option<String>,
    pub line_start: usize,
    pub line_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDefinition {
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefinition {
    pub file_path: String,
    pub class_names: Vec<String>,
    pub line_start: usize,
    pub line_end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Class,
    Function,
}

/// An exported class or function in a logic file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    pub name: String,
    pub kind: DeclarationKind,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDefinition {
    pub name: String,
    /// Store factory seen in the file, e.g. `createSlice`
    pub factory: Option<String>,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDefinition {
    pub path: String,
    /// HTTP verb for server routes
    pub method: Option<String>,
    pub handler: Option<String>,
    pub component: Option<String>,
    pub file_path: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Interface,
    Type,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    pub name: String,
    pub kind: ModelKind,
    pub fields: Vec<FieldDefinition>,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigKind {
    PackageJson,
    Tsconfig,
    BuildConfig,
    Env,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDefinition {
    pub kind: ConfigKind,
    pub path: String,
}

/// The parts of `package.json` the converter cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiStructure {
    pub components: Vec<ComponentDefinition>,
    pub pages: Vec<PageDefinition>,
    pub layouts: Vec<LayoutDefinition>,
    pub styles: Vec<StyleDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicStructure {
    pub services: Vec<ServiceDefinition>,
    pub stores: Vec<StoreDefinition>,
    pub utilities: Vec<ServiceDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStructure {
    pub routes: Vec<RouteDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStructure {
    pub models: Vec<ModelDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStructure {
    pub files: Vec<ConfigDefinition>,
    pub package: Option<PackageManifest>,
}

/// Everything the line parser found in a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedProjectStructure {
    pub ui: UiStructure,
    pub logic: LogicStructure,
    pub routes: RouteStructure,
    pub data: DataStructure,
    pub config: ConfigStructure,
}

impl ParsedProjectStructure {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Components by name
    pub fn component(&self, name: &str) -> Option<&ComponentDefinition> {
        self.ui.components.iter().find(|c| c.name == name)
    }
}
