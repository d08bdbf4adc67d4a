//! Line-level extractors shared by the framework sub-parsers

use heck::ToUpperCamelCase;
use lazy_static::lazy_static;
use regex::Regex;

use crate::structure::{
    ComponentType, EventDefinition, ExportDefinition, ImportDefinition, PropDefinition,
    StateDefinition, StylingApproach,
};

lazy_static! {
    static ref IMPORT_FROM: Regex =
        Regex::new(r#"^\s*import\s+(?:type\s+)?(.+?)\s+from\s+['"]([^'"]+)['"]"#).expect("import regex");
    static ref IMPORT_SIDE_EFFECT: Regex =
        Regex::new(r#"^\s*import\s+['"]([^'"]+)['"]"#).expect("side-effect import regex");
    static ref REQUIRE: Regex = Regex::new(
        r#"(?:(?:const|let|var)\s+(\w+)\s*=\s*)?require\(\s*['"]([^'"]+)['"]\s*\)"#
    )
    .expect("require regex");
    static ref EXPORT_DEFAULT_DECL: Regex = Regex::new(
        r"^\s*export\s+default\s+(?:async\s+)?(?:function\b\*?|class\b)\s*(\w+)?"
    )
    .expect("export default declaration regex");
    static ref EXPORT_DEFAULT_VALUE: Regex =
        Regex::new(r"^\s*export\s+default\s+(\w+)").expect("export default regex");
    static ref EXPORT_NAMED_DECL: Regex = Regex::new(
        r"^\s*export\s+(?:declare\s+)?(?:async\s+)?(?:const|let|var|function\*?|class|interface|type|enum)\s+(\w+)"
    )
    .expect("export declaration regex");
    static ref EXPORT_LIST: Regex =
        Regex::new(r"^\s*export\s*\{([^}]*)\}").expect("export list regex");
    static ref MODULE_EXPORTS: Regex =
        Regex::new(r"module\.exports\s*=\s*(\w+)").expect("module.exports regex");
    static ref CHILD_TAG: Regex = Regex::new(r"<([A-Z][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)").expect("child tag regex");
    static ref EVENT_ATTR: Regex =
        Regex::new(r"\b(on[A-Z]\w*)=\{([^}]*)\}").expect("event attribute regex");
    static ref HANDLER_FN: Regex =
        Regex::new(r"(?:const|function)\s+(handle[A-Z]\w*)").expect("handler regex");
    static ref TAILWIND_CLASS: Regex = Regex::new(
        r#"class(?:Name)?=["'][^"']*\b(?:flex|grid|p[xytrbl]?-\d+|m[xytrbl]?-\d+|text-(?:xs|sm|base|lg|[2-9]?xl)|bg-[a-z]+-\d+|rounded(?:-\w+)?)\b"#
    )
    .expect("tailwind regex");
    static ref STYLESHEET_IMPORT: Regex =
        Regex::new(r#"import\s+(?:\w+\s+from\s+)?['"][^'"]+\.(?:css|scss|sass|less)['"]"#).expect("stylesheet import regex");
}

/// Extensions whose files hold script or component source
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "vue", "svelte"];

/// Categories a file is routed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCategories {
    pub ui: bool,
    pub style: bool,
    pub logic: bool,
    pub routes: bool,
    pub data: bool,
    pub config: bool,
}

impl FileCategories {
    /// Route a path by substring. Case-sensitive; the path is normalised to
    /// forward slashes with a leading `/` so root-level directories match.
    pub fn for_path(path: &str) -> Self {
        let normalised = rooted(path);
        let name = normalised.rsplit('/').next().unwrap_or_default();
        let ext = stackshift_detect::models::extension_of(path).unwrap_or_default();
        let stem = name.split('.').next().unwrap_or_default();
        let script = SCRIPT_EXTENSIONS.contains(&ext.as_str());
        let under = |dirs: &[&str]| dirs.iter().any(|d| normalised.contains(d));

        Self {
            ui: script
                && (under(&["/components/", "/pages/", "/views/", "/layouts/"])
                    || matches!(ext.as_str(), "jsx" | "tsx" | "vue" | "svelte")
                    || name.ends_with(".component.ts")),
            style: matches!(ext.as_str(), "css" | "scss" | "sass" | "less"),
            logic: script
                && under(&["/services/", "/utils/", "/stores/", "/store/", "/api/", "/lib/", "/hooks/"]),
            routes: script && (under(&["/routes/", "/router/"]) || stem == "routes" || stem == "router"),
            data: script && under(&["/models/", "/schemas/", "/entities/", "/types/"]),
            config: name == "package.json"
                || name == "tsconfig.json"
                || name.starts_with(".env")
                || [".config.js", ".config.ts", ".config.mjs", ".config.cjs"]
                    .iter()
                    .any(|suffix| name.ends_with(suffix)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalised path with a leading slash, for substring checks
pub fn rooted(path: &str) -> String {
    format!("/{}", path.replace('\\', "/").trim_start_matches('/'))
}

/// File name without directories or extensions
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}

/// `user-card.vue` → `UserCard`
pub fn component_name_from_path(path: &str) -> String {
    file_stem(path).to_upper_camel_case()
}

/// Imports: ES module forms and `require()` calls. Line numbers are 1-based.
pub fn extract_imports(lines: &[&str]) -> Vec<ImportDefinition> {
    let mut imports = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if let Some(caps) = IMPORT_FROM.captures(line) {
            let (default_import, specifiers) = split_import_clause(&caps[1]);
            imports.push(ImportDefinition {
                source: caps[2].to_string(),
                default_import,
                specifiers,
                line: idx + 1,
            });
        } else if let Some(caps) = IMPORT_SIDE_EFFECT.captures(line) {
            imports.push(ImportDefinition {
                source: caps[1].to_string(),
                default_import: None,
                specifiers: Vec::new(),
                line: idx + 1,
            });
        } else {
            for caps in REQUIRE.captures_iter(line) {
                imports.push(ImportDefinition {
                    source: caps[2].to_string(),
                    default_import: caps.get(1).map(|m| m.as_str().to_string()),
                    specifiers: Vec::new(),
                    line: idx + 1,
                });
            }
        }
    }
    imports
}

/// `React, { useState, useEffect as ue }` → (Some(React), [useState, useEffect as ue])
fn split_import_clause(clause: &str) -> (Option<String>, Vec<String>) {
    let clause = clause.trim();
    let (head, braced) = match clause.find('{') {
        Some(open) => {
            let close = clause[open..].find('}').map(|c| open + c).unwrap_or(clause.len());
            (&clause[..open], Some(&clause[open + 1..close]))
        }
        None => (clause, None),
    };

    let mut specifiers: Vec<String> = braced
        .map(|inner| {
            inner
                .split(',')
                .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let head = head.trim().trim_end_matches(',').trim();
    let default_import = if head.is_empty() {
        None
    } else if head.starts_with('*') {
        specifiers.insert(0, head.split_whitespace().collect::<Vec<_>>().join(" "));
        None
    } else {
        Some(head.to_string())
    };
    (default_import, specifiers)
}

/// Exports: declarations, `export default`, export lists, `module.exports`
pub fn extract_exports(lines: &[&str]) -> Vec<ExportDefinition> {
    let mut exports = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        if let Some(caps) = EXPORT_DEFAULT_DECL.captures(line) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or("default");
            exports.push(ExportDefinition {
                name: name.to_string(),
                is_default: true,
                line: line_no,
            });
        } else if let Some(caps) = EXPORT_DEFAULT_VALUE.captures(line) {
            exports.push(ExportDefinition {
                name: caps[1].to_string(),
                is_default: true,
                line: line_no,
            });
        } else if let Some(caps) = EXPORT_NAMED_DECL.captures(line) {
            exports.push(ExportDefinition {
                name: caps[1].to_string(),
                is_default: false,
                line: line_no,
            });
        } else if let Some(caps) = EXPORT_LIST.captures(line) {
            for entry in caps[1].split(',') {
                let mut words = entry.split_whitespace();
                let Some(local) = words.next() else {
                    continue;
                };
                let exported = match (words.next(), words.next()) {
                    (Some("as"), Some(alias)) => alias,
                    _ => local,
                };
                exports.push(ExportDefinition {
                    name: exported.to_string(),
                    is_default: exported == "default",
                    line: line_no,
                });
            }
        } else if let Some(caps) = MODULE_EXPORTS.captures(line) {
            exports.push(ExportDefinition {
                name: caps[1].to_string(),
                is_default: true,
                line: line_no,
            });
        }
    }
    exports
}

/// Non-relative import sources, deduplicated in first-seen order
pub fn dependencies(imports: &[ImportDefinition]) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();
    for import in imports.iter().filter(|i| !i.is_relative()) {
        if !deps.contains(&import.source) {
            deps.push(import.source.clone());
        }
    }
    deps
}

/// Guess how a file styles its markup; first matching signal wins
pub fn detect_styling(content: &str) -> StylingApproach {
    if content.contains(".module.css") || content.contains(".module.scss") {
        StylingApproach::CssModules
    } else if content.contains("styled-components")
        || content.contains("@emotion/styled")
        || content.contains("styled.")
    {
        StylingApproach::StyledComponents
    } else if TAILWIND_CLASS.is_match(content) {
        StylingApproach::Tailwind
    } else if STYLESHEET_IMPORT.is_match(content)
        || content.contains("<style")
        || content.contains("styleUrls")
        || content.contains("styleUrl:")
    {
        StylingApproach::Stylesheet
    } else if content.contains("style={{") || content.contains(":style=") || content.contains("styles:") {
        StylingApproach::Inline
    } else {
        StylingApproach::None
    }
}

/// Capitalised tags in a block, excluding the component itself
pub fn extract_children(block: &str, own_name: &str) -> Vec<String> {
    let mut children: Vec<String> = Vec::new();
    for caps in CHILD_TAG.captures_iter(block) {
        let tag = &caps[1];
        if tag != own_name && !children.iter().any(|c| c == tag) {
            children.push(tag.to_string());
        }
    }
    children
}

/// `onClick={handleClick}` attributes and `handleX` functions
pub fn extract_events(block: &str) -> Vec<EventDefinition> {
    let mut events: Vec<EventDefinition> = Vec::new();
    for caps in EVENT_ATTR.captures_iter(block) {
        let name = caps[1].to_string();
        if events.iter().any(|e| e.name == name) {
            continue;
        }
        let handler = caps[2].trim();
        events.push(EventDefinition {
            name,
            handler: (!handler.is_empty()).then(|| handler.to_string()),
        });
    }
    for caps in HANDLER_FN.captures_iter(block) {
        let name = &caps[1];
        let referenced = events
            .iter()
            .any(|e| e.name == name || e.handler.as_deref() == Some(name));
        if !referenced {
            events.push(EventDefinition {
                name: name.to_string(),
                handler: None,
            });
        }
    }
    events
}

/// Primitive type of a literal's source text
pub fn literal_type(raw: &str) -> &'static str {
    let raw = raw.trim();
    if raw.is_empty() {
        "any"
    } else if (raw.starts_with('\'') && raw.ends_with('\''))
        || (raw.starts_with('"') && raw.ends_with('"'))
        || (raw.starts_with('`') && raw.ends_with('`'))
    {
        "string"
    } else if raw == "true" || raw == "false" {
        "boolean"
    } else if raw.parse::<f64>().is_ok() {
        "number"
    } else if raw.starts_with('[') {
        "array"
    } else if raw.starts_with('{') {
        "object"
    } else {
        "any"
    }
}

/// Primitive type of a TypeScript annotation or Vue prop constructor
pub fn annotation_type(raw: &str) -> &'static str {
    match raw.trim().trim_end_matches(',').trim() {
        "string" | "String" => "string",
        "number" | "Number" => "number",
        "boolean" | "Boolean" => "boolean",
        "Array" => "array",
        "object" | "Object" => "object",
        other if other.ends_with("[]") || other.starts_with("Array<") => "array",
        other if other.starts_with('{') || other.starts_with("Record<") => "object",
        _ => "any",
    }
}

/// `{ a, b = 2, c: renamed, ...rest }` on the declaration header
pub fn destructured_props(header: &str) -> Vec<PropDefinition> {
    let header = header.split("=>").next().unwrap_or(header);
    let Some(open) = header.find('(') else {
        return Vec::new();
    };
    let rest = header[open + 1..].trim_start();
    if !rest.starts_with('{') {
        return Vec::new();
    }
    let Some(close) = rest.find('}') else {
        return Vec::new();
    };

    rest[1..close]
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty() && !entry.starts_with("..."))
        .map(|entry| {
            let (binding, default) = match entry.split_once('=') {
                Some((b, d)) => (b.trim(), Some(d.trim().to_string())),
                None => (entry, None),
            };
            let name = binding.split(':').next().unwrap_or(binding).trim();
            PropDefinition {
                name: name.to_string(),
                prop_type: default.as_deref().map(literal_type).unwrap_or("any").to_string(),
                required: default.is_none(),
                default_value: default,
            }
        })
        .collect()
}

/// Classification rule shared by all sub-parsers
pub fn classify(is_class: bool, state: &[StateDefinition], hooks: &[String]) -> ComponentType {
    if is_class {
        ComponentType::Class
    } else if !state.is_empty() || !hooks.is_empty() {
        ComponentType::Functional
    } else {
        ComponentType::Stateless
    }
}

/// Route for a page file: `pages/users/[id].tsx` → `/users/:id`
pub fn derive_route(path: &str) -> String {
    let rooted = rooted(path);
    let tail = ["/pages/", "/views/"]
        .iter()
        .filter_map(|marker| rooted.find(marker).map(|i| &rooted[i + marker.len()..]))
        .next()
        .unwrap_or_else(|| rooted.trim_start_matches('/'));

    let last = tail.split('/').count() - 1;
    let segments: Vec<String> = tail
        .split('/')
        .enumerate()
        .filter_map(|(i, seg)| {
            let seg = if i == last {
                seg.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(seg)
            } else {
                seg
            };
            if seg.is_empty() || seg == "index" {
                return None;
            }
            if let Some(inner) = seg.strip_prefix("[...").and_then(|s| s.strip_suffix(']')) {
                return Some(format!("*{}", inner));
            }
            if let Some(inner) = seg.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                return Some(format!(":{}", inner));
            }
            Some(seg.to_string())
        })
        .collect();

    format!("/{}", segments.join("/"))
}
