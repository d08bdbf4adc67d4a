//! Non-component sections of a project: pages, layouts, styles, logic,
//! routes, data models and config files.

use lazy_static::lazy_static;
use regex::Regex;

use crate::css;
use crate::error::Diagnostic;
use crate::line_parser::common::{self, rooted};
use crate::line_parser::FileContext;
use crate::scanner::BraceScanner;
use crate::structure::{
    ComponentDefinition, ConfigDefinition, ConfigKind, DeclarationKind, FieldDefinition,
    LayoutDefinition, ModelDefinition, ModelKind, PackageManifest, PageDefinition,
    RouteDefinition, ServiceDefinition, StoreDefinition, StyleDefinition,
};

lazy_static! {
    static ref EXPORTED_DECL: Regex = Regex::new(
        r"^export\s+(?:default\s+)?(?:abstract\s+)?(?:async\s+)?(class|function)\*?\s+(\w+)"
    )
    .expect("exported declaration regex");
    static ref EXPORTED_CONST_FN: Regex = Regex::new(
        r"^export\s+const\s+(\w+)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|\w+\s*=>)"
    )
    .expect("exported arrow regex");
    static ref EXPORTED_CONST: Regex =
        Regex::new(r"^export\s+(?:default\s+)?const\s+(\w+)\s*=").expect("exported const regex");
    static ref STORE_FACTORY: Regex = Regex::new(
        r"\b(createStore|defineStore|createSlice|configureStore|create)\s*[(<]"
    )
    .expect("store factory regex");
    static ref ROUTE_PATH: Regex = Regex::new(r#"\bpath:\s*['"]([^'"]*)['"]"#).expect("route path regex");
    static ref ROUTE_COMPONENT: Regex =
        Regex::new(r"\b(?:component|element):\s*(?:<\s*)?(\w+)").expect("route component regex");
    static ref JSX_ROUTE: Regex =
        Regex::new(r#"<Route\b[^>]*?\bpath=["']([^"']+)["']"#).expect("jsx route regex");
    static ref JSX_ROUTE_TARGET: Regex =
        Regex::new(r"(?:element=\{\s*<|component=\{\s*)(\w+)").expect("jsx route target regex");
    static ref EXPRESS_ROUTE: Regex = Regex::new(
        r#"\b(?:app|router)\.(get|post|put|patch|delete|all|use)\(\s*['"]([^'"]+)['"]\s*(?:,\s*([A-Za-z_$][\w$.]*)\s*\))?"#
    )
    .expect("express route regex");
    static ref MODEL_DECL: Regex = Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(interface|class)\s+(\w+)"
    )
    .expect("model declaration regex");
    static ref TYPE_DECL: Regex = Regex::new(
        r"^\s*(?:export\s+)?type\s+(\w+)(?:<[^>]*>)?\s*=\s*\{"
    )
    .expect("type declaration regex");
    static ref FIELD_LINE: Regex = Regex::new(
        r"^\s*(?:(?:public|private|protected|readonly)\s+)*(\w+)(\?)?\s*:\s*([^;,=]+?)\s*(?:=.*)?[;,]?\s*$"
    )
    .expect("field regex");
}

/// A page for UI files under `/pages/` or `/views/`
pub fn page(ctx: &FileContext<'_>, components: &[ComponentDefinition]) -> Option<PageDefinition> {
    let path = rooted(ctx.path);
    if !path.contains("/pages/") && !path.contains("/views/") {
        return None;
    }
    let primary = primary_component(ctx, components);
    Some(PageDefinition {
        name: primary
            .map(|c| c.name.clone())
            .unwrap_or_else(|| common::component_name_from_path(ctx.path)),
        route: common::derive_route(ctx.path),
        file_path: ctx.path.to_string(),
        component_id: primary.map(|c| c.id.clone()),
        line_start: 1,
        line_end: ctx.lines.len().max(1),
    })
}

/// Layout components: files under `/layouts/` or components named `*Layout`
pub fn layouts(ctx: &FileContext<'_>, components: &[ComponentDefinition]) -> Vec<LayoutDefinition> {
    let under_layouts = rooted(ctx.path).contains("/layouts/");
    let mut layouts: Vec<LayoutDefinition> = components
        .iter()
        .filter(|c| under_layouts || c.name.ends_with("Layout"))
        .map(|c| LayoutDefinition {
            name: c.name.clone(),
            file_path: c.file_path.clone(),
            line_start: c.line_start,
            line_end: c.line_end,
        })
        .collect();
    if layouts.is_empty() && under_layouts {
        layouts.push(LayoutDefinition {
            name: common::component_name_from_path(ctx.path),
            file_path: ctx.path.to_string(),
            line_start: 1,
            line_end: ctx.lines.len().max(1),
        });
    }
    layouts
}

/// Default-exported component, else the first one
fn primary_component<'c>(
    ctx: &FileContext<'_>,
    components: &'c [ComponentDefinition],
) -> Option<&'c ComponentDefinition> {
    let default_name = ctx.exports.iter().find(|e| e.is_default).map(|e| e.name.as_str());
    components
        .iter()
        .find(|c| Some(c.name.as_str()) == default_name)
        .or_else(|| components.first())
}

pub fn style(ctx: &FileContext<'_>) -> StyleDefinition {
    let mut class_names: Vec<String> = Vec::new();
    for rule in css::extract_class_rules(ctx.content) {
        if !class_names.contains(&rule.class_name) {
            class_names.push(rule.class_name);
        }
    }
    StyleDefinition {
        file_path: ctx.path.to_string(),
        class_names,
        line_start: 1,
        line_end: ctx.lines.len().max(1),
    }
}

/// Exported classes and functions with their brace-scanned extent
pub fn exported_declarations(ctx: &FileContext<'_>) -> Vec<ServiceDefinition> {
    let lines = &ctx.lines;
    let mut found = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let (name, kind) = if let Some(caps) = EXPORTED_DECL.captures(line) {
            let kind = if &caps[1] == "class" {
                DeclarationKind::Class
            } else {
                DeclarationKind::Function
            };
            (caps[2].to_string(), kind)
        } else if let Some(caps) = EXPORTED_CONST_FN.captures(line) {
            (caps[1].to_string(), DeclarationKind::Function)
        } else {
            continue;
        };
        let end = match kind {
            DeclarationKind::Class => BraceScanner::find_class_end(lines, idx),
            DeclarationKind::Function => BraceScanner::find_component_end(lines, idx),
        };
        found.push(ServiceDefinition {
            name,
            kind,
            file_path: ctx.path.to_string(),
            line_start: idx + 1,
            line_end: end.line + 1,
        });
    }
    found
}

/// Whether a logic file holds state stores
pub fn is_store_file(ctx: &FileContext<'_>) -> bool {
    let path = rooted(ctx.path);
    path.contains("/stores/") || path.contains("/store/") || STORE_FACTORY.is_match(ctx.content)
}

/// One store per exported binding, or the whole file when nothing is exported
pub fn stores(ctx: &FileContext<'_>) -> Vec<StoreDefinition> {
    let factory = STORE_FACTORY.captures(ctx.content).map(|c| c[1].to_string());
    let lines = &ctx.lines;
    let mut stores: Vec<StoreDefinition> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let name = EXPORTED_CONST
            .captures(line)
            .or_else(|| EXPORTED_DECL.captures(line))
            .and_then(|caps| caps.get(caps.len() - 1).map(|m| m.as_str().to_string()));
        let Some(name) = name else {
            continue;
        };
        let end = BraceScanner::find_component_end(lines, idx);
        stores.push(StoreDefinition {
            name,
            factory: factory.clone(),
            file_path: ctx.path.to_string(),
            line_start: idx + 1,
            line_end: end.line + 1,
        });
    }

    if stores.is_empty() {
        stores.push(StoreDefinition {
            name: common::file_stem(ctx.path).to_string(),
            factory,
            file_path: ctx.path.to_string(),
            line_start: 1,
            line_end: lines.len().max(1),
        });
    }
    stores
}

/// Utility modules, as opposed to services
pub fn is_utility_file(path: &str) -> bool {
    let path = rooted(path);
    ["/utils/", "/lib/", "/hooks/"].iter().any(|d| path.contains(d))
}

/// Client-side route tables: `path: '...'` object entries and `<Route path=...>` elements
pub fn router_routes(ctx: &FileContext<'_>) -> Vec<RouteDefinition> {
    let lines = &ctx.lines;
    let mut routes = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if let Some(caps) = JSX_ROUTE.captures(line) {
            routes.push(RouteDefinition {
                path: caps[1].to_string(),
                method: None,
                handler: None,
                component: JSX_ROUTE_TARGET.captures(line).map(|c| c[1].to_string()),
                file_path: ctx.path.to_string(),
                line: idx + 1,
            });
        } else if let Some(caps) = ROUTE_PATH.captures(line) {
            // The component usually sits on the same line or one of the next two
            let component = lines[idx..lines.len().min(idx + 3)]
                .iter()
                .enumerate()
                .take_while(|(i, l)| *i == 0 || !ROUTE_PATH.is_match(l))
                .find_map(|(_, l)| ROUTE_COMPONENT.captures(l).map(|c| c[1].to_string()));
            routes.push(RouteDefinition {
                path: caps[1].to_string(),
                method: None,
                handler: None,
                component,
                file_path: ctx.path.to_string(),
                line: idx + 1,
            });
        }
    }
    routes
}

/// Express-style `app.get('/x', handler)` registrations
pub fn server_routes(ctx: &FileContext<'_>) -> Vec<RouteDefinition> {
    ctx.lines
        .iter()
        .enumerate()
        .flat_map(|(idx, line)| {
            EXPRESS_ROUTE.captures_iter(line).map(move |caps| RouteDefinition {
                path: caps[2].to_string(),
                method: Some(caps[1].to_uppercase()),
                handler: caps.get(3).map(|m| m.as_str().to_string()),
                component: None,
                file_path: ctx.path.to_string(),
                line: idx + 1,
            })
        })
        .collect()
}

pub fn models(ctx: &FileContext<'_>, diagnostics: &mut Vec<Diagnostic>) -> Vec<ModelDefinition> {
    let lines = &ctx.lines;
    let mut models = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let (name, kind) = if let Some(caps) = MODEL_DECL.captures(line) {
            let kind = if &caps[1] == "interface" {
                ModelKind::Interface
            } else {
                ModelKind::Class
            };
            (caps[2].to_string(), kind)
        } else if let Some(caps) = TYPE_DECL.captures(line) {
            (caps[1].to_string(), ModelKind::Type)
        } else {
            continue;
        };

        let end = BraceScanner::find_class_end(lines, idx);
        if !end.closed {
            diagnostics.push(
                Diagnostic::warning(
                    ctx.path,
                    format!("{} never closes; assumed to run to end of file", name),
                )
                .at_line(idx + 1),
            );
        }
        models.push(ModelDefinition {
            fields: fields(&lines[idx..=end.line]),
            name,
            kind,
            file_path: ctx.path.to_string(),
            line_start: idx + 1,
            line_end: end.line + 1,
        });
    }
    models
}

/// `name: type` lines one level inside the block
fn fields(block: &[&str]) -> Vec<FieldDefinition> {
    let mut depth: i64 = 0;
    let mut fields = Vec::new();
    for line in block {
        if depth == 1 {
            if let Some(caps) = FIELD_LINE.captures(line) {
                fields.push(FieldDefinition {
                    name: caps[1].to_string(),
                    optional: caps.get(2).is_some(),
                    field_type: caps[3].trim().to_string(),
                });
            }
        }
        depth += line.matches('{').count() as i64 - line.matches('}').count() as i64;
    }
    fields
}

pub fn config_kind(path: &str) -> Option<ConfigKind> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name {
        "package.json" => Some(ConfigKind::PackageJson),
        "tsconfig.json" => Some(ConfigKind::Tsconfig),
        _ if name.starts_with(".env") => Some(ConfigKind::Env),
        _ if name.contains(".config.") => Some(ConfigKind::BuildConfig),
        _ => None,
    }
}

/// Config file entry plus the parsed manifest for `package.json`
pub fn config(
    ctx: &FileContext<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(ConfigDefinition, Option<PackageManifest>)> {
    let kind = config_kind(ctx.path)?;
    let manifest = match kind {
        ConfigKind::PackageJson => match serde_json::from_str::<PackageManifest>(ctx.content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                diagnostics.push(Diagnostic::warning(
                    ctx.path,
                    format!("package.json could not be read: {}", e),
                ));
                None
            }
        },
        _ => None,
    };
    Some((
        ConfigDefinition {
            kind,
            path: ctx.path.to_string(),
        },
        manifest,
    ))
}
