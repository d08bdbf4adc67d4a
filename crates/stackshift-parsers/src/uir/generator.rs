//! Flattening of syntax trees into UIR nodes

use std::collections::{BTreeMap, HashMap};

use heck::ToUpperCamelCase;
use tracing::{debug, warn};

use crate::error::{Diagnostic, PartialResult};
use crate::traversal::{NodeVisitor, TraversalUtils, TreeWalker, VisitAction, VisitorResult};
use crate::types::{ASTNode, NodeType, SyntaxTree};
use crate::uir::{
    Literal, PropSpec, StateSpec, UIRNode, UirMetadata, UirNodeType, KEY_BODY, KEY_HOOKS,
    KEY_PARAMS, KEY_PROPS, KEY_STATE,
};

const FUNCTION_KINDS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "function_declaration",
    "generator_function_declaration",
    "method_definition",
];

const JSX_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element", "jsx_fragment"];

const COMPONENT_WRAPPERS: &[&str] = &["memo", "React.memo", "forwardRef", "React.forwardRef"];

fn is_function(node: &ASTNode) -> bool {
    FUNCTION_KINDS.contains(&node.kind.as_str())
}

fn is_jsx(node: &ASTNode) -> bool {
    JSX_KINDS.contains(&node.kind.as_str())
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Strip any number of wrapping parentheses
fn unwrap_parens(node: &ASTNode) -> &ASTNode {
    let mut current = node;
    while current.kind == "parenthesized_expression" {
        match current.named_children().find(|c| c.kind != "comment") {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// Stem of the file name up to its first dot
fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}

/// Map a TypeScript annotation onto the primitive type vocabulary
pub fn map_annotation(annotation: &str) -> &'static str {
    let ty = annotation.trim().trim_start_matches(':').trim();
    match ty {
        "string" => "string",
        "number" => "number",
        "boolean" => "boolean",
        "object" => "object",
        _ if ty.ends_with("[]") || ty.starts_with("Array<") || ty.starts_with("ReadonlyArray<") => {
            "array"
        }
        _ if ty.starts_with('{') || ty.starts_with("Record<") => "object",
        _ => "any",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportKind {
    None,
    Named,
    Default,
}

/// Generates UIR nodes from parsed files
#[derive(Debug, Default, Clone)]
pub struct UirGenerator;

impl UirGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Flatten one file's tree into UIR nodes tagged with the source framework.
    ///
    /// An `Error` tree yields no nodes and a warning naming the failure.
    pub fn generate_uir(&self, tree: &SyntaxTree, framework: &str) -> PartialResult<Vec<UIRNode>> {
        let file = tree.file_path.as_str();
        let mut diagnostics: Vec<Diagnostic> = tree
            .warnings
            .iter()
            .map(|w| {
                let d = Diagnostic::warning(file, w.message.clone());
                match w.position {
                    Some(pos) => d.at_line(pos.line + 1),
                    None => d,
                }
            })
            .collect();

        if tree.is_error() {
            let message = tree.error_message().unwrap_or("unparseable file");
            warn!("Skipping {} from UIR generation: {}", file, message);
            diagnostics.push(Diagnostic::warning(
                file,
                format!("skipped from UIR generation: {}", message),
            ));
            return PartialResult::with_diagnostics(Vec::new(), diagnostics);
        }

        if tree.root.node_type == NodeType::Stylesheet {
            let node = stylesheet_node(tree, framework);
            return PartialResult::with_diagnostics(vec![node], diagnostics);
        }

        let ctx = FileContext::new(tree, framework);
        let mut walker = TreeWalker::new(DeclarationVisitor {
            ctx: &ctx,
            nodes: Vec::new(),
        });
        if let Err(e) = walker.walk(&tree.root) {
            diagnostics.push(Diagnostic::error(file, e.to_string()));
        }
        let mut nodes = walker.into_visitor().nodes;
        mark_default_exports(&mut nodes);

        debug!(
            "Generated {} UIR nodes from {} ({} components)",
            nodes.len(),
            file,
            nodes.iter().filter(|n| n.is_component()).count()
        );
        PartialResult::with_diagnostics(nodes, diagnostics)
    }
}

/// Per-file state shared by the extraction helpers
struct FileContext<'a> {
    tree: &'a SyntaxTree,
    framework: &'a str,
    /// Interface and object type alias declarations, by name
    type_decls: HashMap<String, Vec<PropSpec>>,
}

impl<'a> FileContext<'a> {
    fn new(tree: &'a SyntaxTree, framework: &'a str) -> Self {
        let mut walker = TreeWalker::new(TypeDeclCollector {
            source: &tree.source,
            decls: HashMap::new(),
        });
        // The collector never fails
        let _ = walker.walk(&tree.root);
        Self {
            tree,
            framework,
            type_decls: walker.into_visitor().decls,
        }
    }

    fn text(&self, node: &ASTNode) -> &'a str {
        node.text(&self.tree.source)
    }

    fn metadata(&self, node: &ASTNode) -> UirMetadata {
        UirMetadata {
            source_file: self.tree.file_path.clone(),
            source_framework: self.framework.to_string(),
            line_start: node.range.line_start(),
            line_end: node.range.line_end(),
        }
    }

    fn literal(&self, node: &ASTNode) -> Option<Literal> {
        let node = unwrap_parens(node);
        match node.kind.as_str() {
            "string" => {
                let raw = self.text(node);
                let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
                Some(Literal::from_quoted(inner))
            }
            "number" => Some(Literal::Number(self.text(node).to_string())),
            "true" => Some(Literal::Boolean(true)),
            "false" => Some(Literal::Boolean(false)),
            "unary_expression" => {
                let argument = node.child_by_field("argument")?;
                if node.has_token("-") && argument.kind == "number" {
                    Some(Literal::Number(format!("-{}", self.text(argument))))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn property_signature(&self, node: &ASTNode) -> Option<PropSpec> {
        let name = self.text(node.child_by_field("name")?).to_string();
        let prop_type = node
            .child_by_field("type")
            .map(|t| map_annotation(self.text(t)))
            .unwrap_or("any");
        Some(PropSpec {
            name,
            prop_type: prop_type.to_string(),
            default: None,
            required: !node.has_token("?"),
        })
    }
}

/// Collects `interface X {}` and `type X = {}` shapes anywhere in the file
struct TypeDeclCollector<'s> {
    source: &'s str,
    decls: HashMap<String, Vec<PropSpec>>,
}

impl NodeVisitor for TypeDeclCollector<'_> {
    fn pre_visit(&mut self, node: &ASTNode) -> VisitorResult {
        let shape = match node.kind.as_str() {
            "interface_declaration" => node.child_by_field("body"),
            "type_alias_declaration" => node
                .child_by_field("value")
                .filter(|v| v.kind == "object_type"),
            _ => return Ok(VisitAction::Continue),
        };
        if let (Some(name), Some(shape)) = (node.child_by_field("name"), shape) {
            let fields = shape
                .children
                .iter()
                .filter(|c| c.kind == "property_signature")
                .filter_map(|sig| {
                    let name = sig.child_by_field("name")?.text(self.source).to_string();
                    let prop_type = sig
                        .child_by_field("type")
                        .map(|t| map_annotation(t.text(self.source)))
                        .unwrap_or("any");
                    Some(PropSpec {
                        name,
                        prop_type: prop_type.to_string(),
                        default: None,
                        required: !sig.has_token("?"),
                    })
                })
                .collect();
            self.decls.insert(name.text(self.source).to_string(), fields);
        }
        Ok(VisitAction::SkipChildren)
    }
}

/// Visits top-level statements only
struct DeclarationVisitor<'c, 'a> {
    ctx: &'c FileContext<'a>,
    nodes: Vec<UIRNode>,
}

impl NodeVisitor for DeclarationVisitor<'_, '_> {
    fn pre_visit(&mut self, node: &ASTNode) -> VisitorResult {
        match node.kind.as_str() {
            "program" => return Ok(VisitAction::Continue),
            "import_statement" => self.import(node),
            "export_statement" => self.export(node),
            _ => {
                self.declaration(node, node, ExportKind::None);
            }
        }
        Ok(VisitAction::SkipChildren)
    }
}

impl DeclarationVisitor<'_, '_> {
    fn import(&mut self, node: &ASTNode) {
        let ctx = self.ctx;
        let Some(source) = node.child_by_field("source").and_then(|s| ctx.literal(s)) else {
            return;
        };
        let Literal::String(source) = source else {
            return;
        };

        let mut default_import = None;
        let mut namespace = None;
        let mut named = Vec::new();
        if let Some(clause) = node.first_child_of_kind("import_clause") {
            for part in clause.named_children() {
                match part.kind.as_str() {
                    "identifier" => default_import = Some(ctx.text(part).to_string()),
                    "namespace_import" => {
                        namespace = part
                            .first_child_of_kind("identifier")
                            .map(|id| ctx.text(id).to_string())
                    }
                    "named_imports" => {
                        for spec in part.children.iter().filter(|c| c.kind == "import_specifier") {
                            named.push(ctx.text(spec).split_whitespace().collect::<Vec<_>>().join(" "));
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut bindings = Vec::new();
        if let Some(d) = &default_import {
            bindings.push(d.clone());
        }
        if let Some(ns) = &namespace {
            bindings.push(format!("* as {}", ns));
        }
        if !named.is_empty() {
            bindings.push(format!("{{ {} }}", named.join(", ")));
        }
        let statement = if bindings.is_empty() {
            format!("import '{}';", source)
        } else {
            format!("import {} from '{}';", bindings.join(", "), source)
        };

        let uir = UIRNode::new(UirNodeType::Import, source, ctx.metadata(node))
            .with_prop("statement", statement)
            .with_prop("defaultImport", default_import)
            .with_prop("namespace", namespace)
            .with_prop("namedImports", named);
        self.nodes.push(uir);
    }

    fn export(&mut self, node: &ASTNode) {
        let ctx = self.ctx;
        let kind = if node.has_token("default") {
            ExportKind::Default
        } else {
            ExportKind::Named
        };

        if let Some(declaration) = node.child_by_field("declaration") {
            let names = self.declaration(declaration, node, kind);
            for name in names {
                self.push_export(node, &name, kind == ExportKind::Default, None);
            }
            return;
        }

        if let Some(value) = node.child_by_field("value") {
            let value = unwrap_parens(value);
            let name = match value.kind.as_str() {
                "identifier" => ctx.text(value).to_string(),
                _ if is_function(value) || wrapped_function(ctx, value).is_some() => {
                    let name = value
                        .child_by_field("name")
                        .map(|n| ctx.text(n).to_string())
                        .unwrap_or_else(|| file_stem(&ctx.tree.file_path).to_upper_camel_case());
                    let function = wrapped_function(ctx, value).unwrap_or(value);
                    self.function_like(&name, function, node, None, wrapper_kind(ctx, value), kind, true);
                    name
                }
                _ => "default".to_string(),
            };
            self.push_export(node, &name, true, None);
            return;
        }

        if let Some(clause) = node.first_child_of_kind("export_clause") {
            let source = node
                .child_by_field("source")
                .and_then(|s| ctx.literal(s))
                .and_then(|l| match l {
                    Literal::String(s) => Some(s),
                    _ => None,
                });
            for spec in clause.children.iter().filter(|c| c.kind == "export_specifier") {
                let Some(local) = spec.child_by_field("name").map(|n| ctx.text(n)) else {
                    continue;
                };
                let exported = spec.child_by_field("alias").map(|a| ctx.text(a)).unwrap_or(local);
                let mut export = UIRNode::new(UirNodeType::Export, exported, ctx.metadata(node))
                    .with_prop("default", exported == "default")
                    .with_prop("local", local);
                if let Some(source) = &source {
                    export.set_prop("source", source);
                }
                self.nodes.push(export);
            }
            return;
        }

        // export * from '...'
        if let Some(source) = node.child_by_field("source") {
            let source = ctx.text(source).trim_matches(|c| c == '\'' || c == '"');
            self.push_export(node, "*", false, Some(source));
        }
    }

    fn push_export(&mut self, node: &ASTNode, name: &str, default: bool, source: Option<&str>) {
        let mut export = UIRNode::new(UirNodeType::Export, name, self.ctx.metadata(node))
            .with_prop("default", default);
        if let Some(source) = source {
            export.set_prop("source", source);
        }
        self.nodes.push(export);
    }

    /// Handle a declaration statement; returns the names it declared
    fn declaration(&mut self, decl: &ASTNode, outer: &ASTNode, export: ExportKind) -> Vec<String> {
        let ctx = self.ctx;
        match decl.kind.as_str() {
            "lexical_declaration" | "variable_declaration" => {
                let mut names = Vec::new();
                for declarator in decl.children.iter().filter(|c| c.kind == "variable_declarator") {
                    let Some(name_node) = declarator.child_by_field("name") else {
                        continue;
                    };
                    if name_node.kind != "identifier" {
                        continue;
                    }
                    let name = ctx.text(name_node).to_string();
                    if let Some(value) = declarator.child_by_field("value") {
                        let value = unwrap_parens(value);
                        let annotation = declarator.child_by_field("type");
                        if is_function(value) {
                            self.function_like(&name, value, outer, annotation, "arrow", export, false);
                        } else if let Some(function) = wrapped_function(ctx, value) {
                            if starts_uppercase(&name) {
                                self.function_like(
                                    &name,
                                    function,
                                    outer,
                                    annotation,
                                    wrapper_kind(ctx, value),
                                    export,
                                    false,
                                );
                            }
                        }
                    }
                    names.push(name);
                }
                names
            }
            "function_declaration" | "generator_function_declaration" => {
                let Some(name) = decl.child_by_field("name").map(|n| ctx.text(n).to_string()) else {
                    return Vec::new();
                };
                self.function_like(&name, decl, outer, None, "function", export, true);
                vec![name]
            }
            "class_declaration" | "abstract_class_declaration" => {
                let Some(name) = decl.child_by_field("name").map(|n| ctx.text(n).to_string()) else {
                    return Vec::new();
                };
                self.class(&name, decl, outer, export);
                vec![name]
            }
            "interface_declaration" | "type_alias_declaration" | "enum_declaration" => decl
                .child_by_field("name")
                .map(|n| vec![ctx.text(n).to_string()])
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Component when the name is capitalised and, if `needs_jsx`, it renders JSX
    #[allow(clippy::too_many_arguments)]
    fn function_like(
        &mut self,
        name: &str,
        function: &ASTNode,
        outer: &ASTNode,
        annotation: Option<&ASTNode>,
        component_kind: &str,
        export: ExportKind,
        needs_jsx: bool,
    ) {
        let renders_jsx = TraversalUtils::find_first(function, is_jsx).is_some();
        let is_component = starts_uppercase(name) && (renders_jsx || !needs_jsx);

        let node = if is_component {
            self.component(name, function, outer, annotation, component_kind)
        } else {
            self.function(name, function, outer)
        };
        self.nodes.push(
            node.with_prop("exported", export != ExportKind::None)
                .with_prop("defaultExport", export == ExportKind::Default),
        );
    }

    fn component(
        &self,
        name: &str,
        function: &ASTNode,
        outer: &ASTNode,
        annotation: Option<&ASTNode>,
        component_kind: &str,
    ) -> UIRNode {
        let ctx = self.ctx;
        let props = extract_props(ctx, function, annotation);
        let state = extract_state(ctx, function);
        let hooks = extract_hooks(ctx, function);

        let mut node = UIRNode::new(UirNodeType::Component, name, ctx.metadata(outer))
            .with_prop("componentKind", component_kind)
            .with_prop(KEY_PROPS, &props)
            .with_prop(KEY_STATE, &state)
            .with_prop(KEY_HOOKS, &hooks);
        if let Some(jsx) = component_jsx(function) {
            node.children.push(element(ctx, jsx));
        }
        node
    }

    fn function(&self, name: &str, function: &ASTNode, outer: &ASTNode) -> UIRNode {
        let ctx = self.ctx;
        let body = function
            .child_by_field("body")
            .map(|b| ctx.text(b))
            .unwrap_or("");
        UIRNode::new(UirNodeType::Function, name, ctx.metadata(outer))
            .with_prop(KEY_PARAMS, param_names(ctx, function))
            .with_prop(KEY_BODY, body)
            .with_prop("async", function.has_token("async"))
    }

    fn class(&mut self, name: &str, class: &ASTNode, outer: &ASTNode, export: ExportKind) {
        let ctx = self.ctx;
        let extends_component = class
            .first_child_of_kind("class_heritage")
            .is_some_and(|h| ctx.text(h).contains("Component"));
        if !extends_component || !starts_uppercase(name) {
            debug!("Ignoring non-component class {} in {}", name, ctx.tree.file_path);
            return;
        }

        let body = class.child_by_field("body");
        let mut state = Vec::new();
        let mut render = None;
        for member in body.map(|b| b.children.as_slice()).unwrap_or_default() {
            let member_name = member.child_by_field("name").map(|n| ctx.text(n));
            match (member.kind.as_str(), member_name) {
                ("public_field_definition" | "field_definition", Some("state")) => {
                    if let Some(object) = member.child_by_field("value").filter(|v| v.kind == "object") {
                        state = object_state(ctx, object);
                    }
                }
                ("method_definition", Some("render")) => render = Some(member),
                _ => {}
            }
        }

        let mut node = UIRNode::new(UirNodeType::Component, name, ctx.metadata(outer))
            .with_prop("componentKind", "class")
            .with_prop(KEY_PROPS, Vec::<PropSpec>::new())
            .with_prop(KEY_STATE, &state)
            .with_prop(KEY_HOOKS, Vec::<String>::new())
            .with_prop("exported", export != ExportKind::None)
            .with_prop("defaultExport", export == ExportKind::Default);
        if let Some(jsx) = render.and_then(component_jsx) {
            node.children.push(element(ctx, jsx));
        }
        self.nodes.push(node);
    }
}

/// `memo(() => ...)` / `React.forwardRef(function (...) {...})`
fn wrapped_function<'n>(ctx: &FileContext<'_>, value: &'n ASTNode) -> Option<&'n ASTNode> {
    if value.kind != "call_expression" {
        return None;
    }
    let callee = ctx.text(value.child_by_field("function")?);
    if !COMPONENT_WRAPPERS.contains(&callee) {
        return None;
    }
    let first = value
        .child_by_field("arguments")?
        .named_children()
        .find(|c| c.kind != "comment")?;
    let first = unwrap_parens(first);
    is_function(first).then_some(first)
}

fn wrapper_kind(ctx: &FileContext<'_>, value: &ASTNode) -> &'static str {
    let callee = value.child_by_field("function").map(|f| ctx.text(f)).unwrap_or("");
    if callee.ends_with("memo") {
        "memo"
    } else if callee.ends_with("forwardRef") {
        "forwardRef"
    } else if value.kind == "function_declaration" || value.kind == "function_expression" {
        "function"
    } else {
        "arrow"
    }
}

/// First formal parameter, unwrapped from TypeScript parameter wrappers,
/// with its type annotation when present
fn first_parameter(function: &ASTNode) -> Option<(&ASTNode, Option<&ASTNode>)> {
    if let Some(single) = function.child_by_field("parameter") {
        return Some((single, None));
    }
    let param = function
        .child_by_field("parameters")?
        .named_children()
        .find(|c| c.kind != "comment")?;
    match param.kind.as_str() {
        "required_parameter" | "optional_parameter" => {
            let pattern = param.child_by_field("pattern")?;
            Some((pattern, param.child_by_field("type")))
        }
        _ => Some((param, None)),
    }
}

fn extract_props(ctx: &FileContext<'_>, function: &ASTNode, declared: Option<&ASTNode>) -> Vec<PropSpec> {
    let Some((pattern, annotation)) = first_parameter(function) else {
        return Vec::new();
    };
    let pattern = match pattern.kind.as_str() {
        "assignment_pattern" => pattern.child_by_field("left").unwrap_or(pattern),
        _ => pattern,
    };

    let typed = resolve_prop_types(ctx, annotation, declared);

    match pattern.kind.as_str() {
        "object_pattern" => pattern
            .named_children()
            .filter_map(|entry| {
                let (name, default) = match entry.kind.as_str() {
                    "shorthand_property_identifier_pattern" => (ctx.text(entry).to_string(), None),
                    "object_assignment_pattern" => {
                        let name = ctx.text(entry.child_by_field("left")?).to_string();
                        let default = entry.child_by_field("right").and_then(|r| ctx.literal(r));
                        (name, default)
                    }
                    "pair_pattern" => {
                        let name = ctx.text(entry.child_by_field("key")?).to_string();
                        let default = entry
                            .child_by_field("value")
                            .filter(|v| v.kind == "assignment_pattern")
                            .and_then(|v| v.child_by_field("right"))
                            .and_then(|r| ctx.literal(r));
                        (name, default)
                    }
                    _ => return None,
                };
                let declared = typed.get(&name);
                let prop_type = declared
                    .map(|d| d.prop_type.clone())
                    .filter(|t| t != "any")
                    .or_else(|| default.as_ref().map(|d| d.type_name().to_string()))
                    .unwrap_or_else(|| "any".to_string());
                let required = default.is_none() && declared.map(|d| d.required).unwrap_or(true);
                Some(PropSpec {
                    name,
                    prop_type,
                    default,
                    required,
                })
            })
            .collect(),
        "identifier" => {
            let prop_type = match annotation {
                Some(_) if !typed.is_empty() => "object",
                Some(ann) => map_annotation(ctx.text(ann)),
                None if !typed.is_empty() => "object",
                None => "any",
            };
            vec![PropSpec {
                name: ctx.text(pattern).to_string(),
                prop_type: prop_type.to_string(),
                default: None,
                required: true,
            }]
        }
        _ => Vec::new(),
    }
}

/// Field types from `({..}: Props)`, `({..}: { a: string })` or `React.FC<Props>`
fn resolve_prop_types(
    ctx: &FileContext<'_>,
    annotation: Option<&ASTNode>,
    declared: Option<&ASTNode>,
) -> HashMap<String, PropSpec> {
    let from_shape = |shape: &ASTNode| -> Option<Vec<PropSpec>> {
        let inner = shape.named_children().next().unwrap_or(shape);
        match inner.kind.as_str() {
            "type_identifier" => ctx.type_decls.get(ctx.text(inner)).cloned(),
            "object_type" => Some(
                inner
                    .children
                    .iter()
                    .filter(|c| c.kind == "property_signature")
                    .filter_map(|sig| ctx.property_signature(sig))
                    .collect(),
            ),
            _ => None,
        }
    };

    let fields = annotation.and_then(from_shape).or_else(|| {
        let type_args = TraversalUtils::find_first(declared?, |n| n.kind == "type_arguments")?;
        let name = type_args.named_children().find(|c| c.kind == "type_identifier")?;
        ctx.type_decls.get(ctx.text(name)).cloned()
    });

    fields
        .unwrap_or_default()
        .into_iter()
        .map(|spec| (spec.name.clone(), spec))
        .collect()
}

fn extract_state(ctx: &FileContext<'_>, function: &ASTNode) -> Vec<StateSpec> {
    let Some(body) = function.child_by_field("body") else {
        return Vec::new();
    };
    TraversalUtils::find_nodes_within(body, |n| n.kind == "variable_declarator", is_function)
        .into_iter()
        .filter_map(|declarator| {
            let pattern = declarator.child_by_field("name")?;
            let call = unwrap_parens(declarator.child_by_field("value")?);
            if pattern.kind != "array_pattern" || call.kind != "call_expression" {
                return None;
            }
            if ctx.text(call.child_by_field("function")?) != "useState" {
                return None;
            }
            let elements: Vec<&ASTNode> = pattern
                .named_children()
                .filter(|c| c.kind != "comment")
                .collect();
            if elements.len() != 2 || elements[0].kind != "identifier" {
                return None;
            }
            let initial = call
                .child_by_field("arguments")
                .and_then(|args| args.named_children().find(|c| c.kind != "comment"))
                .and_then(|arg| ctx.literal(arg));
            Some(StateSpec {
                name: ctx.text(elements[0]).to_string(),
                setter: Some(ctx.text(elements[1]).to_string()),
                state_type: initial
                    .as_ref()
                    .map(|l| l.type_name())
                    .unwrap_or("any")
                    .to_string(),
                initial,
            })
        })
        .collect()
}

/// `state = { a: 1, b: 'x' }` on a class component
fn object_state(ctx: &FileContext<'_>, object: &ASTNode) -> Vec<StateSpec> {
    object
        .children
        .iter()
        .filter(|c| c.kind == "pair")
        .filter_map(|pair| {
            let key = ctx.text(pair.child_by_field("key")?).trim_matches(|c| c == '\'' || c == '"');
            let initial = pair.child_by_field("value").and_then(|v| ctx.literal(v));
            Some(StateSpec {
                name: key.to_string(),
                setter: None,
                state_type: initial
                    .as_ref()
                    .map(|l| l.type_name())
                    .unwrap_or("any")
                    .to_string(),
                initial,
            })
        })
        .collect()
}

fn extract_hooks(ctx: &FileContext<'_>, function: &ASTNode) -> Vec<String> {
    let mut hooks: Vec<String> = Vec::new();
    for call in TraversalUtils::find_nodes(function, |n| n.kind == "call_expression") {
        let Some(callee) = call.child_by_field("function").filter(|f| f.kind == "identifier") else {
            continue;
        };
        let name = ctx.text(callee);
        if name.starts_with("use") && name.len() > 3 && !hooks.iter().any(|h| h == name) {
            hooks.push(name.to_string());
        }
    }
    hooks
}

/// The JSX a component renders: its own return argument (or expression
/// body), else the first JSX root in source order
fn component_jsx(function: &ASTNode) -> Option<&ASTNode> {
    let body = function.child_by_field("body")?;
    let expression = unwrap_parens(body);
    if is_jsx(expression) {
        return Some(expression);
    }

    if body.kind == "statement_block" {
        let returns =
            TraversalUtils::find_nodes_within(body, |n| n.kind == "return_statement", is_function);
        for ret in returns {
            if let Some(argument) = ret.named_children().find(|c| c.kind != "comment") {
                let argument = unwrap_parens(argument);
                if is_jsx(argument) {
                    return Some(argument);
                }
            }
        }
    }

    TraversalUtils::find_first(body, is_jsx)
}

fn element(ctx: &FileContext<'_>, jsx: &ASTNode) -> UIRNode {
    let opening = match jsx.kind.as_str() {
        "jsx_self_closing_element" => Some(jsx),
        _ => jsx.first_child_of_kind("jsx_opening_element"),
    };
    let tag = opening
        .and_then(|o| o.child_by_field("name"))
        .map(|n| ctx.text(n).to_string())
        .unwrap_or_else(|| "Fragment".to_string());

    let mut attributes = BTreeMap::new();
    if let Some(opening) = opening {
        for attr in opening.children.iter().filter(|c| c.kind == "jsx_attribute") {
            let mut parts = attr.named_children();
            let Some(name) = parts.next() else {
                continue;
            };
            let value = parts.next().map(|v| ctx.text(v)).unwrap_or("true");
            attributes.insert(ctx.text(name).to_string(), value.to_string());
        }
    }

    let mut node = UIRNode::new(UirNodeType::Element, tag, ctx.metadata(jsx))
        .with_prop("attributes", &attributes);

    let mut texts = Vec::new();
    let mut expressions = Vec::new();
    if jsx.kind != "jsx_self_closing_element" {
        for child in jsx.named_children() {
            match child.kind.as_str() {
                "jsx_element" | "jsx_self_closing_element" | "jsx_fragment" => {
                    node.children.push(element(ctx, child))
                }
                "jsx_text" | "html_character_reference" => {
                    let text = ctx.text(child).trim();
                    if !text.is_empty() {
                        texts.push(text.to_string());
                    }
                }
                "jsx_expression" => expressions.push(ctx.text(child).to_string()),
                _ => {}
            }
        }
    }
    if !texts.is_empty() {
        node.set_prop("text", texts.join(" "));
    }
    if !expressions.is_empty() {
        node.set_prop("expressions", expressions);
    }
    node
}

fn param_names(ctx: &FileContext<'_>, function: &ASTNode) -> Vec<String> {
    if let Some(single) = function.child_by_field("parameter") {
        return vec![ctx.text(single).to_string()];
    }
    let Some(params) = function.child_by_field("parameters") else {
        return Vec::new();
    };
    params
        .named_children()
        .filter(|p| p.kind != "comment")
        .map(|p| {
            let target = match p.kind.as_str() {
                "required_parameter" | "optional_parameter" => p.child_by_field("pattern").unwrap_or(p),
                "assignment_pattern" => p.child_by_field("left").unwrap_or(p),
                _ => p,
            };
            ctx.text(target).to_string()
        })
        .collect()
}

fn stylesheet_node(tree: &SyntaxTree, framework: &str) -> UIRNode {
    let metadata = |node: &ASTNode| UirMetadata {
        source_file: tree.file_path.clone(),
        source_framework: framework.to_string(),
        line_start: node.range.line_start(),
        line_end: node.range.line_end(),
    };
    let mut sheet = UIRNode::new(
        UirNodeType::Stylesheet,
        file_stem(&tree.file_path),
        metadata(&tree.root),
    );
    for rule in &tree.root.children {
        let class_name = rule
            .properties
            .get("className")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let mut node = UIRNode::new(UirNodeType::StyleRule, class_name, metadata(rule));
        if let Some(declarations) = rule.properties.get("declarations") {
            node.props
                .insert("declarations".to_string(), declarations.clone());
        }
        sheet.children.push(node);
    }
    sheet
}

/// `export default App;` marks the earlier `App` component as the default export
fn mark_default_exports(nodes: &mut [UIRNode]) {
    let defaults: Vec<String> = nodes
        .iter()
        .filter(|n| n.node_type == UirNodeType::Export && n.prop_bool("default"))
        .map(|n| n.prop_str("local").unwrap_or(n.name.as_str()).to_string())
        .collect();
    for node in nodes.iter_mut().filter(|n| n.is_component()) {
        if defaults.contains(&node.name) {
            node.set_prop("defaultExport", true);
            node.set_prop("exported", true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstParser;

    fn generate(path: &str, code: &str) -> PartialResult<Vec<UIRNode>> {
        let tree = AstParser::new().parse_file(path, code).unwrap();
        UirGenerator::new().generate_uir(&tree, "react")
    }

    fn component<'a>(nodes: &'a [UIRNode], name: &str) -> &'a UIRNode {
        nodes
            .iter()
            .find(|n| n.is_component() && n.name == name)
            .unwrap_or_else(|| panic!("no component {}", name))
    }

    #[test]
    fn test_arrow_component_with_jsx() {
        let result = generate("App.jsx", "const App = () => { return <div>Hi</div>; }");
        assert!(result.diagnostics.is_empty());
        let app = component(&result.value, "App");
        assert_eq!(app.id, "App.jsx#component:App@1");
        assert_eq!(app.metadata.source_framework, "react");
        let root = app.root_element().unwrap();
        assert_eq!(root.name, "div");
        assert_eq!(root.prop_str("text"), Some("Hi"));
    }

    #[test]
    fn test_top_level_declaration_without_export() {
        let result = generate(
            "Banner.jsx",
            "import React from 'react';\nfunction helper(a) { return a; }\nconst Banner = () => <p>x</p>;\n",
        );
        component(&result.value, "Banner");
        assert!(result
            .value
            .iter()
            .any(|n| n.node_type == UirNodeType::Function && n.name == "helper"));
    }

    #[test]
    fn test_use_state_string_default_is_decoded() {
        let result = generate(
            "Note.jsx",
            "const Note = () => { const [text, setText] = useState('it\\'s\\n'); return <p>{text}</p>; }",
        );
        let state = component(&result.value, "Note").state_specs();
        assert_eq!(state[0].initial, Some(Literal::String("it's\n".into())));
    }

    #[test]
    fn test_use_state_with_numeric_default() {
        let result = generate(
            "Counter.jsx",
            "const Counter = () => { const [count, setCount] = useState(0); return <div>{count}</div>; }",
        );
        let counter = component(&result.value, "Counter");
        let state = counter.state_specs();
        assert_eq!(state.len(), 1);
        assert_eq!(state[0].name, "count");
        assert_eq!(state[0].setter.as_deref(), Some("setCount"));
        assert_eq!(state[0].state_type, "number");
        assert_eq!(state[0].initial, Some(Literal::Number("0".into())));
        assert_eq!(counter.hooks(), vec!["useState".to_string()]);
        let root = counter.root_element().unwrap();
        assert_eq!(
            root.props.get("expressions"),
            Some(&serde_json::json!(["{count}"]))
        );
    }

    #[test]
    fn test_complex_state_initialiser_is_undefined() {
        let result = generate(
            "List.jsx",
            "const List = () => { const [items, setItems] = useState([]); const [name] = useState('x'); return <ul/>; }",
        );
        let state = component(&result.value, "List").state_specs();
        assert_eq!(state.len(), 1);
        assert_eq!(state[0].initial, None);
        assert_eq!(state[0].state_type, "any");
    }

    #[test]
    fn test_hooks_deduplicated_in_order() {
        let code = r#"
            function Profile() {
              const ctx = useContext(Ctx);
              useEffect(() => {}, []);
              useEffect(() => {}, [ctx]);
              const [a, setA] = useState(false);
              const u = getUser();
              return <section />;
            }
        "#;
        let result = generate("Profile.jsx", code);
        let profile = component(&result.value, "Profile");
        assert_eq!(profile.hooks(), vec!["useContext", "useEffect", "useState"]);
        assert_eq!(
            profile.state_specs()[0].initial,
            Some(Literal::Boolean(false))
        );
    }

    #[test]
    fn test_destructured_props_with_defaults() {
        let result = generate(
            "Button.jsx",
            "export const Button = ({ label, size = 2, primary = true }) => <button>{label}</button>;",
        );
        let button = component(&result.value, "Button");
        let props = button.prop_specs();
        let names: Vec<_> = props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["label", "size", "primary"]);
        assert_eq!(props[0].prop_type, "any");
        assert!(props[0].required);
        assert_eq!(props[1].prop_type, "number");
        assert_eq!(props[1].default, Some(Literal::Number("2".into())));
        assert!(!props[1].required);
        assert_eq!(props[2].prop_type, "boolean");
        assert!(button.prop_bool("exported"));
        assert!(result
            .value
            .iter()
            .any(|n| n.node_type == UirNodeType::Export && n.name == "Button"));
    }

    #[test]
    fn test_props_typed_from_interface() {
        let code = r#"
            interface CardProps { title: string; count?: number; tags: string[] }
            export const Card = ({ title, count, tags }: CardProps) => <div>{title}</div>;
        "#;
        let result = generate("Card.tsx", code);
        let props = component(&result.value, "Card").prop_specs();
        assert_eq!(props[0].prop_type, "string");
        assert!(props[0].required);
        assert_eq!(props[1].prop_type, "number");
        assert!(!props[1].required);
        assert_eq!(props[2].prop_type, "array");
    }

    #[test]
    fn test_props_typed_from_fc_generic() {
        let code = r#"
            type BadgeProps = { active: boolean };
            const Badge: React.FC<BadgeProps> = ({ active }) => <span />;
        "#;
        let result = generate("Badge.tsx", code);
        let props = component(&result.value, "Badge").prop_specs();
        assert_eq!(props[0].prop_type, "boolean");
    }

    #[test]
    fn test_plain_props_parameter() {
        let result = generate("Title.jsx", "function Title(props) { return <h1>{props.text}</h1>; }");
        let props = component(&result.value, "Title").prop_specs();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "props");
        assert_eq!(props[0].prop_type, "any");
    }

    #[test]
    fn test_jsx_prefers_own_return_over_nested() {
        let code = r#"
            const Todo = ({ items }) => {
              const renderItem = (item) => { return <li>{item}</li>; };
              return <ul className="todos">{items.map(renderItem)}</ul>;
            };
        "#;
        let result = generate("Todo.jsx", code);
        let root = component(&result.value, "Todo").root_element().unwrap();
        assert_eq!(root.name, "ul");
        assert_eq!(
            root.props["attributes"]["className"],
            serde_json::json!("\"todos\"")
        );
    }

    #[test]
    fn test_jsx_first_return_wins() {
        let code = r#"
            function Loader({ loading }) {
              if (loading) { return <Spinner size="sm" />; }
              return <main><p>done</p></main>;
            }
        "#;
        let result = generate("Loader.jsx", code);
        let root = component(&result.value, "Loader").root_element().unwrap();
        assert_eq!(root.name, "Spinner");
    }

    #[test]
    fn test_nested_elements() {
        let result = generate(
            "Nav.jsx",
            "const Nav = () => (<nav><a href=\"/\">Home</a><Link to=\"/x\" disabled /></nav>);",
        );
        let nav = component(&result.value, "Nav").root_element().unwrap();
        assert_eq!(nav.children.len(), 2);
        assert_eq!(nav.children[0].name, "a");
        assert_eq!(nav.children[0].prop_str("text"), Some("Home"));
        assert_eq!(nav.children[1].name, "Link");
        assert_eq!(nav.children[1].props["attributes"]["disabled"], "true");
    }

    #[test]
    fn test_lowercase_and_non_jsx_functions() {
        let code = r#"
            export function formatDate(date, locale = 'en') { return date.toLocaleString(locale); }
            const add = (a, b) => a + b;
            function Helper() { return 42; }
        "#;
        let result = generate("utils.js", code);
        let functions: Vec<_> = result
            .value
            .iter()
            .filter(|n| n.node_type == UirNodeType::Function)
            .collect();
        assert_eq!(functions.len(), 3);
        assert_eq!(functions[0].name, "formatDate");
        assert_eq!(functions[0].params(), vec!["date", "locale"]);
        assert!(functions[0].prop_str(KEY_BODY).unwrap().contains("toLocaleString"));
        assert_eq!(functions[1].params(), vec!["a", "b"]);
        assert!(!result.value.iter().any(|n| n.is_component()));
    }

    #[test]
    fn test_imports_reconstructed() {
        let code = "import React, { useState, useEffect as ue } from \"react\";\nimport * as api from './api';\nimport './index.css';\n";
        let result = generate("App.jsx", code);
        let statements: Vec<_> = result
            .value
            .iter()
            .filter(|n| n.node_type == UirNodeType::Import)
            .map(|n| n.prop_str("statement").unwrap().to_string())
            .collect();
        assert_eq!(
            statements,
            vec![
                "import React, { useState, useEffect as ue } from 'react';",
                "import * as api from './api';",
                "import './index.css';",
            ]
        );
    }

    #[test]
    fn test_default_export_marks_component() {
        let code = "const App = () => <div />;\nexport default App;\n";
        let result = generate("App.jsx", code);
        let app = component(&result.value, "App");
        assert!(app.prop_bool("defaultExport"));
    }

    #[test]
    fn test_anonymous_default_export_named_from_file() {
        let result = generate("user-card.jsx", "export default () => <div>card</div>;");
        let card = component(&result.value, "UserCard");
        assert!(card.prop_bool("defaultExport"));
    }

    #[test]
    fn test_memo_wrapper() {
        let result = generate(
            "Row.jsx",
            "const Row = React.memo(({ id }) => <tr key={id} />);",
        );
        let row = component(&result.value, "Row");
        assert_eq!(row.prop_str("componentKind"), Some("memo"));
        assert_eq!(row.prop_specs()[0].name, "id");
    }

    #[test]
    fn test_class_component() {
        let code = r#"
            class Clock extends React.Component {
              state = { ticks: 0, label: 'now' };
              render() { return <time>{this.state.ticks}</time>; }
            }
        "#;
        let result = generate("Clock.jsx", code);
        let clock = component(&result.value, "Clock");
        assert_eq!(clock.prop_str("componentKind"), Some("class"));
        let state = clock.state_specs();
        assert_eq!(state.len(), 2);
        assert_eq!(state[1].initial, Some(Literal::String("now".into())));
        assert_eq!(clock.root_element().unwrap().name, "time");
    }

    #[test]
    fn test_stylesheet_nodes() {
        let result = generate("styles/App.module.css", ".card { color: red; }\n.title { margin: 0 }");
        assert_eq!(result.value.len(), 1);
        let sheet = &result.value[0];
        assert_eq!(sheet.node_type, UirNodeType::Stylesheet);
        assert_eq!(sheet.name, "App");
        assert_eq!(sheet.children[1].name, "title");
        assert_eq!(sheet.children[0].props["declarations"]["color"], "red");
    }

    #[test]
    fn test_error_tree_yields_diagnostic() {
        let tree = SyntaxTree::new(
            ASTNode::error("syntax error at 1:1"),
            "}}}",
            crate::languages::SourceLanguage::JavaScript,
            "bad.js",
        );
        let result = UirGenerator::new().generate_uir(&tree, "react");
        assert!(result.value.is_empty());
        assert!(result.is_degraded());
        assert!(result.diagnostics[0].message.contains("skipped"));
    }

    #[test]
    fn test_annotation_mapping() {
        assert_eq!(map_annotation(": string"), "string");
        assert_eq!(map_annotation("Array<number>"), "array");
        assert_eq!(map_annotation("Record<string, number>"), "object");
        assert_eq!(map_annotation("{ a: 1 }"), "object");
        assert_eq!(map_annotation("() => void"), "any");
    }
}
