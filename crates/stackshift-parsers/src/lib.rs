//! # Stackshift Parsers
//!
//! Turns uploaded project files into something the emitters can consume.
//! Two paths are provided:
//!
//! - **AST / UIR**: tree-sitter parses JavaScript, TypeScript, JSX and TSX
//!   into a [`SyntaxTree`]; [`UirGenerator`] flattens components, functions,
//!   imports, exports and JSX into [`UIRNode`]s. CSS goes through a single
//!   regex that only understands `.class { ... }` rules.
//! - **Line-oriented**: [`LineParser`] routes files by path and scans their
//!   lines with regexes and a brace counter to build a
//!   [`ParsedProjectStructure`]. It is a best-effort fallback and its line
//!   ranges are approximate.
//!
//! Neither path fails on bad input. Problems are returned alongside the value
//! as [`Diagnostic`]s in a [`PartialResult`].

pub mod ast;
pub mod css;
pub mod error;
pub mod languages;
pub mod line_parser;
pub mod scanner;
pub mod structure;
pub mod traversal;
pub mod types;
pub mod uir;

pub use ast::AstParser;
pub use error::{Diagnostic, DiagnosticSeverity, ParserError, ParserResult, PartialResult};
pub use languages::{Grammar, SourceLanguage};
pub use line_parser::{ComponentFramework, FileContext, LineParser};
pub use scanner::{BlockEnd, BraceScanner};
pub use structure::{ComponentDefinition, ComponentType, ParsedProjectStructure, StylingApproach};
pub use traversal::{NodeVisitor, TraversalUtils, TreeWalker, VisitAction, VisitorResult};
pub use types::{ASTNode, NodeType, ParserWarning, Position, Range, SyntaxTree};
pub use uir::{Literal, PropSpec, StateSpec, UIRNode, UirGenerator, UirMetadata, UirNodeType};

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ParserError>;
