//! Template-based code emission for stackshift
//!
//! Takes UIR nodes from `stackshift-parsers` and writes fixed-shape source
//! files for a target framework through Handlebars templates. Only the shape
//! of a component survives: its name, props and state. Rendered markup and
//! logic are replaced by a placeholder body.
//!
//! [`Transpiler::transpile_project`] is the entry point; per-target work is
//! done by the [`UirEmitter`] registered for that target in the
//! [`EmitterRegistry`].

pub mod emitters;
pub mod error;
pub mod models;
pub mod renderer;
pub mod scaffold;
pub mod transpiler;
pub mod type_mapper;

pub use emitters::{
    AngularEmitter, EmitterRegistry, FlutterEmitter, KotlinEmitter, TypeScriptEmitter, UirEmitter,
    VueEmitter,
};
pub use error::{GenerationError, Result};
pub use models::{
    CommentSyntax, ConversionResult, ConvertedFile, EmissionError, EmitContext, FileType,
    TargetFramework, TranspileOptions,
};
pub use renderer::TemplateRenderer;
pub use scaffold::ProjectScaffolder;
pub use transpiler::Transpiler;
pub use type_mapper::TypeMapper;
