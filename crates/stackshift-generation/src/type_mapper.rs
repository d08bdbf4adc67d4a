//! Per-target type names and literal formatting.
//!
//! Only `string`, `number`, `boolean`, `array` and `object` are known; every
//! other type name maps to the target's catch-all type.

use stackshift_parsers::Literal;

use crate::models::TargetFramework;

/// Maps UIR type names and literals onto one target language
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper {
    target: TargetFramework,
}

impl TypeMapper {
    pub fn new(target: TargetFramework) -> Self {
        Self { target }
    }

    pub fn target(&self) -> TargetFramework {
        self.target
    }

    /// Target type for a UIR type name.
    ///
    /// `default` only matters for Dart, where a fractional default turns
    /// `number` into `double`.
    pub fn map(&self, ty: &str, default: Option<&Literal>) -> String {
        let ty = ty.trim().to_lowercase();
        let mapped = match self.target {
            TargetFramework::Flutter => match ty.as_str() {
                "string" => "String",
                "number" if default.is_some_and(Literal::is_fractional) => "double",
                "number" => "int",
                "boolean" => "bool",
                "array" => "List<dynamic>",
                "object" => "Map<String, dynamic>",
                _ => "dynamic",
            },
            TargetFramework::Kotlin => match ty.as_str() {
                "string" => "String",
                "number" if default.is_some_and(Literal::is_fractional) => "Double",
                "number" => "Int",
                "boolean" => "Boolean",
                "array" => "List<Any>",
                "object" => "Map<String, Any>",
                _ => "Any",
            },
            TargetFramework::TypeScript | TargetFramework::Vue | TargetFramework::Angular => {
                match ty.as_str() {
                    "string" => "string",
                    "number" => "number",
                    "boolean" => "boolean",
                    "array" => "any[]",
                    "object" => "Record<string, any>",
                    _ => "any",
                }
            }
        };
        mapped.to_string()
    }

    /// A type that also admits the null value
    pub fn nullable(&self, ty: &str) -> String {
        match self.target {
            TargetFramework::Flutter if ty == "dynamic" => ty.to_string(),
            TargetFramework::Flutter | TargetFramework::Kotlin => format!("{}?", ty),
            _ if ty == "any" => ty.to_string(),
            _ => format!("{} | undefined", ty),
        }
    }

    /// The target's empty value
    pub fn null_literal(&self) -> &'static str {
        match self.target {
            TargetFramework::Flutter | TargetFramework::Kotlin => "null",
            _ => "undefined",
        }
    }

    /// Serialise a literal; anything that is not a simple literal becomes null
    pub fn literal(&self, literal: Option<&Literal>) -> String {
        match literal {
            Some(Literal::String(s)) => self.string_literal(s),
            Some(Literal::Number(raw)) => raw.clone(),
            Some(Literal::Boolean(b)) => b.to_string(),
            None => self.null_literal().to_string(),
        }
    }

    fn string_literal(&self, value: &str) -> String {
        let quote = match self.target {
            TargetFramework::Kotlin => '"',
            _ => '\'',
        };
        let escape_dollar = matches!(self.target, TargetFramework::Flutter | TargetFramework::Kotlin);

        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '$' if escape_dollar => out.push_str("\\$"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}
