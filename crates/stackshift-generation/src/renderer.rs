//! Handlebars rendering of the built-in templates.
//!
//! Templates are compiled into the binary. Escaping is off because the output
//! is source code, and strict mode turns a missing field into an error rather
//! than an empty string.

use handlebars::{handlebars_helper, no_escape, Handlebars};
use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::Serialize;
use tracing::debug;

use crate::error::{GenerationError, Result};

handlebars_helper!(pascal: |s: str| s.to_upper_camel_case());
handlebars_helper!(snake: |s: str| s.to_snake_case());
handlebars_helper!(kebab: |s: str| s.to_kebab_case());
handlebars_helper!(camel: |s: str| s.to_lower_camel_case());

/// Names of the built-in templates
pub mod names {
    pub const FLUTTER_COMPONENT: &str = "flutter/component";
    pub const FLUTTER_FUNCTION: &str = "flutter/function";
    pub const FLUTTER_STYLE: &str = "flutter/style";
    pub const FLUTTER_PUBSPEC: &str = "flutter/pubspec";
    pub const FLUTTER_MAIN: &str = "flutter/main";

    pub const KOTLIN_COMPONENT: &str = "kotlin/component";
    pub const KOTLIN_FUNCTION: &str = "kotlin/function";
    pub const KOTLIN_STYLE: &str = "kotlin/style";
    pub const KOTLIN_GRADLE: &str = "kotlin/gradle";
    pub const KOTLIN_MAIN_ACTIVITY: &str = "kotlin/main_activity";

    pub const TS_COMPONENT: &str = "typescript/component";
    pub const TS_FUNCTION: &str = "typescript/function";
    pub const TS_STYLE: &str = "typescript/style";
    pub const TS_PACKAGE: &str = "typescript/package";
    pub const TS_TSCONFIG: &str = "typescript/tsconfig";
    pub const TS_INDEX: &str = "typescript/index";

    pub const VUE_COMPONENT: &str = "vue/component";
    pub const VUE_PACKAGE: &str = "vue/package";
    pub const VUE_MAIN: &str = "vue/main";
    pub const VUE_APP: &str = "vue/app";

    pub const ANGULAR_COMPONENT: &str = "angular/component";
    pub const ANGULAR_PACKAGE: &str = "angular/package";
    pub const ANGULAR_MAIN: &str = "angular/main";

    pub const README: &str = "common/readme";
}

const TEMPLATES: &[(&str, &str)] = &[
    (names::FLUTTER_COMPONENT, include_str!("../templates/flutter/component.dart.hbs")),
    (names::FLUTTER_FUNCTION, include_str!("../templates/flutter/function.dart.hbs")),
    (names::FLUTTER_STYLE, include_str!("../templates/flutter/style.dart.hbs")),
    (names::FLUTTER_PUBSPEC, include_str!("../templates/flutter/pubspec.yaml.hbs")),
    (names::FLUTTER_MAIN, include_str!("../templates/flutter/main.dart.hbs")),
    (names::KOTLIN_COMPONENT, include_str!("../templates/kotlin/component.kt.hbs")),
    (names::KOTLIN_FUNCTION, include_str!("../templates/kotlin/function.kt.hbs")),
    (names::KOTLIN_STYLE, include_str!("../templates/kotlin/style.kt.hbs")),
    (names::KOTLIN_GRADLE, include_str!("../templates/kotlin/build.gradle.kts.hbs")),
    (names::KOTLIN_MAIN_ACTIVITY, include_str!("../templates/kotlin/main_activity.kt.hbs")),
    (names::TS_COMPONENT, include_str!("../templates/typescript/component.tsx.hbs")),
    (names::TS_FUNCTION, include_str!("../templates/typescript/function.ts.hbs")),
    (names::TS_STYLE, include_str!("../templates/typescript/style.css.hbs")),
    (names::TS_PACKAGE, include_str!("../templates/typescript/package.json.hbs")),
    (names::TS_TSCONFIG, include_str!("../templates/typescript/tsconfig.json.hbs")),
    (names::TS_INDEX, include_str!("../templates/typescript/index.tsx.hbs")),
    (names::VUE_COMPONENT, include_str!("../templates/vue/component.vue.hbs")),
    (names::VUE_PACKAGE, include_str!("../templates/vue/package.json.hbs")),
    (names::VUE_MAIN, include_str!("../templates/vue/main.ts.hbs")),
    (names::VUE_APP, include_str!("../templates/vue/App.vue.hbs")),
    (names::ANGULAR_COMPONENT, include_str!("../templates/angular/component.ts.hbs")),
    (names::ANGULAR_PACKAGE, include_str!("../templates/angular/package.json.hbs")),
    (names::ANGULAR_MAIN, include_str!("../templates/angular/main.ts.hbs")),
    (names::README, include_str!("../templates/common/README.md.hbs")),
];

/// Renders the built-in templates
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Compile every built-in template
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.set_strict_mode(true);
        registry.register_helper("pascal", Box::new(pascal));
        registry.register_helper("snake", Box::new(snake));
        registry.register_helper("kebab", Box::new(kebab));
        registry.register_helper("camel", Box::new(camel));

        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| GenerationError::InvalidTemplate {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }
        debug!("Registered {} templates", TEMPLATES.len());

        Ok(Self { registry })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    /// Render a template against serialisable data
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        if !self.registry.has_template(name) {
            return Err(GenerationError::TemplateNotFound(name.to_string()));
        }
        self.registry
            .render(name, data)
            .map_err(|e| GenerationError::RenderError {
                template: name.to_string(),
                message: e.to_string(),
            })
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("templates", &TEMPLATES.len())
            .finish()
    }
}
