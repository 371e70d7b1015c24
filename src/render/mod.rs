//! Page renderer module
//!
//! Serves one static demo page per NLP operation. Each page is a handlebars
//! template sharing the `header`, `view` and `script` partials; the only
//! per-request input is which operation the path selects.

mod helpers;

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;

use crate::config::RendererConfig;
use crate::logger;
use crate::nlp::Operation;

/// Synchronous text limit of the service, in UTF-8 bytes
pub const MAX_TEXT_BYTES: u32 = 5000;

const BUILTIN_TEMPLATES: [(&str, &str); 8] = [
    ("header", include_str!("../../templates/header.hbs")),
    ("view", include_str!("../../templates/view.hbs")),
    ("script", include_str!("../../templates/script.hbs")),
    ("index", include_str!("../../templates/index.hbs")),
    (
        "index_dominantlanguage",
        include_str!("../../templates/index_dominantlanguage.hbs"),
    ),
    ("index_entities", include_str!("../../templates/index_entities.hbs")),
    ("index_keyphrases", include_str!("../../templates/index_keyphrases.hbs")),
    ("index_syntax", include_str!("../../templates/index_syntax.hbs")),
];

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("{0}")]
    Constants(String),
}

/// Values interpolated into a page
#[derive(Debug, Serialize)]
pub struct PageData {
    pub title: String,
    pub api: String,
    /// `api` as a JavaScript string literal
    pub api_literal: String,
    pub action: &'static str,
    pub label: &'static str,
    pub max_text_bytes: u32,
    pub pages: Vec<PageLink>,
}

#[derive(Debug, Serialize)]
pub struct PageLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Name of the page template for an operation
pub fn template_name(op: Operation) -> String {
    match op {
        Operation::Sentiment => "index".to_string(),
        other => format!("index_{}", other.label().to_lowercase()),
    }
}

/// JSON string literal that is also safe inside a `<script>` element
fn script_literal(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
}

pub struct PageRenderer {
    registry: Handlebars<'static>,
    title: String,
    api: String,
    base_path: String,
}

impl PageRenderer {
    /// Built-in templates, with per-file overrides from `template_dir`
    pub fn from_config(config: &RendererConfig) -> Result<Self, RenderError> {
        let constants = config.resolve_constants().map_err(RenderError::Constants)?;
        let mut renderer = Self::new(constants.title, constants.api)?
            .with_base_path(&config.base_path);

        if let Some(dir) = &config.template_dir {
            renderer.load_overrides(Path::new(dir))?;
        }
        Ok(renderer)
    }

    pub fn new(title: impl Into<String>, api: impl Into<String>) -> Result<Self, RenderError> {
        Self::with_templates(title, api, &BUILTIN_TEMPLATES)
    }

    pub fn with_templates(
        title: impl Into<String>,
        api: impl Into<String>,
        templates: &[(&str, &str)],
    ) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        helpers::register(&mut registry);

        for (name, source) in templates {
            registry.register_template_string(name, *source)?;
        }

        Ok(Self {
            registry,
            title: title.into(),
            api: api.into(),
            base_path: String::new(),
        })
    }

    /// Prefix page links with `base_path`; a trailing slash is ignored
    #[must_use]
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = base_path.trim_end_matches('/').to_string();
        self
    }

    /// Replace built-in templates with `<dir>/<name>.hbs` where such a file exists
    fn load_overrides(&mut self, dir: &Path) -> Result<(), RenderError> {
        for (name, _) in BUILTIN_TEMPLATES {
            let path = dir.join(format!("{name}.hbs"));
            if path.is_file() {
                self.registry.register_template_file(name, &path)?;
                logger::log_template_override(name, &path.display().to_string());
            }
        }
        Ok(())
    }

    pub fn page_data(&self, op: Operation) -> PageData {
        PageData {
            title: format!("{} | Detect {}", self.title, op.label()),
            api: self.api.clone(),
            api_literal: script_literal(&self.api),
            action: op.action(),
            label: op.label(),
            max_text_bytes: MAX_TEXT_BYTES,
            pages: Operation::ALL
                .iter()
                .map(|&page| PageLink {
                    label: page.label(),
                    href: format!(
                        "{}/detect/{}",
                        self.base_path,
                        page.label().to_lowercase()
                    ),
                    active: page == op,
                })
                .collect(),
        }
    }

    pub fn render(&self, op: Operation) -> Result<String, RenderError> {
        let data = self.page_data(op);
        Ok(self.registry.render(&template_name(op), &data)?)
    }

    /// Render the page chosen by a request path (unknown paths show Sentiment)
    pub fn render_selector(&self, path: &str) -> Result<String, RenderError> {
        self.render(Operation::from_page_selector(path))
    }
}
