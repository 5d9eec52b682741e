//! Template renderer using Tera.
//!
//! All templates are embedded (see [`crate::templates`]) so artifact
//! generation never touches the filesystem and stays deterministic.

use crate::error::BootstrapError;
use crate::templates;
use tera::{Context, Tera};

pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a TemplateRenderer from the embedded templates.
    pub fn from_embedded() -> Result<Self, BootstrapError> {
        let mut tera = Tera::default();

        for (name, content) in templates::ALL_TEMPLATES {
            tera.add_raw_template(name, content).map_err(|e| {
                BootstrapError::Template(format!(
                    "Failed to add embedded template {}: {}",
                    name, e
                ))
            })?;
        }

        tracing::debug!(
            "[TemplateRenderer] Loaded {} embedded templates",
            templates::ALL_TEMPLATES.len()
        );

        Ok(Self { tera })
    }

    /// Render a template with a Tera context.
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, BootstrapError> {
        let rendered = self.tera.render(template_name, context).map_err(|e| {
            BootstrapError::Template(format!(
                "Failed to render template {}: {}",
                template_name, e
            ))
        })?;

        tracing::debug!(
            "[TemplateRenderer] Rendered template {} ({} bytes)",
            template_name,
            rendered.len()
        );

        Ok(rendered)
    }

    /// List all loaded template names.
    pub fn list_templates(&self) -> Vec<String> {
        self.tera.get_template_names().map(String::from).collect()
    }
}
