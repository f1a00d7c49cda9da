use std::sync::Arc;

use anyhow::Context;
use brokerage_templates_contracts::{
    RenderedTemplate, Template, TemplateService, BASE_TEMPLATE, TEMPLATES,
};
use tera::Tera;

/// Tera based template renderer. Html templates are registered with an
/// `.html` suffix, so everything inserted into them is escaped.
#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl TemplateServiceImpl {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("base.html", BASE_TEMPLATE)
            .context("Failed to load base template")?;

        for &(name, text, html) in TEMPLATES {
            tera.add_raw_templates([(text_name(name), text), (html_name(name), html)])
                .with_context(|| format!("Failed to load template {name}"))?;
        }

        Ok(Self { tera: tera.into() })
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<RenderedTemplate> {
        let context = tera::Context::from_serialize(template)?;
        Ok(RenderedTemplate {
            text: self.tera.render(&text_name(T::NAME), &context)?,
            html: self.tera.render(&html_name(T::NAME), &context)?,
        })
    }
}

fn text_name(name: &str) -> String {
    format!("{name}.txt")
}

fn html_name(name: &str) -> String {
    format!("{name}.html")
}
