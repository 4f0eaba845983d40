mod config;
mod highlight;
mod rewrite;

use std::sync::Arc;

use comrak::{Arena, format_html, nodes::AstNode, parse_document};
use once_cell::sync::Lazy;
use syntect::{dumps::from_uncompressed_data, html::ClassStyle, parsing::SyntaxSet};

use crate::application::render::types::{
    RenderError, RenderService, RenderedPage, RenderedSample,
};
use crate::domain::{
    items::{CodeSample, Item},
    slug::page_file_name,
};

use config::{build_description_sanitizer, default_options};
use highlight::highlight_code;
use rewrite::rewrite_ast;

/// Comrak-based rendering pipeline with Syntect highlighting and Ammonia sanitisation.
pub struct ComrakRenderService {
    options: comrak::Options<'static>,
    syntax_set: SyntaxSet,
    class_style: ClassStyle,
    sanitizer: ammonia::Builder<'static>,
}

impl ComrakRenderService {
    /// Construct a renderer with GFM extensions enabled and syntax highlighting
    /// configured to emit `syntax-` prefixed CSS classes.
    fn new() -> Self {
        let syntax_bytes = include_bytes!(env!("SYNTAX_PACK_FILE"));
        let syntax_set: SyntaxSet =
            from_uncompressed_data(syntax_bytes).expect("syntax pack must be valid");

        Self {
            options: default_options(),
            syntax_set,
            class_style: ClassStyle::SpacedPrefixed { prefix: "syntax-" },
            sanitizer: build_description_sanitizer(),
        }
    }
}

static RENDER_SERVICE: Lazy<Arc<ComrakRenderService>> =
    Lazy::new(|| Arc::new(ComrakRenderService::new()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<ComrakRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for ComrakRenderService {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderService for ComrakRenderService {
    fn render(&self, item: &Item) -> Result<RenderedPage, RenderError> {
        // Labels are checked first so a bad sample never costs a markdown pass.
        let labels = sample_labels(item)?;

        let arena = Arena::new();
        let root = parse_document(&arena, item.description(), &self.options);

        rewrite_ast(root, &self.syntax_set, &self.class_style)?;
        let rendered_html = render_html_stage(root, &self.options)?;
        let description_html = self.sanitizer.clean(&rendered_html).to_string();

        let samples = item
            .samples()
            .iter()
            .zip(labels)
            .map(|(sample, label)| self.render_sample(sample, label))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RenderedPage {
            id: item.id(),
            title: item.title().to_string(),
            file_name: page_file_name(item.id(), item.title()),
            description_html,
            samples,
        })
    }
}

impl ComrakRenderService {
    fn render_sample(
        &self,
        sample: &CodeSample,
        label: String,
    ) -> Result<RenderedSample, RenderError> {
        let code_html = highlight_code(
            sample.language.as_deref(),
            Some(label.as_str()),
            &sample.source,
            &self.syntax_set,
            &self.class_style,
        )?;

        Ok(RenderedSample {
            label,
            language: sample.language.clone(),
            code_html,
            run: sample.run.clone(),
        })
    }
}

fn sample_labels(item: &Item) -> Result<Vec<String>, RenderError> {
    item.samples()
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            sample
                .label()
                .map(str::to_string)
                .ok_or(RenderError::MissingLabel {
                    item_id: item.id(),
                    position: index + 1,
                })
        })
        .collect()
}

fn render_html_stage<'a>(
    root: &'a AstNode<'a>,
    options: &comrak::Options<'static>,
) -> Result<String, RenderError> {
    let mut html = String::new();
    format_html(root, options, &mut html).map_err(|err| RenderError::Markdown {
        message: err.to_string(),
    })?;
    Ok(html)
}
