//! Image Rendering - Single Entry Point
//!
//! Decides per render whether the source is rewritten to the resizing proxy
//! or passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::mode::RenderMode;
use crate::options::ImageOptions;
use crate::responsive::{build_sizes, build_src_set, resolve_max_width};
use crate::url::{image_src, strip_path};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Failed to read payload: {0}")]
    PayloadIo(#[from] std::io::Error),

    #[error("Unknown render mode: {0}")]
    UnknownMode(String),
}

/// A render request: the image source, rewrite controls, and any other
/// `<img>` attributes to carry through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ImageOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_set: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

/// The resolved `<img>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImgElement {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_set: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl ImgElement {
    /// Attributes exactly as supplied, with `force` and `options` dropped.
    fn passthrough(props: &ImageProps) -> Self {
        Self {
            src: props.src.clone(),
            sizes: props.sizes.clone(),
            src_set: props.src_set.clone(),
            attributes: props.attributes.clone(),
        }
    }

    /// Render as an HTML tag.
    ///
    /// Attribute values are HTML-escaped. `true` renders as a bare
    /// attribute, `false` and `null` are omitted, as are attributes whose
    /// name is not a valid HTML attribute name.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<img");
        push_attr(&mut html, "src", &self.src);
        if let Some(sizes) = &self.sizes {
            push_attr(&mut html, "sizes", sizes);
        }
        if let Some(src_set) = &self.src_set {
            push_attr(&mut html, "srcset", src_set);
        }
        for (name, value) in &self.attributes {
            if !is_valid_attr_name(name) {
                warn!(name = %name, "Dropping invalid attribute name");
                continue;
            }
            match value {
                Value::Null | Value::Bool(false) => {}
                Value::Bool(true) => {
                    html.push(' ');
                    html.push_str(name);
                }
                Value::String(s) => push_attr(&mut html, name, s),
                other => push_attr(&mut html, name, &other.to_string()),
            }
        }
        html.push_str(" />");
        html
    }
}

fn is_valid_attr_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '<' | '/' | '=')
        })
}

fn push_attr(html: &mut String, name: &str, value: &str) {
    html.push(' ');
    html.push_str(name);
    html.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => html.push_str("&amp;"),
            '"' => html.push_str("&quot;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            _ => html.push(c),
        }
    }
    html.push('"');
}

/// Renders image requests under a fixed mode
pub struct Renderer {
    mode: RenderMode,
}

impl Renderer {
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    /// Create with the mode taken from the environment
    pub fn from_env() -> Self {
        Self::new(RenderMode::from_env())
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Rewriting applies in production or when the request forces it.
    pub fn should_rewrite(&self, props: &ImageProps) -> bool {
        self.mode.is_production() || props.force == Some(true)
    }

    /// Resolve the element for one request.
    pub fn render(&self, props: &ImageProps) -> ImgElement {
        let rewrite = self.should_rewrite(props);
        debug!(mode = %self.mode, force = ?props.force, rewrite, src = %props.src, "Render decision");

        let mut element = ImgElement::passthrough(props);
        if !rewrite {
            return element;
        }

        let stripped = strip_path(&props.src);
        let options = props.options.as_ref();
        element.src = image_src(stripped, options);

        match options.and_then(|o| o.widths.as_deref().map(|widths| (o, widths))) {
            Some((options, widths)) => {
                element.sizes = Some(build_sizes(widths, resolve_max_width(options)));
                element.src_set = Some(build_src_set(stripped, options));
            }
            None => {
                element.sizes = Some(String::new());
            }
        }

        element
    }

    /// Parse a JSON `ImageProps` payload and render it
    pub fn render_json(&self, payload: &str) -> Result<ImgElement, RenderError> {
        let props: ImageProps = serde_json::from_str(payload)?;
        Ok(self.render(&props))
    }

    /// Read a JSON `ImageProps` payload from disk and render it
    pub fn render_file(&self, path: &Path) -> Result<ImgElement, RenderError> {
        let payload = fs::read_to_string(path)?;
        self.render_json(&payload)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderMode::default())
    }
}
