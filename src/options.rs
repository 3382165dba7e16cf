//! Image Options - Transformation Parameters
//!
//! Serializes into the comma-joined `key=value` segment understood by
//! `/cdn-cgi/image/` resizing endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Fit {
    #[default]
    ScaleDown,
    Contain,
    Cover,
    Crop,
    Pad,
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Fit::ScaleDown => "scale-down",
            Fit::Contain => "contain",
            Fit::Cover => "cover",
            Fit::Crop => "crop",
            Fit::Pad => "pad",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Auto,
    Avif,
    Webp,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Auto => "auto",
            Format::Avif => "avif",
            Format::Webp => "webp",
            Format::Json => "json",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Metadata {
    Keep,
    Copyright,
    #[default]
    None,
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metadata::Keep => "keep",
            Metadata::Copyright => "copyright",
            Metadata::None => "none",
        })
    }
}

/// Transformation parameters for a single image.
///
/// Ranges noted on `blur`, `quality` and `rotate` are what the resizing
/// service accepts; they are not checked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anim: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// 1..=250
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dprs: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<Fit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widths: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// 1..=100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    /// 0..=360
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharpen: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
}

impl ImageOptions {
    /// Copy of these options pinned to one source set candidate.
    pub fn with_variant(&self, dpr: f64, width: f64) -> Self {
        Self {
            dpr: Some(dpr),
            width: Some(width),
            ..self.clone()
        }
    }
}

/// Serialize options into the `/cdn-cgi/image/` option segment.
///
/// Token order is fixed. `fit`, `format` and `metadata` are always present;
/// every other field is dropped when unset, zero, `false` or empty.
/// Values are not escaped.
pub fn serialize_options(options: &ImageOptions) -> String {
    let mut tokens: Vec<String> = Vec::new();

    if options.anim == Some(true) {
        tokens.push("anim=true".to_string());
    }
    push_str(&mut tokens, "background", options.background.as_deref());
    push_int(&mut tokens, "blur", options.blur);
    push_float(&mut tokens, "brightness", options.brightness);
    if options.compression == Some(true) {
        tokens.push("compression=true".to_string());
    }
    push_float(&mut tokens, "contrast", options.contrast);
    push_float(&mut tokens, "dpr", options.dpr);
    tokens.push(format!("fit={}", options.fit.unwrap_or_default()));
    tokens.push(format!("format={}", options.format.unwrap_or_default()));
    push_float(&mut tokens, "gamma", options.gamma);
    push_str(&mut tokens, "gravity", options.gravity.as_deref());
    push_float(&mut tokens, "width", options.width);
    push_float(&mut tokens, "height", options.height);
    tokens.push(format!("metadata={}", options.metadata.unwrap_or_default()));
    push_int(&mut tokens, "quality", options.quality);
    push_int(&mut tokens, "rotate", options.rotate);
    push_float(&mut tokens, "sharpen", options.sharpen);
    push_str(&mut tokens, "trim", options.trim.as_deref());

    tokens.join(",")
}

fn push_str(tokens: &mut Vec<String>, key: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        tokens.push(format!("{}={}", key, v));
    }
}

fn push_int(tokens: &mut Vec<String>, key: &str, value: Option<u32>) {
    if let Some(v) = value.filter(|v| *v != 0) {
        tokens.push(format!("{}={}", key, v));
    }
}

fn push_float(tokens: &mut Vec<String>, key: &str, value: Option<f64>) {
    if let Some(v) = value.filter(|v| is_truthy(*v)) {
        tokens.push(format!("{}={}", key, js_number(v)));
    }
}

/// Zero and NaN count as unset.
pub(crate) fn is_truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

/// Format a number the way ECMAScript `Number.prototype.toString` does.
///
/// Plain decimal notation for magnitudes in `[1e-6, 1e21)`, `1e-7` /
/// `1.5e+21` style otherwise.
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", js_number(-value));
    }

    // Shortest round-trip digits, e.g. "1.5e2"
    let sci = format!("{:e}", value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, (n - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, (n - 1).abs())
        }
    }
}
