//! CfImage Core - Responsive Image Source Rewriting
//!
//! Rewrites `<img>` sources onto a `/cdn-cgi/image/` resizing proxy.
//!
//! # Guarantees
//! 1. Pure string construction, nothing is fetched or validated
//! 2. Option tokens are emitted in a fixed order
//! 3. Outside production, requests pass through untouched unless forced

pub mod options;
pub mod url;
pub mod responsive;
pub mod mode;
pub mod render;

pub use options::{js_number, serialize_options, Fit, Format, ImageOptions, Metadata};
pub use url::{image_src, strip_path, CDN_PREFIX};
pub use responsive::{build_sizes, build_src_set, resolve_max_width};
pub use mode::{RenderMode, MODE_ENV_VAR};
pub use render::{ImageProps, ImgElement, RenderError, Renderer};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
