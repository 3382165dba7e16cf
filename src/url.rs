//! Source URL Construction
//!
//! `/cdn-cgi/image/{options}/{path}` with no percent-encoding applied.

use tracing::trace;

use crate::options::{serialize_options, ImageOptions};

/// Path prefix handled by the resizing proxy.
pub const CDN_PREFIX: &str = "/cdn-cgi/image";

/// Remove a single leading and a single trailing `/`.
pub fn strip_path(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

/// Build the rewritten source for an already stripped path.
///
/// Missing options serialize the same as empty ones, so the defaulted
/// `fit`, `format` and `metadata` tokens are always present.
pub fn image_src(stripped_path: &str, options: Option<&ImageOptions>) -> String {
    let segment = match options {
        Some(options) => serialize_options(options),
        None => serialize_options(&ImageOptions::default()),
    };
    let src = format!("{}/{}/{}", CDN_PREFIX, segment, stripped_path);
    trace!(src = %src, "Built image source");
    src
}
