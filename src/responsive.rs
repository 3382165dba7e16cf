//! Responsive Attributes - `sizes` and `srcset`

use crate::options::{is_truthy, js_number, ImageOptions};
use crate::url::image_src;

const DEFAULT_DPRS: &[f64] = &[1.0];

/// Maximum rendered width used for the `sizes` media condition.
///
/// An explicit `maxWidth` wins, otherwise the largest of `width` and `widths`.
/// A NaN anywhere makes the result NaN, which then counts as no max.
pub fn resolve_max_width(options: &ImageOptions) -> Option<f64> {
    if options.max_width.is_some() {
        return options.max_width;
    }
    let widths = options.widths.as_deref().unwrap_or_default();
    options
        .width
        .filter(|w| is_truthy(*w))
        .into_iter()
        .chain(widths.iter().copied())
        .fold(None, |max: Option<f64>, w| match max {
            _ if w.is_nan() => Some(f64::NAN),
            Some(m) if m.is_nan() || m >= w => Some(m),
            _ => Some(w),
        })
}

/// Build a `sizes` attribute value.
///
/// The width list is always preceded by one space, so without a max width
/// the result starts with a space.
pub fn build_sizes(widths: &[f64], max_width: Option<f64>) -> String {
    let prefix = match max_width.filter(|m| is_truthy(*m)) {
        Some(max) => format!("(max-width: {}px)", js_number(max)),
        None => String::new(),
    };
    let list: Vec<String> = widths.iter().map(|w| format!("{}px", js_number(*w))).collect();
    format!("{} {}", prefix, list.join(", "))
}

/// Build a `srcset` attribute value.
///
/// Pixel ratios form the outer loop and widths the inner one. Each candidate
/// is annotated with `width * dpr`, unrounded.
pub fn build_src_set(stripped_path: &str, options: &ImageOptions) -> String {
    let widths = options.widths.as_deref().unwrap_or_default();
    let dprs = options.dprs.as_deref().unwrap_or(DEFAULT_DPRS);

    let mut entries = Vec::with_capacity(widths.len() * dprs.len());
    for &dpr in dprs {
        for &width in widths {
            let variant = options.with_variant(dpr, width);
            let src = image_src(stripped_path, Some(&variant));
            entries.push(format!("{} {}w", src, js_number(width * dpr)));
        }
    }
    entries.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_with_max() {
        assert_eq!(
            build_sizes(&[100.0, 200.0, 300.0], Some(400.0)),
            "(max-width: 400px) 100px, 200px, 300px"
        );
    }

    #[test]
    fn test_sizes_without_max_has_leading_space() {
        assert_eq!(build_sizes(&[100.0, 200.0], None), " 100px, 200px");
    }

    #[test]
    fn test_sizes_zero_max_is_absent() {
        assert_eq!(build_sizes(&[50.0], Some(0.0)), " 50px");
    }

    #[test]
    fn test_resolve_max_width_explicit() {
        let options = ImageOptions {
            width: Some(900.0),
            widths: Some(vec![100.0, 200.0]),
            max_width: Some(640.0),
            ..Default::default()
        };
        assert_eq!(resolve_max_width(&options), Some(640.0));
    }

    #[test]
    fn test_resolve_max_width_includes_single_width() {
        let options = ImageOptions {
            width: Some(900.0),
            widths: Some(vec![100.0, 200.0]),
            ..Default::default()
        };
        assert_eq!(resolve_max_width(&options), Some(900.0));
    }

    #[test]
    fn test_resolve_max_width_from_widths() {
        let options = ImageOptions {
            widths: Some(vec![300.0, 100.0, 200.0]),
            ..Default::default()
        };
        assert_eq!(resolve_max_width(&options), Some(300.0));
    }

    #[test]
    fn test_resolve_max_width_empty() {
        assert_eq!(resolve_max_width(&ImageOptions::default()), None);
    }

    #[test]
    fn test_src_set_order() {
        let options = ImageOptions {
            widths: Some(vec![100.0, 200.0]),
            dprs: Some(vec![1.0, 2.0]),
            ..Default::default()
        };
        let entries: Vec<String> = build_src_set("cat.png", &options)
            .split(", ")
            .map(str::to_string)
            .collect();
        assert_eq!(
            entries,
            vec![
                "/cdn-cgi/image/dpr=1,fit=scale-down,format=auto,width=100,metadata=none/cat.png 100w",
                "/cdn-cgi/image/dpr=1,fit=scale-down,format=auto,width=200,metadata=none/cat.png 200w",
                "/cdn-cgi/image/dpr=2,fit=scale-down,format=auto,width=100,metadata=none/cat.png 200w",
                "/cdn-cgi/image/dpr=2,fit=scale-down,format=auto,width=200,metadata=none/cat.png 400w",
            ]
        );
    }

    #[test]
    fn test_src_set_default_dpr() {
        let options = ImageOptions {
            widths: Some(vec![320.0]),
            ..Default::default()
        };
        assert_eq!(
            build_src_set("a.jpg", &options),
            "/cdn-cgi/image/dpr=1,fit=scale-down,format=auto,width=320,metadata=none/a.jpg 320w"
        );
    }

    #[test]
    fn test_src_set_fractional_descriptor_not_rounded() {
        let options = ImageOptions {
            widths: Some(vec![101.0]),
            dprs: Some(vec![1.5]),
            ..Default::default()
        };
        assert!(build_src_set("a.jpg", &options).ends_with(" 151.5w"));
    }

    #[test]
    fn test_src_set_empty_inputs() {
        let no_widths = ImageOptions::default();
        assert_eq!(build_src_set("a.jpg", &no_widths), "");

        let no_dprs = ImageOptions {
            widths: Some(vec![100.0]),
            dprs: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(build_src_set("a.jpg", &no_dprs), "");
    }

    #[test]
    fn test_fractional_widths() {
        let options = ImageOptions {
            widths: Some(vec![100.5, 50.0]),
            ..Default::default()
        };
        let max = resolve_max_width(&options);
        assert_eq!(max, Some(100.5));
        assert_eq!(
            build_sizes(options.widths.as_deref().unwrap_or_default(), max),
            "(max-width: 100.5px) 100.5px, 50px"
        );
        assert_eq!(
            build_src_set("a.jpg", &options),
            "/cdn-cgi/image/dpr=1,fit=scale-down,format=auto,width=100.5,metadata=none/a.jpg 100.5w, \
             /cdn-cgi/image/dpr=1,fit=scale-down,format=auto,width=50,metadata=none/a.jpg 50w"
        );
    }

    #[test]
    fn test_nan_width_drops_max() {
        let options = ImageOptions {
            widths: Some(vec![100.0, f64::NAN, 300.0]),
            ..Default::default()
        };
        let max = resolve_max_width(&options);
        assert!(max.is_some_and(f64::is_nan));
        assert_eq!(build_sizes(&[100.0], max), " 100px");
    }
}
