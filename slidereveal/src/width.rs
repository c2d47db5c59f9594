//! Width option to CSS length.

use crate::config::Width;

/// Width used when the option holds neither a number nor a string.
pub const DEFAULT_WIDTH: &str = "300px";

/// Resolve the width option into the CSS length used for the panel width and offset.
///
/// Numbers become absolute pixels. Strings are trimmed; a trailing `%` is
/// reinterpreted as viewport width (`"40%"` is `40vw`, not 40% of the content
/// container). Any other string loses one leading sign and passes through, so
/// `"20rem"`, `"40vw"` and `"10em"` are returned unchanged.
pub fn resolve_width(width: &Width) -> String {
    match width {
        Width::Px(px) => format!("{}px", px.abs()),
        Width::Css(css) => {
            let css = css.trim();
            if css.ends_with('%') {
                if let Some(num) = parse_float_prefix(css) {
                    return format!("{}vw", num);
                }
            }
            css.strip_prefix(&['-', '+'][..]).unwrap_or(css).to_string()
        }
        Width::Unspecified => DEFAULT_WIDTH.to_string(),
    }
}

/// Parse the longest leading decimal number, ignoring leading whitespace.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
