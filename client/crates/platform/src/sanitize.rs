//! Input Sanitization
//!
//! Removes markup from user-typed values before they are stored or echoed.
//!
//! - [`sanitize_input`]: plain text. Every tag is stripped and the content of
//!   executable elements (`script`, `style`, ...) is dropped entirely.
//! - [`sanitize_html`]: rich text destined for raw rendering. Only
//!   `b, i, em, strong, a, p, br` survive, carrying only `href`/`target`.
//!
//! Stripping repeats until the text stops changing, so removing one tag can
//! never splice a new one together. Any `<` left afterwards is escaped.
//!
//! Both are pure and never fail.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// Tags kept by [`sanitize_html`]
pub const ALLOWED_TAGS: &[&str] = &["b", "i", "em", "strong", "a", "p", "br"];

/// Attributes kept on allowed tags
pub const ALLOWED_ATTRS: &[&str] = &["href", "target"];

/// Schemes a kept `href` may use. Relative URLs carry no scheme.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Elements removed together with everything between their tags
const DANGEROUS_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "svg", "math",
];

static DANGEROUS_BLOCK: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DANGEROUS_ELEMENTS
        .iter()
        .filter_map(|element| {
            Regex::new(&format!(
                r"(?is)<\s*{element}\b[^>]*>.*?<\s*/\s*{element}\s*>|<\s*{element}\b[^>]*/?>"
            ))
            .ok()
        })
        .collect()
});

static COMMENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").ok());

static TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9-]*)([^>]*)>").ok());

static ATTR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).ok()
});

static ENTITY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)&#x([0-9a-f]+);?|&#([0-9]+);?|&(colon|tab|newline);").ok()
});

/// Strip markup and surrounding whitespace from a plain-text value
///
/// ```rust
/// use platform::sanitize::sanitize_input;
///
/// assert_eq!(sanitize_input("  <script>alert(1)</script>Hola  "), "Hola");
/// assert_eq!(sanitize_input("<b>bold</b> move"), "bold move");
/// ```
pub fn sanitize_input(raw: &str) -> String {
    let text = strip_markup(raw.trim(), |_| false);
    text.replace('<', "&lt;").trim().to_string()
}

/// Sanitize a loosely-typed value: strings are cleaned, everything else is
/// returned unchanged
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_input(&s)),
        other => other,
    }
}

/// Keep only whitelisted inline-formatting tags and attributes
///
/// ```rust
/// use platform::sanitize::sanitize_html;
///
/// let clean = sanitize_html(r#"<p onclick="x()">Hi <a href="/p/1" style="c">there</a></p>"#);
/// assert_eq!(clean, r#"<p>Hi <a href="/p/1">there</a></p>"#);
/// ```
pub fn sanitize_html(html: &str) -> String {
    let Some(tag) = TAG.as_ref() else {
        return sanitize_input(html);
    };
    let stripped = strip_markup(html.trim(), is_allowed_tag);

    let mut out = String::with_capacity(stripped.len());
    let mut last = 0;
    for caps in tag.captures_iter(&stripped) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&stripped[last..whole.start()].replace('<', "&lt;"));
        match rebuild_tag(&caps) {
            Some(rebuilt) => out.push_str(&rebuilt),
            None => out.push_str(&whole.as_str().replace('<', "&lt;")),
        }
        last = whole.end();
    }
    out.push_str(&stripped[last..].replace('<', "&lt;"));
    out.trim().to_string()
}

fn is_allowed_tag(name: &str) -> bool {
    ALLOWED_TAGS.contains(&name.to_ascii_lowercase().as_str())
}

/// Remove comments, executable elements and every tag `keep` rejects, until
/// nothing more matches
fn strip_markup(input: &str, keep: impl Fn(&str) -> bool) -> String {
    let mut current = input.to_string();
    loop {
        let mut next = strip_dangerous(&current);
        if let Some(tag) = TAG.as_ref() {
            next = tag
                .replace_all(&next, |caps: &Captures| {
                    if keep(&caps[2]) {
                        caps[0].to_string()
                    } else {
                        String::new()
                    }
                })
                .into_owned();
        }
        // Every pass only removes text, so this terminates.
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_dangerous(input: &str) -> String {
    let mut result = match COMMENT.as_ref() {
        Some(comment) => comment.replace_all(input, "").into_owned(),
        None => input.to_string(),
    };
    for block in DANGEROUS_BLOCK.iter() {
        result = block.replace_all(&result, "").into_owned();
    }
    result
}

/// Canonical form of an allowed tag, `None` for anything else
fn rebuild_tag(caps: &Captures) -> Option<String> {
    let name = caps[2].to_ascii_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }
    if !caps[1].is_empty() {
        return Some(format!("</{name}>"));
    }
    let attrs = kept_attributes(&caps[3]);
    if attrs.is_empty() {
        Some(format!("<{name}>"))
    } else {
        Some(format!("<{name} {}>", attrs.join(" ")))
    }
}

fn kept_attributes(raw: &str) -> Vec<String> {
    let Some(attr) = ATTR.as_ref() else {
        return Vec::new();
    };
    attr.captures_iter(raw)
        .filter_map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            if !ALLOWED_ATTRS.contains(&name.as_str()) {
                return None;
            }
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str())
                .unwrap_or("");
            if name == "href" && !is_safe_url(value) {
                return None;
            }
            let escaped = value
                .replace('"', "&quot;")
                .replace('<', "&lt;")
                .replace('>', "&gt;");
            Some(format!("{name}=\"{escaped}\""))
        })
        .collect()
}

/// `true` for relative URLs and for [`ALLOWED_URL_SCHEMES`]
///
/// Character references are decoded first, the way a browser reads the
/// attribute.
fn is_safe_url(value: &str) -> bool {
    let normalized: String = decode_entities(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let Some(colon) = normalized.find(':') else {
        return true;
    };
    // A `:` after the path, query or fragment starts is not a scheme.
    if normalized
        .find(['/', '?', '#'])
        .is_some_and(|boundary| boundary < colon)
    {
        return true;
    }
    ALLOWED_URL_SCHEMES.contains(&&normalized[..colon])
}

fn decode_entities(value: &str) -> String {
    let Some(entity) = ENTITY.as_ref() else {
        return value.to_string();
    };
    entity
        .replace_all(value, |caps: &Captures| {
            let code = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok()
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok()
            } else {
                match caps[3].to_ascii_lowercase().as_str() {
                    "colon" => Some(u32::from(':')),
                    "tab" => Some(u32::from('\t')),
                    _ => Some(u32::from('\n')),
                }
            };
            code.and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
                .to_string()
        })
        .into_owned()
}
