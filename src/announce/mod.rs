//! Announcement rendering from the configured post template.
//!
//! The post template is a literal string with `{key}`-style placeholders
//! drawn from a fixed, enumerated set of keys. Substitution is explicit: a
//! placeholder with no supplied value is an error, and the template is
//! validated against the known keys at configuration load so a typo fails
//! startup instead of a request.
//!
//! No markup escaping is performed. If the transport interprets markup
//! (Markdown parse mode), field values extracted from commit messages flow
//! into it verbatim.

use std::collections::HashMap;
use thiserror::Error;

/// The placeholder keys the renderer can supply.
pub const KNOWN_KEYS: [&str; 4] = ["blog_owner_name", "blog_url", "post_name", "post_title"];

/// Errors raised when validating or rendering an announcement template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The template references a placeholder with no supplied value.
    #[error("no value supplied for placeholder {{{key}}}")]
    MissingField { key: String },

    /// The template references a placeholder outside the known key set.
    #[error("announcement template references unknown placeholder {{{key}}}")]
    UnknownKey { key: String },

    /// A `{` has no matching `}`.
    #[error("unmatched '{{' in announcement template")]
    UnclosedBrace,
}

/// Renders a template by substituting every `{key}` token from `fields`.
///
/// Keys present in `fields` but absent from the template are ignored; a
/// `{key}` token with no entry in `fields` fails with
/// [`RenderError::MissingField`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use post_herald::announce::render;
///
/// let fields = HashMap::from([("post_title", "Hello World!".to_string())]);
/// let text = render("New post: {post_title}", &fields).unwrap();
/// assert_eq!(text, "New post: Hello World!");
/// ```
pub fn render(template: &str, fields: &HashMap<&str, String>) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            return Err(RenderError::UnclosedBrace);
        };

        let key = &after[..end];
        match fields.get(key) {
            Some(value) => out.push_str(value),
            None => {
                return Err(RenderError::MissingField {
                    key: key.to_string(),
                })
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Validates an announcement template at configuration load.
///
/// Every `{key}` token must name one of [`KNOWN_KEYS`]; a template that
/// passes validation renders without error whenever all known keys are
/// supplied.
pub fn validate_template(template: &str) -> Result<(), RenderError> {
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            return Err(RenderError::UnclosedBrace);
        };

        let key = &after[..end];
        if !KNOWN_KEYS.contains(&key) {
            return Err(RenderError::UnknownKey {
                key: key.to_string(),
            });
        }
        rest = &after[end + 1..];
    }

    Ok(())
}
