//! Commit-template compilation and matching.
//!
//! A commit template is a literal string containing the two placeholder
//! tokens `<post_name>` and `<post_title>`, e.g.
//! `"post: <post_name> <post_title>"`. Compilation turns it into an anchored
//! pattern in which every other character matches literally and each
//! placeholder becomes a non-greedy capture. Matching a commit message
//! against the compiled template either recovers the two fields or reports
//! no match - a normal outcome, not an error.
//!
//! Templates are compiled once at startup; a template that does not contain
//! both placeholders exactly once is a configuration defect and fails
//! compilation rather than failing silently per request.

use regex::Regex;
use thiserror::Error;

/// The placeholder token captured as the post name (URL slug).
pub const POST_NAME_PLACEHOLDER: &str = "<post_name>";

/// The placeholder token captured as the human-readable post title.
pub const POST_TITLE_PLACEHOLDER: &str = "<post_title>";

/// The historical fixed-format template, `post: <X> <Y>`.
pub const FIXED_COMMIT_TEMPLATE: &str = "post: <post_name> <post_title>";

/// Errors raised when compiling a commit template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A placeholder is absent or appears more than once.
    #[error("commit template must contain {placeholder} exactly once, found {count} occurrences")]
    PlaceholderCount {
        placeholder: &'static str,
        count: usize,
    },

    /// The escaped template failed to compile into a pattern.
    #[error("commit template does not compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// The two fields extracted from a matching commit message.
///
/// Both fields are trimmed of surrounding whitespace and of literal `<`/`>`
/// characters, since templates conventionally delimit their placeholders
/// with angle brackets in the message itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFields {
    /// The post's URL slug, e.g. `hello-world`.
    pub post_name: String,
    /// The post's display title, e.g. `Hello World!`.
    pub post_title: String,
}

/// A compiled commit template.
#[derive(Debug, Clone)]
pub struct CommitTemplate {
    raw: String,
    pattern: Regex,
}

impl CommitTemplate {
    /// Compiles a commit template into an anchored matching pattern.
    ///
    /// Every character of the template matches literally except the two
    /// placeholder tokens, each of which becomes a non-greedy capture of one
    /// or more characters. The pattern only matches the *entire* commit
    /// message: leading or trailing unmatched text is a non-match.
    ///
    /// Fails unless both placeholders appear exactly once.
    ///
    /// # Examples
    ///
    /// ```
    /// use post_herald::matcher::CommitTemplate;
    ///
    /// let template = CommitTemplate::compile("post: <post_name> <post_title>").unwrap();
    ///
    /// let fields = template
    ///     .match_message("post: <hello-world> <Hello World!>")
    ///     .unwrap();
    /// assert_eq!(fields.post_name, "hello-world");
    /// assert_eq!(fields.post_title, "Hello World!");
    ///
    /// assert!(template.match_message("fix typo in README").is_none());
    /// ```
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        require_single_occurrence(template, POST_NAME_PLACEHOLDER)?;
        require_single_occurrence(template, POST_TITLE_PLACEHOLDER)?;

        // Escape the whole template first, then swap the (escape-invariant)
        // placeholder tokens for capture groups. `\A`/`\z` anchor the match
        // to the full message even when it contains newlines.
        let escaped = regex::escape(template)
            .replace(
                &regex::escape(POST_NAME_PLACEHOLDER),
                "(?P<post_name>.+?)",
            )
            .replace(
                &regex::escape(POST_TITLE_PLACEHOLDER),
                "(?P<post_title>.+?)",
            );
        let pattern = Regex::new(&format!(r"\A{escaped}\z"))?;

        Ok(CommitTemplate {
            raw: template.to_string(),
            pattern,
        })
    }

    /// The historical fixed-format mode: accepts only `post: <X> <Y>`.
    pub fn fixed() -> Self {
        Self::compile(FIXED_COMMIT_TEMPLATE).expect("fixed template is well-formed")
    }

    /// Returns the template source string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Matches a commit message against the template.
    ///
    /// Returns the extracted fields on a full-message match, `None`
    /// otherwise. With adjacent placeholders the left one captures the
    /// minimum possible (non-greedy split).
    pub fn match_message(&self, message: &str) -> Option<CommitFields> {
        let captures = self.pattern.captures(message)?;

        let post_name = trim_field(captures.name("post_name")?.as_str());
        let post_title = trim_field(captures.name("post_title")?.as_str());

        Some(CommitFields {
            post_name,
            post_title,
        })
    }
}

fn require_single_occurrence(
    template: &str,
    placeholder: &'static str,
) -> Result<(), TemplateError> {
    let count = template.matches(placeholder).count();
    if count != 1 {
        return Err(TemplateError::PlaceholderCount { placeholder, count });
    }
    Ok(())
}

/// Strips surrounding whitespace and literal angle brackets from a capture.
fn trim_field(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '<' || c == '>')
        .to_string()
}
