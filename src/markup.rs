//! HTML fragments carrying one highlighted `<span class="sel">` span.
//!
//! Dictionary examples and the transliteration service both mark the word of
//! interest this way. The contract is narrow: exactly one such span, no
//! nested spans inside it. Anything else is reported as an error instead of
//! being guessed at.

use crate::error::{ClozeError, Result};
use lazy_static::lazy_static;
use regex::{Match, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref SEL_SPAN: Regex =
        Regex::new(r#"(?s)<span\b[^>]*\bclass\s*=\s*"sel"[^>]*>(.*?)</span>"#).unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
}

/// Raw markup as returned by the lookup services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    pub fn new(markup: impl Into<String>) -> Self {
        Markup(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whole match and inner content of the single highlighted span.
    fn highlighted_span(&self) -> Result<(Match<'_>, Match<'_>)> {
        let mut spans = SEL_SPAN.captures_iter(&self.0);
        let first = spans
            .next()
            .ok_or_else(|| ClozeError::MissingHighlight(self.0.clone()))?;
        let extra = spans.count();
        if extra > 0 {
            return Err(ClozeError::MultipleHighlights {
                count: extra + 1,
                markup: self.0.clone(),
            });
        }
        // Both groups always participate in a match.
        match (first.get(0), first.get(1)) {
            (Some(whole), Some(inner)) => Ok((whole, inner)),
            _ => Err(ClozeError::MissingHighlight(self.0.clone())),
        }
    }

    /// Plain text of the highlighted span.
    pub fn highlighted_text(&self) -> Result<String> {
        let (_, inner) = self.highlighted_span()?;
        Ok(strip_tags(inner.as_str()))
    }

    /// Copy of the markup with the highlighted span (tags included) replaced.
    pub fn replace_highlighted_span(&self, replacement: &str) -> Result<String> {
        let (whole, _) = self.highlighted_span()?;
        let mut out = String::with_capacity(self.0.len() + replacement.len());
        out.push_str(&self.0[..whole.start()]);
        out.push_str(replacement);
        out.push_str(&self.0[whole.end()..]);
        Ok(out)
    }

    /// Text content of the whole fragment.
    pub fn plain_text(&self) -> String {
        strip_tags(&self.0)
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Markup {
    fn from(s: &str) -> Self {
        Markup::new(s)
    }
}

impl From<String> for Markup {
    fn from(s: String) -> Self {
        Markup(s)
    }
}

fn strip_tags(html: &str) -> String {
    decode_entities(&TAG.replace_all(html, ""))
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{00A0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"طلع <span class="sel">القمر</span> في السماء"#;

    #[test]
    fn extracts_highlighted_text() {
        let markup = Markup::new(EXAMPLE);
        assert_eq!(markup.highlighted_text().unwrap(), "القمر");
    }

    #[test]
    fn inner_tags_are_dropped() {
        let markup = Markup::new(r#"<span class="sel"><b>قمر</b></span>"#);
        assert_eq!(markup.highlighted_text().unwrap(), "قمر");
    }

    #[test]
    fn extra_attributes_are_allowed() {
        let markup = Markup::new(r#"a <span dir="rtl" class="sel">قمر</span> b"#);
        assert_eq!(markup.highlighted_text().unwrap(), "قمر");
    }

    #[test]
    fn other_spans_are_not_highlights() {
        let markup = Markup::new(r#"<span class="src">x</span> <span class="sel">y</span>"#);
        assert_eq!(markup.highlighted_text().unwrap(), "y");
    }

    #[test]
    fn missing_highlight_is_an_error() {
        let markup = Markup::new("no span here");
        assert!(matches!(
            markup.highlighted_text(),
            Err(ClozeError::MissingHighlight(_))
        ));
    }

    #[test]
    fn two_highlights_are_an_error() {
        let markup = Markup::new(r#"<span class="sel">a</span><span class="sel">b</span>"#);
        assert!(matches!(
            markup.replace_highlighted_span("x"),
            Err(ClozeError::MultipleHighlights { count: 2, .. })
        ));
    }

    #[test]
    fn replaces_only_the_span() {
        let markup = Markup::new(EXAMPLE);
        assert_eq!(
            markup.replace_highlighted_span("___").unwrap(),
            "طلع ___ في السماء"
        );
    }

    #[test]
    fn plain_text_strips_tags_and_entities() {
        let markup = Markup::new(r#"<em>Tom &amp; Jerry</em> <span class="sel">ran</span>"#);
        assert_eq!(markup.plain_text(), "Tom & Jerry ran");
    }
}
