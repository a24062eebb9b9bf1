// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text strategy — verbatim read plus word/character/line statistics and a
// coarse English marker check.

use async_trait::async_trait;
use lesewerk_core::error::{EngineError, ExtractionStage, LesewerkError, Result};
use lesewerk_core::types::ContentKind;
use tracing::{debug, instrument};

use super::{Evidence, ExtractionContext, ExtractionStrategy, RawExtraction};
use crate::source::Document;

/// Language reported when a marker matches.
pub const LANGUAGE_ENGLISH: &str = "en";
/// Language reported when no marker matches.
pub const LANGUAGE_UNKNOWN: &str = "unknown";

/// Statistics derived from a text document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStats {
    pub word_count: usize,
    pub character_count: usize,
    pub line_count: usize,
    pub language: String,
}

impl TextStats {
    pub fn compute(content: &str, markers: &[String]) -> Self {
        Self {
            word_count: word_count(content),
            character_count: character_count(content),
            line_count: line_count(content),
            language: detect_language(content, markers).to_owned(),
        }
    }
}

/// Reads UTF-8 text verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextStrategy;

#[async_trait]
impl ExtractionStrategy for TextStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Text
    }

    #[instrument(skip_all, fields(file = %document.file_name(), bytes = document.len()))]
    async fn extract(
        &self,
        document: &Document,
        ctx: &ExtractionContext<'_>,
    ) -> Result<RawExtraction> {
        let content = std::str::from_utf8(document.bytes()).map_err(|err| {
            LesewerkError::extraction(
                ExtractionStage::ReadText,
                EngineError::InvalidInput(format!("not valid UTF-8: {err}")),
            )
        })?;

        let stats = TextStats::compute(content, &ctx.config.language_markers);
        debug!(
            words = stats.word_count,
            lines = stats.line_count,
            language = %stats.language,
            "text read"
        );

        Ok(RawExtraction {
            text: content.to_owned(),
            labels: Vec::new(),
            evidence: Evidence::Direct { stats },
        })
    }
}

/// Number of maximal runs of non-whitespace characters.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Number of Unicode scalar values, whitespace and line terminators included.
pub fn character_count(content: &str) -> usize {
    content.chars().count()
}

/// Number of segments produced by splitting on `\n`.
///
/// This is a plain split, not a count of non-empty lines: a trailing newline
/// yields one trailing empty segment, which is counted, and empty content is
/// one (empty) line. `"a\nb\n"` therefore has 3 lines. A `\r` before the
/// `\n` stays part of its segment.
pub fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// `"en"` if any marker occurs in `content`, otherwise `"unknown"`.
///
/// Matching is a case-sensitive substring test; markers carry their own
/// surrounding spaces (`" the "`). Not a general language identifier.
pub fn detect_language(content: &str, markers: &[String]) -> &'static str {
    let matched = markers
        .iter()
        .filter(|marker| !marker.is_empty())
        .any(|marker| content.contains(marker.as_str()));
    if matched {
        LANGUAGE_ENGLISH
    } else {
        LANGUAGE_UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use lesewerk_core::config::PipelineConfig;

    use super::*;

    fn default_markers() -> Vec<String> {
        PipelineConfig::default().language_markers
    }

    #[test]
    fn quick_fox_statistics() {
        let content = "The quick fox\nis the best.\n";
        let stats = TextStats::compute(content, &default_markers());

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.line_count, 3);
        assert_eq!(stats.character_count, content.len());
        assert_eq!(stats.character_count, 27);
        assert_eq!(stats.language, "en");
    }

    #[test]
    fn empty_content() {
        let stats = TextStats::compute("", &default_markers());
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.character_count, 0);
        assert_eq!(stats.line_count, 1);
        assert_eq!(stats.language, "unknown");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(word_count("  alpha \t\t beta\n\n\ngamma  "), 3);
        assert_eq!(word_count(" \n\t "), 0);
    }

    #[test]
    fn trailing_newline_counts_as_line() {
        assert_eq!(line_count("one"), 1);
        assert_eq!(line_count("one\n"), 2);
        assert_eq!(line_count("one\ntwo"), 2);
        assert_eq!(line_count("\n\n"), 3);
        assert_eq!(line_count("windows\r\nline\r\n"), 3);
    }

    #[test]
    fn characters_not_bytes() {
        assert_eq!(character_count("Grüße"), 5);
        assert_eq!("Grüße".len(), 7);
    }

    #[test]
    fn language_needs_surrounding_spaces() {
        let markers = default_markers();
        assert_eq!(detect_language("bread and butter", &markers), "en");
        assert_eq!(detect_language("this is it", &markers), "en");
        // Marker at the very start has no leading space.
        assert_eq!(detect_language("the end", &markers), "unknown");
        assert_eq!(detect_language("theory andante island", &markers), "unknown");
        assert_eq!(detect_language("Der Hund und die Katze", &markers), "unknown");
    }

    #[test]
    fn custom_markers() {
        let markers = vec![" und ".to_string()];
        assert_eq!(detect_language("Der Hund und die Katze", &markers), "en");
        assert_eq!(detect_language("Der Hund und die Katze", &[]), "unknown");
    }
}
