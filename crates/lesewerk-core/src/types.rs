// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Lesewerk extraction pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize};

use crate::error::{LesewerkError, Result};

/// Closed classification of an input document.
///
/// Derived once per document from its media type; selects the extraction
/// strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Pdf,
    Text,
    /// No strategy exists for this media type (or none was known).
    Unsupported,
}

impl ContentKind {
    /// Classify a media type string.
    ///
    /// `image/*` → Image, `application/pdf` → Pdf, `text/*` → Text, anything
    /// else (including `None`) → Unsupported. Parameters such as
    /// `; charset=utf-8` and ASCII case are ignored. Never fails.
    pub fn from_media_type(media_type: Option<&str>) -> Self {
        let Some(raw) = media_type else {
            return Self::Unsupported;
        };
        let essence = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") {
            Self::Image
        } else if essence == "application/pdf" {
            Self::Pdf
        } else if essence.starts_with("text/") {
            Self::Text
        } else {
            Self::Unsupported
        }
    }

    /// Wire name used in serialized results.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Text => "text",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Recognition output -------------------------------------------------------

/// One recognized line of text with the engine's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    pub text: String,
    /// Engine confidence, expected in [0.0, 1.0].
    pub confidence: f64,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// A block (paragraph-like region) of recognized lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedBlock {
    pub lines: Vec<RecognizedLine>,
}

impl RecognizedBlock {
    pub fn new(lines: Vec<RecognizedLine>) -> Self {
        Self { lines }
    }

    /// Lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Hierarchical output of a text-recognition engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    pub blocks: Vec<RecognizedBlock>,
}

impl RecognizedText {
    pub fn new(blocks: Vec<RecognizedBlock>) -> Self {
        Self { blocks }
    }

    /// Full recognized text: blocks joined with `\n`, each block's lines
    /// joined with `\n`.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(RecognizedBlock::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every line across every block, in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &RecognizedLine> {
        self.blocks.iter().flat_map(|block| block.lines.iter())
    }

    /// Total number of lines across all blocks.
    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(|block| block.lines.len()).sum()
    }
}

/// A visual label assigned to a document by the labeling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentLabel {
    pub label: String,
    pub confidence: f64,
}

impl ContentLabel {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

// -- Metadata -----------------------------------------------------------------

/// A single metadata value.
///
/// Serialized untagged: integers and floats as JSON numbers, timestamps as
/// RFC 3339 strings, text as plain strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl MetadataValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for MetadataValue {
    /// Saturates at `i64::MAX`.
    fn from(value: u64) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<DateTime<Utc>> for MetadataValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Kind-specific metadata, keyed by name. Ordered for deterministic output.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Well-known metadata keys.
pub mod keys {
    pub const SIZE: &str = "size";
    pub const MODIFIED_AT: &str = "modifiedAt";
    pub const CHANGED_AT: &str = "changedAt";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const PAGE_COUNT: &str = "pageCount";
    pub const WORD_COUNT: &str = "wordCount";
    pub const CHARACTER_COUNT: &str = "characterCount";
    pub const LINE_COUNT: &str = "lineCount";
    pub const LANGUAGE: &str = "language";
}

/// Output of the filesystem stat capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// File size in bytes.
    pub size: u64,
    /// Last content modification.
    pub modified_at: DateTime<Utc>,
    /// Creation / status-change time, whichever the platform reports.
    pub changed_at: DateTime<Utc>,
}

// -- Aggregate result ---------------------------------------------------------

/// The single immutable result of processing one document.
///
/// Constructed once, when every stage has completed; `processing_time`
/// records that moment. Serializes with camelCase field names:
/// `fileName`, `fileType`, `extractedText`, `confidence`, `contentLabels`,
/// `metadata`, `processingTime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    file_name: String,
    file_type: ContentKind,
    extracted_text: String,
    confidence: f64,
    content_labels: Vec<ContentLabel>,
    metadata: Metadata,
    processing_time: DateTime<Utc>,
}

impl AggregateResult {
    /// Assemble a result, stamping `processing_time` with the current time.
    ///
    /// A NaN confidence is recorded as 0.0; anything else is clamped into
    /// [0.0, 1.0].
    pub fn new(
        file_name: impl Into<String>,
        file_type: ContentKind,
        extracted_text: String,
        confidence: f64,
        content_labels: Vec<ContentLabel>,
        metadata: Metadata,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_type,
            extracted_text,
            confidence: clamp_unit(confidence),
            content_labels,
            metadata,
            processing_time: Utc::now(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_type(&self) -> ContentKind {
        self.file_type
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn content_labels(&self) -> &[ContentLabel] {
        &self.content_labels
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn processing_time(&self) -> DateTime<Utc> {
        self.processing_time
    }

    /// Whether two results agree in every field except `processing_time`.
    pub fn same_content_as(&self, other: &Self) -> bool {
        self.file_name == other.file_name
            && self.file_type == other.file_type
            && self.extracted_text == other.extracted_text
            && self.confidence == other.confidence
            && self.content_labels == other.content_labels
            && self.metadata == other.metadata
    }

    // -- Serialization --------------------------------------------------------

    /// Canonical map-shaped form, suitable for transport or display.
    pub fn to_map(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(LesewerkError::Serialization(serde_json::Error::custom(
                "aggregate result did not serialize to an object",
            ))),
        }
    }

    /// Compact JSON encoding of [`to_map`](Self::to_map).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON encoding, for logs and diagnostics.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a result previously produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Map any float into [0.0, 1.0]; NaN becomes 0.0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_media_types() {
        assert_eq!(ContentKind::from_media_type(Some("image/jpeg")), ContentKind::Image);
        assert_eq!(ContentKind::from_media_type(Some("application/pdf")), ContentKind::Pdf);
        assert_eq!(ContentKind::from_media_type(Some("text/markdown")), ContentKind::Text);
        assert_eq!(
            ContentKind::from_media_type(Some("application/octet-stream")),
            ContentKind::Unsupported
        );
        assert_eq!(ContentKind::from_media_type(None), ContentKind::Unsupported);
    }

    #[test]
    fn classify_ignores_parameters_and_case() {
        assert_eq!(
            ContentKind::from_media_type(Some("Text/Plain; charset=utf-8")),
            ContentKind::Text
        );
        assert_eq!(
            ContentKind::from_media_type(Some("APPLICATION/PDF")),
            ContentKind::Pdf
        );
    }

    #[test]
    fn pdf_match_is_exact() {
        assert_eq!(
            ContentKind::from_media_type(Some("application/pdfx")),
            ContentKind::Unsupported
        );
    }

    #[test]
    fn recognized_text_joins_lines_and_blocks() {
        let text = RecognizedText::new(vec![
            RecognizedBlock::new(vec![
                RecognizedLine::new("Invoice", 0.9),
                RecognizedLine::new("No. 42", 0.8),
            ]),
            RecognizedBlock::new(vec![RecognizedLine::new("Total: 10 EUR", 0.7)]),
        ]);
        assert_eq!(text.text(), "Invoice\nNo. 42\nTotal: 10 EUR");
        assert_eq!(text.line_count(), 3);
    }

    #[test]
    fn metadata_value_untagged_round_trip() {
        let mut metadata = Metadata::new();
        metadata.insert("size".into(), MetadataValue::from(1024u64));
        metadata.insert("ratio".into(), MetadataValue::from(2.0));
        metadata.insert("language".into(), MetadataValue::from("en"));
        metadata.insert(
            "modifiedAt".into(),
            MetadataValue::from(
                DateTime::parse_from_rfc3339("2026-03-01T12:30:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
        );

        let json = serde_json::to_string(&metadata).unwrap();
        let parsed: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metadata);
        assert_eq!(parsed["size"].as_i64(), Some(1024));
        assert_eq!(parsed["ratio"].as_f64(), Some(2.0));
        assert!(parsed["modifiedAt"].as_timestamp().is_some());
    }

    #[test]
    fn aggregate_result_clamps_confidence() {
        let nan = AggregateResult::new("a", ContentKind::Image, String::new(), f64::NAN, vec![], Metadata::new());
        assert_eq!(nan.confidence(), 0.0);

        let high = AggregateResult::new("b", ContentKind::Image, String::new(), 1.5, vec![], Metadata::new());
        assert_eq!(high.confidence(), 1.0);
    }

    #[test]
    fn aggregate_result_field_names() {
        let result = AggregateResult::new(
            "notes.txt",
            ContentKind::Text,
            "hello".into(),
            1.0,
            vec![],
            Metadata::new(),
        );
        let map = result.to_map().unwrap();
        for key in [
            "fileName",
            "fileType",
            "extractedText",
            "confidence",
            "contentLabels",
            "metadata",
            "processingTime",
        ] {
            assert!(map.contains_key(key), "missing {key}");
        }
        assert_eq!(map["fileType"], serde_json::json!("text"));
    }

    #[test]
    fn aggregate_result_json_round_trip_preserves_precision() {
        let mut metadata = Metadata::new();
        metadata.insert(keys::WORD_COUNT.into(), MetadataValue::from(6usize));
        let result = AggregateResult::new(
            "scan.png",
            ContentKind::Image,
            "line one\nline two".into(),
            0.123_456_789_012_345_67,
            vec![ContentLabel::new("Document", 0.987_654_321_098_765_4)],
            metadata,
        );

        let json = result.to_json().unwrap();
        let parsed = AggregateResult::from_json(&json).unwrap();
        assert_eq!(parsed, result);
        assert_eq!(parsed.confidence().to_bits(), result.confidence().to_bits());
    }
}
