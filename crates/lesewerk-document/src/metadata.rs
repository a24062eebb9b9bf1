// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metadata normalisation — one flat key/value map per document.

use lesewerk_core::types::{FileStats, Metadata, MetadataValue, keys};

use crate::strategy::Evidence;

/// Build the metadata map for an extraction.
///
/// Filesystem fields come from `stats` when the document was read from disk;
/// otherwise `size` falls back to `byte_len` and the timestamps are omitted.
/// Text documents carry only their derived statistics.
pub fn normalize(evidence: &Evidence, stats: Option<&FileStats>, byte_len: usize) -> Metadata {
    let mut metadata = Metadata::new();

    match evidence {
        Evidence::Recognized { dimensions, .. } => {
            insert_file_fields(&mut metadata, stats, byte_len);
            if let Some((width, height)) = dimensions {
                metadata.insert(keys::WIDTH.into(), MetadataValue::from(u64::from(*width)));
                metadata.insert(keys::HEIGHT.into(), MetadataValue::from(u64::from(*height)));
            }
        }
        Evidence::Pages { count } => {
            insert_file_fields(&mut metadata, stats, byte_len);
            metadata.insert(keys::PAGE_COUNT.into(), MetadataValue::from(u64::from(*count)));
        }
        Evidence::Direct { stats: text } => {
            metadata.insert(keys::WORD_COUNT.into(), text.word_count.into());
            metadata.insert(keys::CHARACTER_COUNT.into(), text.character_count.into());
            metadata.insert(keys::LINE_COUNT.into(), text.line_count.into());
            metadata.insert(keys::LANGUAGE.into(), text.language.as_str().into());
        }
    }

    metadata
}

fn insert_file_fields(metadata: &mut Metadata, stats: Option<&FileStats>, byte_len: usize) {
    match stats {
        Some(stats) => {
            metadata.insert(keys::SIZE.into(), stats.size.into());
            metadata.insert(keys::MODIFIED_AT.into(), stats.modified_at.into());
            metadata.insert(keys::CHANGED_AT.into(), stats.changed_at.into());
        }
        None => {
            metadata.insert(keys::SIZE.into(), byte_len.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use lesewerk_core::types::RecognizedText;

    use super::*;
    use crate::strategy::TextStats;

    fn file_stats() -> FileStats {
        FileStats {
            size: 2048,
            modified_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            changed_at: Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap(),
        }
    }

    #[test]
    fn image_with_stats_and_dimensions() {
        let evidence = Evidence::Recognized {
            text: RecognizedText::default(),
            dimensions: Some((640, 480)),
        };
        let stats = file_stats();
        let metadata = normalize(&evidence, Some(&stats), 10);

        assert_eq!(metadata[keys::SIZE].as_i64(), Some(2048));
        assert_eq!(metadata[keys::MODIFIED_AT].as_timestamp(), Some(stats.modified_at));
        assert_eq!(metadata[keys::CHANGED_AT].as_timestamp(), Some(stats.changed_at));
        assert_eq!(metadata[keys::WIDTH].as_i64(), Some(640));
        assert_eq!(metadata[keys::HEIGHT].as_i64(), Some(480));
        assert_eq!(metadata.len(), 5);
    }

    #[test]
    fn in_memory_image_without_header() {
        let evidence = Evidence::Recognized {
            text: RecognizedText::default(),
            dimensions: None,
        };
        let metadata = normalize(&evidence, None, 10);

        assert_eq!(metadata[keys::SIZE].as_i64(), Some(10));
        assert!(!metadata.contains_key(keys::MODIFIED_AT));
        assert!(!metadata.contains_key(keys::WIDTH));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn pdf_has_file_fields_and_page_count() {
        let metadata = normalize(&Evidence::Pages { count: 7 }, Some(&file_stats()), 10);
        let mut keys_seen: Vec<&str> = metadata.keys().map(String::as_str).collect();
        keys_seen.sort_unstable();

        assert_eq!(keys_seen, ["changedAt", "modifiedAt", "pageCount", "size"]);
        assert_eq!(metadata[keys::PAGE_COUNT].as_i64(), Some(7));
    }

    #[test]
    fn text_has_only_derived_fields() {
        let stats = TextStats::compute("The quick fox\nis the best.\n", &[" the ".into()]);
        let metadata = normalize(&Evidence::Direct { stats }, Some(&file_stats()), 27);

        assert_eq!(metadata[keys::WORD_COUNT].as_i64(), Some(6));
        assert_eq!(metadata[keys::CHARACTER_COUNT].as_i64(), Some(27));
        assert_eq!(metadata[keys::LINE_COUNT].as_i64(), Some(3));
        assert_eq!(metadata[keys::LANGUAGE].as_str(), Some("en"));
        assert!(!metadata.contains_key(keys::SIZE));
    }
}
