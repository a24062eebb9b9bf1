// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-kind dispatch — media-type sniffing, classification, and strategy
// selection.

use lesewerk_core::error::{LesewerkError, Result};
use lesewerk_core::types::ContentKind;
use tracing::debug;

use crate::source::Document;
use crate::strategy::image::ImageStrategy;
use crate::strategy::pdf::PdfStrategy;
use crate::strategy::text::TextStrategy;
use crate::strategy::ExtractionStrategy;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Best-effort media type from the leading bytes of a document.
///
/// Checks, in order: the PDF header, UTF-8 text without NUL bytes
/// (`text/plain`), then the image signatures known to the `image` crate.
/// Returns `None` when nothing matches.
pub fn sniff_media_type(data: &[u8]) -> Option<String> {
    if data.starts_with(PDF_MAGIC) {
        return Some("application/pdf".to_owned());
    }
    if looks_like_text(data) {
        return Some("text/plain".to_owned());
    }
    match image::guess_format(data) {
        Ok(format) => Some(format.to_mime_type().to_owned()),
        Err(_) => {
            debug!(bytes = data.len(), "no media type recognised");
            None
        }
    }
}

fn looks_like_text(data: &[u8]) -> bool {
    !data.contains(&0) && std::str::from_utf8(data).is_ok()
}

/// Classify a document from its media type. Never fails.
pub fn classify(document: &Document) -> ContentKind {
    ContentKind::from_media_type(document.media_type())
}

/// The strategy that handles `kind`.
///
/// Fails with `UnsupportedContentKind` for [`ContentKind::Unsupported`];
/// `media_type` is only used for the error message.
pub fn select_strategy(
    kind: ContentKind,
    media_type: Option<&str>,
) -> Result<&'static dyn ExtractionStrategy> {
    match kind {
        ContentKind::Image => Ok(&ImageStrategy),
        ContentKind::Pdf => Ok(&PdfStrategy),
        ContentKind::Text => Ok(&TextStrategy),
        ContentKind::Unsupported => Err(LesewerkError::unsupported(media_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smallest valid PNG signature plus the start of an IHDR chunk.
    const PNG_HEADER: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
        b'R',
    ];

    #[test]
    fn sniffs_pdf() {
        assert_eq!(sniff_media_type(b"%PDF-1.4\n").as_deref(), Some("application/pdf"));
    }

    #[test]
    fn sniffs_png() {
        assert_eq!(sniff_media_type(PNG_HEADER).as_deref(), Some("image/png"));
    }

    #[test]
    fn sniffs_jpeg() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(sniff_media_type(&jpeg).as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn sniffs_utf8_text() {
        assert_eq!(
            sniff_media_type("Grüße aus Köln\n".as_bytes()).as_deref(),
            Some("text/plain")
        );
    }

    #[test]
    fn binary_is_unknown() {
        assert_eq!(sniff_media_type(&[0x00, 0x13, 0x37, 0xFE, 0xFF]), None);
    }

    #[test]
    fn classification_table() {
        let cases = [
            ("image/jpeg", ContentKind::Image),
            ("application/pdf", ContentKind::Pdf),
            ("text/markdown", ContentKind::Text),
            ("application/octet-stream", ContentKind::Unsupported),
        ];
        for (media_type, expected) in cases {
            let doc = Document::from_bytes("x", Vec::new()).with_media_type(media_type);
            assert_eq!(classify(&doc), expected, "{media_type}");
        }
    }

    #[test]
    fn missing_media_type_is_unsupported() {
        let doc = Document::from_bytes("blob", vec![0u8, 1, 2]).without_media_type();
        assert_eq!(classify(&doc), ContentKind::Unsupported);
    }

    #[test]
    fn unsupported_has_no_strategy() {
        let err = select_strategy(ContentKind::Unsupported, Some("application/octet-stream"))
            .err()
            .expect("unsupported kind must not select a strategy");
        match err {
            LesewerkError::UnsupportedContentKind { media_type } => {
                assert_eq!(media_type, "application/octet-stream");
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn each_kind_selects_matching_strategy() {
        for kind in [ContentKind::Image, ContentKind::Pdf, ContentKind::Text] {
            let strategy = select_strategy(kind, None).unwrap();
            assert_eq!(strategy.kind(), kind);
        }
    }
}
