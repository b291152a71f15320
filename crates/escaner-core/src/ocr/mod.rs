//! OCR provider abstraction and the PaddleOCR-backed engine.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;
mod session;

pub use preprocessing::decode_image;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;
pub use session::{OcrSession, ProviderFactory};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Text returned to clients when OCR finds nothing.
pub const NO_TEXT_PLACEHOLDER: &str = "(No se detectó texto)";

/// Anything that turns a decoded image into recognized text fragments.
///
/// Providers are owned and mutable; a failed provider is discarded and
/// rebuilt by [`OcrSession`] rather than repaired in place. Providers need not
/// be `Send`: the ONNX sessions behind `PureOcrEngine` are not, so a provider
/// stays on the thread that built it.
pub trait OcrProvider {
    /// Recognize text in an RGB image.
    fn recognize(&mut self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

/// A recognized text fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: 1.0,
            bbox: [0.0; 8],
        }
    }

    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized fragments in provider order.
    pub fragments: Vec<TextFragment>,

    /// Full text (fragments joined with newlines).
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Build a result from fragments, joining their text one per line.
    pub fn from_fragments(fragments: Vec<TextFragment>, image_size: (u32, u32)) -> Self {
        let text = join_fragments(&fragments);
        Self {
            fragments,
            text,
            processing_time_ms: 0,
            image_size,
        }
    }

    /// Build a result from plain lines of text.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fragments = lines.into_iter().map(TextFragment::new).collect();
        Self::from_fragments(fragments, (0, 0))
    }

    pub fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = ms;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The recognized text, or [`NO_TEXT_PLACEHOLDER`] when nothing was found.
    pub fn text_or_placeholder(&self) -> &str {
        if self.is_empty() {
            NO_TEXT_PLACEHOLDER
        } else {
            &self.text
        }
    }

    /// Sort fragments by reading order (top-to-bottom, left-to-right).
    pub fn sort_by_reading_order(&mut self) {
        self.fragments.sort_by(|a, b| {
            let (_, ay, _, _) = a.rect();
            let (_, by, _, _) = b.rect();

            // Group by approximate vertical position (within 20 pixels)
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                let (ax, _, _, _) = a.rect();
                let (bx, _, _, _) = b.rect();
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        self.text = join_fragments(&self.fragments);
    }
}

/// Join fragment texts, one per line, in order.
pub fn join_fragments(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment_at(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            confidence: 0.9,
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
        }
    }

    #[test]
    fn test_from_lines_joins_with_newlines() {
        let result = OcrResult::from_lines(["Base 100.00", "IVA 21.00"]);
        assert_eq!(result.text, "Base 100.00\nIVA 21.00");
        assert_eq!(result.text_or_placeholder(), "Base 100.00\nIVA 21.00");
    }

    #[test]
    fn test_empty_result_placeholder() {
        let result = OcrResult::from_fragments(Vec::new(), (10, 10));
        assert!(result.is_empty());
        assert_eq!(result.text_or_placeholder(), NO_TEXT_PLACEHOLDER);
    }

    #[test]
    fn test_sort_by_reading_order() {
        let mut result = OcrResult::from_fragments(
            vec![
                fragment_at("121.00", 200.0, 42.0),
                fragment_at("Total", 10.0, 45.0),
                fragment_at("Base", 10.0, 2.0),
            ],
            (300, 100),
        );

        result.sort_by_reading_order();
        assert_eq!(result.text, "Base\nTotal\n121.00");
    }
}
