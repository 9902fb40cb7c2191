//! Positioned text tokens

use crate::geometry::Rectangle;

/// A unit of recognized text with its bounding rectangle.
///
/// Tokens come from a [`TokenSource`](crate::source::TokenSource) in reading
/// order. Text-layer sources leave `confidence` empty; OCR sources fill it
/// with the engine's score, where `0` or below means the engine does not
/// vouch for the word at all.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Text content of the word
    pub text: String,
    /// Bounding rectangle in page/image coordinates
    pub rect: Rectangle,
    /// Recognition confidence, if the source reports one
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub confidence: Option<f64>,
}

impl Token {
    /// Create a token without a confidence score
    pub fn new(text: impl Into<String>, rect: Rectangle) -> Self {
        Self {
            text: text.into(),
            rect,
            confidence: None,
        }
    }

    /// Create a token carrying a recognition confidence
    pub fn with_confidence(text: impl Into<String>, rect: Rectangle, confidence: f64) -> Self {
        Self {
            text: text.into(),
            rect,
            confidence: Some(confidence),
        }
    }

    /// Whether this token's rectangle may take part in a match outline.
    ///
    /// Blank tokens and tokens with a non-positive confidence still count
    /// as members of a matched window, they just do not widen its box.
    pub fn contributes_rect(&self) -> bool {
        !self.text.trim().is_empty() && self.confidence.map_or(true, |c| c > 0.0)
    }
}
