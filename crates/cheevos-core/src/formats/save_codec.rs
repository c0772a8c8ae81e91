//! # Save Codec
//!
//! Text serialization for the progress counter sequence.
//!
//! Format: decimal counters joined with `;`, then Base64 (standard alphabet,
//! padded). `[0, 0, 7]` is stored as `MDswOzc=`.
//!
//! ## Validation
//!
//! Decoding never produces a placeholder value. Any of the following fails
//! with `CheevoError::CorruptState`:
//! - stored text longer than `MAX_SAVE_LENGTH`
//! - invalid Base64 or a non-UTF-8 payload
//! - a segment that is not a run of decimal digits fitting in `u64`
//!   (no sign, no padding whitespace)

use crate::CheevoError;
use crate::primitives::{MAX_SAVE_LENGTH, SAVE_DELIMITER};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

// =============================================================================
// ENCODING
// =============================================================================

/// Encode a counter sequence into its stored form.
///
/// This is a pure transformation - no settings I/O.
#[must_use]
pub fn encode_save(values: &[u64]) -> String {
    let joined = values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(SAVE_DELIMITER.to_string().as_str());
    STANDARD.encode(joined)
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode a stored save string into a counter sequence.
///
/// The empty string is the never-saved state and decodes to an empty
/// sequence.
pub fn decode_save(stored: &str) -> Result<Vec<u64>, CheevoError> {
    if stored.len() > MAX_SAVE_LENGTH {
        return Err(CheevoError::CorruptState(format!(
            "Save string of {} bytes exceeds maximum {} bytes",
            stored.len(),
            MAX_SAVE_LENGTH
        )));
    }

    let trimmed = stored.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = STANDARD
        .decode(trimmed)
        .map_err(|e| CheevoError::CorruptState(format!("Invalid base64: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| CheevoError::CorruptState(format!("Save payload is not UTF-8: {}", e)))?;

    if text.is_empty() {
        return Ok(Vec::new());
    }

    text.split(SAVE_DELIMITER)
        .enumerate()
        .map(|(slot, segment)| parse_segment(slot, segment))
        .collect()
}

/// Only plain ASCII digits are accepted, exactly as `encode_save` writes them.
fn parse_segment(slot: usize, segment: &str) -> Result<u64, CheevoError> {
    let corrupt = |reason: String| {
        CheevoError::CorruptState(format!(
            "Slot {} holds '{}', not a counter: {}",
            slot, segment, reason
        ))
    };

    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(corrupt("expected decimal digits".to_string()));
    }
    segment.parse::<u64>().map_err(|e| corrupt(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
