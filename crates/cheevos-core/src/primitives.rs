//! # Engine Primitives
//!
//! Hardcoded constants for the Cheevos engine.
//!
//! These values define the persisted save format and the validation limits
//! applied at registration time. Changing the format constants invalidates
//! every save string already written by the toolbox.

/// Separator between counters inside the decoded save string.
///
/// Never appears in the decimal rendering of an integer.
pub const SAVE_DELIMITER: char = ';';

/// Placeholder in description templates, replaced by each threshold's target.
pub const TARGET_PLACEHOLDER: &str = "{0}";

/// Settings key holding the encoded progress sequence.
pub const SAVE_KEY: &str = "Achievements.save";

/// Settings key holding the last start-up time, in milliseconds since the epoch.
pub const LAST_SEEN_KEY: &str = "Achievements.lastSeen";

/// Default delta for a single recorded action.
pub const DEFAULT_DELTA: i64 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length of a stored save string.
///
/// Longer values are rejected as corrupt before decoding.
pub const MAX_SAVE_LENGTH: usize = 64 * 1024;

/// Maximum length of a threshold label (labels may carry a link).
pub const MAX_LABEL_LENGTH: usize = 512;

/// Maximum length of a description template.
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Maximum number of thresholds in one series.
pub const MAX_SERIES_LENGTH: usize = 64;
