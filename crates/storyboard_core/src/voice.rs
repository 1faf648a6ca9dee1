//! Fixed roster of narration voices.

use serde::{Deserialize, Serialize};

/// Prebuilt voices offered by the speech service.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use storyboard_core::Voice;
/// use strum::IntoEnumIterator;
///
/// assert_eq!(Voice::from_str("Fenrir").unwrap(), Voice::Fenrir);
/// assert_eq!(Voice::iter().count(), 5);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum Voice {
    /// Upbeat
    Puck,
    /// Informative
    Charon,
    /// Firm
    #[default]
    Kore,
    /// Excitable
    Fenrir,
    /// Bright
    Zephyr,
}
