//! Core types for playlist control

use crate::error::PlaylistError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One playable entry of the playlist
///
/// `source` locates the underlying audio. Everything else the caller wants to
/// carry along (title, artist, artwork URL...) lives in `metadata` and is
/// serialized flat next to `source`.
///
/// Items are compared by value: removing an item removes the first entry
/// equal to it, wherever it sits in the playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Locator handed to the audio resource factory
    pub source: String,

    /// Caller-owned extra fields
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl PlaylistItem {
    /// Create an item with no metadata
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            metadata: Map::new(),
        }
    }

    /// Attach a metadata field
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Look up a metadata field
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Whether this item can be handed to an audio resource
    pub fn is_playable(&self) -> bool {
        !self.source.is_empty()
    }
}

impl TryFrom<Value> for PlaylistItem {
    type Error = PlaylistError;

    /// Build an item from loosely typed input
    ///
    /// Fails unless the value is an object carrying a string `source`.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(PlaylistError::InvalidItem(
                "item must be an object".to_string(),
            ));
        };

        match fields.remove("source") {
            Some(Value::String(source)) => Ok(Self {
                source,
                metadata: fields,
            }),
            Some(other) => Err(PlaylistError::InvalidItem(format!(
                "source must be a string, got {other}"
            ))),
            None => Err(PlaylistError::InvalidItem("missing source".to_string())),
        }
    }
}

/// Configuration for the playlist controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Advance to the next item when the current one ends (default: true)
    #[serde(default = "default_continuous")]
    pub continuous: bool,

    /// Initial volume in [0.0, 1.0] (default: 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_continuous() -> bool {
    true
}

fn default_volume() -> f32 {
    1.0
}

impl ControllerConfig {
    /// Copy with the volume clamped into range
    ///
    /// A NaN volume falls back to full volume.
    pub fn normalized(mut self) -> Self {
        self.volume = clamp_unit(self.volume).unwrap_or_else(default_volume);
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            continuous: default_continuous(),
            volume: default_volume(),
        }
    }
}

/// Clamp to [0.0, 1.0]; NaN yields `None`
pub(crate) fn clamp_unit(value: f32) -> Option<f32> {
    if value.is_nan() {
        None
    } else {
        Some(value.clamp(0.0, 1.0))
    }
}
