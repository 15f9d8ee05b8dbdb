//! Structural description of a galaxy.
//!
//! This is the already-decoded shape a host hands to the loader: an ordered
//! list of system records. Record `i` becomes system `i`, and neighbour lists
//! refer to records by position.

use serde::{Deserialize, Serialize};

use crate::error::GalaxyResult;

/// RGBA display color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Components as `[r, g, b, a]`.
    pub fn components(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One system as it appears in a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub neighbours: Vec<u32>,
    #[serde(default)]
    pub constrained: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl SystemRecord {
    /// A record with no neighbours, unpinned, default color.
    pub fn new(name: impl Into<String>, position: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            position,
            neighbours: Vec::new(),
            constrained: false,
            color: None,
        }
    }

    pub fn with_neighbours(mut self, neighbours: impl IntoIterator<Item = u32>) -> Self {
        self.neighbours = neighbours.into_iter().collect();
        self
    }

    pub fn constrained(mut self, constrained: bool) -> Self {
        self.constrained = constrained;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// An ordered list of system records plus an optional jiggle seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalaxyDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub systems: Vec<SystemRecord>,
}

impl GalaxyDescription {
    pub fn new(systems: Vec<SystemRecord>) -> Self {
        Self { seed: None, systems }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Decode a description from JSON text.
    ///
    /// Only the shape is checked here; graph invariants are checked when the
    /// description is loaded into a [`Galaxy`](crate::Galaxy).
    pub fn from_json(text: &str) -> GalaxyResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> GalaxyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalaxyError;

    #[test]
    fn test_from_json_defaults() {
        let json = r#"{
            "systems": [
                { "name": "Lave", "position": [1.0, 2.0, 3.0], "neighbours": [1] },
                { "name": "Zaonce", "position": [4.0, 5.0, 6.0], "neighbours": [0],
                  "constrained": true, "color": { "r": 1.0, "g": 0.5, "b": 0.0 } }
            ]
        }"#;
        let desc = GalaxyDescription::from_json(json).unwrap();

        assert_eq!(desc.seed, None);
        assert_eq!(desc.systems.len(), 2);
        assert!(!desc.systems[0].constrained);
        assert_eq!(desc.systems[0].color, None);
        assert!(desc.systems[1].constrained);
        assert_eq!(desc.systems[1].color, Some(Color::new(1.0, 0.5, 0.0, 1.0)));
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        let err = GalaxyDescription::from_json(r#"{ "systems": [ { "name": "Lave" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, GalaxyError::Description(_)));
    }

    #[test]
    fn test_json_keeps_seed() {
        let desc = GalaxyDescription::new(vec![SystemRecord::new("Diso", [0.0, 0.0, 0.0])])
            .with_seed(42);
        let text = desc.to_json().unwrap();
        assert_eq!(GalaxyDescription::from_json(&text).unwrap(), desc);
    }

    #[test]
    fn test_record_builder() {
        let record = SystemRecord::new("Leesti", [1.0, 0.0, 0.0])
            .with_neighbours([2, 3])
            .constrained(true)
            .with_color(Color::new(0.2, 0.4, 0.6, 1.0));
        assert_eq!(record.neighbours, vec![2, 3]);
        assert!(record.constrained);
        assert_eq!(record.color.unwrap().components(), [0.2, 0.4, 0.6, 1.0]);
    }
}
