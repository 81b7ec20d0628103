//! Level definitions served by the level service
//!
//! The service answers with an envelope holding either a list of levels
//! (`get_all_levels`) or a single level (`get_level/{id}`):
//!
//! ```json
//! { "level": { "id": "1", "name": "Intro", "cube_size": 3,
//!              "faces_data": { "face_1": [1, 2, 3, 2, 1, 3, 2, 1, 3] } } }
//! ```
//!
//! Fetching is left to the caller; this module only decodes.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Face, Grid, Result};

/// One puzzle level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub cube_size: i32,
    /// Tile variants per face, keyed `face_1` through `face_6`
    #[serde(default)]
    pub faces_data: BTreeMap<String, Vec<i32>>,
}

impl Level {
    /// Decode a bare level object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Tile variants for one face, in plane-index order
    pub fn face_data(&self, face: Face) -> Option<&[i32]> {
        self.faces_data.get(face.level_key()).map(Vec::as_slice)
    }

    /// Build the grid this level describes
    pub fn build_grid(&self, origin: Vec3, spacing: f32) -> Result<Grid> {
        info!(id = %self.id, name = %self.name, size = self.cube_size, "Loading level");
        Grid::build_at(origin, self.cube_size, spacing)
    }
}

/// Response envelope of the level service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResponse {
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub level: Option<Level>,
}

impl LevelResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Levels in the response, single-level answers included
    pub fn into_levels(self) -> Vec<Level> {
        let mut levels = self.levels;
        levels.extend(self.level);
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_level() {
        let level = Level::from_json(
            r#"{ "id": "7", "name": "Twist", "cube_size": 2,
                 "faces_data": { "face_1": [0, 1, 2, 3], "face_5": [1, 1, 1, 1] } }"#,
        )
        .unwrap();
        assert_eq!(level.cube_size, 2);
        assert_eq!(level.face_data(Face::Front), Some(&[0, 1, 2, 3][..]));
        assert_eq!(level.face_data(Face::Top), Some(&[1, 1, 1, 1][..]));
        assert_eq!(level.face_data(Face::Back), None);
    }

    #[test]
    fn test_missing_faces_data_defaults_empty() {
        let level = Level::from_json(r#"{ "id": "1", "name": "Bare", "cube_size": 3 }"#).unwrap();
        assert!(level.faces_data.is_empty());
    }

    #[test]
    fn test_malformed_level_is_error() {
        assert!(matches!(
            Level::from_json(r#"{ "id": "1", "cube_size": "three" }"#),
            Err(crate::Error::Level(_))
        ));
    }

    #[test]
    fn test_build_grid_rejects_bad_size() {
        let level = Level {
            id: "x".into(),
            name: "Broken".into(),
            cube_size: 0,
            faces_data: BTreeMap::new(),
        };
        assert!(level.build_grid(Vec3::ZERO, 1.0).is_err());
    }

    #[test]
    fn test_build_grid_rejects_huge_size() {
        let level = Level::from_json(r#"{ "id": "big", "name": "Huge", "cube_size": 1300 }"#)
            .unwrap();
        assert!(matches!(
            level.build_grid(Vec3::ZERO, 1.0),
            Err(crate::Error::TooLarge { size: 1300, .. })
        ));
    }
}
