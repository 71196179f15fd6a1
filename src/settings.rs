//! Arena layout and driver settings
//!
//! Loaded once at world setup. Serialized as JSON so layouts can live next to
//! the binary; every field has a default so partial files work.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BALL_RADIUS, BALL_START_VELOCITY, WALL_THICKNESS};

/// Errors raised while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Built-in arena layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArenaPreset {
    /// Five walls around the origin
    #[default]
    Room,
    /// The room plus six pillars joined pairwise by walls
    Pillars,
}

impl ArenaPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaPreset::Room => "Room",
            ArenaPreset::Pillars => "Pillars",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "room" => Some(ArenaPreset::Room),
            "pillars" | "room+pillars" => Some(ArenaPreset::Pillars),
            _ => None,
        }
    }

    /// Room walls, each directed `from -> to`
    pub fn walls(&self) -> Vec<WallSpec> {
        let corners = [
            Vec2::new(-350.0, 100.0),
            Vec2::new(0.0, 250.0),
            Vec2::new(350.0, 100.0),
            Vec2::new(275.0, -250.0),
            Vec2::new(-275.0, -250.0),
        ];
        (0..corners.len())
            .map(|i| WallSpec {
                from: corners[i],
                to: corners[(i + 1) % corners.len()],
            })
            .collect()
    }

    pub fn pillars(&self) -> Vec<PillarSpec> {
        match self {
            ArenaPreset::Room => Vec::new(),
            ArenaPreset::Pillars => vec![
                PillarSpec::new(Vec2::new(-200.0, 0.0), 15.0),
                PillarSpec::new(Vec2::new(-150.0, 100.0), 20.0),
                PillarSpec::new(Vec2::new(-100.0, -150.0), 15.0),
                PillarSpec::new(Vec2::new(100.0, -175.0), 10.0),
                PillarSpec::new(Vec2::new(175.0, 100.0), 20.0),
                PillarSpec::new(Vec2::new(225.0, -25.0), 10.0),
            ],
        }
    }

    /// Whether pillars are joined pairwise (0-1, 2-3, ...) by walls
    pub fn pillar_walls(&self) -> bool {
        matches!(self, ArenaPreset::Pillars)
    }
}

/// How the ball position is corrected on a bounce tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResponseMode {
    /// Contact point plus the unit reflected direction, then the usual
    /// full-frame advance along the new velocity
    #[default]
    Reference,
    /// Contact point plus the reflected direction scaled by the distance
    /// left in the frame, with no second advance
    RemainderCorrected,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::Reference => "Reference",
            ResponseMode::RemainderCorrected => "RemainderCorrected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reference" => Some(ResponseMode::Reference),
            "remaindercorrected" | "remainder" | "corrected" => {
                Some(ResponseMode::RemainderCorrected)
            }
            _ => None,
        }
    }
}

/// A wall directed `from -> to`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub from: Vec2,
    pub to: Vec2,
}

/// A static circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarSpec {
    pub center: Vec2,
    pub radius: f32,
}

impl PillarSpec {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Initial ball velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Launch {
    Fixed { velocity: Vec2 },
    /// Random direction from a seeded RNG at the given speed
    Seeded { seed: u64, speed: f32 },
}

impl Default for Launch {
    fn default() -> Self {
        Launch::Fixed {
            velocity: BALL_START_VELOCITY,
        }
    }
}

/// Arena and driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset the walls and pillars came from
    pub preset: ArenaPreset,

    // === Obstacles ===
    pub walls: Vec<WallSpec>,
    pub pillars: Vec<PillarSpec>,
    /// Join pillars pairwise with walls
    pub pillar_walls: bool,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_start: Vec2,
    pub launch: Launch,

    // === Driver ===
    pub response: ResponseMode,

    // === Render output ===
    /// Rendered wall thickness
    pub wall_thickness: f32,
    /// Emit markers for segment normals and the ball velocity
    pub debug_draw: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(ArenaPreset::default())
    }
}

impl Settings {
    /// Settings with the preset's layout and default everything else
    pub fn from_preset(preset: ArenaPreset) -> Self {
        Self {
            preset,
            walls: preset.walls(),
            pillars: preset.pillars(),
            pillar_walls: preset.pillar_walls(),

            ball_radius: BALL_RADIUS,
            ball_start: Vec2::ZERO,
            launch: Launch::default(),

            response: ResponseMode::default(),

            wall_thickness: WALL_THICKNESS,
            debug_draw: false,
        }
    }

    /// Replace the obstacle layout with the preset's
    pub fn apply_preset(&mut self, preset: ArenaPreset) {
        self.preset = preset;
        self.walls = preset.walls();
        self.pillars = preset.pillars();
        self.pillar_walls = preset.pillar_walls();
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names() {
        assert_eq!(ArenaPreset::from_str("PILLARS"), Some(ArenaPreset::Pillars));
        assert_eq!(ArenaPreset::from_str("room"), Some(ArenaPreset::Room));
        assert_eq!(ArenaPreset::from_str("maze"), None);
        assert_eq!(
            ArenaPreset::from_str(ArenaPreset::Pillars.as_str()),
            Some(ArenaPreset::Pillars)
        );
        assert_eq!(ResponseMode::from_str("corrected"), Some(ResponseMode::RemainderCorrected));
    }

    #[test]
    fn test_room_is_closed() {
        let walls = ArenaPreset::Room.walls();
        assert_eq!(walls.len(), 5);
        for (i, wall) in walls.iter().enumerate() {
            let next = &walls[(i + 1) % walls.len()];
            assert_eq!(wall.to, next.from);
        }
    }

    #[test]
    fn test_apply_preset() {
        let mut settings = Settings::default();
        assert!(settings.pillars.is_empty());
        assert!(!settings.pillar_walls);

        settings.apply_preset(ArenaPreset::Pillars);
        assert_eq!(settings.pillars.len(), 6);
        assert!(settings.pillar_walls);
        assert_eq!(settings.walls.len(), 5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "walls": [{ "from": [0.0, 0.0], "to": [10.0, 0.0] }],
            "ball_radius": 1.0,
            "launch": { "Seeded": { "seed": 7, "speed": 50.0 } },
            "response": "RemainderCorrected"
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.walls.len(), 1);
        assert_eq!(settings.walls[0].to, Vec2::new(10.0, 0.0));
        assert_eq!(settings.ball_radius, 1.0);
        assert_eq!(settings.launch, Launch::Seeded { seed: 7, speed: 50.0 });
        assert_eq!(settings.response, ResponseMode::RemainderCorrected);
        // Untouched fields keep their defaults
        assert_eq!(settings.wall_thickness, WALL_THICKNESS);
        assert!(settings.pillars.is_empty());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ \"ball_radius\": \"big\" }"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("ricochet_settings_{}.json", std::process::id()));
        let mut settings = Settings::from_preset(ArenaPreset::Pillars);
        settings.debug_draw = true;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }
}
