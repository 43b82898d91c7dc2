//! Level data: NPC records, player spawn, static obstacles, objectives.
//!
//! A broken file is an error. A broken NPC record is not: the record is
//! skipped, a warning is logged and kept, and the rest of the level loads.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::npc::{NpcSpawn, PatrolRoute};
use crate::spatial::Aabb;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One skipped NPC record.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelWarning {
    /// Position of the record in the level's `npcs` array.
    pub index: usize,
    pub name: Option<String>,
    pub reason: String,
}

impl fmt::Display for LevelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "npc #{} '{}' skipped: {}", self.index, name, self.reason),
            None => write!(f, "npc #{} skipped: {}", self.index, self.reason),
        }
    }
}

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
struct Point {
    x: f32,
    y: f32,
    /// Height in 3D levels. Plan logic ignores it.
    #[serde(default)]
    #[allow(dead_code)]
    z: Option<f32>,
}

impl Point {
    fn plan(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Deserialize)]
struct ObstacleRecord {
    min: Point,
    max: Point,
}

#[derive(Debug, Deserialize)]
struct ObjectiveRecord {
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    player_spawn: Option<Point>,
    /// Kept raw so one bad record cannot fail the whole file.
    #[serde(default)]
    npcs: Vec<serde_json::Value>,
    #[serde(default)]
    obstacles: Vec<ObstacleRecord>,
    #[serde(default)]
    objectives: Vec<ObjectiveRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NpcRecord {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    position: Point,
    #[serde(default, alias = "waypoints")]
    patrol_points: Option<Vec<Point>>,
    #[serde(default)]
    detection_range: Option<f32>,
    #[serde(default)]
    detection_angle: Option<f32>,
}

// ---------------------------------------------------------------------------
// Loaded level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Level {
    pub name: String,
    pub player_spawn: Vec2,
    pub npcs: Vec<NpcSpawn>,
    pub obstacles: Vec<Aabb>,
    pub objectives: Vec<String>,
    pub warnings: Vec<LevelWarning>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        Ok(Self::from_file_data(file))
    }

    pub fn from_file(path: &Path) -> Result<Self, LevelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn from_file_data(file: LevelFile) -> Self {
        let mut npcs = Vec::with_capacity(file.npcs.len());
        let mut warnings = Vec::new();

        for (index, value) in file.npcs.into_iter().enumerate() {
            let name = value
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned);
            match parse_npc(value) {
                Ok(spawn) => npcs.push(spawn),
                Err(reason) => {
                    let warning = LevelWarning {
                        index,
                        name,
                        reason,
                    };
                    log::warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        let mut obstacles = Vec::with_capacity(file.obstacles.len());
        for (i, rec) in file.obstacles.iter().enumerate() {
            let aabb = Aabb::new(rec.min.plan(), rec.max.plan());
            if aabb.is_finite() {
                obstacles.push(aabb);
            } else {
                log::warn!("obstacle #{i} has non-finite bounds, ignored");
            }
        }

        let player_spawn = file
            .player_spawn
            .map(Point::plan)
            .filter(|p| p.is_finite())
            .unwrap_or(Vec2::ZERO);

        let level = Self {
            name: file.name.unwrap_or_else(|| "untitled".to_owned()),
            player_spawn,
            npcs,
            obstacles,
            objectives: file.objectives.into_iter().map(|o| o.description).collect(),
            warnings,
        };
        log::info!(
            "Loaded level '{}': {} NPCs, {} obstacles, {} skipped",
            level.name,
            level.npcs.len(),
            level.obstacles.len(),
            level.warnings.len()
        );
        level
    }

    /// First objective, for the HUD.
    pub fn current_objective(&self) -> Option<&str> {
        self.objectives.first().map(String::as_str)
    }
}

fn parse_npc(value: serde_json::Value) -> Result<NpcSpawn, String> {
    let rec: NpcRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;

    let position = rec.position.plan();
    if !position.is_finite() {
        return Err("position is not finite".to_owned());
    }

    let points = rec.patrol_points.unwrap_or_default();
    let mut waypoints = Vec::with_capacity(points.len());
    for (i, p) in points.into_iter().enumerate() {
        let wp = p.plan();
        if !wp.is_finite() {
            return Err(format!("waypoint {i} is not finite"));
        }
        waypoints.push(wp);
    }

    for (field, value) in [
        ("detectionRange", rec.detection_range),
        ("detectionAngle", rec.detection_angle),
    ] {
        if let Some(v) = value {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("{field} must be a non-negative number (got {v})"));
            }
        }
    }

    Ok(NpcSpawn {
        name: rec.name,
        kind: rec.kind,
        position,
        route: Arc::new(PatrolRoute::new(waypoints)),
        detection_range: rec.detection_range,
        detection_angle: rec.detection_angle,
    })
}
