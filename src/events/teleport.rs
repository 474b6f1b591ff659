use crate::game_data::Properties;

/// Map transition requested by a teleport or the cheat console
///
/// Coordinates are in tile units. `target_map` None means "stay on the
/// current map".
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportRequest {
    pub target_map: Option<String>,
    pub x: f32,
    pub y: f32,
}

impl TeleportRequest {
    pub fn new(x: f32, y: f32, target_map: Option<String>) -> Self {
        TeleportRequest { target_map, x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeleportEvent {
    pub target_map: Option<String>,
    pub target_x: f32,
    pub target_y: f32,
}

impl TeleportEvent {
    /// Reads `target_map`, `target_x` and `target_y`; missing coordinates are 0
    pub fn from_properties(properties: &Properties) -> Self {
        let coord = |key: &str| {
            properties
                .get(key)
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32
        };

        TeleportEvent {
            target_map: properties
                .get("target_map")
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            target_x: coord("target_x"),
            target_y: coord("target_y"),
        }
    }

    pub fn request(&self) -> TeleportRequest {
        TeleportRequest::new(self.target_x, self.target_y, self.target_map.clone())
    }
}
