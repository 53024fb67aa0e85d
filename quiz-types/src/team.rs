use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type TeamId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MascotId {
    Eagle,
    Lion,
    Shark,
    Wolf,
}

impl MascotId {
    pub const ALL: [MascotId; 4] = [
        MascotId::Eagle,
        MascotId::Lion,
        MascotId::Shark,
        MascotId::Wolf,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MascotId::Eagle => "Eagle",
            MascotId::Lion => "Lion",
            MascotId::Shark => "Shark",
            MascotId::Wolf => "Wolf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub color: String, // CSS color token
    pub score: u32,
    pub mascot_id: MascotId,
}

impl Team {
    /// Create a team with a fresh id and zero score
    pub fn new(name: impl Into<String>, color: impl Into<String>, mascot_id: MascotId) -> Self {
        Self {
            id: new_team_id(),
            name: name.into(),
            color: color.into(),
            score: 0,
            mascot_id,
        }
    }
}

/// Generate a unique team id of the form `team-<uuid>`
pub fn new_team_id() -> TeamId {
    format!("team-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_ids_are_unique() {
        let a = Team::new("Red", "#ef4444", MascotId::Eagle);
        let b = Team::new("Blue", "#3b82f6", MascotId::Lion);

        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("team-"));
        assert_eq!(a.score, 0);
    }

    #[test]
    fn test_mascot_serializes_lowercase() {
        let team = Team {
            id: "team-1".to_string(),
            name: "Sharks".to_string(),
            color: "#14b8a6".to_string(),
            score: 40,
            mascot_id: MascotId::Shark,
        };

        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["mascotId"], "shark");
        assert_eq!(json["score"], 40);
    }
}
