use serde::{Deserialize, Serialize};

/// Round kind string that switches the timer into free-debate mode.
pub const FREE_DEBATE_KIND: &str = "自由辩论";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Affirmative,
    Negative,
    Both,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Affirmative => "正方",
            Side::Negative => "反方",
            Side::Both => "双方",
        }
    }
}

/// Immutable descriptor of one speaking round, created when configuration
/// loads. `Side::Both` only appears on free-debate rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSpec {
    pub side: Side,
    pub speaker: String,
    pub kind: String,
    pub duration_seconds: u32,
}

impl RoundSpec {
    pub fn is_free_debate(&self) -> bool {
        self.kind == FREE_DEBATE_KIND
    }

    /// Per-side budget for a free-debate round: half the total, floored.
    pub fn half_duration(&self) -> u32 {
        self.duration_seconds / 2
    }
}
