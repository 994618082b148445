use crate::types::round::{RoundSpec, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("无法读取配置文件: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("回合 {index} 的 time 字段必须是正整数")]
    NonPositiveDuration { index: usize },
    #[error("回合 {index} 的 side 字段必须是 affirmative 或 negative")]
    InvalidSide { index: usize },
    #[error("配置中没有任何回合")]
    NoRounds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideInfo {
    pub school: String,
    pub viewpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    pub side: Side,
    pub speaker: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: u32,
}

/// The on-disk debate configuration. Missing required fields fail at
/// deserialization; cross-field rules are checked by `validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateConfig {
    pub topic: String,
    pub affirmative: SideInfo,
    pub negative: SideInfo,
    pub rounds: Vec<RoundConfig>,
    #[serde(default)]
    pub debater_roles: BTreeMap<String, String>,
}

impl DebateConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<DebateConfig, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: DebateConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds.is_empty() {
            return Err(ConfigError::NoRounds);
        }
        for (i, round) in self.rounds.iter().enumerate() {
            if round.time == 0 {
                return Err(ConfigError::NonPositiveDuration { index: i + 1 });
            }
            // "Both" is only meaningful when the round is free debate.
            let spec = round.to_spec();
            if round.side == Side::Both && !spec.is_free_debate() {
                return Err(ConfigError::InvalidSide { index: i + 1 });
            }
        }
        Ok(())
    }

    pub fn round_specs(&self) -> Vec<RoundSpec> {
        self.rounds.iter().map(RoundConfig::to_spec).collect()
    }

    /// Debater names per side in speaking order, from the `debater_roles`
    /// map (`affirmative_first` .. `negative_fourth`). Missing or empty
    /// entries come back as "待定".
    pub fn rosters(&self) -> ([String; 4], [String; 4]) {
        (self.side_roster("affirmative"), self.side_roster("negative"))
    }

    fn side_roster(&self, prefix: &str) -> [String; 4] {
        ["first", "second", "third", "fourth"].map(|pos| {
            self.debater_roles
                .get(&format!("{prefix}_{pos}"))
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| "待定".to_string())
        })
    }
}

impl RoundConfig {
    fn to_spec(&self) -> RoundSpec {
        RoundSpec {
            side: self.side,
            speaker: self.speaker.clone(),
            kind: self.kind.clone(),
            duration_seconds: self.time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::round::FREE_DEBATE_KIND;

    fn sample_config() -> DebateConfig {
        DebateConfig {
            topic: "网络让人更亲近".to_string(),
            affirmative: SideInfo {
                school: "甲大学".to_string(),
                viewpoint: "网络让人更亲近".to_string(),
            },
            negative: SideInfo {
                school: "乙大学".to_string(),
                viewpoint: "网络让人更疏远".to_string(),
            },
            rounds: vec![
                RoundConfig {
                    side: Side::Affirmative,
                    speaker: "一辩".to_string(),
                    kind: "陈词".to_string(),
                    time: 180,
                },
                RoundConfig {
                    side: Side::Both,
                    speaker: "全体".to_string(),
                    kind: FREE_DEBATE_KIND.to_string(),
                    time: 300,
                },
            ],
            debater_roles: BTreeMap::new(),
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let config = sample_config();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.json");
        config.save_to_file(&path).unwrap();
        let loaded = DebateConfig::from_file(&path).unwrap();
        assert_eq!(loaded.topic, config.topic);
        assert_eq!(loaded.rounds.len(), 2);
        assert_eq!(loaded.rounds[1].kind, FREE_DEBATE_KIND);
    }

    #[test]
    fn test_missing_field_fails() {
        let json = r#"{ "topic": "t", "rounds": [] }"#;
        assert!(serde_json::from_str::<DebateConfig>(json).is_err());
    }

    #[test]
    fn test_zero_time_rejected() {
        let mut config = sample_config();
        config.rounds[0].time = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveDuration { index: 1 })
        ));
    }

    #[test]
    fn test_both_side_only_for_free_debate() {
        let mut config = sample_config();
        config.rounds[0].side = Side::Both;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSide { index: 1 })
        ));
        // Round 2 is free debate, so Both there is fine.
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_empty_rounds_rejected() {
        let mut config = sample_config();
        config.rounds.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoRounds)));
    }

    #[test]
    fn test_rosters_fall_back_to_placeholder() {
        let mut config = sample_config();
        config
            .debater_roles
            .insert("affirmative_first".to_string(), "张三".to_string());
        config
            .debater_roles
            .insert("negative_fourth".to_string(), "李四".to_string());
        config
            .debater_roles
            .insert("negative_first".to_string(), String::new());
        let (affirmative, negative) = config.rosters();
        assert_eq!(affirmative[0], "张三");
        assert_eq!(affirmative[1], "待定");
        // Empty names count as missing.
        assert_eq!(negative[0], "待定");
        assert_eq!(negative[3], "李四");
    }

    #[test]
    fn test_round_specs_conversion() {
        let specs = sample_config().round_specs();
        assert_eq!(specs[0].duration_seconds, 180);
        assert!(!specs[0].is_free_debate());
        assert!(specs[1].is_free_debate());
    }
}
