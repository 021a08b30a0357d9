use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// race the clock
    #[default]
    Time,
    /// limited number of actions
    Standard,
    /// keep matching targets until time or actions run out
    Endless,
}

impl GameMode {
    pub fn next(self) -> Self {
        match self {
            GameMode::Time => GameMode::Standard,
            GameMode::Standard => GameMode::Endless,
            GameMode::Endless => GameMode::Time,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// show a hint naming the channel that is furthest off
    Easy,
    #[default]
    Normal,
    /// in endless mode, enable both the timer and the action budget
    Hard,
}

impl Difficulty {
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// seconds per round
    pub time_limit: u32,
    pub max_actions: u32,
    /// match percentage (0-100) that counts as a win
    pub accuracy_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_limit: 60,
            max_actions: 20,
            accuracy_threshold: 90.0,
        }
    }
}

/// Partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub time_limit: Option<u32>,
    pub max_actions: Option<u32>,
    pub accuracy_threshold: Option<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum SettingsField {
    #[strum(to_string = "Time Limit (seconds)")]
    TimeLimit,
    #[strum(to_string = "Max Actions")]
    MaxActions,
    #[strum(to_string = "Accuracy Threshold (%)")]
    AccuracyThreshold,
}

impl SettingsField {
    pub const ALL: [SettingsField; 3] = [
        SettingsField::TimeLimit,
        SettingsField::MaxActions,
        SettingsField::AccuracyThreshold,
    ];

    pub fn next(self) -> Self {
        match self {
            SettingsField::TimeLimit => SettingsField::MaxActions,
            SettingsField::MaxActions => SettingsField::AccuracyThreshold,
            SettingsField::AccuracyThreshold => SettingsField::TimeLimit,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{field}: '{input}' is not a number")]
    InvalidNumber { field: SettingsField, input: String },
    #[error("{field}: {value} is out of range")]
    OutOfRange { field: SettingsField, value: f64 },
}

impl Settings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.time_limit {
            self.time_limit = v;
        }
        if let Some(v) = patch.max_actions {
            self.max_actions = v;
        }
        if let Some(v) = patch.accuracy_threshold {
            if v.is_finite() {
                self.accuracy_threshold = v.clamp(0.0, 100.0);
            }
        }
    }

    /// Parse a raw text field and apply it. On error the previous value is kept.
    pub fn apply_raw(&mut self, field: SettingsField, input: &str) -> Result<(), SettingsError> {
        let patch = parse_field(field, input)?;
        self.apply(patch);
        Ok(())
    }

    pub fn get(&self, field: SettingsField) -> String {
        match field {
            SettingsField::TimeLimit => self.time_limit.to_string(),
            SettingsField::MaxActions => self.max_actions.to_string(),
            SettingsField::AccuracyThreshold => self.accuracy_threshold.to_string(),
        }
    }
}

pub fn parse_field(field: SettingsField, input: &str) -> Result<SettingsPatch, SettingsError> {
    let trimmed = input.trim();
    let invalid = || SettingsError::InvalidNumber {
        field,
        input: input.to_string(),
    };

    match field {
        SettingsField::TimeLimit | SettingsField::MaxActions => {
            let value: i64 = trimmed.parse().map_err(|_| invalid())?;
            let value = u32::try_from(value).map_err(|_| SettingsError::OutOfRange {
                field,
                value: value as f64,
            })?;
            Ok(match field {
                SettingsField::TimeLimit => SettingsPatch {
                    time_limit: Some(value),
                    ..Default::default()
                },
                _ => SettingsPatch {
                    max_actions: Some(value),
                    ..Default::default()
                },
            })
        }
        SettingsField::AccuracyThreshold => {
            let value: f64 = trimmed.parse().map_err(|_| invalid())?;
            if !value.is_finite() {
                return Err(invalid());
            }
            if !(0.0..=100.0).contains(&value) {
                return Err(SettingsError::OutOfRange { field, value });
            }
            Ok(SettingsPatch {
                accuracy_threshold: Some(value),
                ..Default::default()
            })
        }
    }
}

/// Everything a round needs to know about how it is played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub settings: Settings,
}

impl GameConfig {
    /// Whether the round clock runs
    pub fn is_timed(&self) -> bool {
        match self.mode {
            GameMode::Time => true,
            GameMode::Endless => self.difficulty == Difficulty::Hard,
            GameMode::Standard => false,
        }
    }

    /// Whether the action budget can end the round
    pub fn is_action_limited(&self) -> bool {
        match self.mode {
            GameMode::Standard => true,
            GameMode::Endless => self.difficulty == Difficulty::Hard,
            GameMode::Time => false,
        }
    }

    pub fn shows_hint(&self) -> bool {
        self.difficulty == Difficulty::Easy
    }
}
