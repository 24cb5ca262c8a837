use super::DefinitionError;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Highest phase an attempt can reach.
pub const MAX_PHASE: u8 = 7;
pub const MAX_PHASE_GATES: usize = MAX_PHASE as usize - 1;

const DEFAULT_WIPE_COMMAND: &str = "40000005";
const DEFAULT_MINIMUM_PULL_SECS: i64 = 30;
/// Upper bound for `minimum_pull_secs`, one day
pub const MAX_MINIMUM_PULL_SECS: i64 = 24 * 60 * 60;

/// Entity names and codes that drive pull segmentation for one encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterDefinition {
    /// Zone whose (re-)entry while a pull is running discards the attempt
    pub zone_name: String,
    /// A pull starts when anything other than this entity uses an ability on it
    pub boss_name: String,
    /// `phase_gates[i]` is the ability target that moves phase `i + 1` to `i + 2`
    #[serde(default, alias = "phase_gate")]
    pub phase_gates: Vec<String>,
    /// Network director command that marks a wipe
    #[serde(default = "default_wipe_command")]
    pub wipe_command: String,
    /// Attempts lasting this long or less are dropped
    #[serde(default = "default_minimum_pull_secs")]
    pub minimum_pull_secs: i64,
}

fn default_wipe_command() -> String {
    DEFAULT_WIPE_COMMAND.to_string()
}

fn default_minimum_pull_secs() -> i64 {
    DEFAULT_MINIMUM_PULL_SECS
}

impl Default for EncounterDefinition {
    /// Dragonsong's Reprise (Ultimate)
    fn default() -> Self {
        Self {
            zone_name: "Dragonsong's Reprise (Ultimate)".to_string(),
            boss_name: "King Thordan".to_string(),
            phase_gates: [
                "Nidhogg",
                "Right Eye",
                "Ser Charibert",
                "King Thordan",
                "Nidhogg",
                "Dragon-king Thordan",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            wipe_command: default_wipe_command(),
            minimum_pull_secs: DEFAULT_MINIMUM_PULL_SECS,
        }
    }
}

impl EncounterDefinition {
    /// Load a definition from a TOML file and validate it.
    pub fn load_from_file(path: &Path) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let definition: Self =
            toml::from_str(&content).map_err(|source| DefinitionError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;

        definition.validate()?;
        Ok(definition)
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.zone_name.is_empty() {
            return Err(DefinitionError::EmptyField { field: "zone_name" });
        }
        if self.boss_name.is_empty() {
            return Err(DefinitionError::EmptyField { field: "boss_name" });
        }
        if self.wipe_command.is_empty() {
            return Err(DefinitionError::EmptyField {
                field: "wipe_command",
            });
        }
        if self.phase_gates.iter().any(String::is_empty) {
            return Err(DefinitionError::EmptyField {
                field: "phase_gates",
            });
        }
        if self.phase_gates.len() > MAX_PHASE_GATES {
            return Err(DefinitionError::TooManyPhaseGates {
                count: self.phase_gates.len(),
                max: MAX_PHASE_GATES,
            });
        }
        if !(0..=MAX_MINIMUM_PULL_SECS).contains(&self.minimum_pull_secs) {
            return Err(DefinitionError::InvalidMinimumDuration {
                secs: self.minimum_pull_secs,
                max: MAX_MINIMUM_PULL_SECS,
            });
        }
        Ok(())
    }

    /// Highest phase reachable with this definition's gates
    pub fn max_phase(&self) -> u8 {
        let gates = self.phase_gates.len().min(MAX_PHASE_GATES);
        u8::try_from(gates).map_or(MAX_PHASE, |g| g + 1)
    }

    /// Entity that advances the given 1-based phase, if any
    pub fn gate_for(&self, phase: u8) -> Option<&str> {
        let idx = usize::from(phase).checked_sub(1)?;
        self.phase_gates.get(idx).map(String::as_str)
    }

    pub fn is_start_trigger(&self, source_name: &str, target_name: &str) -> bool {
        target_name == self.boss_name && source_name != self.boss_name
    }

    pub fn is_encounter_zone(&self, zone_name: &str) -> bool {
        zone_name == self.zone_name
    }

    pub fn is_wipe(&self, command: &str) -> bool {
        command == self.wipe_command
    }

    /// Never negative; saturates for values outside chrono's range
    pub fn minimum_pull_duration(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.minimum_pull_secs.max(0)).unwrap_or(TimeDelta::MAX)
    }
}
