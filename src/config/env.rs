//! Environment wrapper configuration (`env.toml`)

use super::init::InitConfig;
use super::space::SpaceConfig;
use super::{parse_versioned_toml, to_versioned_toml};
use crate::error::IrError;
use crate::format::{Dtype, Infinity, Scalar, format_float};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reward bounds, each a float or `inf`/`-inf`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Scalar>", into = "Vec<Scalar>")]
pub struct RewardRange {
    pub low: Scalar,
    pub high: Scalar,
}

impl Default for RewardRange {
    fn default() -> Self {
        Self {
            low: Scalar::Inf(Infinity::Negative),
            high: Scalar::Inf(Infinity::Positive),
        }
    }
}

impl TryFrom<Vec<Scalar>> for RewardRange {
    type Error = String;

    fn try_from(values: Vec<Scalar>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [low, high] if !low.is_int() && !high.is_int() => Ok(Self {
                low: *low,
                high: *high,
            }),
            _ => Err("reward_range must be a pair of floats or +/-inf, not ints".to_string()),
        }
    }
}

impl From<RewardRange> for Vec<Scalar> {
    fn from(range: RewardRange) -> Self {
        vec![range.low, range.high]
    }
}

/// Which outputs are forwarded in the gym `info` dict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoSelector {
    /// `true` forwards every output not used for observation/reward/done
    All(bool),
    Keys(Vec<String>),
}

impl Default for InfoSelector {
    fn default() -> Self {
        InfoSelector::All(true)
    }
}

/// Gym-style view over the model's external inputs and outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymConfig {
    #[serde(default)]
    pub action_key: Option<String>,
    #[serde(default)]
    pub observation_key: Option<String>,
    #[serde(default)]
    pub reward_key: Option<String>,
    #[serde(default)]
    pub done_key: Option<String>,
    #[serde(default)]
    pub info: InfoSelector,
    #[serde(default)]
    pub action_space: SpaceConfig,
    #[serde(default)]
    pub observation_space: SpaceConfig,
    #[serde(default)]
    pub reward_range: RewardRange,
    #[serde(default)]
    pub type_coercion: bool,
}

impl Default for GymConfig {
    fn default() -> Self {
        Self {
            action_key: None,
            observation_key: None,
            reward_key: None,
            done_key: None,
            info: InfoSelector::default(),
            action_space: SpaceConfig::default(),
            observation_space: SpaceConfig::default(),
            reward_range: RewardRange::default(),
            type_coercion: true,
        }
    }
}

impl GymConfig {
    /// Reward range as two `double` literals
    pub fn reward_initializer(&self) -> Result<String, IrError> {
        Ok(format!(
            "{}, {}",
            format_float(self.reward_range.low, Dtype::Float64)?,
            format_float(self.reward_range.high, Dtype::Float64)?
        ))
    }

    /// C types of the Box spaces in use, deduplicated and sorted
    pub fn unique_boxes(&self) -> Vec<&'static str> {
        [&self.action_space, &self.observation_space]
            .into_iter()
            .filter_map(|space| match space {
                SpaceConfig::Box { dtype, .. } => Some(dtype.ctype()),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Which model port drives the reset of an episode
///
/// When `first_step` is set the reset observation comes from the first step and
/// only `input` is meaningful, otherwise only `output` is. The irrelevant one is
/// dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResetRecord")]
pub struct ResetConfig {
    first_step: bool,
    input: Option<String>,
    output: Option<String>,
}

#[derive(Deserialize)]
struct ResetRecord {
    first_step: bool,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    output: Option<String>,
}

impl From<ResetRecord> for ResetConfig {
    fn from(record: ResetRecord) -> Self {
        ResetConfig::new(record.first_step, record.input, record.output)
    }
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self::new(true, None, None)
    }
}

impl ResetConfig {
    pub fn new(first_step: bool, input: Option<String>, output: Option<String>) -> Self {
        let (input, output) = if first_step {
            (input, None)
        } else {
            (None, output)
        };
        Self {
            first_step,
            input,
            output,
        }
    }

    pub fn first_step(&self) -> bool {
        self.first_step
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

/// Environment wrapper options
///
/// `gym` is present exactly when `use_gym` is set; a missing block is defaulted.
/// `reset` is always present. Parameter keys starting with `@` name code-only
/// initializers that do not correspond to a parameter field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EnvConfigRecord")]
pub struct EnvConfig {
    pub use_raw: bool,
    pub use_gym: bool,
    pub use_rng: bool,
    pub use_vec: bool,
    pub vec_parallel: bool,
    pub gym: Option<GymConfig>,
    pub reset: ResetConfig,
    pub parameter: BTreeMap<String, InitConfig>,
}

#[derive(Deserialize)]
struct EnvConfigRecord {
    use_raw: bool,
    use_gym: bool,
    use_rng: bool,
    use_vec: bool,
    vec_parallel: bool,
    #[serde(default)]
    gym: Option<GymConfig>,
    #[serde(default)]
    reset: Option<ResetConfig>,
    #[serde(default)]
    parameter: BTreeMap<String, InitConfig>,
}

impl From<EnvConfigRecord> for EnvConfig {
    fn from(record: EnvConfigRecord) -> Self {
        let gym = if record.use_gym {
            Some(record.gym.unwrap_or_default())
        } else {
            None
        };
        Self {
            use_raw: record.use_raw,
            use_gym: record.use_gym,
            use_rng: record.use_rng,
            use_vec: record.use_vec,
            vec_parallel: record.vec_parallel,
            gym,
            reset: record.reset.unwrap_or_default(),
            parameter: record.parameter,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            use_raw: true,
            use_gym: true,
            use_rng: true,
            use_vec: true,
            vec_parallel: false,
            gym: Some(GymConfig::default()),
            reset: ResetConfig::default(),
            parameter: BTreeMap::new(),
        }
    }
}

impl EnvConfig {
    pub const DOCUMENT: &'static str = "Environment config";

    /// Parse a version-tagged `env.toml` document
    pub fn from_toml_str(text: &str) -> Result<Self, IrError> {
        let table = parse_versioned_toml(Self::DOCUMENT, text)?;
        toml::Value::Table(table)
            .try_into()
            .map_err(|e| IrError::InvalidConfig(format!("{}: {}", Self::DOCUMENT, e)))
    }

    /// Render as a version-tagged `env.toml` document
    pub fn to_toml_string(&self) -> Result<String, IrError> {
        to_versioned_toml(self)
    }

    /// Gym options, present when `use_gym` is set
    pub fn gym(&self) -> Option<&GymConfig> {
        self.gym.as_ref().filter(|_| self.use_gym)
    }
}
