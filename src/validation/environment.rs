//! Cross-validation of the environment config against the model
//!
//! Two ordered phases: [`EnvConfig::check_basic_compatibility`] rejects configs
//! that name fields the model does not have, then [`EnvConfig::expand_config`]
//! fills the gym keys left unset with positional defaults.

use crate::config::{EnvConfig, InfoSelector};
use crate::error::IrError;
use crate::models::roles::{EXTERNAL_INPUTS, EXTERNAL_OUTPUTS, INSTANCE_PARAMETERS};
use crate::models::{Module, Type};
use tracing::{debug, info};

/// Observation, reward and done each need an output
const MIN_OUTPUT_FIELDS: usize = 3;

const NO_PARAMETER_MESSAGE: &str = "Model must have at least one parameter.
Environment without parameters is most likely a modeling mistake.
Make sure that your tunable parameters are
    1. in model workspace
    2. of Simulink Parameter type
    3. with Argument checkbox checked
For more information, see documentation.";

fn required_role<'m>(module: &'m Module, role: &str, message: &str) -> Result<&'m Type, IrError> {
    let name = module
        .model_class
        .type_for_role(role)
        .ok_or_else(|| IrError::MissingTypeMapping {
            role: role.to_string(),
            message: message.to_string(),
        })?;
    module.types.lookup(name)
}

fn require_key(role: &str, key: Option<&str>, ty: &Type) -> Result<(), IrError> {
    match key {
        Some(key) if !ty.has_member(key) => Err(IrError::KeyNotFound {
            role: role.to_string(),
            key: key.to_string(),
            type_name: ty.name().to_string(),
        }),
        _ => Ok(()),
    }
}

fn positional_key(ty: &Type, position: usize) -> Result<String, IrError> {
    ty.fields()
        .get(position)
        .map(|f| f.name.clone())
        .ok_or_else(|| IrError::TooFewFields {
            type_name: ty.name().to_string(),
            required: position + 1,
            actual: ty.fields().len(),
        })
}

impl EnvConfig {
    /// Check the config against `module`
    ///
    /// Nothing is required unless the raw or gym wrapper is requested. Then the
    /// model needs inputs (controllability), outputs (observability) and instance
    /// parameters (randomness across episodes).
    pub fn check_basic_compatibility(&self, module: &Module) -> Result<(), IrError> {
        if !self.use_gym && !self.use_raw {
            debug!("No environment wrapper requested, skipping compatibility check");
            return Ok(());
        }

        let inputs = required_role(module, EXTERNAL_INPUTS, "Model must have at least one inport.")?;
        let outputs = required_role(module, EXTERNAL_OUTPUTS, "Model must have at least one outport.")?;
        let params = required_role(module, INSTANCE_PARAMETERS, NO_PARAMETER_MESSAGE)?;

        if let Some(gym) = self.gym() {
            require_key("Action", gym.action_key.as_deref(), inputs)?;
            if outputs.fields().len() < MIN_OUTPUT_FIELDS {
                return Err(IrError::TooFewFields {
                    type_name: outputs.name().to_string(),
                    required: MIN_OUTPUT_FIELDS,
                    actual: outputs.fields().len(),
                });
            }
            require_key("Observation", gym.observation_key.as_deref(), outputs)?;
            require_key("Reward", gym.reward_key.as_deref(), outputs)?;
            require_key("Done", gym.done_key.as_deref(), outputs)?;
            if let InfoSelector::Keys(keys) = &gym.info {
                for key in keys {
                    require_key("Info", Some(key.as_str()), outputs)?;
                }
            }
            gym.action_space.check("action")?;
            gym.observation_space.check("observation")?;
            gym.reward_initializer()?;
        }

        for (key, init) in &self.parameter {
            if key.starts_with('@') {
                if !init.is_custom() {
                    return Err(IrError::incompatible_init(
                        key,
                        "keys starting with '@' must use \"custom\" type initialization",
                    ));
                }
                continue;
            }
            let field = params.field(key).ok_or_else(|| IrError::ParameterNotFound {
                key: key.clone(),
                type_name: params.name().to_string(),
            })?;
            init.check_basic_compatibility(field)?;
        }

        info!(
            "Environment config compatible with {} ({} parameter initializers)",
            module.name,
            self.parameter.len()
        );
        Ok(())
    }

    /// Fill unset gym keys and resolve the info selector
    ///
    /// The action defaults to the first input; observation, reward and done to the
    /// first three outputs. `info = true` becomes every remaining output and
    /// `info = false` an empty list. Run after [`Self::check_basic_compatibility`].
    pub fn expand_config(&mut self, module: &Module) -> Result<(), IrError> {
        if !self.use_gym {
            return Ok(());
        }
        let inputs = module.role_type(EXTERNAL_INPUTS)?;
        let outputs = module.role_type(EXTERNAL_OUTPUTS)?;
        let gym = self.gym.get_or_insert_with(Default::default);

        if gym.action_key.is_none() {
            gym.action_key = Some(positional_key(inputs, 0)?);
        }
        if gym.observation_key.is_none() {
            gym.observation_key = Some(positional_key(outputs, 0)?);
        }
        if gym.reward_key.is_none() {
            gym.reward_key = Some(positional_key(outputs, 1)?);
        }
        if gym.done_key.is_none() {
            gym.done_key = Some(positional_key(outputs, 2)?);
        }

        if let InfoSelector::All(all) = gym.info {
            let used = [&gym.observation_key, &gym.reward_key, &gym.done_key];
            let keys = if all {
                outputs
                    .fields()
                    .iter()
                    .filter(|f| !used.iter().any(|k| k.as_deref() == Some(f.name.as_str())))
                    .map(|f| f.name.clone())
                    .collect()
            } else {
                Vec::new()
            };
            gym.info = InfoSelector::Keys(keys);
        }

        debug!(
            "Expanded gym keys: action={:?} observation={:?} reward={:?} done={:?} info={:?}",
            gym.action_key, gym.observation_key, gym.reward_key, gym.done_key, gym.info
        );
        Ok(())
    }
}

impl Module {
    /// Validate the module's own environment config, then expand it in place
    pub fn prepare_env(&mut self) -> Result<(), IrError> {
        self.env.check_basic_compatibility(self)?;
        let mut env = self.env.clone();
        env.expand_config(self)?;
        self.env = env;
        Ok(())
    }
}
