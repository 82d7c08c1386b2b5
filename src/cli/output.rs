//! Output formatting for CLI

use crate::config::{EnvConfig, InitConfig};
use crate::error::IrError;
use crate::models::{Context, Type, describe_field};

/// Format an IR summary in compact mode
pub fn format_compact_output(context: &Context) -> Result<String, IrError> {
    let module = &context.module;
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} ({})\n",
        module.name, module.version, module.model_class.name
    ));
    let order: Vec<&str> = module
        .types
        .dependency_order()?
        .into_iter()
        .map(Type::name)
        .collect();
    output.push_str(&format!("  Types: {}\n", order.join(", ")));
    output.push_str(&format!("  Sources: {}\n", context.sources.join(", ")));
    output.push_str(&format!("  Wrappers: {}\n", wrapper_list(&module.env).join(", ")));

    Ok(output)
}

/// Format an IR summary in pretty mode
pub fn format_pretty_output(context: &Context) -> Result<String, IrError> {
    let module = &context.module;
    let mut output = String::new();

    output.push_str(&format!("\nModule {}\n", module.name));
    if !module.doc.is_empty() {
        output.push_str(&format!("  {}\n", module.doc));
    }
    output.push_str(&format!("  Version: {}\n", module.version));
    output.push_str(&format!("  Author: {}\n", module.author));
    output.push_str(&format!("  License: {}\n", module.license));

    let mc = &module.model_class;
    output.push_str(&format!("\nModel class {} ({})\n", mc.name, mc.identifier));
    output.push_str(&format!("  Sample time: {}\n", mc.sample_time));
    for field in &mc.fields {
        output.push_str(&format!("  - {}: {}\n", field.name, describe_field(&field.name)));
    }

    let types = &module.types;
    output.push_str(&format!(
        "\nTypes ({} in root, {} in model class), dependency order:\n",
        types.in_root().len(),
        types.in_model_class().len()
    ));
    for ty in types.dependency_order()? {
        let kind = if ty.is_enum() { "enum" } else { "struct" };
        output.push_str(&format!(
            "  {} {} [{}, {} members]: {}\n",
            kind,
            ty.name(),
            ty.location(),
            ty.members().len(),
            describe_field(ty.name())
        ));
    }

    let env = &module.env;
    output.push_str(&format!("\nWrappers: {}\n", wrapper_list(env).join(", ")));
    if let Some(gym) = env.gym() {
        let key = |k: &Option<String>| k.clone().unwrap_or_default();
        output.push_str(&format!("  Action: {} ({})\n", key(&gym.action_key), gym.action_space.func()));
        output.push_str(&format!(
            "  Observation: {} ({})\n",
            key(&gym.observation_key),
            gym.observation_space.func()
        ));
        output.push_str(&format!("  Reward: {} [{}]\n", key(&gym.reward_key), gym.reward_initializer()?));
        output.push_str(&format!("  Done: {}\n", key(&gym.done_key)));
    }
    if !env.parameter.is_empty() {
        output.push_str(&format!(
            "  Parameters: {} ({})\n",
            env.parameter.keys().cloned().collect::<Vec<_>>().join(", "),
            InitConfig::unique_kinds(env.parameter.values()).join(", ")
        ));
    }

    Ok(output)
}

fn wrapper_list(env: &EnvConfig) -> Vec<&'static str> {
    [
        (env.use_raw, "raw"),
        (env.use_gym, "gym"),
        (env.use_vec, "vec"),
    ]
    .into_iter()
    .filter_map(|(enabled, name)| enabled.then_some(name))
    .collect()
}
