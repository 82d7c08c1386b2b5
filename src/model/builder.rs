//! Builds the IR from metadata and user configuration

use super::metadata::Metadata;
use crate::config::{EnvConfig, ModelConfig};
use crate::error::IrError;
use crate::models::{Context, ModelClass, Module, TypeContainer};
use tracing::{info, warn};

/// Headers the bindings include for a model
pub fn default_headers(model_name: &str) -> Vec<String> {
    vec![format!("{}.h", model_name)]
}

/// Build, validate and expand the IR
///
/// Info values marked `<auto>` in the model config are taken from the metadata.
/// The dependency order is computed once so that cyclic or dangling type
/// references fail here rather than during rendering.
pub fn build_context(
    metadata: &Metadata,
    model_config: &ModelConfig,
    env_config: EnvConfig,
    sources: Vec<String>,
    headers: Vec<String>,
) -> Result<Context, IrError> {
    if model_config.model != metadata.name {
        warn!(
            "Model config names '{}' but metadata describes '{}'",
            model_config.model, metadata.name
        );
    }

    let info_config = &model_config.info;
    let doc = info_config.resolve_description(&metadata.description);
    let mc = &metadata.model_class;
    let model_class = ModelClass {
        name: mc.name.clone(),
        doc: doc.clone(),
        namespace: mc.namespace.clone(),
        identifier: mc.identifier.clone(),
        sample_time: metadata.sample_time,
        methods: mc.methods(),
        fields: mc.fields()?,
        field_mapping: mc.field_mapping.clone(),
        type_mapping: mc.type_mapping.clone(),
    };

    let defs = metadata
        .structs
        .iter()
        .map(|st| st.to_type_def())
        .collect::<Result<Vec<_>, _>>()?;
    let types = TypeContainer::new(defs, model_class.identifier.clone())?;
    types.dependency_order()?;

    let mut module = Module {
        name: metadata.name.clone(),
        doc,
        version: info_config.resolve_version(&metadata.version),
        author: info_config.resolve_author(&metadata.author),
        license: info_config.resolve_license(),
        model_class,
        types,
        env: env_config,
    };
    module.prepare_env()?;

    info!(
        "Built IR for {}: {} types, {} sources",
        module.name,
        module.types.len(),
        sources.len()
    );
    Ok(Context {
        sources,
        headers,
        module,
    })
}
