//! Semantic roles of the structs emitted by the code generator

/// A generated struct role: mapping key, name suffix and description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub name: &'static str,
    pub suffix: &'static str,
    pub description: &'static str,
}

const fn role(name: &'static str, suffix: &'static str, description: &'static str) -> Role {
    Role {
        name,
        suffix,
        description,
    }
}

pub const EXTERNAL_INPUTS: &str = "external_inputs";
pub const EXTERNAL_OUTPUTS: &str = "external_outputs";
pub const INSTANCE_PARAMETERS: &str = "instance_parameters";

/// Known roles in lookup order
pub static ROLES: [Role; 18] = [
    role("block_signals", "B", "Block signals of the system"),
    role(EXTERNAL_INPUTS, "U", "Input data"),
    role("external_input_sizes", "USize", "Size of input data"),
    role(EXTERNAL_OUTPUTS, "Y", "Output data"),
    role("external_output_sizes", "YSize", "Size of output data"),
    role("parameters", "P", "Parameters for the system"),
    role("const_block_signals", "ConstB", "Block inputs and outputs that are constants"),
    role("machine_local_data", "MachLocal", "Used by ERT S-function targets"),
    role("const_parameters", "ConstP", "Constant parameters in the system"),
    role(
        "const_parameters_with_init",
        "ConstInitP",
        "Initialization data for constant parameters in the system",
    ),
    role("discrete_states", "DW", "Block states in the system"),
    role("mass_matrix", "MassMatrix", "Used for physical modeling blocks"),
    role("zero_crossing_states", "PrevZCX", "Previous zero-crossing signal state"),
    role("continuous_states", "X", "Continuous states"),
    role("disabled_states", "XDis", "Status of an enabled subsystem"),
    role(
        "state_derivatives",
        "XDot",
        "Derivatives of continuous states at each time step",
    ),
    role("zero_crossing_signals", "ZCV", "Zero-crossing signals"),
    role(INSTANCE_PARAMETERS, "InstP", "Parameter arguments for the system"),
];

pub fn find_role(name: &str) -> Option<&'static Role> {
    ROLES.iter().find(|r| r.name == name)
}

/// Description of a generated member or struct from its `_<suffix>` ending
pub fn describe_field(name: &str) -> &'static str {
    ROLES
        .iter()
        .find(|r| {
            name.strip_suffix(r.suffix)
                .is_some_and(|rest| rest.ends_with('_'))
        })
        .map(|r| r.description)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_field() {
        assert_eq!(describe_field("Pendulum_U"), "Input data");
        assert_eq!(describe_field("ExtY_Y"), "Output data");
        assert_eq!(describe_field("rt_DW"), "Block states in the system");
        assert_eq!(describe_field("Model_XDot"), "Derivatives of continuous states at each time step");
        assert_eq!(describe_field("Pendulum"), "Unknown");
        assert_eq!(describe_field("PendulumU"), "Unknown");
    }

    #[test]
    fn test_find_role() {
        assert_eq!(find_role(INSTANCE_PARAMETERS).unwrap().suffix, "InstP");
        assert_eq!(find_role(EXTERNAL_INPUTS).unwrap().suffix, "U");
        assert!(find_role("object").is_none());
        assert_eq!(ROLES.len(), 18);
    }
}
