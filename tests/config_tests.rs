//! Configuration document tests

use model_binding_ir::config::{InfoConfig, InfoSelector, Solver};
use model_binding_ir::format::{Dtype, Infinity, NumericValue, Scalar};
use model_binding_ir::{EnvConfig, ErrorKind, InitConfig, IrError, ModelConfig, SpaceConfig};

mod env_config_tests {
    use super::*;

    #[test]
    fn test_minimal_document_defaults() {
        let env = EnvConfig::from_toml_str(
            r#"
            __version__ = "1.0"
            use_raw = false
            use_gym = true
            use_rng = false
            use_vec = false
            vec_parallel = false
            "#,
        )
        .unwrap();

        let gym = env.gym().unwrap();
        assert_eq!(gym.action_key, None);
        assert_eq!(gym.info, InfoSelector::All(true));
        assert_eq!(gym.action_space, SpaceConfig::default());
        assert_eq!(gym.reward_range.low, Scalar::Inf(Infinity::Negative));
        assert!(env.reset.first_step());
        assert!(env.parameter.is_empty());
    }

    #[test]
    fn test_gym_dropped_when_disabled() {
        let env = EnvConfig::from_toml_str(
            r#"
            __version__ = "1.0"
            use_raw = true
            use_gym = false
            use_rng = true
            use_vec = false
            vec_parallel = false

            [gym]
            action_key = "u"
            "#,
        )
        .unwrap();
        assert!(env.gym.is_none());
        assert!(env.gym().is_none());
    }

    #[test]
    fn test_reset_drops_irrelevant_port() {
        let env = EnvConfig::from_toml_str(
            r#"
            __version__ = "1.0"
            use_raw = true
            use_gym = false
            use_rng = true
            use_vec = false
            vec_parallel = false

            [reset]
            first_step = true
            input = "u"
            output = "y"
            "#,
        )
        .unwrap();
        assert_eq!(env.reset.input(), Some("u"));
        assert_eq!(env.reset.output(), None);
    }

    #[test]
    fn test_integer_reward_range_rejected() {
        let err = EnvConfig::from_toml_str(
            r#"
            __version__ = "1.0"
            use_raw = true
            use_gym = true
            use_rng = true
            use_vec = false
            vec_parallel = false

            [gym]
            reward_range = [0, 1]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, IrError::InvalidConfig(_)));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("not ints"));
        assert!(err.user_message().contains("Hint:"));
    }

    #[test]
    fn test_parameter_initializers() {
        let env = EnvConfig::from_toml_str(
            r#"
            __version__ = "1.0"
            use_raw = true
            use_gym = false
            use_rng = true
            use_vec = false
            vec_parallel = false

            [parameter.seed]
            type = "seed"

            [parameter.k]
            type = "constant"
            value = "inf"

            [parameter.gain]
            type = "uniform"
            low = [0.0, 0.5]
            high = 2

            [parameter."@hook"]
            type = "custom"
            code = "hook();"
            "#,
        )
        .unwrap();
        assert_eq!(env.parameter["seed"], InitConfig::Seed);
        assert_eq!(
            env.parameter["k"],
            InitConfig::Constant {
                value: Scalar::Inf(Infinity::Positive)
            }
        );
        assert!(matches!(
            &env.parameter["gain"],
            InitConfig::Uniform { low: NumericValue::Sequence(low), high: NumericValue::Scalar(Scalar::Int(2)) }
                if low.len() == 2
        ));
        assert!(env.parameter["@hook"].is_custom());
        assert_eq!(
            InitConfig::unique_kinds(env.parameter.values()),
            vec!["constant", "custom", "seed", "uniform"]
        );
    }

    #[test]
    fn test_unknown_initializer_tag() {
        let err = EnvConfig::from_toml_str(
            r#"
            __version__ = "1.0"
            use_raw = true
            use_gym = false
            use_rng = true
            use_vec = false
            vec_parallel = false

            [parameter.k]
            type = "gaussian"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, IrError::InvalidConfig(_)));
        assert!(err.to_string().contains("Environment config"));
        assert!(err.user_message().contains("\"uniform\""));
    }

    #[test]
    fn test_version_required() {
        let err = EnvConfig::from_toml_str("use_raw = true").unwrap_err();
        assert!(matches!(err, IrError::VersionMismatch { .. }));
    }

    #[test]
    fn test_default_document_round_trip() {
        let text = EnvConfig::default().to_toml_string().unwrap();
        assert!(text.contains("__version__ = \"1.0\""));
        assert_eq!(EnvConfig::from_toml_str(&text).unwrap(), EnvConfig::default());
    }
}

mod space_tests {
    use super::*;

    #[test]
    fn test_spaces_from_toml() {
        let space: SpaceConfig = toml::from_str(
            r#"
            type = "MultiDiscrete"
            nvec = [3, 4]
            "#,
        )
        .unwrap();
        assert_eq!(space.func(), "make_multi_discrete");
        assert_eq!(space.ctype(), "int64_t");
        assert_eq!(space.initializer().unwrap(), "{ 3, 4 }");

        let space: SpaceConfig = toml::from_str(
            r#"
            type = "Box"
            low = "-inf"
            high = [1.0, 2.0]
            shape = [2]
            dtype = "float32"
            "#,
        )
        .unwrap();
        assert_eq!(space.dtype(), Dtype::Float32);
        assert_eq!(space.func(), "make_box<float>");
        assert!(space.check("observation").is_ok());
    }

    #[test]
    fn test_space_checks() {
        assert!(matches!(
            SpaceConfig::Discrete { n: 0 }.check("action"),
            Err(IrError::InvalidSpace { .. })
        ));
        assert!(SpaceConfig::MultiDiscrete { nvec: vec![] }.check("action").is_err());
    }
}

mod model_config_tests {
    use super::*;

    #[test]
    fn test_model_document() {
        let config = ModelConfig::from_toml_str(
            r#"
            __version__ = "1.0"
            model = "Pendulum"

            [simulink]
            solver = "ode4"
            absolute_time = false
            integer_code = false
            non_finite = true
            complex = false
            continuous_time = true
            variable_size_signal = false
            non_inlined_sfcn = false

            [cpp]
            class_name = "PendulumModel"
            namespace = "sim"

            [info]
            description = "<auto>"
            version = "3.0"
            author = "<auto>"
            license = "MIT"
            "#,
        )
        .unwrap();
        assert_eq!(config.simulink.solver, Solver::Ode4);
        assert!(config.simulink.continuous_time);
        assert_eq!(config.info.resolve_version("1.0"), "3.0");
        assert_eq!(config.info.resolve_author("Lab"), "Lab");
        assert_eq!(config.info.resolve_license(), "MIT");
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let mut config = ModelConfig::new("Pendulum", "PendulumModel", "");
        config.cpp.namespace = "sim-core".to_string();
        let text = config.to_toml_string().unwrap();
        assert!(matches!(
            ModelConfig::from_toml_str(&text),
            Err(IrError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_solver_is_configuration_error() {
        let err = ModelConfig::from_toml_str(
            r#"
            __version__ = "1.0"
            model = "Pendulum"

            [simulink]
            solver = "ode99"
            absolute_time = false
            integer_code = false
            non_finite = true
            complex = false
            continuous_time = true
            variable_size_signal = false
            non_inlined_sfcn = false

            [cpp]
            class_name = "PendulumModel"
            namespace = ""

            [info]
            description = "<auto>"
            version = "<auto>"
            author = "<auto>"
            license = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, IrError::InvalidConfig(_)));
        assert!(err.to_string().contains("Model config"));
    }

    #[test]
    fn test_default_info() {
        let info = InfoConfig::default();
        assert_eq!(info.resolve_description("From metadata"), "From metadata");
        assert_eq!(info.resolve_license(), "");
    }
}
