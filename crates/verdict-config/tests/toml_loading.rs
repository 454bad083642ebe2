//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use verdict_config::{ConfigError, VerdictConfig};

#[test]
fn loads_database_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/verdict/state.db"
busy_timeout_ms = 250
"#,
        )?;

        let config: VerdictConfig = Figment::from(Serialized::defaults(VerdictConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "/var/lib/verdict/state.db");
        assert_eq!(config.database.busy_timeout_ms, 250);
        Ok(())
    });
}

#[test]
fn loads_aggregation_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[aggregation]
idle_timeout_ms = 1500
retry_max_attempts = 7
retry_base_delay_ms = 10
retry_max_delay_ms = 80
"#,
        )?;

        let config: VerdictConfig = Figment::from(Serialized::defaults(VerdictConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.aggregation.idle_timeout_ms, 1500);
        assert_eq!(config.aggregation.retry_max_attempts, 7);
        assert_eq!(config.aggregation.retry_base_delay_ms, 10);
        assert_eq!(config.aggregation.retry_max_delay_ms, 80);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
default_limit = 5
"#,
        )?;

        let config: VerdictConfig = Figment::from(Serialized::defaults(VerdictConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.default_limit, 5);
        assert_eq!(config.database.path, ".verdict/verdict.db");
        assert_eq!(config.aggregation.retry_max_attempts, 4);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "from-toml.db"
"#,
        )?;
        jail.set_env("VERDICT_DATABASE__PATH", "from-env.db");

        let config: VerdictConfig = Figment::from(Serialized::defaults(VerdictConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("VERDICT_").split("__"))
            .extract()?;

        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load_from() {
    Jail::expect_with(|jail| {
        jail.create_dir(".verdict")?;
        jail.create_file(
            ".verdict/config.toml",
            r#"
[aggregation]
idle_timeout_ms = 42
"#,
        )?;

        let config = VerdictConfig::load_from(jail.directory()).expect("config loads");
        assert_eq!(config.aggregation.idle_timeout_ms, 42);
        Ok(())
    });
}

#[test]
fn invalid_project_config_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_dir(".verdict")?;
        jail.create_file(
            ".verdict/config.toml",
            r#"
[aggregation]
retry_max_attempts = 0
"#,
        )?;

        let err = VerdictConfig::load_from(jail.directory()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}

#[test]
fn wrong_type_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".verdict")?;
        jail.create_file(
            ".verdict/config.toml",
            r#"
[database]
busy_timeout_ms = "soon"
"#,
        )?;

        let err = VerdictConfig::load_from(jail.directory()).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}
