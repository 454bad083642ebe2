use verdict_config::VerdictConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration (with `.env`) and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<VerdictConfig> {
    let mut config = VerdictConfig::load_with_dotenv()?;
    apply_overrides(&mut config, flags)?;
    Ok(config)
}

fn apply_overrides(config: &mut VerdictConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(path) = &flags.database {
        config.database.path.clone_from(path);
    }
    if let Some(limit) = flags.limit {
        config.general.default_limit = limit;
    }
    config.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::apply_overrides;
    use crate::cli::{GlobalFlags, OutputFormat};
    use verdict_config::VerdictConfig;

    fn flags(database: Option<&str>, limit: Option<u32>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit,
            quiet: false,
            verbose: false,
            database: database.map(String::from),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = VerdictConfig::default();
        apply_overrides(&mut config, &flags(Some(":memory:"), Some(5))).expect("valid overrides");
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.general.default_limit, 5);
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = VerdictConfig::default();
        apply_overrides(&mut config, &flags(None, None)).expect("valid config");
        assert_eq!(config.database.path, ".verdict/verdict.db");
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn empty_database_path_rejected() {
        let mut config = VerdictConfig::default();
        assert!(apply_overrides(&mut config, &flags(Some("  "), None)).is_err());
    }
}
