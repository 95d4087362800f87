//! Shared components for CLI commands
//!
//! Logging setup, configuration layering and input expansion used by every
//! command implementation.

use crate::cli::args::GlobalArgs;
use crate::config::ProcessorConfig;
use crate::error::{NotamError, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Set up structured logging on stderr
pub fn setup_logging(args: &GlobalArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("notam_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Apply command-line overrides on top of the defaults, then validate
pub fn load_configuration(args: &GlobalArgs) -> Result<ProcessorConfig> {
    let mut config = ProcessorConfig::default();

    if let Some(data_dir) = &args.data_dir {
        config = config.with_data_dir(data_dir.clone());
    } else if args.user_data_dir {
        let data_dir = ProcessorConfig::default_data_dir()?;
        debug!("Using user data directory {}", data_dir.display());
        config = config.with_data_dir(data_dir);
    }
    if let Some(offset) = args.utc_offset {
        config = config.with_utc_offset(offset);
    }
    if !args.show_progress() {
        config = config.without_progress();
    }

    config.validate()?;
    Ok(config)
}

/// Expand glob patterns in the order given.
///
/// Matches of one pattern are sorted. A pattern without matches is kept as a
/// literal path so that table validation reports it as missing.
pub fn expand_input_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|e| NotamError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut matched = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => matched.push(path),
                Err(e) => warn!("Skipping unreadable match for '{}': {}", pattern, e),
            }
        }

        if matched.is_empty() {
            debug!("Pattern '{}' matched nothing, using it as a path", pattern);
            inputs.push(PathBuf::from(pattern));
        } else {
            matched.sort();
            inputs.extend(matched);
        }
    }

    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn global(offset: Option<f64>, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            data_dir: None,
            user_data_dir: false,
            utc_offset: offset,
            verbose: 0,
            quiet,
        }
    }

    #[test]
    fn test_load_configuration_overrides() {
        let config = load_configuration(&global(Some(-3.0), true)).unwrap();
        assert_eq!(config.utc_offset_hours, -3.0);
        assert!(!config.show_progress);

        assert!(load_configuration(&global(Some(99.0), false)).is_err());
    }

    #[test]
    fn test_user_data_dir_sets_base_directory() {
        let mut args = global(None, true);
        args.user_data_dir = true;

        // Hosts without a home directory report a configuration error instead
        match ProcessorConfig::default_data_dir() {
            Ok(expected) => {
                let config = load_configuration(&args).unwrap();
                assert_eq!(config.data_dir.as_deref(), Some(expected.as_path()));
                assert_eq!(
                    config.canonical_path(),
                    expected.join(crate::constants::DEFAULT_CANONICAL_TABLE)
                );
            }
            Err(_) => assert!(load_configuration(&args).is_err()),
        }
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let mut args = global(None, true);
        args.data_dir = Some(PathBuf::from("/srv/notam"));
        args.user_data_dir = true;

        let config = load_configuration(&args).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/notam")));
    }

    #[test]
    fn test_expand_input_patterns() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["notam_fetch_faa.csv", "notam_fetch_ourairports.csv", "other.txt"] {
            fs::write(temp_dir.path().join(name), "").unwrap();
        }
        let base = temp_dir.path().display().to_string();

        let inputs = expand_input_patterns(&[
            format!("{}/notam_fetch_*.csv", base),
            format!("{}/absent.csv", base),
        ])
        .unwrap();

        assert_eq!(
            inputs,
            vec![
                temp_dir.path().join("notam_fetch_faa.csv"),
                temp_dir.path().join("notam_fetch_ourairports.csv"),
                temp_dir.path().join("absent.csv"),
            ]
        );
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let result = expand_input_patterns(&["notam_[.csv".to_string()]);
        assert!(matches!(result, Err(NotamError::InvalidPattern { .. })));
    }
}
