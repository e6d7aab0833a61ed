//! Service configuration read from environment variables.

use std::str::FromStr;

use srs_core::{SchedulerError, SchedulerSettings};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Runtime configuration for the review service.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub algorithm: String,
    pub scheduler: SchedulerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            algorithm: "sm2".to_string(),
            scheduler: SchedulerSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Recognised env vars (all optional):
    /// - HOST, PORT: Listen address
    /// - SRS_ALGORITHM: Scheduler name ("sm2")
    /// - SRS_LEARNING_STEPS, SRS_RELEARNING_STEPS: Comma-separated minutes
    /// - SRS_GRADUATING_INTERVAL, SRS_EASY_INTERVAL, SRS_MINIMUM_LAPSE_INTERVAL,
    ///   SRS_MAXIMUM_INTERVAL: Days
    /// - SRS_STARTING_EASE, SRS_MINIMUM_EASE, SRS_EASY_BONUS, SRS_HARD_MULTIPLIER,
    ///   SRS_LAPSE_MULTIPLIER: Factors
    /// - SRS_REVIEW_ORDER: "reject" or "clamp"
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let base = defaults.scheduler;

        let scheduler = SchedulerSettings {
            learning_steps: steps_var(&lookup, "SRS_LEARNING_STEPS", base.learning_steps)?,
            relearning_steps: steps_var(&lookup, "SRS_RELEARNING_STEPS", base.relearning_steps)?,
            graduating_interval: var(&lookup, "SRS_GRADUATING_INTERVAL", base.graduating_interval)?,
            easy_interval: var(&lookup, "SRS_EASY_INTERVAL", base.easy_interval)?,
            starting_ease: var(&lookup, "SRS_STARTING_EASE", base.starting_ease)?,
            minimum_ease: var(&lookup, "SRS_MINIMUM_EASE", base.minimum_ease)?,
            easy_bonus: var(&lookup, "SRS_EASY_BONUS", base.easy_bonus)?,
            hard_multiplier: var(&lookup, "SRS_HARD_MULTIPLIER", base.hard_multiplier)?,
            lapse_multiplier: var(&lookup, "SRS_LAPSE_MULTIPLIER", base.lapse_multiplier)?,
            minimum_lapse_interval: var(
                &lookup,
                "SRS_MINIMUM_LAPSE_INTERVAL",
                base.minimum_lapse_interval,
            )?,
            maximum_interval: var(&lookup, "SRS_MAXIMUM_INTERVAL", base.maximum_interval)?,
            review_order: var(&lookup, "SRS_REVIEW_ORDER", base.review_order)?,
        };
        scheduler.validate()?;

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: var(&lookup, "PORT", defaults.port)?,
            algorithm: lookup("SRS_ALGORITHM").unwrap_or(defaults.algorithm),
            scheduler,
        })
    }

    /// Socket address string to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key,
                value: value.clone(),
            }),
        None => Ok(default),
    }
}

fn steps_var<F>(lookup: &F, key: &'static str, default: Vec<u32>) -> Result<Vec<u32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use srs_core::ReviewOrderPolicy;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.algorithm, "sm2");
        assert_eq!(config.scheduler, SchedulerSettings::default());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SRS_LEARNING_STEPS", "1, 10, 60"),
            ("SRS_RELEARNING_STEPS", "5"),
            ("SRS_EASY_BONUS", "1.5"),
            ("SRS_REVIEW_ORDER", "clamp"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.scheduler.learning_steps, vec![1, 10, 60]);
        assert_eq!(config.scheduler.relearning_steps, vec![5]);
        assert_eq!(config.scheduler.easy_bonus, 1.5);
        assert_eq!(config.scheduler.review_order, ReviewOrderPolicy::Clamp);
    }

    #[test]
    fn test_invalid_number() {
        let result = Config::from_lookup(lookup_from(&[("SRS_HARD_MULTIPLIER", "lots")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "SRS_HARD_MULTIPLIER", .. })
        ));
    }

    #[test]
    fn test_invalid_steps() {
        let result = Config::from_lookup(lookup_from(&[("SRS_LEARNING_STEPS", "1,,10")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "SRS_LEARNING_STEPS", .. })
        ));
    }

    #[test]
    fn test_invalid_review_order() {
        let result = Config::from_lookup(lookup_from(&[("SRS_REVIEW_ORDER", "ignore")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_settings_are_validated() {
        let result = Config::from_lookup(lookup_from(&[("SRS_MINIMUM_EASE", "1.0")]));
        assert!(matches!(
            result,
            Err(ConfigError::Scheduler(SchedulerError::InvalidSettings(_)))
        ));
    }
}
