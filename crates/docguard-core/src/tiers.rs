//! Tier presets: named minimum configurations.
//!
//! A configuration that names a tier may be stricter than the tier but never
//! looser. Booleans the tier requires are forced on, unset values are filled
//! in, and deviations that cannot be fixed silently are errors.

use crate::config::{Config, ConfigError};
use std::str::FromStr;

/// Copyright pattern required from silver upwards.
const COPYRIGHT_PATTERN: &str = "^Copyright 20.*$";

/// Named configuration minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// No requirements.
    Bronze,
    /// Header, copyright, package docs, todo and why.
    Silver,
    /// Silver plus variable, constant and type docs.
    Gold,
    /// Gold plus function docs for functions of ten lines or more.
    Platinum,
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            _ => Err(s.to_string()),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bronze => write!(f, "bronze"),
            Self::Silver => write!(f, "silver"),
            Self::Gold => write!(f, "gold"),
            Self::Platinum => write!(f, "platinum"),
        }
    }
}

impl Tier {
    /// Returns the minimum configuration of this tier.
    #[must_use]
    pub fn minimums(self) -> Config {
        let mut config = Config::default();
        let at_least = |tier: Self| self >= tier;

        config.header.enabled = at_least(Self::Silver);
        config.header.fields = if at_least(Self::Silver) {
            vec!["Description".to_string()]
        } else {
            Vec::new()
        };

        config.copyright.enabled = at_least(Self::Silver);
        if at_least(Self::Silver) {
            config.copyright.pattern = COPYRIGHT_PATTERN.to_string();
        }

        config.doculint.enabled = at_least(Self::Silver);
        config.doculint.validate_packages = at_least(Self::Silver);
        config.doculint.validate_variables = at_least(Self::Gold);
        config.doculint.validate_constants = at_least(Self::Gold);
        config.doculint.validate_types = at_least(Self::Gold);
        config.doculint.validate_functions = at_least(Self::Platinum);
        config.doculint.min_fun_len = if at_least(Self::Platinum) { 10 } else { 0 };

        config.todo.enabled = at_least(Self::Silver);
        config.why.enabled = at_least(Self::Silver);
        config.barenolint.enabled = at_least(Self::Silver);

        config
    }
}

impl Config {
    /// Applies the minimums of the configured tier, if any.
    ///
    /// An unknown tier name is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is looser than the tier in a
    /// way that cannot be overridden.
    pub fn apply_tier(&mut self) -> Result<(), ConfigError> {
        let Some(name) = self.tier.as_deref() else {
            return Ok(());
        };

        match name.parse::<Tier>() {
            Ok(tier) => self.ensure_minimums(tier),
            Err(name) => {
                tracing::warn!(
                    tier = %name,
                    "tier does not match any of \"bronze\", \"silver\", \"gold\", \"platinum\", no minimums applied"
                );
                Ok(())
            }
        }
    }

    /// Raises this configuration to the minimums of `tier`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TierDeviation`] when a required header field is
    /// missing or `min_fun_len` exceeds the tier's value.
    pub fn ensure_minimums(&mut self, tier: Tier) -> Result<(), ConfigError> {
        let desired = tier.minimums();
        let deviation = |field: &'static str, message: String| ConfigError::TierDeviation {
            tier: tier.to_string(),
            field,
            message,
        };

        force_on(&mut self.header.enabled, desired.header.enabled, "header.enabled");
        if self.header.enabled {
            if self.header.fields.is_empty() {
                self.header.fields.clone_from(&desired.header.fields);
            } else if let Some(missing) = desired
                .header
                .fields
                .iter()
                .find(|field| !self.header.fields.contains(field))
            {
                return Err(deviation(
                    "header.fields",
                    format!("fields must contain \"{missing}\""),
                ));
            }
        }

        force_on(&mut self.copyright.enabled, desired.copyright.enabled, "copyright.enabled");
        if !desired.copyright.pattern.is_empty() && self.copyright.pattern != desired.copyright.pattern
        {
            tracing::warn!(
                field = "copyright.pattern",
                value = %desired.copyright.pattern,
                "overriding to the tier minimum value"
            );
            self.copyright.pattern.clone_from(&desired.copyright.pattern);
        }

        let doc = &mut self.doculint;
        let min = &desired.doculint;
        force_on(&mut doc.enabled, min.enabled, "doculint.enabled");
        if doc.enabled {
            force_on(&mut doc.validate_packages, min.validate_packages, "doculint.validate_packages");
            force_on(&mut doc.validate_functions, min.validate_functions, "doculint.validate_functions");
            force_on(&mut doc.validate_variables, min.validate_variables, "doculint.validate_variables");
            force_on(&mut doc.validate_constants, min.validate_constants, "doculint.validate_constants");
            force_on(&mut doc.validate_types, min.validate_types, "doculint.validate_types");

            if doc.validate_functions {
                if doc.min_fun_len == 0 {
                    tracing::warn!(
                        field = "doculint.min_fun_len",
                        value = min.min_fun_len,
                        "zero value overridden to the tier minimum value"
                    );
                    doc.min_fun_len = min.min_fun_len;
                } else if min.min_fun_len > 0 && doc.min_fun_len > min.min_fun_len {
                    return Err(deviation(
                        "doculint.min_fun_len",
                        format!("min_fun_len must be set within (0, {}]", min.min_fun_len),
                    ));
                }
            }
        }

        force_on(&mut self.todo.enabled, desired.todo.enabled, "todo.enabled");
        force_on(&mut self.why.enabled, desired.why.enabled, "why.enabled");
        force_on(&mut self.barenolint.enabled, desired.barenolint.enabled, "barenolint.enabled");

        tracing::debug!(%tier, "applied tier minimums");
        Ok(())
    }
}

fn force_on(current: &mut bool, required: bool, field: &str) {
    if required && !*current {
        tracing::warn!(field, "value required to be true by the tier is false, overriding to true");
        *current = true;
    }
}
