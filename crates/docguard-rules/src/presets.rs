//! Rule sets built from configuration.

use crate::{BareNolint, Copyright, Doculint, Header, Todo, Why};
use docguard_core::{Config, RuleBox, Tier};

/// Returns every rule with default settings.
///
/// `copyright` has nothing to compare against by default and reports
/// nothing until configured.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(Doculint::new()),
        Box::new(Copyright::new()),
        Box::new(Todo::new()),
        Box::new(Header::new()),
        Box::new(Why::new()),
        Box::new(BareNolint::new()),
    ]
}

/// Returns the enabled rules of `config`, configured from their sections.
///
/// # Errors
///
/// Returns an error if the copyright pattern is not a valid regular
/// expression.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, regex::Error> {
    let mut rules: Vec<RuleBox> = Vec::new();

    if config.doculint.enabled {
        rules.push(Box::new(Doculint::from_config(&config.doculint)));
    }
    if config.copyright.enabled {
        rules.push(Box::new(Copyright::from_config(&config.copyright)?));
    }
    if config.todo.enabled {
        rules.push(Box::new(Todo::from_config(&config.todo)));
    }
    if config.header.enabled {
        rules.push(Box::new(Header::from_config(&config.header)));
    }
    if config.why.enabled {
        rules.push(Box::new(Why::new()));
    }
    if config.barenolint.enabled {
        rules.push(Box::new(BareNolint::new()));
    }

    Ok(rules)
}

/// Returns the rules a tier requires at minimum.
///
/// # Errors
///
/// See [`rules_from_config`].
pub fn tier_rules(tier: Tier) -> Result<Vec<RuleBox>, regex::Error> {
    rules_from_config(&tier.minimums())
}
