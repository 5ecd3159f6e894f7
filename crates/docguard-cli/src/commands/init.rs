//! Init command implementation.

use anyhow::{bail, Context, Result};
use docguard_core::{Config, Tier};
use std::path::Path;

const CONFIG_FILE: &str = "docguard.yaml";

const DEFAULT_CONFIG: &str = r#"# docguard configuration

# Minimum settings to enforce: bronze | silver | gold | platinum
# tier: silver

analyzer:
  # Root directory to analyze (default: current directory)
  # root: "./pkg"

  # Glob patterns to exclude from analysis
  exclude:
    - "**/vendor/**"
    - "**/testdata/**"

  # Build tags in addition to the host's GOOS, GOARCH and go1.x tags
  build_tags: []

  # Respect .gitignore files
  respect_gitignore: true

# Each rule can be disabled or downgraded to warnings with `warn: true`.

header:
  enabled: true
  fields:
    - Description

copyright:
  enabled: true
  # Exact text of the first comment, or a regular expression.
  # text: "Copyright 2024 Example Corp."
  # pattern: "^Copyright 20.*$"

doculint:
  enabled: true
  min_fun_len: 10
  validate_packages: true
  validate_functions: true
  validate_variables: true
  validate_constants: true
  validate_types: true
  force_main_package: false

todo:
  enabled: true
  require_ticket: false

why:
  enabled: true

barenolint:
  enabled: true
"#;

/// Returns the starter configuration, with `tier` set when given.
fn render(tier: Option<Tier>) -> String {
    match tier {
        Some(tier) => DEFAULT_CONFIG.replacen("# tier: silver", &format!("tier: {tier}"), 1),
        None => DEFAULT_CONFIG.to_string(),
    }
}

/// Runs the init command, writing `docguard.yaml` into `dir`.
pub fn run(dir: &Path, force: bool, tier: Option<&str>) -> Result<()> {
    let tier = tier
        .map(|name| {
            name.parse::<Tier>()
                .map_err(|name| anyhow::anyhow!("Unknown tier \"{name}\""))
        })
        .transpose()?;

    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = render(tier);
    Config::parse_yaml(&content).context("Generated configuration is invalid")?;
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: docguard check");

    Ok(())
}
