//! List rules command implementation.

use docguard_core::Tier;
use docguard_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<15} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<15} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nTiers (minimum settings enforced when `tier:` is set):");
    for tier in [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum] {
        println!("  {:<10} {}", tier.to_string(), tier_summary(tier));
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  docguard check --rules doculint,todo");
    println!("  docguard check --rules DG001,DG003");
}

fn tier_summary(tier: Tier) -> &'static str {
    match tier {
        Tier::Bronze => "no minimums",
        Tier::Silver => "every rule on, package docs, Description header, Copyright 20xx",
        Tier::Gold => "silver + docs on types, constants and variables",
        Tier::Platinum => "gold + docs on functions of 10+ lines",
    }
}
