//! Shared output formatting for lint results.

use anyhow::Result;
use docguard_core::{LintResult, Severity};
use std::io::Write;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write(&mut out, result, format)?;
    Ok(())
}

/// Writes lint results in the specified format.
pub fn write(out: &mut impl Write, result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, result)?,
        OutputFormat::Json => write_json(out, result)?,
        OutputFormat::Compact => write_compact(out, result)?,
    }
    Ok(())
}

fn write_text(out: &mut impl Write, result: &LintResult) -> std::io::Result<()> {
    let (errors, warnings) = result.counts();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };

        writeln!(
            out,
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        )?;
        writeln!(out, "  {}: {}", severity_indicator, violation.message)?;
        writeln!(out)?;
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    writeln!(
        out,
        "{}Found {} error(s), {} warning(s) in {} file(s), {} package(s)\x1b[0m",
        summary_color,
        errors,
        warnings,
        result.files_checked,
        result.packages_checked
    )
}

fn write_json(out: &mut impl Write, result: &LintResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)?;
    Ok(())
}

fn write_compact(out: &mut impl Write, result: &LintResult) -> std::io::Result<()> {
    for violation in &result.violations {
        writeln!(out, "{violation}")?;
    }
    Ok(())
}
