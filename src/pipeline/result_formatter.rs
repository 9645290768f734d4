//! Trim result formatting and display

use console::style;

use super::metrics::TrimReport;
use crate::fmt::{format_bytes, format_signed_bytes, CHART, SPARKLES, WARNING};

/// Formats and displays trim results
pub struct ResultFormatter;

impl ResultFormatter {
    /// Print a formatted summary of a trim run
    pub fn print_summary(report: &TrimReport) {
        println!("\n{} {}", CHART, style("Trim Summary").bold());
        println!(
            "   {} Deleted:   {} files",
            style("→").dim(),
            style(report.files_deleted).yellow()
        );
        println!(
            "   {} Minified:  {} JSON files",
            style("→").dim(),
            style(report.files_minified).yellow()
        );
        if report.files_skipped > 0 {
            println!(
                "   {} {} {} JSON files could not be parsed and were kept as-is",
                style("→").dim(),
                WARNING,
                style(report.files_skipped).yellow()
            );
        }

        let saved = format_signed_bytes(report.bytes_saved);
        if report.bytes_saved > 0 {
            println!(
                "   {} Reclaimed: {}",
                style("→").dim(),
                style(saved).green().bold()
            );
        } else {
            println!("   {} Reclaimed: {}", style("→").dim(), style(saved).dim());
        }

        println!(
            "   {} Archive:   {} → {} ({:.1}% reduction)",
            style("→").dim(),
            style(format_bytes(report.archive_bytes_before)).yellow(),
            style(format_bytes(report.archive_bytes_after)).green().bold(),
            report.archive_reduction_percent()
        );

        if let Some(backup) = &report.backup {
            println!(
                "   {} Backup:    {}",
                style("→").dim(),
                style(backup.display()).cyan()
            );
        }
        if let Some(extracted) = &report.extracted {
            println!(
                "   {} Extracted: {}",
                style("→").dim(),
                style(extracted.display()).cyan()
            );
        }

        println!(
            "\n{} {} {}",
            SPARKLES,
            style("Success!").green().bold(),
            style(report.archive.display()).cyan()
        );
    }

    /// Render the report as pretty JSON
    pub fn to_json(report: &TrimReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }
}
