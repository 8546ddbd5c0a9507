use std::io::Write;

use bibdex_core::import::ImportReport;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the closing summary after both import phases.
pub fn print_import_summary(
    w: &mut dyn Write,
    report: &ImportReport,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", "IMPORT SUMMARY".bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "IMPORT SUMMARY")?;
        writeln!(w, "{}", sep)?;
    }

    match &report.authors {
        Some(stats) => {
            writeln!(
                w,
                "  Authors:      {} created, {} updated, {} skipped",
                stats.created, stats.updated, stats.skipped
            )?;
        }
        None => {
            let msg = "Authors:      phase skipped (CSV not found)";
            if color.enabled() {
                writeln!(w, "  {}", msg.yellow())?;
            } else {
                writeln!(w, "  {}", msg)?;
            }
        }
    }

    let stats = &report.publications;
    writeln!(
        w,
        "  Publications: {} created, {} updated, {} skipped",
        stats.created, stats.updated, stats.skipped
    )?;
    if stats.failed > 0 {
        let msg = format!("Failed records: {}", stats.failed);
        if color.enabled() {
            writeln!(w, "  {}", msg.red())?;
        } else {
            writeln!(w, "  {}", msg)?;
        }
    }
    writeln!(w)?;

    Ok(())
}
