//! Human-readable output formatter with colors and styling.

use super::formatter::Listing;
use super::formatter::OutputFormatter;
use super::formatter::VerifySummary;
use anyhow::Result;
use console::Term;
use console::style;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_verification(&self, summary: &VerifySummary<'_>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let result = summary.result;
        let archive = summary.archive.display();

        let header = match (result.is_clean(), result.cancelled, self.use_colors) {
            (_, true, true) => format!("{} Verification cancelled: {archive}", style("⚠").yellow().bold()),
            (_, true, false) => format!("Verification cancelled: {archive}"),
            (true, false, true) => format!("{} Archive verified: {archive}", style("✓").green().bold()),
            (true, false, false) => format!("Archive verified: {archive}"),
            (false, false, true) => format!(
                "{} Archive verification {}: {archive}",
                style("✗").red().bold(),
                style("FAILED").red().bold()
            ),
            (false, false, false) => format!("Archive verification FAILED: {archive}"),
        };
        self.line(&header);

        self.line(&format!(
            "  Files checked: {} of {}",
            Self::format_number(result.total_checked()),
            Self::format_number(summary.stats.files)
        ));
        self.line(&format!("  Passed: {}", Self::format_number(result.passed)));
        self.line(&format!("  Failed: {}", Self::format_number(result.failed)));
        self.line(&format!(
            "  Total size: {}",
            Self::format_size(summary.stats.total_size)
        ));

        if self.verbose {
            self.line(&format!("  Directories: {}", summary.stats.directories));
            self.line(&format!("  Duration: {:?}", summary.duration));
        }

        if !result.failures.is_empty() {
            self.line("");
            if self.use_colors {
                self.line(&format!("{}", style("Checksum failures:").red().bold()));
            } else {
                self.line("Checksum failures:");
            }
            for path in &result.failures {
                self.line(&format!("  - {path}"));
            }
        }

        Ok(())
    }

    fn format_listing(&self, listing: &Listing<'_>, long: bool, human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &listing.entries {
            if long {
                let size_str = if human_readable {
                    Self::format_size(entry.size)
                } else {
                    entry.size.to_string()
                };
                self.line(&format!("{size_str:>10}  {:08x}  {}", entry.crc32, entry.path));
            } else {
                self.line(&entry.path);
            }
        }

        self.line("");
        self.line(&format!(
            "Total: {} files, {}",
            Self::format_number(listing.stats.files),
            Self::format_size(listing.stats.total_size)
        ));

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            self.line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            self.line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(512), "512 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(24 * 1024), "24.0 KB");
        assert_eq!(HumanFormatter::format_size(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(HumanFormatter::format_size(1536 * 1024 * 1024), "1.5 GB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
        assert_eq!(HumanFormatter::format_number(42_000_000), "42,000,000");
    }
}
