//! Structured report representation.

use benchvar_core::types::BenchmarkSample;

use super::line;

/// One benchmark's entry within a section: its name (parallelism suffix
/// stripped) and the raw report lines recorded under it, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkEntry {
    pub name: String,
    pub lines: Vec<String>,
}

/// One package's contiguous block of a report.
///
/// Benchmark entries keep first-seen insertion order; this is an explicit
/// `Vec` of entries rather than a map so that rendering and merging can
/// guarantee order preservation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSection {
    pub header_lines: Vec<String>,
    pub benchmarks: Vec<BenchmarkEntry>,
    pub footer_lines: Vec<String>,
}

impl ReportSection {
    /// Append a raw line under `name`, creating the entry on first sight.
    pub fn push_benchmark_line(&mut self, name: &str, raw: &str) {
        match self.benchmarks.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.lines.push(raw.to_string()),
            None => self.benchmarks.push(BenchmarkEntry {
                name: name.to_string(),
                lines: vec![raw.to_string()],
            }),
        }
    }

    pub fn benchmark(&self, name: &str) -> Option<&BenchmarkEntry> {
        self.benchmarks.iter().find(|entry| entry.name == name)
    }

    /// True when the section recorded nothing at all.
    pub fn is_empty(&self) -> bool {
        self.header_lines.is_empty() && self.benchmarks.is_empty() && self.footer_lines.is_empty()
    }
}

/// A full report: an ordered sequence of package sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Re-serialize the structured report.
    ///
    /// Emits, per section: header lines, each benchmark entry's lines in
    /// insertion order, footer lines. Reproduces the grouping of the text
    /// the report was parsed from.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            for line in &section.header_lines {
                out.push_str(line);
                out.push('\n');
            }
            for entry in &section.benchmarks {
                for line in &entry.lines {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            for line in &section.footer_lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Flatten every well-formed result line into samples, in report order.
    pub fn samples(&self) -> Vec<BenchmarkSample> {
        self.sections
            .iter()
            .flat_map(|section| &section.benchmarks)
            .flat_map(|entry| &entry.lines)
            .filter_map(|raw| line::parse_result_line(raw))
            .collect()
    }

    /// Benchmark names across all sections, first-seen order, deduplicated.
    pub fn benchmark_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for section in &self.sections {
            for entry in &section.benchmarks {
                if !names.contains(&entry.name.as_str()) {
                    names.push(entry.name.as_str());
                }
            }
        }
        names
    }
}
