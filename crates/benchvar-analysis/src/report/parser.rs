//! Line-oriented report parsing.

use std::path::Path;

use benchvar_core::constants::{BENCH_PREFIX, FOOTER_MARKERS, HEADER_PREFIXES, HEADER_START_PREFIX};
use benchvar_core::errors::ParseError;
use benchvar_core::types::BenchmarkSample;

use super::line;
use super::section::{Report, ReportSection};

/// Parse raw report text into ordered sections.
///
/// A `goos:` line always closes the previous section and opens a new one;
/// that is how multi-package reports split. Header-prefix lines extend the
/// header block, `Benchmark...` lines extend the benchmark block, footer
/// markers extend the footer. Any other line carries no structure and is
/// dropped. Empty input yields zero sections.
pub fn parse_report(text: &str) -> Report {
    let mut sections: Vec<ReportSection> = Vec::new();
    let mut current: Option<ReportSection> = None;

    for raw in text.lines() {
        if raw.starts_with(HEADER_START_PREFIX) {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            let mut section = ReportSection::default();
            section.header_lines.push(raw.to_string());
            current = Some(section);
        } else if HEADER_PREFIXES.iter().any(|prefix| raw.starts_with(prefix)) {
            current
                .get_or_insert_with(ReportSection::default)
                .header_lines
                .push(raw.to_string());
        } else if raw.starts_with(BENCH_PREFIX) {
            if let Some(name) = line::bench_name_of(raw) {
                current
                    .get_or_insert_with(ReportSection::default)
                    .push_benchmark_line(&name, raw);
            }
        } else if FOOTER_MARKERS.iter().any(|marker| raw.starts_with(marker)) {
            current
                .get_or_insert_with(ReportSection::default)
                .footer_lines
                .push(raw.to_string());
        }
    }

    if let Some(done) = current.take() {
        if !done.is_empty() {
            sections.push(done);
        }
    }

    Report { sections }
}

/// Extract the flat sample sequence without building section structure.
///
/// Malformed lines are skipped silently; a file with no matching lines
/// yields an empty vector.
pub fn extract_samples(text: &str) -> Vec<BenchmarkSample> {
    text.lines().filter_map(line::parse_result_line).collect()
}

/// Read and parse a report file.
pub fn read_report(path: &Path) -> Result<Report, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_report(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PACKAGE_REPORT: &str = "\
goos: linux
goarch: amd64
pkg: github.com/test/runtime
cpu: Intel Core i7
BenchmarkGC-16         1000000              1234.5 ns/op            256 B/op          4 allocs/op
BenchmarkGC-16         1000000              1245.2 ns/op            256 B/op          4 allocs/op
BenchmarkMap-16        5000000               567.3 ns/op            128 B/op          2 allocs/op
PASS
ok  \tgithub.com/test/runtime\t10.234s
goos: linux
goarch: amd64
pkg: github.com/test/stdlib
cpu: Intel Core i7
BenchmarkStrings-16    2000000               890.1 ns/op             64 B/op          1 allocs/op
PASS
ok  \tgithub.com/test/stdlib\t5.123s
";

    #[test]
    fn test_multi_package_report_splits_on_goos() {
        let report = parse_report(TWO_PACKAGE_REPORT);
        assert_eq!(report.sections.len(), 2);

        let first = &report.sections[0];
        assert_eq!(first.header_lines.len(), 4);
        assert_eq!(first.header_lines[0], "goos: linux");
        assert!(first
            .header_lines
            .contains(&"pkg: github.com/test/runtime".to_string()));
        assert_eq!(first.benchmarks.len(), 2);
        assert_eq!(first.benchmarks[0].name, "BenchmarkGC");
        assert_eq!(first.benchmarks[0].lines.len(), 2);
        assert_eq!(first.benchmarks[1].name, "BenchmarkMap");
        assert_eq!(first.footer_lines.len(), 2);
        assert_eq!(first.footer_lines[0], "PASS");

        let second = &report.sections[1];
        assert!(second
            .header_lines
            .contains(&"pkg: github.com/test/stdlib".to_string()));
        assert_eq!(second.benchmarks.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_no_sections() {
        assert!(parse_report("").sections.is_empty());
        assert!(extract_samples("").is_empty());
    }

    #[test]
    fn test_unmatched_lines_still_form_sections() {
        // Build output noise: no result lines, but header and footer.
        let text = "goos: linux\ngoarch: amd64\nsome build chatter\nPASS\n";
        let report = parse_report(text);
        assert_eq!(report.sections.len(), 1);
        assert!(report.sections[0].benchmarks.is_empty());
        assert_eq!(report.sections[0].header_lines.len(), 2);
        assert_eq!(report.sections[0].footer_lines, vec!["PASS".to_string()]);
        assert!(extract_samples(text).is_empty());
    }

    #[test]
    fn test_samples_flatten_in_order() {
        let report = parse_report(TWO_PACKAGE_REPORT);
        let samples = report.samples();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].name, "BenchmarkGC");
        assert_eq!(samples[2].name, "BenchmarkMap");
        assert_eq!(samples[3].name, "BenchmarkStrings");
        assert_eq!(extract_samples(TWO_PACKAGE_REPORT), samples);
    }

    #[test]
    fn test_render_round_trips_grouping() {
        let report = parse_report(TWO_PACKAGE_REPORT);
        assert_eq!(report.render(), TWO_PACKAGE_REPORT);
    }

    #[test]
    fn test_footer_without_benchmarks_is_kept() {
        let text = "FAIL\tgithub.com/test/broken\t[build failed]\n";
        let report = parse_report(text);
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].footer_lines.len(), 1);
    }
}
