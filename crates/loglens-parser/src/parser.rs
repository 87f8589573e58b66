//! Log line scanning and keyword extraction.

use regex::Regex;

use loglens_core::config::parser::ParserConfig;
use loglens_core::{AppError, AppResult};

use crate::stats::ParseStats;

/// Snapshot handed to the progress callback.
#[derive(Debug)]
pub struct ParseProgress<'a> {
    /// Lines consumed so far, including empty lines.
    pub lines_processed: u64,
    /// Total lines in the input.
    pub total_lines: u64,
    /// Completion percentage (0..=100).
    pub percent: i32,
    /// Statistics accumulated so far.
    pub stats: &'a ParseStats,
}

/// Compiled log parser.
///
/// Keyword patterns are compiled once at construction. Matching is
/// whole-word and case-insensitive; a keyword `error` matches `ERROR:`
/// but not `errors`.
#[derive(Debug)]
pub struct LogParser {
    keywords: Vec<(String, Regex)>,
    structured_line: Regex,
    ipv4: Regex,
    progress_interval_lines: u64,
}

impl LogParser {
    pub fn new(config: &ParserConfig) -> AppResult<Self> {
        let mut keywords = Vec::with_capacity(config.keywords.len());
        for keyword in &config.keywords {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
            let regex = Regex::new(&pattern).map_err(|e| {
                AppError::configuration(format!("Invalid keyword pattern {keyword:?}: {e}"))
            })?;
            keywords.push((keyword.to_lowercase(), regex));
        }

        Ok(Self {
            keywords,
            // `[timestamp] LEVEL message`; only the level token matters.
            structured_line: Regex::new(r"^\[(.*?)\]\s+(\w+)\s+").map_err(internal)?,
            // Shape match only; octets are not range-checked.
            ipv4: Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").map_err(internal)?,
            progress_interval_lines: config.progress_interval_lines.max(1),
        })
    }

    /// Parse the whole input without progress reporting.
    pub fn parse(&self, input: &str) -> ParseStats {
        self.parse_with_progress(input, |_| {})
    }

    /// Parse the input, invoking `on_progress` at a bounded cadence:
    /// every 1% of lines or every `progress_interval_lines`, whichever
    /// is coarser, and always after the final line.
    pub fn parse_with_progress<F>(&self, input: &str, mut on_progress: F) -> ParseStats
    where
        F: FnMut(ParseProgress<'_>),
    {
        let total_lines = input.lines().count() as u64;
        let cadence = (total_lines / 100).max(self.progress_interval_lines);

        let mut stats = ParseStats::default();
        for (keyword, _) in &self.keywords {
            stats.keywords.insert(keyword.clone(), 0);
        }

        let mut processed = 0u64;
        for line in input.lines() {
            processed += 1;
            self.scan_line(line, &mut stats);

            if processed % cadence == 0 || processed == total_lines {
                let percent = (processed * 100 / total_lines.max(1)) as i32;
                on_progress(ParseProgress {
                    lines_processed: processed,
                    total_lines,
                    percent,
                    stats: &stats,
                });
            }
        }

        stats
    }

    fn scan_line(&self, line: &str, stats: &mut ParseStats) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        stats.lines += 1;

        for (keyword, regex) in &self.keywords {
            let hits = regex.find_iter(line).count() as u64;
            if hits > 0 {
                *stats.keywords.entry(keyword.clone()).or_default() += hits;
            }
        }

        // The level match is additive with the keyword match: a line
        // `[ts] ERROR disk error` counts the level once and the
        // keyword twice.
        if let Some(caps) = self.structured_line.captures(line)
            && let Some(level) = caps.get(2)
            && level.as_str().eq_ignore_ascii_case("error")
        {
            stats.level_errors += 1;
        }

        for ip in self.ipv4.find_iter(line) {
            if !stats.unique_ips.contains(ip.as_str()) {
                stats.unique_ips.insert(ip.as_str().to_string());
            }
        }
    }
}

fn internal(e: regex::Error) -> AppError {
    AppError::internal(format!("Failed to compile parser regex: {e}"))
}
