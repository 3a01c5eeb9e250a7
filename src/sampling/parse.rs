//! Line parsers for query plans and activity reporter output
//!
//! The block I/O layout is the one printed by `sar -b` from sysstat releases
//! before 12.1.2, in the C locale: `HH:MM:SS tps rtps wtps bread/s bwrtn/s`.
//! The fourth and fifth numeric columns are taken as reads and writes.
//!
//! Sysstat 12.1.2 and later insert `dtps` before `bread/s` and append
//! `bdscd/s`, so on those releases the same columns hold `dtps` and `bread/s`
//! and the series are misread. So is any locale that prints a 12h clock.

use std::sync::LazyLock;

use regex::Regex;

static EXECUTION_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Execution Time: (.*)").unwrap());

static CPU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d\d:\d\d:\d\d)\s+all\s+([0-9.]+)").unwrap());

static BLOCK_IO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d\d:\d\d:\d\d)\s+([0-9.]+)\s+([0-9.]+)\s+([0-9.]+)\s+([0-9.]+)\s+([0-9.]+)")
        .unwrap()
});

/// One `(timestamp, value)` observation, both kept as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub time: String,
    pub value: String,
}

impl Sample {
    pub fn new(time: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIoSample {
    pub time: String,
    pub bread: String,
    pub bwrtn: String,
}

/// One row of the custom probe: CPU user % and block reads/writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRow {
    pub time: String,
    pub user: String,
    pub bread: String,
    pub bwrtn: String,
}

/// The text after `Execution Time: ` on the first line that has it.
pub fn execution_time(plan: &str) -> Option<&str> {
    EXECUTION_TIME_RE
        .captures(plan)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `sar -u` data line -> `(time, %user)`. Headers and averages yield `None`.
pub fn cpu_sample(line: &str) -> Option<Sample> {
    let caps = CPU_RE.captures(line)?;
    Some(Sample::new(&caps[1], &caps[2]))
}

/// `sar -b` data line -> time with bread/s and bwrtn/s.
pub fn block_io_sample(line: &str) -> Option<BlockIoSample> {
    let caps = BLOCK_IO_RE.captures(line)?;
    Some(BlockIoSample {
        time: caps[1].to_string(),
        bread: caps[5].to_string(),
        bwrtn: caps[6].to_string(),
    })
}

/// Probe row: `time_ms _ bread _ bwrtn user ...`, all unsigned integers.
pub fn probe_row(line: &str) -> Option<ProbeRow> {
    let fields = line
        .split_whitespace()
        .map(|f| f.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if fields.len() < 6 {
        return None;
    }
    let secs = fields[0] / 1000;
    Some(ProbeRow {
        time: format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60),
        bread: format!("{}.00", fields[2]),
        bwrtn: format!("{}.00", fields[4]),
        user: format!("{}.00", fields[5]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAN: &str = "                   QUERY PLAN\n\
        ----------------------------------------------\n \
        Sort  (cost=1.00..2.00 rows=6 width=236)\n \
        Planning Time: 0.512 ms\n \
        Execution Time: 123.456 ms\n\
        (25 rows)\n";

    #[test]
    fn test_execution_time_found() {
        assert_eq!(execution_time(PLAN), Some("123.456 ms"));
        assert_eq!(execution_time("Execution Time: 123.456 ms"), Some("123.456 ms"));
    }

    #[test]
    fn test_execution_time_missing() {
        assert_eq!(execution_time(""), None);
        assert_eq!(execution_time("Planning Time: 0.5 ms\n(1 row)\n"), None);
    }

    #[test]
    fn test_cpu_sample() {
        assert_eq!(
            cpu_sample("14:03:21 all 12.34 0.00 1.20 0.00 0.00 86.46"),
            Some(Sample::new("14:03:21", "12.34"))
        );
        assert_eq!(
            cpu_sample("14:03:22        all      3.01      0.00      0.50      0.25      0.00"),
            Some(Sample::new("14:03:22", "3.01"))
        );
    }

    #[test]
    fn test_cpu_sample_skips_non_data_lines() {
        for line in [
            "Linux 5.14.0 (host) \t10/18/2026 \t_x86_64_\t(16 CPU)",
            "",
            "14:03:20        CPU     %user     %nice   %system   %iowait    %steal     %idle",
            "Average:        all      7.50      0.00      0.85      0.12      0.00     91.53",
            "14:03:21 0 12.34",
        ] {
            assert_eq!(cpu_sample(line), None, "line {line:?}");
        }
    }

    #[test]
    fn test_block_io_sample() {
        assert_eq!(
            block_io_sample("14:03:21      3.00      0.00      3.00    120.00     45.00"),
            Some(BlockIoSample {
                time: "14:03:21".to_string(),
                bread: "120.00".to_string(),
                bwrtn: "45.00".to_string(),
            })
        );
    }

    #[test]
    fn test_block_io_sample_skips_malformed_lines() {
        for line in [
            "14:03:20          tps      rtps      wtps   bread/s   bwrtn/s",
            "Average:        2.00      0.00      2.00      0.00     40.00",
            "14:03:21 0.00 0.00 3.00 120.00",
            "garbage",
        ] {
            assert_eq!(block_io_sample(line), None, "line {line:?}");
        }
    }

    #[test]
    fn test_block_io_sample_shifts_on_dtps_layout() {
        // tps rtps wtps dtps bread/s bwrtn/s bdscd/s
        let sample = block_io_sample("14:03:21 3.00 0.00 3.00 0.00 120.00 45.00 0.00").unwrap();
        assert_eq!(sample.bread, "0.00");
        assert_eq!(sample.bwrtn, "120.00");
    }

    #[test]
    fn test_probe_row() {
        assert_eq!(
            probe_row("50601000 7 120 3 45 12 0"),
            Some(ProbeRow {
                time: "14:03:21".to_string(),
                user: "12.00".to_string(),
                bread: "120.00".to_string(),
                bwrtn: "45.00".to_string(),
            })
        );
        // hours are not wrapped at midnight
        assert_eq!(probe_row("90000000 0 0 0 0 0").unwrap().time, "25:00:00");
    }

    #[test]
    fn test_probe_row_skips_header_and_short_rows() {
        assert_eq!(probe_row("time_ms rtps bread wtps bwrtn user"), None);
        assert_eq!(probe_row("1000 1 2 3 4"), None);
        assert_eq!(probe_row("1000 1 2 -3 4 5"), None);
    }
}
