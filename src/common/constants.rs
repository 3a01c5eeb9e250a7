//! Constants used throughout the harness

/// Number of benchmark query templates
pub const QUERY_COUNT: u32 = 10;

/// Field delimiter of generated table files
pub const TABLE_DELIMITER: char = '|';

/// Suffix of generated table files
pub const TABLE_FILE_SUFFIX: &str = ".tbl";

/// Aggregate result file written by a measurement run
pub const AGGREGATE_FILE: &str = "all.json";

/// Raw `sar -u` capture inside a per-query results directory
pub const SAR_CPU_FILE: &str = "sar_u.txt";

/// Raw `sar -b` capture inside a per-query results directory
pub const SAR_BLOCK_FILE: &str = "sar_b.txt";

/// Sampling interval in seconds passed to the activity reporters
pub const SAMPLE_INTERVAL_SECS: u32 = 1;

/// Locale forced on every child process so reporters print 24h timestamps
pub const DEFAULT_LOCALE: &str = "C.UTF-8";
