//! Timed query execution with system activity sampling

use std::fs;
use std::path::Path;

use super::{all_queries, Harness};
use crate::common::constants::AGGREGATE_FILE;
use crate::common::error::{BenchError, Result};
use crate::exec::CommandSpec;
use crate::report::{QueryRecord, RunReport};
use crate::sampling::{create_sampler, parse};
use crate::scale_factor::ScaleFactor;

impl Harness {
    /// Run `queries_sf*/{query}.sql` and return everything psql printed.
    pub fn run_query(&self, sf: &ScaleFactor, query: u32) -> Result<String> {
        let script = sf.queries_dir(&self.root).join(format!("{query}.sql"));
        let database = sf.database();
        let spec = CommandSpec::new(self.config.tools.psql.clone())
            .args(["-d", database.as_str(), "-f"])
            .arg(script);
        self.shell.capture(&spec)
    }

    /// Time every query template without sampling. Raw output goes to
    /// `results_sf*/{query}.txt`; the timings are printed to stderr.
    pub fn time(&self, sf: &ScaleFactor) -> Result<RunReport> {
        let results = sf.results_dir(&self.root);
        fs::create_dir_all(&results)?;

        let mut report = RunReport::default();
        for query in all_queries() {
            self.cold_start()?;
            tracing::info!("execute query {}", query);
            let plan = self.run_query(sf, query)?;
            let execution_time = execution_time(&plan, query)?;
            tracing::info!("execution time: {}", execution_time);
            save_plan(&results, query, &plan)?;
            report.insert(query, QueryRecord::timing(execution_time));
        }
        eprintln!("{}", report.to_json_line()?);
        Ok(report)
    }

    /// Time `queries` while sampling CPU and block I/O.
    ///
    /// Each record is printed to stderr as one JSON line as soon as it is
    /// complete; the full report is written to `results_sf*/all.json` only
    /// after every query succeeded.
    pub fn analyze(&self, sf: &ScaleFactor, queries: &[u32]) -> Result<RunReport> {
        let results = sf.results_dir(&self.root);
        fs::create_dir_all(&results)?;

        let mut report = RunReport::default();
        for &query in queries {
            let mut sampler = create_sampler(
                &self.config.sampling,
                &self.config.tools,
                &self.shell,
                &results.join(query.to_string()),
            );
            self.cold_start()?;
            tracing::info!("execute query {}", query);
            sampler.start()?;
            let plan = self.run_query(sf, query)?;
            sampler.end()?;

            let execution_time = execution_time(&plan, query)?;
            tracing::info!("execution time: {}", execution_time);
            save_plan(&results, query, &plan)?;

            let record = QueryRecord::with_metrics(execution_time, sampler.result()?);
            eprintln!("{}", serde_json::to_string(&record)?);
            report.insert(query, record);
        }

        report.write_to(&results.join(AGGREGATE_FILE))?;
        eprintln!("{}", report.to_json_line()?);
        Ok(report)
    }
}

fn execution_time(plan: &str, query: u32) -> Result<&str> {
    parse::execution_time(plan).ok_or(BenchError::MissingExecutionTime { query })
}

fn save_plan(results: &Path, query: u32, plan: &str) -> Result<()> {
    fs::write(results.join(format!("{query}.txt")), plan)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_time_error_names_query() {
        assert_eq!(execution_time(" Execution Time: 0.9 ms\n", 4).unwrap(), "0.9 ms");
        assert!(matches!(
            execution_time("ERROR:  relation \"lineitem\" does not exist\n", 4),
            Err(BenchError::MissingExecutionTime { query: 4 })
        ));
    }
}
