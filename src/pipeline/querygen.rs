//! Query text generation for templates 1..=10

use std::fs;
use std::sync::LazyLock;

use regex::Regex;

use super::{all_queries, Harness};
use crate::common::error::Result;
use crate::exec::CommandSpec;
use crate::scale_factor::ScaleFactor;

static ROWNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(where rownum .*)$").unwrap());

static BARE_SELECT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^(select)$").unwrap());

impl Harness {
    pub fn qgen(&self, sf: &ScaleFactor) -> Result<()> {
        let dir = sf.queries_dir(&self.root);
        fs::create_dir_all(&dir)?;
        let templates = self.root.join(&self.config.paths.query_templates);

        for query in all_queries() {
            tracing::info!("generate query {}", query);
            let spec = CommandSpec::new(self.config.tools.qgen.clone())
                .args(["-d", "-x", "-s", sf.as_str(), "-b", self.config.paths.dists.as_str()])
                .arg(query.to_string())
                .current_dir(&templates);
            let mut text = self.shell.capture(&spec)?;
            if self.config.qgen.rewrite_for_postgres {
                text = rewrite_for_postgres(&text);
            }
            fs::write(dir.join(format!("{query}.sql")), text)?;
        }
        Ok(())
    }
}

/// Adapt generator output built without a PostgreSQL dialect header:
/// `where rownum` limits are commented out and the final bare `select` line
/// gets an `explain analyze` prefix.
pub fn rewrite_for_postgres(query: &str) -> String {
    let query = ROWNUM_RE.replace_all(query, "-- ${1}");
    BARE_SELECT_RE
        .replace_all(&query, "explain analyze ${1}")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rewrite_for_postgres() {
        let generated = "-- using 1 as a seed to the RNG\n\
                         \n\
                         select\n\
                         \tl_returnflag,\n\
                         \tsum(l_quantity) as sum_qty\n\
                         from\n\
                         \tlineitem\n\
                         order by\n\
                         \tl_returnflag;\n\
                         where rownum <= -1;\n";
        let expected = "-- using 1 as a seed to the RNG\n\
                        \n\
                        explain analyze select\n\
                        \tl_returnflag,\n\
                        \tsum(l_quantity) as sum_qty\n\
                        from\n\
                        \tlineitem\n\
                        order by\n\
                        \tl_returnflag;\n\
                        -- where rownum <= -1;\n";
        assert_eq!(rewrite_for_postgres(generated), expected);
    }

    #[test]
    fn test_rewrite_leaves_inline_select_alone() {
        let text = "explain analyze select 1;\nselect count(*) from nation;\n";
        assert_eq!(rewrite_for_postgres(text), text);
    }
}
