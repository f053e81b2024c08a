use std::fs;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::BuildStrategy;
use crate::error::{ColoringError, Result};
use crate::search::local_search::{EpochPolicy, LocalSearchColorer, MergeTarget};
use crate::upper_bound::BoundStrategy;

/** configuration of a coloring run.
Missing fields take their default value, e.g.:
```json
{ "upper_bound": "brooks", "search": { "policy": "guided_repair", "guided": { "seed": 3 } } }
```
*/
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlsConfig {
    /// upper bound estimation method
    pub upper_bound: BoundStrategy,
    /// initial coloring construction
    pub build: BuildStrategy,
    /// color reduction parameters
    pub search: LocalSearchColorer,
}

impl Default for GlsConfig {
    fn default() -> Self {
        Self {
            upper_bound: BoundStrategy::Theorem2,
            build: BuildStrategy::Greedy,
            search: LocalSearchColorer::default(),
        }
    }
}

impl GlsConfig {
    /** reads a configuration from a JSON string.
    Unknown strategy names fail with UnsupportedStrategy, other malformed inputs with Config.
    */
    pub fn from_json(s:&str) -> Result<Self> {
        let value:Value = serde_json::from_str(s)?;
        check_selector::<BoundStrategy>(&value, &["upper_bound"])?;
        check_selector::<BuildStrategy>(&value, &["build"])?;
        check_selector::<EpochPolicy>(&value, &["search", "policy"])?;
        check_selector::<MergeTarget>(&value, &["search", "source"])?;
        check_selector::<MergeTarget>(&value, &["search", "destination"])?;
        Ok(serde_json::from_value(value)?)
    }

    /// reads a configuration from a JSON file
    pub fn from_file(filename:&str) -> Result<Self> {
        Self::from_json(&fs::read_to_string(filename)?)
    }

    /// JSON representation of the configuration
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// parses the string found at `path` (if any) as a strategy selector
fn check_selector<T>(value:&Value, path:&[&str]) -> Result<()>
where T: FromStr<Err=ColoringError> {
    let mut current = value;
    for key in path {
        match current.get(key) {
            Some(v) => current = v,
            None => return Ok(()),
        }
    }
    if let Some(name) = current.as_str() {
        name.parse::<T>()?;
    }
    Ok(())
}
