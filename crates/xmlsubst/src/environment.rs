//! case-insensitive view of the process environment
//!
//! Variable names are lower-cased once when the map is built. Lookups lower-case the
//! requested name and do an exact match, so `ApiUrl`, `APIURL` and `apiurl` all find
//! the same variable. Values are never touched.
use indexmap::IndexMap;
use std::ffi::OsString;

#[derive(Debug, Default, Clone)]
pub struct EnvironmentMap {
    variables: IndexMap<String, String>,
}

impl EnvironmentMap {
    /// Snapshot of the current process environment
    ///
    /// Variables whose name or value is not valid unicode are ignored.
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Like [FromIterator] but skips entries that are not valid unicode
    pub fn from_os_vars<I: IntoIterator<Item = (OsString, OsString)>>(vars: I) -> Self {
        let variables = vars.into_iter().filter_map(|(name, value)| {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (name, _) => {
                    tracing::debug!(?name, "ignoring non-unicode environment variable");
                    None
                }
            }
        });

        variables.collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for EnvironmentMap {
    /// Names that only differ by case collapse into one entry; the last one wins.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut variables = IndexMap::new();
        for (name, value) in iter {
            let name = name.as_ref();
            if variables.insert(name.to_lowercase(), value.into()).is_some() {
                tracing::debug!(name, "environment variable overrides a differently cased name");
            }
        }

        Self { variables }
    }
}
