//! Environment variable overrides
//!
//! Read once by the CLI layer; nothing below it touches the environment.

use std::path::PathBuf;

use super::env_validator::{EnvVarValidator, BOOL_VALUES};

pub const DEBUG_VAR: &str = "TSRIG_DEBUG";
pub const CONFIG_VAR: &str = "TSRIG_CONFIG";
/// Fallback for [`CONFIG_VAR`], shared with ts-node style loaders
pub const LOADER_PROJECT_VAR: &str = "TS_NODE_PROJECT";
pub const PORT_VAR: &str = "PORT";
pub const ENTRY_VAR: &str = "TSRIG_ENTRY";
pub const NODE_OPTIONS_VAR: &str = "NODE_OPTIONS";
pub const NO_COLOR_VAR: &str = "NO_COLOR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub port: Option<u16>,
    pub entry: Option<PathBuf>,
    /// Inherited value, extended (not replaced) for the child
    pub node_options: Option<String>,
    pub no_color: bool,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any lookup; empty values count as unset.
    pub fn from_lookup<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get_env(key).filter(|v| !v.trim().is_empty());

        let debug = get(DEBUG_VAR)
            .map(|v| EnvVarValidator::new(DEBUG_VAR, BOOL_VALUES).parse_bool(&v, false))
            .unwrap_or(false);

        let port = get(PORT_VAR).and_then(|v| {
            EnvVarValidator::new(PORT_VAR, &[]).parse(&v, parse_port, None)
        });

        Self {
            debug,
            config: get(CONFIG_VAR).or_else(|| get(LOADER_PROJECT_VAR)).map(PathBuf::from),
            port,
            entry: get(ENTRY_VAR).map(PathBuf::from),
            node_options: get(NODE_OPTIONS_VAR),
            // NO_COLOR is honored when present with any value.
            no_color: get_env(NO_COLOR_VAR).is_some(),
        }
    }
}

fn parse_port(value: &str) -> Option<Option<u16>> {
    value.trim().parse::<u16>().ok().filter(|p| *p != 0).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(EnvOverrides::from_lookup(lookup(&[])), EnvOverrides::default());
    }

    #[test]
    fn reads_every_variable() {
        let env = EnvOverrides::from_lookup(lookup(&[
            ("TSRIG_DEBUG", "1"),
            ("TSRIG_CONFIG", "tsconfig.build.json"),
            ("PORT", "4000"),
            ("TSRIG_ENTRY", "src/server.ts"),
            ("NODE_OPTIONS", "--max-old-space-size=4096"),
            ("NO_COLOR", ""),
        ]));

        assert!(env.debug);
        assert_eq!(env.config, Some(PathBuf::from("tsconfig.build.json")));
        assert_eq!(env.port, Some(4000));
        assert_eq!(env.entry, Some(PathBuf::from("src/server.ts")));
        assert_eq!(env.node_options.as_deref(), Some("--max-old-space-size=4096"));
        assert!(env.no_color);
    }

    #[test]
    fn loader_project_is_config_fallback() {
        let env = EnvOverrides::from_lookup(lookup(&[("TS_NODE_PROJECT", "tsconfig.dev.json")]));
        assert_eq!(env.config, Some(PathBuf::from("tsconfig.dev.json")));

        let env = EnvOverrides::from_lookup(lookup(&[
            ("TS_NODE_PROJECT", "tsconfig.dev.json"),
            ("TSRIG_CONFIG", "tsconfig.json"),
        ]));
        assert_eq!(env.config, Some(PathBuf::from("tsconfig.json")));
    }

    #[test]
    fn invalid_port_is_ignored() {
        for bad in ["abc", "70000", "0"] {
            let env = EnvOverrides::from_lookup(lookup(&[("PORT", bad)]));
            assert_eq!(env.port, None, "PORT={}", bad);
        }
    }

    #[test]
    fn debug_false_spellings() {
        let env = EnvOverrides::from_lookup(lookup(&[("TSRIG_DEBUG", "off")]));
        assert!(!env.debug);
    }
}
