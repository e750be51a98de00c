//! Lenient reads from schema-less plugin configuration.
//!
//! Plugins parse their own keys into typed settings. A missing key yields
//! the documented default; a malformed one is logged and also yields the
//! default, so a bad option never stops a plugin from running.

use crate::models::PluginConfig;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use tracing::warn;

/// Read `key` as `T`, falling back to `default`.
pub fn read<T: DeserializeOwned>(cfg: &PluginConfig, key: &str, default: T) -> T {
    match cfg.get(key) {
        None | Some(Json::Null) => default,
        Some(v) => match serde_json::from_value::<T>(v.clone()) {
            Ok(t) => t,
            Err(e) => {
                warn!(option = key, error = %e, "ignoring malformed plugin option");
                default
            }
        },
    }
}

/// Overlay `overrides` onto `base`, key by key.
pub fn merge(base: &PluginConfig, overrides: Option<&PluginConfig>) -> PluginConfig {
    let mut out = base.clone();
    if let Some(ov) = overrides {
        for (k, v) in ov {
            out.insert(k.clone(), v.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg(v: Json) -> PluginConfig {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_read_falls_back_on_missing_and_malformed() {
        let c = cfg(json!({"max_words": "many", "min": 4, "ratio": 2}));
        assert_eq!(read(&c, "max_words", 20usize), 20);
        assert_eq!(read(&c, "min", 3usize), 4);
        assert_eq!(read(&c, "absent", true), true);
        assert_eq!(read(&c, "ratio", 0.5f64), 2.0);
    }

    #[test]
    fn test_merge_overrides_win() {
        let base = cfg(json!({"a": 1, "b": 2}));
        let ov = cfg(json!({"b": 3}));
        let out = merge(&base, Some(&ov));
        assert_eq!(out["a"], 1);
        assert_eq!(out["b"], 3);
        assert_eq!(merge(&base, None), base);
    }
}
