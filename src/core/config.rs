//! Configuration system: TOML file + env var overrides + defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{MirrorError, Result};
use crate::core::paths::{paths_overlap, resolve_absolute_path};
use crate::mirror::policy::{Decision, PolicyAxis, SyncPolicy};

/// Default bound on concurrent reconciliations and copies.
pub const DEFAULT_PARALLELISM: usize = 5;

/// Full configuration model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub mirror: MirrorSection,
    pub policy: SyncPolicy,
    pub logging: LoggingConfig,
}

/// Engine knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MirrorSection {
    pub parallelism: usize,
    /// Allow every action without asking, overriding `[policy]`.
    pub force: bool,
}

impl Default for MirrorSection {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            force: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// JSONL activity log; none when unset.
    pub activity_log: Option<PathBuf>,
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub parallelism: usize,
    pub policy: SyncPolicy,
    pub activity_log: Option<PathBuf>,
}

impl Config {
    /// Default configuration path: `$HOME/.config/dirmirror/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        env::var_os("HOME").map_or_else(
            || PathBuf::from(".dirmirror.toml"),
            |home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("dirmirror")
                    .join("config.toml")
            },
        )
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw =
                fs::read_to_string(&path_buf).map_err(|source| MirrorError::io(&path_buf, source))?;
            toml::from_str(&raw)?
        } else if path.is_some() {
            return Err(MirrorError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides_from(env_var)?;
        Ok(cfg)
    }

    /// Initial policy after applying `force`.
    #[must_use]
    pub fn effective_policy(&self) -> SyncPolicy {
        if self.mirror.force {
            SyncPolicy::force()
        } else {
            self.policy
        }
    }

    /// Validate and bind this config to a source/destination pair.
    pub fn resolve(&self, source: &Path, destination: &Path) -> Result<MirrorConfig> {
        let source = resolve_absolute_path(source);
        let destination = resolve_absolute_path(destination);
        for (role, path) in [("source", &source), ("destination", &destination)] {
            if !path.is_dir() {
                return Err(MirrorError::InvalidConfig {
                    details: format!("{role} '{}' is not an existing directory", path.display()),
                });
            }
        }
        if paths_overlap(&source, &destination) {
            return Err(MirrorError::InvalidConfig {
                details: format!(
                    "source '{}' and destination '{}' overlap",
                    source.display(),
                    destination.display()
                ),
            });
        }

        Ok(MirrorConfig {
            source,
            destination,
            parallelism: self.mirror.parallelism.max(1),
            policy: self.effective_policy(),
            activity_log: self.logging.activity_log.clone(),
        })
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("MIRROR_PARALLELISM") {
            self.mirror.parallelism = parse_env_usize("MIRROR_PARALLELISM", &raw)?;
        }
        if let Some(raw) = lookup("MIRROR_FORCE") {
            self.mirror.force = parse_env_bool("MIRROR_FORCE", &raw)?;
        }
        if let Some(raw) = lookup("MIRROR_ACTIVITY_LOG") {
            self.logging.activity_log = Some(PathBuf::from(raw));
        }
        for axis in PolicyAxis::ALL {
            let name = format!("MIRROR_POLICY_{}", axis.key().to_ascii_uppercase());
            if let Some(raw) = lookup(&name) {
                let decision = raw
                    .parse::<Decision>()
                    .map_err(|details| MirrorError::ConfigParse {
                        context: "env",
                        details: format!("{name}={raw:?}: {details}"),
                    })?;
                self.policy.set(axis, decision);
            }
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|error| MirrorError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .parse::<bool>()
        .map_err(|error| MirrorError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    fn two_dirs() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();
        (tmp, src, dst)
    }

    #[test]
    fn defaults_ask_everything_with_five_workers() {
        let cfg = Config::default();
        assert_eq!(cfg.mirror.parallelism, 5);
        assert!(!cfg.mirror.force);
        assert_eq!(cfg.effective_policy(), SyncPolicy::undecided());
        assert!(cfg.logging.activity_log.is_none());
    }

    #[test]
    fn parses_toml_sections() {
        let cfg: Config = toml::from_str(
            r#"
            [mirror]
            parallelism = 2

            [policy]
            delete_dir = "never"
            create_file = "always"

            [logging]
            activity_log = "/tmp/mirror.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mirror.parallelism, 2);
        assert_eq!(cfg.policy.delete_dir, Decision::NeverAllow);
        assert_eq!(cfg.policy.create_file, Decision::AlwaysAllow);
        assert_eq!(cfg.policy.overwrite_file, Decision::Undecided);
        assert_eq!(
            cfg.logging.activity_log,
            Some(PathBuf::from("/tmp/mirror.jsonl"))
        );
    }

    #[test]
    fn unknown_decision_is_parse_error() {
        let err: MirrorError = toml::from_str::<Config>("[policy]\ndelete_dir = \"sometimes\"")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "MIR-1003");
    }

    #[test]
    fn force_overrides_policy_section() {
        let mut cfg = Config::default();
        cfg.policy.delete_file = Decision::NeverAllow;
        cfg.mirror.force = true;
        assert_eq!(cfg.effective_policy(), SyncPolicy::force());
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = Config::default();
        let overrides = vars(&[
            ("MIRROR_PARALLELISM", "9"),
            ("MIRROR_FORCE", "true"),
            ("MIRROR_ACTIVITY_LOG", "/var/tmp/a.jsonl"),
            ("MIRROR_POLICY_DELETE_DIR", "never"),
        ]);
        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect("env overrides should parse");

        assert_eq!(cfg.mirror.parallelism, 9);
        assert!(cfg.mirror.force);
        assert_eq!(cfg.policy.delete_dir, Decision::NeverAllow);
        assert_eq!(
            cfg.logging.activity_log,
            Some(PathBuf::from("/var/tmp/a.jsonl"))
        );
    }

    #[test]
    fn env_invalid_values_rejected() {
        for (name, value) in [
            ("MIRROR_PARALLELISM", "many"),
            ("MIRROR_FORCE", "yes please"),
            ("MIRROR_POLICY_CREATE_FILE", "perhaps"),
        ] {
            let mut cfg = Config::default();
            let overrides = vars(&[(name, value)]);
            let err = cfg
                .apply_env_overrides_from(|n| overrides.get(n).cloned())
                .unwrap_err();
            assert!(
                matches!(err, MirrorError::ConfigParse { context: "env", .. }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn load_returns_error_for_explicit_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/dirmirror/config.toml"))).unwrap_err();
        assert!(matches!(err, MirrorError::MissingConfig { .. }));
    }

    #[test]
    fn load_reads_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[mirror]\nparallelism = 3\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        // MIRROR_PARALLELISM may be set in the environment running the tests.
        if env_var("MIRROR_PARALLELISM").is_none() {
            assert_eq!(cfg.mirror.parallelism, 3);
        }
    }

    #[test]
    fn resolve_accepts_sibling_directories() {
        let (_tmp, src, dst) = two_dirs();
        let resolved = Config::default().resolve(&src, &dst).unwrap();
        assert!(resolved.source.is_absolute());
        assert!(resolved.destination.ends_with("dst"));
        assert_eq!(resolved.parallelism, 5);
    }

    #[test]
    fn resolve_coerces_zero_parallelism() {
        let (_tmp, src, dst) = two_dirs();
        let mut cfg = Config::default();
        cfg.mirror.parallelism = 0;
        assert_eq!(cfg.resolve(&src, &dst).unwrap().parallelism, 1);
    }

    #[test]
    fn resolve_rejects_missing_or_file_paths() {
        let (tmp, src, _dst) = two_dirs();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let err = Config::default().resolve(&src, &file).unwrap_err();
        assert_eq!(err.code(), "MIR-1001");
        let err = Config::default()
            .resolve(&tmp.path().join("missing"), &src)
            .unwrap_err();
        assert!(err.to_string().contains("source"), "{err}");
    }

    #[test]
    fn resolve_rejects_nested_and_identical_paths() {
        let (_tmp, src, _dst) = two_dirs();
        let nested = src.join("inner");
        fs::create_dir(&nested).unwrap();

        assert!(Config::default().resolve(&src, &nested).is_err());
        assert!(Config::default().resolve(&nested, &src).is_err());
        assert!(Config::default().resolve(&src, &src).is_err());
    }
}
