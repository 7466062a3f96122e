//! Configuration types for quina.
//!
//! [`Config::load`] layers, lowest to highest priority: the embedded defaults,
//! a TOML file (`--config`, `$QUINA_CONFIG`, or `./quina.toml` if present),
//! and the `PORT` / `DATABASE_URL` / `DB_PATH` environment variables.
//! [`Config::defaults`] returns the embedded defaults without touching the
//! filesystem or the environment (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
port       = 3000
static_dir = "."

[store]
table        = "quina_results"
result_limit = 11
"#;

/// File read when neither `--config` nor `$QUINA_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "quina.toml";

/// SQLite file used when neither `DATABASE_URL` nor `DB_PATH` is set.
pub const DEFAULT_DB_PATH: &str = "./quina.db";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for every path that is not an API route.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_port() -> u16 { 3000 }
fn default_static_dir() -> PathBuf { PathBuf::from(".") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_table")]
    pub table: String,
    /// Rows fetched per request: one latest draw plus the previous ones.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// PostgreSQL connection string. Takes precedence over `db_path`.
    #[serde(default)]
    pub database_url: Option<String>,
    /// SQLite database file.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

fn default_table() -> String { "quina_results".to_string() }
fn default_result_limit() -> usize { 11 }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            result_limit: default_result_limit(),
            database_url: None,
            db_path: None,
        }
    }
}

/// Storage backend selected by [`StoreConfig::backend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSelection {
    Postgres { url: String },
    /// `implicit` is true when no location was configured and
    /// [`DEFAULT_DB_PATH`] is used.
    Sqlite { path: PathBuf, implicit: bool },
}

impl StoreConfig {
    /// `DATABASE_URL` wins, then `DB_PATH`, then [`DEFAULT_DB_PATH`]. Empty
    /// strings count as unset.
    pub fn backend(&self) -> BackendSelection {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return BackendSelection::Postgres { url: url.to_string() };
        }
        match self.db_path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => BackendSelection::Sqlite {
                path: path.clone(),
                implicit: false,
            },
            None => BackendSelection::Sqlite {
                path: PathBuf::from(DEFAULT_DB_PATH),
                implicit: true,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from the process environment. `path` overrides the config file
    /// location; an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// As [`Config::load`], reading variables through `env`.
    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match env("QUINA_CONFIG") {
                Some(p) => (PathBuf::from(p), true),
                None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        // Blank variables count as unset.
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(
                config::File::new(&file.to_string_lossy(), config::FileFormat::Toml)
                    .required(required),
            )
            .set_override_option("server.port", var("PORT"))?
            .set_override_option("store.database_url", var("DATABASE_URL"))?
            .set_override_option("store.db_path", var("DB_PATH"))?
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !is_plain_identifier(&self.store.table) {
            anyhow::bail!(
                "store.table must contain only letters, digits and underscores, got {:?}",
                self.store.table
            );
        }
        if self.store.result_limit == 0 {
            anyhow::bail!("store.result_limit must be at least 1");
        }
        Ok(())
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.static_dir, PathBuf::from("."));
        assert_eq!(cfg.store.table, "quina_results");
        assert_eq!(cfg.store.result_limit, 11);
        assert_eq!(
            cfg.store.backend(),
            BackendSelection::Sqlite {
                path: PathBuf::from(DEFAULT_DB_PATH),
                implicit: true
            }
        );
    }

    #[test]
    fn environment_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("quina.toml");
        std::fs::write(&file, "").unwrap();
        let cfg = Config::load_with(Some(&file), env_of(&[("PORT", "8080"), ("DB_PATH", "/tmp/q.db")]))
            .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(
            cfg.store.backend(),
            BackendSelection::Sqlite {
                path: PathBuf::from("/tmp/q.db"),
                implicit: false
            }
        );
    }

    #[test]
    fn named_config_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(Config::load_with(Some(&missing), env_of(&[])).is_err());

        let via_env = missing.to_string_lossy().into_owned();
        assert!(Config::load_with(None, env_of(&[("QUINA_CONFIG", &via_env)])).is_err());
    }

    #[test]
    fn file_layers_over_defaults_and_env_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("quina.toml");
        std::fs::write(
            &file,
            "[server]\nport = 4000\nstatic_dir = \"public\"\n\n[store]\nresult_limit = 5\n",
        )
        .unwrap();

        let cfg = Config::load_with(Some(&file), env_of(&[])).unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.server.static_dir, PathBuf::from("public"));
        assert_eq!(cfg.store.result_limit, 5);
        assert_eq!(cfg.store.table, "quina_results");

        let cfg = Config::load_with(Some(&file), env_of(&[("PORT", "5000")])).unwrap();
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn database_url_wins_over_db_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("quina.toml");
        std::fs::write(&file, "").unwrap();
        let cfg = Config::load_with(
            Some(&file),
            env_of(&[
                ("DATABASE_URL", "postgres://localhost/quina"),
                ("DB_PATH", "/tmp/q.db"),
            ]),
        )
        .unwrap();
        assert_eq!(
            cfg.store.backend(),
            BackendSelection::Postgres {
                url: "postgres://localhost/quina".into()
            }
        );
    }

    #[test]
    fn empty_database_url_is_unset() {
        let store = StoreConfig {
            database_url: Some("  ".into()),
            db_path: Some(PathBuf::from("x.db")),
            ..StoreConfig::default()
        };
        assert!(matches!(store.backend(), BackendSelection::Sqlite { implicit: false, .. }));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("quina.toml");
        std::fs::write(&file, "").unwrap();
        assert!(Config::load_with(Some(&file), env_of(&[("PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn blank_variables_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("quina.toml");
        std::fs::write(&file, "").unwrap();
        let cfg = Config::load_with(
            Some(&file),
            env_of(&[("PORT", ""), ("DATABASE_URL", ""), ("DB_PATH", "  ")]),
        )
        .unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert!(matches!(cfg.store.backend(), BackendSelection::Sqlite { implicit: true, .. }));
    }

    #[test]
    fn table_name_must_be_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("quina.toml");
        std::fs::write(&file, "[store]\ntable = \"results; DROP TABLE x\"\n").unwrap();
        assert!(Config::load_with(Some(&file), env_of(&[])).is_err());

        assert!(is_plain_identifier("quina_results"));
        assert!(is_plain_identifier("_r2"));
        assert!(!is_plain_identifier("2r"));
        assert!(!is_plain_identifier(""));
    }
}
