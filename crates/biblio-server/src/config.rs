use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use biblio_store::RedisConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const ENV_STORE_HOST: &str = "REDIS_HOST";
pub const ENV_STORE_PORT: &str = "REDIS_PORT";
pub const ENV_STORE_DB: &str = "REDIS_DB";
pub const ENV_SECRET_KEY: &str = "FLASK_SECRET_KEY";
pub const ENV_SECRET_KEY_FALLBACK: &str = "SECRET_KEY";
pub const ENV_BIND: &str = "BIBLIO_BIND";

/// Dotenv file read from the working directory, if present.
pub const DOTENV_FILE: &str = ".env";

pub const DEFAULT_SECRET_KEY: &str = "your_secret_key";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: RedisConfig,
    pub secret_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            store: RedisConfig::default(),
            secret_key: DEFAULT_SECRET_KEY.into(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("store", &self.store)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Defaults, then the optional TOML file, then the environment.
    ///
    /// The environment is the process environment with `.env` from the
    /// working directory filling in variables that are not set.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        Self::load_with_dotenv(path, Path::new(DOTENV_FILE))
    }

    /// [`load`](Self::load) with an explicit dotenv file location.
    pub fn load_with_dotenv(path: Option<&Path>, dotenv: &Path) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        let file_vars = read_dotenv(dotenv)?;
        config.apply_overrides(env_then_dotenv(|name| std::env::var(name).ok(), &file_vars))?;
        Ok(config)
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Apply overrides from `lookup`, usually the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_STORE_HOST) {
            self.store.host = host;
        }
        if let Some(port) = lookup(ENV_STORE_PORT) {
            self.store.port = parse_var(ENV_STORE_PORT, &port)?;
        }
        if let Some(db) = lookup(ENV_STORE_DB) {
            self.store.db = parse_var(ENV_STORE_DB, &db)?;
        }
        if let Some(secret) = lookup(ENV_SECRET_KEY).or_else(|| lookup(ENV_SECRET_KEY_FALLBACK)) {
            self.secret_key = secret;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind_addr = parse_var(ENV_BIND, &bind)?;
        }
        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

/// Variables from a dotenv file. A missing file yields no variables.
pub fn read_dotenv(path: &Path) -> ServerResult<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(ServerError::Config(format!("{}: {e}", path.display()))),
    };
    iter.map(|item| item.map_err(|e| ServerError::Config(format!("{}: {e}", path.display()))))
        .collect()
}

/// Look a variable up in `env` first, then in the dotenv variables.
fn env_then_dotenv<'a, E>(
    env: E,
    file_vars: &'a HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> + 'a
where
    E: Fn(&str) -> Option<String> + 'a,
{
    move |name| env(name).or_else(|| file_vars.get(name).cloned())
}

fn parse_var<T>(name: &str, value: &str) -> ServerResult<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ServerError::Config(format!("{name}={value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.store.host, "localhost");
        assert_eq!(c.store.port, 6379);
        assert_eq!(c.store.db, 0);
        assert!(c.uses_default_secret());
    }

    #[test]
    fn env_overrides() {
        let mut c = ServerConfig::default();
        c.apply_overrides(env(&[
            ("REDIS_HOST", "keydb.internal"),
            ("REDIS_PORT", "6380"),
            ("REDIS_DB", "3"),
            ("FLASK_SECRET_KEY", "s3cret"),
            ("BIBLIO_BIND", "0.0.0.0:8080"),
        ]))
        .unwrap();
        assert_eq!(c.store.host, "keydb.internal");
        assert_eq!(c.store.port, 6380);
        assert_eq!(c.store.db, 3);
        assert_eq!(c.secret_key, "s3cret");
        assert_eq!(c.bind_addr.port(), 8080);
        assert!(!c.uses_default_secret());
    }

    #[test]
    fn secret_key_falls_back_to_plain_name() {
        let mut c = ServerConfig::default();
        c.apply_overrides(env(&[("SECRET_KEY", "plain")])).unwrap();
        assert_eq!(c.secret_key, "plain");

        let mut c = ServerConfig::default();
        c.apply_overrides(env(&[("SECRET_KEY", "plain"), ("FLASK_SECRET_KEY", "flask")]))
            .unwrap();
        assert_eq!(c.secret_key, "flask");
    }

    #[test]
    fn dotenv_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "REDIS_HOST=keydb\nREDIS_DB=4\nFLASK_SECRET_KEY=\"from file\"\n").unwrap();

        let vars = read_dotenv(&path).unwrap();
        assert_eq!(vars["REDIS_HOST"], "keydb");
        assert_eq!(vars["REDIS_DB"], "4");
        assert_eq!(vars["FLASK_SECRET_KEY"], "from file");
    }

    #[test]
    fn missing_dotenv_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_dotenv(&dir.path().join(".env")).unwrap().is_empty());
    }

    #[test]
    fn malformed_dotenv_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NOT A VALID LINE\n").unwrap();
        assert!(matches!(read_dotenv(&path), Err(ServerError::Config(_))));
    }

    #[test]
    fn environment_wins_over_dotenv() {
        let file_vars: HashMap<String, String> = [
            ("REDIS_HOST".to_string(), "from-file".to_string()),
            ("REDIS_DB".to_string(), "5".to_string()),
            ("FLASK_SECRET_KEY".to_string(), "file-secret".to_string()),
        ]
        .into_iter()
        .collect();
        let mut c = ServerConfig::default();
        c.apply_overrides(env_then_dotenv(env(&[("REDIS_HOST", "from-env")]), &file_vars))
            .unwrap();
        assert_eq!(c.store.host, "from-env");
        assert_eq!(c.store.db, 5);
        assert_eq!(c.secret_key, "file-secret");
    }

    #[test]
    fn load_reads_toml_then_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("biblio.toml");
        std::fs::write(&toml_path, "bind_addr = \"127.0.0.1:7000\"\n").unwrap();
        let dotenv_path = dir.path().join(".env");
        std::fs::write(&dotenv_path, "BIBLIO_BIND=127.0.0.1:7100\n").unwrap();

        let c = ServerConfig::load_with_dotenv(Some(&toml_path), &dotenv_path).unwrap();
        if std::env::var(ENV_BIND).is_err() {
            assert_eq!(c.bind_addr.port(), 7100);
        }
    }

    #[test]
    fn no_env_keeps_defaults() {
        let mut c = ServerConfig::default();
        c.apply_overrides(env(&[])).unwrap();
        assert_eq!(c.store, RedisConfig::default());
    }

    #[test]
    fn bad_port_is_config_error() {
        let mut c = ServerConfig::default();
        let err = c.apply_overrides(env(&[("REDIS_PORT", "redis")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(ref msg) if msg.contains("REDIS_PORT")));
    }

    #[test]
    fn toml_partial_document() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:9000"

            [store]
            db = 2
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.store.db, 2);
        assert_eq!(c.store.host, "localhost");
        assert!(c.uses_default_secret());
    }

    #[test]
    fn toml_invalid_is_config_error() {
        assert!(matches!(
            ServerConfig::from_toml_str("bind_addr = 5"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn debug_redacts_secret() {
        let mut c = ServerConfig::default();
        c.secret_key = "hunter2".into();
        let shown = format!("{c:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }
}
