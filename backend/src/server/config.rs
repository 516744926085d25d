//! Server settings, session key loading, and the assembled server config.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use mahjong_ledger::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Signed and encrypted cookies need at least this much key material.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Process settings read from `MAHJONG_*` environment variables, an optional
/// config file, and the command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MAHJONG")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without it the server runs on in-memory
    /// fixtures.
    pub database_url: Option<String>,
    /// File holding the cookie session key.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file cannot be read.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub session_cookie_secure: bool,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when the address is malformed.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw}: {err}"),
            )
        })
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}

/// Failures while loading the session key.
#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    #[error("failed to read session key at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session key at {path} is {length} bytes; at least {SESSION_KEY_MIN_LEN} are required")]
    TooShort { path: PathBuf, length: usize },
}

impl From<SessionKeyError> for io::Error {
    fn from(err: SessionKeyError) -> Self {
        io::Error::other(err)
    }
}

/// Load the cookie session key from `path`.
///
/// A missing or unreadable file yields a random key in debug builds or when
/// `allow_ephemeral` is set. A key shorter than [`SESSION_KEY_MIN_LEN`] is
/// always rejected.
///
/// # Errors
///
/// Returns [`SessionKeyError`] when the key cannot be used.
pub fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, SessionKeyError> {
    match std::fs::read(path) {
        Ok(bytes) => Key::try_from(bytes.as_slice()).map_err(|_| SessionKeyError::TooShort {
            path: path.to_path_buf(),
            length: bytes.len(),
        }),
        Err(source) if cfg!(debug_assertions) || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using temporary session key");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionKeyError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database pool so the repositories use PostgreSQL instead of
    /// fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and session key loading.

    use super::*;
    use std::ffi::OsString;
    use std::io::Write as _;

    use env_lock::lock_env;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    const ENV_KEYS: [&str; 6] = [
        "MAHJONG_BIND_ADDR",
        "MAHJONG_DATABASE_URL",
        "MAHJONG_SESSION_KEY_FILE",
        "MAHJONG_SESSION_ALLOW_EPHEMERAL",
        "MAHJONG_SESSION_COOKIE_SECURE",
        "MAHJONG_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("mahjong-ledger")])
            .expect("config should load")
    }

    fn key_file(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&vec![7_u8; len]).expect("write key");
        file
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(ENV_KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(!settings.session_allow_ephemeral);
        assert!(settings.session_cookie_secure);
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MAHJONG_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "MAHJONG_DATABASE_URL",
                Some("postgres://localhost/mahjong".to_owned()),
            ),
            ("MAHJONG_SESSION_KEY_FILE", Some("/tmp/key".to_owned())),
            ("MAHJONG_SESSION_ALLOW_EPHEMERAL", Some("true".to_owned())),
            ("MAHJONG_SESSION_COOKIE_SECURE", Some("false".to_owned())),
            ("MAHJONG_DB_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/mahjong")
        );
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/key"));
        assert!(settings.session_allow_ephemeral);
        assert!(!settings.session_cookie_secure);
        assert_eq!(settings.db_max_connections(), 4);
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        let _guard = lock_env(ENV_KEYS.map(|key| (key, None::<String>)));
        let mut settings = load_from_empty_args();
        settings.bind_addr = Some("not-an-address".to_owned());

        let err = settings.bind_addr().expect_err("invalid address");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    #[case(SESSION_KEY_MIN_LEN)]
    #[case(128)]
    fn long_enough_keys_load(#[case] len: usize) {
        let file = key_file(len);
        assert!(load_session_key(file.path(), false).is_ok());
    }

    #[rstest]
    fn short_keys_are_rejected_even_when_ephemeral_is_allowed() {
        let file = key_file(SESSION_KEY_MIN_LEN - 1);
        let err = load_session_key(file.path(), true).err().expect("short key");
        assert!(matches!(err, SessionKeyError::TooShort { length: 63, .. }));
    }

    #[rstest]
    fn missing_key_falls_back_when_allowed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent");
        assert!(load_session_key(&path, true).is_ok());
    }
}
