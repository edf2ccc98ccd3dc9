//! HTTP server wiring for rollcall.
//!
//! Loads [`ServerConfig`], and mounts the JSON API from `rollcall-api` under
//! `/api` with request tracing.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, Source};
use rollcall_core::store::ScheduleStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROLLCALL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  pub store_path: PathBuf,
  /// IANA zone name in which attendance times are interpreted.
  #[serde(default = "default_timezone")]
  pub timezone:   Tz,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_timezone() -> Tz { chrono_tz::UTC }

/// Layer `env` over `file` and deserialise the result.
pub fn load_config<F>(file: F, env: Environment) -> Result<ServerConfig, ConfigError>
where
  F: Source + Send + Sync + 'static,
{
  Config::builder()
    .add_source(file)
    .add_source(env)
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: the API under `/api`, traced.
pub fn router<S>(store: Arc<S>, zone: Tz) -> Router
where
  S: ScheduleStore + 'static,
{
  Router::new()
    .nest("/api", rollcall_api::api_router(store, zone))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use config::{File, FileFormat};
  use rollcall_store_sqlite::SqliteStore;
  use tower::ServiceExt;

  use super::*;

  fn env(vars: &[(&str, &str)]) -> Environment {
    let map: HashMap<String, String> =
      vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Environment::with_prefix("ROLLCALL").source(Some(map))
  }

  #[test]
  fn config_reads_toml() {
    let toml = r#"
      host = "0.0.0.0"
      port = 9000
      store_path = "/var/lib/rollcall.db"
      timezone = "Asia/Shanghai"
    "#;
    let cfg = load_config(File::from_str(toml, FileFormat::Toml), env(&[])).unwrap();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/rollcall.db"));
    assert_eq!(cfg.timezone, chrono_tz::Asia::Shanghai);
  }

  #[test]
  fn config_defaults_and_env_override() {
    let toml = r#"store_path = "rollcall.db""#;
    let cfg = load_config(
      File::from_str(toml, FileFormat::Toml),
      env(&[("ROLLCALL_STORE_PATH", "other.db")]),
    )
    .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.timezone, chrono_tz::UTC);
    assert_eq!(cfg.store_path, PathBuf::from("other.db"));
  }

  #[test]
  fn config_rejects_unknown_zone() {
    let toml = r#"
      store_path = "rollcall.db"
      timezone = "Mars/Olympus_Mons"
    "#;
    assert!(load_config(File::from_str(toml, FileFormat::Toml), env(&[])).is_err());
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/data/rollcall.db")),
      PathBuf::from(home).join("data/rollcall.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs/x.db")), PathBuf::from("/abs/x.db"));
    assert_eq!(expand_tilde(Path::new("~other/x.db")), PathBuf::from("~other/x.db"));
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = router(Arc::new(store), chrono_tz::UTC);

    let ok = app
      .clone()
      .oneshot(Request::get("/api/timetable/slots").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let missing = app
      .oneshot(Request::get("/timetable/slots").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }
}
