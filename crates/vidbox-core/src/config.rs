//! Configuration module
//!
//! Configuration is read from the environment at startup (with `.env`
//! support loaded by the binary). Missing or invalid required settings are
//! startup failures.

use std::env;
use std::path::PathBuf;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_VIDEO_SIZE_BYTES: usize = 1024 * 1024 * 1024; // 1 GiB
const DEFAULT_ALLOWED_EXTENSIONS: &str = "mp4,mov,avi,mkv";
const DEFAULT_TRANSCODE_TIMEOUT_SECS: u64 = 1800;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Root directory all video artifacts live under.
    pub upload_dir: PathBuf,
    pub max_video_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub ffmpeg_path: String,
    pub transcode_timeout_secs: u64,
    pub session_ttl_hours: i64,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let allowed_extensions = parse_list(
            &env::var("ALLOWED_EXTENSIONS").unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.into()),
        );
        if allowed_extensions.is_empty() {
            anyhow::bail!("ALLOWED_EXTENSIONS must not be empty");
        }

        Ok(Config {
            server_port: parse_env("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            database_url,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: parse_env("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS)?,
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            ),
            max_video_size_bytes: parse_env(
                "MAX_VIDEO_SIZE_BYTES",
                DEFAULT_MAX_VIDEO_SIZE_BYTES,
            )?,
            allowed_extensions,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".into()),
            transcode_timeout_secs: parse_env(
                "TRANSCODE_TIMEOUT_SECS",
                DEFAULT_TRANSCODE_TIMEOUT_SECS,
            )?,
            session_ttl_hours: parse_env("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?,
            cors_origins: parse_list(&env::var("CORS_ORIGINS").unwrap_or_default()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated env value into trimmed, lowercased, non-empty items.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_lowercases() {
        assert_eq!(
            parse_list(" MP4, mov ,avi,"),
            vec!["mp4".to_string(), "mov".to_string(), "avi".to_string()]
        );
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
    }
}
