//! Runtime configuration from the environment (and an optional `.env`).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::advice::DEFAULT_ADVICE_URL;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const API_KEY_FILE: &str = "groq.key";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub programs_dir: PathBuf,
    pub advice_api_key: Option<String>,
    pub advice_url: String,
}

/// Where the process runs from; injected so resolution can be tested.
#[derive(Debug, Clone, Default)]
pub struct Locations {
    pub cwd: PathBuf,
    pub exe_dir: Option<PathBuf>,
}

impl Locations {
    pub fn current() -> Self {
        Locations {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            exe_dir: std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        if dotenv::dotenv().is_ok() {
            debug!(".env loaded");
        }
        let config = Self::from_lookup(|k| std::env::var(k).ok(), &Locations::current());
        info!(
            bind = %config.bind_addr,
            programs_dir = %config.programs_dir.display(),
            advice_key = config.advice_api_key.is_some(),
            "configuration resolved"
        );
        config
    }

    pub fn from_lookup<F>(lookup: F, loc: &Locations) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // hosting platforms hand out PORT and expect all interfaces
        let bind_addr = match get("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => get("STUDYMATE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
        };

        let programs_dir = match get("STUDYMATE_PROGRAMS_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => resolve_programs_dir(loc),
        };

        let advice_api_key = get("GROQ_API_KEY").or_else(|| read_key_file(loc));

        AppConfig {
            bind_addr,
            programs_dir,
            advice_api_key,
            advice_url: get("STUDYMATE_ADVICE_URL").unwrap_or_else(|| DEFAULT_ADVICE_URL.to_string()),
        }
    }
}

/// First existing candidate, else `<cwd>/ProgramJson`.
pub fn resolve_programs_dir(loc: &Locations) -> PathBuf {
    let mut candidates = vec![loc.cwd.join("ProgramJson"), loc.cwd.join("data/programs")];
    if let Some(exe) = &loc.exe_dir {
        candidates.push(exe.join("ProgramJson"));
    }
    candidates
        .iter()
        .find(|c| c.is_dir())
        .cloned()
        .unwrap_or_else(|| loc.cwd.join("ProgramJson"))
}

fn read_key_file(loc: &Locations) -> Option<String> {
    let mut candidates = vec![loc.cwd.join(API_KEY_FILE)];
    if let Some(exe) = &loc.exe_dir {
        candidates.push(exe.join(API_KEY_FILE));
    }
    candidates
        .iter()
        .filter_map(|p| fs::read_to_string(p).ok())
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
}
