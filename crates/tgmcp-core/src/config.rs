use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Telegram API credentials and session token.
///
/// Every field is optional here: the connection wrapper is the one that refuses
/// to start when something is missing, so the cause gets logged in one place.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub api_id: Option<i32>,
    pub api_hash: Option<String>,
    pub session_string: Option<String>,

    /// The `.env` file that was read, if any.
    pub env_file: Option<PathBuf>,
}

pub const ENV_API_ID: &str = "TELEGRAM_API_ID";
pub const ENV_API_HASH: &str = "TELEGRAM_API_HASH";
pub const ENV_SESSION_STRING: &str = "TELEGRAM_SESSION_STRING";
pub const ENV_FILE_OVERRIDE: &str = "TGMCP_ENV_FILE";

impl Config {
    /// Load `.env` (first match of the candidate paths) and read credentials from the environment.
    pub fn load() -> Self {
        let env_file = env_file_candidates()
            .into_iter()
            .find(|p| load_dotenv_if_present(p));

        Self::from_env(env_file)
    }

    fn from_env(env_file: Option<PathBuf>) -> Self {
        Self {
            api_id: env_str(ENV_API_ID).and_then(|s| s.trim().parse::<i32>().ok()),
            api_hash: env_str(ENV_API_HASH).and_then(non_empty),
            session_string: env_str(ENV_SESSION_STRING).and_then(non_empty),
            env_file,
        }
    }

    /// Names of the credential variables that are absent.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.api_id.is_none() {
            out.push(ENV_API_ID);
        }
        if self.api_hash.is_none() {
            out.push(ENV_API_HASH);
        }
        if self.session_string.is_none() {
            out.push(ENV_SESSION_STRING);
        }
        out
    }
}

fn env_file_candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(p) = env::var_os(ENV_FILE_OVERRIDE) {
        out.push(PathBuf::from(p));
    }
    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        out.push(dir.join(".env"));
    }
    out.push(PathBuf::from(".env"));
    out
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Read `KEY=value` lines into the process environment. Returns whether the file was read.
fn load_dotenv_if_present(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
    true
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim().to_string())
    }
}
