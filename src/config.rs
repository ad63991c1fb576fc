use std::{env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

pub const DEFAULT_HOST: &str = "invest.firstrade.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub broker: Broker,
    #[serde(default)]
    pub http: Http,
}

const FIRSTRADE_HOST: &str = "FIRSTRADE_HOST";
const FIRSTRADE_USER_AGENT: &str = "FIRSTRADE_USER_AGENT";
const FIRSTRADE_COOKIE: &str = "FIRSTRADE_COOKIE";

/// 券商端點
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Broker {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 已登入的 session cookie，原樣附加在每個請求上
    #[serde(default)]
    pub cookie: String,
}

impl Default for Broker {
    fn default() -> Self {
        Broker {
            host: default_host(),
            user_agent: default_user_agent(),
            cookie: String::new(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const HTTP_CONNECT_TIMEOUT_SECS: &str = "HTTP_CONNECT_TIMEOUT_SECS";
const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Http {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Http {
    fn default() -> Self {
        Http {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| {
    dotenv::dotenv().ok();
    App::get().unwrap_or_else(|why| {
        logging::error_file_async(format!(
            "I can't read the config context because {:?}",
            why
        ));
        App::default().override_with_env()
    })
});

impl App {
    fn get() -> Result<Self> {
        Self::load(config_path())
    }

    /// 讀取指定的設定檔，不存在時只使用 env 與預設值
    pub fn load(path: PathBuf) -> Result<Self> {
        if path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(host) = env::var(FIRSTRADE_HOST) {
            self.broker.host = host;
        }

        if let Ok(user_agent) = env::var(FIRSTRADE_USER_AGENT) {
            self.broker.user_agent = user_agent;
        }

        if let Ok(cookie) = env::var(FIRSTRADE_COOKIE) {
            self.broker.cookie = cookie;
        }

        if let Ok(secs) = env::var(HTTP_CONNECT_TIMEOUT_SECS) {
            self.http.connect_timeout_secs =
                u64::from_str(&secs).unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        }

        if let Ok(secs) = env::var(HTTP_TIMEOUT_SECS) {
            self.http.timeout_secs = u64::from_str(&secs).unwrap_or(DEFAULT_TIMEOUT_SECS);
        }

        self
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_defaults() {
        let app = App::default();

        assert_eq!(app.broker.host, DEFAULT_HOST);
        assert_eq!(app.broker.user_agent, DEFAULT_USER_AGENT);
        assert!(app.broker.cookie.is_empty());
        assert_eq!(app.http.connect_timeout_secs, 8);
        assert_eq!(app.http.timeout_secs, 15);
    }

    #[test]
    fn test_load_json_with_missing_sections() {
        let path = env::temp_dir().join(format!("firstrade_quote_{}.json", std::process::id()));
        fs::write(&path, r#"{ "http": { "timeout_secs": 30 } }"#).unwrap();

        let app = App::load(path.clone()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(app.http.timeout_secs, 30);
        assert_eq!(app.http.connect_timeout_secs, 8);
        assert!(!app.broker.host.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let app = App::load(PathBuf::from("does-not-exist.json")).unwrap();
        assert!(!app.broker.user_agent.is_empty());
    }

    #[test]
    fn test_settings() {
        dotenv::dotenv().ok();
        logging::debug_file_async(format!("SETTINGS.broker.host: {}", SETTINGS.broker.host));
        assert!(!SETTINGS.broker.user_agent.is_empty());
    }
}
