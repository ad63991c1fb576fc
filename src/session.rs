//! # 券商 session
//!
//! `Session` 是抓取報價時唯一需要的外部能力：帶著自訂 header 發出已驗證的
//! GET 並回傳原始內容。登入、cookie 與逾時都由實作者負責。

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};

use crate::{config::SETTINGS, util};

#[async_trait]
pub trait Session: Send + Sync {
    /// 對 `url` 發出 GET，回傳 response body
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<String>;
}

/// 以共用的 reqwest client 實作的 session
///
/// 已登入的 cookie 會附加在每個請求上；若沒有設定則只依賴 client 的 cookie store。
#[derive(Debug, Clone, Default)]
pub struct HttpSession {
    cookie: Option<String>,
}

impl HttpSession {
    pub fn new(cookie: Option<String>) -> Self {
        Self {
            cookie: cookie.filter(|c| !c.is_empty()),
        }
    }

    /// 使用設定檔中的 cookie 建立 session
    pub fn from_settings() -> Self {
        Self::new(Some(SETTINGS.broker.cookie.clone()))
    }

    pub fn has_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    fn with_cookie(&self, mut headers: HeaderMap) -> Result<HeaderMap> {
        if let Some(cookie) = &self.cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|why| anyhow!("Failed to use the session cookie because {:?}", why))?;
            headers.insert(COOKIE, value);
        }

        Ok(headers)
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<String> {
        let headers = self.with_cookie(headers)?;
        util::http::get(url, Some(headers)).await
    }
}
