use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION,
    HOST, REFERER, USER_AGENT,
};

use crate::{
    config::{self, SETTINGS},
    logging,
};

/// 報價端點的網址與 session 所需的 header
pub trait QuoteUrls {
    fn quote(&self, symbol: &str) -> String;
    fn session_headers(&self) -> HeaderMap;
}

/// Firstrade 網頁端點
#[derive(Debug, Clone)]
pub struct Firstrade {
    host: String,
    user_agent: String,
}

impl Firstrade {
    pub fn new(host: &str, user_agent: &str) -> Self {
        Self {
            host: host.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub fn from_settings() -> Self {
        Self::new(&SETTINGS.broker.host, &SETTINGS.broker.user_agent)
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl Default for Firstrade {
    fn default() -> Self {
        Self::new(config::DEFAULT_HOST, config::DEFAULT_USER_AGENT)
    }
}

impl QuoteUrls for Firstrade {
    fn quote(&self, symbol: &str) -> String {
        format!(
            "https://{host}/cgi-bin/getxml?page=quotes&quoteSymbol={symbol}",
            host = self.host,
            symbol = urlencoding::encode(symbol)
        )
    }

    fn session_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, br"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        insert_header(&mut headers, HOST, &self.host);
        insert_header(
            &mut headers,
            REFERER,
            &format!("https://{}/cgi-bin/main", self.host),
        );
        insert_header(&mut headers, USER_AGENT, &self.user_agent);

        headers
    }
}

/// 設定值不是合法的 header 時略過該 header 並記錄
fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) -> bool {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
            true
        }
        Err(why) => {
            logging::warn_file_async(format!(
                "Skip the {} header because {:?}: {:?}",
                name, why, value
            ));
            false
        }
    }
}
