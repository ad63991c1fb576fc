//! # 即時報價
//!
//! 向券商的報價端點發出一次請求，將回傳的 XML 轉成型別化的 [`Quote`]。
//!
//! 回應格式：
//!
//! ```xml
//! <quote>
//!   <symbol>AAPL</symbol><exchange>NASDAQ</exchange>
//!   <bid>150.25</bid><ask>150.30</ask><last>150.28</last><change>-1.50</change>
//!   <high>N/A</high><low>148.00</low><vol>50,000,000</vol>
//!   <companyname>Apple Inc.</companyname><realtime>T</realtime><fractional>T</fractional>
//! </quote>
//! ```
//!
//! 數值欄位可能帶千分位；`high`、`low` 在沒有資料時為 `N/A`；旗標欄位只有 `T` 代表真。

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::{QuoteError, Result},
    session::Session,
    urls::{Firstrade, QuoteUrls},
    util::{text, xml},
};

/// 無資料
const NOT_AVAILABLE: &str = "N/A";
/// 旗標為真
const TRUE_FLAG: &str = "T";

const QUOTE: &str = "quote";
const SYMBOL: &str = "symbol";
const EXCHANGE: &str = "exchange";
const BID: &str = "bid";
const ASK: &str = "ask";
const LAST: &str = "last";
const CHANGE: &str = "change";
const HIGH: &str = "high";
const LOW: &str = "low";
const VOLUME: &str = "vol";
const COMPANY_NAME: &str = "companyname";
const REAL_TIME: &str = "realtime";
const FRACTIONAL: &str = "fractional";

/// 單一證券在抓取當下的報價
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    symbol: String,
    exchange: String,
    bid: Decimal,
    ask: Decimal,
    last: Decimal,
    change: Decimal,
    high: Option<Decimal>,
    low: Option<Decimal>,
    volume: String,
    company_name: String,
    real_time: bool,
    fractional: bool,
}

impl Quote {
    /// Decodes a quote response body.
    pub fn from_xml(xml: &str) -> Result<Self> {
        QuoteElement::parse(xml)?.try_into()
    }

    /// Symbol as returned by the server, which may differ from the request.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn bid(&self) -> Decimal {
        self.bid
    }

    pub fn ask(&self) -> Decimal {
        self.ask
    }

    pub fn last(&self) -> Decimal {
        self.last
    }

    pub fn change(&self) -> Decimal {
        self.change
    }

    /// Session high, `None` when the server has none yet.
    pub fn high(&self) -> Option<Decimal> {
        self.high
    }

    /// Session low, `None` when the server has none yet.
    pub fn low(&self) -> Option<Decimal> {
        self.low
    }

    /// Raw volume text; the server may abbreviate units.
    pub fn volume(&self) -> &str {
        &self.volume
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn is_real_time(&self) -> bool {
        self.real_time
    }

    pub fn is_fractional(&self) -> bool {
        self.fractional
    }
}

impl FromStr for Quote {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_xml(s)
    }
}

/// `<quote>` 區塊中每個必要子元素的原始文字
#[derive(Debug, Clone, PartialEq)]
struct QuoteElement {
    symbol: String,
    exchange: String,
    bid: String,
    ask: String,
    last: String,
    change: String,
    high: String,
    low: String,
    vol: String,
    company_name: String,
    real_time: String,
    fractional: String,
}

impl QuoteElement {
    fn parse(body: &str) -> Result<Self> {
        // 非 XML 的回應（錯誤頁、空字串）同樣視為缺少 quote 區塊
        let document =
            xml::parse_document(body).map_err(|_| QuoteError::Structure { element: QUOTE })?;
        let quote = xml::find_first(document.root(), QUOTE)
            .ok_or(QuoteError::Structure { element: QUOTE })?;
        let field = |name: &'static str| {
            xml::parse_value(quote, name).ok_or(QuoteError::Structure { element: name })
        };

        Ok(Self {
            symbol: field(SYMBOL)?,
            exchange: field(EXCHANGE)?,
            bid: field(BID)?,
            ask: field(ASK)?,
            last: field(LAST)?,
            change: field(CHANGE)?,
            high: field(HIGH)?,
            low: field(LOW)?,
            vol: field(VOLUME)?,
            company_name: field(COMPANY_NAME)?,
            real_time: field(REAL_TIME)?,
            fractional: field(FRACTIONAL)?,
        })
    }
}

impl TryFrom<QuoteElement> for Quote {
    type Error = QuoteError;

    fn try_from(raw: QuoteElement) -> Result<Self> {
        Ok(Quote {
            bid: parse_number(BID, &raw.bid)?,
            ask: parse_number(ASK, &raw.ask)?,
            last: parse_number(LAST, &raw.last)?,
            change: parse_number(CHANGE, &raw.change)?,
            high: parse_optional_number(HIGH, &raw.high)?,
            low: parse_optional_number(LOW, &raw.low)?,
            real_time: parse_flag(&raw.real_time),
            fractional: parse_flag(&raw.fractional),
            symbol: raw.symbol,
            exchange: raw.exchange,
            volume: raw.vol,
            company_name: raw.company_name,
        })
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<Decimal> {
    text::parse_decimal(raw.trim()).map_err(|_| QuoteError::Parse {
        field,
        text: raw.to_string(),
    })
}

fn parse_optional_number(field: &'static str, raw: &str) -> Result<Option<Decimal>> {
    if raw == NOT_AVAILABLE {
        return Ok(None);
    }

    parse_number(field, raw).map(Some)
}

fn parse_flag(raw: &str) -> bool {
    raw == TRUE_FLAG
}

/// 取得單一證券的報價
///
/// 只發出一次請求，不重試、不快取；`session` 僅在呼叫期間借用。
pub async fn fetch<S, U>(session: &S, urls: &U, symbol: &str) -> Result<Quote>
where
    S: Session + ?Sized,
    U: QuoteUrls + ?Sized,
{
    let url = urls.quote(symbol);
    let text = session.get(&url, urls.session_headers()).await?;

    Quote::from_xml(&text)
}

/// 綁定一組報價端點的抓取器
#[derive(Debug, Clone)]
pub struct QuoteFetcher<U = Firstrade> {
    urls: U,
}

impl<U: QuoteUrls> QuoteFetcher<U> {
    pub fn new(urls: U) -> Self {
        Self { urls }
    }

    pub fn urls(&self) -> &U {
        &self.urls
    }

    pub async fn fetch<S: Session + ?Sized>(&self, session: &S, symbol: &str) -> Result<Quote> {
        fetch(session, &self.urls, symbol).await
    }
}

impl QuoteFetcher<Firstrade> {
    /// 使用設定檔中的券商主機
    pub fn from_settings() -> Self {
        Self::new(Firstrade::from_settings())
    }
}

impl Default for QuoteFetcher<Firstrade> {
    fn default() -> Self {
        Self::new(Firstrade::default())
    }
}
