//! 券商即時報價
//!
//! 透過已驗證的 session 向券商的報價端點取得單一證券的報價，並轉成 [`Quote`]。
//!
//! ```no_run
//! use firstrade_quote::{HttpSession, QuoteFetcher};
//!
//! # async fn run() -> firstrade_quote::Result<()> {
//! let session = HttpSession::from_settings();
//! let quote = QuoteFetcher::from_settings().fetch(&session, "AAPL").await?;
//! println!("{} {} {:?}", quote.symbol(), quote.last(), quote.high());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod quote;
pub mod session;
pub mod urls;
pub mod util;

pub use error::{QuoteError, Result};
pub use quote::{fetch, Quote, QuoteFetcher};
pub use session::{HttpSession, Session};
pub use urls::{Firstrade, QuoteUrls};
