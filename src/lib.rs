//! An immutable URL value type with RFC 3986 percent-encoding, IDNA hosts, and an
//! ordered query multi-map.
//!
//! ```
//! use weburl::Url;
//!
//! let url: Url = "https://example.com/a/b?x=1".parse().unwrap();
//! assert_eq!(url.scheme(), "https");
//! assert_eq!(url.raw_host(), "example.com");
//! assert_eq!(url.query().get("x"), Some("1"));
//! ```

#![forbid(unsafe_code)]

mod ascii_string;
mod cache;
mod error;
mod host;
mod path;
mod ports;
mod query;
mod quoter;
mod split;
mod tables;
mod unquoter;
mod url;
mod util;

pub use ascii_string::AsciiString;
pub use cache::{cache_clear, cache_configure, cache_info, CacheInfo, CacheKind, CacheSize};
pub use error::Error;
pub use host::Host;
pub use query::{Query, QueryParam};
pub use quoter::Quoter;
pub use unquoter::Unquoter;
pub use url::{Url, UrlBuilder};
