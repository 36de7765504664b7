//! Paths of the endpoints this crate calls, relative to the client host.

use phf::phf_set;

pub const PING: &str = "v1/ping";
pub const SERVER_TIME: &str = "v1/time";
pub const EXCHANGE_INFO: &str = "v1/exchangeInfo";
pub const DEPTH: &str = "v1/depth";
pub const TRADES: &str = "v1/trades";
pub const AGG_TRADES: &str = "v1/aggTrades";
pub const KLINES: &str = "v1/klines";
pub const TICKER_24HR: &str = "v1/ticker/24hr";
pub const TICKER_PRICE: &str = "v3/ticker/price";
pub const BOOK_TICKER: &str = "v3/ticker/bookTicker";

pub const ACCOUNT: &str = "v3/account";
pub const MY_TRADES: &str = "v3/myTrades";
pub const OPEN_ORDERS: &str = "v3/openOrders";
pub const ALL_ORDERS: &str = "v3/allOrders";
pub const ORDER: &str = "v3/order";
pub const ORDER_TEST: &str = "v3/order/test";

/// Endpoints that take neither `timestamp` nor `recvWindow`. Every other path is time-sensitive.
static TIME_EXEMPT: phf::Set<&'static str> = phf_set! {
    "v1/ping",
    "v1/time",
    "v1/exchangeInfo",
    "v1/depth",
    "v1/trades",
    "v1/aggTrades",
    "v1/klines",
    "v1/ticker/24hr",
    "v3/ticker/price",
    "v3/ticker/bookTicker",
};

/// Whether requests to `path` go out without `timestamp` and `recvWindow`.
#[must_use]
pub fn is_time_exempt(path: &str) -> bool {
    TIME_EXEMPT.contains(path)
}
