use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub mod request;
pub mod response;

pub use request::{
    AggTradesRequest, AllOrdersRequest, CancelOrderRequest, DepthRequest, KlinesRequest,
    MyTradesRequest, OrderRequest, OrderStatusRequest, RecentTradesRequest,
};
pub use response::{
    AccountInfo, AccountTrade, AggTrade, Balance, BookTicker, CancelOrderResponse, ExchangeInfo,
    Fill, Kline, NewOrderResponse, Order, OrderBook, OrderResponse, PriceLevel, PriceResponse,
    ServerTimeResponse, SymbolInfo, Ticker24hr, Trade,
};

#[non_exhaustive]
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

#[non_exhaustive]
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Fill immediately at the best available price; no `price` is sent.
    Market,
    Limit,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    /// A limit order that is rejected if it would immediately match and take liquidity.
    LimitMaker,
    /// Unknown order type from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

/// How much detail the exchange returns when an order is placed.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum OrderResponseType {
    Ack,
    Result,
    /// Includes the fills of the order.
    #[default]
    Full,
}

#[non_exhaustive]
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good 'til Cancelled; the order rests on the book until filled or cancelled.
    GTC,
    /// Immediate or Cancel; whatever cannot be filled immediately is cancelled.
    IOC,
    /// Fill or Kill; the order is cancelled unless it can be filled in full immediately.
    FOK,
    #[serde(untagged)]
    Unknown(String),
}

#[non_exhaustive]
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    PendingCancel,
    Rejected,
    Expired,
    #[serde(untagged)]
    Unknown(String),
}

/// Candlestick width accepted by the klines endpoint.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1m")]
    #[strum(serialize = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    #[strum(serialize = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    #[strum(serialize = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    #[strum(serialize = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    #[strum(serialize = "4h")]
    FourHours,
    #[serde(rename = "6h")]
    #[strum(serialize = "6h")]
    SixHours,
    #[serde(rename = "8h")]
    #[strum(serialize = "8h")]
    EightHours,
    #[serde(rename = "12h")]
    #[strum(serialize = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    #[strum(serialize = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    #[strum(serialize = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    #[strum(serialize = "1w")]
    OneWeek,
    #[serde(rename = "1M")]
    #[strum(serialize = "1M")]
    OneMonth,
}
