#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

//! Request parameters. Fields serialize in declaration order, which is the order they appear in
//! the query string and therefore in the signed payload.

use bon::Builder;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::spot::types::{KlineInterval, OrderResponseType, OrderType, Side, TimeInForce};
use crate::types::Decimal;

/// Parameters of endpoints that take none besides the ones the client adds.
#[expect(
    clippy::empty_structs_with_brackets,
    reason = "A braced struct is encoded as an empty map, i.e. an empty query string"
)]
#[derive(Debug, Default, Serialize)]
pub(crate) struct NoParams {}

/// A single `symbol` parameter, used by the ticker and price endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct SymbolRequest<'symbol> {
    pub symbol: &'symbol str,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub(crate) struct OpenOrdersRequest<'symbol> {
    pub symbol: Option<&'symbol str>,
}

/// An order to place, or to validate against `v3/order/test` when `test_mode` is set.
///
/// `newOrderRespType` is always `FULL` so the response carries fill details. `price` is omitted
/// entirely when absent, which is what a `MARKET` order needs.
///
/// ```
/// use binance_rest_sdk::spot::types::{OrderRequest, OrderType, Side};
/// use binance_rest_sdk::types::dec;
///
/// let order = OrderRequest::builder()
///     .symbol("BNBBTC")
///     .side(Side::Buy)
///     .order_type(OrderType::Limit)
///     .quantity(dec!(10))
///     .price(dec!(1.50))
///     .build();
/// assert!(!order.test_mode);
/// ```
#[non_exhaustive]
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Decimal,
    #[builder(skip)]
    pub new_order_resp_type: OrderResponseType,
    pub price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    /// Route to the validation-only endpoint. Never sent as a parameter.
    #[serde(skip)]
    #[builder(default)]
    pub test_mode: bool,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct KlinesRequest {
    pub symbol: String,
    pub interval: KlineInterval,
    /// Open time of the first candle, in epoch milliseconds.
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    /// Number of candles; the exchange defaults to 500 and caps at 1000.
    pub limit: Option<u16>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[builder(on(String, into))]
pub struct DepthRequest {
    pub symbol: String,
    /// One of 5, 10, 20, 50, 100, 500, 1000, 5000.
    pub limit: Option<u16>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[builder(on(String, into))]
pub struct RecentTradesRequest {
    pub symbol: String,
    pub limit: Option<u16>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct AggTradesRequest {
    pub symbol: String,
    /// Aggregate trade id to fetch from, inclusive.
    pub from_id: Option<u64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub limit: Option<u16>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct MyTradesRequest {
    pub symbol: String,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    /// Trade id to fetch from; older trades are returned otherwise.
    pub from_id: Option<u64>,
    pub limit: Option<u16>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct AllOrdersRequest {
    pub symbol: String,
    /// Return orders with an id greater than or equal to this one.
    pub order_id: Option<u64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub limit: Option<u16>,
}

/// Identifies one order. Either `order_id` or `orig_client_order_id` must be set.
#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct OrderStatusRequest {
    pub symbol: String,
    pub order_id: Option<u64>,
    pub orig_client_order_id: Option<String>,
}

/// Identifies the order to cancel. Either `order_id` or `orig_client_order_id` must be set.
#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct CancelOrderRequest {
    pub symbol: String,
    pub order_id: Option<u64>,
    pub orig_client_order_id: Option<String>,
}
