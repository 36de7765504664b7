#![allow(
    clippy::module_name_repetitions,
    reason = "Response suffix is intentional for clarity"
)]

use std::fmt;

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Timestamp;
use crate::spot::types::{OrderStatus, OrderType, Side, TimeInForce};
use crate::types::Decimal;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimeResponse {
    pub server_time: Timestamp,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PriceResponse {
    pub symbol: String,
    pub price: Decimal,
}

/// Rolling 24 hour statistics for one symbol.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hr {
    pub symbol: String,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub weighted_avg_price: Decimal,
    pub prev_close_price: Option<Decimal>,
    pub last_price: Decimal,
    pub last_qty: Option<Decimal>,
    pub bid_price: Decimal,
    pub bid_qty: Option<Decimal>,
    pub ask_price: Decimal,
    pub ask_qty: Option<Decimal>,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub volume: Decimal,
    pub quote_volume: Option<Decimal>,
    pub open_time: Timestamp,
    pub close_time: Timestamp,
    pub first_id: i64,
    pub last_id: i64,
    pub count: u64,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub timezone: String,
    pub server_time: Timestamp,
    #[serde(default)]
    pub rate_limits: Vec<Value>,
    pub symbols: Vec<SymbolInfo>,
}

/// Trading rules of one market, as listed by the exchange info endpoint.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub base_asset_precision: u32,
    pub quote_asset: String,
    #[serde(alias = "quoteAssetPrecision")]
    pub quote_precision: u32,
    #[serde(default)]
    pub order_types: Vec<OrderType>,
    #[serde(default)]
    pub iceberg_allowed: bool,
    /// Price, lot size and notional filters, kept as raw JSON since their shape varies by type.
    #[serde(default)]
    pub filters: Vec<Value>,
}

/// One candlestick. The exchange sends each candle as a positional array, which is decoded in
/// field order. Columns past the taker buy quote volume are ignored.
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Kline {
    pub open_time: Timestamp,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: Timestamp,
    pub quote_asset_volume: Decimal,
    pub number_of_trades: u64,
    pub taker_buy_base_asset_volume: Decimal,
    pub taker_buy_quote_asset_volume: Decimal,
}

impl<'de> Deserialize<'de> for Kline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KlineVisitor;

        impl KlineVisitor {
            fn next<'de, T: Deserialize<'de>, A: SeqAccess<'de>>(
                &self,
                seq: &mut A,
                index: usize,
            ) -> Result<T, A::Error> {
                seq.next_element()?
                    .ok_or_else(|| de::Error::invalid_length(index, self))
            }
        }

        impl<'de> Visitor<'de> for KlineVisitor {
            type Value = Kline;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a candlestick array of at least 11 elements")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Kline, A::Error> {
                let kline = Kline {
                    open_time: self.next(&mut seq, 0)?,
                    open: self.next(&mut seq, 1)?,
                    high: self.next(&mut seq, 2)?,
                    low: self.next(&mut seq, 3)?,
                    close: self.next(&mut seq, 4)?,
                    volume: self.next(&mut seq, 5)?,
                    close_time: self.next(&mut seq, 6)?,
                    quote_asset_volume: self.next(&mut seq, 7)?,
                    number_of_trades: self.next(&mut seq, 8)?,
                    taker_buy_base_asset_volume: self.next(&mut seq, 9)?,
                    taker_buy_quote_asset_volume: self.next(&mut seq, 10)?,
                };
                while seq.next_element::<IgnoredAny>()?.is_some() {}

                Ok(kline)
            }
        }

        deserializer.deserialize_seq(KlineVisitor)
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    pub last_update_id: u64,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// A `[price, quantity]` pair of the order book. Trailing elements, which older API versions
/// send as an empty array, are ignored.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl<'de> Deserialize<'de> for PriceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceLevelVisitor;

        impl<'de> Visitor<'de> for PriceLevelVisitor {
            type Value = PriceLevel;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a [price, quantity] array")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PriceLevel, A::Error> {
                let price = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let quantity = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}

                Ok(PriceLevel { price, quantity })
            }
        }

        deserializer.deserialize_seq(PriceLevelVisitor)
    }
}

/// A public trade from the recent trades endpoint.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u64,
    pub price: Decimal,
    pub qty: Decimal,
    pub quote_qty: Option<Decimal>,
    pub time: Timestamp,
    pub is_buyer_maker: bool,
    pub is_best_match: Option<bool>,
}

/// Trades that filled at the same price from the same taker order, compressed into one entry.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AggTrade {
    #[serde(rename = "a")]
    pub id: u64,
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "q")]
    pub quantity: Decimal,
    #[serde(rename = "f")]
    pub first_trade_id: u64,
    #[serde(rename = "l")]
    pub last_trade_id: u64,
    #[serde(rename = "T")]
    pub time: Timestamp,
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
    #[serde(rename = "M")]
    pub is_best_match: bool,
}

/// Best bid and ask currently on the book.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookTicker {
    pub symbol: String,
    pub bid_price: Decimal,
    pub bid_qty: Decimal,
    pub ask_price: Decimal,
    pub ask_qty: Decimal,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub maker_commission: u32,
    pub taker_commission: u32,
    pub buyer_commission: u32,
    pub seller_commission: u32,
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub can_deposit: bool,
    pub update_time: Option<Timestamp>,
    pub balances: Vec<Balance>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Balance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

/// One of the caller's own fills, from the account trade list.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountTrade {
    pub symbol: Option<String>,
    pub id: u64,
    pub order_id: u64,
    pub price: Decimal,
    pub qty: Decimal,
    pub quote_qty: Option<Decimal>,
    pub commission: Decimal,
    pub commission_asset: String,
    pub time: Timestamp,
    pub is_buyer: bool,
    pub is_maker: bool,
    pub is_best_match: Option<bool>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    pub price: Decimal,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    pub cummulative_quote_qty: Option<Decimal>,
    pub status: OrderStatus,
    pub time_in_force: TimeInForce,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    pub stop_price: Option<Decimal>,
    pub iceberg_qty: Option<Decimal>,
    pub time: Timestamp,
    pub update_time: Option<Timestamp>,
    pub is_working: Option<bool>,
}

/// Result of placing an order with `newOrderRespType=FULL`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderResponse {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    pub transact_time: Timestamp,
    pub price: Decimal,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    pub cummulative_quote_qty: Option<Decimal>,
    pub status: OrderStatus,
    pub time_in_force: TimeInForce,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    #[serde(default)]
    pub fills: Vec<Fill>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub price: Decimal,
    pub qty: Decimal,
    pub commission: Decimal,
    pub commission_asset: String,
    pub trade_id: Option<u64>,
}

/// Outcome of [`crate::spot::Client::trade`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum OrderResponse {
    /// The order reached the matching engine.
    Placed(NewOrderResponse),
    /// The order passed validation on the test endpoint and was not executed.
    Tested,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderResponse {
    pub symbol: String,
    pub orig_client_order_id: Option<String>,
    pub order_id: u64,
    pub client_order_id: Option<String>,
    pub price: Option<Decimal>,
    pub orig_qty: Option<Decimal>,
    pub executed_qty: Option<Decimal>,
    pub status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::dec;

    #[test]
    fn kline_decodes_from_positional_array() -> serde_json::Result<()> {
        let kline: Kline = serde_json::from_value(json!([
            1_499_040_000_000_i64,
            "0.01634790",
            "0.80000000",
            "0.01575800",
            "0.01577100",
            "148976.11427815",
            1_499_644_799_999_i64,
            "2434.19055334",
            308,
            "1756.87402397",
            "28.46694368",
            "17928899.62484339"
        ]))?;

        assert_eq!(kline.open_time, 1_499_040_000_000);
        assert_eq!(kline.open, dec!(0.01634790));
        assert_eq!(kline.close_time, 1_499_644_799_999);
        assert_eq!(kline.number_of_trades, 308);
        assert_eq!(kline.taker_buy_quote_asset_volume, dec!(28.46694368));

        Ok(())
    }

    #[test]
    fn kline_ignores_appended_columns() -> serde_json::Result<()> {
        let klines: Vec<Kline> = serde_json::from_value(json!([
            [
                1_499_040_000_000_i64,
                "0.01634790",
                "0.80000000",
                "0.01575800",
                "0.01577100",
                "148976.11427815",
                1_499_644_799_999_i64,
                "2434.19055334",
                308,
                "1756.87402397",
                "28.46694368",
                "0",
                "extra",
                { "nested": [1, 2] }
            ],
            [
                1_499_644_800_000_i64,
                "0.01577100",
                "0.01600000",
                "0.01570000",
                "0.01590000",
                "1000.00000000",
                1_500_249_599_999_i64,
                "15.90000000",
                12,
                "500.00000000",
                "7.95000000"
            ]
        ]))?;

        assert_eq!(klines.len(), 2);
        assert_eq!(klines[0].number_of_trades, 308);
        assert_eq!(klines[0].taker_buy_quote_asset_volume, dec!(28.46694368));
        assert_eq!(klines[1].open_time, 1_499_644_800_000);
        assert_eq!(klines[1].close, dec!(0.01590000));

        Ok(())
    }

    #[test]
    fn kline_rejects_short_array() {
        let err = serde_json::from_value::<Kline>(json!([
            1_499_040_000_000_i64,
            "0.01634790",
            "0.80000000"
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("invalid length 3"), "{err}");
    }

    #[test]
    fn price_level_ignores_trailing_elements() -> serde_json::Result<()> {
        let book: OrderBook = serde_json::from_value(json!({
            "lastUpdateId": 1_027_024,
            "bids": [["4.00000000", "431.00000000", []]],
            "asks": [["4.00000200", "12.00000000"]]
        }))?;

        assert_eq!(book.last_update_id, 1_027_024);
        assert_eq!(
            book.bids,
            vec![PriceLevel {
                price: dec!(4.00000000),
                quantity: dec!(431.00000000)
            }]
        );
        assert_eq!(book.asks[0].quantity, dec!(12));

        Ok(())
    }

    #[test]
    fn price_level_requires_quantity() {
        let result = serde_json::from_value::<PriceLevel>(json!(["4.0"]));

        assert!(result.is_err(), "a level without quantity must not decode");
    }

    #[test]
    fn agg_trade_uses_single_letter_keys() -> serde_json::Result<()> {
        let trade: AggTrade = serde_json::from_value(json!({
            "a": 26_129,
            "p": "0.01633102",
            "q": "4.70443515",
            "f": 27_781,
            "l": 27_781,
            "T": 1_498_793_709_153_i64,
            "m": true,
            "M": true
        }))?;

        assert_eq!(trade.id, 26_129);
        assert_eq!(trade.price, dec!(0.01633102));
        assert_eq!(trade.time, 1_498_793_709_153);
        assert!(trade.is_buyer_maker);

        Ok(())
    }

    #[test]
    fn new_order_response_without_fills_should_succeed() -> serde_json::Result<()> {
        let response: NewOrderResponse = serde_json::from_value(json!({
            "symbol": "BTCUSDT",
            "orderId": 28,
            "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
            "transactTime": 1_507_725_176_595_i64,
            "price": "0.00000000",
            "origQty": "10.00000000",
            "executedQty": "10.00000000",
            "status": "FILLED",
            "timeInForce": "GTC",
            "type": "MARKET",
            "side": "SELL"
        }))?;

        assert_eq!(response.order_id, 28);
        assert_eq!(response.status, OrderStatus::Filled);
        assert_eq!(response.order_type, OrderType::Market);
        assert!(response.fills.is_empty());

        Ok(())
    }
}
