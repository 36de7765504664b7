//! Binance spot REST API client and types.
//!
//! This module provides a [`Client`] for the public market-data endpoints and, once elevated with
//! [`Client::authenticate`], for the signed account and trading endpoints.
//!
//! # Overview
//!
//! Every method issues a single HTTP round trip. The one exception is the first call that needs a
//! timestamp: it first asks the exchange for its time and caches the difference to the local
//! clock. That offset is computed once per client and never refreshed.
//!
//! ## Available Endpoints
//!
//! | Endpoint | Method | Auth | Description |
//! |----------|--------|------|-------------|
//! | `v1/ping` | GET | none | Connectivity check |
//! | `v1/time` | GET | none | Exchange server time |
//! | `v1/exchangeInfo` | GET | none | Trading rules and symbols |
//! | `v1/depth` | GET | none | Order book |
//! | `v1/trades` | GET | none | Recent trades |
//! | `v1/aggTrades` | GET | none | Compressed trades |
//! | `v1/klines` | GET | none | Candlesticks |
//! | `v1/ticker/24hr` | GET | none | 24 hour rolling statistics |
//! | `v3/ticker/price` | GET | none | Latest price |
//! | `v3/ticker/bookTicker` | GET | none | Best bid and ask |
//! | `v3/account` | GET | signed | Account information and balances |
//! | `v3/myTrades` | GET | signed | Account trades for a symbol |
//! | `v3/openOrders` | GET | signed | Open orders |
//! | `v3/allOrders` | GET | signed | All orders for a symbol |
//! | `v3/order` | GET / POST / DELETE | signed | Query, place, or cancel an order |
//! | `v3/order/test` | POST | signed | Validate an order without placing it |
//!
//! # Example
//!
//! ```no_run
//! use binance_rest_sdk::auth::Credentials;
//! use binance_rest_sdk::spot::Client;
//! use binance_rest_sdk::types::dec;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::default();
//! let price = client.price("BNBBTC").await?;
//! println!("{}: {}", price.symbol, price.price);
//!
//! let client = client.authenticate(Credentials::from_env()?);
//! for balance in client.balances().await? {
//!     println!("{}: {} free, {} locked", balance.asset, balance.free, balance.locked);
//! }
//!
//! let order = client.limit_buy("BNBBTC", dec!(10), dec!(0.0015)).await?;
//! println!("{order:?}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoint;
pub mod types;

pub use client::{Client, Config};
