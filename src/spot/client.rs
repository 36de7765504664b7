use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;
use url::Url;

use crate::auth::state::{Authenticated, State, Unauthenticated};
use crate::auth::{API_KEY_HEADER, Credentials};
use crate::error::Error;
use crate::serde_helpers::take_field;
use crate::spot::endpoint;
use crate::spot::types::request::{NoParams, OpenOrdersRequest, SymbolRequest};
use crate::spot::types::{
    AccountInfo, AccountTrade, AggTrade, AggTradesRequest, AllOrdersRequest, Balance, BookTicker,
    CancelOrderRequest, CancelOrderResponse, DepthRequest, ExchangeInfo, Kline, KlinesRequest,
    MyTradesRequest, NewOrderResponse, Order, OrderBook, OrderRequest, OrderResponse,
    OrderStatusRequest, OrderType, PriceResponse, RecentTradesRequest, ServerTimeResponse, Side,
    SymbolInfo, Ticker24hr, Trade,
};
use crate::types::Decimal;
use crate::{DEFAULT_HOST, Result, Timestamp, ToQueryParams as _, auth};

/// Default tolerance, in milliseconds, sent as `recvWindow` on time-sensitive requests.
pub const DEFAULT_RECV_WINDOW: u64 = 10_000;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

fn local_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Configuration for [`Client`]
///
/// ```
/// use std::time::Duration;
///
/// use binance_rest_sdk::spot::Config;
///
/// let config = Config::builder()
///     .recv_window(5_000)
///     .timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(config.recv_window(), 5_000);
/// ```
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// Milliseconds after `timestamp` during which the exchange still accepts the request.
    #[builder(default = DEFAULT_RECV_WINDOW)]
    recv_window: u64,
    #[builder(default = Duration::from_secs(20))]
    connect_timeout: Duration,
    /// Bound on the whole request, from connecting until the body has been read.
    #[builder(default = Duration::from_secs(300))]
    timeout: Duration,
    /// Only turn this off to talk to a local proxy with a self-signed certificate.
    #[builder(default = true)]
    verify_tls: bool,
    /// Source of the local time in epoch milliseconds. Both the clock offset and every request
    /// timestamp are derived from it.
    #[builder(default = local_millis as fn() -> i64)]
    clock: fn() -> i64,
}

impl Config {
    #[must_use]
    pub fn recv_window(&self) -> u64 {
        self.recv_window
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Client for the Binance spot REST API.
///
/// The client is generic over its authentication [`State`]. A [`Client<Unauthenticated>`] only
/// exposes public market data; [`Client::authenticate`] turns it into a
/// [`Client<Authenticated>`], which adds the signed account and trading endpoints.
///
/// [`Client`] is cheap to clone and thread-safe. Clones, and clients obtained through
/// [`Client::authenticate`], share the HTTP connection pool and the clock offset.
///
/// ```rust,no_run
/// use binance_rest_sdk::Result;
/// use binance_rest_sdk::spot::{Client, Config};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let client = Client::new("https://api.binance.com/api", Config::default())?;
///
///     let ticker = client.ticker_24hr("BNBBTC").await?;
///     println!("Last price: {}", ticker.last_price);
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Client<S: State = Unauthenticated> {
    inner: Arc<ClientInner<S>>,
}

impl Default for Client<Unauthenticated> {
    fn default() -> Self {
        Client::new(DEFAULT_HOST, Config::default())
            .expect("Client with default endpoint should succeed")
    }
}

#[derive(Debug)]
struct ClientInner<S: State> {
    config: Config,
    /// The current [`State`] of this client
    state: S,
    /// The [`Url`] endpoint paths are appended to. Always ends with `/`.
    host: Url,
    client: ReqwestClient,
    /// Local clock minus server clock, in milliseconds. Set at most once, and shared with every
    /// client authenticated from this one.
    clock_offset: Arc<OnceCell<i64>>,
}

impl<S: State> ClientInner<S> {
    /// Asks the exchange for its time and compares it to the local clock read right after the
    /// response arrived.
    async fn measure_clock_offset(&self) -> Result<i64> {
        let request = self
            .client
            .request(Method::GET, self.url(endpoint::SERVER_TIME, ""))
            .build()?;

        let response: ServerTimeResponse = crate::request(&self.client, request, None).await?;
        let offset = (self.config.clock)() - response.server_time;

        #[cfg(feature = "tracing")]
        tracing::info!(
            offset_ms = offset,
            server_time = response.server_time,
            "synchronized clock with exchange"
        );

        Ok(offset)
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{path}", self.host)
        } else {
            format!("{}{path}?{query}", self.host)
        }
    }

    /// Appends `timestamp` and `recvWindow` to `query` using an already synchronized `offset`.
    fn with_timestamp(&self, query: &str, offset: i64) -> String {
        let timestamp: Timestamp = (self.config.clock)() - offset;
        let recv_window = self.config.recv_window;
        let separator = if query.is_empty() { "" } else { "&" };

        format!("{query}{separator}timestamp={timestamp}&recvWindow={recv_window}")
    }
}

impl<S: State> Client<S> {
    /// Returns the host every endpoint path is appended to.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use binance_rest_sdk::spot::{Client, Config};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new("https://api.binance.com/api", Config::default())?;
    /// assert_eq!(client.host().as_str(), "https://api.binance.com/api/");
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.inner.host
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns the cached clock offset, if a synchronization has completed.
    #[must_use]
    pub fn clock_offset(&self) -> Option<i64> {
        self.inner.clock_offset.get().copied()
    }

    /// Computes the clock offset against the exchange, or returns the cached one.
    ///
    /// Only the first successful call issues a request. Concurrent first callers wait on that
    /// single request and all observe its result. A failed attempt leaves nothing cached, so the
    /// next call tries again.
    ///
    /// # Errors
    ///
    /// Returns an error if the server time request fails.
    pub async fn sync_clock(&self) -> Result<i64> {
        self.inner
            .clock_offset
            .get_or_try_init(|| self.inner.measure_clock_offset())
            .await
            .copied()
    }

    /// Sends an unsigned request and decodes the response.
    ///
    /// `params` are URL-encoded in declaration order. For `GET` and `DELETE` they form the query
    /// string; for `POST` and `PUT` they are sent as a form-encoded body. Paths outside the
    /// time-exempt set also get `timestamp` and `recvWindow`, which synchronizes the clock first
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be encoded, the request fails, the exchange
    /// answers with a non-success status or the body cannot be decoded into `Response`.
    pub async fn public_request<Params, Response>(
        &self,
        method: Method,
        path: &str,
        params: &Params,
    ) -> Result<Response>
    where
        Params: Serialize,
        Response: DeserializeOwned,
    {
        let mut query = params.query_string()?;
        if !endpoint::is_time_exempt(path) {
            let offset = self.sync_clock().await?;
            query = self.inner.with_timestamp(&query, offset);
        }

        let request = if method == Method::POST || method == Method::PUT {
            self.client()
                .request(method, self.inner.url(path, ""))
                .header(CONTENT_TYPE, FORM_URLENCODED)
                .body(query)
                .build()?
        } else {
            self.client()
                .request(method, self.inner.url(path, &query))
                .build()?
        };

        crate::request(self.client(), request, None).await
    }

    /// Checks that the REST API is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn ping(&self) -> Result<()> {
        let _: Value = self.public_request(Method::GET, endpoint::PING, &NoParams {}).await?;

        Ok(())
    }

    /// Returns the exchange time in milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn server_time(&self) -> Result<Timestamp> {
        let response: ServerTimeResponse = self
            .public_request(Method::GET, endpoint::SERVER_TIME, &NoParams {})
            .await?;

        Ok(response.server_time)
    }

    /// Returns rolling 24 hour statistics for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the symbol is unknown to the exchange.
    pub async fn ticker_24hr(&self, symbol: &str) -> Result<Ticker24hr> {
        self.public_request(Method::GET, endpoint::TICKER_24HR, &SymbolRequest { symbol })
            .await
    }

    /// Returns the latest price of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the symbol is unknown to the exchange.
    pub async fn price(&self, symbol: &str) -> Result<PriceResponse> {
        self.public_request(Method::GET, endpoint::TICKER_PRICE, &SymbolRequest { symbol })
            .await
    }

    /// Returns the latest price of every symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn prices(&self) -> Result<Vec<PriceResponse>> {
        self.public_request(Method::GET, endpoint::TICKER_PRICE, &NoParams {})
            .await
    }

    /// Returns the best bid and ask of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the symbol is unknown to the exchange.
    pub async fn book_ticker(&self, symbol: &str) -> Result<BookTicker> {
        self.public_request(Method::GET, endpoint::BOOK_TICKER, &SymbolRequest { symbol })
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.public_request(Method::GET, endpoint::EXCHANGE_INFO, &NoParams {})
            .await
    }

    /// Returns the trading rules of every listed symbol, without the exchange info envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or [`crate::error::Kind::MissingField`] if the
    /// response has no `symbols` field.
    pub async fn markets(&self) -> Result<Vec<SymbolInfo>> {
        let value: Value = self
            .public_request(Method::GET, endpoint::EXCHANGE_INFO, &NoParams {})
            .await?;

        take_field(value, "symbols", endpoint::EXCHANGE_INFO)
    }

    /// Returns candlesticks, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn klines(&self, request: &KlinesRequest) -> Result<Vec<Kline>> {
        self.public_request(Method::GET, endpoint::KLINES, request)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or `limit` is not one the exchange accepts.
    pub async fn depth(&self, request: &DepthRequest) -> Result<OrderBook> {
        self.public_request(Method::GET, endpoint::DEPTH, request)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn recent_trades(&self, request: &RecentTradesRequest) -> Result<Vec<Trade>> {
        self.public_request(Method::GET, endpoint::TRADES, request)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn agg_trades(&self, request: &AggTradesRequest) -> Result<Vec<AggTrade>> {
        self.public_request(Method::GET, endpoint::AGG_TRADES, request)
            .await
    }

    fn client(&self) -> &ReqwestClient {
        &self.inner.client
    }
}

impl Client<Unauthenticated> {
    /// Creates a new client for the public endpoints.
    ///
    /// `host` is the API root, e.g. <https://api.binance.com/api>. A missing trailing `/` is
    /// added, so endpoint paths extend the host instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid or the HTTP client cannot be initialized.
    pub fn new(host: &str, config: Config) -> Result<Client<Unauthenticated>> {
        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_static("binance_rest_sdk"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = ReqwestClient::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .tls_danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        let host = if host.ends_with('/') {
            Url::parse(host)?
        } else {
            Url::parse(&format!("{host}/"))?
        };

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                state: Unauthenticated,
                host,
                client,
                clock_offset: Arc::new(OnceCell::new()),
            }),
        })
    }

    /// Elevates this client to one that signs its requests with `credentials`.
    ///
    /// The connection pool and configuration carry over, and both clients share one clock offset:
    /// whichever synchronizes first, the other reuses the result.
    ///
    /// ```no_run
    /// use binance_rest_sdk::auth::Credentials;
    /// use binance_rest_sdk::spot::Client;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::default().authenticate(Credentials::from_env()?);
    /// let account = client.account().await?;
    /// println!("Can trade: {}", account.can_trade);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn authenticate(&self, credentials: Credentials) -> Client<Authenticated> {
        let inner = &self.inner;

        Client {
            inner: Arc::new(ClientInner {
                config: inner.config.clone(),
                state: Authenticated { credentials },
                host: inner.host.clone(),
                client: inner.client.clone(),
                clock_offset: Arc::clone(&inner.clock_offset),
            }),
        }
    }
}

impl Client<Authenticated> {
    /// Returns the API key requests are sent with.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.inner.state.credentials.key()
    }

    /// Sends a signed request and decodes the response.
    ///
    /// The clock is synchronized first if it has not been yet. Unless `path` is time-exempt,
    /// `timestamp` and `recvWindow` are appended to the encoded `params`, and the whole query
    /// string is signed with HMAC-SHA256. The signed query always travels in the URL, whatever the
    /// method, along with the `X-MBX-APIKEY` header.
    ///
    /// # Errors
    ///
    /// Returns an error if synchronization fails, the parameters cannot be encoded, the request
    /// fails, the exchange answers with a non-success status or the body cannot be decoded into
    /// `Response`.
    pub async fn signed_request<Params, Response>(
        &self,
        method: Method,
        path: &str,
        params: &Params,
    ) -> Result<Response>
    where
        Params: Serialize,
        Response: DeserializeOwned,
    {
        let offset = self.sync_clock().await?;

        let mut query = params.query_string()?;
        if !endpoint::is_time_exempt(path) {
            query = self.inner.with_timestamp(&query, offset);
        }

        let credentials = &self.inner.state.credentials;
        let signed = auth::sign_query(credentials, &query)?;

        let request = self
            .client()
            .request(method, self.inner.url(path, &signed))
            .build()?;

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(credentials.key())?);

        crate::request(self.client(), request, Some(headers)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    pub async fn account(&self) -> Result<AccountInfo> {
        self.signed_request(Method::GET, endpoint::ACCOUNT, &NoParams {})
            .await
    }

    /// Returns the balance of every asset on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or [`crate::error::Kind::MissingField`] if the
    /// account response has no `balances` field.
    pub async fn balances(&self) -> Result<Vec<Balance>> {
        let value: Value = self
            .signed_request(Method::GET, endpoint::ACCOUNT, &NoParams {})
            .await?;

        take_field(value, "balances", endpoint::ACCOUNT)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn my_trades(&self, request: &MyTradesRequest) -> Result<Vec<AccountTrade>> {
        self.signed_request(Method::GET, endpoint::MY_TRADES, request)
            .await
    }

    /// Returns the open orders of `symbol`, or of every symbol when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn open_orders(&self, symbol: Option<&str>) -> Result<Vec<Order>> {
        self.signed_request(
            Method::GET,
            endpoint::OPEN_ORDERS,
            &OpenOrdersRequest { symbol },
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn all_orders(&self, request: &AllOrdersRequest) -> Result<Vec<Order>> {
        self.signed_request(Method::GET, endpoint::ALL_ORDERS, request)
            .await
    }

    /// Looks up a single order.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::Validation`] error if neither `order_id` nor
    /// `orig_client_order_id` is set, otherwise an error if the request fails.
    pub async fn order_status(&self, request: &OrderStatusRequest) -> Result<Order> {
        if request.order_id.is_none() && request.orig_client_order_id.is_none() {
            return Err(Error::validation(
                "either order_id or orig_client_order_id is required to look up an order",
            ));
        }

        self.signed_request(Method::GET, endpoint::ORDER, request)
            .await
    }

    /// Cancels an active order.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::Validation`] error if neither `order_id` nor
    /// `orig_client_order_id` is set, otherwise an error if the request fails.
    pub async fn cancel_order(&self, request: &CancelOrderRequest) -> Result<CancelOrderResponse> {
        if request.order_id.is_none() && request.orig_client_order_id.is_none() {
            return Err(Error::validation(
                "either order_id or orig_client_order_id is required to cancel an order",
            ));
        }

        self.signed_request(Method::DELETE, endpoint::ORDER, request)
            .await
    }

    /// Places `order`, or only validates it when [`OrderRequest::test_mode`] is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the exchange rejects the order.
    pub async fn trade(&self, order: &OrderRequest) -> Result<OrderResponse> {
        if order.test_mode {
            let _: Value = self
                .signed_request(Method::POST, endpoint::ORDER_TEST, order)
                .await?;

            return Ok(OrderResponse::Tested);
        }

        let placed: NewOrderResponse = self
            .signed_request(Method::POST, endpoint::ORDER, order)
            .await?;

        Ok(OrderResponse::Placed(placed))
    }

    /// Buys `quantity` of `symbol` at the best available price.
    ///
    /// # Errors
    ///
    /// See [`Self::trade`].
    pub async fn market_buy(&self, symbol: &str, quantity: Decimal) -> Result<OrderResponse> {
        self.trade(&order(symbol, Side::Buy, OrderType::Market, quantity, None))
            .await
    }

    /// Sells `quantity` of `symbol` at the best available price.
    ///
    /// # Errors
    ///
    /// See [`Self::trade`].
    pub async fn market_sell(&self, symbol: &str, quantity: Decimal) -> Result<OrderResponse> {
        self.trade(&order(symbol, Side::Sell, OrderType::Market, quantity, None))
            .await
    }

    /// Places a limit buy of `quantity` at `price`. The price is sent exactly as given.
    ///
    /// # Errors
    ///
    /// See [`Self::trade`].
    pub async fn limit_buy(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderResponse> {
        self.trade(&order(
            symbol,
            Side::Buy,
            OrderType::Limit,
            quantity,
            Some(price),
        ))
        .await
    }

    /// Places a limit sell of `quantity` at `price`. The price is sent exactly as given.
    ///
    /// # Errors
    ///
    /// See [`Self::trade`].
    pub async fn limit_sell(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderResponse> {
        self.trade(&order(
            symbol,
            Side::Sell,
            OrderType::Limit,
            quantity,
            Some(price),
        ))
        .await
    }
}

fn order(
    symbol: &str,
    side: Side,
    order_type: OrderType,
    quantity: Decimal,
    price: Option<Decimal>,
) -> OrderRequest {
    OrderRequest::builder()
        .symbol(symbol)
        .side(side)
        .order_type(order_type)
        .quantity(quantity)
        .maybe_price(price)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dec;

    #[test]
    fn client_default_should_succeed() {
        let client = Client::default();

        assert_eq!(client.host().as_str(), DEFAULT_HOST);
        assert_eq!(client.clock_offset(), None);
    }

    #[test]
    fn host_gets_trailing_slash() -> Result<()> {
        let client = Client::new("https://testnet.binance.vision/api", Config::default())?;

        assert_eq!(client.host().as_str(), "https://testnet.binance.vision/api/");
        assert_eq!(
            client.inner.url(endpoint::ACCOUNT, ""),
            "https://testnet.binance.vision/api/v3/account"
        );

        Ok(())
    }

    #[test]
    fn invalid_host_is_validation_error() {
        let err = Client::new("not a url", Config::default()).unwrap_err();

        assert_eq!(err.kind(), crate::error::Kind::Validation);
    }

    #[test]
    fn config_defaults() {
        let config = Config::default();

        assert_eq!(config.recv_window, 10_000);
        assert_eq!(config.connect_timeout, Duration::from_secs(20));
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(config.verify_tls);
    }

    #[test]
    fn timestamp_subtracts_offset() {
        let config = Config::builder().clock(|| 1_000_000).recv_window(5_000).build();
        let client = Client::new(DEFAULT_HOST, config).expect("valid host");

        assert_eq!(
            client.inner.with_timestamp("", 250),
            "timestamp=999750&recvWindow=5000"
        );
        assert_eq!(
            client.inner.with_timestamp("symbol=BNBBTC", -250),
            "symbol=BNBBTC&timestamp=1000250&recvWindow=5000"
        );
    }

    #[test]
    fn shortcuts_pin_type_and_price() {
        let market = order("BNBBTC", Side::Buy, OrderType::Market, dec!(1), None);
        assert_eq!(market.order_type, OrderType::Market);
        assert_eq!(market.price, None);
        assert!(!market.test_mode);

        let limit = order(
            "BNBBTC",
            Side::Sell,
            OrderType::Limit,
            dec!(10),
            Some(dec!(1.50)),
        );
        assert_eq!(limit.side, Side::Sell);
        assert_eq!(limit.price, Some(dec!(1.50)));
    }

    #[test]
    fn authenticate_keeps_host_and_offset() -> Result<()> {
        let client = Client::new("http://localhost:8080/api", Config::default())?;
        let authenticated = client.authenticate(Credentials::new(
            "key".to_owned(),
            "secret".to_owned(),
        ));

        assert_eq!(authenticated.host(), client.host());
        assert_eq!(authenticated.api_key(), "key");
        assert_eq!(authenticated.clock_offset(), None);

        Ok(())
    }

    #[test]
    fn authenticated_client_shares_offset_with_parent() -> Result<()> {
        let client = Client::new("http://localhost:8080/api", Config::default())?;
        let authenticated = client.authenticate(Credentials::new(
            "key".to_owned(),
            "secret".to_owned(),
        ));

        authenticated.inner.clock_offset.set(1_500).expect("unset");

        assert_eq!(client.clock_offset(), Some(1_500));
        assert_eq!(client.clone().clock_offset(), Some(1_500));

        Ok(())
    }
}
