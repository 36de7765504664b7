#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Deeply nested uses in sub-modules are falsely flagged as being unused"
)]

use binance_rest_sdk::auth::Credentials;
use binance_rest_sdk::auth::state::Authenticated;
use binance_rest_sdk::spot::{Client, Config};
use hmac::{Hmac, Mac as _};
use httpmock::{Mock, MockServer};
use reqwest::StatusCode;
use serde_json::json;
use sha2::Sha256;

pub const API_KEY: &str = "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A";
pub const SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// What the mocked exchange reports as its time.
pub const SERVER_MILLIS: i64 = 1_700_000_000_000;
/// What [`local_clock`] reports, 1.5 seconds ahead of the exchange.
pub const LOCAL_MILLIS: i64 = 1_700_000_001_500;
pub const OFFSET: i64 = LOCAL_MILLIS - SERVER_MILLIS;

pub type TestClient = Client<Authenticated>;

#[must_use]
pub fn local_clock() -> i64 {
    LOCAL_MILLIS
}

/// A [`Config`] whose clock is frozen at [`LOCAL_MILLIS`].
#[must_use]
pub fn config() -> Config {
    Config::builder().clock(local_clock).build()
}

/// The API root as a real deployment would configure it, without a trailing slash.
#[must_use]
pub fn host(server: &MockServer) -> String {
    server.url("/api")
}

pub fn create_unauthenticated(server: &MockServer) -> anyhow::Result<Client> {
    Ok(Client::new(&host(server), config())?)
}

pub fn create_authenticated(server: &MockServer) -> anyhow::Result<TestClient> {
    let credentials = Credentials::new(API_KEY.to_owned(), SECRET.to_owned());

    Ok(create_unauthenticated(server)?.authenticate(credentials))
}

pub fn mock_server_time(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/api/v1/time")
            .query_param_missing("timestamp");
        then.status(StatusCode::OK)
            .json_body(json!({ "serverTime": SERVER_MILLIS }));
    })
}

/// Hex HMAC-SHA256 of `query` under [`SECRET`], computed independently of the client.
#[must_use]
pub fn signature(query: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(query.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// `query` followed by the signature the client is expected to append to it.
#[must_use]
pub fn signed(query: &str) -> String {
    format!("{query}&signature={}", signature(query))
}

/// The `timestamp` and `recvWindow` pair a client built from [`config`] sends once synchronized.
#[must_use]
pub fn timing() -> String {
    format!("timestamp={SERVER_MILLIS}&recvWindow=10000")
}
