#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod error;
pub(crate) mod serde_helpers;
pub mod spot;
pub mod types;

use reqwest::header::HeaderMap;
use reqwest::Request;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Default host for the Binance spot REST API. Endpoint paths such as `v3/account` are appended
/// to it.
pub const DEFAULT_HOST: &str = "https://api.binance.com/api/";

/// Environment variable holding the API key read by [`auth::Credentials::from_env`].
pub const API_KEY_VAR: &str = "BINANCE_API_KEY";

/// Environment variable holding the API secret read by [`auth::Credentials::from_env`].
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";

/// Timestamp in milliseconds since [`std::time::UNIX_EPOCH`]
pub type Timestamp = i64;

/// Trait for converting request types to a URL-encoded parameter string.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields, in declaration order, into
/// `key=value` pairs joined by `&`. The exchange verifies signatures over this exact string, so
/// field order is part of the wire contract.
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL-encoded string without a leading `?`.
    ///
    /// Returns an empty string if no parameters are set.
    fn query_string(&self) -> Result<String> {
        Ok(serde_html_form::to_string(self)?)
    }
}

impl<T: Serialize> ToQueryParams for T {}

#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request, headers),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    if let Some(h) = headers {
        request.headers_mut().extend(h);
    }

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let body = response.text().await?;

    let decoded = serde_helpers::decode(&body);

    #[cfg(feature = "tracing")]
    if let Err(e) = &decoded {
        tracing::warn!(method = %method, path = %path, error = %e, "undecodable API response");
    }

    decoded
}
