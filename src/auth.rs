use std::fmt;

use hmac::{Hmac, Mac as _};
/// Secret string types that redact values in debug output for security.
pub use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::error::Error;
use crate::{API_KEY_VAR, API_SECRET_VAR, Result};

/// Header carrying the API key on every signed request.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Query parameter carrying the hex-encoded HMAC-SHA256 signature.
pub(crate) const SIGNATURE_PARAM: &str = "signature";

/// API key and secret used to sign requests. The `secret` is only ever used as the HMAC key; it
/// never leaves the process and is redacted from [`fmt::Debug`] output.
#[derive(Clone)]
pub struct Credentials {
    pub(crate) key: String,
    pub(crate) secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(key: String, secret: String) -> Self {
        Self {
            key,
            secret: SecretString::from(secret),
        }
    }

    /// Reads the key from [`API_KEY_VAR`] and the secret from [`API_SECRET_VAR`].
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_VAR)
            .map_err(|e| Error::validation(format!("{API_KEY_VAR} is not usable: {e}")))?;
        let secret = std::env::var(API_SECRET_VAR)
            .map_err(|e| Error::validation(format!("{API_SECRET_VAR} is not usable: {e}")))?;

        Ok(Self::new(key, secret))
    }

    /// Returns the API key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the secret.
    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    /// Hex-encoded HMAC-SHA256 signature of `payload`, as the exchange expects in the `signature`
    /// parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret cannot be used as an HMAC key.
    pub fn sign(&self, payload: &str) -> Result<String> {
        hmac(&self.secret, payload)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &self.secret)
            .finish()
    }
}

/// Each client can exist in one state at a time, i.e. [`state::Unauthenticated`] or
/// [`state::Authenticated`].
pub mod state {
    use crate::auth::Credentials;

    /// The initial state of the client. Only public market-data endpoints are reachable.
    #[non_exhaustive]
    #[derive(Clone, Debug)]
    pub struct Unauthenticated;

    /// The elevated state of the client, obtained through
    /// [`crate::spot::Client::authenticate`]. Signed account and trading endpoints are reachable.
    #[non_exhaustive]
    #[derive(Clone, Debug)]
    pub struct Authenticated {
        /// The [`Credentials`]'s `secret` signs every query string sent to a signed endpoint.
        pub(crate) credentials: Credentials,
    }

    /// The client state can only be [`Unauthenticated`] or [`Authenticated`].
    pub trait State: sealed::Sealed + Send + Sync + 'static {}

    impl State for Unauthenticated {}
    impl sealed::Sealed for Unauthenticated {}

    impl State for Authenticated {}
    impl sealed::Sealed for Authenticated {}

    mod sealed {
        pub trait Sealed {}
    }
}

/// Hex-encoded HMAC-SHA256 of `message` keyed with `secret`.
pub(crate) fn hmac(secret: &SecretString, message: &str) -> Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.expose_secret().as_bytes())?;
    mac.update(message.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Signs `query` and returns it with `signature=<hex>` appended, ready to be placed after the `?`
/// of a request URL.
pub(crate) fn sign_query(credentials: &Credentials, query: &str) -> Result<String> {
    let signature = credentials.sign(query)?;

    if query.is_empty() {
        Ok(format!("{SIGNATURE_PARAM}={signature}"))
    } else {
        Ok(format!("{query}&{SIGNATURE_PARAM}={signature}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Published example from the Binance spot API documentation
    const DOC_KEY: &str = "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A";
    const DOC_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
    const DOC_QUERY: &str = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
    const DOC_SIGNATURE: &str = "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71";

    #[test]
    fn hmac_matches_documented_vector() -> Result<()> {
        let signature = hmac(&SecretString::from(DOC_SECRET.to_owned()), DOC_QUERY)?;

        assert_eq!(signature, DOC_SIGNATURE);

        Ok(())
    }

    #[test]
    fn hmac_is_deterministic() -> Result<()> {
        let secret = SecretString::from("secret".to_owned());

        assert_eq!(
            hmac(&secret, "symbol=BNBBTC&timestamp=1")?,
            hmac(&secret, "symbol=BNBBTC&timestamp=1")?
        );
        assert_ne!(
            hmac(&secret, "symbol=BNBBTC&timestamp=1")?,
            hmac(&secret, "timestamp=1&symbol=BNBBTC")?
        );

        Ok(())
    }

    #[test]
    fn credentials_sign_matches_documented_vector() -> Result<()> {
        let credentials = Credentials::new(DOC_KEY.to_owned(), DOC_SECRET.to_owned());

        assert_eq!(credentials.sign(DOC_QUERY)?, DOC_SIGNATURE);

        Ok(())
    }

    #[test]
    fn sign_query_appends_signature() -> Result<()> {
        let credentials = Credentials::new(DOC_KEY.to_owned(), DOC_SECRET.to_owned());

        let signed = sign_query(&credentials, DOC_QUERY)?;

        assert_eq!(signed, format!("{DOC_QUERY}&signature={DOC_SIGNATURE}"));

        Ok(())
    }

    #[test]
    fn sign_query_without_params_has_no_leading_ampersand() -> Result<()> {
        let credentials = Credentials::new("key".to_owned(), "secret".to_owned());

        let signed = sign_query(&credentials, "")?;

        assert!(signed.starts_with("signature="));
        assert_eq!(signed.len(), "signature=".len() + 64);

        Ok(())
    }

    #[test]
    fn credentials_key_returns_api_key() {
        let credentials = Credentials::new(DOC_KEY.to_owned(), DOC_SECRET.to_owned());
        assert_eq!(credentials.key(), DOC_KEY);
        assert_eq!(credentials.secret().expose_secret(), DOC_SECRET);
    }

    #[test]
    fn debug_does_not_expose_secrets() {
        let secret_value = "my_super_secret_value_12345";
        let credentials = Credentials::new("public-key".to_owned(), secret_value.to_owned());

        let debug_output = format!("{credentials:?}");

        assert!(
            !debug_output.contains(secret_value),
            "Debug output should NOT contain the secret value. Got: {debug_output}"
        );
        assert!(debug_output.contains("public-key"));
    }
}
