//! Re-exported types from external crates for convenience.
//!
//! These types are commonly used in this SDK and are re-exported here
//! so users don't need to add these dependencies to their `Cargo.toml`.

/// Date and time types for converting millisecond timestamps in API responses.
pub use chrono::{DateTime, Utc};
/// Arbitrary precision decimal type for prices, quantities, and balances.
///
/// The scale of a [`Decimal`] is preserved on the wire, so `1.50` is sent as `1.50`.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use binance_rest_sdk::types::dec;
/// let price = dec!(1.50);
/// assert_eq!(price.to_string(), "1.50");
/// ```
pub use rust_decimal_macros::dec;
