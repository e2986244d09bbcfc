//! HTTP authentication primitives for Privacy Pass.
//!
//! Implements the two grammar-heavy building blocks of the `PrivateToken`
//! auth scheme ([RFC 9577]): parsing and formatting of `WWW-Authenticate`
//! challenge lists per [RFC 9110 Section 11.6.1], and re-tagging of RSA
//! public keys between the RSASSA-PSS and rsaEncryption
//! SubjectPublicKeyInfo encodings ([RFC 4055]), which is required because
//! common crypto APIs refuse PSS-tagged keys at import and export.
//!
//! # Components
//!
//! - [`parse_www_authenticate`] / [`parse_www_authenticate_relaxed`]:
//!   split a raw header value into challenge fragments, all-or-nothing
//! - [`format_www_authenticate`]: render a scheme plus auth-params back
//!   into a header value
//! - [`ParsedChallenge`] / [`PrivateToken`]: decompose a fragment into
//!   scheme, auth-params and Privacy Pass challenge fields
//! - [`pss_to_encryption`] / [`encryption_to_pss`]: swap the SPKI
//!   AlgorithmIdentifier while carrying the key bits over unchanged
//!
//! # Example Flow
//!
//! ```text
//! Origin                        Client                       Crypto API
//!    |                            |                              |
//!    |-- 401 WWW-Authenticate --->|                              |
//!    |                     [parse challenges]                    |
//!    |                     [extract token-key]                   |
//!    |                            |-- pss_to_encryption -------->|
//!    |                            |<------------- imported key --|
//!    |<-- Authorization: token ---|                              |
//! ```
//!
//! # Example
//!
//! ```
//! use privacypass_auth::{format_www_authenticate, parse_www_authenticate};
//!
//! let header = format_www_authenticate(
//! 	"PrivateToken",
//! 	Some(&[("challenge", "YWJj".into()), ("token-key", "MTIz".into())]),
//! 	true,
//! );
//! assert_eq!(header, r#"PrivateToken challenge="YWJj",token-key="MTIz""#);
//! assert_eq!(parse_www_authenticate(&header), [header.as_str()]);
//! ```
//!
//! All operations are synchronous pure functions without shared state; they
//! are safe to call concurrently from any number of threads.
//!
//! [RFC 9577]: https://www.rfc-editor.org/rfc/rfc9577
//! [RFC 9110 Section 11.6.1]: https://www.rfc-editor.org/rfc/rfc9110#section-11.6.1
//! [RFC 4055]: https://www.rfc-editor.org/rfc/rfc4055

mod authenticate;
mod challenge;
mod error;
mod key;
mod util;

pub use authenticate::*;
pub use challenge::*;
pub use error::*;
pub use key::*;
pub use util::*;

/// Header carrying token challenges, per RFC 9577 Section 2.1.
pub const WWW_AUTHENTICATE: &str = "WWW-Authenticate";

/// Header carrying redeemed tokens, per RFC 9577 Section 2.2.
pub const AUTHORIZATION: &str = "Authorization";
