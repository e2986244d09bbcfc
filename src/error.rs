//! Error types for header parsing and key transcoding.

use thiserror::Error;

/// Errors from challenge decomposition and SPKI transcoding.
///
/// The challenge-list matcher never produces an [`Error`]: a header that
/// violates the grammar yields an empty result instead.
#[derive(Debug, Error)]
pub enum Error {
	/// DER input did not match the expected SubjectPublicKeyInfo shape.
	#[error("malformed SubjectPublicKeyInfo: {0}")]
	Spki(#[from] der::Error),

	/// A challenge fragment violates the RFC 9110 challenge grammar.
	#[error("malformed challenge: {0:?}")]
	MalformedChallenge(String),

	/// An auth-param value failed to decode.
	#[error("invalid {name} value: {reason}")]
	InvalidParam {
		/// Name of the offending auth-param.
		name: &'static str,
		/// What went wrong while decoding its value.
		reason: String,
	},

	/// A required auth-param was missing from a challenge.
	#[error("missing auth param: {0}")]
	MissingParam(&'static str),

	/// The challenge used an auth scheme this parser was not asked for.
	#[error("unexpected auth scheme: {0}")]
	UnexpectedScheme(String),
}

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
