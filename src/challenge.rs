//! Challenge decomposition for the `PrivateToken` auth scheme.
//!
//! The challenge-list parser in [`crate::parse_www_authenticate`] yields
//! raw fragments; this module splits one fragment into its scheme and
//! auth-params and extracts the fields of a Privacy Pass challenge
//! ([RFC 9577 Section 2.1]): the serialized TokenChallenge, the issuer
//! public key and the optional `max-age`. Both byte fields stay opaque
//! here; interpreting the TokenChallenge structure or the key material is
//! the token layer's job.
//!
//! [RFC 9577 Section 2.1]: https://www.rfc-editor.org/rfc/rfc9577#section-2.1

use std::borrow::Cow;

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::authenticate::{parse_www_authenticate_relaxed, scan_single_challenge};
use crate::{AuthParamValue, Error, format_www_authenticate};

/// One auth-param of a parsed challenge, with its value unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParam<'a> {
	name: &'a str,
	value: Cow<'a, str>,
}

impl<'a> AuthParam<'a> {
	/// Parameter name, as written in the header.
	pub fn name(&self) -> &'a str {
		self.name
	}

	/// Parameter value. Quoted-string values have their surrounding quotes
	/// stripped and quoted-pair escapes resolved.
	pub fn value(&self) -> &str {
		&self.value
	}
}

/// A single challenge split into scheme and auth-params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChallenge<'a> {
	scheme: &'a str,
	params: Vec<AuthParam<'a>>,
}

impl<'a> ParsedChallenge<'a> {
	/// Decompose one raw challenge fragment, as produced by
	/// [`crate::parse_www_authenticate`] or its relaxed variant.
	///
	/// The fragment must span exactly one challenge; anything else is a
	/// [`Error::MalformedChallenge`]. Each auth-param is split at its first
	/// `=`, so unquoted values from non-compliant encoders keep their base64
	/// padding intact.
	pub fn parse(fragment: &'a str) -> crate::Result<Self> {
		let scanned =
			scan_single_challenge(fragment, true).ok_or_else(|| Error::MalformedChallenge(fragment.to_string()))?;

		let mut params = Vec::with_capacity(scanned.params.len());
		for span in scanned.params {
			let text = &fragment[span];
			// The grammar guarantees a separator.
			let Some(eq) = text.find('=') else {
				return Err(Error::MalformedChallenge(text.to_string()));
			};
			let name = text[..eq].trim_end_matches([' ', '\t']);
			let raw = text[eq + 1..].trim_start_matches([' ', '\t']);
			params.push(AuthParam {
				name,
				value: unquote(raw),
			});
		}

		Ok(Self {
			scheme: &fragment[scanned.scheme],
			params,
		})
	}

	/// The challenge's auth scheme token.
	pub fn scheme(&self) -> &'a str {
		self.scheme
	}

	/// All auth-params, in header order.
	pub fn params(&self) -> &[AuthParam<'a>] {
		&self.params
	}

	/// Value of the first param with the given name, compared
	/// ASCII-case-insensitively.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.params
			.iter()
			.find(|param| param.name.eq_ignore_ascii_case(name))
			.map(|param| param.value())
	}
}

/// Strip quotes and resolve `\x` quoted-pairs; bare tokens pass through.
fn unquote(raw: &str) -> Cow<'_, str> {
	let Some(inner) = raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) else {
		return Cow::Borrowed(raw);
	};
	if !inner.contains('\\') {
		return Cow::Borrowed(inner);
	}
	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		if c == '\\' {
			if let Some(escaped) = chars.next() {
				out.push(escaped);
			}
		} else {
			out.push(c);
		}
	}
	Cow::Owned(out)
}

/// One `PrivateToken` challenge extracted from a `WWW-Authenticate` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateToken {
	/// Serialized TokenChallenge, as issued by the origin. Opaque bytes.
	pub challenge: Vec<u8>,
	/// Issuer public key in SubjectPublicKeyInfo form. Opaque bytes.
	pub token_key: Vec<u8>,
	/// Seconds the challenge remains usable, if advertised.
	pub max_age: Option<u64>,
}

impl PrivateToken {
	/// Auth scheme for Privacy Pass challenges.
	pub const SCHEME: &'static str = "PrivateToken";

	/// Parse a single challenge fragment carrying this scheme.
	pub fn parse(fragment: &str) -> crate::Result<Self> {
		let parsed = ParsedChallenge::parse(fragment)?;
		if !parsed.scheme().eq_ignore_ascii_case(Self::SCHEME) {
			return Err(Error::UnexpectedScheme(parsed.scheme().to_string()));
		}
		Self::from_challenge(&parsed)
	}

	/// Parse every `PrivateToken` challenge in a `WWW-Authenticate` value.
	///
	/// Challenges for other schemes are skipped. The relaxed grammar is used
	/// so that headers from known non-compliant encoders (unquoted base64
	/// padding) still parse; an unparseable header yields an empty vector,
	/// mirroring the challenge-list parser.
	pub fn parse_multiple(header: &str) -> crate::Result<Vec<Self>> {
		let mut tokens = Vec::new();
		for fragment in parse_www_authenticate_relaxed(header) {
			let parsed = ParsedChallenge::parse(fragment)?;
			if !parsed.scheme().eq_ignore_ascii_case(Self::SCHEME) {
				tracing::debug!(scheme = parsed.scheme(), "skipping challenge for foreign scheme");
				continue;
			}
			tokens.push(Self::from_challenge(&parsed)?);
		}
		Ok(tokens)
	}

	fn from_challenge(parsed: &ParsedChallenge<'_>) -> crate::Result<Self> {
		let challenge = parsed.get("challenge").ok_or(Error::MissingParam("challenge"))?;
		let token_key = parsed.get("token-key").ok_or(Error::MissingParam("token-key"))?;
		let max_age = parsed
			.get("max-age")
			.map(|value| {
				value.parse::<u64>().map_err(|e| Error::InvalidParam {
					name: "max-age",
					reason: e.to_string(),
				})
			})
			.transpose()?;

		Ok(Self {
			challenge: decode_base64url("challenge", challenge)?,
			token_key: decode_base64url("token-key", token_key)?,
			max_age,
		})
	}

	/// Render this challenge as a `WWW-Authenticate` value.
	///
	/// Values are quoted and base64url-encoded without padding, the
	/// RFC-compliant form.
	pub fn to_header_value(&self) -> String {
		let mut params = vec![
			("challenge", AuthParamValue::from(URL_SAFE_NO_PAD.encode(&self.challenge))),
			("token-key", AuthParamValue::from(URL_SAFE_NO_PAD.encode(&self.token_key))),
		];
		if let Some(max_age) = self.max_age {
			params.push(("max-age", AuthParamValue::Number(max_age)));
		}
		format_www_authenticate(Self::SCHEME, Some(params.as_slice()), true)
	}

	/// The issuer key re-tagged rsaEncryption, ready for import into APIs
	/// that reject PSS-tagged SubjectPublicKeyInfo.
	pub fn rsa_encryption_key(&self) -> crate::Result<Vec<u8>> {
		crate::pss_to_encryption(&self.token_key)
	}
}

/// Issuers encode without padding; some encoders pad anyway, so fall back to
/// the padded alphabet before giving up.
fn decode_base64url(name: &'static str, value: &str) -> crate::Result<Vec<u8>> {
	URL_SAFE_NO_PAD
		.decode(value)
		.or_else(|_| URL_SAFE.decode(value))
		.map_err(|e| Error::InvalidParam {
			name,
			reason: format!("invalid base64: {e}"),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_scheme_and_params() {
		let parsed = ParsedChallenge::parse(r#"Basic realm="x", charset="UTF-8""#).unwrap();
		assert_eq!(parsed.scheme(), "Basic");
		assert_eq!(parsed.params().len(), 2);
		assert_eq!(parsed.get("realm"), Some("x"));
		assert_eq!(parsed.get("charset"), Some("UTF-8"));
		assert_eq!(parsed.get("missing"), None);
	}

	#[test]
	fn test_param_names_case_insensitive() {
		let parsed = ParsedChallenge::parse("Basic Realm=x").unwrap();
		assert_eq!(parsed.get("realm"), Some("x"));
	}

	#[test]
	fn test_unquote_resolves_escapes() {
		let parsed = ParsedChallenge::parse(r#"Token challenge="ab\"cd\\ef""#).unwrap();
		assert_eq!(parsed.get("challenge"), Some(r#"ab"cd\ef"#));
	}

	#[test]
	fn test_padded_value_splits_at_first_equals() {
		let parsed = ParsedChallenge::parse("PrivateToken challenge=abc==, token-key=123=").unwrap();
		assert_eq!(parsed.get("challenge"), Some("abc=="));
		assert_eq!(parsed.get("token-key"), Some("123="));
	}

	#[test]
	fn test_two_challenges_rejected() {
		assert!(ParsedChallenge::parse("Basic, Bearer").is_err());
	}

	#[test]
	fn test_private_token_parse() {
		let challenge = [0x61, 0x62, 0x63];
		let token_key = [0x01, 0x02];
		let header = format!(
			r#"PrivateToken challenge="{}", token-key="{}", max-age="600""#,
			URL_SAFE_NO_PAD.encode(challenge),
			URL_SAFE_NO_PAD.encode(token_key),
		);
		let token = PrivateToken::parse(&header).unwrap();
		assert_eq!(token.challenge, challenge);
		assert_eq!(token.token_key, token_key);
		assert_eq!(token.max_age, Some(600));
	}

	#[test]
	fn test_private_token_parse_multiple() {
		let header = r#"PrivateToken challenge="YWJj", token-key="AQI", PrivateToken challenge="ZGVm", token-key="AwQ""#;
		let tokens = PrivateToken::parse_multiple(header).unwrap();
		assert_eq!(tokens.len(), 2);
		assert_eq!(tokens[0].challenge, b"abc");
		assert_eq!(tokens[0].token_key, [0x01, 0x02]);
		assert_eq!(tokens[0].max_age, None);
		assert_eq!(tokens[1].challenge, b"def");
		assert_eq!(tokens[1].token_key, [0x03, 0x04]);
	}

	#[test]
	fn test_private_token_parse_multiple_padded_legacy() {
		let header = "PrivateToken challenge=YWJj, token-key=AQI=";
		let tokens = PrivateToken::parse_multiple(header).unwrap();
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].challenge, b"abc");
		assert_eq!(tokens[0].token_key, [0x01, 0x02]);
	}

	#[test]
	fn test_private_token_skips_foreign_schemes() {
		let header = r#"Basic realm="x", PrivateToken challenge="YWJj", token-key="AQI""#;
		let tokens = PrivateToken::parse_multiple(header).unwrap();
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].challenge, b"abc");
	}

	#[test]
	fn test_private_token_scheme_case_insensitive() {
		let tokens = PrivateToken::parse_multiple(r#"privatetoken challenge="YWJj", token-key="AQI""#).unwrap();
		assert_eq!(tokens.len(), 1);
	}

	#[test]
	fn test_unparseable_header_yields_no_tokens() {
		let tokens = PrivateToken::parse_multiple(r#"PrivateToken challenge="YWJj", token-key="AQI";"#).unwrap();
		assert!(tokens.is_empty());
	}

	#[test]
	fn test_missing_token_key() {
		let result = PrivateToken::parse(r#"PrivateToken challenge="YWJj""#);
		assert!(matches!(result, Err(Error::MissingParam("token-key"))));
	}

	#[test]
	fn test_invalid_base64() {
		let result = PrivateToken::parse(r#"PrivateToken challenge="!!", token-key="AQI""#);
		assert!(matches!(result, Err(Error::InvalidParam { name: "challenge", .. })));
	}

	#[test]
	fn test_invalid_max_age() {
		let result = PrivateToken::parse(r#"PrivateToken challenge="YWJj", token-key="AQI", max-age="soon""#);
		assert!(matches!(result, Err(Error::InvalidParam { name: "max-age", .. })));
	}

	#[test]
	fn test_wrong_scheme() {
		let result = PrivateToken::parse("Basic realm=x");
		assert!(matches!(result, Err(Error::UnexpectedScheme(_))));
	}

	#[test]
	fn test_header_value_round_trip() {
		let token = PrivateToken {
			challenge: b"abc".to_vec(),
			token_key: vec![0x01, 0x02],
			max_age: Some(600),
		};
		let header = token.to_header_value();
		assert_eq!(header, r#"PrivateToken challenge="YWJj",token-key="AQI",max-age="600""#);
		assert_eq!(PrivateToken::parse_multiple(&header).unwrap(), [token]);
	}

	#[test]
	fn test_rsa_encryption_key() {
		// rsaEncryption SPKI with an opaque payload; re-tag it PSS to build
		// a realistic token-key, then check the import path re-tags it back.
		let encryption = hex::decode("301a300d06092a864886f70d0101010500030900deadbeef00010203").unwrap();
		let token = PrivateToken {
			challenge: b"abc".to_vec(),
			token_key: crate::encryption_to_pss(&encryption).unwrap(),
			max_age: None,
		};
		assert_eq!(token.rsa_encryption_key().unwrap(), encryption);
	}
}
