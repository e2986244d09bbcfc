//! `WWW-Authenticate` challenge-list parsing and formatting.
//!
//! Implements the challenge grammar of [RFC 9110 Section 11.6.1]:
//!
//! ```text
//! WWW-Authenticate = #challenge
//! challenge        = auth-scheme [ 1*SP ( auth-param *( OWS "," OWS auth-param ) ) ]
//! auth-param       = token BWS "=" BWS ( token / quoted-string )
//! ```
//!
//! Consumes data shaped like:
//!
//! ```text
//! PrivateToken challenge="abc...", token-key="123...",
//! PrivateToken challenge="def...", token-key="234...",
//! PrivateToken challenge=ghi..., token-key=345...
//! ```
//!
//! The parser is a hand-written scanner that only ever attempts a match at
//! the current offset, never searching forward, and it is all-or-nothing: if
//! the header is not consumed in its entirety, no challenges are returned.
//! Partial challenge lists are never exposed, so malformed or tampered
//! trailing data cannot be silently dropped.
//!
//! The `token68` alternative of RFC 9110 is not supported. Privacy Pass does
//! not use it and it has not been observed in any deployment.
//!
//! [RFC 9110 Section 11.6.1]: https://www.rfc-editor.org/rfc/rfc9110#section-11.6.1

use std::ops::Range;

/// Parse a `WWW-Authenticate` header value into raw challenge fragments.
///
/// Returns one string slice per challenge, in header order. Any grammar
/// violation, including trailing content that is not part of a challenge,
/// rejects the entire header and yields an empty vector. No error is ever
/// raised; an empty result is the only failure signal.
pub fn parse_www_authenticate(header: &str) -> Vec<&str> {
	parse_challenges(header, false)
}

/// Parse a `WWW-Authenticate` header value, tolerating `=` inside bare tokens.
///
/// RFC 9110 forbids `=` in a token, but encoders in the wild emit unquoted
/// base64-padded values such as `challenge=abc==`. This entry point extends
/// the token character set with `=` so those headers parse; use
/// [`parse_www_authenticate`] when strict compliance is required.
pub fn parse_www_authenticate_relaxed(header: &str) -> Vec<&str> {
	parse_challenges(header, true)
}

fn parse_challenges(header: &str, relaxed: bool) -> Vec<&str> {
	let mut scanner = Scanner::new(header, relaxed);
	let mut fragments = Vec::new();
	let mut first = true;
	let mut consumed = false;

	// Repeatedly match `[ OWS "," OWS ] challenge`, anchored at the current
	// offset.
	loop {
		let attempt = scanner.pos;
		let skipped = scanner.separator();
		let Some(challenge) = scanner.challenge() else {
			scanner.pos = attempt;
			break;
		};
		if first {
			if skipped {
				// The header opened with a bare separator.
				return Vec::new();
			}
			first = false;
		}
		fragments.push(&header[challenge.span.clone()]);
		consumed = scanner.pos == header.len();
	}

	if !consumed {
		tracing::trace!(rest = &header[scanner.pos..], "challenge list not fully consumed, rejecting header");
		return Vec::new();
	}
	fragments
}

/// Scan a lone challenge fragment, requiring total consumption.
///
/// Used to decompose fragments the challenge-list parser has already
/// accepted.
pub(crate) fn scan_single_challenge(fragment: &str, relaxed: bool) -> Option<ScannedChallenge> {
	let mut scanner = Scanner::new(fragment, relaxed);
	let challenge = scanner.challenge()?;
	(scanner.pos == fragment.len()).then_some(challenge)
}

/// Byte spans of one matched `challenge` production.
pub(crate) struct ScannedChallenge {
	/// The `auth-scheme` token.
	pub scheme: Range<usize>,
	/// The whole challenge, scheme included.
	pub span: Range<usize>,
	/// One span per `auth-param`, covering `name BWS "=" BWS value`.
	pub params: Vec<Range<usize>>,
}

/// Anchored scanner over the raw header bytes.
///
/// Matching operates on bytes; obs-text (`%x80-FF`) is accepted byte-wise
/// inside quoted strings per the RFC grammar. Every produced span starts and
/// ends adjacent to an ASCII byte, so slicing the original `&str` at span
/// boundaries is always valid.
struct Scanner<'a> {
	bytes: &'a [u8],
	pos: usize,
	relaxed: bool,
}

impl<'a> Scanner<'a> {
	fn new(header: &'a str, relaxed: bool) -> Self {
		Self {
			bytes: header.as_bytes(),
			pos: 0,
			relaxed,
		}
	}

	fn peek(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	fn eat(&mut self, byte: u8) -> bool {
		if self.peek() == Some(byte) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	/// `tchar` per RFC 7230, optionally extended with `=` in relaxed mode.
	fn is_tchar(&self, byte: u8) -> bool {
		matches!(
			byte,
			b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
		) || byte.is_ascii_alphanumeric()
			|| (self.relaxed && byte == b'=')
	}

	/// `OWS = *( SP / HTAB )`
	fn skip_ows(&mut self) {
		while matches!(self.peek(), Some(b' ' | b'\t')) {
			self.pos += 1;
		}
	}

	/// `token = 1*tchar`, maximal munch. Returns the end offset of the run.
	fn token(&mut self) -> Option<usize> {
		let start = self.pos;
		while let Some(byte) = self.peek() {
			if !self.is_tchar(byte) {
				break;
			}
			self.pos += 1;
		}
		(self.pos > start).then_some(self.pos)
	}

	/// `quoted-string = DQUOTE *( qdtext / quoted-pair ) DQUOTE`, restoring
	/// the offset on failure.
	fn quoted_string(&mut self) -> bool {
		let start = self.pos;
		if !self.eat(b'"') {
			return false;
		}
		while let Some(byte) = self.peek() {
			match byte {
				b'"' => {
					self.pos += 1;
					return true;
				}
				b'\\' => {
					self.pos += 1;
					// quoted-pair = "\" ( HTAB / SP / VCHAR / obs-text )
					match self.peek() {
						Some(b'\t' | b' ' | 0x21..=0x7E | 0x80..=0xFF) => self.pos += 1,
						_ => break,
					}
				}
				// qdtext = HTAB / SP / %x21 / %x23-5B / %x5D-7E / obs-text
				b'\t' | b' ' | 0x21 | 0x23..=0x5B | 0x5D..=0x7E | 0x80..=0xFF => self.pos += 1,
				_ => break,
			}
		}
		self.pos = start;
		false
	}

	/// `auth-param = token BWS "=" BWS ( token / quoted-string )`
	///
	/// The name token is matched greedily and then shrunk until the rest of
	/// the production fits. The shrinking only matters in relaxed mode, where
	/// `=` is a token character and the maximal name run can swallow the
	/// separator.
	fn auth_param(&mut self) -> Option<Range<usize>> {
		let start = self.pos;
		let mut name_end = self.token()?;
		while name_end > start {
			self.pos = name_end;
			self.skip_ows();
			if self.eat(b'=') {
				self.skip_ows();
				if self.quoted_string() || self.token().is_some() {
					return Some(start..self.pos);
				}
			}
			name_end -= 1;
		}
		self.pos = start;
		None
	}

	/// `[ OWS "," OWS ]` skip-prefix between challenges. Returns whether a
	/// comma separator was consumed.
	fn separator(&mut self) -> bool {
		let start = self.pos;
		self.skip_ows();
		if self.eat(b',') {
			self.skip_ows();
			true
		} else {
			self.pos = start;
			false
		}
	}

	/// `challenge = auth-scheme [ 1*SP auth-param *( OWS "," OWS auth-param ) ]`
	fn challenge(&mut self) -> Option<ScannedChallenge> {
		let start = self.pos;
		let scheme_end = self.token()?;
		let mut end = scheme_end;
		let mut params = Vec::new();

		// The param list starts with 1*SP (spaces only, no tabs).
		let mark = self.pos;
		while self.eat(b' ') {}
		if self.pos > mark {
			if let Some(first) = self.auth_param() {
				end = self.pos;
				params.push(first);
				loop {
					let sep = self.pos;
					self.skip_ows();
					if !self.eat(b',') {
						self.pos = sep;
						break;
					}
					self.skip_ows();
					let Some(param) = self.auth_param() else {
						// The comma belongs to the next challenge.
						self.pos = sep;
						break;
					};
					end = self.pos;
					params.push(param);
				}
			} else {
				self.pos = mark;
			}
		}

		Some(ScannedChallenge {
			scheme: start..scheme_end,
			span: start..end,
			params,
		})
	}
}

/// Value of an auth-param handed to [`format_www_authenticate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthParamValue {
	/// Emit the parameter name alone, with no `=`.
	Empty,
	/// A textual value, emitted verbatim.
	Text(String),
	/// A numeric value such as `max-age`.
	Number(u64),
}

impl From<&str> for AuthParamValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for AuthParamValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<u64> for AuthParamValue {
	fn from(value: u64) -> Self {
		Self::Number(value)
	}
}

/// Render an auth scheme plus auth-params as a `WWW-Authenticate` value.
///
/// With `params` absent the scheme is returned verbatim. Otherwise each
/// entry renders as `name`, `name=value` or `name="value"` depending on the
/// value variant and `quoted`, joined by commas without inserted spaces and
/// prefixed by the scheme and a single space. Entries are emitted in
/// declaration order.
///
/// `WWW-Authenticate` does not impose escaping of auth-param values (see
/// [RFC 9110 Section 11.2]); no quote or backslash escaping is performed, so
/// callers must supply values that are already safe.
///
/// [RFC 9110 Section 11.2]: https://www.rfc-editor.org/rfc/rfc9110#section-11.2
pub fn format_www_authenticate(scheme: &str, params: Option<&[(&str, AuthParamValue)]>, quoted: bool) -> String {
	let Some(params) = params else {
		return scheme.to_string();
	};
	let quote = if quoted { "\"" } else { "" };
	let params = params
		.iter()
		.map(|(name, value)| match value {
			AuthParamValue::Empty => name.to_string(),
			AuthParamValue::Text(text) => format!("{name}={quote}{text}{quote}"),
			AuthParamValue::Number(number) => format!("{name}={quote}{number}{quote}"),
		})
		.collect::<Vec<_>>()
		.join(",");
	format!("{scheme} {params}")
}
