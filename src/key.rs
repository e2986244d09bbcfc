//! RSA SubjectPublicKeyInfo re-tagging between RSASSA-PSS and rsaEncryption.
//!
//! Privacy Pass issuers publish RSA public keys with the RSASSA-PSS
//! AlgorithmIdentifier of [RFC 4055 Section 6], but common crypto APIs only
//! import and export keys tagged rsaEncryption (browsers being the prominent
//! offenders, see the Chromium and Firefox WebCrypto policies). These
//! transcoders swap the AlgorithmIdentifier while carrying the subject
//! public key BIT STRING over byte-for-byte; the key material itself is
//! never reinterpreted.
//!
//! Both directions are pure functions over DER byte slices and validate the
//! outer SubjectPublicKeyInfo structure before rebuilding it.
//!
//! [RFC 4055 Section 6]: https://www.rfc-editor.org/rfc/rfc4055#section-6

use der::asn1::{AnyRef, ObjectIdentifier};
use der::{Any, Decode, Encode, Sequence};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

/// rsaEncryption, RFC 8017 Appendix A.1.
pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// id-RSASSA-PSS, RFC 4055 Section 6.
pub const RSASSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");

/// id-mgf1, RFC 4055 Section 2.2.
pub const ID_MGF1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.8");

const ID_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
const ID_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.2");
const ID_SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.3");

/// Digest used by a PSS AlgorithmIdentifier, for both the hash and the MGF-1
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PssHash {
	/// SHA-256
	Sha256,
	/// SHA-384, the profile deployed by Privacy Pass issuers.
	#[default]
	Sha384,
	/// SHA-512
	Sha512,
}

impl PssHash {
	/// NIST hash algorithm OID.
	pub const fn oid(self) -> ObjectIdentifier {
		match self {
			Self::Sha256 => ID_SHA256,
			Self::Sha384 => ID_SHA384,
			Self::Sha512 => ID_SHA512,
		}
	}

	/// Digest output length in bytes.
	pub const fn digest_len(self) -> u8 {
		match self {
			Self::Sha256 => 32,
			Self::Sha384 => 48,
			Self::Sha512 => 64,
		}
	}
}

/// Parameters written into a rebuilt PSS AlgorithmIdentifier.
///
/// The transcoder cannot recover the original parameters once a key has been
/// re-tagged rsaEncryption, so [`encryption_to_pss_with`] stamps a profile
/// chosen by the caller. The default matches the single profile deployed for
/// publicly verifiable Privacy Pass tokens: SHA-384 with a 48-byte salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PssProfile {
	/// Digest for both hashAlgorithm and the MGF-1 parameter.
	pub hash: PssHash,
	/// Salt length in bytes.
	pub salt_len: u8,
}

impl Default for PssProfile {
	fn default() -> Self {
		Self::new(PssHash::Sha384)
	}
}

impl PssProfile {
	/// Profile with the conventional salt length (one digest length).
	pub fn new(hash: PssHash) -> Self {
		Self {
			hash,
			salt_len: hash.digest_len(),
		}
	}
}

/// `RSASSA-PSS-params` per RFC 4055 Section 3.1.
///
/// ```text
/// RSASSA-PSS-params ::= SEQUENCE {
///     hashAlgorithm     [0] HashAlgorithm DEFAULT sha1,
///     maskGenAlgorithm  [1] MaskGenAlgorithm DEFAULT mgf1SHA1,
///     saltLength        [2] INTEGER DEFAULT 20,
///     trailerField      [3] INTEGER DEFAULT 1
/// }
/// ```
///
/// Fields are modeled as optional; absent fields take the RFC defaults,
/// which this crate never emits.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct PssParameters {
	/// `[0]` hashAlgorithm
	#[asn1(context_specific = "0", tag_mode = "EXPLICIT", optional = "true")]
	pub hash: Option<AlgorithmIdentifierOwned>,
	/// `[1]` maskGenAlgorithm
	#[asn1(context_specific = "1", tag_mode = "EXPLICIT", optional = "true")]
	pub mask_gen: Option<MaskGenAlgorithm>,
	/// `[2]` saltLength
	#[asn1(context_specific = "2", tag_mode = "EXPLICIT", optional = "true")]
	pub salt_len: Option<u8>,
	/// `[3]` trailerField
	#[asn1(context_specific = "3", tag_mode = "EXPLICIT", optional = "true")]
	pub trailer_field: Option<u8>,
}

/// `MaskGenAlgorithm ::= AlgorithmIdentifier` specialized to MGF-1, whose
/// parameter is the underlying hash AlgorithmIdentifier.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct MaskGenAlgorithm {
	/// Always [`ID_MGF1`] in keys this crate produces.
	pub oid: ObjectIdentifier,
	/// Digest the mask generation function is built on.
	pub hash: AlgorithmIdentifierOwned,
}

/// Re-tag an RSASSA-PSS SubjectPublicKeyInfo as rsaEncryption.
///
/// The input must be a DER SEQUENCE of an AlgorithmIdentifier-shaped
/// SEQUENCE followed by a BIT STRING; anything else is a decode error. The
/// parsed AlgorithmIdentifier is discarded wholesale, PSS parameters
/// included, and replaced with `SEQUENCE(rsaEncryption, NULL)`. The BIT
/// STRING is re-emitted unchanged.
pub fn pss_to_encryption(spki_der: &[u8]) -> crate::Result<Vec<u8>> {
	let spki = SubjectPublicKeyInfoOwned::from_der(spki_der)?;
	let spki = SubjectPublicKeyInfoOwned {
		algorithm: AlgorithmIdentifierOwned {
			oid: RSA_ENCRYPTION,
			parameters: Some(Any::from(AnyRef::NULL)),
		},
		subject_public_key: spki.subject_public_key,
	};
	Ok(spki.to_der()?)
}

/// Re-tag an rsaEncryption SubjectPublicKeyInfo as RSASSA-PSS with the
/// default [`PssProfile`] (SHA-384, 48-byte salt).
pub fn encryption_to_pss(spki_der: &[u8]) -> crate::Result<Vec<u8>> {
	encryption_to_pss_with(spki_der, &PssProfile::default())
}

/// Re-tag an rsaEncryption SubjectPublicKeyInfo as RSASSA-PSS.
///
/// The rebuilt AlgorithmIdentifier carries explicit `[0]` hash, `[1]`
/// mask-generation and `[2]` salt-length parameters from `profile`; the
/// trailer field is left at its RFC default and not emitted. The input is
/// validated with the same structural decode as [`pss_to_encryption`], and
/// the BIT STRING is re-emitted unchanged.
pub fn encryption_to_pss_with(spki_der: &[u8], profile: &PssProfile) -> crate::Result<Vec<u8>> {
	let spki = SubjectPublicKeyInfoOwned::from_der(spki_der)?;
	let digest = AlgorithmIdentifierOwned {
		oid: profile.hash.oid(),
		parameters: None,
	};
	let params = PssParameters {
		hash: Some(digest.clone()),
		mask_gen: Some(MaskGenAlgorithm {
			oid: ID_MGF1,
			hash: digest,
		}),
		salt_len: Some(profile.salt_len),
		trailer_field: None,
	};
	let spki = SubjectPublicKeyInfoOwned {
		algorithm: AlgorithmIdentifierOwned {
			oid: RSASSA_PSS,
			parameters: Some(Any::encode_from(&params)?),
		},
		subject_public_key: spki.subject_public_key,
	};
	Ok(spki.to_der()?)
}

#[cfg(test)]
mod tests {
	use super::*;

	/// `SEQUENCE(rsaEncryption, NULL)`
	const RSA_ENCRYPTION_ALG_ID: &str = "300d06092a864886f70d0101010500";

	/// The fixed SHA-384/48 PSS AlgorithmIdentifier, computed by hand:
	/// `SEQUENCE(id-RSASSA-PSS, SEQUENCE([0] SEQUENCE(sha384),
	/// [1] SEQUENCE(id-mgf1, SEQUENCE(sha384)), [2] INTEGER 48))`.
	const RSA_PSS_ALG_ID: &str = "303d06092a864886f70d01010a3030a00d300b0609608648016503040202a11a301806092a864886f70d010108300b0609608648016503040202a203020130";

	/// Opaque stand-in for the RSAPublicKey payload.
	const KEY_BITS: &str = "030900deadbeef00010203";

	fn encryption_spki() -> Vec<u8> {
		hex::decode(format!("301a{RSA_ENCRYPTION_ALG_ID}{KEY_BITS}")).unwrap()
	}

	fn pss_spki() -> Vec<u8> {
		hex::decode(format!("304a{RSA_PSS_ALG_ID}{KEY_BITS}")).unwrap()
	}

	fn decode_pss_params(spki_der: &[u8]) -> PssParameters {
		let spki = SubjectPublicKeyInfoOwned::from_der(spki_der).unwrap();
		let params = spki.algorithm.parameters.unwrap();
		PssParameters::from_der(&params.to_der().unwrap()).unwrap()
	}

	#[test]
	fn test_encryption_to_pss_exact_bytes() {
		assert_eq!(encryption_to_pss(&encryption_spki()).unwrap(), pss_spki());
	}

	#[test]
	fn test_pss_to_encryption_exact_bytes() {
		assert_eq!(pss_to_encryption(&pss_spki()).unwrap(), encryption_spki());
	}

	#[test]
	fn test_round_trip_preserves_key_bytes() {
		let original = encryption_spki();
		let pss = encryption_to_pss(&original).unwrap();
		assert_eq!(pss_to_encryption(&pss).unwrap(), original);
	}

	#[test]
	fn test_pss_to_encryption_ignores_input_parameters() {
		// A PSS AlgorithmIdentifier with absent parameters is discarded just
		// the same.
		let spki = hex::decode(format!("3018300b06092a864886f70d01010a{KEY_BITS}")).unwrap();
		assert_eq!(pss_to_encryption(&spki).unwrap(), encryption_spki());
	}

	#[test]
	fn test_default_profile_parameters() {
		let params = decode_pss_params(&encryption_to_pss(&encryption_spki()).unwrap());
		assert_eq!(params.hash.as_ref().unwrap().oid, PssHash::Sha384.oid());
		let mask_gen = params.mask_gen.unwrap();
		assert_eq!(mask_gen.oid, ID_MGF1);
		assert_eq!(mask_gen.hash.oid, PssHash::Sha384.oid());
		assert_eq!(params.salt_len, Some(48));
		assert_eq!(params.trailer_field, None);
	}

	#[test]
	fn test_custom_profile_parameters() {
		let profile = PssProfile::new(PssHash::Sha256);
		let params = decode_pss_params(&encryption_to_pss_with(&encryption_spki(), &profile).unwrap());
		assert_eq!(params.hash.as_ref().unwrap().oid, PssHash::Sha256.oid());
		assert_eq!(params.mask_gen.unwrap().hash.oid, PssHash::Sha256.oid());
		assert_eq!(params.salt_len, Some(32));
	}

	#[test]
	fn test_truncated_input_rejected() {
		let spki = encryption_spki();
		assert!(pss_to_encryption(&spki[..10]).is_err());
		assert!(encryption_to_pss(&spki[..10]).is_err());
	}

	#[test]
	fn test_wrong_key_tag_rejected() {
		// Second element is an OCTET STRING, not a BIT STRING.
		let spki = hex::decode(format!("3013{RSA_ENCRYPTION_ALG_ID}0402abcd")).unwrap();
		assert!(pss_to_encryption(&spki).is_err());
		assert!(encryption_to_pss(&spki).is_err());
	}

	#[test]
	fn test_non_sequence_input_rejected() {
		assert!(pss_to_encryption(&[0x04, 0x00]).is_err());
	}

	#[test]
	fn test_trailing_bytes_rejected() {
		let mut spki = encryption_spki();
		spki.push(0x00);
		assert!(pss_to_encryption(&spki).is_err());
	}
}
