//! Webhook signature verification using HMAC-SHA256.
//!
//! GitHub signs each delivery with a shared secret and puts the result in the
//! `X-Hub-Signature-256` header as `sha256=<hex>`. Verification is the first
//! step in webhook processing: a request with a bad signature is rejected
//! before its body is parsed.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a webhook signature against the raw payload and the shared secret.
///
/// Returns `true` only if the header carries the HMAC-SHA256 of `payload`
/// keyed by `secret`. The comparison is constant-time (via the MAC library's
/// own verification), so verification time does not depend on how many
/// leading bytes of the signature match.
///
/// # Examples
///
/// ```
/// use post_herald::webhooks::{compute_signature, format_signature_header, verify_signature};
///
/// let payload = b"{}";
/// let secret = b"shared-secret";
/// let header = format_signature_header(&compute_signature(payload, secret));
///
/// assert!(verify_signature(payload, &header, secret));
/// assert!(!verify_signature(payload, &header, b"other-secret"));
/// ```
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some(received) = parse_signature_header(signature_header) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);

    // Constant-time comparison; never compare digests with `==`.
    mac.verify_slice(&received).is_ok()
}

/// Parses a `sha256=<hex>` signature header into raw bytes.
///
/// Returns `None` for malformed headers (missing prefix, wrong algorithm,
/// invalid hex). Never panics.
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let hex_digest = header.strip_prefix("sha256=")?;
    hex::decode(hex_digest).ok()
}

/// Computes the HMAC-SHA256 of a payload keyed by the given secret.
///
/// Callers use this to generate expected signatures, primarily in tests.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a raw signature as a `sha256=<hex>` header value.
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("sha256={}", hex::encode(signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_header_decodes_hex() {
        assert_eq!(
            parse_signature_header("sha256=00ff1a2b"),
            Some(vec![0x00, 0xff, 0x1a, 0x2b])
        );
    }

    #[test]
    fn parse_header_rejects_malformed_input() {
        assert_eq!(parse_signature_header(""), None);
        assert_eq!(parse_signature_header("00ff1a2b"), None);
        assert_eq!(parse_signature_header("sha1=00ff1a2b"), None);
        assert_eq!(parse_signature_header("sha256=not-hex"), None);
        // Odd-length hex is invalid.
        assert_eq!(parse_signature_header("sha256=abc"), None);
    }

    #[test]
    fn verify_accepts_correct_signature() {
        let payload = b"{\"ref\":\"refs/heads/main\"}";
        let secret = b"It's a Secret to Everybody";

        let header = format_signature_header(&compute_signature(payload, secret));
        assert!(verify_signature(payload, &header, secret));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let payload = b"payload";
        let header = format_signature_header(&compute_signature(payload, b"correct"));

        assert!(!verify_signature(payload, &header, b"wrong"));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let secret = b"secret";
        let header = format_signature_header(&compute_signature(b"original", secret));

        assert!(!verify_signature(b"tampered", &header, secret));
    }

    #[test]
    fn verify_rejects_malformed_headers_without_panicking() {
        let payload = b"body";
        let secret = b"secret";

        assert!(!verify_signature(payload, "", secret));
        assert!(!verify_signature(payload, "sha256=", secret));
        assert!(!verify_signature(payload, "sha256=zzzz", secret));
        assert!(!verify_signature(payload, "not-a-header", secret));
    }

    #[test]
    fn empty_payload_and_empty_secret_are_valid_inputs() {
        let header = format_signature_header(&compute_signature(b"", b""));
        assert!(verify_signature(b"", &header, b""));
    }

    proptest! {
        /// Signing and verifying with the same secret always succeeds.
        #[test]
        fn prop_sign_verify_roundtrip(payload: Vec<u8>, secret: Vec<u8>) {
            let header = format_signature_header(&compute_signature(&payload, &secret));
            prop_assert!(verify_signature(&payload, &header, &secret));
        }

        /// Verifying with a different secret always fails.
        #[test]
        fn prop_wrong_secret_fails(payload: Vec<u8>, secret: Vec<u8>, other: Vec<u8>) {
            prop_assume!(secret != other);

            let header = format_signature_header(&compute_signature(&payload, &secret));
            prop_assert!(!verify_signature(&payload, &header, &other));
        }

        /// Any payload modification invalidates the signature.
        #[test]
        fn prop_modified_payload_fails(original: Vec<u8>, modified: Vec<u8>, secret: Vec<u8>) {
            prop_assume!(original != modified);

            let header = format_signature_header(&compute_signature(&original, &secret));
            prop_assert!(!verify_signature(&modified, &header, &secret));
        }

        /// Header formatting and parsing round-trip.
        #[test]
        fn prop_format_parse_roundtrip(signature: [u8; 32]) {
            let header = format_signature_header(&signature);
            prop_assert_eq!(parse_signature_header(&header), Some(signature.to_vec()));
        }

        /// Arbitrary header strings never cause a panic.
        #[test]
        fn prop_malformed_header_no_panic(header: String, payload: Vec<u8>, secret: Vec<u8>) {
            let _ = parse_signature_header(&header);
            let _ = verify_signature(&payload, &header, &secret);
        }
    }
}
