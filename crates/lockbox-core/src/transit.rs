//! Client for the remote transit-encryption oracle.
//!
//! The oracle holds named encryption keys server-side and never reveals them:
//! callers send plaintext and get ciphertext plus the key version back, or
//! the inverse. [`TransitClient`] is the capability the record store depends
//! on; [`HttpTransitClient`] is the production implementation against a
//! Vault-style `/v1/transit` HTTP API. Tests substitute an in-memory fake.
//!
//! Wire encoding: the plaintext string is JSON-serialized and then
//! base64-encoded before transport, so arbitrary text (including structured
//! data already serialized to text) survives the round trip. Decrypt reverses
//! both steps.
//!
//! No retries anywhere — a failed round trip is surfaced as-is and the caller
//! decides. Nothing in this module logs plaintext or key material.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::TransitError;

/// Result of an encrypt round trip.
///
/// `key_version` identifies which rotation of the named key produced the
/// ciphertext; it is reported but not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedValue {
    pub ciphertext: String,
    pub key_version: i64,
}

/// Capability for delegating encryption to a remote oracle.
#[async_trait]
pub trait TransitClient: Send + Sync {
    /// Encrypt `plaintext` under the named key.
    ///
    /// # Errors
    ///
    /// - [`TransitError::UnknownKey`] when the oracle has no such key.
    /// - [`TransitError::EncryptionUnavailable`] on any other failure.
    async fn encrypt(&self, plaintext: &str, key_name: &str) -> Result<SealedValue, TransitError>;

    /// Decrypt `ciphertext` under the named key, returning the original
    /// plaintext string.
    ///
    /// # Errors
    ///
    /// - [`TransitError::UnknownKey`] when the oracle has no such key.
    /// - [`TransitError::DecryptionUnavailable`] on any other failure.
    async fn decrypt(&self, ciphertext: &str, key_name: &str) -> Result<String, TransitError>;
}

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct EncryptRequest {
    /// Base64-encoded plaintext.
    plaintext: String,
}

#[derive(Serialize)]
struct DecryptRequest {
    ciphertext: String,
}

#[derive(Deserialize)]
struct EncryptResponse {
    data: EncryptData,
}

#[derive(Deserialize)]
struct EncryptData {
    ciphertext: String,
    key_version: i64,
}

#[derive(Deserialize)]
struct DecryptResponse {
    data: DecryptData,
}

#[derive(Deserialize)]
struct DecryptData {
    /// Base64-encoded plaintext.
    plaintext: String,
}

/// JSON-serialize then base64-encode a plaintext string for transport.
fn encode_plaintext(plaintext: &str) -> Result<String, TransitError> {
    let json = serde_json::to_string(plaintext).map_err(|e| TransitError::EncryptionUnavailable {
        reason: format!("plaintext could not be serialized: {e}"),
    })?;
    Ok(BASE64.encode(json))
}

/// Reverse of [`encode_plaintext`]: base64-decode, then parse the JSON string.
fn decode_plaintext(encoded: &str) -> Result<String, TransitError> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|_| TransitError::DecryptionUnavailable {
            reason: "oracle returned invalid base64 plaintext".to_owned(),
        })?;
    let json = String::from_utf8(bytes).map_err(|_| TransitError::DecryptionUnavailable {
        reason: "oracle returned non-UTF-8 plaintext".to_owned(),
    })?;
    serde_json::from_str(&json).map_err(|_| TransitError::DecryptionUnavailable {
        reason: "oracle returned plaintext that is not a JSON string".to_owned(),
    })
}

// ── HTTP implementation ──────────────────────────────────────────────

/// Transit client over HTTP, authenticated with a static token.
pub struct HttpTransitClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTransitClient {
    /// Build a client for the oracle at `base_url` (e.g. `http://vault:8200`).
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for HttpTransitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("HttpTransitClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TransitClient for HttpTransitClient {
    async fn encrypt(&self, plaintext: &str, key_name: &str) -> Result<SealedValue, TransitError> {
        let url = format!("{}/v1/transit/encrypt/{key_name}", self.base_url);
        let body = EncryptRequest {
            plaintext: encode_plaintext(plaintext)?,
        };

        let resp = self
            .http
            .post(&url)
            .header("X-Vault-Token", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransitError::EncryptionUnavailable {
                reason: format!("transport failure: {e}"),
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TransitError::UnknownKey {
                key: key_name.to_owned(),
            });
        }
        if !resp.status().is_success() {
            return Err(TransitError::EncryptionUnavailable {
                reason: format!("oracle returned {}", resp.status()),
            });
        }

        let parsed: EncryptResponse =
            resp.json()
                .await
                .map_err(|_| TransitError::EncryptionUnavailable {
                    reason: "oracle returned a malformed encrypt response".to_owned(),
                })?;

        Ok(SealedValue {
            ciphertext: parsed.data.ciphertext,
            key_version: parsed.data.key_version,
        })
    }

    async fn decrypt(&self, ciphertext: &str, key_name: &str) -> Result<String, TransitError> {
        let url = format!("{}/v1/transit/decrypt/{key_name}", self.base_url);
        let body = DecryptRequest {
            ciphertext: ciphertext.to_owned(),
        };

        let resp = self
            .http
            .post(&url)
            .header("X-Vault-Token", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransitError::DecryptionUnavailable {
                reason: format!("transport failure: {e}"),
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TransitError::UnknownKey {
                key: key_name.to_owned(),
            });
        }
        if !resp.status().is_success() {
            return Err(TransitError::DecryptionUnavailable {
                reason: format!("oracle returned {}", resp.status()),
            });
        }

        let parsed: DecryptResponse =
            resp.json()
                .await
                .map_err(|_| TransitError::DecryptionUnavailable {
                    reason: "oracle returned a malformed decrypt response".to_owned(),
                })?;

        decode_plaintext(&parsed.data.plaintext)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_encoding_round_trips() {
        for plaintext in [
            "hello",
            "",
            "line\nbreaks and \"quotes\"",
            r#"{"nested":"json","n":42}"#,
            "unicode: héllø ✓",
        ] {
            let encoded = encode_plaintext(plaintext).unwrap();
            assert_eq!(decode_plaintext(&encoded).unwrap(), plaintext);
        }
    }

    #[test]
    fn encoded_plaintext_is_base64_of_json() {
        let encoded = encode_plaintext("abc").unwrap();
        let decoded = BASE64.decode(&encoded).unwrap();
        assert_eq!(decoded, br#""abc""#);
    }

    #[test]
    fn invalid_base64_is_a_decrypt_failure() {
        let err = decode_plaintext("not base64 !!!").unwrap_err();
        assert!(matches!(err, TransitError::DecryptionUnavailable { .. }));
    }

    #[test]
    fn non_json_payload_is_a_decrypt_failure() {
        // Valid base64, but the payload is not a JSON string.
        let err = decode_plaintext(&BASE64.encode("no quotes")).unwrap_err();
        assert!(matches!(err, TransitError::DecryptionUnavailable { .. }));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = HttpTransitClient::new("http://vault:8200/", "t");
        assert_eq!(client.base_url, "http://vault:8200");
    }

    #[test]
    fn debug_output_never_contains_the_token() {
        let client = HttpTransitClient::new("http://vault:8200", "s.super-secret");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
        assert_eq!(client.token, "s.super-secret");
    }
}
