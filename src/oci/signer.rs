//! OCI HTTP request signatures (draft-cavage, RSA-SHA256).

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::error::FleetError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Headers a signed request must carry, in signing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub date: String,
    pub content: Option<ContentHeaders>,
    pub authorization: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHeaders {
    pub content_length: usize,
    pub content_type: &'static str,
    pub content_sha256: String,
}

pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Parses a PKCS#8 or PKCS#1 PEM key.
    ///
    /// The key id is `{tenancy}/{user}/{fingerprint}`.
    pub fn from_pem(
        tenancy_ocid: &str,
        user_ocid: &str,
        fingerprint: &str,
        pem: &SecretString,
    ) -> Result<Self, FleetError> {
        let pem = pem.expose_secret();
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| FleetError::AuthError(format!("invalid private key: {e}")))?;
        Ok(Self {
            key_id: format!("{tenancy_ocid}/{user_ocid}/{fingerprint}"),
            signing_key: SigningKey::<Sha256>::new(key),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signs one request. `body` is the exact bytes that will be sent.
    pub fn sign(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&[u8]>,
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders, FleetError> {
        let host = host_header(url)?;
        let date = now.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let content = body.map(|bytes| ContentHeaders {
            content_length: bytes.len(),
            content_type: JSON_CONTENT_TYPE,
            content_sha256: STANDARD.encode(Sha256::digest(bytes)),
        });

        let mut lines = vec![
            ("date", date.clone()),
            ("(request-target)", request_target(method, url)),
            ("host", host),
        ];
        if let Some(content) = &content {
            lines.push(("content-length", content.content_length.to_string()));
            lines.push(("content-type", content.content_type.to_string()));
            lines.push(("x-content-sha256", content.content_sha256.clone()));
        }

        let signature = self.signing_key.sign(signing_string(&lines).as_bytes());
        let header_names = lines
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(" ");
        let authorization = format!(
            "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{}\",signature=\"{}\"",
            self.key_id,
            header_names,
            STANDARD.encode(signature.to_bytes())
        );

        Ok(SignedHeaders {
            date,
            content,
            authorization,
        })
    }
}

fn host_header(url: &Url) -> Result<String, FleetError> {
    let host = url
        .host_str()
        .ok_or_else(|| FleetError::InvalidRequest(format!("no host in {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn request_target(method: &Method, url: &Url) -> String {
    let method = method.as_str().to_ascii_lowercase();
    match url.query() {
        Some(query) => format!("{method} {}?{query}", url.path()),
        None => format!("{method} {}", url.path()),
    }
}

fn signing_string(lines: &[(&str, String)]) -> String {
    lines
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rsa::pkcs1v15::{Signature, VerifyingKey};
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use rsa::signature::Verifier;
    use std::sync::OnceLock;

    fn test_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap())
    }

    fn signer() -> RequestSigner {
        let pem = test_key().to_pkcs8_pem(LineEnding::LF).unwrap();
        RequestSigner::from_pem(
            "ocid1.tenancy.oc1..t",
            "ocid1.user.oc1..u",
            "aa:bb:cc",
            &SecretString::new(pem.to_string()),
        )
        .unwrap()
    }

    fn field<'a>(authorization: &'a str, name: &str) -> &'a str {
        let start = authorization
            .find(&format!("{name}=\""))
            .map(|i| i + name.len() + 2)
            .unwrap();
        let end = authorization[start..].find('"').unwrap() + start;
        &authorization[start..end]
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 8, 30, 0).unwrap()
    }

    #[test]
    fn get_signature_covers_three_headers_and_verifies() {
        let url = Url::parse(
            "https://iaas.us-ashburn-1.oraclecloud.com/20160918/instances/ocid1.instance.x",
        )
        .unwrap();
        let signed = signer().sign(&Method::GET, &url, None, at()).unwrap();

        assert_eq!(signed.date, "Sat, 17 Oct 2026 08:30:00 GMT");
        assert!(signed.content.is_none());
        assert!(signed
            .authorization
            .starts_with("Signature version=\"1\",keyId=\"ocid1.tenancy.oc1..t/ocid1.user.oc1..u/aa:bb:cc\""));
        assert_eq!(
            field(&signed.authorization, "headers"),
            "date (request-target) host"
        );

        let expected = signing_string(&[
            ("date", signed.date.clone()),
            (
                "(request-target)",
                "get /20160918/instances/ocid1.instance.x".to_string(),
            ),
            ("host", "iaas.us-ashburn-1.oraclecloud.com".to_string()),
        ]);
        let raw = STANDARD
            .decode(field(&signed.authorization, "signature"))
            .unwrap();
        let verifier = VerifyingKey::<Sha256>::new(test_key().to_public_key());
        verifier
            .verify(
                expected.as_bytes(),
                &Signature::try_from(raw.as_slice()).unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn body_signature_adds_content_headers() {
        let url = Url::parse("http://127.0.0.1:1234/20160918/instances/").unwrap();
        let body = br#"{"displayName":"w-1"}"#;
        let signed = signer()
            .sign(&Method::POST, &url, Some(&body[..]), at())
            .unwrap();

        let content = signed.content.clone().unwrap();
        assert_eq!(content.content_length, body.len());
        assert_eq!(content.content_sha256, STANDARD.encode(Sha256::digest(body)));
        assert_eq!(
            field(&signed.authorization, "headers"),
            "date (request-target) host content-length content-type x-content-sha256"
        );

        let expected = signing_string(&[
            ("date", signed.date.clone()),
            ("(request-target)", "post /20160918/instances/".to_string()),
            ("host", "127.0.0.1:1234".to_string()),
            ("content-length", body.len().to_string()),
            ("content-type", "application/json".to_string()),
            ("x-content-sha256", content.content_sha256),
        ]);
        let raw = STANDARD
            .decode(field(&signed.authorization, "signature"))
            .unwrap();
        VerifyingKey::<Sha256>::new(test_key().to_public_key())
            .verify(
                expected.as_bytes(),
                &Signature::try_from(raw.as_slice()).unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn query_is_part_of_the_request_target() {
        let url = Url::parse("https://h/20160918/computeCapacityReservations?compartmentId=c1")
            .unwrap();
        assert_eq!(
            request_target(&Method::GET, &url),
            "get /20160918/computeCapacityReservations?compartmentId=c1"
        );
    }

    #[test]
    fn garbage_key_is_an_auth_error() {
        let err = RequestSigner::from_pem(
            "t",
            "u",
            "f",
            &SecretString::new("-----BEGIN NOTHING-----".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, FleetError::AuthError(_)));
    }
}
