//! OAuth 1.0a request signing for the Twitter API.
//!
//! Every request carries an `Authorization` header built from:
//!
//! ```text
//! base string = METHOD & enc(url) & enc(sorted "k=v" pairs joined by "&")
//! signing key = enc(consumer_secret) & enc(token_secret)
//! signature   = base64(HMAC-SHA1(signing key, base string))
//! ```
//!
//! where `enc` is RFC 3986 percent-encoding. The parameter set contains the
//! `oauth_*` protocol parameters plus query and form-encoded body parameters.
//! JSON bodies are not part of the signature.

use rand::Rng;

/// Header name carrying the OAuth credentials.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// User-context credentials of the posting account.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Per-request values that must be unique (nonce) and fresh (timestamp).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthNonce {
    pub nonce: String,
    pub timestamp: i64,
}

impl OAuthNonce {
    /// Generate a random alphanumeric nonce stamped with the current time.
    pub fn generate() -> Self {
        let nonce: String = rand::rng()
            .sample_iter(rand::distr::Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        Self {
            nonce,
            timestamp: time::OffsetDateTime::now_utc().unix_timestamp(),
        }
    }
}

impl OAuthCredentials {
    /// Build the `Authorization` header value for a request.
    ///
    /// * `method` – upper-case HTTP method.
    /// * `url` – request URL without query string.
    /// * `params` – query and form body parameters, unencoded.
    pub fn authorization_header(&self, method: &str, url: &str, params: &[(&str, &str)]) -> String {
        self.authorization_header_with(method, url, params, &OAuthNonce::generate())
    }

    /// Same as [`authorization_header`](Self::authorization_header) with a
    /// caller-provided nonce and timestamp.
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &OAuthNonce,
    ) -> String {
        let timestamp = nonce.timestamp.to_string();
        let protocol_params = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce.nonce.as_str()),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let base = signature_base_string(
            method,
            url,
            protocol_params.iter().chain(params.iter()).copied(),
        );
        let signature = self.sign(&base);

        let mut header = String::from("OAuth ");
        let fields = protocol_params
            .iter()
            .copied()
            .chain(std::iter::once(("oauth_signature", signature.as_str())))
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        header.push_str(&fields);
        header
    }

    /// `base64(HMAC-SHA1(signing_key, base_string))`.
    pub fn sign(&self, base_string: &str) -> String {
        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.access_token_secret)
        );
        let tag = ring::hmac::sign(
            &ring::hmac::Key::new(
                ring::hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
                signing_key.as_bytes(),
            ),
            base_string.as_bytes(),
        );
        fast32::base64::RFC4648.encode(tag.as_ref())
    }
}

/// Build the signature base string from the method, URL and every signed
/// parameter.
pub fn signature_base_string<'a>(
    method: &str,
    url: &str,
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string)
    )
}

/// RFC 3986 percent-encoding: everything except `A-Z a-z 0-9 - . _ ~`.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
