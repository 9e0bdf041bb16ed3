use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::HttpRequest;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use chrono::Duration;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Encodes session tokens into cookies as `token.signature`, where the
/// signature is an HMAC-SHA256 of the token under the session secret.
///
/// The cookie is HTTP-only but not `Secure`, so it also works over plain HTTP.
#[derive(Clone)]
pub struct SessionCookies {
    mac: HmacSha256,
    name: String,
    ttl: Duration,
}

impl SessionCookies {
    pub fn new(secret: &str, name: impl Into<String>, ttl: Duration) -> Result<Self, AppError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::ConfigError(format!("Invalid session secret: {}", e)))?;

        Ok(Self {
            mac,
            name: name.into(),
            ttl,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn sign(&self, token: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(token.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    pub fn encode(&self, token: &str) -> String {
        format!("{}.{}", token, self.sign(token))
    }

    /// Returns the token if the value carries a valid signature.
    pub fn decode(&self, value: &str) -> Option<String> {
        let (token, signature) = value.rsplit_once('.')?;
        let signature = BASE64.decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(token.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(token.to_string())
    }

    pub fn build(&self, token: &str) -> Cookie<'static> {
        Cookie::build(self.name.clone(), self.encode(token))
            .path("/")
            .http_only(true)
            .secure(false)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(self.ttl.num_seconds()))
            .finish()
    }

    /// A cookie that tells the browser to forget the session.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.name.clone(), "")
            .path("/")
            .http_only(true)
            .finish();
        cookie.make_removal();
        cookie
    }

    pub fn token_from_request(&self, req: &HttpRequest) -> Option<String> {
        req.cookie(&self.name)
            .and_then(|cookie| self.decode(cookie.value()))
    }
}
