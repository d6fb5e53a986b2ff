//! Access token inspection
//!
//! The client never verifies signatures; it only reads `exp` from the payload to decide
//! whether a token should be refreshed before it is sent.

use crate::types::TokenClaims;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Refresh when the access token has this much validity left, or less
pub const REFRESH_THRESHOLD: Duration = Duration::from_secs(5 * 60);

/// Decode the claims (second) segment of a JWT.
///
/// Segments after the second are not inspected. Returns `None` when there is no second
/// segment or it is not base64 JSON.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;

    serde_json::from_slice(&bytes).ok()
}

/// Check whether `token` expires within `threshold` of now.
///
/// Malformed tokens and tokens without `exp` count as expired.
pub fn is_near_expiry(token: &str, threshold: Duration) -> bool {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64;

    is_near_expiry_at(token, now_ms, threshold)
}

/// Same as [`is_near_expiry`] with an explicit clock.
pub fn is_near_expiry_at(token: &str, now_ms: i64, threshold: Duration) -> bool {
    match decode_claims(token).and_then(|claims| claims.expires_at_ms()) {
        Some(expires_at_ms) => now_ms.saturating_add(threshold.as_millis() as i64) >= expires_at_ms,
        None => true,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Build an unsigned JWT carrying `claims`.
    pub(crate) fn make_token(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    /// Token expiring `secs_from_now` seconds from the real clock
    pub(crate) fn token_expiring_in(secs_from_now: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        make_token(json!({ "sub": "1", "exp": now + secs_from_now }))
    }

    const NOW_MS: i64 = 1_700_000_000_000;

    #[test]
    fn test_fresh_token_is_not_near_expiry() {
        let token = make_token(json!({ "exp": NOW_MS / 1000 + 301 }));
        assert!(!is_near_expiry_at(&token, NOW_MS, REFRESH_THRESHOLD));

        let token = make_token(json!({ "exp": NOW_MS / 1000 + 3600 }));
        assert!(!is_near_expiry_at(&token, NOW_MS, REFRESH_THRESHOLD));
    }

    #[test]
    fn test_token_within_threshold_is_near_expiry() {
        // Exactly at the threshold boundary
        let token = make_token(json!({ "exp": NOW_MS / 1000 + 300 }));
        assert!(is_near_expiry_at(&token, NOW_MS, REFRESH_THRESHOLD));

        let token = make_token(json!({ "exp": NOW_MS / 1000 + 10 }));
        assert!(is_near_expiry_at(&token, NOW_MS, REFRESH_THRESHOLD));

        let token = make_token(json!({ "exp": NOW_MS / 1000 - 10 }));
        assert!(is_near_expiry_at(&token, NOW_MS, REFRESH_THRESHOLD));
    }

    #[test]
    fn test_malformed_tokens_are_near_expiry() {
        assert!(is_near_expiry_at("", NOW_MS, REFRESH_THRESHOLD));
        assert!(is_near_expiry_at("not-a-jwt", NOW_MS, REFRESH_THRESHOLD));
        assert!(is_near_expiry_at("a.%%%.c", NOW_MS, REFRESH_THRESHOLD));

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("plain text"));
        assert!(is_near_expiry_at(&not_json, NOW_MS, REFRESH_THRESHOLD));

        let no_exp = make_token(json!({ "sub": "42" }));
        assert!(is_near_expiry_at(&no_exp, NOW_MS, REFRESH_THRESHOLD));
    }

    #[test]
    fn test_decode_accepts_padded_payload() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":12}"#);
        let claims = decode_claims(&format!("h.{payload}.s")).unwrap();
        assert_eq!(claims.exp, Some(12.0));
    }

    #[test]
    fn test_fractional_exp() {
        let token = make_token(json!({ "exp": (NOW_MS / 1000) as f64 + 3600.5 }));
        assert!(!is_near_expiry_at(&token, NOW_MS, REFRESH_THRESHOLD));
        assert_eq!(decode_claims(&token).unwrap().expires_at_ms(), Some(NOW_MS + 3_600_500));

        let token = make_token(json!({ "exp": (NOW_MS / 1000) as f64 + 120.25 }));
        assert!(is_near_expiry_at(&token, NOW_MS, REFRESH_THRESHOLD));
    }

    #[test]
    fn test_only_second_segment_is_read() {
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, NOW_MS / 1000 + 3600));
        assert!(!is_near_expiry_at(&format!("h.{payload}"), NOW_MS, REFRESH_THRESHOLD));
        assert!(!is_near_expiry_at(&format!("h.{payload}.s.extra"), NOW_MS, REFRESH_THRESHOLD));
    }

    #[test]
    fn test_real_clock() {
        assert!(!is_near_expiry(&token_expiring_in(3600), REFRESH_THRESHOLD));
        assert!(is_near_expiry(&token_expiring_in(60), REFRESH_THRESHOLD));
    }
}
