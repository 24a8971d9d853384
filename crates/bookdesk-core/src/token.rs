//! Bearer credential decoding.
//!
//! Credentials are JWTs: three dot-separated base64url segments. Only the
//! payload is read; the signature is the server's business. Decoding never
//! fails loudly - a malformed credential decodes to `None` and is treated
//! as expired by `is_expired`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// Claims read from a credential payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Decode the subject and expiry claims of a credential.
///
/// Returns `None` if the credential is not three segments, the payload is
/// not base64url-encoded JSON, or an `exp` claim is present but not numeric.
pub fn decode(credential: &str) -> Option<TokenClaims> {
    let segments: Vec<&str> = credential.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        debug!(segments = segments.len(), "Credential is not a three-segment token");
        return None;
    };

    // Some issuers pad their segments even though JWT forbids it
    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "Credential payload is not base64url");
            return None;
        }
    };

    let payload: Value = match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(_) => {
            debug!("Credential payload is not a JSON object");
            return None;
        }
        Err(e) => {
            debug!(error = %e, "Credential payload is not JSON");
            return None;
        }
    };

    let subject = match payload.get("sub") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    // `exp` is a NumericDate: seconds since the epoch, possibly fractional.
    // A present but non-numeric claim makes the whole credential malformed.
    let expires_at = match payload.get("exp") {
        None => None,
        Some(exp) => match exp.as_f64() {
            Some(secs) => Some(numeric_date(secs)),
            None => {
                debug!("Credential expiry claim is not numeric");
                return None;
            }
        },
    };

    Some(TokenClaims {
        subject,
        expires_at,
    })
}

/// Convert a NumericDate to an instant, clamping values outside the
/// representable range to the earliest or latest instant.
fn numeric_date(secs: f64) -> DateTime<Utc> {
    // `as` saturates, so huge values land on i64::MIN/MAX and fail below
    DateTime::from_timestamp_millis((secs * 1000.0) as i64).unwrap_or(if secs < 0.0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Check whether a credential is expired right now.
pub fn is_expired(credential: &str) -> bool {
    is_expired_at(credential, Utc::now())
}

/// Check whether a credential is expired at `now`.
///
/// Undecodable credentials count as expired. A decodable credential with no
/// `exp` claim never expires. The boundary is inclusive: expiring exactly at
/// `now` is expired.
pub fn is_expired_at(credential: &str, now: DateTime<Utc>) -> bool {
    match decode(credential) {
        None => true,
        Some(TokenClaims {
            expires_at: Some(expires_at),
            ..
        }) => expires_at <= now,
        Some(_) => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    /// Build an unsigned token around the given payload.
    pub(crate) fn make_token(payload: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{}.{}.signature", header, body)
    }

    /// Token for `sub` that expires `minutes` from now (negative for the past).
    pub(crate) fn token_expiring_in(sub: &str, minutes: i64) -> String {
        let exp = (Utc::now() + Duration::minutes(minutes)).timestamp();
        make_token(&json!({ "sub": sub, "exp": exp }))
    }

    #[test]
    fn test_decode_reads_subject_and_expiry() {
        let token = make_token(&json!({ "sub": "ana", "exp": 1_700_000_000 }));
        let claims = decode(&token).expect("token should decode");
        assert_eq!(claims.subject.as_deref(), Some("ana"));
        assert_eq!(
            claims.expires_at,
            DateTime::from_timestamp(1_700_000_000, 0)
        );
    }

    #[test]
    fn test_decode_numeric_subject() {
        let token = make_token(&json!({ "sub": 42 }));
        let claims = decode(&token).expect("token should decode");
        assert_eq!(claims.subject.as_deref(), Some("42"));
        assert_eq!(claims.expires_at, None);
    }

    #[test]
    fn test_no_expiry_claim_never_expires() {
        let token = make_token(&json!({ "sub": "ana" }));
        assert!(!is_expired(&token));
        let far_future = Utc::now() + Duration::days(365 * 100);
        assert!(!is_expired_at(&token, far_future));
    }

    #[test]
    fn test_malformed_tokens_are_expired() {
        let not_json = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode("{}"),
            URL_SAFE_NO_PAD.encode("not json")
        );
        for token in ["", "abc", "a.b", "a.b.c.d", "a.!!!.c", not_json.as_str()] {
            assert!(decode(token).is_none(), "decoded {:?}", token);
            assert!(is_expired(token), "not expired: {:?}", token);
        }
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        let token = make_token(&json!([1, 2, 3]));
        assert!(decode(&token).is_none());
        assert!(is_expired(&token));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
        let token = make_token(&json!({ "exp": 1_700_000_000 }));

        assert!(is_expired_at(&token, now));
        assert!(is_expired_at(&token, now + Duration::seconds(1)));
        assert!(!is_expired_at(&token, now - Duration::seconds(1)));
    }

    #[test]
    fn test_past_and_future_expiry() {
        assert!(is_expired(&token_expiring_in("ana", -5)));
        assert!(!is_expired(&token_expiring_in("ana", 5)));
    }

    #[test]
    fn test_non_numeric_expiry_is_malformed() {
        for exp in [json!("1000"), json!(true), json!(null), json!({ "at": 1 })] {
            let token = make_token(&json!({ "sub": "ana", "exp": exp.clone() }));
            assert!(decode(&token).is_none(), "decoded exp {}", exp);
            assert!(is_expired(&token), "not expired with exp {}", exp);
        }
    }

    #[test]
    fn test_out_of_range_expiry_is_clamped() {
        let far_past = make_token(&json!({ "sub": "ana", "exp": -1.0e15 }));
        let claims = decode(&far_past).expect("numeric expiry should decode");
        assert_eq!(claims.expires_at, Some(DateTime::<Utc>::MIN_UTC));
        assert!(is_expired(&far_past));

        let far_future = make_token(&json!({ "sub": "ana", "exp": 1.0e300 }));
        let claims = decode(&far_future).expect("numeric expiry should decode");
        assert_eq!(claims.expires_at, Some(DateTime::<Utc>::MAX_UTC));
        assert!(!is_expired(&far_future));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let header = URL_SAFE_NO_PAD.encode("{}");
        let body = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"a"}"#);
        let token = format!("{}.{}.sig", header, body);
        assert_eq!(decode(&token).and_then(|c| c.subject).as_deref(), Some("a"));
    }
}
