//! Bearer token payload decoding.
//!
//! The signature is not verified here: the client only needs the claims to decide
//! what to show, and the backend verifies the token on every request.

use backoffice_core::{Identity, TokenDecodeError};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::DateTime;
use serde::Deserialize;

/// Claims schema the payload segment must satisfy.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    role: String,
    user_id: i64,
    #[serde(default)]
    permissions: Option<Vec<String>>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decodes a stored token, treating an absent token as a guest.
pub fn decode_stored_token(token: Option<&str>) -> Result<Option<Identity>, TokenDecodeError> {
    token.map(decode_token).transpose()
}

/// Decodes a bearer token into the identity its payload describes.
pub fn decode_token(token: &str) -> Result<Identity, TokenDecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::SegmentCount(segments.len()));
    }

    let payload = decode_segment(segments[1])?;
    let claims = serde_json::from_slice::<TokenClaims>(&payload)
        .map_err(|error| TokenDecodeError::Structure(error.to_string()))?;

    let email = claims
        .sub
        .or(claims.email)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            TokenDecodeError::Structure("token carries neither 'sub' nor 'email'".to_owned())
        })?;

    let expires_at = claims
        .exp
        .map(|exp| {
            DateTime::from_timestamp(exp, 0).ok_or_else(|| {
                TokenDecodeError::Structure(format!("'exp' claim {exp} is out of range"))
            })
        })
        .transpose()?;

    Ok(Identity::new(
        email,
        claims.role,
        claims.user_id,
        claims.permissions.unwrap_or_default(),
    )
    .with_expiry(expires_at))
}

/// Accepts base64url as issued, and standard base64 with or without padding.
fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenDecodeError> {
    let unpadded = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|_| STANDARD_NO_PAD.decode(unpadded))
        .map_err(|error| TokenDecodeError::Encoding(error.to_string()))
}

#[cfg(test)]
mod tests {
    use backoffice_core::{TokenDecodeError, has_permission};
    use base64::Engine;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

    use super::{decode_stored_token, decode_token};

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn decodes_reference_payload() {
        let token = token_with_payload(
            r#"{"sub":"a@b.com","role":"admin","user_id":7,"permissions":["Create Users","Delete Users"]}"#,
        );

        let identity = decode_token(&token).unwrap_or_else(|error| panic!("{error}"));

        assert_eq!(identity.email(), "a@b.com");
        assert_eq!(identity.role(), "admin");
        assert_eq!(identity.user_id(), 7);
        assert_eq!(identity.permissions().len(), 2);
        assert!(has_permission(Some(&identity), "Delete Users"));
        assert!(!has_permission(Some(&identity), "Create Roles"));
        assert_eq!(identity.expires_at(), None);
    }

    #[test]
    fn missing_or_null_permissions_default_to_empty() {
        for payload in [
            r#"{"sub":"a@b.com","role":"editor","user_id":2}"#,
            r#"{"sub":"a@b.com","role":"editor","user_id":2,"permissions":null}"#,
        ] {
            let identity =
                decode_token(&token_with_payload(payload)).unwrap_or_else(|error| panic!("{error}"));
            assert!(identity.permissions().is_empty());
        }
    }

    #[test]
    fn padded_standard_base64_payload_is_accepted() {
        let payload = STANDARD.encode(r#"{"email":"c@d.io","role":"staff","user_id":3,"exp":1700000000}"#);
        let token = format!("header.{payload}.sig");

        let identity = decode_token(&token).unwrap_or_else(|error| panic!("{error}"));

        assert_eq!(identity.email(), "c@d.io");
        assert_eq!(
            identity.expires_at().map(|value| value.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn wrong_segment_count_is_rejected() {
        assert_eq!(
            decode_token("only.two"),
            Err(TokenDecodeError::SegmentCount(2))
        );
    }

    #[test]
    fn invalid_encoding_is_rejected() {
        assert!(matches!(
            decode_token("a.!!!not-base64!!!.c"),
            Err(TokenDecodeError::Encoding(_))
        ));
    }

    #[test]
    fn schema_violations_are_rejected() {
        for payload in [
            "not json",
            r#"{"sub":"a@b.com","role":"admin"}"#,
            r#"{"sub":"a@b.com","role":"admin","user_id":"seven"}"#,
            r#"{"role":"admin","user_id":7}"#,
            r#"{"sub":"a@b.com","role":"admin","user_id":7,"permissions":"all"}"#,
        ] {
            assert!(
                matches!(
                    decode_token(&token_with_payload(payload)),
                    Err(TokenDecodeError::Structure(_))
                ),
                "payload {payload} should be rejected"
            );
        }
    }

    #[test]
    fn absent_token_is_a_guest() {
        assert_eq!(decode_stored_token(None), Ok(None));
    }
}
