/// Session token utilities for bearer authentication

use thiserror::Error;

/// Length in bytes of a decoded session token.
pub const TOKEN_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing credential")]
    MissingCredential,
    #[error("Unsupported authorization scheme")]
    UnsupportedScheme,
    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),
    #[error("Invalid token length: expected 32 bytes, got {0}")]
    InvalidTokenLength(usize),
}

/// Extract the token from an authorization header value such as `Bearer <token>`.
///
/// The scheme comparison is case-insensitive; surrounding whitespace is ignored.
pub fn extract_bearer<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str, AuthError> {
    let header = header.map(str::trim).filter(|h| !h.is_empty());
    let header = header.ok_or(AuthError::MissingCredential)?;

    let (given_scheme, token) = header
        .split_once(char::is_whitespace)
        .ok_or(AuthError::UnsupportedScheme)?;

    if !given_scheme.eq_ignore_ascii_case(scheme) {
        return Err(AuthError::UnsupportedScheme);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}

/// Decode a session token from base58 string
pub fn decode_token_b58(token: &str) -> Result<[u8; TOKEN_LEN], AuthError> {
    let bytes = bs58::decode(token)
        .into_vec()
        .map_err(|e| AuthError::InvalidBase58(e.to_string()))?;

    if bytes.len() != TOKEN_LEN {
        return Err(AuthError::InvalidTokenLength(bytes.len()));
    }

    let mut result = [0u8; TOKEN_LEN];
    result.copy_from_slice(&bytes);
    Ok(result)
}

/// Parse and validate a credential header in one step.
///
/// Returns the token string as sent by the caller, after checking that it
/// decodes to a well-formed session token.
pub fn parse_credential<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str, AuthError> {
    let token = extract_bearer(header, scheme)?;
    decode_token_b58(token)?;
    Ok(token)
}

/// Generate a random session token as base58 string
pub fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let random_bytes: [u8; TOKEN_LEN] = rng.gen();
    bs58::encode(random_bytes).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(Some("Bearer abc"), "Bearer"), Ok("abc"));
        assert_eq!(extract_bearer(Some("  bearer   abc  "), "Bearer"), Ok("abc"));
    }

    #[test]
    fn test_extract_bearer_rejects_missing_and_malformed() {
        assert_eq!(extract_bearer(None, "Bearer"), Err(AuthError::MissingCredential));
        assert_eq!(extract_bearer(Some("   "), "Bearer"), Err(AuthError::MissingCredential));
        assert_eq!(extract_bearer(Some("Bearer"), "Bearer"), Err(AuthError::UnsupportedScheme));
        assert_eq!(
            extract_bearer(Some("Basic dXNlcjpwYXNz"), "Bearer"),
            Err(AuthError::UnsupportedScheme)
        );
    }

    #[test]
    fn test_decode_token() {
        // 32 zero bytes
        let token = "11111111111111111111111111111111";
        assert_eq!(decode_token_b58(token), Ok([0u8; TOKEN_LEN]));
    }

    #[test]
    fn test_decode_token_rejects_bad_input() {
        assert!(matches!(decode_token_b58("0OIl"), Err(AuthError::InvalidBase58(_))));
        assert_eq!(decode_token_b58("111"), Err(AuthError::InvalidTokenLength(3)));
    }

    #[test]
    fn test_generated_token_roundtrips() {
        let token = generate_token();
        let header = format!("Bearer {}", token);
        assert_eq!(parse_credential(Some(&header), "Bearer"), Ok(token.as_str()));
    }
}
