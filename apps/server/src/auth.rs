use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use dailysteps_core::identity::{require_owner, IdentityProvider, OwnerId};

use crate::error::ApiError;
use crate::main_lib::AppState;

/// Verifies bearer tokens issued by the external identity provider.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Stable owner id.
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

impl JwtVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!("Rejected bearer token: {:?}", err.kind());
                AuthError::Unauthorized
            })
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

/// Identity resolved from a verified token, stored as a request extension.
#[derive(Clone, Debug)]
pub struct TokenIdentity {
    subject: String,
}

impl IdentityProvider for TokenIdentity {
    fn current_owner_id(&self) -> Option<String> {
        Some(self.subject.clone())
    }
}

/// Extractor for the authenticated owner.
pub struct Owner(pub OwnerId);

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<TokenIdentity>()
            .ok_or(dailysteps_core::Error::Unauthenticated)?;
        Ok(Owner(require_owner(identity)?))
    }
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let claims = state.jwt.validate_token(token)?;
    request.extensions_mut().insert(TokenIdentity {
        subject: claims.sub,
    });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn token(sub: &str, exp_offset: i64, secret: &[u8]) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let verifier = JwtVerifier::new(SECRET);
        let claims = verifier.validate_token(&token("u1", 3600, SECRET)).unwrap();
        assert_eq!(claims.sub, "u1");
    }

    #[test]
    fn test_expired_or_foreign_tokens_are_rejected() {
        let verifier = JwtVerifier::new(SECRET);
        assert!(matches!(
            verifier.validate_token(&token("u1", -3600, SECRET)),
            Err(AuthError::Unauthorized)
        ));
        let other = b"ffffffffffffffffffffffffffffffff";
        assert!(matches!(
            verifier.validate_token(&token("u1", 3600, other)),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            verifier.validate_token("not-a-jwt"),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_decode_secret_key() {
        let encoded = BASE64.encode(SECRET);
        assert_eq!(decode_secret_key(&encoded).unwrap(), SECRET.to_vec());
        assert!(decode_secret_key("").is_err());
        assert!(decode_secret_key("c2hvcnQ=").is_err());
    }

    #[test]
    fn test_blank_subject_is_unauthenticated() {
        let identity = TokenIdentity {
            subject: "  ".to_string(),
        };
        assert!(require_owner(&identity).is_err());
    }
}
