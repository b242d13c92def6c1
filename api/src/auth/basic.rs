//! Basic authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::app::LibraryService;
use crate::config::Config;
use crate::domain::entities::MemberId;
use crate::domain::ports::LibraryRepository;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Member,
}

/// The authenticated caller, injected into request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    pub fn require_manager(&self) -> Result<(), AppError> {
        match self.role {
            Role::Manager => Ok(()),
            Role::Member => Err(AppError::Forbidden),
        }
    }
}

/// Lowercase hex SHA-256 of a password
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn password_matches(password: &str, expected_sha256: &str) -> bool {
    let actual = hash_password(password);
    actual.as_bytes().ct_eq(expected_sha256.as_bytes()).into()
}

/// Split `Basic base64(user:password)` into its parts
fn parse_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Classify a user id and password.
///
/// The configured manager name needs the manager password. Any other id is a
/// member login, accepted iff the member is registered.
pub async fn authenticate<R>(
    config: &Config,
    library: &LibraryService<R>,
    user_id: &str,
    password: &str,
) -> Result<Caller, AppError>
where
    R: LibraryRepository + ?Sized,
{
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Unauthorized);
    }

    if user_id == config.manager_username {
        return match &config.manager_password_sha256 {
            Some(expected) if password_matches(password, expected) => Ok(Caller {
                user_id: user_id.to_string(),
                role: Role::Manager,
            }),
            _ => {
                tracing::warn!(user_id = %user_id, "Manager login refused");
                Err(AppError::Unauthorized)
            }
        };
    }

    if library.member_exists(&MemberId::from(user_id)).await? {
        Ok(Caller {
            user_id: user_id.to_string(),
            role: Role::Member,
        })
    } else {
        tracing::debug!(user_id = %user_id, "Unknown member login");
        Err(AppError::Unauthorized)
    }
}

/// Authentication middleware
///
/// Validates Basic credentials and injects the Caller into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (user_id, password) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_basic)
        .ok_or(AppError::Unauthorized)?;

    let caller = authenticate(&state.config, &*state.library, &user_id, &password).await?;

    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seeded_service, test_config, TEST_MANAGER_PASSWORD};

    fn basic(user: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
    }

    #[test]
    fn hash_is_lowercase_hex_sha256() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn parse_basic_header() {
        assert_eq!(
            parse_basic(&basic("M1", "pa:ss")),
            Some(("M1".to_string(), "pa:ss".to_string()))
        );
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
        assert_eq!(parse_basic(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
    }

    #[tokio::test]
    async fn manager_with_configured_password() {
        let library = seeded_service();
        let caller = authenticate(&test_config(), &*library, "manager", TEST_MANAGER_PASSWORD)
            .await
            .unwrap();

        assert_eq!(caller.role, Role::Manager);
        assert!(caller.require_manager().is_ok());
    }

    #[tokio::test]
    async fn manager_with_wrong_password() {
        let library = seeded_service();
        let result = authenticate(&test_config(), &*library, "manager", "guess").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn manager_login_disabled_without_password() {
        let library = seeded_service();
        let mut config = test_config();
        config.manager_password_sha256 = None;

        let result = authenticate(&config, &*library, "manager", "").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn registered_member_logs_in_with_any_password() {
        let library = seeded_service();
        let caller = authenticate(&test_config(), &*library, "M2", "whatever")
            .await
            .unwrap();

        assert_eq!(
            caller,
            Caller {
                user_id: "M2".to_string(),
                role: Role::Member
            }
        );
        assert!(matches!(caller.require_manager(), Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn unknown_member_is_refused() {
        let library = seeded_service();
        let result = authenticate(&test_config(), &*library, "M404", "").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Manager).unwrap(),
            "\"manager\""
        );
    }
}
