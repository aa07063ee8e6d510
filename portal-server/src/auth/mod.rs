//! Caller identity
//!
//! Authentication happens upstream: the fronting portal terminates the
//! session and forwards the caller as trusted headers. This module parses
//! them into [`CurrentUser`] and guards the API routes.
//!
//! | Header | Required | Meaning |
//! |--------|----------|---------|
//! | `x-portal-user-id` | yes | caller user id (i64) |
//! | `x-portal-group-id` | no | caller's dealer group id (i64) |
//! | `x-portal-role` | no | `admin` grants the admin routes |

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use http::HeaderMap;

use crate::security_log;
use crate::utils::AppError;
use shared::ErrorCode;

/// Identity forwarded by the portal for the current request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub group_id: Option<i64>,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// Paths served without identity: health, the checkout-page config
/// projection and the gateway webhook (it authenticates by signature).
fn is_public_api_route(path: &str) -> bool {
    path == "/api/health"
        || path == "/api/payment-config/public"
        || path.starts_with("/api/payments/stripe/webhook")
}

fn parse_identity(headers: &HeaderMap) -> Result<CurrentUser, AppError> {
    let user_id = headers
        .get("x-portal-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;
    let id: i64 = user_id
        .trim()
        .parse()
        .map_err(|_| AppError::new(ErrorCode::IdentityInvalid))?;

    let group_id = match headers.get("x-portal-group-id") {
        Some(raw) => {
            let parsed = raw
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse::<i64>().ok())
                .ok_or_else(|| AppError::new(ErrorCode::IdentityInvalid))?;
            Some(parsed)
        }
        None => None,
    };

    let role = headers
        .get("x-portal-role")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("user")
        .trim()
        .to_string();

    Ok(CurrentUser { id, group_id, role })
}

/// Identity middleware - requires portal identity headers
///
/// Parses the `x-portal-*` headers and injects [`CurrentUser`] into the
/// request extensions. Public routes, CORS preflights and non-API paths pass
/// through untouched.
pub async fn require_identity(mut req: Request, next: Next) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight OPTIONS requests (skip identity)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes pass through (they 404 normally)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(path) {
        return Ok(next.run(req).await);
    }

    match parse_identity(req.headers()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "identity_missing",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(e)
        }
    }
}

/// Admin middleware - requires the `admin` role
///
/// Checks the [`CurrentUser`] injected by [`require_identity`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            user_role = user.role.clone()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn parses_full_identity() {
        let map = headers(&[
            ("x-portal-user-id", "42"),
            ("x-portal-group-id", "7"),
            ("x-portal-role", "admin"),
        ]);
        let user = parse_identity(&map).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.group_id, Some(7));
        assert!(user.is_admin());
    }

    #[test]
    fn missing_user_id_is_unauthenticated() {
        let err = parse_identity(&headers(&[("x-portal-role", "admin")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[test]
    fn malformed_user_id_is_invalid() {
        let err = parse_identity(&headers(&[("x-portal-user-id", "forty-two")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::IdentityInvalid);
    }

    #[test]
    fn malformed_group_id_is_invalid() {
        let map = headers(&[("x-portal-user-id", "42"), ("x-portal-group-id", "abc")]);
        let err = parse_identity(&map).unwrap_err();
        assert_eq!(err.code, ErrorCode::IdentityInvalid);
    }

    #[test]
    fn role_defaults_to_user() {
        let user = parse_identity(&headers(&[("x-portal-user-id", "42")])).unwrap();
        assert_eq!(user.role, "user");
        assert!(!user.is_admin());
    }

    #[test]
    fn public_routes_skip_identity() {
        assert!(is_public_api_route("/api/health"));
        assert!(is_public_api_route("/api/payment-config/public"));
        assert!(is_public_api_route("/api/payments/stripe/webhook"));
        assert!(is_public_api_route("/api/payments/stripe/webhook/tok_123"));
        assert!(!is_public_api_route("/api/payments"));
        assert!(!is_public_api_route("/api/payment-config"));
    }
}
