//! Per-request session context.
//!
//! The anonymous session token travels in a cookie; an upstream auth layer
//! asserts the authenticated user via the `x-user-id` header. Both are
//! extracted once per request and threaded explicitly through the store
//! calls instead of living in shared mutable state.

use std::future::{ready, Ready};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponse, HttpResponseBuilder};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;

/// Cookie carrying the anonymous session token.
pub const SESSION_COOKIE: &str = "sf_session";

/// Header the upstream auth layer uses to assert the authenticated user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Key a cart or wishlist is owned by: the authenticated user when there is
/// one, the anonymous session token otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    User(Uuid),
    Session(Uuid),
}

#[derive(Debug, Clone)]
pub struct ShopperSession {
    pub user_id: Option<Uuid>,
    pub token: Uuid,
    /// Token was allocated during this request; the response must set the
    /// session cookie.
    fresh: bool,
}

impl ShopperSession {
    pub fn identity(&self) -> Identity {
        match self.user_id {
            Some(user_id) => Identity::User(user_id),
            None => Identity::Session(self.token),
        }
    }

    pub fn require_user(&self) -> Result<Uuid, AppError> {
        self.user_id.ok_or(AppError::Unauthorized)
    }

    /// Finish `builder` with a JSON body, setting the session cookie when
    /// the token was force-allocated for this request.
    pub fn respond_json<T: Serialize>(
        &self,
        mut builder: HttpResponseBuilder,
        body: &T,
    ) -> HttpResponse {
        if self.fresh {
            builder.cookie(
                Cookie::build(SESSION_COOKIE, self.token.to_string())
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .finish(),
            );
        }
        builder.json(body)
    }
}

impl FromRequest for ShopperSession {
    type Error = AppError;
    type Future = Ready<Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<ShopperSession, AppError> {
    let user_id = match req.headers().get(USER_ID_HEADER) {
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::Validation("invalid x-user-id header".to_string()))?;
            let parsed = Uuid::parse_str(raw)
                .map_err(|_| AppError::Validation("invalid x-user-id header".to_string()))?;
            Some(parsed)
        }
        None => None,
    };

    // An unparseable token is treated as absent and replaced.
    let existing = req
        .cookie(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());

    Ok(match existing {
        Some(token) => ShopperSession {
            user_id,
            token,
            fresh: false,
        },
        None => ShopperSession {
            user_id,
            token: Uuid::new_v4(),
            fresh: true,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn allocates_token_when_cookie_missing() {
        let req = TestRequest::default().to_http_request();
        let session = extract(&req).expect("extract failed");
        assert!(session.user_id.is_none());
        assert!(session.fresh);
        assert!(matches!(session.identity(), Identity::Session(_)));
    }

    #[test]
    fn reuses_token_from_cookie() {
        let token = Uuid::new_v4();
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, token.to_string()))
            .to_http_request();
        let session = extract(&req).expect("extract failed");
        assert_eq!(session.token, token);
        assert!(!session.fresh);
    }

    #[test]
    fn garbage_cookie_is_replaced() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "not-a-uuid"))
            .to_http_request();
        let session = extract(&req).expect("extract failed");
        assert!(session.fresh);
    }

    #[test]
    fn user_header_wins_over_session_identity() {
        let user = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, user.to_string()))
            .to_http_request();
        let session = extract(&req).expect("extract failed");
        assert_eq!(session.identity(), Identity::User(user));
        assert_eq!(session.require_user().expect("user expected"), user);
    }

    #[test]
    fn malformed_user_header_is_rejected() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "42"))
            .to_http_request();
        assert!(matches!(extract(&req), Err(AppError::Validation(_))));
    }

    #[test]
    fn require_user_fails_for_anonymous() {
        let req = TestRequest::default().to_http_request();
        let session = extract(&req).expect("extract failed");
        assert!(matches!(session.require_user(), Err(AppError::Unauthorized)));
    }
}
