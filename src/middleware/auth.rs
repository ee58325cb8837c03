use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use mongodb::{bson::doc, Collection};

use crate::database::ADMINS;
use crate::errors::{AppError, Result};
use crate::models::admin::{Admin, CurrentAdmin};
use crate::models::parse_object_id;
use crate::services::accounts::decode_token;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::AuthError)
}

/// Rejects requests without a valid admin token and puts the admin into
/// request extensions for `Extension<CurrentAdmin>`.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())?;
    let claims = decode_token(&state.config.jwt_secret, token)?;
    let id = parse_object_id("admin id", &claims.sub).map_err(|_| AppError::AuthError)?;

    let admins: Collection<Admin> = state.db.collection(ADMINS);
    let admin = admins
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for deleted admin {} rejected", claims.sub);
            AppError::AuthError
        })?;

    request.extensions_mut().insert(CurrentAdmin {
        id,
        username: admin.username,
        email: admin.email,
        role: admin.role,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_the_scheme() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
