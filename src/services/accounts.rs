use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    Collection, Database,
};

use crate::config::BootstrapAdmin;
use crate::database::ADMINS;
use crate::errors::{AppError, Result};
use crate::models::admin::{Admin, AdminClaims, AdminRole};

const TOKEN_LIFETIME_DAYS: i64 = 7;

pub fn hash_password(password: &str) -> Result<String> {
    hash_password_with_cost(password, DEFAULT_COST)
}

fn hash_password_with_cost(password: &str, cost: u32) -> Result<String> {
    Ok(hash(password, cost)?)
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

pub fn issue_token(secret: &str, admin: &Admin) -> Result<String> {
    let id = admin
        .id
        .ok_or_else(|| AppError::internal("cannot issue a token for an unsaved admin"))?;

    let claims = AdminClaims {
        sub: id.to_hex(),
        username: admin.username.clone(),
        role: admin.role,
        exp: (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn decode_token(secret: &str, token: &str) -> Result<AdminClaims> {
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Looks an admin up by username or email for login.
pub async fn find_by_login(db: &Database, login: &str) -> Result<Option<Admin>> {
    let admins: Collection<Admin> = db.collection(ADMINS);
    Ok(admins
        .find_one(doc! { "$or": [{ "username": login }, { "email": login }] })
        .await?)
}

/// Creates the configured super-admin unless an admin with that username exists.
pub async fn ensure_bootstrap_admin(db: &Database, bootstrap: &BootstrapAdmin) -> Result<()> {
    let admins: Collection<Admin> = db.collection(ADMINS);

    if admins
        .find_one(doc! { "username": &bootstrap.username })
        .await?
        .is_some()
    {
        tracing::debug!("Bootstrap admin '{}' already exists", bootstrap.username);
        return Ok(());
    }

    let admin = Admin {
        id: None,
        username: bootstrap.username.clone(),
        email: bootstrap.email.clone(),
        password_hash: hash_password(&bootstrap.password)?,
        role: AdminRole::SuperAdmin,
        created_at: Some(BsonDateTime::now()),
    };
    admins.insert_one(&admin).await?;

    tracing::info!("👤 Created bootstrap super-admin '{}'", bootstrap.username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn saved_admin(password_hash: String) -> Admin {
        Admin {
            id: Some(ObjectId::new()),
            username: "editor".to_string(),
            email: "editor@example.com".to_string(),
            password_hash,
            role: AdminRole::Admin,
            created_at: None,
        }
    }

    #[test]
    fn password_round_trip() {
        let hashed = hash_password_with_cost("password123", 4).unwrap();
        assert!(verify_password("password123", &hashed));
        assert!(!verify_password("password124", &hashed));
        assert!(!verify_password("password123", "not-a-bcrypt-hash"));
    }

    #[test]
    fn token_carries_the_admin_identity() {
        let admin = saved_admin(String::new());
        let token = issue_token("test-secret", &admin).unwrap();

        let claims = decode_token("test-secret", &token).unwrap();
        assert_eq!(claims.sub, admin.id.unwrap().to_hex());
        assert_eq!(claims.username, "editor");
        assert_eq!(claims.role, AdminRole::Admin);
        assert!(claims.exp as i64 > Utc::now().timestamp() + 6 * 24 * 3600);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token("one-secret", &saved_admin(String::new())).unwrap();
        let err = decode_token("another-secret", &token).unwrap_err();
        assert!(matches!(err, AppError::AuthError));
    }

    #[test]
    fn unsaved_admin_gets_no_token() {
        let mut admin = saved_admin(String::new());
        admin.id = None;
        assert!(issue_token("secret", &admin).is_err());
    }
}
