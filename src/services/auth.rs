// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{employee_repo::NewEmployee, EmployeeRepository, UserRepository},
    models::{
        auth::{
            AuthResponse, ChangePasswordPayload, Claims, EmployeeRole, LoginPayload, Principal,
            PrincipalKind,
        },
        employee::Employee,
    },
};

/// bcrypt fora do runtime async.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Password hashing task failed: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))??;
    Ok(valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    employee_repo: EmployeeRepository,
    jwt_secret: String,
    token_ttl_hours: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        employee_repo: EmployeeRepository,
        jwt_secret: String,
        token_ttl_hours: i64,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            employee_repo,
            jwt_secret,
            token_ttl_hours,
            pool,
        }
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse, AppError> {
        let row = self
            .user_repo
            .find_by_email(payload.user_type, &payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&payload.password, &row.password_hash).await? {
            tracing::warn!("Falha de login para {} ({})", payload.email, payload.user_type.as_str());
            return Err(AppError::InvalidCredentials);
        }

        let principal = Principal::from_row(payload.user_type, row);
        let token = self.create_token(&principal)?;

        tracing::info!("🔑 Login: {} ({})", principal.email, principal.kind.as_str());

        Ok(AuthResponse { token, principal })
    }

    /// Decodifica o token e recarrega o principal; inativo ou removido = 401.
    pub async fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let claims = self.decode_claims(token)?;

        let row = self
            .user_repo
            .find_by_id(claims.kind, claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(Principal::from_row(claims.kind, row))
    }

    pub async fn change_password(
        &self,
        principal: &Principal,
        payload: &ChangePasswordPayload,
    ) -> Result<(), AppError> {
        let row = self
            .user_repo
            .find_by_id(principal.kind, principal.id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !verify_password(&payload.current_password, &row.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = hash_password(&payload.new_password).await?;
        self.user_repo
            .update_password(&self.pool, principal.kind, principal.id, &new_hash)
            .await?;

        tracing::info!("Senha alterada: {} ({})", principal.email, principal.kind.as_str());
        Ok(())
    }

    /// Cria o primeiro admin quando ainda não existe nenhum ativo.
    pub async fn bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Option<Employee>, AppError> {
        if self.user_repo.has_active_admin().await? {
            return Ok(None);
        }

        let password_hash = hash_password(password).await?;
        let email = email.trim().to_lowercase();

        let admin = self
            .employee_repo
            .create(
                &self.pool,
                NewEmployee {
                    full_name,
                    email: &email,
                    phone: None,
                    role: EmployeeRole::Admin,
                    department: Some("Administration"),
                    designation: None,
                    password_hash: &password_hash,
                },
            )
            .await?;

        Ok(Some(admin))
    }

    pub(crate) fn create_token(&self, principal: &Principal) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: principal.id,
            kind: principal.kind,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    pub(crate) fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    fn service(secret: &str, ttl_hours: i64) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(
            UserRepository::new(pool.clone()),
            EmployeeRepository::new(pool.clone()),
            secret.into(),
            ttl_hours,
            pool,
        )
    }

    fn principal() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            kind: PrincipalKind::Tenant,
            role: None,
            unit_id: Some(Uuid::new_v4()),
            full_name: "Ravi".into(),
            email: "ravi@example.com".into(),
        }
    }

    #[tokio::test]
    async fn token_round_trip_keeps_identity() {
        let auth = service("secret", 24);
        let who = principal();

        let token = auth.create_token(&who).unwrap();
        let claims = auth.decode_claims(&token).unwrap();

        assert_eq!(claims.sub, who.id);
        assert_eq!(claims.kind, PrincipalKind::Tenant);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let token = service("one", 24).create_token(&principal()).unwrap();
        let err = service("two", 24).decode_claims(&token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        // validade negativa: já nasce vencido (bem além da tolerância padrão)
        let auth = service("secret", -2);
        let token = auth.create_token(&principal()).unwrap();
        assert!(matches!(auth.decode_claims(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let auth = service("secret", 24);
        assert!(matches!(auth.decode_claims("not-a-token"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hashed = hash_password("s3cret!").await.unwrap();
        assert!(verify_password("s3cret!", &hashed).await.unwrap());
        assert!(!verify_password("wrong", &hashed).await.unwrap());
    }
}
