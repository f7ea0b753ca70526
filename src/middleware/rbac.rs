// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::Principal,
};

/// 1. O Trait que define um requisito de perfil
pub trait RoleRequirement: Send + Sync + 'static {
    fn allows(principal: &Principal) -> bool;
    fn describe() -> &'static str;
}

/// 2. O Extractor (Guardião): entrega o principal já autorizado
pub struct RequireRole<T>(pub Principal, PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o principal (401 se o guard não rodou)
        let AuthenticatedUser(principal) = AuthenticatedUser::from_request_parts(parts, state).await?;

        // B. Confere o perfil
        if !T::allows(&principal) {
            tracing::warn!("Acesso negado para {}: requer {}", principal.email, T::describe());
            return Err(AppError::forbidden(format!(
                "This action requires {} access.",
                T::describe()
            )));
        }

        Ok(RequireRole(principal, PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PERFIS (TIPOS)
// ---

pub struct Staff;
impl RoleRequirement for Staff {
    fn allows(p: &Principal) -> bool { p.is_staff() }
    fn describe() -> &'static str { "staff" }
}

pub struct Managers;
impl RoleRequirement for Managers {
    fn allows(p: &Principal) -> bool { p.is_manager() }
    fn describe() -> &'static str { "manager" }
}

pub struct AdminOnly;
impl RoleRequirement for AdminOnly {
    fn allows(p: &Principal) -> bool { p.is_admin() }
    fn describe() -> &'static str { "admin" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{EmployeeRole, PrincipalKind};
    use axum::http::Request;
    use uuid::Uuid;

    fn principal(kind: PrincipalKind, role: Option<EmployeeRole>) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            kind,
            role,
            unit_id: None,
            full_name: "Test".into(),
            email: "t@example.com".into(),
        }
    }

    async fn extract<T: RoleRequirement>(who: Option<Principal>) -> Result<RequireRole<T>, AppError> {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        if let Some(p) = who {
            request.extensions_mut().insert(p);
        }
        let (mut parts, _) = request.into_parts();
        RequireRole::<T>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_principal_is_unauthorized() {
        assert!(matches!(extract::<Staff>(None).await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn residents_are_not_staff() {
        let tenant = principal(PrincipalKind::Tenant, None);
        assert!(matches!(extract::<Staff>(Some(tenant)).await, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn sub_admin_is_manager_but_not_admin() {
        let sub = principal(PrincipalKind::Employee, Some(EmployeeRole::SubAdmin));
        assert!(extract::<Managers>(Some(sub.clone())).await.is_ok());
        assert!(matches!(extract::<AdminOnly>(Some(sub)).await, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn guard_hands_back_the_principal() {
        let admin = principal(PrincipalKind::Employee, Some(EmployeeRole::Admin));
        let id = admin.id;
        let guard = extract::<AdminOnly>(Some(admin)).await.unwrap();
        assert_eq!(guard.principal().id, id);
    }
}
