// src/models/auth.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE principal_kind do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "principal_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Customer,
    Tenant,
    Employee,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Customer => "customer",
            PrincipalKind::Tenant => "tenant",
            PrincipalKind::Employee => "employee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Employee,
    SubAdmin,
    Admin,
}

// --- IDENTIDADE ---

/// Linha crua vinda de customers / tenants / employees, já no mesmo formato.
#[derive(Debug, Clone, FromRow)]
pub struct PrincipalRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub unit_id: Option<Uuid>,
    pub role: Option<EmployeeRole>,
    pub is_active: bool,
}

/// Quem está fazendo a requisição. Recarregado do banco a cada chamada.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: Uuid,
    pub kind: PrincipalKind,
    pub role: Option<EmployeeRole>,
    pub unit_id: Option<Uuid>,
    #[schema(example = "Asha Verma")]
    pub full_name: String,
    #[schema(example = "asha@emperium.city")]
    pub email: String,
}

impl Principal {
    pub fn from_row(kind: PrincipalKind, row: PrincipalRow) -> Self {
        Self {
            id: row.id,
            kind,
            role: row.role,
            unit_id: row.unit_id,
            full_name: row.full_name,
            email: row.email,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.kind == PrincipalKind::Employee
    }

    /// admin ou sub_admin
    pub fn is_manager(&self) -> bool {
        self.is_staff() && matches!(self.role, Some(EmployeeRole::Admin | EmployeeRole::SubAdmin))
    }

    pub fn is_admin(&self) -> bool {
        self.is_staff() && self.role == Some(EmployeeRole::Admin)
    }

    pub fn is(&self, kind: PrincipalKind, id: Uuid) -> bool {
        self.kind == kind && self.id == id
    }

    /// Unidade do morador (customer/tenant). Funcionários não têm.
    pub fn resident_unit(&self) -> Option<Uuid> {
        match self.kind {
            PrincipalKind::Customer | PrincipalKind::Tenant => self.unit_id,
            PrincipalKind::Employee => None,
        }
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub user_type: PrincipalKind,

    #[validate(email(message = "The email address is invalid."))]
    #[schema(example = "admin@emperium.city")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Current password is required."))]
    pub current_password: String,

    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub principal: Principal,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub kind: PrincipalKind,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(kind: PrincipalKind, role: Option<EmployeeRole>) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            kind,
            role,
            unit_id: Some(Uuid::new_v4()),
            full_name: "Test".into(),
            email: "t@example.com".into(),
        }
    }

    #[test]
    fn role_predicates() {
        let admin = principal(PrincipalKind::Employee, Some(EmployeeRole::Admin));
        let sub_admin = principal(PrincipalKind::Employee, Some(EmployeeRole::SubAdmin));
        let employee = principal(PrincipalKind::Employee, Some(EmployeeRole::Employee));
        let customer = principal(PrincipalKind::Customer, None);

        assert!(admin.is_admin() && admin.is_manager() && admin.is_staff());
        assert!(!sub_admin.is_admin() && sub_admin.is_manager());
        assert!(employee.is_staff() && !employee.is_manager());
        assert!(!customer.is_staff() && !customer.is_manager());
    }

    #[test]
    fn only_residents_have_a_unit() {
        let employee = principal(PrincipalKind::Employee, Some(EmployeeRole::Admin));
        let tenant = principal(PrincipalKind::Tenant, None);
        assert_eq!(employee.resident_unit(), None);
        assert_eq!(tenant.resident_unit(), tenant.unit_id);
    }

    #[test]
    fn kinds_serialize_in_snake_case() {
        assert_eq!(serde_json::to_string(&EmployeeRole::SubAdmin).unwrap(), "\"sub_admin\"");
        assert_eq!(serde_json::to_string(&PrincipalKind::Tenant).unwrap(), "\"tenant\"");
    }
}
