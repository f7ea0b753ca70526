// src/models/property.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "unit_particulars")]
pub enum UnitParticulars {
    Vacant,
    Occupied,
    #[sqlx(rename = "Under Construction")]
    #[serde(rename = "Under Construction")]
    UnderConstruction,
}

impl UnitParticulars {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitParticulars::Vacant => "Vacant",
            UnitParticulars::Occupied => "Occupied",
            UnitParticulars::UnderConstruction => "Under Construction",
        }
    }
}

// --- UNIDADES ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    #[schema(example = "A-1204")]
    pub unit_number: String,
    #[schema(example = "Tower A")]
    pub tower: Option<String>,
    #[schema(example = 12)]
    pub floor: Option<i32>,
    #[schema(example = "3BHK")]
    pub unit_type: Option<String>,
    #[schema(example = "1450.50")]
    pub area_sqft: Option<Decimal>,
    pub particulars: UnitParticulars,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unidade com o proprietário e o inquilino ativos.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitDetail {
    #[serde(flatten)]
    pub unit: Unit,
    pub customer: Option<Customer>,
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyHistory {
    pub id: Uuid,
    pub unit_id: Uuid,
    #[schema(example = "owner_assigned")]
    pub event: String,
    pub customer_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub details: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// --- MORADORES ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub unit_id: Uuid,
    #[sqlx(default)]
    pub unit_number: Option<String>,
    #[schema(example = "Rohan Mehta")]
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub unit_id: Uuid,
    #[sqlx(default)]
    pub unit_number: Option<String>,
    pub customer_id: Option<Uuid>,
    #[schema(example = "Kavya Nair")]
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitPayload {
    #[validate(length(min = 1, max = 32, message = "Unit number is required."))]
    #[schema(example = "A-1204")]
    pub unit_number: String,
    pub tower: Option<String>,
    pub floor: Option<i32>,
    pub unit_type: Option<String>,
    #[validate(custom(function = "validate_area"))]
    pub area_sqft: Option<Decimal>,
    pub particulars: Option<UnitParticulars>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitPayload {
    pub tower: Option<String>,
    pub floor: Option<i32>,
    pub unit_type: Option<String>,
    #[validate(custom(function = "validate_area"))]
    pub area_sqft: Option<Decimal>,
    pub particulars: Option<UnitParticulars>,
}

fn validate_area(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("Area must be greater than zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    pub unit_id: Uuid,
    #[validate(length(min = 2, message = "Full name must have at least 2 characters."))]
    pub full_name: String,
    #[validate(email(message = "The email address is invalid."))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number."))]
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number."))]
    pub alternate_phone: Option<String>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 2, message = "Full name must have at least 2 characters."))]
    pub full_name: Option<String>,
    #[validate(email(message = "The email address is invalid."))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number."))]
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number."))]
    pub alternate_phone: Option<String>,
}

impl UpdateCustomerPayload {
    /// Campos que só a administração pode alterar.
    pub fn touches_identity(&self) -> bool {
        self.full_name.is_some() || self.email.is_some()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_lease_dates"))]
pub struct CreateTenantPayload {
    pub unit_id: Uuid,
    #[validate(length(min = 2, message = "Full name must have at least 2 characters."))]
    pub full_name: String,
    #[validate(email(message = "The email address is invalid."))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number."))]
    pub phone: Option<String>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
}

fn validate_lease_dates(payload: &CreateTenantPayload) -> Result<(), ValidationError> {
    check_lease(payload.lease_start, payload.lease_end)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_lease_update"))]
pub struct UpdateTenantPayload {
    #[validate(length(min = 2, message = "Full name must have at least 2 characters."))]
    pub full_name: Option<String>,
    #[validate(email(message = "The email address is invalid."))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number."))]
    pub phone: Option<String>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
}

impl UpdateTenantPayload {
    pub fn touches_identity(&self) -> bool {
        self.full_name.is_some()
            || self.email.is_some()
            || self.lease_start.is_some()
            || self.lease_end.is_some()
    }

    /// Datas do contrato depois do update: o que não veio no payload fica como está.
    pub fn merged_lease(&self, current: &Tenant) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (
            self.lease_start.or(current.lease_start),
            self.lease_end.or(current.lease_end),
        )
    }

    pub fn check_merged_lease(&self, current: &Tenant) -> Result<(), ValidationError> {
        let (start, end) = self.merged_lease(current);
        check_lease(start, end)
    }
}

fn validate_lease_update(payload: &UpdateTenantPayload) -> Result<(), ValidationError> {
    check_lease(payload.lease_start, payload.lease_end)
}

fn check_lease(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            let mut err = ValidationError::new("lease_dates");
            err.message = Some("Lease end must not be before lease start.".into());
            return Err(err);
        }
    }
    Ok(())
}

// --- FILTROS ---

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UnitQuery {
    pub search: Option<String>,
    pub particulars: Option<UnitParticulars>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ResidentQuery {
    pub unit_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant_payload(start: &str, end: &str) -> CreateTenantPayload {
        CreateTenantPayload {
            unit_id: Uuid::new_v4(),
            full_name: "Kavya Nair".into(),
            email: "kavya@example.com".into(),
            phone: None,
            lease_start: NaiveDate::parse_from_str(start, "%Y-%m-%d").ok(),
            lease_end: NaiveDate::parse_from_str(end, "%Y-%m-%d").ok(),
            password: "secret1".into(),
        }
    }

    #[test]
    fn lease_end_before_start_is_rejected() {
        assert!(tenant_payload("2025-01-01", "2025-12-31").validate().is_ok());
        assert!(tenant_payload("2025-06-01", "2025-01-01").validate().is_err());
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stored_tenant(start: Option<&str>, end: Option<&str>) -> Tenant {
        let now = Utc::now();
        Tenant {
            id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            unit_number: None,
            customer_id: None,
            full_name: "Kavya Nair".into(),
            email: "kavya@example.com".into(),
            phone: None,
            lease_start: start.map(date),
            lease_end: end.map(date),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn lease_update(start: Option<&str>, end: Option<&str>) -> UpdateTenantPayload {
        UpdateTenantPayload {
            full_name: None,
            email: None,
            phone: None,
            lease_start: start.map(date),
            lease_end: end.map(date),
        }
    }

    #[test]
    fn partial_lease_update_is_checked_against_stored_dates() {
        let tenant = stored_tenant(Some("2025-01-01"), Some("2025-12-31"));

        // Só o fim, antes do início gravado
        let payload = lease_update(None, Some("2024-06-30"));
        assert!(payload.validate().is_ok());
        assert!(payload.check_merged_lease(&tenant).is_err());

        // Só o início, depois do fim gravado
        let payload = lease_update(Some("2026-02-01"), None);
        assert!(payload.check_merged_lease(&tenant).is_err());

        let payload = lease_update(None, Some("2026-12-31"));
        assert_eq!(payload.merged_lease(&tenant), (Some(date("2025-01-01")), Some(date("2026-12-31"))));
        assert!(payload.check_merged_lease(&tenant).is_ok());
    }

    #[test]
    fn open_ended_lease_accepts_any_start() {
        let tenant = stored_tenant(None, None);
        assert!(lease_update(Some("2030-01-01"), None).check_merged_lease(&tenant).is_ok());
        assert!(lease_update(None, Some("2020-01-01")).check_merged_lease(&tenant).is_ok());
    }

    #[test]
    fn particulars_keep_their_vocabulary() {
        let json = serde_json::to_string(&UnitParticulars::UnderConstruction).unwrap();
        assert_eq!(json, "\"Under Construction\"");
        let parsed: UnitParticulars = serde_json::from_str("\"Occupied\"").unwrap();
        assert_eq!(parsed, UnitParticulars::Occupied);
    }

    #[test]
    fn negative_area_is_invalid() {
        let payload = CreateUnitPayload {
            unit_number: "B-101".into(),
            tower: None,
            floor: None,
            unit_type: None,
            area_sqft: Some(Decimal::new(-10, 0)),
            particulars: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn residents_cannot_touch_identity_fields() {
        let payload = UpdateCustomerPayload {
            full_name: None,
            email: None,
            phone: Some("9876543210".into()),
            alternate_phone: None,
        };
        assert!(!payload.touches_identity());
    }
}
