// src/models/vehicle.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::auth::PrincipalKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "vehicle_type")]
pub enum VehicleType {
    #[sqlx(rename = "Two Wheeler")]
    #[serde(rename = "Two Wheeler")]
    TwoWheeler,
    #[sqlx(rename = "Four Wheeler")]
    #[serde(rename = "Four Wheeler")]
    FourWheeler,
    Other,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub unit_id: Uuid,
    #[sqlx(default)]
    pub unit_number: Option<String>,
    pub owner_kind: PrincipalKind,
    pub owner_id: Uuid,
    #[schema(example = "MH12AB1234")]
    pub registration_number: String,
    pub vehicle_type: VehicleType,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    #[schema(example = "B2-045")]
    pub parking_slot: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// "mh 12-ab 1234" → "MH12-AB1234": sem espaços, maiúsculas.
pub fn normalize_registration(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

pub const REGISTRATION_MIN_LEN: usize = 4;
pub const REGISTRATION_MAX_LEN: usize = 20;

// O tamanho vale para a placa já normalizada, não para o texto cru
fn validate_registration(raw: &str) -> Result<(), ValidationError> {
    let len = normalize_registration(raw).chars().count();
    if !(REGISTRATION_MIN_LEN..=REGISTRATION_MAX_LEN).contains(&len) {
        let mut err = ValidationError::new("registration_number");
        err.message = Some("Invalid registration number.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehiclePayload {
    /// Obrigatório para a administração; moradores usam a própria unidade.
    pub unit_id: Option<Uuid>,
    /// Dono explícito (apenas administração).
    pub owner_kind: Option<PrincipalKind>,
    pub owner_id: Option<Uuid>,
    #[validate(custom(function = "validate_registration"))]
    pub registration_number: String,
    pub vehicle_type: VehicleType,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub parking_slot: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehiclePayload {
    #[validate(custom(function = "validate_registration"))]
    pub registration_number: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub parking_slot: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VehicleQuery {
    pub unit_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_normalized() {
        assert_eq!(normalize_registration(" mh 12 ab 1234 "), "MH12AB1234");
        assert_eq!(normalize_registration("KA-01-x-9"), "KA-01-X-9");
    }

    fn create_payload(registration: &str) -> CreateVehiclePayload {
        CreateVehiclePayload {
            unit_id: None,
            owner_kind: None,
            owner_id: None,
            registration_number: registration.into(),
            vehicle_type: VehicleType::FourWheeler,
            make: None,
            model: None,
            color: None,
            parking_slot: None,
        }
    }

    #[test]
    fn registration_length_is_checked_after_normalizing() {
        assert!(create_payload("MH 12 AB 1234").validate().is_ok());
        // Só espaços: vira string vazia
        assert!(create_payload("      ").validate().is_err());
        // "a b c" vira "ABC", curta demais
        assert!(create_payload("a b c").validate().is_err());
        assert!(create_payload(&"X".repeat(21)).validate().is_err());
    }

    #[test]
    fn update_registration_is_checked_only_when_present() {
        let mut payload = UpdateVehiclePayload {
            registration_number: None,
            vehicle_type: None,
            make: None,
            model: None,
            color: None,
            parking_slot: None,
        };
        assert!(payload.validate().is_ok());

        payload.registration_number = Some("   ".into());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn vehicle_type_keeps_spaces() {
        assert_eq!(serde_json::to_string(&VehicleType::TwoWheeler).unwrap(), "\"Two Wheeler\"");
    }
}
