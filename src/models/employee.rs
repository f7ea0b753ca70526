// src/models/employee.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::auth::EmployeeRole;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[schema(example = "Suresh Kumar")]
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: EmployeeRole,
    #[schema(example = "Maintenance")]
    pub department: Option<String>,
    #[schema(example = "Electrician")]
    pub designation: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 2, message = "Full name must have at least 2 characters."))]
    pub full_name: String,
    #[validate(email(message = "The email address is invalid."))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number."))]
    pub phone: Option<String>,
    pub role: Option<EmployeeRole>,
    pub department: Option<String>,
    pub designation: Option<String>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 2, message = "Full name must have at least 2 characters."))]
    pub full_name: Option<String>,
    #[validate(email(message = "The email address is invalid."))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number."))]
    pub phone: Option<String>,
    pub role: Option<EmployeeRole>,
    pub department: Option<String>,
    pub designation: Option<String>,
}

impl UpdateEmployeePayload {
    pub fn touches_profile(&self) -> bool {
        self.full_name.is_some()
            || self.email.is_some()
            || self.role.is_some()
            || self.department.is_some()
            || self.designation.is_some()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    pub role: Option<EmployeeRole>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// =============================================================================
//  FÉRIAS / AUSÊNCIAS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "leave_status")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeLeave {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[sqlx(default)]
    pub employee_name: Option<String>,
    #[schema(example = "Casual")]
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeLeave {
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_leave_dates"))]
pub struct ApplyLeavePayload {
    #[validate(length(min = 1, max = 32, message = "Leave type is required."))]
    #[schema(example = "Sick")]
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 500, message = "Reason is too long."))]
    pub reason: Option<String>,
}

fn validate_leave_dates(payload: &ApplyLeavePayload) -> Result<(), ValidationError> {
    if payload.end_date < payload.start_date {
        let mut err = ValidationError::new("leave_dates");
        err.message = Some("End date must not be before start date.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLeavePayload {
    pub status: LeaveStatus,
    #[validate(length(max = 500, message = "Remarks are too long."))]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeaveQuery {
    pub status: Option<LeaveStatus>,
    pub employee_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn leave_dates_must_be_ordered() {
        let ok = ApplyLeavePayload {
            leave_type: "Casual".into(),
            start_date: date("2025-03-10"),
            end_date: date("2025-03-10"),
            reason: None,
        };
        assert!(ok.validate().is_ok());

        let backwards = ApplyLeavePayload {
            leave_type: "Casual".into(),
            start_date: date("2025-03-10"),
            end_date: date("2025-03-09"),
            reason: None,
        };
        assert!(backwards.validate().is_err());
    }

    #[test]
    fn leave_days_are_inclusive() {
        let leave = EmployeeLeave {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            employee_name: None,
            leave_type: "Casual".into(),
            start_date: date("2025-03-10"),
            end_date: date("2025-03-12"),
            reason: None,
            status: LeaveStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(leave.days(), 3);
    }
}
