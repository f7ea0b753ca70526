// src/services/access.rs
//
// Regras de posse e visibilidade. Funções puras: recebem o principal e a
// linha já carregada. As de visibilidade respondem sim/não e o serviço decide
// o status; as regras de entrada (abertura, revisão, cadastro) já devolvem o
// AppError certo.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{EmployeeRole, Principal, PrincipalKind},
        complaint::{Complaint, ComplaintAction, InternalComplaint},
        employee::{Employee, EmployeeLeave, LeaveStatus, UpdateEmployeePayload},
        property::{Customer, Tenant},
        vehicle::{CreateVehiclePayload, Vehicle},
    },
};

// =============================================================================
//  IMÓVEIS E MORADORES
// =============================================================================

pub fn can_view_unit(p: &Principal, unit_id: Uuid) -> bool {
    p.is_staff() || p.resident_unit() == Some(unit_id)
}

pub fn can_view_unit_history(p: &Principal, unit_id: Uuid) -> bool {
    p.is_manager() || (p.kind == PrincipalKind::Customer && p.unit_id == Some(unit_id))
}

pub fn can_view_customer(p: &Principal, customer: &Customer) -> bool {
    p.is_staff() || p.is(PrincipalKind::Customer, customer.id)
}

fn owns_unit_of(p: &Principal, unit_id: Uuid) -> bool {
    p.kind == PrincipalKind::Customer && p.unit_id == Some(unit_id)
}

pub fn can_view_tenant(p: &Principal, tenant: &Tenant) -> bool {
    p.is_staff() || p.is(PrincipalKind::Tenant, tenant.id) || owns_unit_of(p, tenant.unit_id)
}

/// Editar dados do contrato ou remover o inquilino.
pub fn can_manage_tenant(p: &Principal, tenant: &Tenant) -> bool {
    p.is_manager() || owns_unit_of(p, tenant.unit_id)
}

pub fn can_register_tenant_for(p: &Principal, unit_id: Uuid) -> bool {
    p.is_manager() || owns_unit_of(p, unit_id)
}

// =============================================================================
//  RECLAMAÇÕES
// =============================================================================

pub fn can_view_complaint(p: &Principal, c: &Complaint) -> bool {
    match p.kind {
        PrincipalKind::Employee => p.is_manager() || c.assigned_to == Some(p.id),
        PrincipalKind::Customer => p.unit_id == Some(c.unit_id),
        PrincipalKind::Tenant => c.raised_by_kind == PrincipalKind::Tenant && c.raised_by_id == p.id,
    }
}

fn is_assignee(p: &Principal, assigned_to: Option<Uuid>) -> bool {
    p.is_staff() && assigned_to == Some(p.id)
}

/// Proprietário da unidade ou inquilino que abriu a reclamação.
fn is_complainant(p: &Principal, c: &Complaint) -> bool {
    match p.kind {
        PrincipalKind::Customer => c.customer_id == Some(p.id) || p.unit_id == Some(c.unit_id),
        PrincipalKind::Tenant => c.raised_by_kind == PrincipalKind::Tenant && c.raised_by_id == p.id,
        PrincipalKind::Employee => false,
    }
}

/// Quem pode disparar cada ação do ciclo de vida (o status é checado à parte).
pub fn may_act_on_complaint(p: &Principal, action: ComplaintAction, c: &Complaint) -> bool {
    match action {
        ComplaintAction::Assign => p.is_manager(),
        ComplaintAction::Schedule | ComplaintAction::Start | ComplaintAction::Resolve => {
            p.is_manager() || is_assignee(p, c.assigned_to)
        }
        ComplaintAction::Close | ComplaintAction::Reopen => p.is_manager() || is_complainant(p, c),
    }
}

/// Unidade da nova reclamação: morador usa a própria, equipe precisa informar.
pub fn complaint_unit(p: &Principal, requested: Option<Uuid>) -> Result<Uuid, AppError> {
    match p.resident_unit() {
        Some(own) if requested.is_some_and(|r| r != own) => {
            Err(AppError::forbidden("You can only raise complaints for your own unit."))
        }
        Some(own) => Ok(own),
        None if p.is_staff() => requested.ok_or_else(|| AppError::bad_request("unitId is required.")),
        None => Err(AppError::forbidden("Your account is not linked to a unit.")),
    }
}

/// `sub_parent`: categoria dona da subcategoria escolhida, se houver.
/// Sem categoria explícita, herda a da subcategoria.
pub fn complaint_category(requested: Option<Uuid>, sub_parent: Option<Uuid>) -> Result<Option<Uuid>, AppError> {
    match (requested, sub_parent) {
        (Some(cat), Some(parent)) if cat != parent => {
            Err(AppError::bad_request("The sub-category does not belong to the category."))
        }
        (Some(cat), _) => Ok(Some(cat)),
        (None, parent) => Ok(parent),
    }
}

pub fn can_view_internal_complaint(p: &Principal, c: &InternalComplaint) -> bool {
    p.is_manager() || (p.is_staff() && (c.raised_by == p.id || c.assigned_to == Some(p.id)))
}

pub fn may_act_on_internal(p: &Principal, action: ComplaintAction, c: &InternalComplaint) -> bool {
    match action {
        ComplaintAction::Assign => p.is_manager(),
        ComplaintAction::Schedule | ComplaintAction::Start | ComplaintAction::Resolve => {
            p.is_manager() || is_assignee(p, c.assigned_to)
        }
        ComplaintAction::Close | ComplaintAction::Reopen => {
            p.is_manager() || (p.is_staff() && c.raised_by == p.id)
        }
    }
}

// =============================================================================
//  FUNCIONÁRIOS E FÉRIAS
// =============================================================================

/// admin edita tudo; sub_admin só funcionários comuns e sem trocar o papel;
/// o próprio funcionário só o telefone.
pub fn can_update_employee(p: &Principal, target: &Employee, payload: &UpdateEmployeePayload) -> bool {
    if p.is_admin() {
        return true;
    }
    if p.is_manager() && target.role == EmployeeRole::Employee && payload.role.is_none() {
        return true;
    }
    p.is(PrincipalKind::Employee, target.id) && !payload.touches_profile()
}

pub fn check_leave_review(p: &Principal, leave: &EmployeeLeave) -> Result<(), AppError> {
    if leave.employee_id == p.id {
        return Err(AppError::forbidden("You cannot review your own leave request."));
    }
    if leave.status != LeaveStatus::Pending {
        return Err(AppError::conflict("Only pending leave requests can be reviewed."));
    }
    Ok(())
}

// =============================================================================
//  KYC
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KycAccess {
    None,
    Read,
    Write,
}

/// `entity_unit`: unidade do inquilino dono do registro (só relevante
/// quando o dono é um tenant).
pub fn kyc_access(
    p: &Principal,
    entity_type: PrincipalKind,
    entity_id: Uuid,
    entity_unit: Option<Uuid>,
) -> KycAccess {
    if p.is_manager() || p.is(entity_type, entity_id) {
        return KycAccess::Write;
    }
    if entity_type == PrincipalKind::Tenant && entity_unit.is_some() && p.kind == PrincipalKind::Customer {
        if p.unit_id == entity_unit {
            return KycAccess::Write;
        }
    }
    if p.is_staff() {
        return KycAccess::Read;
    }
    KycAccess::None
}

// =============================================================================
//  VEÍCULOS
// =============================================================================

pub fn can_view_vehicle(p: &Principal, v: &Vehicle) -> bool {
    p.is_staff() || p.resident_unit() == Some(v.unit_id)
}

pub fn can_manage_vehicle(p: &Principal, v: &Vehicle) -> bool {
    p.is_manager() || p.is(v.owner_kind, v.owner_id)
}

/// Unidade e dono do novo veículo. Para a administração o serviço ainda
/// confere no banco se a unidade existe e se o dono mora nela.
pub fn vehicle_placement(
    p: &Principal,
    payload: &CreateVehiclePayload,
) -> Result<(Uuid, PrincipalKind, Uuid), AppError> {
    if p.is_manager() {
        let unit_id = payload
            .unit_id
            .ok_or_else(|| AppError::bad_request("unitId is required."))?;
        let (kind, id) = payload
            .owner_kind
            .zip(payload.owner_id)
            .ok_or_else(|| AppError::bad_request("ownerKind and ownerId are required."))?;
        return Ok((unit_id, kind, id));
    }

    let own = p
        .resident_unit()
        .ok_or_else(|| AppError::forbidden("Only managers and residents can register vehicles."))?;
    if payload.unit_id.is_some_and(|u| u != own) {
        return Err(AppError::forbidden("You can only register vehicles for your own unit."));
    }
    Ok((own, p.kind, p.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        complaint::{ComplaintPriority, ComplaintStatus},
        vehicle::VehicleType,
    };
    use axum::http::StatusCode;
    use chrono::{NaiveDate, Utc};

    fn status_of<T>(result: Result<T, AppError>) -> Option<StatusCode> {
        result.err().map(|e| e.status_code())
    }

    fn person(kind: PrincipalKind, role: Option<EmployeeRole>, unit_id: Option<Uuid>) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            kind,
            role,
            unit_id,
            full_name: "Someone".into(),
            email: "someone@example.com".into(),
        }
    }

    struct Cast {
        admin: Principal,
        sub_admin: Principal,
        assignee: Principal,
        other_employee: Principal,
        owner: Principal,
        tenant: Principal,
        other_tenant_same_unit: Principal,
        stranger: Principal,
        unit_id: Uuid,
    }

    fn cast() -> Cast {
        let unit_id = Uuid::new_v4();
        Cast {
            admin: person(PrincipalKind::Employee, Some(EmployeeRole::Admin), None),
            sub_admin: person(PrincipalKind::Employee, Some(EmployeeRole::SubAdmin), None),
            assignee: person(PrincipalKind::Employee, Some(EmployeeRole::Employee), None),
            other_employee: person(PrincipalKind::Employee, Some(EmployeeRole::Employee), None),
            owner: person(PrincipalKind::Customer, None, Some(unit_id)),
            tenant: person(PrincipalKind::Tenant, None, Some(unit_id)),
            other_tenant_same_unit: person(PrincipalKind::Tenant, None, Some(unit_id)),
            stranger: person(PrincipalKind::Customer, None, Some(Uuid::new_v4())),
            unit_id,
        }
    }

    fn complaint(cast: &Cast) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            ticket_number: 1,
            unit_id: cast.unit_id,
            unit_number: "A-101".into(),
            customer_id: Some(cast.owner.id),
            tenant_id: Some(cast.tenant.id),
            raised_by_kind: PrincipalKind::Tenant,
            raised_by_id: cast.tenant.id,
            category_id: None,
            category_name: None,
            sub_category_id: None,
            sub_category_name: None,
            title: "Leak".into(),
            description: "Kitchen sink".into(),
            priority: ComplaintPriority::Normal,
            status: ComplaintStatus::Assigned,
            assigned_to: Some(cast.assignee.id),
            assignee_name: None,
            scheduled_at: None,
            resolution_notes: None,
            resolved_at: None,
            closed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn complaint_visibility_by_role() {
        let cast = cast();
        let c = complaint(&cast);

        assert!(can_view_complaint(&cast.admin, &c));
        assert!(can_view_complaint(&cast.sub_admin, &c));
        assert!(can_view_complaint(&cast.assignee, &c));
        assert!(!can_view_complaint(&cast.other_employee, &c));
        assert!(can_view_complaint(&cast.owner, &c));
        assert!(can_view_complaint(&cast.tenant, &c));
        assert!(!can_view_complaint(&cast.other_tenant_same_unit, &c));
        assert!(!can_view_complaint(&cast.stranger, &c));
    }

    #[test]
    fn complaint_action_matrix() {
        use ComplaintAction::*;
        let cast = cast();
        let c = complaint(&cast);

        // (quem, ação, permitido?)
        let matrix: Vec<(&Principal, ComplaintAction, bool)> = vec![
            (&cast.admin, Assign, true),
            (&cast.sub_admin, Assign, true),
            (&cast.assignee, Assign, false),
            (&cast.owner, Assign, false),
            (&cast.assignee, Schedule, true),
            (&cast.other_employee, Schedule, false),
            (&cast.tenant, Schedule, false),
            (&cast.assignee, Start, true),
            (&cast.other_employee, Start, false),
            (&cast.assignee, Resolve, true),
            (&cast.owner, Resolve, false),
            (&cast.sub_admin, Resolve, true),
            (&cast.owner, Close, true),
            (&cast.tenant, Close, true),
            (&cast.other_tenant_same_unit, Close, false),
            (&cast.assignee, Close, false),
            (&cast.admin, Close, true),
            (&cast.stranger, Close, false),
            (&cast.owner, Reopen, true),
            (&cast.tenant, Reopen, true),
            (&cast.other_employee, Reopen, false),
        ];

        for (who, action, allowed) in matrix {
            assert_eq!(
                may_act_on_complaint(who, action, &c),
                allowed,
                "{:?}/{:?} on {:?}",
                who.kind,
                who.role,
                action
            );
        }
    }

    #[test]
    fn unassigned_complaint_has_no_worker() {
        let cast = cast();
        let mut c = complaint(&cast);
        c.assigned_to = None;
        assert!(!may_act_on_complaint(&cast.assignee, ComplaintAction::Start, &c));
        assert!(!can_view_complaint(&cast.assignee, &c));
    }

    #[test]
    fn kyc_access_levels() {
        let cast = cast();
        let tenant_id = cast.tenant.id;

        assert_eq!(kyc_access(&cast.admin, PrincipalKind::Tenant, tenant_id, Some(cast.unit_id)), KycAccess::Write);
        assert_eq!(kyc_access(&cast.tenant, PrincipalKind::Tenant, tenant_id, Some(cast.unit_id)), KycAccess::Write);
        assert_eq!(kyc_access(&cast.owner, PrincipalKind::Tenant, tenant_id, Some(cast.unit_id)), KycAccess::Write);
        assert_eq!(kyc_access(&cast.stranger, PrincipalKind::Tenant, tenant_id, Some(cast.unit_id)), KycAccess::None);
        assert_eq!(kyc_access(&cast.assignee, PrincipalKind::Tenant, tenant_id, Some(cast.unit_id)), KycAccess::Read);
        assert_eq!(
            kyc_access(&cast.other_tenant_same_unit, PrincipalKind::Tenant, tenant_id, Some(cast.unit_id)),
            KycAccess::None
        );

        // funcionário cuida dos próprios documentos
        assert_eq!(
            kyc_access(&cast.assignee, PrincipalKind::Employee, cast.assignee.id, None),
            KycAccess::Write
        );
        // proprietário não mexe nos documentos de outro proprietário
        assert_eq!(
            kyc_access(&cast.owner, PrincipalKind::Customer, cast.stranger.id, None),
            KycAccess::None
        );
    }

    #[test]
    fn tenant_management_belongs_to_owner_and_managers() {
        let cast = cast();
        let tenant = Tenant {
            id: cast.tenant.id,
            unit_id: cast.unit_id,
            unit_number: None,
            customer_id: Some(cast.owner.id),
            full_name: "T".into(),
            email: "t@example.com".into(),
            phone: None,
            lease_start: None,
            lease_end: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(can_manage_tenant(&cast.owner, &tenant));
        assert!(can_manage_tenant(&cast.sub_admin, &tenant));
        assert!(!can_manage_tenant(&cast.tenant, &tenant));
        assert!(!can_manage_tenant(&cast.assignee, &tenant));
        assert!(can_view_tenant(&cast.tenant, &tenant));
        assert!(can_view_tenant(&cast.assignee, &tenant));
        assert!(!can_view_tenant(&cast.stranger, &tenant));
        assert!(!can_view_tenant(&cast.other_tenant_same_unit, &tenant));
    }

    #[test]
    fn vehicles_are_managed_by_owner_or_manager() {
        let cast = cast();
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            unit_id: cast.unit_id,
            unit_number: None,
            owner_kind: PrincipalKind::Tenant,
            owner_id: cast.tenant.id,
            registration_number: "MH12AB1234".into(),
            vehicle_type: VehicleType::FourWheeler,
            make: None,
            model: None,
            color: None,
            parking_slot: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(can_manage_vehicle(&cast.tenant, &vehicle));
        assert!(can_manage_vehicle(&cast.admin, &vehicle));
        assert!(!can_manage_vehicle(&cast.owner, &vehicle));
        assert!(!can_manage_vehicle(&cast.assignee, &vehicle));
        assert!(can_view_vehicle(&cast.owner, &vehicle));
        assert!(can_view_vehicle(&cast.assignee, &vehicle));
        assert!(!can_view_vehicle(&cast.stranger, &vehicle));
    }

    #[test]
    fn unit_history_is_owner_and_managers_only() {
        let cast = cast();
        assert!(can_view_unit_history(&cast.owner, cast.unit_id));
        assert!(can_view_unit_history(&cast.sub_admin, cast.unit_id));
        assert!(!can_view_unit_history(&cast.tenant, cast.unit_id));
        assert!(!can_view_unit_history(&cast.assignee, cast.unit_id));
        assert!(can_view_unit(&cast.tenant, cast.unit_id));
        assert!(!can_view_unit(&cast.stranger, cast.unit_id));
    }

    #[test]
    fn complaint_unit_rules() {
        let cast = cast();
        let elsewhere = Uuid::new_v4();

        // (quem, unidade pedida, resultado esperado)
        let matrix: Vec<(&Principal, Option<Uuid>, Result<Uuid, StatusCode>)> = vec![
            (&cast.owner, None, Ok(cast.unit_id)),
            (&cast.owner, Some(cast.unit_id), Ok(cast.unit_id)),
            (&cast.owner, Some(elsewhere), Err(StatusCode::FORBIDDEN)),
            (&cast.tenant, Some(elsewhere), Err(StatusCode::FORBIDDEN)),
            (&cast.tenant, None, Ok(cast.unit_id)),
            (&cast.admin, Some(elsewhere), Ok(elsewhere)),
            (&cast.assignee, Some(cast.unit_id), Ok(cast.unit_id)),
            (&cast.admin, None, Err(StatusCode::BAD_REQUEST)),
            (&cast.assignee, None, Err(StatusCode::BAD_REQUEST)),
        ];

        for (who, requested, expected) in matrix {
            let got = complaint_unit(who, requested).map_err(|e| e.status_code());
            assert_eq!(got, expected, "{:?}/{:?} asking {:?}", who.kind, who.role, requested);
        }

        let unlinked = person(PrincipalKind::Customer, None, None);
        assert_eq!(status_of(complaint_unit(&unlinked, Some(cast.unit_id))), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn sub_category_must_match_category() {
        let plumbing = Uuid::new_v4();
        let electrical = Uuid::new_v4();

        assert_eq!(complaint_category(Some(plumbing), Some(plumbing)).ok(), Some(Some(plumbing)));
        assert_eq!(complaint_category(None, Some(electrical)).ok(), Some(Some(electrical)));
        assert_eq!(complaint_category(Some(plumbing), None).ok(), Some(Some(plumbing)));
        assert_eq!(complaint_category(None, None).ok(), Some(None));
        assert_eq!(
            status_of(complaint_category(Some(plumbing), Some(electrical))),
            Some(StatusCode::BAD_REQUEST)
        );
    }

    fn employee(id: Uuid, role: EmployeeRole) -> Employee {
        Employee {
            id,
            full_name: "Suresh Kumar".into(),
            email: "suresh@example.com".into(),
            phone: None,
            role,
            department: None,
            designation: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn employee_update(phone_only: bool, role: Option<EmployeeRole>) -> UpdateEmployeePayload {
        UpdateEmployeePayload {
            full_name: (!phone_only).then(|| "New Name".to_string()),
            email: None,
            phone: Some("9876543210".into()),
            role,
            department: None,
            designation: None,
        }
    }

    #[test]
    fn employee_update_matrix() {
        let cast = cast();
        let worker = employee(cast.assignee.id, EmployeeRole::Employee);
        let deputy = employee(cast.sub_admin.id, EmployeeRole::SubAdmin);
        let other_deputy = employee(Uuid::new_v4(), EmployeeRole::SubAdmin);

        let phone = employee_update(true, None);
        let profile = employee_update(false, None);
        let promote = employee_update(true, Some(EmployeeRole::SubAdmin));

        // (quem, alvo, mudança, permitido?)
        let matrix: Vec<(&Principal, &Employee, &UpdateEmployeePayload, bool)> = vec![
            (&cast.admin, &worker, &promote, true),
            (&cast.admin, &other_deputy, &profile, true),
            (&cast.sub_admin, &worker, &profile, true),
            (&cast.sub_admin, &worker, &promote, false),
            (&cast.sub_admin, &other_deputy, &profile, false),
            (&cast.sub_admin, &deputy, &phone, true),
            (&cast.sub_admin, &deputy, &profile, false),
            (&cast.assignee, &worker, &phone, true),
            (&cast.assignee, &worker, &profile, false),
            (&cast.assignee, &worker, &promote, false),
            (&cast.other_employee, &worker, &phone, false),
            (&cast.owner, &worker, &phone, false),
        ];

        for (who, target, payload, allowed) in matrix {
            assert_eq!(
                can_update_employee(who, target, payload),
                allowed,
                "{:?} editing {:?} with {:?}",
                who.role,
                target.role,
                payload
            );
        }
    }

    fn leave(employee_id: Uuid, status: LeaveStatus) -> EmployeeLeave {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        EmployeeLeave {
            id: Uuid::new_v4(),
            employee_id,
            employee_name: None,
            leave_type: "Casual".into(),
            start_date: day,
            end_date: day,
            reason: None,
            status,
            reviewed_by: None,
            reviewed_at: None,
            review_remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn leave_review_rules() {
        let cast = cast();

        assert!(check_leave_review(&cast.admin, &leave(cast.assignee.id, LeaveStatus::Pending)).is_ok());
        assert_eq!(
            status_of(check_leave_review(&cast.sub_admin, &leave(cast.sub_admin.id, LeaveStatus::Pending))),
            Some(StatusCode::FORBIDDEN)
        );
        for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            assert_eq!(
                status_of(check_leave_review(&cast.admin, &leave(cast.assignee.id, status))),
                Some(StatusCode::CONFLICT)
            );
        }
    }

    fn vehicle_payload(unit_id: Option<Uuid>, owner: Option<(PrincipalKind, Uuid)>) -> CreateVehiclePayload {
        CreateVehiclePayload {
            unit_id,
            owner_kind: owner.map(|(k, _)| k),
            owner_id: owner.map(|(_, id)| id),
            registration_number: "MH12AB1234".into(),
            vehicle_type: VehicleType::TwoWheeler,
            make: None,
            model: None,
            color: None,
            parking_slot: None,
        }
    }

    #[test]
    fn vehicle_placement_rules() {
        let cast = cast();
        let tenant_owner = Some((PrincipalKind::Tenant, cast.tenant.id));

        assert_eq!(
            vehicle_placement(&cast.admin, &vehicle_payload(Some(cast.unit_id), tenant_owner)).ok(),
            Some((cast.unit_id, PrincipalKind::Tenant, cast.tenant.id))
        );
        // administração precisa dizer unidade e dono
        assert_eq!(
            status_of(vehicle_placement(&cast.admin, &vehicle_payload(Some(cast.unit_id), None))),
            Some(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            status_of(vehicle_placement(&cast.sub_admin, &vehicle_payload(None, tenant_owner))),
            Some(StatusCode::BAD_REQUEST)
        );

        // morador cadastra para si, na própria unidade
        assert_eq!(
            vehicle_placement(&cast.owner, &vehicle_payload(None, None)).ok(),
            Some((cast.unit_id, PrincipalKind::Customer, cast.owner.id))
        );
        assert_eq!(
            vehicle_placement(&cast.tenant, &vehicle_payload(Some(cast.unit_id), None)).ok(),
            Some((cast.unit_id, PrincipalKind::Tenant, cast.tenant.id))
        );
        assert_eq!(
            status_of(vehicle_placement(&cast.owner, &vehicle_payload(Some(Uuid::new_v4()), None))),
            Some(StatusCode::FORBIDDEN)
        );
        // funcionário comum não cadastra
        assert_eq!(
            status_of(vehicle_placement(&cast.assignee, &vehicle_payload(Some(cast.unit_id), tenant_owner))),
            Some(StatusCode::FORBIDDEN)
        );
    }
}
