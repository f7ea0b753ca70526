// src/services/calendar_service.rs

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::{
    common::error::AppError,
    db::CalendarRepository,
    models::{
        auth::Principal,
        calendar::{CalendarEvent, CalendarQuery, MAX_CALENDAR_SPAN_DAYS},
    },
};

/// Converte as datas do filtro em `[from 00:00, to+1 00:00)` UTC.
pub fn visit_window(from: NaiveDate, to: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    if to < from {
        return Err(AppError::bad_request("'to' must not be before 'from'."));
    }
    if (to - from).num_days() > MAX_CALENDAR_SPAN_DAYS {
        return Err(AppError::bad_request(format!(
            "The calendar range cannot exceed {} days.",
            MAX_CALENDAR_SPAN_DAYS
        )));
    }

    let start = from.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = to
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::bad_request("'to' is out of range."))?
        .and_time(chrono::NaiveTime::MIN)
        .and_utc();
    Ok((start, end))
}

/// Junta visitas e férias numa lista só, ordenada pelo início.
pub fn merge_events(mut events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
    events.sort_by_key(CalendarEvent::starts_at);
    events
}

#[derive(Clone)]
pub struct CalendarService {
    repo: CalendarRepository,
}

impl CalendarService {
    pub fn new(repo: CalendarRepository) -> Self {
        Self { repo }
    }

    pub async fn events(&self, actor: &Principal, query: &CalendarQuery) -> Result<Vec<CalendarEvent>, AppError> {
        let (start, end) = visit_window(query.from, query.to)?;

        // 1. Morador: só visitas à própria unidade
        if !actor.is_staff() {
            let unit_id = actor
                .resident_unit()
                .ok_or_else(|| AppError::forbidden("Your account is not linked to a unit."))?;
            let visits = self.repo.visits(start, end, None, Some(unit_id)).await?;
            return Ok(merge_events(visits.into_iter().map(CalendarEvent::from).collect()));
        }

        // 2. Funcionário comum: só a própria agenda
        let employee_id = if actor.is_manager() { query.employee_id } else { Some(actor.id) };

        let (visits, leaves) = tokio::try_join!(
            self.repo.visits(start, end, employee_id, None),
            self.repo.leaves(query.from, query.to, employee_id),
        )?;

        let events = visits
            .into_iter()
            .map(CalendarEvent::from)
            .chain(leaves.into_iter().map(CalendarEvent::from))
            .collect();
        Ok(merge_events(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::LeaveStatus;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn window_covers_the_last_day() {
        let (start, end) = visit_window(date("2025-03-01"), date("2025-03-31")).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-04-01T00:00:00+00:00");
    }

    #[test]
    fn single_day_is_allowed() {
        assert!(visit_window(date("2025-03-01"), date("2025-03-01")).is_ok());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = visit_window(date("2025-03-02"), date("2025-03-01")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn span_limit_is_92_days() {
        assert!(visit_window(date("2025-01-01"), date("2025-04-03")).is_ok());
        assert!(matches!(
            visit_window(date("2025-01-01"), date("2025-04-04")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn events_are_sorted_by_start() {
        let leave = CalendarEvent::Leave {
            leave_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            employee_name: "Suresh".into(),
            leave_type: "casual".into(),
            status: LeaveStatus::Approved,
            start_date: date("2025-03-02"),
            end_date: date("2025-03-03"),
        };
        let visit = CalendarEvent::Visit {
            complaint_id: Uuid::new_v4(),
            ticket_number: 3,
            title: "Leak".into(),
            status: crate::models::complaint::ComplaintStatus::Scheduled,
            start: date("2025-03-01").and_hms_opt(10, 30, 0).unwrap().and_utc(),
            unit_id: Uuid::new_v4(),
            unit_number: "A-101".into(),
            employee_id: None,
            employee_name: None,
        };

        let merged = merge_events(vec![leave, visit]);
        assert!(matches!(merged[0], CalendarEvent::Visit { .. }));
        assert!(matches!(merged[1], CalendarEvent::Leave { .. }));
    }
}
