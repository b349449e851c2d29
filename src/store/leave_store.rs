use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{LeaveError, ValidationError};
use crate::model::employee::EmployeeSnapshot;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::store::filter::{FilterState, FilteredView};

/// Applicant input for a new leave request. Everything the form can leave
/// blank is optional here so that validation can name what is missing.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee: EmployeeSnapshot,
    pub leave_type: Option<LeaveType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: String,
}

struct ValidLeave {
    leave_type: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: String,
}

impl NewLeaveRequest {
    fn validate(&self) -> Result<ValidLeave, ValidationError> {
        let leave_type = self
            .leave_type
            .ok_or(ValidationError::MissingField { field: "type" })?;
        let start_date = self
            .start_date
            .ok_or(ValidationError::MissingField { field: "start_date" })?;
        let end_date = self
            .end_date
            .ok_or(ValidationError::MissingField { field: "end_date" })?;

        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::MissingField { field: "reason" });
        }

        if end_date < start_date {
            return Err(ValidationError::InvalidDateRange {
                start_date,
                end_date,
            });
        }

        Ok(ValidLeave {
            leave_type,
            start_date,
            end_date,
            reason: reason.to_string(),
        })
    }
}

/// In-memory owner of all leave requests and the active filters.
///
/// Requests are kept newest first. Ids come from a counter that starts past
/// the largest seeded id and only moves forward. `None` once `u64::MAX` has
/// been handed out.
#[derive(Debug, Clone)]
pub struct LeaveRequestStore {
    requests: Vec<LeaveRequest>,
    filters: FilterState,
    next_id: Option<u64>,
}

impl Default for LeaveRequestStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl LeaveRequestStore {
    pub fn new(seed: Vec<LeaveRequest>) -> Self {
        let next_id = seed.iter().map(|r| r.id).max().unwrap_or(0).checked_add(1);
        Self {
            requests: seed,
            filters: FilterState::default(),
            next_id,
        }
    }

    pub fn apply(&mut self, new: NewLeaveRequest) -> Result<LeaveRequest, LeaveError> {
        self.apply_at(new, Utc::now())
    }

    /// Same as [`apply`](Self::apply) with an explicit creation time.
    pub fn apply_at(
        &mut self,
        new: NewLeaveRequest,
        created_at: DateTime<Utc>,
    ) -> Result<LeaveRequest, LeaveError> {
        let valid = new.validate()?;
        let id = self.next_id.ok_or(LeaveError::IdsExhausted)?;

        let request = LeaveRequest {
            id,
            employee: new.employee,
            leave_type: valid.leave_type,
            start_date: valid.start_date,
            end_date: valid.end_date,
            status: LeaveStatus::Pending,
            reason: valid.reason,
            created_at,
        };

        self.next_id = id.checked_add(1);
        self.requests.insert(0, request.clone());
        Ok(request)
    }

    /// Moves a pending request to `Approved` or `Rejected`.
    ///
    /// Terminal requests are left untouched and reported as an invalid
    /// transition; an unknown id is reported as not found.
    pub fn set_status(&mut self, id: u64, status: LeaveStatus) -> Result<LeaveRequest, LeaveError> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LeaveError::NotFound { id })?;

        if !request.status.can_transition_to(status) {
            return Err(LeaveError::InvalidTransition {
                id,
                from: request.status,
                to: status,
            });
        }

        request.status = status;
        Ok(request.clone())
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn get(&self, id: u64) -> Option<&LeaveRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Every stored request, ignoring filters.
    pub fn requests(&self) -> &[LeaveRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn view(&self) -> FilteredView {
        FilteredView::new(
            self.requests
                .iter()
                .filter(|r| self.filters.matches(r))
                .cloned()
                .collect(),
        )
    }

    /// Decided requests from the filtered view, most recently created first.
    pub fn history(&self) -> Vec<LeaveRequest> {
        let mut decided: Vec<LeaveRequest> = self
            .view()
            .into_requests()
            .into_iter()
            .filter(|r| r.status.is_terminal())
            .collect();
        decided.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        decided
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::sample_requests;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> LeaveRequestStore {
        LeaveRequestStore::new(sample_requests().unwrap())
    }

    fn new_leave(leave_type: LeaveType, start: NaiveDate, end: NaiveDate) -> NewLeaveRequest {
        NewLeaveRequest {
            employee: EmployeeSnapshot::current_user(),
            leave_type: Some(leave_type),
            start_date: Some(start),
            end_date: Some(end),
            reason: "Conference travel".into(),
        }
    }

    #[test]
    fn apply_prepends_pending_request_with_next_id() {
        let mut store = seeded();
        let created = store
            .apply(new_leave(LeaveType::Vacation, date(2025, 6, 2), date(2025, 6, 6)))
            .unwrap();

        assert_eq!(created.id, 6);
        assert_eq!(created.status, LeaveStatus::Pending);
        assert_eq!(store.len(), 6);
        assert_eq!(store.requests()[0], created);
        assert_eq!(store.get(6), Some(&created));
    }

    #[test]
    fn ids_stay_unique_across_many_applies() {
        let mut store = seeded();
        for offset in 0..25 {
            let start = date(2025, 7, 1) + Duration::days(offset);
            store
                .apply(new_leave(LeaveType::WorkFromHome, start, start))
                .unwrap();
        }

        let ids: HashSet<u64> = store.requests().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn ids_follow_largest_seeded_id() {
        let mut seed = sample_requests().unwrap();
        seed.retain(|r| r.id != 2);
        seed[0].id = 40;
        let mut store = LeaveRequestStore::new(seed);

        let created = store
            .apply(new_leave(LeaveType::SickLeave, date(2025, 5, 1), date(2025, 5, 1)))
            .unwrap();
        assert_eq!(created.id, 41);
    }

    #[test]
    fn apply_fails_cleanly_once_ids_run_out() {
        let mut seed = sample_requests().unwrap();
        seed[2].id = u64::MAX;
        let mut store = LeaveRequestStore::new(seed);

        let err = store
            .apply(new_leave(LeaveType::Vacation, date(2025, 5, 1), date(2025, 5, 2)))
            .unwrap_err();
        assert_eq!(err, LeaveError::IdsExhausted);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn last_id_is_handed_out_once() {
        let mut seed = sample_requests().unwrap();
        seed[0].id = u64::MAX - 1;
        let mut store = LeaveRequestStore::new(seed);
        let day = date(2025, 5, 1);

        let created = store.apply(new_leave(LeaveType::Vacation, day, day)).unwrap();
        assert_eq!(created.id, u64::MAX);
        assert_eq!(
            store.apply(new_leave(LeaveType::Vacation, day, day)).unwrap_err(),
            LeaveError::IdsExhausted
        );
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn empty_store_starts_at_one() {
        let mut store = LeaveRequestStore::default();
        let day = date(2025, 5, 1);

        assert!(store.is_empty());
        let created = store.apply(new_leave(LeaveType::Vacation, day, day)).unwrap();
        assert_eq!(created.id, 1);
    }

    #[test]
    fn end_before_start_is_rejected_without_mutation() {
        let mut store = seeded();
        let err = store
            .apply(new_leave(LeaveType::Vacation, date(2025, 5, 1), date(2025, 4, 30)))
            .unwrap_err();

        assert_eq!(
            err,
            LeaveError::Validation(ValidationError::InvalidDateRange {
                start_date: date(2025, 5, 1),
                end_date: date(2025, 4, 30),
            })
        );
        assert_eq!(store.len(), 5);

        // A rejected apply must not burn an id.
        let next = store
            .apply(new_leave(LeaveType::Vacation, date(2025, 5, 1), date(2025, 5, 1)))
            .unwrap();
        assert_eq!(next.id, 6);
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let mut store = seeded();
        let mut input = new_leave(LeaveType::Vacation, date(2025, 5, 1), date(2025, 5, 2));
        input.leave_type = None;
        assert_eq!(
            store.apply(input.clone()).unwrap_err(),
            LeaveError::Validation(ValidationError::MissingField { field: "type" })
        );

        input.leave_type = Some(LeaveType::Vacation);
        input.end_date = None;
        assert_eq!(
            store.apply(input.clone()).unwrap_err(),
            LeaveError::Validation(ValidationError::MissingField { field: "end_date" })
        );

        input.end_date = Some(date(2025, 5, 2));
        input.reason = "   ".into();
        assert_eq!(
            store.apply(input).unwrap_err(),
            LeaveError::Validation(ValidationError::MissingField { field: "reason" })
        );
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn pending_can_be_approved_or_rejected() {
        let mut store = seeded();

        let approved = store.set_status(1, LeaveStatus::Approved).unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.reason, "Annual family vacation");

        let rejected = store.set_status(2, LeaveStatus::Rejected).unwrap();
        assert_eq!(rejected.status, LeaveStatus::Rejected);
        assert_eq!(store.get(2).unwrap().status, LeaveStatus::Rejected);
    }

    #[test]
    fn terminal_requests_do_not_change() {
        let mut store = seeded();

        let err = store.set_status(3, LeaveStatus::Rejected).unwrap_err();
        assert_eq!(
            err,
            LeaveError::InvalidTransition {
                id: 3,
                from: LeaveStatus::Approved,
                to: LeaveStatus::Rejected,
            }
        );
        assert_eq!(store.get(3).unwrap().status, LeaveStatus::Approved);

        assert!(store.set_status(4, LeaveStatus::Pending).is_err());
        assert_eq!(store.get(4).unwrap().status, LeaveStatus::Rejected);
    }

    #[test]
    fn pending_to_pending_is_not_a_transition() {
        let mut store = seeded();
        assert!(matches!(
            store.set_status(1, LeaveStatus::Pending),
            Err(LeaveError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = seeded();
        assert_eq!(
            store.set_status(99, LeaveStatus::Approved).unwrap_err(),
            LeaveError::NotFound { id: 99 }
        );
    }

    #[test]
    fn pending_filter_shows_the_two_seeded_pending_requests() {
        let mut store = seeded();
        store.set_filters(FilterState::new(["Pending"], Vec::<String>::new()));

        let view = store.view();
        let names: Vec<&str> = view
            .requests()
            .iter()
            .map(|r| r.employee.name.as_str())
            .collect();
        assert_eq!(names, ["Jane Smith", "Mike Johnson"]);
        assert_eq!(view.requests()[0].leave_type, LeaveType::Vacation);
        assert_eq!(view.requests()[1].leave_type, LeaveType::SickLeave);
        assert!(view.approved().is_empty());
    }

    #[test]
    fn view_is_exactly_the_matching_subset() {
        let mut store = seeded();
        let cases = [
            FilterState::default(),
            FilterState::new(["Approved"], Vec::<String>::new()),
            FilterState::new(Vec::<String>::new(), ["Vacation"]),
            FilterState::new(["Approved", "Rejected"], ["Vacation", "Work From Home"]),
            FilterState::new(["Unknown"], Vec::<String>::new()),
        ];

        for filters in cases {
            store.set_filters(filters.clone());
            let expected: Vec<LeaveRequest> = store
                .requests()
                .iter()
                .filter(|r| {
                    (filters.status.is_empty() || filters.status.contains(r.status.as_str()))
                        && (filters.leave_type.is_empty()
                            || filters.leave_type.contains(r.leave_type.as_str()))
                })
                .cloned()
                .collect();
            assert_eq!(store.view().requests(), expected.as_slice());
        }
    }

    #[test]
    fn partitions_cover_the_filtered_view() {
        let mut store = seeded();
        store.set_filters(FilterState::new(Vec::<String>::new(), ["Vacation"]));

        let view = store.view();
        assert_eq!(view.len(), 2);
        assert_eq!(view.pending().len(), 1);
        assert_eq!(view.approved().len(), 0);
        assert_eq!(view.rejected().len(), 1);
        assert_eq!(view.rejected()[0].employee.name, "Sarah Williams");
    }

    #[test]
    fn view_reflects_new_requests_and_status_changes() {
        let mut store = seeded();
        store.set_filters(FilterState::new(["Pending"], Vec::<String>::new()));
        store
            .apply(new_leave(LeaveType::PersonalLeave, date(2025, 6, 1), date(2025, 6, 1)))
            .unwrap();
        store.set_status(2, LeaveStatus::Approved).unwrap();

        let ids: Vec<u64> = store.view().requests().iter().map(|r| r.id).collect();
        assert_eq!(ids, [6, 1]);
    }

    #[test]
    fn history_excludes_pending_and_sorts_newest_first() {
        let mut store = seeded();
        let ids: Vec<u64> = store.history().iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 5, 4]);

        let created = store
            .apply_at(
                new_leave(LeaveType::SickLeave, date(2025, 5, 5), date(2025, 5, 6)),
                Utc.with_ymd_and_hms(2025, 5, 4, 7, 0, 0).unwrap(),
            )
            .unwrap();
        store.set_status(created.id, LeaveStatus::Rejected).unwrap();
        store.set_status(2, LeaveStatus::Approved).unwrap();

        let history = store.history();
        assert!(history.iter().all(|r| r.status != LeaveStatus::Pending));
        assert!(history.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        let ids: Vec<u64> = history.iter().map(|r| r.id).collect();
        assert_eq!(ids, [6, 2, 3, 5, 4]);
    }

    #[test]
    fn history_respects_filters() {
        let mut store = seeded();
        store.set_filters(FilterState::new(Vec::<String>::new(), ["Vacation"]));
        let ids: Vec<u64> = store.history().iter().map(|r| r.id).collect();
        assert_eq!(ids, [4]);
    }

    #[test]
    fn history_breaks_ties_by_id() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut store = LeaveRequestStore::new(Vec::new());
        for _ in 0..3 {
            let created = store
                .apply_at(new_leave(LeaveType::Vacation, date(2025, 6, 9), date(2025, 6, 9)), at)
                .unwrap();
            store.set_status(created.id, LeaveStatus::Approved).unwrap();
        }
        let ids: Vec<u64> = store.history().iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 2, 1]);
    }
}
