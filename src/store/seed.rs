use crate::model::{leave_balance::LeaveBalance, leave_request::LeaveRequest};

const SAMPLE_REQUESTS: &str = include_str!("../../data/leave_requests.json");

/// The five sample requests the dashboard starts with, newest first.
pub fn sample_requests() -> serde_json::Result<Vec<LeaveRequest>> {
    serde_json::from_str(SAMPLE_REQUESTS)
}

pub fn sample_balances() -> Vec<LeaveBalance> {
    vec![
        LeaveBalance::new("Annual Leave", 20, 5),
        LeaveBalance::new("Sick Leave", 10, 2),
        LeaveBalance::new("Personal Leave", 5, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::{LeaveStatus, LeaveType};

    #[test]
    fn sample_requests_parse() {
        let requests = sample_requests().unwrap();
        assert_eq!(requests.len(), 5);
        assert_eq!(requests[1].leave_type, LeaveType::SickLeave);
        assert_eq!(requests[4].leave_type, LeaveType::WorkFromHome);
        assert_eq!(
            requests
                .iter()
                .filter(|r| r.status == LeaveStatus::Pending)
                .count(),
            2
        );
        assert_eq!(requests[0].days(), 8);
    }

    #[test]
    fn sample_balances_have_remaining_days() {
        let remaining: Vec<u32> = sample_balances().iter().map(|b| b.remaining()).collect();
        assert_eq!(remaining, [15, 8, 4]);
    }
}
