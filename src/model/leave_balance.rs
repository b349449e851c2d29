use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    #[serde(rename = "type")]
    #[schema(example = "Annual Leave")]
    pub leave_type: String,
    #[schema(example = 20)]
    pub total: u32,
    #[schema(example = 5)]
    pub used: u32,
}

impl LeaveBalance {
    pub fn new(leave_type: impl Into<String>, total: u32, used: u32) -> Self {
        Self {
            leave_type: leave_type.into(),
            total,
            used,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_total_minus_used() {
        assert_eq!(LeaveBalance::new("Sick Leave", 10, 2).remaining(), 8);
    }

    #[test]
    fn overdrawn_balance_saturates_at_zero() {
        assert_eq!(LeaveBalance::new("Personal Leave", 5, 7).remaining(), 0);
    }
}
