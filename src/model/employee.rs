use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee details copied onto a leave request when it is filed.
/// Not a reference to an employee record; edits elsewhere never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Jane Smith",
    "department": "Design"
}))]
pub struct EmployeeSnapshot {
    #[schema(example = "Jane Smith")]
    pub name: String,

    #[schema(example = "Design")]
    pub department: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "/placeholder.svg", nullable = true)]
    pub avatar: Option<String>,
}

impl EmployeeSnapshot {
    pub fn new(name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            avatar: None,
        }
    }

    /// Snapshot used when the applicant does not identify themselves.
    pub fn current_user() -> Self {
        Self::new("Current User", "Your Department")
    }
}
