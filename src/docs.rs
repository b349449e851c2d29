use crate::api::leave_request::{
    CreateLeave, LeaveBalanceResponse, LeaveResponse, LeaveViewResponse, StatusUpdate,
};
use crate::model::employee::EmployeeSnapshot;
use crate::model::leave_request::{LeaveStatus, LeaveType};
use crate::store::FilterState;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Leave API",
        version = "0.1.0",
        description = r#"
## Leave Management

In-memory leave request service behind an HR dashboard.

### Key Features
- **Apply for leave**: new requests always start as `Pending`
- **Approve / reject**: only pending requests can be decided
- **Filters**: narrow the view by status and/or leave type; an empty list means no restriction
- **History**: decided requests, most recently created first
- **Balance**: remaining days per leave type

### Response Format
- JSON bodies with camelCase fields
- Errors are `{ "message": "..." }` with 400, 404 or 409
"#,
    ),
    paths(
        crate::api::leave_request::leave_view,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::leave_balance,
        crate::api::leave_request::get_filters,
        crate::api::leave_request::set_filters,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::set_status,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
    ),
    components(
        schemas(
            CreateLeave,
            StatusUpdate,
            LeaveResponse,
            LeaveViewResponse,
            LeaveBalanceResponse,
            FilterState,
            EmployeeSnapshot,
            LeaveType,
            LeaveStatus
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
    )
)]
pub struct ApiDoc;
