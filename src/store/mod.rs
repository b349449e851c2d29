pub mod filter;
pub mod leave_store;
pub mod seed;

pub use filter::FilterState;
pub use leave_store::{LeaveRequestStore, NewLeaveRequest};
