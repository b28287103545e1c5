//! Domain models: request/response types and validation.

pub mod activity;
pub mod email_log;
pub mod media;
pub mod recipient;
pub mod report;
pub mod user;

// Re-export commonly used types
pub use activity::{ActivityInput, ActivityResponse, FIXED_ACTIVITIES};
pub use email_log::{EmailLogResponse, EmailStatus};
pub use media::MediaFileResponse;
pub use recipient::{CreateRecipientRequest, RecipientResponse, UpdateRecipientRequest};
pub use report::{
    ListReportsQuery, ReportDetailResponse, ReportListResponse, ReportSummary, SaveReportRequest,
};
pub use user::{
    CreateUserRequest, ListUsersQuery, LoginRequest, LoginResponse, UpdateUserRequest,
    UserResponse,
};
