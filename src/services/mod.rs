//! Business logic services.

pub mod aggregation;
pub mod dispatch;
pub mod excel;
pub mod mailer;
pub mod storage;

pub use mailer::Mailer;
pub use storage::Storage;
