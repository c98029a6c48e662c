pub mod auth_service;
pub mod class_service;
pub mod class_summary_service;
pub mod notification_service;
pub mod payment_service;
pub mod sheet_service;
pub mod study_session_service;
pub mod user_service;

pub use auth_service::*;
pub use class_service::*;
pub use class_summary_service::*;
pub use notification_service::*;
pub use payment_service::*;
pub use sheet_service::*;
pub use study_session_service::*;
pub use user_service::*;
