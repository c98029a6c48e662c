pub mod admin;
pub mod auth;
pub mod class;
pub mod class_summary;
pub mod notification;
pub mod payment;
pub mod sheet;
pub mod study_session;
pub mod user;

pub use admin::admin_config;
pub use auth::auth_config;
pub use class::class_config;
pub use class_summary::class_summary_config;
pub use notification::notification_config;
pub use payment::payment_config;
pub use sheet::sheet_config;
pub use study_session::study_session_config;
pub use user::user_config;
