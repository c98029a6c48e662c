pub mod class_summaries;
pub mod classes;
pub mod notifications;
pub mod payments;
pub mod sheets;
pub mod study_sessions;
pub mod user_favorites;
pub mod users;

pub use class_summaries as class_summary_entity;
pub use classes as class_entity;
pub use notifications as notification_entity;
pub use payments as payment_entity;
pub use sheets as sheet_entity;
pub use study_sessions as study_session_entity;
pub use user_favorites as user_favorite_entity;
pub use users as user_entity;

pub use classes::ClassStatus;
pub use users::UserRole;
