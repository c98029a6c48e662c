pub mod class;
pub mod class_summary;
pub mod notification;
pub mod pagination;
pub mod payment;
pub mod sheet;
pub mod study_session;
pub mod user;

pub use class::*;
pub use class_summary::*;
pub use notification::*;
pub use pagination::*;
pub use payment::*;
pub use sheet::*;
pub use study_session::*;
pub use user::*;
