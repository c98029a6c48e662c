pub mod dates;
pub mod email;
pub mod jwt;
pub mod password;
pub mod schedule;

pub use dates::*;
pub use email::*;
pub use jwt::*;
pub use password::*;
pub use schedule::*;
