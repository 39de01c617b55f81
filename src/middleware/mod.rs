pub mod auth;
pub mod session;

pub use auth::RequireLogin;
pub use session::{CookiePolicy, Flash, FlashCategory, Session};
