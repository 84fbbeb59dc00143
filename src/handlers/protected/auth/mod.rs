// handlers/protected/auth/mod.rs - Authenticated session management

pub mod session; // POST /api/v1/auth/refresh, POST /api/v1/auth/logout
pub mod user; // GET /api/v1/auth/users/:id

pub use session::{logout, refresh};
pub use user::user_detail;
