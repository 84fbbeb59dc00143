// handlers/public/auth/mod.rs - Public authentication handlers

pub mod login; // POST /api/v1/auth/login - authenticate and get JWT
pub mod register; // POST /api/v1/auth/register - create new account
pub mod utils;

pub use login::login;
pub use register::register;
