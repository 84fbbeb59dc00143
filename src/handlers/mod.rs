// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth, caller-scoped resources)
pub mod protected; // JWT authentication required (/api/v1/bucketlists/*, /api/v1/auth/*)
pub mod public; // No authentication required (/health, /api/v1/, register, login)
