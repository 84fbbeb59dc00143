// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here runs behind `jwt_auth_middleware`, which injects `AuthUser`.
// Nested resources resolve their bucketlist through `access` first, so a
// missing bucketlist is 404 and someone else's is 403 before anything else.

pub mod access;
pub mod auth; // Session refresh/logout and user details
pub mod bucketlists;
pub mod items;
pub mod tags;
