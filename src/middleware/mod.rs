/// Middleware module
///
/// Request-level concerns shared by the routes: resolving the caller's
/// identity and counting static file hits.

mod authenticated_user;
mod hit_counter;

pub use authenticated_user::AuthenticatedUser;
pub use hit_counter::HitCounter;
