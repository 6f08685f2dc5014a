/// Storage capability
///
/// The session core and the HTTP handlers talk to persistence only through
/// `Store`. Each method is a single-row (or single-statement) operation; the
/// backend provides atomicity for that one call and nothing more.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::models::{Chirp, RefreshToken, SortOrder, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    // ---- users ----

    /// Insert a new user; a taken email is a `UniqueConstraintViolation`
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Replace email and credential hash; `None` if the user does not exist
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError>;

    /// Returns false if the user does not exist
    async fn upgrade_user_to_chirpy_red(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Administrative bulk delete; chirps and refresh tokens go with their users
    async fn delete_all_users(&self) -> Result<u64, DatabaseError>;

    // ---- refresh tokens ----

    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<(), DatabaseError>;

    async fn find_refresh_token(&self, token_hash: &str)
        -> Result<Option<RefreshToken>, DatabaseError>;

    /// Mark a token revoked, keeping the first revocation time if it already
    /// was. Returns false if no such token exists.
    async fn revoke_refresh_token(
        &self,
        token_hash: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError>;

    // ---- chirps ----

    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, DatabaseError>;

    async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, DatabaseError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, DatabaseError>;

    /// Returns false if no such chirp exists
    async fn delete_chirp(&self, id: Uuid) -> Result<bool, DatabaseError>;
}
