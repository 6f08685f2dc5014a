use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Store;
use crate::error::DatabaseError;
use crate::models::{Chirp, RefreshToken, SortOrder, User};

/// In-process store with the same constraints as the Postgres schema:
/// unique emails, refresh tokens and chirps cascade with their user.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    refresh_tokens: HashMap<String, RefreshToken>,
    // insertion order doubles as creation order
    chirps: Vec<Chirp>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DatabaseError> {
        self.tables
            .lock()
            .map_err(|_| DatabaseError::UnexpectedError("memory store lock poisoned".to_string()))
    }
}

fn duplicate_email() -> DatabaseError {
    DatabaseError::UniqueConstraintViolation("Email already registered".to_string())
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let mut tables = self.tables()?;
        if tables.email_taken(email, None) {
            return Err(duplicate_email());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables()?;
        if tables.email_taken(email, Some(id)) {
            return Err(duplicate_email());
        }

        Ok(tables.users.get_mut(&id).map(|user| {
            user.email = email.to_string();
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn upgrade_user_to_chirpy_red(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_users(&self) -> Result<u64, DatabaseError> {
        let mut tables = self.tables()?;
        let deleted = tables.users.len() as u64;
        tables.users.clear();
        tables.refresh_tokens.clear();
        tables.chirps.clear();
        Ok(deleted)
    }

    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<(), DatabaseError> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&token.user_id) {
            return Err(DatabaseError::UnexpectedError(
                "refresh token references unknown user".to_string(),
            ));
        }
        if tables.refresh_tokens.contains_key(&token.token_hash) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "Refresh token already exists".to_string(),
            ));
        }

        tables
            .refresh_tokens
            .insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DatabaseError> {
        Ok(self.tables()?.refresh_tokens.get(token_hash).cloned())
    }

    async fn revoke_refresh_token(
        &self,
        token_hash: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        match tables.refresh_tokens.get_mut(token_hash) {
            Some(token) => {
                token.revoked_at.get_or_insert(revoked_at);
                token.updated_at = revoked_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, DatabaseError> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::UnexpectedError(
                "chirp references unknown user".to_string(),
            ));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, DatabaseError> {
        let tables = self.tables()?;
        let mut chirps: Vec<Chirp> = tables
            .chirps
            .iter()
            .filter(|c| author_id.map_or(true, |id| c.user_id == id))
            .cloned()
            .collect();

        chirps.sort_by_key(|c| c.created_at);
        if order == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, DatabaseError> {
        Ok(self.tables()?.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables()?;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() < before)
    }
}
