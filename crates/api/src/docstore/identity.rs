//! Identity store over document collections.

use async_trait::async_trait;
use chrono::Utc;

use plaza_core::{UserId, UserRole, Username};

use super::{DocumentStore, UserDoc};
use crate::models::{NewUser, User};
use crate::store::{IdentityStore, StoreError};

#[async_trait]
impl IdentityStore for DocumentStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        // Uniqueness is checked under the collection write lock so two
        // concurrent signups cannot both pass.
        let mut rows = self.users.write();

        if rows.values().any(|doc| doc.user.username == new.username) {
            return Err(StoreError::Conflict("Username already taken.".to_owned()));
        }
        if rows.values().any(|doc| doc.user.email == new.email) {
            return Err(StoreError::Conflict("Email already registered.".to_owned()));
        }

        let id = self.users.next_id();
        let user = User {
            id: UserId::new(id),
            username: new.username,
            email: new.email,
            role: new.role,
            verified: false,
            created_at: Utc::now(),
        };
        rows.insert(
            id,
            UserDoc {
                user: user.clone(),
                password_hash: new.password_hash,
            },
        );

        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id.as_i64()).map(|doc| doc.user))
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .find_one(|doc| &doc.user.username == username)
            .map(|(_, doc)| doc.user))
    }

    async fn password_hash_for(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, StoreError> {
        Ok(self
            .users
            .find_one(|doc| &doc.user.username == username)
            .map(|(_, doc)| (doc.user, doc.password_hash)))
    }

    async fn set_role(&self, id: UserId, role: UserRole) -> Result<(), StoreError> {
        self.users
            .update_with(id.as_i64(), |doc| doc.user.role = role)
            .ok_or(StoreError::NotFound)
    }

    async fn set_verified(&self, id: UserId, verified: bool) -> Result<(), StoreError> {
        self.users
            .update_with(id.as_i64(), |doc| doc.user.verified = verified)
            .ok_or(StoreError::NotFound)
    }
}
