//! UserRepository trait definition.
//!
//! Persistence seam for user records. Implementations live in
//! courier-infra (e.g., `SqliteUserRepository`). Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).
//!
//! Calls for the same user are never concurrent -- the dispatcher
//! serializes them -- but calls for distinct users are, and
//! implementations must tolerate that.

use courier_types::error::RepositoryError;
use courier_types::user::{UserId, UserRecord};

pub trait UserRepository: Send + Sync {
    /// Load a user's record, creating and persisting a default one if the
    /// user has never been seen.
    fn load_or_create(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<UserRecord, RepositoryError>> + Send;

    /// Persist the full record image in one atomic write.
    ///
    /// A crash mid-save must leave the previously committed image
    /// observable on the next load, never a partial one.
    fn save(
        &self,
        record: &UserRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
