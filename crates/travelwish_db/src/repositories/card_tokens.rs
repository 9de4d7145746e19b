//! Repository for vaulted card tokens
//!
//! Only masked display values are stored; raw card numbers and CVVs never
//! reach this layer. The `UNIQUE(user_id, gateway_payment_method_id)`
//! constraint is the source of truth for duplicate detection — pre-checks in
//! the orchestration layer are an optimisation, and a constraint violation on
//! insert surfaces as [`DbError::UniqueViolation`](crate::error::DbError).

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use travelwish_common::services::BoxFuture;

/// A stored card token. `masked_number` is the `****-****-****-1234` display
/// form, `expiry` is `MM/YY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardToken {
    pub id: String,
    pub user_id: String,
    pub card_holder_name: String,
    pub masked_number: String,
    pub expiry: String,
    pub brand: Option<String>,
    /// Gateway payment-method id. Absent on legacy rows saved before the
    /// gateway linkage existed; those rows cannot be charged.
    pub gateway_payment_method_id: Option<String>,
    pub gateway_customer_id: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
}

/// Fields for vaulting a new card token.
#[derive(Debug, Clone)]
pub struct NewCardToken {
    pub user_id: String,
    pub card_holder_name: String,
    pub masked_number: String,
    pub expiry: String,
    pub brand: Option<String>,
    pub gateway_payment_method_id: Option<String>,
    pub gateway_customer_id: Option<String>,
}

/// Repository for card tokens.
pub trait CardTokenRepository: Send + Sync {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Insert a new active card token. A duplicate
    /// (user, gateway_payment_method_id) pair fails with
    /// `DbError::UniqueViolation`.
    fn insert(&self, token: NewCardToken) -> BoxFuture<'_, CardToken, DbError>;

    /// Active card tokens for a user, newest first.
    fn find_active_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<CardToken>, DbError>;

    /// An active card token by id, scoped to its owner.
    fn find_active_for_user(
        &self,
        card_id: &str,
        user_id: &str,
    ) -> BoxFuture<'_, Option<CardToken>, DbError>;

    /// Look up a token by its gateway payment-method linkage, active or not.
    fn find_by_payment_method(
        &self,
        user_id: &str,
        gateway_payment_method_id: &str,
    ) -> BoxFuture<'_, Option<CardToken>, DbError>;

    /// Deactivate a card token owned by the user. Returns `false` when no
    /// active token matched.
    fn deactivate(&self, card_id: &str, user_id: &str) -> BoxFuture<'_, bool, DbError>;
}
