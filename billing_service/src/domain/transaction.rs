use chrono::{DateTime, Utc};
use common::Money;
use serde::{Deserialize, Serialize};

use crate::domain::error::TransactionError;
use crate::domain::types::{SmsId, TransactionId, UserId, WalletId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionType {
    Debit,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// Registro inmutable de un unico debito o credito contra una billetera.
///
/// Maquina de estados:
/// ```text
///            (construct)
///                v
///            [Pending]
///             /     \
///   mark_completed  mark_failed
///        v              v
///   [Completed]     [Failed]
/// ```
/// Ambas transiciones terminales fallan con `InvalidState` si se invocan
/// sobre una transaccion que ya no esta en `Pending` — la idempotencia se
/// logra por rechazo, no por re-aplicacion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    wallet_id: WalletId,
    user_id: UserId,
    sms_id: Option<SmsId>,
    amount: Money,
    transaction_type: TransactionType,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Crea una nueva transaccion en estado `Pending`, con un id fresco y
    /// timestamps actuales.
    pub fn new(
        wallet_id: WalletId,
        user_id: UserId,
        sms_id: Option<SmsId>,
        amount: Money,
        transaction_type: TransactionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            wallet_id,
            user_id,
            sms_id,
            amount,
            transaction_type,
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reconstitute(
        id: TransactionId,
        wallet_id: WalletId,
        user_id: UserId,
        sms_id: Option<SmsId>,
        amount: Money,
        transaction_type: TransactionType,
        status: TransactionStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wallet_id,
            user_id,
            sms_id,
            amount,
            transaction_type,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn sms_id(&self) -> Option<SmsId> {
        self.sms_id
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Transiciona Pending -> Completed. Falla si la transaccion ya dejo
    /// `Pending`.
    pub fn mark_completed(&mut self) -> Result<(), TransactionError> {
        if self.status != TransactionStatus::Pending {
            return Err(TransactionError::InvalidState(self.id));
        }
        self.status = TransactionStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transiciona Pending -> Failed. Falla si la transaccion ya dejo
    /// `Pending`.
    pub fn mark_failed(&mut self) -> Result<(), TransactionError> {
        if self.status != TransactionStatus::Pending {
            return Err(TransactionError::InvalidState(self.id));
        }
        self.status = TransactionStatus::Failed;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use rstest::rstest;

    fn pending_tx() -> Transaction {
        Transaction::new(
            WalletId::new(),
            UserId::new(),
            Some(SmsId(uuid::Uuid::new_v4())),
            Money::new(BigInt::from(100), "USD").unwrap(),
            TransactionType::Debit,
        )
    }

    #[test]
    fn new_transaction_is_pending() {
        assert_eq!(pending_tx().status(), TransactionStatus::Pending);
    }

    #[rstest]
    #[case(TransactionStatus::Completed)]
    #[case(TransactionStatus::Failed)]
    fn terminal_transition_succeeds_once_from_pending(#[case] target: TransactionStatus) {
        let mut tx = pending_tx();
        let result = match target {
            TransactionStatus::Completed => tx.mark_completed(),
            TransactionStatus::Failed => tx.mark_failed(),
            TransactionStatus::Pending => unreachable!(),
        };
        assert!(result.is_ok());
        assert_eq!(tx.status(), target);
    }

    #[test]
    fn mark_completed_twice_fails() {
        let mut tx = pending_tx();
        tx.mark_completed().unwrap();
        assert!(matches!(
            tx.mark_completed(),
            Err(TransactionError::InvalidState(_))
        ));
    }

    #[test]
    fn mark_failed_after_completed_fails() {
        let mut tx = pending_tx();
        tx.mark_completed().unwrap();
        assert!(matches!(
            tx.mark_failed(),
            Err(TransactionError::InvalidState(_))
        ));
    }
}
