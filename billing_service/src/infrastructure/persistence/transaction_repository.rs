use async_trait::async_trait;

use crate::domain::error::{Error, TransactionError};
use crate::domain::repository::TransactionRepository;
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::domain::types::TransactionId;

use super::models::TransactionRow;
use super::unit_of_work::SharedTx;

/// Adaptador de `TransactionRepository` ligado a la transaccion de
/// almacenamiento abierta por `PostgresUnitOfWork`.
pub struct PostgresTransactionRepository {
    tx: SharedTx,
}

impl PostgresTransactionRepository {
    pub fn scoped(tx: SharedTx) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, transaction: &Transaction) -> Result<(), Error> {
        let mut guard = self.tx.lock().await;
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, wallet_id, user_id, sms_id, amount, currency, type, status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(transaction.id().0)
        .bind(transaction.wallet_id().0)
        .bind(transaction.user_id().0)
        .bind(transaction.sms_id().map(|s| s.0))
        .bind(transaction.amount().amount().to_string())
        .bind(transaction.amount().currency())
        .bind(transaction.transaction_type())
        .bind(transaction.status())
        .bind(transaction.created_at())
        .bind(transaction.updated_at())
        .execute(&mut **guard)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Transaction, Error> {
        let mut guard = self.tx.lock().await;
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, wallet_id, user_id, sms_id, amount, currency, type, status,
                   created_at, updated_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut **guard)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?
        .ok_or(TransactionError::NotFound(id))?;

        row.into_domain()
    }

    async fn update_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<(), Error> {
        let mut guard = self.tx.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $1, updated_at = now()
            WHERE id = $2
            "#,
        )
        .bind(status)
        .bind(id.0)
        .execute(&mut **guard)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TransactionError::NotFound(id).into());
        }
        Ok(())
    }
}
