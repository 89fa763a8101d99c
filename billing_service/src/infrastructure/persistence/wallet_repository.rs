use async_trait::async_trait;

use crate::domain::error::{Error, WalletError};
use crate::domain::repository::WalletRepository;
use crate::domain::types::{UserId, WalletId};
use crate::domain::wallet::Wallet;

use super::models::WalletRow;
use super::unit_of_work::SharedTx;

/// Adaptador de `WalletRepository` ligado a una transaccion de
/// almacenamiento abierta por `PostgresUnitOfWork`. Cada lectura usada por
/// un caso de uso pide `SELECT ... FOR UPDATE`, manteniendo el lock de
/// fila exclusivo por la duracion del scope (ver `domain::unit_of_work`).
pub struct PostgresWalletRepository {
    tx: SharedTx,
}

impl PostgresWalletRepository {
    pub fn scoped(tx: SharedTx) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Wallet, Error> {
        let mut guard = self.tx.lock().await;
        let row = sqlx::query_as::<_, WalletRow>(
            r#"
            SELECT id, user_id, balance, currency, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&mut **guard)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?
        .ok_or(WalletError::NotFound(user_id))?;

        row.into_domain()
    }

    async fn find_by_id(&self, id: WalletId) -> Result<Wallet, Error> {
        let mut guard = self.tx.lock().await;
        let row = sqlx::query_as::<_, WalletRow>(
            r#"
            SELECT id, user_id, balance, currency, created_at, updated_at
            FROM wallets
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut **guard)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?
        .ok_or(WalletError::NotFoundById(id))?;

        row.into_domain()
    }

    async fn save(&self, wallet: &Wallet) -> Result<(), Error> {
        let mut guard = self.tx.lock().await;
        sqlx::query(
            r#"
            INSERT INTO wallets (id, user_id, balance, currency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(wallet.id().0)
        .bind(wallet.user_id().0)
        .bind(wallet.balance().amount().to_string())
        .bind(wallet.currency())
        .bind(wallet.updated_at())
        .bind(wallet.updated_at())
        .execute(&mut **guard)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }

    async fn update_balance(&self, wallet: &Wallet) -> Result<(), Error> {
        let mut guard = self.tx.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(wallet.balance().amount().to_string())
        .bind(wallet.updated_at())
        .bind(wallet.id().0)
        .execute(&mut **guard)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(WalletError::NotFoundById(wallet.id()).into());
        }
        Ok(())
    }
}
