use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tokio::sync::Mutex as AsyncMutex;

use crate::domain::error::Error;
use crate::domain::unit_of_work::{ScopedRepos, UnitOfWork};

use super::transaction_repository::PostgresTransactionRepository;
use super::user_repository::PostgresUserRepository;
use super::wallet_repository::PostgresWalletRepository;

/// La transaccion de almacenamiento activa, compartida entre los tres
/// repositorios que el closure de un `with_transaction` recibe. `sqlx`
/// exige acceso mutuo exclusivo para ejecutar sentencias sobre una
/// `Transaction`; como el contrato de dominio expone los repositorios como
/// `Arc<dyn Repo>` (para que los casos de uso puedan clonarlos libremente),
/// el acceso mutuo se serializa detras de un mutex asincrono en vez de
/// prestarse por referencia.
pub type SharedTx = Arc<AsyncMutex<sqlx::Transaction<'static, Postgres>>>;

/// Unit-of-Work respaldado por Postgres. Abre una transaccion real por
/// cada `with_transaction`, liga los tres repositorios a esa transaccion,
/// y hace commit/rollback segun el resultado del closure — nunca soporta
/// anidamiento, igual que el contrato de dominio exige.
pub struct PostgresUnitOfWork {
    pool: PgPool,
}

impl PostgresUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn with_transaction(
        &self,
        f: Box<
            dyn FnOnce(ScopedRepos) -> futures_util::future::BoxFuture<'static, Result<(), Error>>
                + Send,
        >,
    ) -> Result<(), Error> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Storage(format!("failed to open storage transaction: {e}")))?;

        let shared: SharedTx = Arc::new(AsyncMutex::new(tx));

        let repos = ScopedRepos {
            wallets: Arc::new(PostgresWalletRepository::scoped(shared.clone())),
            transactions: Arc::new(PostgresTransactionRepository::scoped(shared.clone())),
            users: Arc::new(PostgresUserRepository::scoped(shared.clone())),
        };

        let outcome = f(repos).await;

        let tx = Arc::try_unwrap(shared)
            .unwrap_or_else(|_| {
                panic!("scoped repositories outlived their unit-of-work scope: a clone of the transaction escaped")
            })
            .into_inner();

        match outcome {
            Ok(()) => tx
                .commit()
                .await
                .map_err(|e| Error::Storage(format!("failed to commit storage transaction: {e}"))),
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "failed to roll back storage transaction after use-case error");
                }
                Err(err)
            }
        }
    }
}
