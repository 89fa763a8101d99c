use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::domain::types::{TransactionId, UserId, WalletId};
use crate::domain::user::User;
use crate::domain::wallet::Wallet;

/// Puerto de persistencia para `Wallet`. Una instancia de este trait ya
/// esta ligada a un alcance de almacenamiento concreto (auto-commit o una
/// transaccion activa) — el `UnitOfWork` es quien decide cual, construyendo
/// la instancia correspondiente al abrir su alcance. Los casos de uso nunca
/// rebinden nada: reciben repositorios ya listos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Busca la billetera de un usuario. Cuando la implementacion esta
    /// ligada a una transaccion activa, este metodo adquiere un lock de
    /// fila exclusivo (`SELECT ... FOR UPDATE`) que se mantiene hasta que
    /// la transaccion hace commit o rollback.
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Wallet, Error>;

    async fn find_by_id(&self, id: WalletId) -> Result<Wallet, Error>;

    async fn save(&self, wallet: &Wallet) -> Result<(), Error>;

    /// Persiste el saldo actual de `wallet`. Se asume que `wallet` fue
    /// obtenida con `find_by_user_id`/`find_by_id` dentro del mismo
    /// alcance, de modo que el lock de fila sigue activo.
    async fn update_balance(&self, wallet: &Wallet) -> Result<(), Error>;
}

/// Puerto de persistencia para `Transaction`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, transaction: &Transaction) -> Result<(), Error>;

    async fn find_by_id(&self, id: TransactionId) -> Result<Transaction, Error>;

    async fn update_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<(), Error>;
}

/// Puerto de persistencia para `User`. El core de billetera solo necesita
/// `get_by_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<User, Error>;
}
