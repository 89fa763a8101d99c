use crate::domain::types::{TransactionId, UserId, WalletId};
use common::MoneyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("user not found with ID: {0}")]
    NotFound(UserId),

    #[error("repository error: {0}")]
    RepositoryError(String),
}

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("wallet not found for user: {0}")]
    NotFound(UserId),

    #[error("wallet not found with ID: {0}")]
    NotFoundById(WalletId),

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("insufficient wallet balance")]
    InsufficientBalance,

    #[error("operation would result in a negative balance")]
    NegativeBalance,

    #[error("repository error: {0}")]
    RepositoryError(String),
}

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("transaction not found with ID: {0}")]
    NotFound(TransactionId),

    #[error("invalid transaction state: transaction {0} is not Pending")]
    InvalidState(TransactionId),

    #[error("repository error: {0}")]
    RepositoryError(String),
}

/// Error unificado que cruza el limite de un Unit-of-Work: todo lo que puede
/// fallar dentro de un caso de uso de billetera aterriza aqui, de forma que
/// `UnitOfWork::with_transaction` tenga un unico tipo de error con el cual
/// decidir rollback vs commit.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("messaging error: {0}")]
    Messaging(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("request exceeded its deadline")]
    Timeout,
}
