pub mod models;
pub mod transaction_repository;
pub mod unit_of_work;
pub mod user_repository;
pub mod wallet_repository;

pub use transaction_repository::PostgresTransactionRepository;
pub use unit_of_work::PostgresUnitOfWork;
pub use user_repository::PostgresUserRepository;
pub use wallet_repository::PostgresWalletRepository;
