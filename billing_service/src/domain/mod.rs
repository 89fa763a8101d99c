pub mod error;
pub mod events;
pub mod repository;
pub mod transaction;
pub mod types;
pub mod unit_of_work;
pub mod user;
pub mod wallet;

pub use error::Error;
pub use events::{DebitRequestEnvelope, Publisher, RefundRequestEnvelope, SmsDebited};
pub use repository::{TransactionRepository, UserRepository, WalletRepository};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
pub use types::{SmsId, TransactionId, UserId, WalletId};
pub use unit_of_work::{ScopedRepos, UnitOfWork};
pub use user::User;
pub use wallet::Wallet;
