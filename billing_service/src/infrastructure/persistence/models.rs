use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::domain::types::{SmsId, TransactionId, UserId, WalletId};
use crate::domain::user::User;
use crate::domain::wallet::Wallet;
use common::Money;

/// Fila cruda de la tabla `wallets`. El saldo se guarda como texto decimal
/// (columna `TEXT`) para preservar precision arbitraria: una columna
/// `NUMERIC` binaria de escala fija truncaria el entero de precision
/// arbitraria que maneja el dominio.
#[derive(Debug, FromRow)]
pub struct WalletRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WalletRow {
    pub fn into_domain(self) -> Result<Wallet, Error> {
        let amount = self
            .balance
            .parse::<BigInt>()
            .map_err(|e| Error::Storage(format!("corrupt wallet balance: {e}")))?;
        let balance = Money::new(amount, &self.currency)?;
        Ok(Wallet::reconstitute(
            WalletId(self.id),
            UserId(self.user_id),
            balance,
            self.currency,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Fila cruda de la tabla `transactions`.
#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    pub sms_id: Option<Uuid>,
    pub amount: String,
    pub currency: String,
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRow {
    pub fn into_domain(self) -> Result<Transaction, Error> {
        let amount = self
            .amount
            .parse::<BigInt>()
            .map_err(|e| Error::Storage(format!("corrupt transaction amount: {e}")))?;
        let amount = Money::new(amount, &self.currency)?;
        Ok(Transaction::reconstitute(
            TransactionId(self.id),
            WalletId(self.wallet_id),
            UserId(self.user_id),
            self.sms_id.map(SmsId),
            amount,
            self.transaction_type,
            self.status,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Fila cruda de la tabla `users`.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub wallet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_domain(self) -> User {
        User::reconstitute(
            UserId(self.id),
            self.name,
            self.last_name,
            self.phone,
            self.wallet_id.map(WalletId),
            self.created_at,
            self.updated_at,
        )
    }
}
