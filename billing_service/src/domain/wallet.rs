use chrono::{DateTime, Utc};
use common::Money;
use serde::{Deserialize, Serialize};

use crate::domain::error::WalletError;
use crate::domain::types::{UserId, WalletId};

/// Billetera de un unico usuario. Invariantes que esta entidad mantiene por
/// construccion:
/// - `balance.currency() == currency` siempre.
/// - `balance` nunca es negativo.
///
/// Es un objeto de dominio puro: no sabe nada de persistencia. El caso de
/// uso es responsable de hacer durable cualquier mutacion dentro de un
/// Unit-of-Work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    id: WalletId,
    user_id: UserId,
    balance: Money,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Crea una billetera nueva con saldo cero, una por usuario.
    pub fn new(user_id: UserId, currency: &str) -> Result<Self, WalletError> {
        let balance =
            Money::zero(currency).map_err(|e| WalletError::RepositoryError(e.to_string()))?;
        let now = Utc::now();
        Ok(Self {
            id: WalletId::new(),
            user_id,
            currency: balance.currency().to_string(),
            balance,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruye una billetera leida desde almacenamiento. No vuelve a
    /// aplicar reglas de creacion (ya fueron validadas al persistir).
    pub fn reconstitute(
        id: WalletId,
        user_id: UserId,
        balance: Money,
        currency: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            balance,
            currency,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> WalletId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn balance(&self) -> &Money {
        &self.balance
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Aumenta el saldo. Falla si el monto es cero, negativo, o de otra
    /// divisa.
    pub fn credit(&mut self, amount: &Money) -> Result<(), WalletError> {
        if amount.is_zero() || amount.is_negative() {
            return Err(WalletError::InvalidAmount);
        }
        let new_balance = self
            .balance
            .add(amount)
            .map_err(|_| WalletError::InvalidAmount)?;
        self.balance = new_balance;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Reduce el saldo. Falla si el monto es cero/negativo/otra divisa, o si
    /// el saldo resultante seria negativo (`InsufficientBalance`).
    pub fn debit(&mut self, amount: &Money) -> Result<(), WalletError> {
        if amount.is_zero() || amount.is_negative() {
            return Err(WalletError::InvalidAmount);
        }
        let has_enough = self
            .balance
            .greater_than_or_equal(amount)
            .map_err(|_| WalletError::InvalidAmount)?;
        if !has_enough {
            return Err(WalletError::InsufficientBalance);
        }
        let new_balance = self
            .balance
            .subtract(amount)
            .map_err(|_| WalletError::NegativeBalance)?;
        self.balance = new_balance;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn money(v: i64, cur: &str) -> Money {
        Money::new(BigInt::from(v), cur).unwrap()
    }

    #[test]
    fn new_wallet_has_zero_balance() {
        let w = Wallet::new(UserId::new(), "usd").unwrap();
        assert!(w.balance().is_zero());
        assert_eq!(w.currency(), "USD");
    }

    #[test]
    fn debit_reduces_balance() {
        let mut w = Wallet::new(UserId::new(), "USD").unwrap();
        w.credit(&money(1000, "USD")).unwrap();
        w.debit(&money(250, "USD")).unwrap();
        assert_eq!(w.balance().amount(), BigInt::from(750));
    }

    #[test]
    fn debit_insufficient_balance_leaves_wallet_untouched() {
        let mut w = Wallet::new(UserId::new(), "USD").unwrap();
        w.credit(&money(100, "USD")).unwrap();
        let err = w.debit(&money(500, "USD")).unwrap_err();
        assert!(matches!(err, WalletError::InsufficientBalance));
        assert_eq!(w.balance().amount(), BigInt::from(100));
    }

    #[test]
    fn debit_zero_amount_rejected() {
        let mut w = Wallet::new(UserId::new(), "USD").unwrap();
        assert!(matches!(
            w.debit(&money(0, "USD")),
            Err(WalletError::InvalidAmount)
        ));
    }

    #[test]
    fn credit_then_debit_round_trip() {
        let mut w = Wallet::new(UserId::new(), "USD").unwrap();
        w.credit(&money(1000, "USD")).unwrap();
        w.debit(&money(400, "USD")).unwrap();
        assert_eq!(w.balance().amount(), BigInt::from(600));
    }
}
