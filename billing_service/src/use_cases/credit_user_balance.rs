use std::sync::Arc;

use common::Money;
use futures_util::FutureExt;
use num_bigint::BigInt;

use crate::domain::error::{Error, WalletError};
use crate::domain::transaction::{Transaction, TransactionType};
use crate::domain::types::UserId;
use crate::domain::unit_of_work::{ScopedRepos, UnitOfWork};

/// Caso de uso: acreditar saldo a un usuario (tope-up por HTTP).
///
/// Misma forma que `DebitUserBalance`, con tipo Credit y sin `smsID`
/// externo: el dato es opcional en una transaccion de credito (ver el
/// modelo de datos). No se emite ningun evento en el diseno actual.
pub struct CreditUserBalance {
    uow: Arc<dyn UnitOfWork>,
}

impl CreditUserBalance {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    #[tracing::instrument(name = "CreditUserBalance::execute", skip(self))]
    pub async fn execute(&self, user_id: UserId, amount: i64) -> Result<(), Error> {
        if amount <= 0 {
            return Err(WalletError::InvalidAmount.into());
        }

        self.uow
            .with_transaction(Box::new(move |repos: ScopedRepos| {
                async move {
                    let mut wallet = repos.wallets.find_by_user_id(user_id).await?;

                    let money = Money::new(BigInt::from(amount), wallet.currency())?;

                    let mut tx = Transaction::new(
                        wallet.id(),
                        user_id,
                        None,
                        money.clone(),
                        TransactionType::Credit,
                    );
                    repos.transactions.create(&tx).await?;

                    wallet.credit(&money)?;
                    repos.wallets.update_balance(&wallet).await?;

                    tx.mark_completed()?;
                    repos
                        .transactions
                        .update_status(tx.id(), tx.status())
                        .await?;

                    Ok(())
                }
                .boxed()
            }))
            .await
    }
}
