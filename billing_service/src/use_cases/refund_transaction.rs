use std::sync::Arc;

use futures_util::FutureExt;

use crate::domain::error::Error;
use crate::domain::transaction::{Transaction, TransactionType};
use crate::domain::types::TransactionId;
use crate::domain::unit_of_work::{ScopedRepos, UnitOfWork};

/// Caso de uso: reembolsar una transaccion de debito previamente
/// completada, emitiendo un credito compensatorio por el mismo monto.
///
/// Reembolsar algo que no es un Debit es un no-op exitoso: no crea
/// ninguna fila ni toca el saldo. No es idempotente por el id de la
/// transaccion original — invocarlo dos veces produce dos creditos de
/// reembolso; la deduplicacion es responsabilidad del consumidor de la
/// cola (ver el consumidor entrante).
pub struct RefundTransaction {
    uow: Arc<dyn UnitOfWork>,
}

impl RefundTransaction {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    #[tracing::instrument(name = "RefundTransaction::execute", skip(self))]
    pub async fn execute(&self, transaction_id: TransactionId) -> Result<(), Error> {
        self.uow
            .with_transaction(Box::new(move |repos: ScopedRepos| {
                async move {
                    let original = repos.transactions.find_by_id(transaction_id).await?;

                    if original.transaction_type() != TransactionType::Debit {
                        return Ok(());
                    }

                    let mut wallet = repos.wallets.find_by_id(original.wallet_id()).await?;

                    let mut refund = Transaction::new(
                        wallet.id(),
                        original.user_id(),
                        original.sms_id(),
                        original.amount().clone(),
                        TransactionType::Credit,
                    );
                    repos.transactions.create(&refund).await?;

                    wallet.credit(original.amount())?;
                    repos.wallets.update_balance(&wallet).await?;

                    refund.mark_completed()?;
                    repos
                        .transactions
                        .update_status(refund.id(), refund.status())
                        .await?;

                    Ok(())
                }
                .boxed()
            }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::{
        MockTransactionRepository, MockUserRepository, MockWalletRepository,
    };
    use crate::domain::transaction::TransactionStatus;
    use crate::domain::types::{SmsId, UserId, WalletId};
    use crate::domain::unit_of_work::MockUnitOfWork;
    use crate::domain::wallet::Wallet;
    use common::Money;
    use num_bigint::BigInt;

    fn completed_debit(wallet_id: WalletId, user_id: UserId, amount: i64) -> Transaction {
        let mut tx = Transaction::new(
            wallet_id,
            user_id,
            Some(SmsId(uuid::Uuid::new_v4())),
            Money::new(BigInt::from(amount), "USD").unwrap(),
            TransactionType::Debit,
        );
        tx.mark_completed().unwrap();
        tx
    }

    fn completed_credit(wallet_id: WalletId, user_id: UserId, amount: i64) -> Transaction {
        let mut tx = Transaction::new(
            wallet_id,
            user_id,
            None,
            Money::new(BigInt::from(amount), "USD").unwrap(),
            TransactionType::Credit,
        );
        tx.mark_completed().unwrap();
        tx
    }

    fn uow_returning(original: Transaction, wallet: Wallet) -> MockUnitOfWork {
        let mut uow = MockUnitOfWork::new();
        uow.expect_with_transaction().returning(move |f| {
            let original = original.clone();
            let wallet = wallet.clone();

            let mut transactions = MockTransactionRepository::new();
            transactions
                .expect_find_by_id()
                .returning(move |_| Ok(original.clone()));
            transactions.expect_create().returning(|_| Ok(()));
            transactions.expect_update_status().returning(|_, _| Ok(()));

            let mut wallets = MockWalletRepository::new();
            wallets
                .expect_find_by_id()
                .returning(move |_| Ok(wallet.clone()));
            wallets.expect_update_balance().returning(|_| Ok(()));

            let repos = ScopedRepos {
                wallets: Arc::new(wallets),
                transactions: Arc::new(transactions),
                users: Arc::new(MockUserRepository::new()),
            };
            futures_util::executor::block_on(f(repos))
        });
        uow
    }

    #[tokio::test]
    async fn refund_of_debit_credits_the_wallet() {
        let user_id = UserId::new();
        let wallet_id = WalletId::new();
        let original = completed_debit(wallet_id, user_id, 250);
        let wallet = Wallet::new(user_id, "USD").unwrap();

        let uow = Arc::new(uow_returning(original.clone(), wallet));
        let use_case = RefundTransaction::new(uow);

        let result = use_case.execute(original.id()).await;
        assert!(result.is_ok());
        assert_eq!(original.status(), TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn refund_of_credit_is_a_no_op() {
        let user_id = UserId::new();
        let wallet_id = WalletId::new();
        let original = completed_credit(wallet_id, user_id, 250);
        let wallet = Wallet::new(user_id, "USD").unwrap();

        let mut uow = MockUnitOfWork::new();
        uow.expect_with_transaction().returning(move |f| {
            let original = original.clone();
            let mut transactions = MockTransactionRepository::new();
            transactions
                .expect_find_by_id()
                .returning(move |_| Ok(original.clone()));
            // No se espera ninguna escritura: ni create ni update_status.
            transactions.expect_create().times(0);
            transactions.expect_update_status().times(0);

            let mut wallets = MockWalletRepository::new();
            wallets.expect_find_by_id().times(0);
            wallets.expect_update_balance().times(0);

            let repos = ScopedRepos {
                wallets: Arc::new(wallets),
                transactions: Arc::new(transactions),
                users: Arc::new(MockUserRepository::new()),
            };
            futures_util::executor::block_on(f(repos))
        });

        let use_case = RefundTransaction::new(Arc::new(uow));
        let result = use_case.execute(TransactionId::new()).await;

        assert!(result.is_ok());
    }
}
