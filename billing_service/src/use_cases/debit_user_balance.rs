use std::sync::{Arc, Mutex};

use chrono::Utc;
use common::Money;
use futures_util::FutureExt;
use num_bigint::BigInt;

use crate::domain::error::Error;
use crate::domain::events::{Publisher, SmsDebited};
use crate::domain::transaction::{Transaction, TransactionType};
use crate::domain::types::{SmsId, UserId};
use crate::domain::unit_of_work::{ScopedRepos, UnitOfWork};

/// Caso de uso: debitar el saldo de un usuario a partir de una solicitud de
/// cobro del servicio de despacho de SMS.
///
/// Todo el trabajo contra el almacenamiento ocurre dentro de un unico
/// `UnitOfWork::with_transaction`, de modo que el decremento del saldo y la
/// transaccion Completed correspondiente se confirman juntas o ninguna lo
/// hace. El evento `SmsDebited` se publica recien despues de que el commit
/// tuvo exito: una falla al publicar no deshace el ledger (ver
/// `Publisher`).
pub struct DebitUserBalance {
    uow: Arc<dyn UnitOfWork>,
    publisher: Arc<dyn Publisher>,
}

impl DebitUserBalance {
    pub fn new(uow: Arc<dyn UnitOfWork>, publisher: Arc<dyn Publisher>) -> Self {
        Self { uow, publisher }
    }

    #[tracing::instrument(name = "DebitUserBalance::execute", skip(self))]
    pub async fn execute(
        &self,
        user_id: UserId,
        sms_id: SmsId,
        amount: i64,
    ) -> Result<(), Error> {
        let completed: Arc<Mutex<Option<SmsDebited>>> = Arc::new(Mutex::new(None));
        let completed_slot = completed.clone();

        self.uow
            .with_transaction(Box::new(move |repos: ScopedRepos| {
                async move {
                    let mut wallet = repos.wallets.find_by_user_id(user_id).await?;

                    let money = Money::new(BigInt::from(amount), wallet.currency())?;

                    let mut tx = Transaction::new(
                        wallet.id(),
                        user_id,
                        Some(sms_id),
                        money.clone(),
                        TransactionType::Debit,
                    );
                    repos.transactions.create(&tx).await?;

                    wallet.debit(&money)?;
                    repos.wallets.update_balance(&wallet).await?;

                    tx.mark_completed()?;
                    repos
                        .transactions
                        .update_status(tx.id(), tx.status())
                        .await?;

                    let minor_units = money
                        .amount()
                        .to_string()
                        .parse::<i64>()
                        .map_err(|e| Error::Storage(e.to_string()))?;

                    *completed_slot.lock().unwrap() = Some(SmsDebited {
                        user_id: user_id.0,
                        sms_id: sms_id.0,
                        amount: minor_units,
                        transaction_id: tx.id().0,
                        timestamp: Utc::now(),
                    });

                    Ok(())
                }
                .boxed()
            }))
            .await?;

        let event = completed
            .lock()
            .unwrap()
            .take()
            .expect("closure sets the event on every Ok path");

        if let Err(err) = self.publisher.publish_sms_debited(event).await {
            tracing::error!(error = %err, "failed to publish SmsDebited after commit");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::WalletError;
    use crate::domain::events::MockPublisher;
    use crate::domain::repository::{
        MockTransactionRepository, MockUserRepository, MockWalletRepository,
    };
    use crate::domain::unit_of_work::MockUnitOfWork;
    use crate::domain::wallet::Wallet;

    fn wallet_with_balance(user_id: UserId, balance: i64) -> Wallet {
        let mut wallet = Wallet::new(user_id, "USD").unwrap();
        if balance > 0 {
            wallet
                .credit(&Money::new(BigInt::from(balance), "USD").unwrap())
                .unwrap();
        }
        wallet
    }

    fn scoped_repos(wallet: Wallet) -> ScopedRepos {
        let mut wallets = MockWalletRepository::new();
        wallets
            .expect_find_by_user_id()
            .returning(move |_| Ok(wallet.clone()));
        wallets.expect_update_balance().returning(|_| Ok(()));

        let mut transactions = MockTransactionRepository::new();
        transactions.expect_create().returning(|_| Ok(()));
        transactions.expect_update_status().returning(|_, _| Ok(()));

        ScopedRepos {
            wallets: Arc::new(wallets),
            transactions: Arc::new(transactions),
            users: Arc::new(MockUserRepository::new()),
        }
    }

    fn uow_running_on(wallet: Wallet) -> MockUnitOfWork {
        let mut uow = MockUnitOfWork::new();
        uow.expect_with_transaction().returning(move |f| {
            let repos = scoped_repos(wallet.clone());
            futures_util::executor::block_on(f(repos))
        });
        uow
    }

    #[tokio::test]
    async fn happy_path_debit_publishes_event() {
        let user_id = UserId::new();
        let wallet = wallet_with_balance(user_id, 1000);
        let uow = Arc::new(uow_running_on(wallet));

        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish_sms_debited()
            .times(1)
            .returning(|_| Ok(()));

        let use_case = DebitUserBalance::new(uow, Arc::new(publisher));
        let result = use_case
            .execute(user_id, SmsId(uuid::Uuid::new_v4()), 250)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn insufficient_balance_does_not_publish() {
        let user_id = UserId::new();
        let wallet = wallet_with_balance(user_id, 100);
        let uow = Arc::new(uow_running_on(wallet));

        let mut publisher = MockPublisher::new();
        publisher.expect_publish_sms_debited().times(0);

        let use_case = DebitUserBalance::new(uow, Arc::new(publisher));
        let result = use_case
            .execute(user_id, SmsId(uuid::Uuid::new_v4()), 500)
            .await;

        assert!(matches!(
            result,
            Err(Error::Wallet(WalletError::InsufficientBalance))
        ));
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_the_use_case() {
        let user_id = UserId::new();
        let wallet = wallet_with_balance(user_id, 1000);
        let uow = Arc::new(uow_running_on(wallet));

        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish_sms_debited()
            .times(1)
            .returning(|_| Err(Error::Messaging("broker unreachable".into())));

        let use_case = DebitUserBalance::new(uow, Arc::new(publisher));
        let result = use_case
            .execute(user_id, SmsId(uuid::Uuid::new_v4()), 250)
            .await;

        assert!(result.is_ok());
    }
}
