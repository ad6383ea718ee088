use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    account::{Account, RemoteSettings},
    command::{AccountCommand, OperationKind},
    random::{RandomSource, ThreadRandom},
};

use super::{ClientId, OperationProcessor, TransactionProcessError};

pub struct InMemoryProcessor {
    opening_balance: Decimal,
    random: Arc<dyn RandomSource>,
    remote: RemoteSettings,
    pub accounts: HashMap<ClientId, Account>,
}

impl Default for InMemoryProcessor {
    fn default() -> Self {
        Self::new(Decimal::ZERO, Arc::new(ThreadRandom), RemoteSettings::default())
    }
}

impl InMemoryProcessor {
    pub fn new(
        opening_balance: Decimal,
        random: Arc<dyn RandomSource>,
        remote: RemoteSettings,
    ) -> Self {
        Self {
            opening_balance,
            random,
            remote,
            accounts: HashMap::new(),
        }
    }

    /// Existing account, or a fresh one (flagged `true`) that is not
    /// registered yet.
    fn lookup(&self, client_id: ClientId) -> (Account, bool) {
        match self.accounts.get(&client_id) {
            Some(acc) => (acc.clone(), false),
            None => (
                Account::with_remote(self.opening_balance, self.random.clone(), self.remote),
                true,
            ),
        }
    }
}

#[async_trait]
impl OperationProcessor for InMemoryProcessor {
    async fn process_operation(
        &mut self,
        client_id: ClientId,
        kind: OperationKind,
        amount: Option<Decimal>,
        destination: Option<ClientId>,
    ) -> Result<(), TransactionProcessError> {
        let cmd = AccountCommand::parse_command(kind, amount, destination)?;
        // accounts are registered only once an operation on them succeeds
        let (acc, opened) = self.lookup(client_id);
        match cmd {
            AccountCommand::Deposit { amount } => acc.deposit(amount)?,
            AccountCommand::Withdraw { amount } => acc.withdraw(amount)?,
            AccountCommand::Transfer {
                amount,
                destination,
            } => {
                let (target, target_opened) = if destination == client_id {
                    (acc.clone(), false)
                } else {
                    self.lookup(destination)
                };
                acc.transfer(amount, &target)?;
                if target_opened {
                    self.accounts.insert(destination, target);
                }
            }
            AccountCommand::Synchronize => acc.synchronize_balance().await?,
        };
        if opened {
            self.accounts.insert(client_id, acc);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        account::AccountError, command::AccountCommandError, random::FixedSequence,
    };

    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[tokio::test]
    async fn process_some_operations() {
        let mut processor = InMemoryProcessor::new(
            dec(100),
            Arc::new(FixedSequence::new([42, 1, 42, 0])),
            RemoteSettings::default(),
        );
        processor
            .process_operation(1, OperationKind::Deposit, Some(dec(10)), None)
            .await
            .unwrap();
        processor
            .process_operation(1, OperationKind::Transfer, Some(dec(60)), Some(2))
            .await
            .unwrap();
        assert_eq!(processor.accounts.len(), 2);
        assert_eq!(processor.accounts[&1].balance(), dec(50));
        assert_eq!(processor.accounts[&2].balance(), dec(160));

        let err = processor
            .process_operation(1, OperationKind::Transfer, Some(dec(10)), Some(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionProcessError::AccountErr(AccountError::TransferToSelf)
        ));

        let err = processor
            .process_operation(3, OperationKind::Withdrawal, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionProcessError::CommandErr(AccountCommandError::AmountRequired {
                kind: OperationKind::Withdrawal
            })
        ));
        // command errors don't open accounts
        assert!(!processor.accounts.contains_key(&3));

        processor
            .process_operation(2, OperationKind::Sync, None, None)
            .await
            .unwrap();
        assert_eq!(processor.accounts[&2].balance(), dec(42));

        let err = processor
            .process_operation(2, OperationKind::Sync, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Synchronization failed");
        assert_eq!(processor.accounts[&2].balance(), dec(42));
    }

    #[tokio::test]
    async fn failed_operations_open_no_accounts() {
        let mut processor = InMemoryProcessor::new(
            dec(1000),
            Arc::new(FixedSequence::new([5, 0])),
            RemoteSettings::default(),
        );
        processor
            .process_operation(1, OperationKind::Deposit, Some(dec(10)), None)
            .await
            .unwrap();

        let err = processor
            .process_operation(1, OperationKind::Transfer, Some(dec(10000)), Some(9))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient funds: cannot withdraw more than 1010"
        );

        // unknown source, transferring to itself
        let err = processor
            .process_operation(4, OperationKind::Transfer, Some(dec(1)), Some(4))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionProcessError::AccountErr(AccountError::TransferToSelf)
        ));

        assert!(processor
            .process_operation(5, OperationKind::Withdrawal, Some(dec(5000)), None)
            .await
            .is_err());
        assert!(processor
            .process_operation(6, OperationKind::Sync, None, None)
            .await
            .is_err());

        assert_eq!(processor.accounts.len(), 1);
        assert_eq!(processor.accounts[&1].balance(), dec(1010));

        // a successful transfer opens the destination
        processor
            .process_operation(1, OperationKind::Transfer, Some(dec(10)), Some(9))
            .await
            .unwrap();
        assert_eq!(processor.accounts[&1].balance(), dec(1000));
        assert_eq!(processor.accounts[&9].balance(), dec(1010));
    }
}
