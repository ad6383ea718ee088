use rust_decimal::{Decimal, prelude::Zero};
use serde::Deserialize;
use thiserror::Error;

use crate::processor::ClientId;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Deposit,
    Withdrawal,
    Transfer,
    Sync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountCommand {
    Deposit { amount: Decimal },
    Withdraw { amount: Decimal },
    Transfer { amount: Decimal, destination: ClientId },
    Synchronize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountCommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error("Amount must be positive for {kind:?}")]
    NonPositiveAmount { kind: OperationKind },
    #[error("Destination client is required for Transfer")]
    DestinationRequired,
}

impl AccountCommand {
    pub fn parse_command(
        kind: OperationKind,
        amount: Option<Decimal>,
        destination: Option<ClientId>,
    ) -> Result<Self, AccountCommandError> {
        match kind {
            OperationKind::Deposit => Ok(Self::Deposit {
                amount: Self::parse_amount(kind, amount)?,
            }),
            OperationKind::Withdrawal => Ok(Self::Withdraw {
                amount: Self::parse_amount(kind, amount)?,
            }),
            OperationKind::Transfer => {
                let amount = Self::parse_amount(kind, amount)?;
                let Some(destination) = destination else {
                    return Err(AccountCommandError::DestinationRequired);
                };
                Ok(Self::Transfer {
                    amount,
                    destination,
                })
            }
            OperationKind::Sync => Ok(Self::Synchronize),
        }
    }

    fn parse_amount(
        kind: OperationKind,
        amount: Option<Decimal>,
    ) -> Result<Decimal, AccountCommandError> {
        let Some(amount) = amount else {
            return Err(AccountCommandError::AmountRequired { kind });
        };
        if amount > Decimal::zero() {
            Ok(amount)
        } else {
            Err(AccountCommandError::NonPositiveAmount { kind })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_commands() {
        let ten = Decimal::from(10);
        assert_eq!(
            AccountCommand::parse_command(OperationKind::Deposit, Some(ten), None).unwrap(),
            AccountCommand::Deposit { amount: ten }
        );
        assert_eq!(
            AccountCommand::parse_command(OperationKind::Withdrawal, Some(ten), Some(3)).unwrap(),
            AccountCommand::Withdraw { amount: ten }
        );
        assert_eq!(
            AccountCommand::parse_command(OperationKind::Transfer, Some(ten), Some(3)).unwrap(),
            AccountCommand::Transfer {
                amount: ten,
                destination: 3
            }
        );
        // amount is ignored for sync
        assert_eq!(
            AccountCommand::parse_command(OperationKind::Sync, Some(ten), None).unwrap(),
            AccountCommand::Synchronize
        );
    }

    #[test]
    fn parse_invalid_commands() {
        let err = AccountCommand::parse_command(OperationKind::Deposit, None, None).unwrap_err();
        assert_eq!(
            err,
            AccountCommandError::AmountRequired {
                kind: OperationKind::Deposit
            }
        );
        assert_eq!(err.to_string(), "Amount is required for Deposit");

        let err = AccountCommand::parse_command(
            OperationKind::Withdrawal,
            Some(Decimal::zero()),
            None,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Amount must be positive for Withdrawal");

        let err = AccountCommand::parse_command(OperationKind::Transfer, Some(Decimal::ONE), None)
            .unwrap_err();
        assert_eq!(err, AccountCommandError::DestinationRequired);
    }
}
