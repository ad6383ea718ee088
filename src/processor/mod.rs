use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::AccountError,
    command::{AccountCommandError, OperationKind},
};

pub mod in_memory_processor;

#[derive(Debug, Error)]
pub enum TransactionProcessError {
    #[error(transparent)]
    CommandErr(#[from] AccountCommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
}

pub type ClientId = u16;

#[async_trait]
pub trait OperationProcessor {
    async fn process_operation(
        &mut self,
        client_id: ClientId,
        kind: OperationKind,
        amount: Option<Decimal>,
        destination: Option<ClientId>,
    ) -> Result<(), TransactionProcessError>;
}
