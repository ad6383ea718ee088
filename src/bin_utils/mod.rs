//! Bootstraps [`cute_bank`](crate) inside the binary: reads operations from
//! CSV, runs them against in-memory accounts and prints balances.

use std::{
    io::{Read, Write},
    sync::Arc,
};

use crate::{
    config::Config,
    processor::{
        OperationProcessor, TransactionProcessError, in_memory_processor::InMemoryProcessor,
    },
    random::RandomSource,
};
use anyhow::Result;
use csv_parser::CsvOperationParser;
use csv_printer::{AccountBalance, print_accounts};
use tracing::info;
pub mod csv_parser;
pub mod csv_printer;

/// Why a single input line was not applied.
#[derive(Debug)]
pub enum LineError {
    Parse(csv::Error),
    Process(TransactionProcessError),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub config: Config,
    pub random: Arc<dyn RandomSource>,
    pub error_printer: Box<dyn FnMut(u64, LineError) + Send>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub async fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        let mut processor = InMemoryProcessor::new(
            self.config.opening_balance,
            self.random,
            self.config.remote_settings(),
        );

        let mut applied = 0usize;
        for (line, row) in parser {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    (self.error_printer)(line, LineError::Parse(err));
                    continue;
                }
            };
            match processor
                .process_operation(row.client, row.kind, row.amount, row.destination)
                .await
            {
                Ok(()) => applied += 1,
                Err(err) => (self.error_printer)(line, LineError::Process(err)),
            }
        }
        info!(applied, accounts = processor.accounts.len(), "operations processed");

        let mut balances: Vec<_> = processor
            .accounts
            .iter()
            .map(|(client_id, acc)| AccountBalance {
                client: *client_id,
                balance: acc.balance(),
            })
            .collect();
        balances.sort_by_key(|acc| acc.client);
        print_accounts(self.output, balances.into_iter())
    }
}
