use std::io::Write;

use crate::processor::ClientId;
use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AccountBalance {
    pub client: ClientId,
    pub balance: Decimal,
}

pub fn print_accounts<W>(
    output: &mut W,
    accounts: impl Iterator<Item = AccountBalance>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in accounts {
        let client = acc.client;
        writer
            .serialize(acc)
            .with_context(|| format!("Failed to write balance of client {client}"))?;
    }
    writer.flush().context("Failed to flush balances")?;
    Ok(())
}
