use std::{
    fmt,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::random::{RandomSource, ThreadRandom};

pub type AccountId = u64;

static NEXT_ACCOUNT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },
    #[error("Insufficient funds: cannot withdraw more than {balance}")]
    InsufficientFunds { balance: Decimal },
    #[error("Transfer failed")]
    TransferToSelf,
    #[error("Synchronization failed")]
    SynchronizationFailed,
}

/// How the simulated remote balance call behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteSettings {
    /// Upper bound (inclusive) of a fetched balance.
    pub max_balance: u32,
    /// Base delay of every fetch.
    pub latency: Duration,
    /// Extra random delay in `0..=jitter`, millisecond granularity.
    pub jitter: Duration,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            max_balance: 100,
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }
}

struct AccountInner {
    id: AccountId,
    balance: Mutex<Decimal>,
    random: Arc<dyn RandomSource>,
    latency_source: Arc<dyn RandomSource>,
    remote: RemoteSettings,
}

/// Handle to an in-memory bank account.
///
/// Clones share the same underlying account, so identity is by handle, not by
/// balance: two accounts opened with the same balance are still distinct.
#[derive(Clone)]
pub struct Account {
    inner: Arc<AccountInner>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.inner.id)
            .field("balance", &self.balance())
            .finish()
    }
}

impl Account {
    pub fn new(opening_balance: Decimal) -> Self {
        Self::with_remote(
            opening_balance,
            Arc::new(ThreadRandom),
            RemoteSettings::default(),
        )
    }

    pub fn with_remote(
        opening_balance: Decimal,
        random: Arc<dyn RandomSource>,
        remote: RemoteSettings,
    ) -> Self {
        Self::with_sources(opening_balance, random, Arc::new(ThreadRandom), remote)
    }

    /// Like [`Account::with_remote`], with latency jitter drawn from its own
    /// source so it never shifts the balance/success sequence.
    pub fn with_sources(
        opening_balance: Decimal,
        random: Arc<dyn RandomSource>,
        latency_source: Arc<dyn RandomSource>,
        remote: RemoteSettings,
    ) -> Self {
        Self {
            inner: Arc::new(AccountInner {
                id: NEXT_ACCOUNT_ID.fetch_add(1, Ordering::Relaxed),
                balance: Mutex::new(opening_balance),
                random,
                latency_source,
                remote,
            }),
        }
    }

    pub fn id(&self) -> AccountId {
        self.inner.id
    }

    pub fn is_same(&self, other: &Account) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn balance(&self) -> Decimal {
        *self.lock()
    }

    pub fn deposit(&self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        let mut balance = self.lock();
        *balance += amount;
        debug!(account = self.inner.id, %amount, balance = %*balance, "deposited");
        Ok(())
    }

    pub fn withdraw(&self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        let mut balance = self.lock();
        debit(&mut balance, amount)?;
        debug!(account = self.inner.id, %amount, balance = %*balance, "withdrawn");
        Ok(())
    }

    /// Moves `amount` to `destination`. Both balances are locked together
    /// (lower id first), so either both change or neither does.
    pub fn transfer(&self, amount: Decimal, destination: &Account) -> Result<(), AccountError> {
        if self.is_same(destination) {
            return Err(AccountError::TransferToSelf);
        }
        ensure_positive(amount)?;

        let (mut source, mut target) = if self.id() < destination.id() {
            let source = self.lock();
            (source, destination.lock())
        } else {
            let target = destination.lock();
            (self.lock(), target)
        };
        debit(&mut source, amount)?;
        *target += amount;
        debug!(
            from = self.inner.id,
            to = destination.inner.id,
            %amount,
            "transferred"
        );
        Ok(())
    }

    /// Simulated remote balance query.
    ///
    /// Draws a candidate balance first, then a success discriminator; returns
    /// `None` when the discriminator is zero.
    pub async fn fetch_balance(&self) -> Option<Decimal> {
        let random = &self.inner.random;
        let candidate = random.random(0..=self.inner.remote.max_balance);
        let succeeded = random.random(0..=1) != 0;

        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        debug!(account = self.inner.id, candidate, succeeded, "remote balance fetched");
        succeeded.then(|| Decimal::from(candidate))
    }

    /// Replaces the local balance with the remote one. The balance is only
    /// touched after the fetch resolves; concurrent calls are last-write-wins.
    pub async fn synchronize_balance(&self) -> Result<(), AccountError> {
        let Some(remote) = self.fetch_balance().await else {
            warn!(account = self.inner.id, "balance synchronization failed");
            return Err(AccountError::SynchronizationFailed);
        };
        *self.lock() = remote;
        info!(account = self.inner.id, balance = %remote, "balance synchronized");
        Ok(())
    }

    fn latency(&self) -> Duration {
        let RemoteSettings {
            latency, jitter, ..
        } = self.inner.remote;
        let jitter_ms = u32::try_from(jitter.as_millis()).unwrap_or(u32::MAX);
        if jitter_ms == 0 {
            return latency;
        }
        let extra = self.inner.latency_source.random(0..=jitter_ms);
        latency + Duration::from_millis(u64::from(extra))
    }

    fn lock(&self) -> MutexGuard<'_, Decimal> {
        // poisoning cannot leave a torn Decimal
        self.inner
            .balance
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), AccountError> {
    if amount > Decimal::zero() {
        Ok(())
    } else {
        Err(AccountError::InvalidAmount { amount })
    }
}

fn debit(balance: &mut Decimal, amount: Decimal) -> Result<(), AccountError> {
    if amount > *balance {
        return Err(AccountError::InsufficientFunds { balance: *balance });
    }
    *balance -= amount;
    Ok(())
}
