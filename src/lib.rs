/// Client account balance management: deposit, withdraw, transfer and
/// synchronization with a (simulated) remote balance.
pub mod account;

/// Injectable random number sources used by the remote balance simulation.
pub mod random;

/// One-shot and repeating callback scheduling.
pub mod timer;

/// Reading text files relative to a base directory.
pub mod file_reader;

pub mod throttle;

/// JSON GET client, throttled.
pub mod api;

pub mod config;

/// Account commands parsed from raw operation rows, later executed on [`account`].
pub mod command;

/// Operation processor interface, plus "in memory" implementation.
pub mod processor;

/// Bootstraps the core logic for the binary; kept in the library so the
/// integration test can drive it.
pub mod bin_utils;
