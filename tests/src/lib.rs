//! Cross-crate integration tests for the wallet host.
//!
//! Unlike the `#[cfg(test)]` modules inside each `ahw-*` crate (which
//! exercise one component's contract in isolation), everything here wires
//! several components together the way `wallet-host`'s binary does, so a
//! regression at a seam between crates shows up even though no single
//! crate's own tests would catch it.

pub mod integration;
