pub mod evm;
pub mod solana;
