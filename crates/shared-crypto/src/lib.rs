//! # Shared Crypto
//!
//! Cryptographic primitives shared by the chain-abstraction and vault
//! crates.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | AES-256-GCM, PBKDF2-HMAC-SHA256 | Vault encryption & key derivation |
//! | `signatures` | Ed25519 | Solana-family message signing |
//! | `ecdsa` | secp256k1 | EVM-family message signing |
//!
//! ## Security Properties
//!
//! - **AES-256-GCM**: 96-bit nonce, authenticated, hardware-accelerated
//! - **PBKDF2-HMAC-SHA256**: 100,000 rounds, fresh salt per record
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - **secp256k1**: RFC 6979 deterministic nonces

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod signatures;
pub mod symmetric;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use symmetric::{decrypt, encrypt, generate_salt, Nonce, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
