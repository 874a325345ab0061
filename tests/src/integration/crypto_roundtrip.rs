//! Sign-then-verify round trips for both chain plug-ins, verified
//! independently of the plug-ins' own internal helpers — each test
//! recomputes the address/verification from scratch using the same
//! primitives a third-party client would.

#[cfg(test)]
mod tests {
    use ahw_07_chain_abstraction::plugins::evm::EvmPlugin;
    use ahw_07_chain_abstraction::plugins::solana::SolanaPlugin;
    use ahw_07_chain_abstraction::ChainPlugin;
    use ed25519_dalek::{Signature as EdSignature, Verifier, VerifyingKey};
    use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey as EcdsaVerifyingKey};
    use sha3::{Digest, Keccak256};

    fn personal_sign_hash(message: &[u8]) -> [u8; 32] {
        let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
        let mut hasher = Keccak256::new();
        hasher.update(prefix.as_bytes());
        hasher.update(message);
        hasher.finalize().into()
    }

    /// `personal_sign` on the EVM plug-in: recover the signer's public key
    /// from the 65-byte signature and confirm it both verifies against the
    /// message hash and hashes back to the signer's own advertised address.
    #[tokio::test]
    async fn evm_personal_sign_recovers_to_the_signers_own_address() {
        std::env::set_var("RUN_MODE", "test");
        let plugin = EvmPlugin::ethereum(vec![]);
        let wallet = plugin.create().unwrap();

        let message = b"Hello, wallet!";
        let signed = plugin.sign_message(&wallet.private_key, message).unwrap();

        let hex_sig = signed.signature.strip_prefix("0x").unwrap();
        let raw = hex::decode(hex_sig).unwrap();
        assert_eq!(raw.len(), 65, "personal-sign result must be exactly 65 bytes");

        let sig = EcdsaSignature::from_slice(&raw[..64]).unwrap();
        let recovery_byte = raw[64];
        assert!(recovery_byte == 27 || recovery_byte == 28);
        let recovery_id = RecoveryId::try_from(recovery_byte - 27).unwrap();

        let hash = personal_sign_hash(message);
        let recovered = EcdsaVerifyingKey::recover_from_prehash(&hash, &sig, recovery_id).unwrap();

        let point = recovered.to_encoded_point(false);
        let address_hash = Keccak256::digest(&point.as_bytes()[1..]);
        let recovered_address = format!("0x{}", hex::encode(&address_hash[12..]));
        assert_eq!(recovered_address, wallet.address);
    }

    /// Ed25519 on the Solana plug-in: a base58-decoded signature must be
    /// exactly 64 bytes and must verify against the base58-decoded public
    /// key over the exact message bytes that were signed.
    #[tokio::test]
    async fn solana_sign_message_round_trips_through_base58() {
        std::env::set_var("RUN_MODE", "test");
        let plugin = SolanaPlugin::solana(vec![]);
        let wallet = plugin.create().unwrap();

        let message = [72u8, 101, 108, 108, 111]; // "Hello"
        let signed = plugin.sign(&wallet.private_key, &message, false).unwrap();

        let sig_bytes = bs58::decode(&signed.signature).into_vec().unwrap();
        assert_eq!(sig_bytes.len(), 64);
        let pk_bytes = bs58::decode(&signed.public_key).into_vec().unwrap();
        assert_eq!(pk_bytes.len(), 32);

        let verifying_key = VerifyingKey::from_bytes(&pk_bytes.try_into().unwrap()).unwrap();
        let signature = EdSignature::from_bytes(&sig_bytes.try_into().unwrap());
        assert!(verifying_key.verify(&message, &signature).is_ok());
    }

    /// A malleated signature byte must fail verification — the round-trip
    /// law is two-sided: correct input verifies, tampered input doesn't.
    #[tokio::test]
    async fn tampering_with_an_ed25519_signature_breaks_verification() {
        std::env::set_var("RUN_MODE", "test");
        let plugin = SolanaPlugin::solana(vec![]);
        let wallet = plugin.create().unwrap();
        let message = b"do not tamper";
        let signed = plugin.sign(&wallet.private_key, message, false).unwrap();

        let mut sig_bytes = bs58::decode(&signed.signature).into_vec().unwrap();
        sig_bytes[0] ^= 0xFF;
        let pk_bytes = bs58::decode(&signed.public_key).into_vec().unwrap();

        let verifying_key = VerifyingKey::from_bytes(&pk_bytes.try_into().unwrap()).unwrap();
        let signature = EdSignature::from_bytes(&sig_bytes.try_into().unwrap());
        assert!(verifying_key.verify(message, &signature).is_err());
    }

    /// The two EVM aliases the registry serves (ethereum, bsc) differ only
    /// in their default required-confirmation count.
    #[test]
    fn evm_plugin_defaults_match_expected_confirmation_counts() {
        let eth = EvmPlugin::ethereum(vec![]);
        let bsc = EvmPlugin::bsc(vec![]);
        assert_eq!(eth.required_confirmations(), 6);
        assert_eq!(bsc.required_confirmations(), 3);
        assert_eq!(SolanaPlugin::solana(vec![]).required_confirmations(), 1);
    }
}
