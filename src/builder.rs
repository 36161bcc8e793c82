use std::sync::Arc;

use prost::Message;
use uuid::Uuid;

use crate::{
    addressing,
    codec,
    constants::{FAMILY_NAME, FAMILY_VERSION},
    crypto::Signer,
    error::{AppError, Result},
    models::{Action, Batch, BatchHeader, BatchList, Transaction, TransactionHeader},
};

/// Builds signed xo transactions and batches for one signing identity.
#[derive(Clone)]
pub struct TransactionBuilder {
    signer: Arc<dyn Signer>,
}

impl TransactionBuilder {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self { signer }
    }

    pub fn public_key_hex(&self) -> &str {
        self.signer.public_key_hex()
    }

    /// Builds a transaction with a fresh random nonce, so repeated calls with
    /// the same intent never collide on the ledger.
    pub fn build_transaction(&self, game_name: &str, action: Action) -> Result<Transaction> {
        let nonce = Uuid::new_v4().to_string();
        self.build_transaction_with_nonce(game_name, action, &nonce)
    }

    /// Deterministic: identical inputs produce byte-identical transactions.
    pub fn build_transaction_with_nonce(
        &self,
        game_name: &str,
        action: Action,
        nonce: &str,
    ) -> Result<Transaction> {
        let argument = action.argument();
        let payload = codec::encode_payload(game_name, action.name(), argument.as_deref())?;
        let address = addressing::record_address(game_name);
        let public_key = self.signer.public_key_hex().to_string();

        let header = TransactionHeader {
            signer_public_key: public_key.clone(),
            family_name: FAMILY_NAME.to_string(),
            family_version: FAMILY_VERSION.to_string(),
            inputs: vec![address.clone()],
            outputs: vec![address],
            payload_sha512: addressing::hash(&payload),
            batcher_public_key: public_key,
            nonce: nonce.to_string(),
            dependencies: Vec::new(),
        };
        let header_bytes = header.encode_to_vec();
        let header_signature = self.signer.sign(&header_bytes)?;

        tracing::debug!(
            "Built {} transaction for game {} ({})",
            action.name(),
            game_name,
            header_signature
        );

        Ok(Transaction {
            header: header_bytes,
            header_signature,
            payload,
        })
    }

    /// Wraps transactions into one atomically committed batch. Header ids keep
    /// the order of `transactions`.
    pub fn build_batch(&self, transactions: Vec<Transaction>) -> Result<Batch> {
        if transactions.is_empty() {
            return Err(AppError::BadRequest(
                "A batch needs at least one transaction".to_string(),
            ));
        }

        let header = BatchHeader {
            signer_public_key: self.signer.public_key_hex().to_string(),
            transaction_ids: transactions
                .iter()
                .map(|txn| txn.header_signature.clone())
                .collect(),
        };
        let header_bytes = header.encode_to_vec();
        let header_signature = self.signer.sign(&header_bytes)?;

        Ok(Batch {
            header: header_bytes,
            header_signature,
            transactions,
            trace: false,
        })
    }

    /// Convenience for the common single-transaction case.
    pub fn build_single_batch(&self, game_name: &str, action: Action) -> Result<Batch> {
        let transaction = self.build_transaction(game_name, action)?;
        self.build_batch(vec![transaction])
    }
}

pub fn build_batch_list(batches: Vec<Batch>) -> BatchList {
    BatchList { batches }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{signature::verify, PrivateKey, Secp256k1Signer};

    const PRIVATE_KEY_HEX: &str =
        "80378f103c7f1ea5856d50f2dcdf38b97da5986e9b32297be2de3c8444c38c08";

    fn builder() -> TransactionBuilder {
        let key = PrivateKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        TransactionBuilder::new(Arc::new(Secp256k1Signer::new(key)))
    }

    fn header_of(txn: &Transaction) -> TransactionHeader {
        TransactionHeader::decode(txn.header.as_slice()).unwrap()
    }

    #[test]
    fn create_game_transaction_matches_wire_contract() {
        let builder = builder();
        let txn = builder.build_transaction("game-42", Action::Create).unwrap();
        let header = header_of(&txn);

        assert_eq!(txn.payload, b"game-42,create,null");
        let expected_address = format!(
            "{}{}",
            addressing::namespace_prefix(),
            &addressing::hash(b"game-42")[..64]
        );
        assert_eq!(header.inputs, vec![expected_address.clone()]);
        assert_eq!(header.outputs, vec![expected_address]);
        assert_eq!(header.family_name, "xo");
        assert_eq!(header.family_version, "1.0");
        assert_eq!(header.signer_public_key, builder.public_key_hex());
        assert_eq!(header.batcher_public_key, builder.public_key_hex());
        assert!(header.dependencies.is_empty());
    }

    #[test]
    fn payload_digest_covers_exact_payload_bytes() {
        let txn = builder()
            .build_transaction("game-42", Action::Take(3))
            .unwrap();
        assert_eq!(txn.payload, b"game-42,take,3");
        assert_eq!(header_of(&txn).payload_sha512, addressing::hash(&txn.payload));
    }

    #[test]
    fn header_signature_is_non_empty_and_verifies() {
        let builder = builder();
        let txn = builder.build_transaction("game-42", Action::Create).unwrap();
        assert!(!txn.header_signature.is_empty());
        assert!(verify(&txn.header_signature, &txn.header, builder.public_key_hex()).unwrap());
    }

    #[test]
    fn same_nonce_gives_identical_transactions() {
        let builder = builder();
        let a = builder
            .build_transaction_with_nonce("game-42", Action::Take(5), "fixed-nonce")
            .unwrap();
        let b = builder
            .build_transaction_with_nonce("game-42", Action::Take(5), "fixed-nonce")
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_nonces_make_repeated_builds_differ() {
        let builder = builder();
        let a = builder.build_transaction("game-42", Action::Create).unwrap();
        let b = builder.build_transaction("game-42", Action::Create).unwrap();
        assert_ne!(header_of(&a).nonce, header_of(&b).nonce);
        assert_ne!(a.header_signature, b.header_signature);
    }

    #[test]
    fn batch_ids_follow_transaction_order() {
        let builder = builder();
        let transactions: Vec<Transaction> = (1..=3)
            .map(|space| builder.build_transaction("game-42", Action::Take(space)).unwrap())
            .collect();
        let expected: Vec<String> = transactions
            .iter()
            .map(|t| t.header_signature.clone())
            .collect();

        let batch = builder.build_batch(transactions).unwrap();
        let header = BatchHeader::decode(batch.header.as_slice()).unwrap();

        assert_eq!(header.transaction_ids, expected);
        assert_eq!(header.transaction_ids.len(), batch.transactions.len());
        assert_eq!(header.signer_public_key, builder.public_key_hex());
        assert!(verify(&batch.header_signature, &batch.header, builder.public_key_hex()).unwrap());
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(
            builder().build_batch(Vec::new()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn invalid_game_name_never_reaches_signing() {
        assert!(matches!(
            builder().build_transaction("bad,name", Action::Create),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn batch_list_wraps_batches() {
        let builder = builder();
        let batch = builder.build_single_batch("game-42", Action::Create).unwrap();
        let list = build_batch_list(vec![batch.clone()]);
        assert_eq!(list.batches, vec![batch]);
        assert_eq!(BatchList::decode(list.encode_to_vec().as_slice()).unwrap(), list);
    }
}
