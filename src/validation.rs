use crate::{Amount, SignatureVerifier, Transaction, Utxo, UtxoPool};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The reason a transaction is not valid against a utxo pool.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Rejection {
    /// Two or more inputs of the transaction spend the same utxo.
    DuplicateInput(Utxo),
    /// An input spends a utxo that is not in the pool.
    MissingUtxo(Utxo),
    /// The signature of the input doesn't verify against the owner of the spent output.
    InvalidSignature { input_index: usize },
    NegativeOutput { output_index: usize, amount: Amount },
    /// The outputs spend more than the inputs provide.
    InsufficientInputs { inputs: Amount, outputs: Amount },
    /// The input or output amounts don't add up without overflowing.
    AmountOverflow,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::DuplicateInput(utxo) => write!(f, "Utxo: {} is spent more than once", utxo),
            Rejection::MissingUtxo(utxo) => write!(f, "Utxo: {} is not in the pool", utxo),
            Rejection::InvalidSignature { input_index } => {
                write!(f, "Input: {} has an invalid signature", input_index)
            }
            Rejection::NegativeOutput {
                output_index,
                amount,
            } => write!(
                f,
                "Output: {} has a negative amount: {}",
                output_index, amount
            ),
            Rejection::InsufficientInputs { inputs, outputs } => write!(
                f,
                "Outputs: {} exceed inputs: {}",
                outputs, inputs
            ),
            Rejection::AmountOverflow => write!(f, "Transaction amounts overflow"),
        }
    }
}

impl Error for Rejection {}

/// Responsible for checking whether a transaction can be applied to a utxo pool.
///
/// A transaction is valid if:
///   - it doesn't spend any utxo more than once,
///   - every utxo it spends is in the pool,
///   - every input is signed by the owner of the output it spends,
///   - none of its outputs is negative,
///   - its inputs are worth at least as much as its outputs.
/// The difference between the inputs and the outputs is an implicit fee.
pub struct TransactionValidator<V> {
    verifier: V,
}

impl<V: SignatureVerifier> TransactionValidator<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    pub fn is_valid(&self, transaction: &Transaction, pool: &UtxoPool) -> bool {
        self.validate(transaction, pool).is_ok()
    }

    /// Returns the first check the transaction fails. The pool is never modified.
    pub fn validate(&self, transaction: &Transaction, pool: &UtxoPool) -> Result<(), Rejection> {
        Self::validate_no_duplicate_inputs(transaction)?;
        let inputs = self.validate_inputs(transaction, pool)?;
        Self::validate_outputs_non_negative(transaction)?;
        let outputs = Amount::checked_sum(transaction.outputs().iter().map(|o| o.amount()))
            .ok_or(Rejection::AmountOverflow)?;
        if inputs >= outputs {
            Ok(())
        } else {
            Err(Rejection::InsufficientInputs { inputs, outputs })
        }
    }

    fn validate_no_duplicate_inputs(transaction: &Transaction) -> Result<(), Rejection> {
        let mut spent = HashSet::new();
        for input in transaction.inputs() {
            if !spent.insert(input.utxo()) {
                return Err(Rejection::DuplicateInput(*input.utxo()));
            }
        }
        Ok(())
    }

    /// Checks that every input spends an existing utxo owned by its signer and returns the total
    /// amount of the spent outputs.
    fn validate_inputs(
        &self,
        transaction: &Transaction,
        pool: &UtxoPool,
    ) -> Result<Amount, Rejection> {
        let mut total = Amount::zero();
        for (input_index, input) in transaction.inputs().iter().enumerate() {
            // There is no owner to verify the signature against if the utxo is missing.
            let spent = pool
                .get(input.utxo())
                .ok_or(Rejection::MissingUtxo(*input.utxo()))?;
            let data = transaction.signable_data(input_index);
            if !self
                .verifier
                .verify(&data, input.signature(), spent.owner())
            {
                return Err(Rejection::InvalidSignature { input_index });
            }
            total = total
                .checked_add(spent.amount())
                .ok_or(Rejection::AmountOverflow)?;
        }
        Ok(total)
    }

    fn validate_outputs_non_negative(transaction: &Transaction) -> Result<(), Rejection> {
        match transaction
            .outputs()
            .iter()
            .enumerate()
            .find(|(_, output)| output.amount().is_negative())
        {
            None => Ok(()),
            Some((output_index, output)) => Err(Rejection::NegativeOutput {
                output_index,
                amount: output.amount(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Ed25519Verifier, KeyPair, OutputIndex, PublicKey, Sha256, Signature, TransactionBuilder,
        TransactionId, TransactionInput, TransactionOutput,
    };

    struct AcceptAll;

    impl SignatureVerifier for AcceptAll {
        fn verify(&self, _: &[u8], _: &Signature, _: &PublicKey) -> bool {
            true
        }
    }

    fn key(seed: u8) -> KeyPair {
        KeyPair::from_secret_bytes([seed; 32])
    }

    fn utxo(seed: &[u8], index: u32) -> Utxo {
        Utxo::new(
            TransactionId::new(Sha256::digest(seed)),
            OutputIndex::new(index),
        )
    }

    /// A pool with utxo a:0 worth 10 and utxo a:1 worth 5, both owned by key 1.
    fn pool() -> UtxoPool {
        let mut pool = UtxoPool::new();
        pool.add(
            utxo(b"a", 0),
            TransactionOutput::new(Amount::new(10), key(1).public_key()),
        );
        pool.add(
            utxo(b"a", 1),
            TransactionOutput::new(Amount::new(5), key(1).public_key()),
        );
        pool
    }

    fn signed(inputs: &[Utxo], outputs: &[i64], signer: &KeyPair) -> Transaction {
        let mut builder = TransactionBuilder::new();
        for input in inputs {
            builder.add_input(*input);
        }
        for amount in outputs {
            builder.add_output(Amount::new(*amount), key(2).public_key());
        }
        for input_index in 0..inputs.len() {
            builder.sign_input(input_index, signer).unwrap();
        }
        builder.build().unwrap()
    }

    fn validator() -> TransactionValidator<Ed25519Verifier> {
        TransactionValidator::new(Ed25519Verifier)
    }

    #[test]
    fn valid_transaction() {
        let tx = signed(&[utxo(b"a", 0), utxo(b"a", 1)], &[12, 3], &key(1));
        assert_eq!(validator().validate(&tx, &pool()), Ok(()));
    }

    #[test]
    fn transaction_without_inputs_or_outputs_is_valid() {
        let tx = TransactionBuilder::new().build().unwrap();
        assert!(validator().is_valid(&tx, &pool()));
    }

    #[test]
    fn spending_missing_utxo_is_invalid() {
        let tx = signed(&[utxo(b"a", 0), utxo(b"b", 0)], &[1], &key(1));
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::MissingUtxo(utxo(b"b", 0)))
        );
    }

    #[test]
    fn missing_utxo_is_reported_before_signature() {
        let tx = signed(&[utxo(b"b", 0)], &[1], &key(9));
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::MissingUtxo(utxo(b"b", 0)))
        );
    }

    #[test]
    fn signature_by_non_owner_is_invalid() {
        let tx = signed(&[utxo(b"a", 0)], &[10], &key(2));
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::InvalidSignature { input_index: 0 })
        );
    }

    #[test]
    fn signature_over_tampered_data_is_invalid() {
        let mut builder = TransactionBuilder::new();
        builder
            .add_input(utxo(b"a", 0))
            .add_output(Amount::new(10), key(2).public_key());
        let mut data = builder.signable_data(0);
        data[0] ^= 1;
        builder.set_signature(0, key(1).sign(&data)).unwrap();
        let tx = builder.build().unwrap();
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::InvalidSignature { input_index: 0 })
        );
    }

    #[test]
    fn signature_for_another_input_is_invalid() {
        let mut builder = TransactionBuilder::new();
        builder
            .add_input(utxo(b"a", 0))
            .add_input(utxo(b"a", 1))
            .add_output(Amount::new(15), key(2).public_key());
        let signature = key(1).sign(&builder.signable_data(0));
        builder.set_signature(0, signature.clone()).unwrap();
        builder.set_signature(1, signature).unwrap();
        let tx = builder.build().unwrap();
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::InvalidSignature { input_index: 1 })
        );
    }

    #[test]
    fn unsigned_input_is_invalid() {
        let mut builder = TransactionBuilder::new();
        builder
            .add_input(utxo(b"a", 0))
            .add_output(Amount::new(1), key(2).public_key());
        let tx = builder.build().unwrap();
        assert!(!validator().is_valid(&tx, &pool()));
    }

    #[test]
    fn spending_same_utxo_twice_is_invalid() {
        let tx = signed(&[utxo(b"a", 0), utxo(b"a", 0)], &[1], &key(1));
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::DuplicateInput(utxo(b"a", 0)))
        );
    }

    #[test]
    fn duplicate_inputs_are_invalid_even_if_signatures_are_accepted() {
        let tx = signed(
            &[utxo(b"a", 1), utxo(b"a", 0), utxo(b"a", 1)],
            &[1],
            &key(1),
        );
        let validator = TransactionValidator::new(AcceptAll);
        assert_eq!(
            validator.validate(&tx, &pool()),
            Err(Rejection::DuplicateInput(utxo(b"a", 1)))
        );
    }

    #[test]
    fn negative_output_is_invalid() {
        let tx = signed(&[utxo(b"a", 0)], &[-1], &key(1));
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::NegativeOutput {
                output_index: 0,
                amount: Amount::new(-1)
            })
        );
    }

    #[test]
    fn negative_output_is_invalid_even_if_it_balances_other_outputs() {
        let tx = signed(&[utxo(b"a", 0)], &[12, -2], &key(1));
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::NegativeOutput {
                output_index: 1,
                amount: Amount::new(-2)
            })
        );
    }

    #[test]
    fn outputs_exceeding_inputs_are_invalid() {
        let tx = signed(&[utxo(b"a", 1)], &[3, 3], &key(1));
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::InsufficientInputs {
                inputs: Amount::new(5),
                outputs: Amount::new(6)
            })
        );
    }

    #[test]
    fn outputs_equal_to_inputs_are_valid() {
        let tx = signed(&[utxo(b"a", 1)], &[3, 2], &key(1));
        assert!(validator().is_valid(&tx, &pool()));
    }

    #[test]
    fn outputs_less_than_inputs_are_valid() {
        let tx = signed(&[utxo(b"a", 1)], &[1], &key(1));
        assert!(validator().is_valid(&tx, &pool()));
    }

    #[test]
    fn overflowing_outputs_are_invalid() {
        let tx = signed(&[utxo(b"a", 0)], &[i64::MAX, 1], &key(1));
        assert_eq!(
            validator().validate(&tx, &pool()),
            Err(Rejection::AmountOverflow)
        );
    }

    #[test]
    fn overflowing_inputs_are_invalid() {
        let mut pool = UtxoPool::new();
        pool.add(
            utxo(b"a", 0),
            TransactionOutput::new(Amount::new(i64::MAX), key(1).public_key()),
        );
        pool.add(
            utxo(b"b", 0),
            TransactionOutput::new(Amount::new(1), key(1).public_key()),
        );
        let tx = signed(&[utxo(b"a", 0), utxo(b"b", 0)], &[1], &key(1));
        assert_eq!(
            validator().validate(&tx, &pool),
            Err(Rejection::AmountOverflow)
        );
    }

    #[test]
    fn validation_does_not_modify_the_pool() {
        let pool = pool();
        let before = pool.clone();
        let tx = signed(&[utxo(b"a", 0)], &[10], &key(1));
        assert!(validator().is_valid(&tx, &pool));
        assert!(validator().is_valid(&tx, &pool));
        assert_eq!(pool, before);
    }

    #[test]
    fn verifier_receives_owner_of_spent_output() {
        struct OnlyOwner(PublicKey);

        impl SignatureVerifier for OnlyOwner {
            fn verify(&self, _: &[u8], _: &Signature, public_key: &PublicKey) -> bool {
                *public_key == self.0
            }
        }

        let tx = Transaction::new(
            vec![TransactionInput::new(utxo(b"a", 0), Signature::empty())],
            vec![],
        )
        .unwrap();
        assert!(TransactionValidator::new(OnlyOwner(key(1).public_key())).is_valid(&tx, &pool()));
        assert!(!TransactionValidator::new(OnlyOwner(key(2).public_key())).is_valid(&tx, &pool()));
    }
}
