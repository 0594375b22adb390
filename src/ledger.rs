use crate::{
    Rejection, SignatureVerifier, Transaction, TransactionId, TransactionValidator, UtxoPool,
};
use log::{debug, info};

/// The outcome of processing a batch of transactions.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Accepted transactions, in the order in which they were proposed.
    pub accepted: Vec<Transaction>,
    /// Rejected transactions and the reason they were rejected, in the order in which they
    /// were proposed.
    pub rejected: Vec<(TransactionId, Rejection)>,
}

/// Owns the current utxo pool and applies batches of proposed transactions to it.
///
/// Transactions are processed one at a time in the order in which they are proposed. Each one is
/// validated against the pool as updated by the transactions accepted before it, so two
/// transactions spending the same utxo are never both accepted: the first one wins, regardless of
/// amounts or fees. A rejected transaction is not retried, even if a later transaction in the
/// same batch creates the utxo it spends.
pub struct Ledger<V> {
    pool: UtxoPool,
    validator: TransactionValidator<V>,
}

impl<V: SignatureVerifier> Ledger<V> {
    /// Takes ownership of the pool. Pass a clone to keep the original pool unchanged.
    pub fn new(pool: UtxoPool, verifier: V) -> Self {
        Self {
            pool,
            validator: TransactionValidator::new(verifier),
        }
    }

    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    pub fn into_pool(self) -> UtxoPool {
        self.pool
    }

    /// Checks the transaction against the current pool.
    pub fn is_valid(&self, transaction: &Transaction) -> bool {
        self.validator.is_valid(transaction, &self.pool)
    }

    pub fn validate(&self, transaction: &Transaction) -> Result<(), Rejection> {
        self.validator.validate(transaction, &self.pool)
    }

    /// Accepts the transactions that are valid in the order they are proposed, updates the pool
    /// and returns the accepted transactions.
    pub fn process_batch(&mut self, candidates: &[Transaction]) -> Vec<Transaction> {
        self.process_batch_with_report(candidates).accepted
    }

    pub fn process_batch_with_report(&mut self, candidates: &[Transaction]) -> BatchReport {
        let mut report = BatchReport::default();
        for candidate in candidates {
            match self.validator.validate(candidate, &self.pool) {
                Ok(()) => {
                    self.apply(candidate);
                    debug!("Accepted transaction: {}", candidate.id());
                    report.accepted.push(candidate.clone());
                }
                Err(rejection) => {
                    debug!("Rejected transaction: {}: {}", candidate.id(), rejection);
                    report.rejected.push((*candidate.id(), rejection));
                }
            }
        }
        info!(
            "Processed batch of {} transactions: {} accepted, {} rejected, {} utxos in the pool",
            candidates.len(),
            report.accepted.len(),
            report.rejected.len(),
            self.pool.len()
        );
        report
    }

    /// Spends the transaction's inputs and adds its outputs to the pool.
    ///
    /// Preconditions:
    ///   - The transaction is valid against the current pool.
    fn apply(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            self.pool.remove(input.utxo());
        }
        for (utxo, output) in transaction.output_utxos() {
            self.pool.add(utxo, output.clone());
        }
    }
}
