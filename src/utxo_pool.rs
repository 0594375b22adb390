use crate::{Amount, TransactionOutput, Utxo};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::iter::FromIterator;

/// A pool of confirmed and unspent transaction outputs.
///
/// The pool owns its outputs, so a clone is an independent copy: mutating the clone is never
/// visible through the original and vice versa.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<UtxoPoolEntry>", into = "Vec<UtxoPoolEntry>")]
pub struct UtxoPool {
    // Unspent transaction outputs, indexed by their transaction ID and their index in the
    // transaction.
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Adds the output to the pool, replacing any output previously stored for the same utxo.
    pub fn add(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    /// Removes the utxo from the pool. Removing a utxo that isn't in the pool does nothing.
    pub fn remove(&mut self, utxo: &Utxo) {
        self.utxos.remove(utxo);
    }

    pub fn get(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    /// Returns all utxos in the pool, in no particular order.
    pub fn all_utxos(&self) -> Vec<Utxo> {
        self.iter().map(|(utxo, _)| *utxo).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Utxo, &TransactionOutput)> {
        self.utxos.iter()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// The sum of all unspent outputs, or None if it overflows.
    pub fn total_amount(&self) -> Option<Amount> {
        Amount::checked_sum(self.iter().map(|(_, output)| output.amount()))
    }
}

impl FromIterator<(Utxo, TransactionOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (Utxo, TransactionOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}

/// A single pool entry, as it is stored in a pool file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtxoPoolEntry {
    utxo: Utxo,
    output: TransactionOutput,
}

impl From<Vec<UtxoPoolEntry>> for UtxoPool {
    fn from(entries: Vec<UtxoPoolEntry>) -> Self {
        let mut pool = UtxoPool::new();
        for entry in entries {
            if pool.contains(&entry.utxo) {
                warn!("Utxo: {} appears more than once, keeping the last entry", entry.utxo);
            }
            pool.add(entry.utxo, entry.output);
        }
        pool
    }
}

impl From<UtxoPool> for Vec<UtxoPoolEntry> {
    fn from(pool: UtxoPool) -> Self {
        let mut entries = pool
            .utxos
            .into_iter()
            .map(|(utxo, output)| UtxoPoolEntry { utxo, output })
            .collect::<Vec<_>>();
        // Sorted so that the same pool always serializes to the same file.
        entries.sort_by(|lhs, rhs| lhs.utxo.cmp(&rhs.utxo));
        entries
    }
}
