use crate::{Amount, KeyPair, PublicKey, Sha256, Signature};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

/// A double SHA-256 hash of the transaction data.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Sha256);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionId {
    pub fn new(data: Sha256) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// The index of the transaction output, the first one is 0.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputIndex(u32);

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Identifies an unspent transaction output: the transaction that created it and the
/// output's position in that transaction.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
pub struct Utxo {
    transaction_id: TransactionId,
    output_index: OutputIndex,
}

impl Utxo {
    pub fn new(transaction_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn output_index(&self) -> OutputIndex {
        self.output_index
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    // The output being spent.
    utxo: Utxo,
    // Produced by the owner of the spent output over the transaction's signable data for
    // this input.
    signature: Signature,
}

impl TransactionInput {
    pub fn new(utxo: Utxo, signature: Signature) -> Self {
        Self { utxo, signature }
    }

    pub fn utxo(&self) -> &Utxo {
        &self.utxo
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.utxo)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    amount: Amount,
    owner: PublicKey,
}

impl TransactionOutput {
    pub fn new(amount: Amount, owner: PublicKey) -> Self {
        Self { amount, owner }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn owner(&self) -> &PublicKey {
        &self.owner
    }
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.amount, self.owner)
    }
}

/// Encodes the data that the owner of the output spent by the input at `input_index` signs.
///
/// Signatures are never part of the encoding, so the data for an input doesn't depend on its own
/// signature or on the signatures of other inputs.
fn encode_signable_data(
    input_index: usize,
    inputs: &[TransactionInput],
    outputs: &[TransactionOutput],
) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + inputs.len() * 36 + outputs.len() * 40);
    data.extend_from_slice(&(input_index as u32).to_le_bytes());
    for input in inputs {
        data.extend_from_slice(input.utxo.transaction_id.as_slice());
        data.extend_from_slice(&input.utxo.output_index.value().to_le_bytes());
    }
    for output in outputs {
        data.extend_from_slice(&output.amount.value().to_le_bytes());
        data.extend_from_slice(output.owner.as_bytes());
    }
    data
}

/// A finalized transaction. Its id is computed once from the inputs, including their
/// signatures, and the outputs, and can't change afterwards.
/// A serialized id is ignored on deserialization, the id is always recomputed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionBuilder")]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, String> {
        let id = Self::hash_transaction_data(&inputs, &outputs)?;
        Ok(Self {
            id,
            inputs,
            outputs,
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    /// The data that must be signed to authorize the input at the given index.
    pub fn signable_data(&self, input_index: usize) -> Vec<u8> {
        encode_signable_data(input_index, &self.inputs, &self.outputs)
    }

    /// Returns the references to the outputs created by this transaction.
    pub fn output_utxos(&self) -> impl Iterator<Item = (Utxo, &TransactionOutput)> + '_ {
        let id = self.id;
        self.outputs
            .iter()
            .enumerate()
            .map(move |(index, output)| (Utxo::new(id, OutputIndex::new(index as u32)), output))
    }

    fn hash_transaction_data(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> Result<TransactionId, String> {
        let data = bincode::serialize(&(inputs, outputs)).map_err(|e| e.to_string())?;
        Ok(TransactionId(Sha256::double_digest(&data)))
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Collects the inputs and outputs of a transaction that is still being signed.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionBuilder {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unsigned input spending the given output.
    pub fn add_input(&mut self, utxo: Utxo) -> &mut Self {
        self.inputs.push(TransactionInput::new(utxo, Signature::empty()));
        self
    }

    pub fn add_output(&mut self, amount: Amount, owner: PublicKey) -> &mut Self {
        self.outputs.push(TransactionOutput::new(amount, owner));
        self
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    pub fn is_fully_signed(&self) -> bool {
        self.inputs.iter().all(|input| !input.signature.is_empty())
    }

    pub fn signable_data(&self, input_index: usize) -> Vec<u8> {
        encode_signable_data(input_index, &self.inputs, &self.outputs)
    }

    pub fn set_signature(&mut self, input_index: usize, signature: Signature) -> Result<(), String> {
        let num_inputs = self.inputs.len();
        match self.inputs.get_mut(input_index) {
            None => Err(format!(
                "Input index: {} is out of range for a transaction with {} inputs",
                input_index, num_inputs
            )),
            Some(input) => {
                input.signature = signature;
                Ok(())
            }
        }
    }

    pub fn sign_input(&mut self, input_index: usize, key_pair: &KeyPair) -> Result<(), String> {
        let signature = key_pair.sign(&self.signable_data(input_index));
        self.set_signature(input_index, signature)
    }

    pub fn build(self) -> Result<Transaction, String> {
        Transaction::new(self.inputs, self.outputs)
    }
}

impl TryFrom<TransactionBuilder> for Transaction {
    type Error = String;

    fn try_from(builder: TransactionBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}
