pub mod amount;
pub mod commands;
pub mod hash;
pub mod ledger;
pub mod public_key;
pub mod signature;
pub mod transaction;
pub mod utxo_pool;
pub mod validation;

pub use self::{
    amount::*, hash::*, ledger::*, public_key::*, signature::*, transaction::*, utxo_pool::*,
    validation::*,
};
