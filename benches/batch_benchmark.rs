use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use utxo_ledger_lib::{
    Amount, Ed25519Verifier, KeyPair, Ledger, OutputIndex, Sha256, Transaction,
    TransactionBuilder, TransactionId, TransactionOutput, Utxo, UtxoPool,
};

const CHAIN_LENGTH: usize = 1_000;

/// Creates a chain of transactions in which each transaction spends the single output of the
/// previous one, starting with the only utxo in the pool.
fn create_chain(owner: &KeyPair) -> (UtxoPool, Vec<Transaction>) {
    let genesis = Utxo::new(
        TransactionId::new(Sha256::digest(b"genesis")),
        OutputIndex::new(0),
    );
    let mut pool = UtxoPool::new();
    pool.add(
        genesis,
        TransactionOutput::new(Amount::new(CHAIN_LENGTH as i64), owner.public_key()),
    );

    let mut transactions = Vec::with_capacity(CHAIN_LENGTH);
    let mut spent = genesis;
    for i in 0..CHAIN_LENGTH {
        let mut builder = TransactionBuilder::new();
        builder
            .add_input(spent)
            .add_output(Amount::new((CHAIN_LENGTH - i) as i64), owner.public_key());
        builder.sign_input(0, owner).unwrap();
        let transaction = builder.build().unwrap();
        spent = Utxo::new(*transaction.id(), OutputIndex::new(0));
        transactions.push(transaction);
    }
    (pool, transactions)
}

fn process_batch_benchmark(c: &mut Criterion) {
    let owner = KeyPair::from_secret_bytes([1; 32]);
    let (pool, transactions) = create_chain(&owner);

    let mut group = c.benchmark_group("Ledger");
    group.throughput(Throughput::Elements(CHAIN_LENGTH as u64));
    group.bench_function("process_batch for a chain of 1000 transactions", |b| {
        b.iter_batched(
            || Ledger::new(pool.clone(), Ed25519Verifier),
            |mut ledger| {
                let accepted = ledger.process_batch(black_box(&transactions));
                assert_eq!(accepted.len(), CHAIN_LENGTH);
                black_box(accepted);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, process_batch_benchmark);

criterion_main!(benches);
