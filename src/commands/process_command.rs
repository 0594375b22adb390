use crate::commands::json_file::{read_json_file, write_json};
use crate::{Ed25519Verifier, Ledger, Transaction, UtxoPool};
use clap::{Arg, ArgMatches, Command};
use log::info;
use std::error::Error;

struct ProcessCliOptions {
    pool: String,
    transactions: String,
    output: Option<String>,
}

impl ProcessCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            pool: matches
                .get_one::<String>("pool")
                .ok_or("Missing argument: pool")?
                .clone(),
            transactions: matches
                .get_one::<String>("transactions")
                .ok_or("Missing argument: transactions")?
                .clone(),
            output: matches.get_one::<String>("output").cloned(),
        })
    }
}

pub fn process_command() -> Command<'static> {
    Command::new("process")
        .version("0.1")
        .about("Applies a batch of proposed transactions to a utxo pool.")
        .arg(
            Arg::new("pool")
                .short('p')
                .long("pool")
                .value_name("FILE")
                .help("JSON file with the current utxo pool.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("transactions")
                .short('t')
                .long("transactions")
                .value_name("FILE")
                .help("JSON file with the proposed transactions, in processing order.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where to write the updated utxo pool. Printed to stdout if omitted.")
                .takes_value(true)
                .required(false),
        )
}

pub fn run_process_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = ProcessCliOptions::parse(matches)?;
    let pool: UtxoPool = read_json_file(&options.pool)?;
    let transactions: Vec<Transaction> = read_json_file(&options.transactions)?;
    info!(
        "Loaded {} utxos and {} proposed transactions",
        pool.len(),
        transactions.len()
    );

    let mut ledger = Ledger::new(pool, Ed25519Verifier);
    let report = ledger.process_batch_with_report(&transactions);
    for transaction in &report.accepted {
        eprintln!("Accepted: {}", transaction.id());
    }
    for (id, rejection) in &report.rejected {
        eprintln!("Rejected: {}: {}", id, rejection);
    }

    write_json(ledger.pool(), options.output.as_deref())
}
