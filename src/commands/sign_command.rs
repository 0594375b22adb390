use crate::commands::json_file::{read_json_file, write_json};
use crate::{KeyPair, Transaction, TransactionBuilder};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::error::Error;

struct SignCliOptions {
    transaction: String,
    input_indices: Vec<usize>,
    secret_key: String,
    finalize: bool,
}

impl SignCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            transaction: matches
                .get_one::<String>("transaction")
                .ok_or("Missing argument: transaction")?
                .clone(),
            input_indices: matches
                .get_many::<usize>("input")
                .map(|indices| indices.copied().collect())
                .unwrap_or_else(Vec::new),
            secret_key: matches
                .get_one::<String>("secret-key")
                .ok_or("Missing argument: secret-key")?
                .clone(),
            finalize: matches.get_one::<bool>("finalize").copied().unwrap_or(false),
        })
    }
}

pub fn sign_command() -> Command<'static> {
    Command::new("sign")
        .version("0.1")
        .about("Signs inputs of an unsigned transaction.")
        .arg(
            Arg::new("transaction")
                .short('t')
                .long("transaction")
                .value_name("FILE")
                .help("JSON file with the transaction inputs and outputs.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("[INDEX...]")
                .help("Indices of the inputs to sign.")
                .takes_value(true)
                .action(ArgAction::Append)
                .use_value_delimiter(true)
                .value_parser(value_parser!(usize))
                .required(false),
        )
        .arg(
            Arg::new("secret-key")
                .short('k')
                .long("secret-key")
                .value_name("HEX")
                .help("Ed25519 secret key of the owner of the spent outputs.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("finalize")
                .long("finalize")
                .help("Prints the finalized transaction, with its id, instead of the draft.")
                .action(ArgAction::SetTrue),
        )
}

/// The result of signing a draft: the draft itself, or the finalized transaction.
#[derive(Debug)]
enum SignedDraft {
    Draft(TransactionBuilder),
    Finalized(Transaction),
}

fn sign_draft(options: &SignCliOptions) -> Result<SignedDraft, Box<dyn Error>> {
    let key_pair = KeyPair::from_secret_hex(&options.secret_key)?;
    let mut builder: TransactionBuilder = read_json_file(&options.transaction)?;
    for input_index in &options.input_indices {
        builder.sign_input(*input_index, &key_pair)?;
    }

    if !options.finalize {
        return Ok(SignedDraft::Draft(builder));
    }
    if !builder.is_fully_signed() {
        return Err("Can't finalize a transaction with unsigned inputs".into());
    }
    Ok(SignedDraft::Finalized(builder.build()?))
}

pub fn run_sign_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = SignCliOptions::parse(matches)?;
    match sign_draft(&options)? {
        SignedDraft::Draft(builder) => write_json(&builder, None),
        SignedDraft::Finalized(transaction) => write_json(&transaction, None),
    }
}
