use clap::Command;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let matches = Command::new("utxo-ledger")
        .about("Validates transactions against a utxo pool.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(utxo_ledger_lib::commands::process_command())
        .subcommand(utxo_ledger_lib::commands::sign_command())
        .subcommand(utxo_ledger_lib::commands::public_key_command())
        .get_matches();

    match matches.subcommand() {
        Some(("process", matches)) => utxo_ledger_lib::commands::run_process_command(matches),
        Some(("sign", matches)) => utxo_ledger_lib::commands::run_sign_command(matches),
        Some(("public-key", matches)) => {
            utxo_ledger_lib::commands::run_public_key_command(matches)
        }
        _ => panic!("Should report help."),
    }
}
