use crate::KeyPair;
use clap::{Arg, ArgMatches, Command};
use std::error::Error;

pub fn public_key_command() -> Command<'static> {
    Command::new("public-key")
        .version("0.1")
        .about("Prints the public key that owns outputs spendable with the secret key.")
        .arg(
            Arg::new("secret-key")
                .short('k')
                .long("secret-key")
                .value_name("HEX")
                .help("Ed25519 secret key.")
                .takes_value(true)
                .required(true),
        )
}

pub fn run_public_key_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let secret_key = matches
        .get_one::<String>("secret-key")
        .ok_or("Missing argument: secret-key")?;
    println!("{}", KeyPair::from_secret_hex(secret_key)?.public_key());
    Ok(())
}
