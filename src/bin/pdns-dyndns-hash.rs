use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use clap::Parser;
use pdns_dyndns::{auth::hash_password, config::PasswordScheme};

/// Print a password hash suitable for the `users.password` column.
#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Hashing scheme
    #[arg(long, value_enum, default_value = "bcrypt", env = "PDNS_DYNDNS_PASSWORD_SCHEME")]
    password_scheme: PasswordScheme,
    /// bcrypt cost factor
    #[arg(long, value_name = "COST", default_value_t = 12, env = "PDNS_DYNDNS_PASSWORD_COST")]
    password_cost: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // read from stdin so the password stays out of shell history
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("empty password");
    }

    if cli.password_scheme == PasswordScheme::Bcrypt && !(4..=31).contains(&cli.password_cost) {
        bail!("--password-cost must be between 4 and 31 for bcrypt");
    }

    let hash = hash_password(password, cli.password_scheme, cli.password_cost)?;
    println!("{hash}");
    Ok(())
}
