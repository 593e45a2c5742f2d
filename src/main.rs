use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
use pwhash::{
    DEFAULT_ITERATION_COUNT, DEFAULT_KEY_SIZE, DEFAULT_SALT_SIZE, Digest, Hasher, format,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DigestArg {
    Sha256,
    Sha512,
}

impl From<DigestArg> for Digest {
    fn from(arg: DigestArg) -> Self {
        match arg {
            DigestArg::Sha256 => Digest::Sha256,
            DigestArg::Sha512 => Digest::Sha512,
        }
    }
}

#[derive(Debug, clap::Args)]
struct HasherArgs {
    /// PBKDF2 iteration count
    #[arg(long, global = true, env = "PWHASH_ITERATIONS", default_value_t = DEFAULT_ITERATION_COUNT)]
    iterations: u32,

    /// Salt size in bits, a positive multiple of 8
    #[arg(long, global = true, env = "PWHASH_SALT_BITS", default_value_t = DEFAULT_SALT_SIZE)]
    salt_bits: u32,

    /// Derived key size in bits, a positive multiple of 8
    #[arg(long, global = true, env = "PWHASH_KEY_BITS", default_value_t = DEFAULT_KEY_SIZE)]
    key_bits: u32,

    /// PBKDF2 digest
    #[arg(long, global = true, env = "PWHASH_DIGEST", value_enum, default_value_t = DigestArg::Sha256)]
    digest: DigestArg,
}

impl HasherArgs {
    fn to_hasher(&self) -> Result<Hasher> {
        Hasher::new(
            self.iterations,
            self.salt_bits,
            self.key_bits,
            self.digest.into(),
        )
        .context("invalid hasher parameters")
    }
}

#[derive(Debug, Parser)]
#[command(name = "pwhash")]
#[command(version, about = "Adaptive PBKDF2 password hashing.")]
struct Cli {
    #[command(flatten)]
    hasher: HasherArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the encoded hash as hex
    Hash,

    /// Verifies a password against a hex encoded hash
    #[command(arg_required_else_help = true)]
    Verify { hash: String },

    /// Prints the parameters stored in a hex encoded hash
    #[command(arg_required_else_help = true)]
    Inspect { hash: String },
}

#[derive(Debug, Serialize)]
struct HashInfo {
    format_version: u8,
    digest: Digest,
    iterations: u32,
    salt_len: usize,
    key_len: usize,
}

fn decode_hex(hash: &str) -> Result<Vec<u8>> {
    hex::decode(hash.trim()).context("hash is not valid hex")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let hasher = args.hasher.to_hasher()?;

    match args.command {
        Commands::Hash => {
            let password = auth::read_password()?;
            let encoded = hasher
                .hash(password.as_bytes())
                .context("failed to hash password")?;
            println!("{}", hex::encode(encoded));
        }
        Commands::Verify { hash } => {
            let encoded = decode_hex(&hash)?;
            let password = auth::read_password()?;
            if !hasher.verify(password.as_bytes(), &encoded) {
                bail!("invalid");
            }
            println!("valid");
        }
        Commands::Inspect { hash } => {
            let encoded = decode_hex(&hash)?;
            let parsed = format::parse(&encoded).context("malformed hash")?;
            let info = HashInfo {
                format_version: parsed.version(),
                digest: parsed.header().digest(),
                iterations: parsed.header().iterations(),
                salt_len: parsed.salt().len(),
                key_len: parsed.sub_key().len(),
            };
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
