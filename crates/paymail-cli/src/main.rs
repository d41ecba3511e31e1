//! Command-line paymail inspector
//!
//! Resolves a paymail address into a hex-encoded Bitcoin script, address and
//! public profile (if found). Given a sender and a receiver, where the sender
//! knows the receiver's paymail handle `alias@domain.tld`, the sender performs
//! service discovery against the receiver and requests a payment destination
//! from the receiver's paymail service.

use clap::Parser;
use paymail_client::{ClientConfig, PaymailClient, Resolution, Resolver, ResolverConfig};
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "paymail-inspector")]
#[command(about = "Resolves a paymail address into a spendable output script", long_about = None)]
struct Cli {
    /// Paymail address to resolve (alias@domain.tld)
    paymail: String,

    /// Amount in satoshis for the payment request
    #[arg(short, long, default_value = "0")]
    amount: u64,

    /// Purpose for the transaction
    #[arg(short, long, default_value = "")]
    purpose: String,

    /// Sender's paymail handle. Required by the bsvalias spec; the receiver
    /// address is used if not specified
    #[arg(long)]
    sender_handle: Option<String>,

    /// The sender's name
    #[arg(long, default_value = "")]
    sender_name: String,

    /// The signature of the entire request
    #[arg(short, long)]
    signature: Option<String>,

    /// Skip firing the pki request and getting the pubkey
    #[arg(long)]
    skip_pki: bool,

    /// Skip firing the public profile request and getting the avatar
    #[arg(long)]
    skip_public_profile: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let client = PaymailClient::new(ClientConfig::default())?;
    let config = ResolverConfig {
        amount: cli.amount,
        purpose: cli.purpose,
        sender_handle: cli.sender_handle,
        sender_name: cli.sender_name,
        signature: cli.signature,
        skip_pki: cli.skip_pki,
        skip_public_profile: cli.skip_public_profile,
    };
    let resolver = Resolver::new(client, config);

    match resolver.resolve(&cli.paymail).await {
        Ok(resolution) => {
            print_report(&resolution);
            Ok(())
        }
        // An unreachable provider aborts the resolution without failing the
        // process
        Err(e) if e.is_warning() => {
            warn!("{}", e);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(resolution: &Resolution) {
    if let Some(profile) = &resolution.profile {
        if !profile.name.is_empty() {
            println!("name: {}", profile.name);
        }
        if !profile.avatar.is_empty() {
            println!("avatar: {}", profile.avatar);
        }
    }

    if let Some(pub_key) = &resolution.pub_key {
        println!("pubkey: {}", pub_key);
    }

    println!("output script: {}", resolution.output);
    println!("address: {}", resolution.address);
}
