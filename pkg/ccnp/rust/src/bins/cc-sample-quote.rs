// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ccnp_client::{DecoderRegistry, DumpFormat, ReportClient, load_config};
use clap::Parser;
use log::info;
use rand_core::{OsRng, RngCore};

#[derive(Parser, Debug)]
#[command(name = "cc-sample-quote")]
#[command(about = "Fetch a confidential computing report for this container from the CCNP agent", long_about = None)]
struct Args {
    /// Dump format of the report: raw or human
    #[arg(short, long, default_value = "human")]
    format: DumpFormat,

    /// Base64 nonce; a random 8-byte nonce is used when omitted
    #[arg(long)]
    nonce: Option<String>,

    /// User data bound into the report
    #[arg(long, default_value = "demo user data")]
    user_data: String,

    /// YAML client configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Agent socket, overrides the configuration
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Request deadline in milliseconds, overrides the configuration
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn make_nonce() -> Vec<u8> {
    let mut nonce = vec![0u8; 8];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level)?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(socket) = args.socket {
        config.socket_path = socket;
    }
    if let Some(timeout_ms) = args.timeout_ms.filter(|ms| *ms > 0) {
        config.timeout_ms = timeout_ms;
    }

    let nonce = match args.nonce {
        Some(nonce) => STANDARD.decode(nonce).context("decoding --nonce")?,
        None => make_nonce(),
    };

    let client = ReportClient::new(config);
    let container_id = client.resolve_container_id()?;
    info!("container id: {container_id}");

    let response = client
        .get_report(args.user_data.as_bytes(), &nonce)
        .await
        .context("can not get cc report")?;
    info!(
        "got {} report ({} bytes)",
        response.report_type,
        response.report.len()
    );

    let report = DecoderRegistry::with_defaults()
        .decode(&response)
        .context("decoding report")?;

    let mut stdout = std::io::stdout().lock();
    report.dump(args.format, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}
