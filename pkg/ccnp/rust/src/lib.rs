// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Client for the CCNP attestation agent.
//!
//! A process running in a container or pod resolves its own container ID from
//! `/proc/self/mountinfo` and asks the local agent, over a Unix socket, for a
//! confidential computing report bound to that ID. The raw report comes back
//! with its type tag; [`DecoderRegistry`] turns it into something printable.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod client;
pub mod config;
pub mod container_id;
pub mod decoder;
mod errors;
pub mod proto;
pub mod report;
pub mod transport;

pub use client::{ReportClient, ReportRequest};
pub use config::{ClientConfig, load_config};
pub use container_id::ContainerId;
pub use decoder::{DecodeError, DecoderRegistry, DumpFormat, ReportDecoder, StructuredReport};
pub use errors::{BoxError, Error, ErrorKind};
pub use report::{ReportResponse, ReportType};

/// Resolves the calling container's ID from `/proc/self/mountinfo`, or from
/// `CCNP_MOUNTINFO` when set.
pub fn resolve_container_id() -> Result<ContainerId, Error> {
    container_id::resolve_container_id_from(&ClientConfig::from_env().mountinfo_path)
}

/// Fetches a report from the agent using the environment configuration.
///
/// Blocks the calling thread for at most the configured deadline once the
/// connection is up. From within a tokio runtime it returns
/// [`Error::Runtime`]; use [`ReportClient::get_report`] there.
pub fn get_report(user_data: &[u8], nonce: &[u8]) -> Result<ReportResponse, Error> {
    ReportClient::new(ClientConfig::from_env()).get_report_blocking(user_data, nonce)
}
