// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read mount info {}: {source}", path.display())]
    IdentitySourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no docker or kubernetes container pattern found in {}", path.display())]
    IdentityNotFound { path: PathBuf },

    #[error("cannot connect to agent at {}: {source}", path.display())]
    AgentUnreachable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("agent did not answer within {0:?}")]
    RequestTimeout(Duration),

    #[error("agent failed to get cc report: {0}")]
    AgentReportFailure(#[source] tonic::Status),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Coarse classification of [`Error`], for callers that only need to decide
/// what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    IdentitySourceUnavailable,
    IdentityNotFound,
    AgentUnreachable,
    RequestTimeout,
    AgentReportFailure,
    Runtime,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IdentitySourceUnavailable { .. } => ErrorKind::IdentitySourceUnavailable,
            Error::IdentityNotFound { .. } => ErrorKind::IdentityNotFound,
            Error::AgentUnreachable { .. } => ErrorKind::AgentUnreachable,
            Error::RequestTimeout(_) => ErrorKind::RequestTimeout,
            Error::AgentReportFailure(_) => ErrorKind::AgentReportFailure,
            Error::Runtime(_) => ErrorKind::Runtime,
        }
    }
}
