// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

use crate::proto::GetCcReportResponse;

/// Hardware report format, as tagged by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    Plain,
    Tpm,
    Tdx,
    Sev,
    Cca,
    /// A tag this client has no name for. Kept so the caller still sees what
    /// the agent sent.
    Unknown(i32),
}

impl From<i32> for ReportType {
    fn from(value: i32) -> Self {
        match value {
            -1 => Self::Plain,
            0 => Self::Tpm,
            1 => Self::Tdx,
            2 => Self::Sev,
            3 => Self::Cca,
            other => Self::Unknown(other),
        }
    }
}

impl From<ReportType> for i32 {
    fn from(value: ReportType) -> Self {
        match value {
            ReportType::Plain => -1,
            ReportType::Tpm => 0,
            ReportType::Tdx => 1,
            ReportType::Sev => 2,
            ReportType::Cca => 3,
            ReportType::Unknown(other) => other,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("PLAIN"),
            Self::Tpm => f.write_str("TPM"),
            Self::Tdx => f.write_str("TDX"),
            Self::Sev => f.write_str("SEV"),
            Self::Cca => f.write_str("CCA"),
            Self::Unknown(tag) => write!(f, "UNKNOWN({tag})"),
        }
    }
}

/// A report exactly as returned by the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResponse {
    pub report_type: ReportType,
    pub report: Vec<u8>,
}

impl From<GetCcReportResponse> for ReportResponse {
    fn from(response: GetCcReportResponse) -> Self {
        Self {
            report_type: ReportType::from(response.cc_type),
            report: response.cc_report,
        }
    }
}
