// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Turning raw reports into something printable.
//!
//! The client never looks inside a report. Callers pick a decoder from a
//! [`DecoderRegistry`] using the tag the agent returned.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use dcap_qvl::quote::{Header, Quote, TDReport10};
use thiserror::Error;

use crate::report::{ReportResponse, ReportType};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("no decoder registered for report type {0}")]
    UnsupportedReportType(ReportType),

    #[error("malformed {report_type} report: {reason}")]
    Malformed {
        report_type: ReportType,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Raw,
    Human,
}

impl FromStr for DumpFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "human" => Ok(Self::Human),
            other => Err(format!("unknown dump format {other:?}, expected raw or human")),
        }
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Human => f.write_str("human"),
        }
    }
}

pub trait StructuredReport: fmt::Debug + Send + Sync {
    fn report_type(&self) -> ReportType;

    fn dump(&self, format: DumpFormat, out: &mut dyn Write) -> io::Result<()>;
}

pub trait ReportDecoder: Send + Sync {
    fn decode(&self, raw: &[u8]) -> Result<Box<dyn StructuredReport>, DecodeError>;
}

#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<ReportType, Box<dyn ReportDecoder>>,
}

impl DecoderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every decoder this crate ships.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ReportType::Tdx, Box::new(TdxQuoteDecoder));
        registry
    }

    /// Registers `decoder` for `report_type`, replacing any previous one.
    pub fn register(&mut self, report_type: ReportType, decoder: Box<dyn ReportDecoder>) {
        self.decoders.insert(report_type, decoder);
    }

    pub fn supports(&self, report_type: ReportType) -> bool {
        self.decoders.contains_key(&report_type)
    }

    pub fn decode(
        &self,
        response: &ReportResponse,
    ) -> Result<Box<dyn StructuredReport>, DecodeError> {
        self.decoders
            .get(&response.report_type)
            .ok_or(DecodeError::UnsupportedReportType(response.report_type))?
            .decode(&response.report)
    }
}

const TDX_HEADER_LEN: usize = 48;
const TDX_BODY_LEN: usize = 584;

/// Decoder for Intel TDX quotes carrying a TD 1.0 report.
///
/// The quote layout is parsed by `dcap-qvl`. The signature section is kept
/// as is and not verified.
#[derive(Debug, Default, Clone, Copy)]
pub struct TdxQuoteDecoder;

#[derive(Debug, Clone)]
pub struct TdxQuote {
    pub header: Header,
    pub td_report: TDReport10,
    raw: Vec<u8>,
}

fn malformed(reason: impl Into<String>) -> DecodeError {
    DecodeError::Malformed {
        report_type: ReportType::Tdx,
        reason: reason.into(),
    }
}

impl ReportDecoder for TdxQuoteDecoder {
    fn decode(&self, raw: &[u8]) -> Result<Box<dyn StructuredReport>, DecodeError> {
        Ok(Box::new(TdxQuote::parse(raw)?))
    }
}

impl TdxQuote {
    pub fn parse(raw: &[u8]) -> Result<Self, DecodeError> {
        let quote = Quote::parse(raw).map_err(|err| malformed(format!("{err}")))?;
        let td_report = quote
            .report
            .as_td10()
            .cloned()
            .ok_or_else(|| malformed("quote does not carry a TD 1.0 report"))?;

        Ok(Self {
            header: quote.header,
            td_report,
            raw: raw.to_vec(),
        })
    }

    /// Size of everything after the TD report: signature, attestation key
    /// and certification data.
    pub fn auth_data_len(&self) -> usize {
        self.raw.len().saturating_sub(TDX_HEADER_LEN + TDX_BODY_LEN)
    }

    fn dump_human(&self, out: &mut dyn Write) -> io::Result<()> {
        let header = &self.header;
        let report = &self.td_report;

        writeln!(out, "TDX quote ({} bytes)", self.raw.len())?;
        writeln!(out, "Header:")?;
        writeln!(out, "  version: {}", header.version)?;
        writeln!(out, "  attestation key type: {}", header.attestation_key_type)?;
        writeln!(out, "  tee type: {:#x}", header.tee_type)?;
        writeln!(out, "  qe svn: {}", header.qe_svn)?;
        writeln!(out, "  pce svn: {}", header.pce_svn)?;
        writeln!(out, "  qe vendor id: {}", hex::encode(header.qe_vendor_id))?;
        writeln!(out, "  user data: {}", hex::encode(header.user_data))?;
        writeln!(out, "TD report:")?;
        writeln!(out, "  tee tcb svn: {}", hex::encode(report.tee_tcb_svn))?;
        writeln!(out, "  mrseam: {}", hex::encode(report.mr_seam))?;
        writeln!(out, "  mrsignerseam: {}", hex::encode(report.mr_signer_seam))?;
        writeln!(out, "  seam attributes: {}", hex::encode(report.seam_attributes))?;
        writeln!(out, "  td attributes: {}", hex::encode(report.td_attributes))?;
        writeln!(out, "  xfam: {}", hex::encode(report.xfam))?;
        writeln!(out, "  mrtd: {}", hex::encode(report.mr_td))?;
        writeln!(out, "  mrconfigid: {}", hex::encode(report.mr_config_id))?;
        writeln!(out, "  mrowner: {}", hex::encode(report.mr_owner))?;
        writeln!(out, "  mrownerconfig: {}", hex::encode(report.mr_owner_config))?;
        let rtmrs = [
            &report.rt_mr0,
            &report.rt_mr1,
            &report.rt_mr2,
            &report.rt_mr3,
        ];
        for (index, rtmr) in rtmrs.into_iter().enumerate() {
            writeln!(out, "  rtmr{index}: {}", hex::encode(rtmr))?;
        }
        writeln!(out, "  report data: {}", hex::encode(report.report_data))?;
        writeln!(out, "Auth data: {} bytes", self.auth_data_len())
    }
}

impl StructuredReport for TdxQuote {
    fn report_type(&self) -> ReportType {
        ReportType::Tdx
    }

    fn dump(&self, format: DumpFormat, out: &mut dyn Write) -> io::Result<()> {
        match format {
            DumpFormat::Raw => hexdump(&self.raw, out),
            DumpFormat::Human => self.dump_human(out),
        }
    }
}

/// Writes `data` as rows of 16 bytes prefixed by their offset.
pub fn hexdump(data: &[u8], out: &mut dyn Write) -> io::Result<()> {
    for (row, chunk) in data.chunks(16).enumerate() {
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        writeln!(out, "{:08x}  {}", row * 16, bytes.join(" "))?;
    }
    Ok(())
}
