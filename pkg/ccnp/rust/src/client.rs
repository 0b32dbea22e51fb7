// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use crate::config::ClientConfig;
use crate::container_id::{ContainerId, resolve_container_id_from};
use crate::errors::Error;
use crate::proto::GetCcReportRequest;
use crate::report::ReportResponse;
use crate::transport::{AgentConnector, UdsConnector};

/// One report request, bound to the container it was issued from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub container_id: ContainerId,
    pub nonce: Vec<u8>,
    pub user_data: Vec<u8>,
}

impl From<ReportRequest> for GetCcReportRequest {
    fn from(request: ReportRequest) -> Self {
        Self {
            container_id: request.container_id.into_inner(),
            user_data: request.user_data,
            nonce: request.nonce,
        }
    }
}

/// Fetches attestation reports from the CCNP agent.
///
/// The client holds no connection. Each call resolves the container ID,
/// opens a session, performs a single round trip under the configured
/// deadline and drops the session again.
pub struct ReportClient<C = UdsConnector> {
    connector: C,
    mountinfo_path: PathBuf,
    timeout: Duration,
}

impl ReportClient<UdsConnector> {
    pub fn new(config: ClientConfig) -> Self {
        let timeout = config.timeout();
        Self {
            connector: UdsConnector::new(config.socket_path, timeout),
            mountinfo_path: config.mountinfo_path,
            timeout,
        }
    }
}

impl<C: AgentConnector> ReportClient<C> {
    pub fn with_connector(connector: C, mountinfo_path: PathBuf, timeout: Duration) -> Self {
        Self {
            connector,
            mountinfo_path,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn resolve_container_id(&self) -> Result<ContainerId, Error> {
        resolve_container_id_from(&self.mountinfo_path)
    }

    /// Requests a report for `user_data` and `nonce`.
    ///
    /// The agent's answer is returned untouched; pick a decoder with
    /// [`ReportResponse::report_type`].
    pub async fn get_report(&self, user_data: &[u8], nonce: &[u8]) -> Result<ReportResponse, Error> {
        let container_id = self.resolve_container_id()?;
        let mut session = self.connector.connect().await?;

        let request = ReportRequest {
            container_id,
            nonce: nonce.to_vec(),
            user_data: user_data.to_vec(),
        };
        debug!("requesting cc report for container {}", request.container_id);

        let response = tokio::time::timeout(self.timeout, session.get_cc_report(request.into()))
            .await
            .map_err(|_| Error::RequestTimeout(self.timeout))?
            .map_err(Error::AgentReportFailure)?;

        let response = ReportResponse::from(response);
        debug!(
            "received {} report ({} bytes)",
            response.report_type,
            response.report.len()
        );
        Ok(response)
    }

    /// Blocking variant of [`Self::get_report`].
    ///
    /// Runs the request on a private current-thread runtime. Called from
    /// within a tokio runtime it fails with [`Error::Runtime`]; use
    /// [`Self::get_report`] there.
    pub fn get_report_blocking(
        &self,
        user_data: &[u8],
        nonce: &[u8],
    ) -> Result<ReportResponse, Error> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::Runtime(io::Error::other(
                "blocking report request issued from within a tokio runtime",
            )));
        }
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?
            .block_on(self.get_report(user_data, nonce))
    }
}
