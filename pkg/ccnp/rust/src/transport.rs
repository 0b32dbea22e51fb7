// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Connection to the CCNP agent.
//!
//! Every report request gets its own session; dropping the session closes
//! the underlying connection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use hyper_util::rt::TokioIo;
use log::debug;
use tokio::net::UnixStream;
use tonic::transport::{Channel, Endpoint, Uri};
use tower::service_fn;

use crate::errors::Error;
use crate::proto::ccnp_client::CcnpClient;
use crate::proto::{GetCcReportRequest, GetCcReportResponse};

/// Opens sessions to the agent.
#[async_trait]
pub trait AgentConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn AgentSession>, Error>;
}

/// A single connection to the agent.
#[async_trait]
pub trait AgentSession: Send {
    async fn get_cc_report(
        &mut self,
        request: GetCcReportRequest,
    ) -> Result<GetCcReportResponse, tonic::Status>;
}

/// gRPC over the agent's Unix domain socket.
#[derive(Debug, Clone)]
pub struct UdsConnector {
    socket_path: PathBuf,
    connect_timeout: Duration,
}

impl UdsConnector {
    pub fn new(socket_path: PathBuf, connect_timeout: Duration) -> Self {
        Self {
            socket_path,
            connect_timeout,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

#[async_trait]
impl AgentConnector for UdsConnector {
    async fn connect(&self) -> Result<Box<dyn AgentSession>, Error> {
        let socket_path = self.socket_path.clone();

        // The URI is ignored by the connector but tonic requires a valid one.
        let channel = Endpoint::from_static("http://[::]:50051")
            .connect_timeout(self.connect_timeout)
            .connect_with_connector(service_fn(move |_: Uri| {
                let socket_path = socket_path.clone();
                async move {
                    let stream = UnixStream::connect(socket_path).await?;
                    Ok::<_, std::io::Error>(TokioIo::new(stream))
                }
            }))
            .await
            .map_err(|e| Error::AgentUnreachable {
                path: self.socket_path.clone(),
                source: Box::new(e),
            })?;

        debug!("connected to agent at {}", self.socket_path.display());
        Ok(Box::new(UdsSession {
            client: CcnpClient::new(channel),
        }))
    }
}

struct UdsSession {
    client: CcnpClient<Channel>,
}

#[async_trait]
impl AgentSession for UdsSession {
    async fn get_cc_report(
        &mut self,
        request: GetCcReportRequest,
    ) -> Result<GetCcReportResponse, tonic::Status> {
        let response = self.client.get_cc_report(request).await?;
        Ok(response.into_inner())
    }
}
