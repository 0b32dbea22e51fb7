// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::convert::Infallible;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use ccnp_client::proto::{GetCcReportRequest, GetCcReportResponse, SERVICE_NAME};
use ccnp_client::{ClientConfig, ReportClient};
use tokio::net::UnixListener;
use tokio_stream::wrappers::UnixListenerStream;
use tonic::body::Body;
use tonic::server::{Grpc, NamedService, UnaryService};
use tonic::transport::Server;

pub const DOCKER_MOUNTINFO: &str = "1029 1008 253:1 /var/lib/docker/containers/abc123/hostname /etc/hostname rw,relatime - ext4 /dev/vda1 rw\n";
pub const K8S_MOUNTINFO: &str = "2958 2938 253:1 /var/lib/kubelet/pods/a45f46f0-20be-45ab-ace6-b77e8e2f062c/containers/busybox/8f8d892c /dev/termination-log rw,relatime - ext4 /dev/vda1 rw\n";

type Handler = dyn Fn(GetCcReportRequest) -> Result<GetCcReportResponse, tonic::Status> + Send + Sync;

/// Minimal `ccnp_server_pb.ccnp` service answering every call with `handler`.
#[derive(Clone)]
pub struct FakeAgent {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<GetCcReportRequest>>>,
}

impl FakeAgent {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(GetCcReportRequest) -> Result<GetCcReportResponse, tonic::Status> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<GetCcReportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Serves the agent on a fresh socket in `dir` and returns its path.
    pub fn spawn(&self, dir: &Path) -> PathBuf {
        let socket_path = dir.join("ccnp-server.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();
        let server = Server::builder()
            .add_service(self.clone())
            .serve_with_incoming(UnixListenerStream::new(listener));
        tokio::spawn(server);
        socket_path
    }
}

struct GetCcReportSvc(FakeAgent);

impl UnaryService<GetCcReportRequest> for GetCcReportSvc {
    type Response = GetCcReportResponse;
    type Future = Pin<Box<dyn Future<Output = Result<tonic::Response<Self::Response>, tonic::Status>> + Send>>;

    fn call(&mut self, request: tonic::Request<GetCcReportRequest>) -> Self::Future {
        let agent = self.0.clone();
        Box::pin(async move {
            let request = request.into_inner();
            agent.requests.lock().unwrap().push(request.clone());
            (agent.handler)(request).map(tonic::Response::new)
        })
    }
}

impl tower::Service<http::Request<Body>> for FakeAgent {
    type Response = http::Response<Body>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<Body>) -> Self::Future {
        let agent = self.clone();
        Box::pin(async move {
            let codec = tonic_prost::ProstCodec::<GetCcReportResponse, GetCcReportRequest>::default();
            let mut grpc = Grpc::new(codec);
            Ok(grpc.unary(GetCcReportSvc(agent), request).await)
        })
    }
}

impl NamedService for FakeAgent {
    const NAME: &'static str = SERVICE_NAME;
}

pub fn write_mountinfo(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("mountinfo");
    fs::write(&path, contents).unwrap();
    path
}

pub fn uds_client(socket_path: PathBuf, mountinfo_path: PathBuf, timeout: Duration) -> ReportClient {
    ReportClient::new(ClientConfig {
        socket_path,
        mountinfo_path,
        timeout_ms: timeout.as_millis() as u64,
    })
}
