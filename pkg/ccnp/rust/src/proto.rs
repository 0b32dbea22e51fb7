// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Wire types of the `ccnp_server_pb.ccnp` gRPC service.
//!
//! Only the report call is mirrored here. Field numbers match the agent's
//! `ccnp-server.proto`; the agent declares `user_data` and `nonce` as
//! strings, which share the `bytes` wire encoding.

pub const SERVICE_NAME: &str = "ccnp_server_pb.ccnp";
pub const GET_CC_REPORT_PATH: &str = "/ccnp_server_pb.ccnp/GetCcReport";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetCcReportRequest {
    #[prost(string, tag = "1")]
    pub container_id: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub user_data: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub nonce: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetCcReportResponse {
    #[prost(int32, tag = "1")]
    pub cc_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub cc_report: ::prost::alloc::vec::Vec<u8>,
}

pub mod ccnp_client {
    use tonic::codegen::http::uri::PathAndQuery;
    use tonic::codegen::{Body, Bytes, StdError};

    #[derive(Debug, Clone)]
    pub struct CcnpClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> CcnpClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::Body>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            Self {
                inner: tonic::client::Grpc::new(inner),
            }
        }

        pub async fn get_cc_report(
            &mut self,
            request: impl tonic::IntoRequest<super::GetCcReportRequest>,
        ) -> Result<tonic::Response<super::GetCcReportResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic_prost::ProstCodec::default();
            let path = PathAndQuery::from_static(super::GET_CC_REPORT_PATH);
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
}
