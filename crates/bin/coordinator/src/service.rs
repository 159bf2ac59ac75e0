//! thin tonic adapter over [`activation::Service`]. The only module aware of
//! `tonic`/`prost`; everything else in the crate speaks plain Rust types so
//! it can be unit-tested without a transport.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{error, info};

use coordinator::activation::{ActivationRequest, Service};

pub mod proto {
    tonic::include_proto!("coordinator.activation.v1");
}

use proto::activation_server::Activation;
use proto::{ActivationRequest as ProtoRequest, ActivationResponse, Parameters as ProtoParameters};

pub struct ActivationService {
    inner: Arc<Service>,
}

impl ActivationService {
    pub fn new(inner: Arc<Service>) -> Self {
        Self { inner }
    }
}

#[tonic::async_trait]
impl Activation for ActivationService {
    async fn activate(
        &self,
        request: Request<ProtoRequest>,
    ) -> std::result::Result<Response<ActivationResponse>, Status> {
        // the peer certificate is bound into the attestation quote by the
        // transport layer (mTLS termination, out of scope per spec §1).
        // Its absence is only an error once `Service::activate` has passed
        // the state gate (spec §4.8 steps 2 then 3), so it's threaded
        // through as an `Option` rather than checked here.
        let peer_cert_der = request
            .peer_certs()
            .and_then(|certs| certs.first().map(|c| c.as_ref().to_vec()));

        let req = request.into_inner();
        info!(marble_type = %req.marble_type, uuid = %req.uuid, "activation request received");

        let activation_req = ActivationRequest {
            marble_type: req.marble_type.clone(),
            quote: req.quote,
            csr: req.csr,
            uuid: req.uuid.clone(),
        };

        match self
            .inner
            .activate(peer_cert_der.as_deref(), activation_req)
            .await
        {
            Ok(params) => Ok(Response::new(ActivationResponse {
                parameters: Some(ProtoParameters {
                    argv: params.argv,
                    env: params.env.into_iter().collect(),
                    files: params.files.into_iter().collect(),
                }),
            })),
            Err(e) => {
                // never let a store/crypto/template error carry secret
                // material or raw quotes into the gRPC status message;
                // the Display impls on CoordinatorError only ever include
                // marble type / uuid / a short reason, never key bytes.
                error!(marble_type = %req.marble_type, uuid = %req.uuid, error = %e, "activation failed");
                Err(e.into())
            }
        }
    }
}
