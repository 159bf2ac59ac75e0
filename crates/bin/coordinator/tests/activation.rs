//! end-to-end activation scenarios driven entirely through the public
//! library API (spec §8), independent of the gRPC transport.

use std::collections::BTreeMap;
use std::sync::Arc;

use coordinator::activation::{ActivationRequest, Service};
use coordinator::error::CoordinatorError;
use coordinator::manifest::{Manifest, Marble, Package, Parameters};
use coordinator::quote::AlwaysAccept;
use coordinator::store::InMemoryStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rcgen::{CertificateParams, KeyPair};

fn sample_csr() -> Vec<u8> {
    let key = KeyPair::generate().unwrap();
    let params = CertificateParams::new(vec!["marble.local".to_string()]).unwrap();
    params.serialize_request(&key).unwrap().der().to_vec()
}

fn service() -> Service {
    Service::with_rng(
        Arc::new(InMemoryStore::new()),
        Arc::new(AlwaysAccept),
        true,
        StdRng::seed_from_u64(7),
    )
}

fn manifest() -> Manifest {
    let mut packages = BTreeMap::new();
    packages.insert(
        "P".to_string(),
        Package {
            security_version: 3,
            ..Default::default()
        },
    );
    let mut marbles = BTreeMap::new();
    marbles.insert(
        "M".to_string(),
        Marble {
            package: "P".to_string(),
            max_activations: 0,
            parameters: Parameters::default(),
            tls: vec![],
        },
    );
    Manifest {
        packages,
        marbles,
        ..Default::default()
    }
}

fn req(uuid: &str) -> ActivationRequest {
    ActivationRequest {
        marble_type: "M".to_string(),
        quote: vec![],
        csr: sample_csr(),
        uuid: uuid.to_string(),
    }
}

#[tokio::test]
async fn issued_leaf_cert_chains_to_intermediate_and_is_not_a_ca() {
    let svc = service();
    svc.set_manifest(manifest()).await.unwrap();

    let uuid = "00000000-0000-0000-0000-0000000000ff";
    let params = svc.activate(Some(&[]), req(uuid)).await.unwrap();

    let chain_pem = &params.env["EDG_CERT_CHAIN"];
    let ca_pem = &params.env["EDG_CA"];
    assert!(chain_pem.starts_with("-----BEGIN CERTIFICATE-----"));

    // EDG_CERT_CHAIN is leaf || intermediate; split on the second BEGIN.
    let second_begin = chain_pem
        .match_indices("-----BEGIN CERTIFICATE-----")
        .nth(1)
        .unwrap()
        .0;
    let leaf_pem = &chain_pem[..second_begin];
    let intermediate_from_chain = &chain_pem[second_begin..];
    assert_eq!(intermediate_from_chain, ca_pem);

    let leaf_der = pem_to_der(leaf_pem);
    let intermediate_der = pem_to_der(ca_pem);

    let (_, leaf) = x509_parser::parse_x509_certificate(&leaf_der).unwrap();
    let (_, intermediate) = x509_parser::parse_x509_certificate(&intermediate_der).unwrap();

    assert!(!leaf.is_ca());
    assert_eq!(leaf.issuer(), intermediate.subject());
    assert_eq!(
        leaf.subject()
            .iter_common_name()
            .next()
            .unwrap()
            .as_str()
            .unwrap(),
        uuid
    );
}

#[tokio::test]
async fn manifest_with_missing_package_reference_is_rejected_before_activation_is_reachable() {
    let svc = service();
    let mut bad = manifest();
    bad.marbles.get_mut("M").unwrap().package = "ghost".to_string();

    let err = svc.set_manifest(bad).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::InconsistentManifest(_)));
    // the coordinator never left `uninitialised`, so activation is gated.
    let err = svc.activate(Some(&[]), req("00000000-0000-0000-0000-000000000001")).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::NotReady));
}

fn pem_to_der(pem: &str) -> Vec<u8> {
    use base64::Engine;
    let body: String = pem
        .lines()
        .filter(|l| !l.starts_with("-----"))
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(body)
        .unwrap()
}
