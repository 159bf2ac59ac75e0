//! per-activation secret material (C4): the marble's own ECDSA key pair and
//! leaf certificate, its seal key, and its declared user secrets.

use std::collections::BTreeMap;

use hkdf::Hkdf;
use p256::ecdsa::SigningKey;
use p256::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::ca::{self, ParsedCsr};
use crate::error::{CoordinatorError, Result};
use crate::manifest::{SecretSpec, SecretType};

/// A single piece of secret material as it flows into templating (C6) and
/// TTLS assembly (C7). The variant records *how* the bytes should be
/// encoded, since `pem`/`hex` behave differently for a certificate than for
/// a raw byte string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SecretBytes {
    Cert(Vec<u8>),
    PublicKey(Vec<u8>),
    PrivateKey(Vec<u8>),
    Raw(Vec<u8>),
}

impl SecretBytes {
    pub fn raw(&self) -> &[u8] {
        match self {
            SecretBytes::Cert(b)
            | SecretBytes::PublicKey(b)
            | SecretBytes::PrivateKey(b)
            | SecretBytes::Raw(b) => b,
        }
    }
}

/// The `{Cert, Public, Private}` shape every reserved and user secret shares
/// in the real manifest model, named after the Go struct it mirrors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSecret {
    pub cert: Option<SecretBytes>,
    pub public: SecretBytes,
    pub private: Option<SecretBytes>,
}

/// The three secrets the coordinator always hands back, under the fixed
/// names `RootCA`, `MarbleCert`, `SealKey` (§3).
pub struct ReservedSecrets {
    pub root_ca: MaterialSecret,
    pub marble_cert: MaterialSecret,
    pub seal_key: MaterialSecret,
}

/// Generate the reserved secrets for one activation. Deterministic in
/// everything except the fresh key material and serial number, both of
/// which are drawn from `rng` — tests inject a seeded RNG to get
/// reproducible certs.
pub fn generate_marble_auth_secrets(
    rng: &mut (impl RngCore + CryptoRng),
    csr_der: &[u8],
    marble_uuid: Uuid,
    intermediate_cert_der: &[u8],
    intermediate_key_der: &[u8],
) -> Result<ReservedSecrets> {
    let csr: ParsedCsr = ca::parse_and_verify_csr(csr_der)?;

    let leaf_signing_key = SigningKey::random(rng);
    let leaf_private_der = leaf_signing_key
        .to_pkcs8_der()
        .map_err(|e| CoordinatorError::Crypto(format!("encode leaf private key: {e}")))?
        .as_bytes()
        .to_vec();
    let leaf_public_der = leaf_signing_key
        .verifying_key()
        .to_public_key_der()
        .map_err(|e| CoordinatorError::Crypto(format!("encode leaf public key: {e}")))?
        .to_vec();

    let leaf_cert_der = ca::issue_leaf_certificate(
        rng,
        &csr,
        &leaf_private_der,
        marble_uuid,
        intermediate_cert_der,
        intermediate_key_der,
    )?;

    let intermediate_signing_key = SigningKey::from_pkcs8_der(intermediate_key_der)
        .map_err(|e| CoordinatorError::Crypto(format!("decode intermediate key: {e}")))?;
    let intermediate_public_der = intermediate_signing_key
        .verifying_key()
        .to_public_key_der()
        .map_err(|e| CoordinatorError::Crypto(format!("encode intermediate public key: {e}")))?
        .to_vec();

    let seal_key = derive_seal_key(&intermediate_signing_key, marble_uuid);

    Ok(ReservedSecrets {
        root_ca: MaterialSecret {
            cert: Some(SecretBytes::Cert(intermediate_cert_der.to_vec())),
            public: SecretBytes::PublicKey(intermediate_public_der),
            private: None,
        },
        marble_cert: MaterialSecret {
            cert: Some(SecretBytes::Cert(leaf_cert_der)),
            public: SecretBytes::PublicKey(leaf_public_der),
            private: Some(SecretBytes::PrivateKey(leaf_private_der)),
        },
        seal_key: MaterialSecret {
            cert: None,
            public: SecretBytes::Raw(seal_key.to_vec()),
            private: Some(SecretBytes::Raw(seal_key.to_vec())),
        },
    })
}

/// `SealKey = HKDF-SHA256(ikm = intermediate private scalar, salt = marble
/// UUID)`, expanded to 32 bytes (§3, §4.4).
fn derive_seal_key(intermediate_key: &SigningKey, marble_uuid: Uuid) -> [u8; 32] {
    let ikm = intermediate_key.to_bytes();
    let hk = Hkdf::<Sha256>::new(Some(marble_uuid.as_bytes()), ikm.as_slice());
    let mut out = [0u8; 32];
    hk.expand(b"marblerun-sealkey-v1", &mut out)
        .expect("32 is a valid HKDF-SHA256 output length");
    out
}

/// Generate the non-shared per-marble values for every `Secrets` entry the
/// manifest declares; shared secrets are left for the caller to fetch from
/// the store (C2) and merge in, see `activation.rs`.
pub fn generate_user_secrets(
    rng: &mut (impl RngCore + CryptoRng),
    specs: &BTreeMap<String, SecretSpec>,
    intermediate_cert_der: &[u8],
    intermediate_key_der: &[u8],
    marble_uuid: Uuid,
) -> Result<BTreeMap<String, MaterialSecret>> {
    let mut out = BTreeMap::new();
    for (name, spec) in specs {
        if spec.shared {
            continue;
        }
        let secret = generate_secret_value(
            rng,
            name,
            spec,
            intermediate_cert_der,
            intermediate_key_der,
            marble_uuid,
        )?;
        out.insert(name.clone(), secret);
    }
    Ok(out)
}

/// Generate a single secret's material, regardless of its `Shared` flag.
/// `namespace` disambiguates the certificate CN when `spec.kind` is
/// `cert-ecdsa`: callers pass the activating marble's UUID for per-marble
/// secrets and a fixed namespace for shared secrets, which aren't owned by
/// any one marble (see `activation::Service` for the lazy-create path).
pub fn generate_secret_value(
    rng: &mut (impl RngCore + CryptoRng),
    name: &str,
    spec: &SecretSpec,
    intermediate_cert_der: &[u8],
    intermediate_key_der: &[u8],
    namespace: Uuid,
) -> Result<MaterialSecret> {
    match spec.kind {
        SecretType::SymmetricKey => {
            let mut bytes = vec![0u8; spec.size];
            rng.fill_bytes(&mut bytes);
            Ok(MaterialSecret {
                cert: None,
                public: SecretBytes::Raw(bytes.clone()),
                private: Some(SecretBytes::Raw(bytes)),
            })
        }
        SecretType::CertEcdsa => {
            user_certificate_secret(rng, name, intermediate_cert_der, intermediate_key_der, namespace)
        }
    }
}

/// Per-marble user secret of type `cert-ecdsa`: a fresh keypair certified by
/// the intermediate CA, subject CN set to the secret's name so multiple
/// user certs on one marble remain distinguishable.
fn user_certificate_secret(
    rng: &mut (impl RngCore + CryptoRng),
    secret_name: &str,
    intermediate_cert_der: &[u8],
    intermediate_key_der: &[u8],
    marble_uuid: Uuid,
) -> Result<MaterialSecret> {
    let signing_key = SigningKey::random(rng);
    let private_der = signing_key
        .to_pkcs8_der()
        .map_err(|e| CoordinatorError::Crypto(format!("encode user secret private key: {e}")))?
        .as_bytes()
        .to_vec();
    let public_der = signing_key
        .verifying_key()
        .to_public_key_der()
        .map_err(|e| CoordinatorError::Crypto(format!("encode user secret public key: {e}")))?
        .to_vec();

    let empty_csr = ParsedCsr {
        dns_names: Vec::new(),
        ip_addresses: Vec::new(),
    };
    // reuse the marble's UUID as a disambiguating namespace for the CN so
    // two marbles declaring a secret of the same name never collide.
    let cn = Uuid::new_v5(&marble_uuid, secret_name.as_bytes());
    let cert_der = ca::issue_leaf_certificate(
        rng,
        &empty_csr,
        &private_der,
        cn,
        intermediate_cert_der,
        intermediate_key_der,
    )?;

    Ok(MaterialSecret {
        cert: Some(SecretBytes::Cert(cert_der)),
        public: SecretBytes::PublicKey(public_der),
        private: Some(SecretBytes::PrivateKey(private_der)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ca::bootstrap_ca;
    use rand::rngs::OsRng;
    use rcgen::{CertificateParams, KeyPair};

    fn sample_csr() -> Vec<u8> {
        let key = KeyPair::generate().unwrap();
        let params = CertificateParams::new(vec!["marble.local".to_string()]).unwrap();
        params.serialize_request(&key).unwrap().der().to_vec()
    }

    #[test]
    fn seal_key_is_deterministic_in_bound_inputs() {
        let ca = bootstrap_ca().unwrap();
        let key = SigningKey::from_pkcs8_der(&ca.intermediate_key_der).unwrap();
        let uuid = Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap();
        let a = derive_seal_key(&key, uuid);
        let b = derive_seal_key(&key, uuid);
        assert_eq!(a, b);

        let other_uuid = Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap();
        let c = derive_seal_key(&key, other_uuid);
        assert_ne!(a, c);
    }

    #[test]
    fn distinct_csrs_yield_distinct_leaf_certs() {
        let ca = bootstrap_ca().unwrap();
        let uuid = Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap();
        let mut rng = OsRng;

        let first =
            generate_marble_auth_secrets(&mut rng, &sample_csr(), uuid, &ca.intermediate_cert_der, &ca.intermediate_key_der)
                .unwrap();
        let second =
            generate_marble_auth_secrets(&mut rng, &sample_csr(), uuid, &ca.intermediate_cert_der, &ca.intermediate_key_der)
                .unwrap();

        assert_ne!(
            first.marble_cert.cert.unwrap().raw(),
            second.marble_cert.cert.unwrap().raw()
        );
    }
}
