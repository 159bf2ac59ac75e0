//! the activation service (C8): orchestrates C1–C7 under a state gate and
//! the coordinator-wide serialising lock (spec §5).

use std::collections::BTreeMap;
use std::sync::Mutex as StdMutex;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::ca;
use crate::error::{CoordinatorError, Result};
use crate::manifest::{self, Infrastructure, Manifest, Package, Parameters};
use crate::quote::QuoteVerifier;
use crate::secrets::{self, MaterialSecret, ReservedSecrets};
use crate::store::{CaSlot, ManifestSlot, Store};
use crate::template::{self, SecretTree};
use crate::ttls;

/// coordinator-wide lifecycle state. `Activate` is only accepted in
/// `AcceptingMarbles` (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Uninitialised,
    AcceptingMarbles,
}

/// the RPC's own request shape, decoupled from the generated proto type so
/// `service.rs` is the only module that knows about `tonic`/`prost`.
#[derive(Debug, Clone)]
pub struct ActivationRequest {
    pub marble_type: String,
    pub quote: Vec<u8>,
    pub csr: Vec<u8>,
    pub uuid: String,
}

pub struct Service {
    store: std::sync::Arc<dyn Store>,
    verifier: std::sync::Arc<dyn QuoteVerifier>,
    simulation_mode: bool,
    state: StdMutex<CoordinatorState>,
    activation_lock: AsyncMutex<()>,
    rng: StdMutex<StdRng>,
}

impl Service {
    pub fn new(
        store: std::sync::Arc<dyn Store>,
        verifier: std::sync::Arc<dyn QuoteVerifier>,
        simulation_mode: bool,
    ) -> Self {
        Self::with_rng(store, verifier, simulation_mode, StdRng::from_entropy())
    }

    /// construct with an injected RNG, so tests get reproducible key
    /// material and serial numbers (spec §4.4, §5).
    pub fn with_rng(
        store: std::sync::Arc<dyn Store>,
        verifier: std::sync::Arc<dyn QuoteVerifier>,
        simulation_mode: bool,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            verifier,
            simulation_mode,
            state: StdMutex::new(CoordinatorState::Uninitialised),
            activation_lock: AsyncMutex::new(()),
            rng: StdMutex::new(rng),
        }
    }

    pub fn state(&self) -> CoordinatorState {
        *self.state.lock().unwrap()
    }

    /// commit the policy manifest. Bootstraps the root/intermediate CA on
    /// first call (spec §3: "created at first manifest commit; read-only
    /// thereafter") and transitions the coordinator into
    /// `AcceptingMarbles`. Out of scope for this core: manifest signature
    /// verification and the upload transport (§1).
    pub async fn set_manifest(&self, manifest: Manifest) -> Result<()> {
        manifest.check()?;
        let _guard = self.activation_lock.lock().await;
        if self.store.get_certificate(CaSlot::Root)?.is_none() {
            let issued = ca::bootstrap_ca()?;
            self.store.put_certificate(CaSlot::Root, &issued.root_cert_der)?;
            self.store.put_private_key(CaSlot::Root, &issued.root_key_der)?;
            self.store
                .put_certificate(CaSlot::Intermediate, &issued.intermediate_cert_der)?;
            self.store
                .put_private_key(CaSlot::Intermediate, &issued.intermediate_key_der)?;
            info!("bootstrapped root and intermediate CA");
        }
        self.store.put_manifest(ManifestSlot::Main, &manifest)?;
        *self.state.lock().unwrap() = CoordinatorState::AcceptingMarbles;
        info!("committed main manifest, coordinator now accepting marbles");
        Ok(())
    }

    /// commit an update overlay (raises `SecurityVersion` of packages
    /// only, spec §3/§9). Does not itself gate the state machine.
    pub async fn set_update_manifest(&self, manifest: Manifest) -> Result<()> {
        let _guard = self.activation_lock.lock().await;
        self.store.put_manifest(ManifestSlot::Update, &manifest)
    }

    /// `Activate(req)` (spec §4.8). `peer_cert_der` is the client
    /// certificate pulled from the mTLS transport context by the caller
    /// (`service.rs`); its presence is only checked here, *after* the
    /// state gate, matching the spec's step order (1. lock, 2. state
    /// check, 3. peer cert extraction).
    pub async fn activate(
        &self,
        peer_cert_der: Option<&[u8]>,
        req: ActivationRequest,
    ) -> Result<Parameters> {
        let _guard = self.activation_lock.lock().await;

        if self.state() != CoordinatorState::AcceptingMarbles {
            return Err(CoordinatorError::NotReady);
        }

        let peer_cert_der = peer_cert_der.ok_or(CoordinatorError::MissingPeerCertificate)?;

        let main = self.store.get_manifest(ManifestSlot::Main)?;
        let update = self.store.get_manifest(ManifestSlot::Update)?;

        let marble = main
            .marbles
            .get(&req.marble_type)
            .ok_or_else(|| CoordinatorError::UnknownMarbleType(req.marble_type.clone()))?
            .clone();
        let base_package = main.packages.get(&marble.package).cloned().ok_or_else(|| {
            CoordinatorError::InconsistentManifest(format!(
                "marble {} references missing package {}",
                req.marble_type, marble.package
            ))
        })?;
        let effective_security_version =
            manifest::effective_security_version(&main, &update, &marble.package)
                .expect("package just resolved above");
        let effective_package = Package {
            security_version: effective_security_version,
            ..base_package
        };

        if !self.simulation_mode {
            let matched = self.validate_quote(&req, peer_cert_der, &main, &effective_package)?;
            info!(marble_type = %req.marble_type, infra = %matched, "quote accepted");
        }

        let counter = self.store.get_activations(&req.marble_type)?.unwrap_or(0);
        self.store.put_activations(&req.marble_type, counter)?;
        if marble.max_activations > 0 && counter >= marble.max_activations {
            return Err(CoordinatorError::BudgetExhausted(req.marble_type.clone()));
        }

        let marble_uuid = Uuid::parse_str(&req.uuid)
            .map_err(|e| CoordinatorError::InvalidUuid(e.to_string()))?;

        let intermediate_cert_der = self
            .store
            .get_certificate(CaSlot::Intermediate)?
            .ok_or_else(|| CoordinatorError::Crypto("intermediate CA not bootstrapped".into()))?;
        let intermediate_key_der = self
            .store
            .get_private_key(CaSlot::Intermediate)?
            .ok_or_else(|| CoordinatorError::Crypto("intermediate CA key not bootstrapped".into()))?;

        let reserved = {
            let mut rng = self.rng.lock().unwrap();
            secrets::generate_marble_auth_secrets(
                &mut *rng,
                &req.csr,
                marble_uuid,
                &intermediate_cert_der,
                &intermediate_key_der,
            )
        };
        let reserved = reserved.map_err(|e| {
            error!(marble_type = %req.marble_type, uuid = %marble_uuid, "secret generation failed: {e}");
            e
        })?;

        let user_secrets = self.build_user_secrets(
            &main,
            &intermediate_cert_der,
            &intermediate_key_der,
            marble_uuid,
        )?;

        let mut params = marble.parameters.clone();
        let leaf_cert_der = reserved
            .marble_cert
            .cert
            .as_ref()
            .expect("leaf cert always set")
            .raw()
            .to_vec();
        let leaf_key_der = reserved
            .marble_cert
            .private
            .as_ref()
            .expect("leaf private key always set")
            .raw()
            .to_vec();

        if let Some(ttls_config) = ttls::assemble(
            &marble.tls,
            &main.tls,
            &intermediate_cert_der,
            &leaf_cert_der,
            &leaf_key_der,
            &user_secrets,
        ) {
            let json = serde_json::to_string(&ttls_config)
                .map_err(|e| CoordinatorError::Crypto(format!("encode ttls config: {e}")))?;
            params.env.insert("MARBLE_TTLS_CONFIG".to_string(), json);
        }

        customise_parameters(&mut params, &reserved, &user_secrets, &intermediate_cert_der)?;

        self.store.increment_activations(&req.marble_type)?;
        info!(marble_type = %req.marble_type, uuid = %marble_uuid, "activation succeeded");

        Ok(params)
    }

    fn validate_quote(
        &self,
        req: &ActivationRequest,
        peer_cert_der: &[u8],
        main: &Manifest,
        effective_package: &Package,
    ) -> Result<String> {
        if main.infrastructures.is_empty() {
            let zero = Infrastructure::zero();
            return if self
                .verifier
                .validate(&req.quote, peer_cert_der, effective_package, &zero)
            {
                Ok("<none>".to_string())
            } else {
                Err(CoordinatorError::QuoteRejected(req.marble_type.clone()))
            };
        }
        for (name, infra) in main.infrastructures_sorted() {
            if self
                .verifier
                .validate(&req.quote, peer_cert_der, effective_package, infra)
            {
                return Ok(name.clone());
            }
        }
        Err(CoordinatorError::QuoteRejected(req.marble_type.clone()))
    }

    /// non-shared secrets are generated fresh per activation; shared ones
    /// are fetched from the store, or generated and persisted on first use
    /// (spec §3 entity lifecycle for `Shared=true` secrets).
    fn build_user_secrets(
        &self,
        main: &Manifest,
        intermediate_cert_der: &[u8],
        intermediate_key_der: &[u8],
        marble_uuid: Uuid,
    ) -> Result<BTreeMap<String, MaterialSecret>> {
        let mut merged = {
            let mut rng = self.rng.lock().unwrap();
            secrets::generate_user_secrets(
                &mut *rng,
                &main.secrets,
                intermediate_cert_der,
                intermediate_key_der,
                marble_uuid,
            )?
        };

        let shared_map = self.store.get_secret_map()?;
        for (name, spec) in &main.secrets {
            if !spec.shared {
                continue;
            }
            if let Some(existing) = shared_map.get(name) {
                merged.insert(name.clone(), existing.clone());
                continue;
            }
            let generated = {
                let mut rng = self.rng.lock().unwrap();
                secrets::generate_secret_value(
                    &mut *rng,
                    name,
                    spec,
                    intermediate_cert_der,
                    intermediate_key_der,
                    // shared secrets aren't owned by any one marble; namespace
                    // their CN off a fixed UUID instead of this activation's.
                    Uuid::NAMESPACE_DNS,
                )?
            };
            self.store.put_secret(name, &generated)?;
            merged.insert(name.clone(), generated);
        }
        Ok(merged)
    }
}

/// expand `{{ func .Path }}` placeholders in `Env`/`Files`, then overwrite
/// the three reserved env vars so a manifest template can never set them
/// (spec §4.6). `Argv` is passed through verbatim.
fn customise_parameters(
    params: &mut Parameters,
    reserved: &ReservedSecrets,
    user_secrets: &BTreeMap<String, MaterialSecret>,
    intermediate_cert_der: &[u8],
) -> Result<()> {
    let tree = SecretTree {
        marblerun: reserved,
        secrets: user_secrets,
    };

    for (name, value) in params.env.iter_mut() {
        *value = template::expand(&tree, name, value)?;
    }
    for (path, value) in params.files.iter_mut() {
        *value = template::expand(&tree, path, value)?;
    }

    let leaf_pem = template::to_pem(
        "CERTIFICATE",
        reserved.marble_cert.cert.as_ref().unwrap().raw(),
    );
    let intermediate_pem = template::to_pem("CERTIFICATE", intermediate_cert_der);
    let key_pem = template::to_pem(
        "PRIVATE KEY",
        reserved.marble_cert.private.as_ref().unwrap().raw(),
    );

    params
        .env
        .insert("EDG_CA".to_string(), intermediate_pem.clone());
    params
        .env
        .insert("EDG_CERT_CHAIN".to_string(), format!("{leaf_pem}{intermediate_pem}"));
    params.env.insert("EDG_PRIVATE_KEY".to_string(), key_pem);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Marble, Package, SecretSpec, SecretType};
    use crate::quote::{AlwaysAccept, AlwaysReject, MinSecurityVersion};
    use crate::store::InMemoryStore;
    use rcgen::{CertificateParams, KeyPair};

    fn sample_csr() -> Vec<u8> {
        let key = KeyPair::generate().unwrap();
        let params = CertificateParams::new(vec!["marble.local".to_string()]).unwrap();
        params.serialize_request(&key).unwrap().der().to_vec()
    }

    fn service(simulation: bool, verifier: std::sync::Arc<dyn QuoteVerifier>) -> Service {
        Service::with_rng(
            std::sync::Arc::new(InMemoryStore::new()),
            verifier,
            simulation,
            StdRng::seed_from_u64(42),
        )
    }

    fn manifest_with_marble(max_activations: u64) -> Manifest {
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
                max_activations,
                parameters: Parameters {
                    argv: vec![],
                    env: BTreeMap::from([(
                        "GREETING".to_string(),
                        "hello {{ raw .Marblerun.SealKey.Public }}".to_string(),
                    )]),
                    files: BTreeMap::new(),
                },
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
    async fn s1_happy_path_no_tls() {
        let svc = service(true, std::sync::Arc::new(AlwaysAccept));
        svc.set_manifest(manifest_with_marble(0)).await.unwrap();

        let params = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap();

        assert!(!params.env["EDG_CA"].is_empty());
        assert_eq!(params.env["GREETING"].len(), "hello ".len() + 32);
        assert!(!params.env.contains_key("MARBLE_TTLS_CONFIG"));
    }

    #[tokio::test]
    async fn s2_budget_exhaustion() {
        let svc = service(true, std::sync::Arc::new(AlwaysAccept));
        svc.set_manifest(manifest_with_marble(2)).await.unwrap();

        svc.activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap();
        svc.activate(Some(&[]), req("00000000-0000-0000-0000-000000000002"))
            .await
            .unwrap();
        let third = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000003"))
            .await;
        assert!(matches!(third, Err(CoordinatorError::BudgetExhausted(_))));
    }

    #[tokio::test]
    async fn s3_quote_rejection_leaves_counter_unchanged() {
        let svc = service(false, std::sync::Arc::new(AlwaysReject));
        svc.set_manifest(manifest_with_marble(0)).await.unwrap();

        let err = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::QuoteRejected(_)));
    }

    #[tokio::test]
    async fn s4_unknown_marble_type() {
        let svc = service(true, std::sync::Arc::new(AlwaysAccept));
        svc.set_manifest(manifest_with_marble(0)).await.unwrap();

        let mut r = req("00000000-0000-0000-0000-000000000001");
        r.marble_type = "nope".to_string();
        let err = svc.activate(Some(&[]), r).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::UnknownMarbleType(_)));
    }

    #[tokio::test]
    async fn s5_update_overlay_raises_security_version() {
        let svc = service(false, std::sync::Arc::new(MinSecurityVersion { min: 5 }));
        svc.set_manifest(manifest_with_marble(0)).await.unwrap();

        let rejected = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await;
        assert!(matches!(
            rejected,
            Err(CoordinatorError::QuoteRejected(_))
        ));

        let mut update = Manifest::default();
        update.packages.insert(
            "P".to_string(),
            Package {
                security_version: 5,
                ..Default::default()
            },
        );
        svc.set_update_manifest(update).await.unwrap();

        svc.activate(Some(&[]), req("00000000-0000-0000-0000-000000000002"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn s6_ttls_with_user_cert() {
        let svc = service(true, std::sync::Arc::new(AlwaysAccept));
        let mut manifest = manifest_with_marble(0);
        manifest.secrets.insert(
            "userCert".to_string(),
            SecretSpec {
                kind: SecretType::CertEcdsa,
                size: 0,
                shared: false,
                valid_for: None,
            },
        );
        manifest.tls.insert(
            "T".to_string(),
            crate::manifest::TlsTag {
                incoming: vec![crate::manifest::Incoming {
                    port: 443,
                    cert: Some("userCert".to_string()),
                    disable_client_auth: true,
                }],
                outgoing: vec![],
            },
        );
        manifest.marbles.get_mut("M").unwrap().tls = vec!["T".to_string()];
        svc.set_manifest(manifest).await.unwrap();

        let params = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap();

        let ttls: serde_json::Value =
            serde_json::from_str(&params.env["MARBLE_TTLS_CONFIG"]).unwrap();
        assert_eq!(ttls["Incoming"]["*:443"]["clientAuth"], false);
    }

    #[tokio::test]
    async fn reserved_env_keys_always_win() {
        let svc = service(true, std::sync::Arc::new(AlwaysAccept));
        let mut manifest = manifest_with_marble(0);
        manifest
            .marbles
            .get_mut("M")
            .unwrap()
            .parameters
            .env
            .insert("EDG_CA".to_string(), "attacker-controlled".to_string());
        svc.set_manifest(manifest).await.unwrap();

        let params = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap();
        assert_ne!(params.env["EDG_CA"], "attacker-controlled");
        assert!(params.env["EDG_CA"].starts_with("-----BEGIN CERTIFICATE-----"));
    }

    #[tokio::test]
    async fn inactive_state_rejects_activation() {
        let svc = service(true, std::sync::Arc::new(AlwaysAccept));
        let err = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::NotReady));
    }

    /// spec §4.8 orders the state gate (step 2) before peer-cert extraction
    /// (step 3): a missing peer cert must never mask `FailedPrecondition`
    /// with `Unauthenticated`, and the reverse must also hold once the
    /// coordinator is accepting marbles.
    #[tokio::test]
    async fn state_gate_runs_before_peer_cert_check() {
        let svc = service(true, std::sync::Arc::new(AlwaysAccept));
        let err = svc
            .activate(None, req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::NotReady));

        svc.set_manifest(manifest_with_marble(0)).await.unwrap();
        let err = svc
            .activate(None, req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::MissingPeerCertificate));
    }

    #[tokio::test]
    async fn distinct_csrs_advance_counter_and_serials() {
        let svc = service(true, std::sync::Arc::new(AlwaysAccept));
        svc.set_manifest(manifest_with_marble(0)).await.unwrap();

        let p1 = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap();
        let p2 = svc
            .activate(Some(&[]), req("00000000-0000-0000-0000-000000000001"))
            .await
            .unwrap();
        assert_ne!(p1.env["EDG_CERT_CHAIN"], p2.env["EDG_CERT_CHAIN"]);
    }
}
