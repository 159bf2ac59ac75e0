//! transparent-TLS config assembly (C7): the `MARBLE_TTLS_CONFIG` JSON blob
//! a marble's runtime consults to decide per-endpoint TLS parameters.
//!
//! This is a stable wire format (spec §6) consumed by enclave runtimes —
//! changing its shape is a version bump, not a refactor.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::manifest::TlsTag;
use crate::secrets::MaterialSecret;
use crate::template::to_pem;

#[derive(Debug, Serialize)]
pub struct TtlsConfig {
    #[serde(rename = "Incoming")]
    incoming: BTreeMap<String, IncomingEntry>,
    #[serde(rename = "Outgoing")]
    outgoing: BTreeMap<String, OutgoingEntry>,
}

#[derive(Debug, Serialize)]
struct IncomingEntry {
    cacrt: String,
    clicrt: String,
    clikey: String,
    #[serde(rename = "clientAuth")]
    client_auth: bool,
}

#[derive(Debug, Serialize)]
struct OutgoingEntry {
    cacrt: String,
    clicrt: String,
    clikey: String,
}

/// Build the TTLS config for one marble's TLS tags, or `None` if the
/// marble declares no TLS tags (spec invariant: the config must be *absent*
/// in that case, not present-but-empty).
///
/// `intermediate_cert_der`/`leaf_cert_der`/`leaf_key_der` are this
/// activation's own cert/key; `user_secrets` supplies the manifest's
/// declared secrets so an `Incoming.Cert` override can pick a different
/// cert/key pair than the marble's own leaf.
pub fn assemble(
    tls_tags: &[String],
    tls_catalogue: &BTreeMap<String, TlsTag>,
    intermediate_cert_der: &[u8],
    leaf_cert_der: &[u8],
    leaf_key_der: &[u8],
    user_secrets: &BTreeMap<String, MaterialSecret>,
) -> Option<TtlsConfig> {
    if tls_tags.is_empty() {
        return None;
    }

    let cacrt = to_pem("CERTIFICATE", intermediate_cert_der);
    let leaf_clicrt = to_pem("CERTIFICATE", leaf_cert_der);
    let leaf_clikey = to_pem("PRIVATE KEY", leaf_key_der);

    let mut incoming = BTreeMap::new();
    let mut outgoing = BTreeMap::new();

    for tag_name in tls_tags {
        let Some(tag) = tls_catalogue.get(tag_name) else {
            continue;
        };
        for inc in &tag.incoming {
            let (clicrt, clikey, client_auth) = match &inc.cert {
                Some(name) => {
                    let secret = user_secrets.get(name);
                    let clicrt = secret
                        .and_then(|s| s.cert.as_ref())
                        .map(|c| to_pem("CERTIFICATE", c.raw()))
                        .unwrap_or_else(|| leaf_clicrt.clone());
                    let clikey = secret
                        .and_then(|s| s.private.as_ref())
                        .map(|k| to_pem("PRIVATE KEY", k.raw()))
                        .unwrap_or_else(|| leaf_clikey.clone());
                    (clicrt, clikey, !inc.disable_client_auth)
                }
                None => (leaf_clicrt.clone(), leaf_clikey.clone(), true),
            };
            incoming.insert(
                format!("*:{}", inc.port),
                IncomingEntry {
                    cacrt: cacrt.clone(),
                    clicrt,
                    clikey,
                    client_auth,
                },
            );
        }
        for out in &tag.outgoing {
            outgoing.insert(
                format!("{}:{}", out.addr, out.port),
                OutgoingEntry {
                    cacrt: cacrt.clone(),
                    clicrt: leaf_clicrt.clone(),
                    clikey: leaf_clikey.clone(),
                },
            );
        }
    }

    Some(TtlsConfig { incoming, outgoing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Incoming, Outgoing};
    use crate::secrets::SecretBytes;

    fn catalogue() -> BTreeMap<String, TlsTag> {
        let mut m = BTreeMap::new();
        m.insert(
            "t".to_string(),
            TlsTag {
                incoming: vec![Incoming {
                    port: 443,
                    cert: Some("userCert".to_string()),
                    disable_client_auth: true,
                }],
                outgoing: vec![Outgoing {
                    addr: "db.mesh".to_string(),
                    port: 5432,
                }],
            },
        );
        m
    }

    #[test]
    fn absent_when_marble_has_no_tls_tags() {
        assert!(assemble(&[], &catalogue(), &[1], &[2], &[3], &BTreeMap::new()).is_none());
    }

    #[test]
    fn user_cert_overrides_leaf_and_disables_client_auth() {
        let mut secrets = BTreeMap::new();
        secrets.insert(
            "userCert".to_string(),
            MaterialSecret {
                cert: Some(SecretBytes::Cert(vec![9, 9, 9])),
                public: SecretBytes::PublicKey(vec![1]),
                private: Some(SecretBytes::PrivateKey(vec![2])),
            },
        );
        let config = assemble(
            &["t".to_string()],
            &catalogue(),
            &[1],
            &[2],
            &[3],
            &secrets,
        )
        .unwrap();
        let entry = &config.incoming["*:443"];
        assert!(!entry.client_auth);
        assert!(entry.clicrt.contains("CERTIFICATE"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"*:443\""));
        assert!(json.contains("\"db.mesh:5432\""));
    }

    #[test]
    fn no_cert_override_defaults_client_auth_true() {
        let mut catalogue = BTreeMap::new();
        catalogue.insert(
            "t".to_string(),
            TlsTag {
                incoming: vec![Incoming {
                    port: 8080,
                    cert: None,
                    disable_client_auth: false,
                }],
                outgoing: vec![],
            },
        );
        let config = assemble(
            &["t".to_string()],
            &catalogue,
            &[1],
            &[2],
            &[3],
            &BTreeMap::new(),
        )
        .unwrap();
        assert!(config.incoming["*:8080"].client_auth);
    }
}
