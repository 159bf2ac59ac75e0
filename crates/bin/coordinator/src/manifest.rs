//! typed representation of the coordinator's policy document.
//!
//! `Manifest` is pure data plus a deterministic, side-effect-free `check()`.
//! Every struct rejects unknown fields on deserialization so a typo or a
//! field from a newer manifest schema fails loudly at commit time instead of
//! silently being ignored (policy drift).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoordinatorError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct Manifest {
    #[serde(default)]
    pub packages: BTreeMap<String, Package>,
    #[serde(default)]
    pub infrastructures: BTreeMap<String, Infrastructure>,
    #[serde(default)]
    pub marbles: BTreeMap<String, Marble>,
    #[serde(default)]
    pub tls: BTreeMap<String, TlsTag>,
    #[serde(default)]
    pub secrets: BTreeMap<String, SecretSpec>,
    /// base64-encoded DER certificates of admin clients; opaque to the
    /// activation core, carried only so the manifest model round-trips.
    #[serde(default)]
    pub clients: BTreeMap<String, String>,
    #[serde(default)]
    pub recovery_key: Option<String>,
}

/// A class of enclave, identified by measurement + security version.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct Package {
    pub security_version: u64,
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub signer_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub debug: bool,
}

/// Platform-level attestation claims. Kept as an opaque property bag rather
/// than SGX-specific fields since the verifying backend (§6, out of scope)
/// is the only component that interprets these values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct Infrastructure {
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Infrastructure {
    /// the zero-value infrastructure used when a manifest declares none.
    pub fn zero() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct Marble {
    pub package: String,
    #[serde(default)]
    pub max_activations: u64,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub tls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct Parameters {
    #[serde(default)]
    pub argv: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct TlsTag {
    #[serde(default)]
    pub incoming: Vec<Incoming>,
    #[serde(default)]
    pub outgoing: Vec<Outgoing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct Incoming {
    pub port: u16,
    #[serde(default)]
    pub cert: Option<String>,
    #[serde(default)]
    pub disable_client_auth: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct Outgoing {
    pub addr: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretType {
    SymmetricKey,
    CertEcdsa,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
pub struct SecretSpec {
    #[serde(rename = "Type")]
    pub kind: SecretType,
    /// size in bytes, meaningful for `symmetric-key`.
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub shared: bool,
    /// validity in days, meaningful for `cert-ecdsa`.
    #[serde(default)]
    pub valid_for: Option<u64>,
}

impl Manifest {
    /// Structural consistency check run on commit. Deterministic,
    /// side-effect-free: no I/O, no randomness.
    pub fn check(&self) -> Result<()> {
        if self.packages.is_empty() {
            return Err(CoordinatorError::InconsistentManifest(
                "manifest declares no packages".into(),
            ));
        }
        if self.marbles.is_empty() {
            return Err(CoordinatorError::InconsistentManifest(
                "manifest declares no marbles".into(),
            ));
        }
        for (name, marble) in &self.marbles {
            if !self.packages.contains_key(&marble.package) {
                return Err(CoordinatorError::InconsistentManifest(format!(
                    "marble {name} references unknown package {}",
                    marble.package
                )));
            }
        }
        Ok(())
    }

    /// Infrastructures in stable (lexicographic key) order, so quote
    /// validation — and the audit log of which infra matched — is
    /// reproducible across runs.
    pub fn infrastructures_sorted(&self) -> Vec<(&String, &Infrastructure)> {
        self.infrastructures.iter().collect()
    }
}

/// Overlay `update.SecurityVersion` onto `main`'s package, if `update`
/// declares the same package key. Absence of the package in `update` means
/// "unchanged", not "revoked" (§9 open question, resolved per that note).
/// No other package field is affected by the overlay.
pub fn effective_security_version(main: &Manifest, update: &Manifest, package: &str) -> Option<u64> {
    let base = main.packages.get(package)?.security_version;
    match update.packages.get(package) {
        Some(overlay) => Some(overlay.security_version),
        None => Some(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_manifest() -> Manifest {
        let mut packages = BTreeMap::new();
        packages.insert(
            "p".to_string(),
            Package {
                security_version: 1,
                ..Default::default()
            },
        );
        let mut marbles = BTreeMap::new();
        marbles.insert(
            "m".to_string(),
            Marble {
                package: "p".to_string(),
                ..Default::default()
            },
        );
        Manifest {
            packages,
            marbles,
            ..Default::default()
        }
    }

    #[test]
    fn check_accepts_consistent_manifest() {
        assert!(minimal_manifest().check().is_ok());
    }

    #[test]
    fn check_rejects_empty_packages() {
        let mut m = minimal_manifest();
        m.packages.clear();
        assert!(m.check().is_err());
    }

    #[test]
    fn check_rejects_empty_marbles() {
        let mut m = minimal_manifest();
        m.marbles.clear();
        assert!(m.check().is_err());
    }

    #[test]
    fn check_rejects_dangling_package_reference() {
        let mut m = minimal_manifest();
        m.marbles.get_mut("m").unwrap().package = "ghost".to_string();
        assert!(m.check().is_err());
    }

    #[test]
    fn deny_unknown_fields_rejects_policy_drift() {
        let yaml = "Packages:\n  p:\n    SecurityVersion: 1\n    BogusField: true\n";
        let result: std::result::Result<Manifest, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn update_overlay_only_changes_security_version() {
        let main = minimal_manifest();
        let mut update = Manifest::default();
        update.packages.insert(
            "p".to_string(),
            Package {
                security_version: 5,
                unique_id: Some("should-be-ignored".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(effective_security_version(&main, &update, "p"), Some(5));

        let empty_update = Manifest::default();
        assert_eq!(
            effective_security_version(&main, &empty_update, "p"),
            Some(1)
        );
    }
}
