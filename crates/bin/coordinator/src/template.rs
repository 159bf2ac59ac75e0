//! parameter templating (C6): expansion of `{{ func .Path }}` placeholders
//! in a marble's `Env`/`Files` values over the secret tree assembled for
//! this activation.
//!
//! This is deliberately *not* a general-purpose template engine. The
//! function catalogue is closed to the four encoders named in spec §4.6 and
//! the only addressable data is the secret tree passed in — there is no
//! reflection, no control flow, no file/include primitive. Treat the
//! manifest's template strings as untrusted input.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use base64::Engine;
use regex::Regex;

use crate::error::{CoordinatorError, Result};
use crate::secrets::{MaterialSecret, ReservedSecrets, SecretBytes};

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*(pem|hex|raw|base64)\s+\.([A-Za-z0-9_.]+)\s*\}\}").unwrap()
    })
}

/// the secret tree a template expression addresses: `.Marblerun.*` for the
/// three reserved secrets, `.Secrets.<name>.*` for manifest-declared ones.
pub struct SecretTree<'a> {
    pub marblerun: &'a ReservedSecrets,
    pub secrets: &'a BTreeMap<String, MaterialSecret>,
}

impl<'a> SecretTree<'a> {
    fn resolve(&self, path: &str) -> std::result::Result<&'a SecretBytes, String> {
        let parts: Vec<&str> = path.split('.').collect();
        match parts.as_slice() {
            ["Marblerun", field, leaf] => {
                let secret = match *field {
                    "RootCA" => &self.marblerun.root_ca,
                    "MarbleCert" => &self.marblerun.marble_cert,
                    "SealKey" => &self.marblerun.seal_key,
                    other => return Err(format!("unknown Marblerun field {other}")),
                };
                leaf_of(secret, leaf)
            }
            ["Secrets", name, leaf] => {
                let secret = self
                    .secrets
                    .get(*name)
                    .ok_or_else(|| format!("undeclared secret {name}"))?;
                leaf_of(secret, leaf)
            }
            _ => Err(format!("unresolvable path .{path}")),
        }
    }
}

fn leaf_of<'a>(secret: &'a MaterialSecret, leaf: &str) -> std::result::Result<&'a SecretBytes, String> {
    match leaf {
        "Cert" => secret
            .cert
            .as_ref()
            .ok_or_else(|| "secret has no Cert".to_string()),
        "Public" => Ok(&secret.public),
        "Private" => secret
            .private
            .as_ref()
            .ok_or_else(|| "secret has no Private".to_string()),
        other => Err(format!("unknown leaf field {other}")),
    }
}

/// expand every `{{ func .Path }}` placeholder in `input`. `label` is the
/// file path or env var name the value came from, surfaced in errors per
/// spec §4.6 ("Template errors surface ... with the path ... or variable
/// name ... that failed").
pub fn expand(tree: &SecretTree, label: &str, input: &str) -> Result<String> {
    let re = placeholder_re();
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in re.captures_iter(input) {
        let whole = caps.get(0).unwrap();
        out.push_str(&input[last..whole.start()]);
        let func = caps.get(1).unwrap().as_str();
        let path = caps.get(2).unwrap().as_str();
        let value = tree.resolve(path).map_err(|reason| CoordinatorError::Template {
            path: label.to_string(),
            reason,
        })?;
        let encoded = apply(func, value).map_err(|reason| CoordinatorError::Template {
            path: label.to_string(),
            reason,
        })?;
        out.push_str(&encoded);
        last = whole.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}

fn apply(func: &str, value: &SecretBytes) -> std::result::Result<String, String> {
    match func {
        "pem" => pem_encode(value),
        "hex" => Ok(hex::encode(value.raw())),
        "raw" => Ok(raw_string(value.raw())),
        "base64" => Ok(base64::engine::general_purpose::STANDARD.encode(value.raw())),
        other => Err(format!("unknown template function {other}")),
    }
}

/// pass raw secret bytes through as a string without UTF-8 validation, the
/// same semantics the source's `string(bytes)` cast has. Byte length is
/// preserved even when the material isn't valid UTF-8 (e.g. a raw seal
/// key) — callers must not treat the result as text.
fn raw_string(bytes: &[u8]) -> String {
    unsafe { String::from_utf8_unchecked(bytes.to_vec()) }
}

fn pem_encode(value: &SecretBytes) -> std::result::Result<String, String> {
    let label = match value {
        SecretBytes::Cert(_) => "CERTIFICATE",
        SecretBytes::PublicKey(_) => "PUBLIC KEY",
        SecretBytes::PrivateKey(_) => "PRIVATE KEY",
        SecretBytes::Raw(_) => return Err("cannot PEM-encode raw byte material".to_string()),
    };
    Ok(to_pem(label, value.raw()))
}

/// RFC 1421-style PEM envelope: base64 body wrapped at 64 columns between
/// `-----BEGIN <label>-----` / `-----END <label>-----` markers.
pub fn to_pem(label: &str, der: &[u8]) -> String {
    let body = base64::engine::general_purpose::STANDARD.encode(der);
    let mut out = String::with_capacity(body.len() + body.len() / 64 + 64);
    out.push_str("-----BEGIN ");
    out.push_str(label);
    out.push_str("-----\n");
    for chunk in body.as_bytes().chunks(64) {
        out.push_str(std::str::from_utf8(chunk).unwrap());
        out.push('\n');
    }
    out.push_str("-----END ");
    out.push_str(label);
    out.push_str("-----\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (ReservedSecrets, BTreeMap<String, MaterialSecret>) {
        let reserved = ReservedSecrets {
            root_ca: MaterialSecret {
                cert: Some(SecretBytes::Cert(vec![1, 2, 3])),
                public: SecretBytes::PublicKey(vec![4, 5, 6]),
                private: None,
            },
            marble_cert: MaterialSecret {
                cert: Some(SecretBytes::Cert(vec![7, 8, 9])),
                public: SecretBytes::PublicKey(vec![10, 11]),
                private: Some(SecretBytes::PrivateKey(vec![12, 13])),
            },
            seal_key: MaterialSecret {
                cert: None,
                public: SecretBytes::Raw(vec![0u8; 32]),
                private: Some(SecretBytes::Raw(vec![0u8; 32])),
            },
        };
        (reserved, BTreeMap::new())
    }

    #[test]
    fn raw_seal_key_round_trips_byte_length() {
        let (reserved, secrets) = sample_tree();
        let tree = SecretTree {
            marblerun: &reserved,
            secrets: &secrets,
        };
        let out = expand(&tree, "GREETING", "hello {{ raw .Marblerun.SealKey.Public }}").unwrap();
        assert_eq!(out.len(), "hello ".len() + 32);
    }

    #[test]
    fn pem_round_trips_der() {
        let (reserved, secrets) = sample_tree();
        let tree = SecretTree {
            marblerun: &reserved,
            secrets: &secrets,
        };
        let out = expand(&tree, "cert.pem", "{{ pem .Marblerun.MarbleCert.Cert }}").unwrap();
        assert!(out.starts_with("-----BEGIN CERTIFICATE-----\n"));
        let body: String = out
            .lines()
            .filter(|l| !l.starts_with("-----"))
            .collect();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(body)
            .unwrap();
        assert_eq!(decoded, vec![7, 8, 9]);
    }

    #[test]
    fn unknown_path_surfaces_label_in_error() {
        let (reserved, secrets) = sample_tree();
        let tree = SecretTree {
            marblerun: &reserved,
            secrets: &secrets,
        };
        let err = expand(&tree, "FOO_ENV", "{{ raw .Secrets.missing.Public }}").unwrap_err();
        match err {
            CoordinatorError::Template { path, .. } => assert_eq!(path, "FOO_ENV"),
            other => panic!("expected Template error, got {other:?}"),
        }
    }

    #[test]
    fn pem_rejects_raw_byte_material() {
        let (reserved, secrets) = sample_tree();
        let tree = SecretTree {
            marblerun: &reserved,
            secrets: &secrets,
        };
        assert!(expand(&tree, "BAD", "{{ pem .Marblerun.SealKey.Public }}").is_err());
    }
}
