//! certificate issuance against the coordinator's intermediate CA (C5),
//! plus the one-time root/intermediate bootstrap run at first manifest
//! commit.

use rand_core::RngCore;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose,
    IsCa, Issuer, KeyPair, KeyUsagePurpose, SanType, SerialNumber,
};
use std::net::IpAddr;
use uuid::Uuid;
use x509_parser::certification_request::X509CertificationRequest;
use x509_parser::extensions::{GeneralName, ParsedExtension};

use crate::error::{CoordinatorError, Result};

/// The two-level CA created once, at first manifest commit, and never
/// rotated for the life of the process (§3 ownership rule).
pub struct IssuedCa {
    pub root_cert_der: Vec<u8>,
    pub root_key_der: Vec<u8>,
    pub intermediate_cert_der: Vec<u8>,
    pub intermediate_key_der: Vec<u8>,
}

/// Create the root CA and an intermediate signed by it. Called exactly once,
/// when the coordinator transitions out of `uninitialised`.
pub fn bootstrap_ca() -> Result<IssuedCa> {
    let root_key = KeyPair::generate().map_err(rcgen_err)?;
    let mut root_params = CertificateParams::new(Vec::<String>::new()).map_err(rcgen_err)?;
    root_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    root_params.distinguished_name = {
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, "marblerun root CA");
        dn.push(DnType::OrganizationName, "Edgeless Systems");
        dn
    };
    root_params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
    ];
    root_params.not_before = time::OffsetDateTime::now_utc();
    root_params.not_after = rcgen::date_time_ymd(9999, 12, 31);
    let root_cert = root_params.self_signed(&root_key).map_err(rcgen_err)?;

    let intermediate_key = KeyPair::generate().map_err(rcgen_err)?;
    let mut intermediate_params = CertificateParams::new(Vec::<String>::new()).map_err(rcgen_err)?;
    intermediate_params.is_ca = IsCa::Ca(BasicConstraints::Constrained(0));
    intermediate_params.distinguished_name = {
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, "marblerun intermediate CA");
        dn.push(DnType::OrganizationName, "Edgeless Systems");
        dn
    };
    intermediate_params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
    ];
    intermediate_params.not_before = time::OffsetDateTime::now_utc();
    intermediate_params.not_after = rcgen::date_time_ymd(9999, 12, 31);

    let root_issuer = Issuer::from_params(&root_params, &root_key);
    let intermediate_cert = intermediate_params
        .signed_by(&intermediate_key, &root_issuer)
        .map_err(rcgen_err)?;

    Ok(IssuedCa {
        root_cert_der: root_cert.der().to_vec(),
        root_key_der: root_key.serialize_der(),
        intermediate_cert_der: intermediate_cert.der().to_vec(),
        intermediate_key_der: intermediate_key.serialize_der(),
    })
}

/// Read `Organization` out of a DER certificate's issuer/subject, used to
/// carry the intermediate's own organization onto every leaf it signs.
pub fn organization_of(cert_der: &[u8]) -> Result<String> {
    let (_, cert) = x509_parser::parse_x509_certificate(cert_der)
        .map_err(|e| CoordinatorError::Crypto(format!("parse intermediate cert: {e}")))?;
    cert.subject()
        .iter_organization()
        .next()
        .and_then(|o| o.as_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| CoordinatorError::Crypto("intermediate cert has no organization".into()))
}

/// Parse an incoming CSR, verify its self-signature (proof the requester
/// holds a private key), and pull its requested SAN extension — everything
/// else about the CSR's own key material is ignored, see `DESIGN.md` for why
/// the leaf is issued over a coordinator-generated key instead.
pub struct ParsedCsr {
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
}

pub fn parse_and_verify_csr(csr_der: &[u8]) -> Result<ParsedCsr> {
    let (_, csr) = X509CertificationRequest::from_der(csr_der)
        .map_err(|e| CoordinatorError::InvalidCsr(format!("malformed CSR: {e}")))?;
    csr.verify_signature()
        .map_err(|_| CoordinatorError::InvalidCsr("CSR signature verification failed".into()))?;

    let mut dns_names = Vec::new();
    let mut ip_addresses = Vec::new();
    for ext in csr.requested_extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext {
            for name in &san.general_names {
                match name {
                    GeneralName::DNSName(s) => dns_names.push((*s).to_string()),
                    GeneralName::IPAddress(bytes) => {
                        if let Some(ip) = bytes_to_ip(bytes) {
                            ip_addresses.push(ip);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(ParsedCsr {
        dns_names,
        ip_addresses,
    })
}

fn bytes_to_ip(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => Some(IpAddr::from(<[u8; 4]>::try_from(bytes).ok()?)),
        16 => Some(IpAddr::from(<[u8; 16]>::try_from(bytes).ok()?)),
        _ => None,
    }
}

/// Issue a marble leaf certificate for `leaf_public_key_der` (a PKIX-encoded
/// public key the coordinator just generated for this activation, see
/// `secrets.rs`), signed by the intermediate CA. `csr` supplies the
/// requested SANs only.
#[allow(clippy::too_many_arguments)]
pub fn issue_leaf_certificate(
    rng: &mut impl RngCore,
    csr: &ParsedCsr,
    leaf_private_key_pkcs8_der: &[u8],
    marble_uuid: Uuid,
    intermediate_cert_der: &[u8],
    intermediate_key_der: &[u8],
) -> Result<Vec<u8>> {
    let mut params = CertificateParams::new(csr.dns_names.clone()).map_err(rcgen_err)?;
    for ip in &csr.ip_addresses {
        params.subject_alt_names.push(SanType::IpAddress(*ip));
    }

    let organization = organization_of(intermediate_cert_der)?;
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, marble_uuid.to_string());
    dn.push(DnType::OrganizationName, organization);
    params.distinguished_name = dn;

    params.is_ca = IsCa::NoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature, KeyUsagePurpose::KeyAgreement];
    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ServerAuth,
        ExtendedKeyUsagePurpose::ClientAuth,
    ];
    params.not_before = time::OffsetDateTime::now_utc();
    // real X.509 encoders choke on `now + MaxInt64`; cap at the largest
    // representable date instead (§9 design note).
    params.not_after = rcgen::date_time_ymd(9999, 12, 31);

    let mut serial_bytes = [0u8; 16];
    rng.fill_bytes(&mut serial_bytes);
    params.serial_number = Some(SerialNumber::from_slice(&serial_bytes));

    let leaf_key =
        KeyPair::from_pkcs8_der_and_sign_algo(leaf_private_key_pkcs8_der, &rcgen::PKCS_ECDSA_P256_SHA256)
            .map_err(rcgen_err)?;

    let intermediate_key =
        KeyPair::from_pkcs8_der_and_sign_algo(intermediate_key_der, &rcgen::PKCS_ECDSA_P256_SHA256)
            .map_err(rcgen_err)?;
    let intermediate_params =
        CertificateParams::from_ca_cert_der(intermediate_cert_der).map_err(rcgen_err)?;
    let issuer = Issuer::from_params(&intermediate_params, &intermediate_key);

    let leaf_cert = params.signed_by(&leaf_key, &issuer).map_err(rcgen_err)?;
    Ok(leaf_cert.der().to_vec())
}

fn rcgen_err(e: rcgen::Error) -> CoordinatorError {
    CoordinatorError::Crypto(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_ca_produces_chainable_intermediate() {
        let ca = bootstrap_ca().expect("bootstrap");
        let (_, root) = x509_parser::parse_x509_certificate(&ca.root_cert_der).unwrap();
        let (_, intermediate) =
            x509_parser::parse_x509_certificate(&ca.intermediate_cert_der).unwrap();
        assert!(root.is_ca());
        assert!(intermediate.is_ca());
        assert_eq!(intermediate.issuer(), root.subject());
    }

    #[test]
    fn organization_of_reads_intermediate_org() {
        let ca = bootstrap_ca().expect("bootstrap");
        let org = organization_of(&ca.intermediate_cert_der).unwrap();
        assert_eq!(org, "Edgeless Systems");
    }
}
