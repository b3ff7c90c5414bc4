#![allow(dead_code)]

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    KeyUsagePurpose, PKCS_ED25519, PKCS_RSA_SHA256,
};

const RSA_2048_KEY: &str = include_str!("../fixtures/rsa2048.key");
const OTHER_RSA_2048_KEY: &str = include_str!("../fixtures/rsa2048-other.key");

pub struct Pair {
    pub cert_pem: String,
    pub key_pem: String,
}

pub fn rsa_key() -> KeyPair {
    KeyPair::from_pem_and_sign_algo(RSA_2048_KEY, &PKCS_RSA_SHA256).unwrap()
}

pub fn other_rsa_key() -> KeyPair {
    KeyPair::from_pem_and_sign_algo(OTHER_RSA_2048_KEY, &PKCS_RSA_SHA256).unwrap()
}

pub fn ec_key() -> KeyPair {
    KeyPair::generate().unwrap()
}

pub fn ed25519_key() -> KeyPair {
    KeyPair::generate_for(&PKCS_ED25519).unwrap()
}

pub fn named(cn: &str) -> CertificateParams {
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, cn);
    params.distinguished_name = dn;
    params
}

pub fn self_signed(params: CertificateParams, key: KeyPair) -> Pair {
    let cert = params.self_signed(&key).unwrap();
    Pair {
        cert_pem: cert.pem(),
        key_pem: key.serialize_pem(),
    }
}

/// A self-signed root with Basic Constraints CA=true and CA key usages.
pub fn root_ca(cn: &str) -> Pair {
    let mut params = named(cn);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
    ];
    self_signed(params, ec_key())
}

/// A leaf certificate with no Basic Constraints, Key Usage or SAN extension.
pub fn bare_leaf(cn: &str) -> Pair {
    self_signed(named(cn), ec_key())
}
