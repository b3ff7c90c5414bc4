mod common;

use certvault_x509::validate;
use common::{bare_leaf, ec_key, ed25519_key, named, other_rsa_key, rsa_key, self_signed};

#[test]
fn test_matching_ec_pair_validates() {
    let pair = bare_leaf("ec.example.com");
    assert!(validate(pair.cert_pem.as_bytes(), pair.key_pem.as_bytes()));
}

#[test]
fn test_matching_rsa_pair_validates() {
    let pair = self_signed(named("rsa.example.com"), rsa_key());
    assert!(validate(pair.cert_pem.as_bytes(), pair.key_pem.as_bytes()));
}

#[test]
fn test_matching_ed25519_pair_validates() {
    let pair = self_signed(named("ed.example.com"), ed25519_key());
    assert!(validate(pair.cert_pem.as_bytes(), pair.key_pem.as_bytes()));
}

#[test]
fn test_unrelated_ec_key_is_rejected() {
    let pair = bare_leaf("ec.example.com");
    let unrelated = ec_key().serialize_pem();

    assert!(!validate(pair.cert_pem.as_bytes(), unrelated.as_bytes()));
}

#[test]
fn test_unrelated_rsa_key_is_rejected() {
    let pair = self_signed(named("rsa.example.com"), rsa_key());
    let unrelated = other_rsa_key().serialize_pem();

    assert!(!validate(pair.cert_pem.as_bytes(), unrelated.as_bytes()));
}

#[test]
fn test_key_of_other_algorithm_is_rejected() {
    let pair = self_signed(named("rsa.example.com"), rsa_key());
    let ec = ec_key().serialize_pem();

    assert!(!validate(pair.cert_pem.as_bytes(), ec.as_bytes()));
}

#[test]
fn test_non_pem_input_is_rejected() {
    let pair = bare_leaf("ec.example.com");

    assert!(!validate(b"not a certificate", pair.key_pem.as_bytes()));
    assert!(!validate(pair.cert_pem.as_bytes(), b"not a key"));
    assert!(!validate(b"", b""));
}

#[test]
fn test_swapped_inputs_are_rejected() {
    let pair = bare_leaf("ec.example.com");
    assert!(!validate(pair.key_pem.as_bytes(), pair.cert_pem.as_bytes()));
}

#[test]
fn test_truncated_key_is_rejected() {
    let pair = bare_leaf("ec.example.com");

    let lines: Vec<&str> = pair.key_pem.lines().collect();
    let mut truncated = lines[..lines.len() - 2].join("\n");
    truncated.push_str("\n-----END PRIVATE KEY-----\n");

    assert!(!validate(pair.cert_pem.as_bytes(), truncated.as_bytes()));
}

#[test]
fn test_corrupted_certificate_is_rejected() {
    let pair = bare_leaf("ec.example.com");
    let corrupted = pair.cert_pem.replacen("MII", "AAA", 1);

    assert!(!validate(corrupted.as_bytes(), pair.key_pem.as_bytes()));
}

const P521_CERT: &str = include_str!("fixtures/p521.crt");
const P521_KEY: &str = include_str!("fixtures/p521.key");
const RSA1024_CERT: &str = include_str!("fixtures/rsa1024.crt");
const RSA1024_KEY: &str = include_str!("fixtures/rsa1024.key");
const RSA4096_CERT: &str = include_str!("fixtures/rsa4096.crt");
const RSA4096_KEY: &str = include_str!("fixtures/rsa4096.key");

#[test]
fn test_matching_p521_pair_validates() {
    // SEC1 "EC PRIVATE KEY" framing.
    assert!(validate(P521_CERT.as_bytes(), P521_KEY.as_bytes()));
}

#[test]
fn test_matching_rsa1024_pair_validates() {
    assert!(validate(RSA1024_CERT.as_bytes(), RSA1024_KEY.as_bytes()));
}

#[test]
fn test_matching_rsa4096_pair_validates() {
    assert!(validate(RSA4096_CERT.as_bytes(), RSA4096_KEY.as_bytes()));
}

#[test]
fn test_p521_key_does_not_match_other_certificates() {
    assert!(!validate(RSA1024_CERT.as_bytes(), P521_KEY.as_bytes()));
    assert!(!validate(RSA4096_CERT.as_bytes(), RSA1024_KEY.as_bytes()));

    let pair = bare_leaf("ec.example.com");
    assert!(!validate(pair.cert_pem.as_bytes(), P521_KEY.as_bytes()));
}
