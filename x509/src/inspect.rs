//! Certificate metadata extraction.

use certvault_common::views::{
    CertificateMetadata, IssuerName, KeyUsageFlags, PublicKeyAlgorithm, SubjectName,
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, instrument, warn};
use x509_parser::{
    prelude::*,
    public_key::PublicKey,
    time::ASN1Time,
    x509::{AttributeTypeAndValue, SubjectPublicKeyInfo},
};

use crate::{DecodeError, pem};

/// Title used for certificates whose subject carries no Common Name.
pub const UNKNOWN_COMMON_NAME: &str = "Unknown";

/// The certificate's "not valid after" date, in UTC.
///
/// Returns `None` when the certificate cannot be decoded; callers treat that
/// as "unknown", not as a failed upload.
#[instrument(skip_all)]
pub fn expiration_of(cert_pem: &[u8]) -> Option<NaiveDate> {
    let result = pem::read_certificate(cert_pem).and_then(|der| {
        let cert = parse(&der)?;
        to_utc(cert.validity().not_after)
    });

    match result {
        Ok(not_after) => Some(not_after.date_naive()),
        Err(e) => {
            warn!("Error extracting expiration date: {}", e);
            None
        }
    }
}

/// The subject Common Name, or [`UNKNOWN_COMMON_NAME`] if there is none or
/// the certificate cannot be decoded.
#[instrument(skip_all)]
pub fn common_name_of(cert_pem: &[u8]) -> String {
    let result = pem::read_certificate(cert_pem).and_then(|der| {
        let cert = parse(&der)?;
        Ok(first_value(cert.subject().iter_common_name()))
    });

    match result {
        Ok(Some(cn)) => cn,
        Ok(None) => UNKNOWN_COMMON_NAME.to_string(),
        Err(e) => {
            warn!("Error extracting common name: {}", e);
            UNKNOWN_COMMON_NAME.to_string()
        }
    }
}

/// Decode a PEM certificate into a [`CertificateMetadata`] record.
///
/// Missing attributes and extensions become `None` on the corresponding
/// field. Anything that stops the certificate from being read in full,
/// including a malformed or duplicated extension, is returned as an error
/// rather than a partially filled record.
#[instrument(skip_all)]
pub fn inspect(cert_pem: &[u8]) -> Result<CertificateMetadata, DecodeError> {
    let der = pem::read_certificate(cert_pem)?;
    let cert = parse(&der)?;

    let issuer = cert.issuer();
    let subject = cert.subject();
    let (public_key_algorithm, public_key_bits) = classify_public_key(cert.public_key());

    let subject_alternative_names = cert
        .subject_alternative_name()
        .map_err(extension_error)?
        .map(|san| {
            san.value
                .general_names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DNSName(dns) => Some(dns.to_string()),
                    _ => None,
                })
                .collect()
        });

    let is_certificate_authority = cert
        .basic_constraints()
        .map_err(extension_error)?
        .map(|bc| bc.value.ca);

    let key_usage = cert
        .key_usage()
        .map_err(extension_error)?
        .map(|ku| KeyUsageFlags {
            digital_signature: ku.value.digital_signature(),
            key_encipherment: ku.value.key_encipherment(),
            key_cert_sign: ku.value.key_cert_sign(),
            crl_sign: ku.value.crl_sign(),
        });

    Ok(CertificateMetadata {
        version: format!("v{}", cert.version().0 + 1),
        issuer: IssuerName {
            common_name: first_value(issuer.iter_common_name()),
            organization: first_value(issuer.iter_organization()),
            organizational_unit: first_value(issuer.iter_organizational_unit()),
            country: first_value(issuer.iter_country()),
        },
        subject: SubjectName {
            common_name: first_value(subject.iter_common_name()),
            organization: first_value(subject.iter_organization()),
            organizational_unit: first_value(subject.iter_organizational_unit()),
            locality: first_value(subject.iter_locality()),
            state_or_province: first_value(subject.iter_state_or_province()),
            country: first_value(subject.iter_country()),
        },
        valid_from: to_utc(cert.validity().not_before)?,
        valid_to: to_utc(cert.validity().not_after)?,
        public_key_algorithm,
        public_key_bits,
        subject_alternative_names,
        is_certificate_authority,
        key_usage,
    })
}

fn parse(der: &[u8]) -> Result<X509Certificate<'_>, DecodeError> {
    let (_, cert) =
        X509Certificate::from_der(der).map_err(|e| DecodeError::Certificate(e.to_string()))?;
    Ok(cert)
}

fn extension_error(e: X509Error) -> DecodeError {
    DecodeError::Extension(e.to_string())
}

fn to_utc(time: ASN1Time) -> Result<DateTime<Utc>, DecodeError> {
    let timestamp = time.timestamp();
    DateTime::from_timestamp(timestamp, 0).ok_or(DecodeError::Timestamp(timestamp))
}

/// First occurrence of a name attribute. Values in a string type that cannot
/// be decoded are treated as missing.
fn first_value<'a, 'b: 'a>(
    mut attrs: impl Iterator<Item = &'a AttributeTypeAndValue<'b>>,
) -> Option<String> {
    let attr = attrs.next()?;
    let value = attr.as_str().map(str::to_string).ok().or_else(|| {
        let any = attr.attr_value();
        decode_wide_string(any.header.tag().0, any.data)
    });

    if value.is_none() {
        debug!(oid = %attr.attr_type(), "Dropping undecodable name attribute");
    }
    value
}

const TELETEX_STRING: u32 = 20;
const UNIVERSAL_STRING: u32 = 28;
const BMP_STRING: u32 = 30;

/// Legacy string types: BMPString (UCS-2), UniversalString (UCS-4) and
/// TeletexString, read as Latin-1.
fn decode_wide_string(tag: u32, data: &[u8]) -> Option<String> {
    match tag {
        BMP_STRING if data.len() % 2 == 0 => {
            let units = data
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]));
            char::decode_utf16(units).collect::<Result<String, _>>().ok()
        }
        UNIVERSAL_STRING if data.len() % 4 == 0 => data
            .chunks_exact(4)
            .map(|c| char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
            .collect(),
        TELETEX_STRING => Some(data.iter().map(|&b| char::from(b)).collect()),
        _ => None,
    }
}

fn classify_public_key(spki: &SubjectPublicKeyInfo) -> (PublicKeyAlgorithm, Option<u32>) {
    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => (
            PublicKeyAlgorithm::Rsa,
            u32::try_from(rsa.key_size()).ok(),
        ),
        Ok(PublicKey::EC(point)) => {
            let bits = named_curve_bits(spki)
                .or_else(|| u32::try_from(point.key_size()).ok().filter(|bits| *bits > 0));
            (PublicKeyAlgorithm::EllipticCurve, bits)
        }
        _ => (PublicKeyAlgorithm::Unknown, None),
    }
}

/// Field size of the named curve in the algorithm parameters. The encoded
/// point length alone gets P-521 wrong, so known curves are looked up first.
fn named_curve_bits(spki: &SubjectPublicKeyInfo) -> Option<u32> {
    let curve = spki.algorithm.parameters.as_ref()?.as_oid().ok()?;

    match curve.to_id_string().as_str() {
        "1.2.840.10045.3.1.1" => Some(192),
        "1.3.132.0.33" => Some(224),
        "1.2.840.10045.3.1.7" | "1.3.132.0.10" => Some(256),
        "1.3.132.0.34" => Some(384),
        "1.3.132.0.35" => Some(521),
        _ => None,
    }
}
