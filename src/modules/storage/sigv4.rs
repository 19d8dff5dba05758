//! Minimal AWS Signature v4 signer.
//!
//! `rust-s3` has no bucket-policy call, so the policy PUT is signed by hand.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::core::error::AppError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

pub struct SigV4Signer {
    access_key: String,
    secret_key: String,
    region: String,
    service: &'static str,
}

/// Headers to attach to a signed request
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub payload_hash: String,
    pub authorization: String,
}

impl SigV4Signer {
    pub fn s3(access_key: &str, secret_key: &str, region: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            region: region.to_string(),
            service: "s3",
        }
    }

    /// Sign a request whose only signed headers are host and the two `x-amz-*` ones
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        canonical_uri: &str,
        canonical_query: &str,
        payload: &[u8],
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders, AppError> {
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = hex::encode(Sha256::digest(payload));

        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host, payload_hash, amz_date
        );
        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method, canonical_uri, canonical_query, canonical_headers, SIGNED_HEADERS, payload_hash
        );

        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(&date_stamp)?,
            string_to_sign.as_bytes(),
        )?);

        Ok(SignedHeaders {
            authorization: format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.access_key, credential_scope, SIGNED_HEADERS, signature
            ),
            amz_date,
            payload_hash,
        })
    }

    fn signing_key(&self, date_stamp: &str) -> Result<Vec<u8>, AppError> {
        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_signing_key_matches_aws_reference() {
        // Reference vector from the AWS SigV4 documentation
        let signer = SigV4Signer {
            access_key: "AKIDEXAMPLE".to_string(),
            secret_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            region: "us-east-1".to_string(),
            service: "iam",
        };
        let key = signer.signing_key("20150830").unwrap();
        assert_eq!(
            hex::encode(key),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
    }

    #[test]
    fn test_sign_produces_consistent_headers() {
        let signer = SigV4Signer::s3("minio", "minio-secret", "us-east-1");
        let first = signer
            .sign("PUT", "localhost:9000", "/firesafe", "policy=", b"{}", fixed_now())
            .unwrap();
        let second = signer
            .sign("PUT", "localhost:9000", "/firesafe", "policy=", b"{}", fixed_now())
            .unwrap();

        assert_eq!(first.amz_date, "20240517T083000Z");
        assert_eq!(first.authorization, second.authorization);
        assert!(first
            .authorization
            .starts_with("AWS4-HMAC-SHA256 Credential=minio/20240517/us-east-1/s3/aws4_request"));
        assert_eq!(
            first.payload_hash,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_payload_changes_signature() {
        let signer = SigV4Signer::s3("minio", "minio-secret", "us-east-1");
        let a = signer
            .sign("PUT", "h", "/b", "policy=", b"a", fixed_now())
            .unwrap();
        let b = signer
            .sign("PUT", "h", "/b", "policy=", b"b", fixed_now())
            .unwrap();
        assert_ne!(a.authorization, b.authorization);
    }
}
