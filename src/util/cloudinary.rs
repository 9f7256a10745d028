use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;

/// Parameters a browser needs for a signed direct upload
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignature {
    pub timestamp: i64,
    pub signature: String,
    pub cloud_name: String,
    pub api_key: String,
    pub folder: String,
    pub signature_algorithm: &'static str,
}

/// Signs `folder` and `timestamp` the way Cloudinary verifies them: parameters
/// sorted by name, joined as a query string, secret appended, SHA-256 hex.
pub fn sign_upload(config: &CloudinaryConfig, timestamp: i64) -> UploadSignature {
    let to_sign = format!("folder={}&timestamp={}{}", config.folder, timestamp, config.api_secret);
    UploadSignature {
        timestamp,
        signature: hex::encode(Sha256::digest(to_sign.as_bytes())),
        cloud_name: config.cloud_name.clone(),
        api_key: config.api_key.clone(),
        folder: config.folder.clone(),
        signature_algorithm: "sha256",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_matches_manual_digest() {
        let config = CloudinaryConfig::from_test_env();
        let signed = sign_upload(&config, 1_700_000_000);
        let expected = hex::encode(Sha256::digest(
            format!("folder={}&timestamp=1700000000{}", config.folder, config.api_secret).as_bytes(),
        ));
        assert_eq!(signed.signature, expected);
        assert_eq!(signed.signature.len(), 64);
        assert_eq!(signed.signature_algorithm, "sha256");
    }

    #[test]
    fn test_signature_changes_with_timestamp() {
        let config = CloudinaryConfig::from_test_env();
        assert_ne!(sign_upload(&config, 1).signature, sign_upload(&config, 2).signature);
    }

    #[test]
    fn test_serialized_field_names() {
        let config = CloudinaryConfig::from_test_env();
        let value = serde_json::to_value(sign_upload(&config, 5)).unwrap();
        assert_eq!(value["cloudName"], "demo");
        assert_eq!(value["apiKey"], "1234567890");
        assert_eq!(value["signatureAlgorithm"], "sha256");
    }
}
