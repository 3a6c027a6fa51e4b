//! OpenSSH public key values and their one-line text form

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine,
};
use sha2::{Digest, Sha256};
use std::fmt::Debug;
use std::str::FromStr;

use super::KeyParseError;

const SUPPORTED_ALGORITHMS: &[&str] = &[
    "ssh-rsa",
    "ssh-dss",
    "ssh-ed25519",
    "ecdsa-sha2-nistp256",
    "ecdsa-sha2-nistp384",
    "ecdsa-sha2-nistp521",
    "sk-ssh-ed25519@openssh.com",
    "sk-ecdsa-sha2-nistp256@openssh.com",
];

/// A public key as it appears in an `authorized_keys` file.
///
/// Equality is structural over algorithm, key material and comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    algorithm: String,
    material: Vec<u8>,
    comment: Option<String>,
}

impl PublicKey {
    /// Build a key from already decoded parts without validating them
    pub fn new(algorithm: impl Into<String>, material: Vec<u8>, comment: Option<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            material,
            comment: comment.filter(|c| !c.is_empty()),
        }
    }

    /// Parse one `algorithm base64 [comment]` line
    pub fn from_openssh(line: &str) -> Result<Self, KeyParseError> {
        let (algorithm, rest) = split_token(line);
        if algorithm.is_empty() {
            return Err(KeyParseError::Empty);
        }
        if !SUPPORTED_ALGORITHMS.contains(&algorithm) {
            return Err(KeyParseError::UnsupportedAlgorithm(algorithm.to_string()));
        }

        let (encoded, comment) = split_token(rest);
        if encoded.is_empty() {
            return Err(KeyParseError::MissingMaterial(algorithm.to_string()));
        }

        let material = STANDARD
            .decode(encoded)
            .map_err(|e| KeyParseError::InvalidBase64(e.to_string()))?;

        let embedded = embedded_algorithm(&material)?;
        if embedded != algorithm {
            return Err(KeyParseError::AlgorithmMismatch {
                declared: algorithm.to_string(),
                embedded: embedded.to_string(),
            });
        }

        Ok(Self::new(
            algorithm,
            material,
            Some(comment.trim_end().to_string()),
        ))
    }

    /// Format as a single line, without a trailing newline
    pub fn to_openssh(&self) -> String {
        let mut line = format!("{} {}", self.algorithm, STANDARD.encode(&self.material));
        if let Some(comment) = &self.comment {
            line.push(' ');
            line.push_str(comment);
        }
        line
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Raw key blob in SSH wire format
    pub fn material(&self) -> &[u8] {
        &self.material
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// `SHA256:` fingerprint as printed by `ssh-keygen -l`
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.material);
        format!("SHA256:{}", STANDARD_NO_PAD.encode(digest))
    }
}

impl FromStr for PublicKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_openssh(s)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_openssh())
    }
}

fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], s[end..].trim_start()),
        None => (s, ""),
    }
}

/// Algorithm name stored in the first length-prefixed field of a key blob
fn embedded_algorithm(blob: &[u8]) -> Result<&str, KeyParseError> {
    let header: [u8; 4] = blob
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| KeyParseError::MalformedBlob("blob shorter than its length prefix".into()))?;
    let len = u32::from_be_bytes(header) as usize;

    let name = blob
        .get(4..4 + len)
        .ok_or_else(|| KeyParseError::MalformedBlob("truncated algorithm name".into()))?;

    std::str::from_utf8(name)
        .map_err(|_| KeyParseError::MalformedBlob("algorithm name is not UTF-8".into()))
}

/// Converts between key values and `authorized_keys` lines
pub trait KeyCodec: Send + Sync + Debug {
    fn parse(&self, line: &str) -> Result<PublicKey, KeyParseError>;

    fn format(&self, key: &PublicKey) -> String;
}

/// Codec for the OpenSSH one-line public key format
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSshCodec;

impl KeyCodec for OpenSshCodec {
    fn parse(&self, line: &str) -> Result<PublicKey, KeyParseError> {
        PublicKey::from_openssh(line)
    }

    fn format(&self, key: &PublicKey) -> String {
        key.to_openssh()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::ed25519_key;
    use super::*;

    const ED25519_LINE: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl alice@laptop";

    #[test]
    fn test_parse_real_key() {
        let key: PublicKey = ED25519_LINE.parse().unwrap();

        assert_eq!(key.algorithm(), "ssh-ed25519");
        assert_eq!(key.comment(), Some("alice@laptop"));
        assert_eq!(key.material().len(), 4 + 11 + 4 + 32);
        assert_eq!(key.to_openssh(), ED25519_LINE);
    }

    #[test]
    fn test_comment_with_spaces_is_preserved() {
        let line = ed25519_key(9, Some("deploy key for ci")).to_openssh();
        let key = PublicKey::from_openssh(&format!("  {}  ", line)).unwrap();

        assert_eq!(key.comment(), Some("deploy key for ci"));
    }

    #[test]
    fn test_key_without_comment() {
        let key = ed25519_key(3, None);
        let parsed = PublicKey::from_openssh(&key.to_openssh()).unwrap();

        assert_eq!(parsed, key);
        assert_eq!(parsed.comment(), None);
    }

    #[test]
    fn test_equality_includes_comment() {
        assert_ne!(ed25519_key(1, Some("a")), ed25519_key(1, Some("b")));
        assert_ne!(ed25519_key(1, Some("a")), ed25519_key(2, Some("a")));
        assert_eq!(ed25519_key(1, Some("a")), ed25519_key(1, Some("a")));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PublicKey::from_openssh("   "), Err(KeyParseError::Empty));
        assert!(matches!(
            PublicKey::from_openssh("ssh-foo AAAA"),
            Err(KeyParseError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            PublicKey::from_openssh("ssh-rsa"),
            Err(KeyParseError::MissingMaterial(_))
        ));
        assert!(matches!(
            PublicKey::from_openssh("ssh-rsa !!!notbase64"),
            Err(KeyParseError::InvalidBase64(_))
        ));
        assert!(matches!(
            PublicKey::from_openssh("ssh-rsa AAA="),
            Err(KeyParseError::MalformedBlob(_))
        ));
    }

    #[test]
    fn test_algorithm_mismatch() {
        let ed25519_material = ED25519_LINE.split(' ').nth(1).unwrap();
        let result = PublicKey::from_openssh(&format!("ssh-rsa {}", ed25519_material));

        assert_eq!(
            result,
            Err(KeyParseError::AlgorithmMismatch {
                declared: "ssh-rsa".to_string(),
                embedded: "ssh-ed25519".to_string(),
            })
        );
    }

    #[test]
    fn test_fingerprint_format() {
        let key = ed25519_key(7, None);
        let fingerprint = key.fingerprint();

        assert!(fingerprint.starts_with("SHA256:"));
        assert_eq!(fingerprint.len(), "SHA256:".len() + 43);
        assert!(!fingerprint.ends_with('='));
    }

    #[test]
    fn test_codec_delegates_to_key() {
        let codec = OpenSshCodec;
        let key = ed25519_key(4, Some("bob"));

        let line = codec.format(&key);
        assert_eq!(codec.parse(&line).unwrap(), key);
    }
}
