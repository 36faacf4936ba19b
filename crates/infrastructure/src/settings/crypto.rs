use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use meshsentry_domain::MeshError;
use ring::aead::{
    Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN,
};
use ring::rand::{SecureRandom, SystemRandom};

/// AES-256-GCM over a process secret supplied out-of-band (an env var or
/// config-provided key, never stored alongside the ciphertext). Each value
/// is encrypted with a fresh random nonce, which is prepended to the
/// ciphertext before base64 encoding.
pub struct SettingsCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl SettingsCipher {
    pub fn new(secret: &[u8; 32]) -> Result<Self, MeshError> {
        let unbound = UnboundKey::new(&AES_256_GCM, secret)
            .map_err(|_| MeshError::Validation("invalid AES-256-GCM key material".to_string()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, MeshError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| MeshError::Validation("failed to generate nonce".to_string()))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut buf = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut buf)
            .map_err(|_| MeshError::Validation("encryption failed".to_string()))?;

        let mut out = nonce_bytes.to_vec();
        out.extend_from_slice(&buf);
        Ok(BASE64.encode(out))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, MeshError> {
        let raw = BASE64
            .decode(encoded)
            .map_err(|e| MeshError::Validation(format!("invalid base64 ciphertext: {e}")))?;
        if raw.len() < NONCE_LEN {
            return Err(MeshError::Validation("ciphertext too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| MeshError::Validation("invalid nonce".to_string()))?;

        let mut buf = ciphertext.to_vec();
        let plain = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut buf)
            .map_err(|_| MeshError::Validation("decryption failed".to_string()))?;

        String::from_utf8(plain.to_vec())
            .map_err(|e| MeshError::Validation(format!("decrypted value is not utf-8: {e}")))
    }
}
