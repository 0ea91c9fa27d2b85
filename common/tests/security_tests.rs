use common::encryption::aes_cbc::encrypt_cbc;
use common::encryption::{self, Envelope, SessionEnvelope};
use common::{CryptoError, Scheme};

fn sealed_session(message: &str) -> SessionEnvelope {
    let keys = encryption::generate_keys(Scheme::AeadSessionStub).unwrap();
    match encryption::encrypt(Scheme::AeadSessionStub, message, &keys.public_text().unwrap())
        .unwrap()
    {
        Envelope::Session(env) => env,
        other => panic!("expected session envelope, got {}", other.scheme()),
    }
}

fn open_session(env: SessionEnvelope) -> Result<String, CryptoError> {
    // Through the transport string, the same way a caller would.
    let text = Envelope::Session(env).to_transport().unwrap();
    encryption::decrypt_text(Scheme::AeadSessionStub, &text, "", false)
}

#[test]
fn test_aead_detects_ciphertext_flips() {
    let original = sealed_session("integrity matters");
    for i in 0..original.ciphertext.len() {
        let mut env = original.clone();
        env.ciphertext[i] ^= 0x01;
        let err = open_session(env).unwrap_err();
        assert!(matches!(err, CryptoError::Authentication(_)), "byte {i}: {err}");
    }
}

#[test]
fn test_aead_detects_tag_flips() {
    let original = sealed_session("integrity matters");
    for i in 0..original.auth_tag.len() {
        let mut env = original.clone();
        env.auth_tag[i] ^= 0x80;
        let err = open_session(env).unwrap_err();
        assert!(matches!(err, CryptoError::Authentication(_)), "byte {i}: {err}");
    }
}

#[test]
fn test_aead_detects_nonce_change() {
    let mut env = sealed_session("integrity matters");
    env.nonce[0] ^= 0x01;
    assert!(matches!(open_session(env), Err(CryptoError::Authentication(_))));
}

#[test]
fn test_cbc_corruption_is_not_authenticated() {
    // Flipping a bit in the first CBC block garbles that block and flips the same bit in
    // the next one; without a MAC nothing notices as long as the padding survives.
    let keys = encryption::generate_keys(Scheme::Aes256Cbc).unwrap();
    let message = "0123456789abcdef0123456789abcdef";
    let mut env = match encryption::encrypt(Scheme::Aes256Cbc, message, &keys.public_text().unwrap())
        .unwrap()
    {
        Envelope::Aes(env) => env,
        other => panic!("expected AES envelope, got {}", other.scheme()),
    };
    env.ciphertext[0] ^= 0x01;

    match encryption::decrypt(Scheme::Aes256Cbc, &Envelope::Aes(env), "", false) {
        Ok(plaintext) => assert_ne!(plaintext, message),
        Err(err) => assert!(matches!(err, CryptoError::Decryption(_))),
    }
}

#[test]
fn test_envelope_discloses_key_for_stub_schemes() {
    // Anyone holding the envelope string can read the message; no private key involved.
    for scheme in [Scheme::Aes256Cbc, Scheme::ArmoredStub, Scheme::AeadSessionStub] {
        assert!(!scheme.is_confidential());
        let keys = encryption::generate_keys(scheme).unwrap();
        let text = encryption::encrypt(scheme, "secret", &keys.public_text().unwrap())
            .unwrap()
            .to_transport()
            .unwrap();
        assert_eq!(encryption::decrypt_text(scheme, &text, "", false).unwrap(), "secret");
    }
}

#[test]
fn test_rsa_needs_private_key() {
    let keys = encryption::generate_keys(Scheme::Rsa2048Oaep).unwrap();
    let text = encryption::encrypt(Scheme::Rsa2048Oaep, "secret", &keys.public_text().unwrap())
        .unwrap()
        .to_transport()
        .unwrap();

    let err = encryption::decrypt_text(Scheme::Rsa2048Oaep, &text, "", false).unwrap_err();
    assert!(matches!(err, CryptoError::Parse(_)));

    let err = encryption::decrypt_text(
        Scheme::Rsa2048Oaep,
        &text,
        &keys.public_text().unwrap(),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, CryptoError::Parse(_)));
}

#[test]
fn test_rsa_ciphertext_is_randomized() {
    let keys = encryption::generate_keys(Scheme::Rsa2048Oaep).unwrap();
    let public = keys.public_text().unwrap();
    let a = encryption::encrypt(Scheme::Rsa2048Oaep, "same", &public).unwrap();
    let b = encryption::encrypt(Scheme::Rsa2048Oaep, "same", &public).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_cbc_key_sensitivity() {
    let iv = [0u8; 16];
    let key = [0x42u8; 32];
    let mut other = key;
    other[0] ^= 1;

    let data = b"Hello, World!123";
    let a = encrypt_cbc(&key, &iv, data).unwrap();
    let b = encrypt_cbc(&other, &iv, data).unwrap();

    let diff_bits: u32 = a.iter().zip(&b).map(|(x, y)| (x ^ y).count_ones()).sum();
    let percentage = diff_bits as f64 / (a.len() * 8) as f64 * 100.0;
    assert!(
        percentage > 35.0 && percentage < 65.0,
        "poor key sensitivity: {percentage:.2}% bits changed"
    );
}
