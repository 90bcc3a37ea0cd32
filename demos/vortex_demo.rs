use vortex::{decrypt, encode_envelope, encrypt_with_rng, entropy, prng, seed};
use vortex::{OsRandom, SeedRng, VortexError, KEY_SIZE, NONCE_SIZE, TAG_SIZE};

fn main() -> Result<(), VortexError> {
    let data: &[u8] = &[2, 3, 5, 7, 11, 13, 17, 19];
    println!("data (plaintext): {:?}", data);

    let mut rng = OsRandom; // to use getrandom
    //let mut rng = prng::new_fixed_vortex_rng("demo"); // to use fixed rng
    let mut key = [0u8; KEY_SIZE];
    rng.fill(&mut key)?;
    println!("key (part): {:?}", &key[..8]);

    let envelope = encrypt_with_rng(data, &key, &mut rng)?;
    println!("nonce: {:?}", &envelope[..NONCE_SIZE]);
    println!("data (ciphertext): {:?}", &envelope[NONCE_SIZE..envelope.len() - TAG_SIZE]);
    println!("tag: {:?}", &envelope[envelope.len() - TAG_SIZE..]);
    println!("envelope (base64): {}", encode_envelope(&envelope));

    let decrypted = decrypt(&envelope, &key)?;
    assert_eq!(decrypted, data);
    println!("data (decrypted): {:?}", decrypted);

    let mut forged = envelope.clone();
    forged[NONCE_SIZE] ^= 1;
    match decrypt(&forged, &key) {
        Err(VortexError::VerificationFailed) => println!("forged envelope rejected"),
        other => println!("unexpected: {:?}", other),
    }

    let stream = prng(&seed("demo"), 32);
    println!("prng(seed(\"demo\"), 32): {:?}", stream);
    println!("entropy: {:.3} bits/byte", entropy(&prng(&seed("demo"), 4096)));
    Ok(())
}
