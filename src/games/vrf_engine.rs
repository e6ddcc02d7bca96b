use crate::common::traits::{Draw, RandomnessSource};
use crate::errors::RandomnessError;
use parking_lot::Mutex;
use schnorrkel::context::SigningContext;
use schnorrkel::{Keypair, PublicKey, Signature};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

const VRF_SIGNING_CONTEXT: &[u8] = b"substrate";

/// Proofs kept in memory for [`VrfRandomness::proofs`]; older ones are only
/// available from the `vrf_proofs` tracing target
pub const DEFAULT_PROOF_RETENTION: usize = 1024;

/// Proof bundle for one draw, enough for anyone to re-derive the value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfProof {
    pub nonce: u64,
    pub upper: u64,
    pub value: u64,
    /// Hex-encoded VRF output (32 bytes)
    pub vrf_output: String,
    /// Hex-encoded VRF proof (64-byte schnorrkel signature)
    pub vrf_proof: String,
    /// Hex-encoded public key (32 bytes)
    pub public_key: String,
    pub input_message: String,
}

/// Verifiable randomness source.
///
/// Each draw signs `"<domain>:<nonce>"`; the SHA-256 of the signature is the
/// VRF output, reduced to `[0, upper)` by rejection sampling. The signed
/// message doubles as the proof reference carried on settlement events.
///
/// Every proof is written to the `vrf_proofs` tracing target as it is made.
/// Only the most recent `retention` proofs stay in memory.
pub struct VrfRandomness {
    keypair: Arc<Keypair>,
    domain: String,
    nonce: AtomicU64,
    proofs: Mutex<VecDeque<VrfProof>>,
    retention: usize,
}

impl VrfRandomness {
    pub fn new(keypair: Keypair, domain: impl Into<String>) -> Self {
        Self {
            keypair: Arc::new(keypair),
            domain: domain.into(),
            nonce: AtomicU64::new(0),
            proofs: Mutex::new(VecDeque::new()),
            retention: DEFAULT_PROOF_RETENTION,
        }
    }

    /// Keep at most `retention` proofs in memory (zero keeps none)
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    /// Create a VRF source with a random keypair (for testing)
    pub fn new_random(domain: impl Into<String>) -> Self {
        use rand_core::OsRng;
        let keypair = Keypair::generate_with(OsRng);
        Self::new(keypair, domain)
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.keypair.public.to_bytes())
    }

    /// Retained proofs, oldest first
    pub fn proofs(&self) -> Vec<VrfProof> {
        self.proofs.lock().iter().cloned().collect()
    }

    /// Hand the retained proofs to an auditor and forget them
    pub fn take_proofs(&self) -> Vec<VrfProof> {
        self.proofs.lock().drain(..).collect()
    }

    /// Look up a retained proof by the reference on a settlement event
    pub fn proof_for(&self, proof_ref: &str) -> Option<VrfProof> {
        self.proofs
            .lock()
            .iter()
            .find(|proof| proof.input_message == proof_ref)
            .cloned()
    }

    fn retain(&self, proof: VrfProof) {
        if self.retention == 0 {
            return;
        }
        let mut proofs = self.proofs.lock();
        while proofs.len() >= self.retention {
            proofs.pop_front();
        }
        proofs.push_back(proof);
    }

    fn vrf_sign(&self, message: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let ctx = SigningContext::new(VRF_SIGNING_CONTEXT);
        let signature = self.keypair.sign(ctx.bytes(message));

        let mut hasher = Sha256::new();
        hasher.update(signature.to_bytes());
        let vrf_output = hasher.finalize().to_vec();

        (vrf_output, signature.to_bytes().to_vec())
    }

    /// Verify a proof: signature, output derivation and reduction
    pub fn verify_proof(proof: &VrfProof) -> Result<bool, RandomnessError> {
        let vrf_output = hex::decode(&proof.vrf_output)
            .map_err(|e| RandomnessError::Vrf(format!("Invalid VRF output hex: {}", e)))?;
        let vrf_proof = hex::decode(&proof.vrf_proof)
            .map_err(|e| RandomnessError::Vrf(format!("Invalid VRF proof hex: {}", e)))?;
        let public_key_bytes = hex::decode(&proof.public_key)
            .map_err(|e| RandomnessError::Vrf(format!("Invalid public key hex: {}", e)))?;

        let public_key = PublicKey::from_bytes(&public_key_bytes)
            .map_err(|e| RandomnessError::Vrf(format!("Invalid public key: {:?}", e)))?;
        let signature = Signature::from_bytes(&vrf_proof)
            .map_err(|e| RandomnessError::Vrf(format!("Invalid signature: {:?}", e)))?;

        let ctx = SigningContext::new(VRF_SIGNING_CONTEXT);
        if public_key
            .verify(ctx.bytes(proof.input_message.as_bytes()), &signature)
            .is_err()
        {
            return Ok(false);
        }

        let mut hasher = Sha256::new();
        hasher.update(&vrf_proof);
        if hasher.finalize().as_slice() != vrf_output.as_slice() {
            return Ok(false);
        }

        Ok(reduce_unbiased(&vrf_output, proof.upper)? == proof.value)
    }
}

impl RandomnessSource for VrfRandomness {
    fn draw(&self, upper: u64) -> Result<u64, RandomnessError> {
        self.draw_attested(upper).map(|draw| draw.value)
    }

    fn draw_attested(&self, upper: u64) -> Result<Draw, RandomnessError> {
        if upper == 0 {
            return Err(RandomnessError::EmptyRange);
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let input_message = format!("{}:{}", self.domain, nonce);
        let (vrf_output, vrf_proof) = self.vrf_sign(input_message.as_bytes());
        let value = reduce_unbiased(&vrf_output, upper)?;

        let proof = VrfProof {
            nonce,
            upper,
            value,
            vrf_output: hex::encode(&vrf_output),
            vrf_proof: hex::encode(&vrf_proof),
            public_key: self.public_key_hex(),
            input_message: input_message.clone(),
        };
        debug!(
            target: "vrf_proofs",
            input = %proof.input_message,
            upper,
            value,
            vrf_output = %proof.vrf_output,
            vrf_proof = %proof.vrf_proof,
            public_key = %proof.public_key,
            "VRF proof"
        );
        self.retain(proof);

        Ok(Draw {
            value,
            proof_ref: Some(input_message),
        })
    }
}

/// Map a VRF output onto `[0, upper)` without modulo bias.
///
/// Candidates are `sha256(output || counter)` read as big-endian u64; any
/// candidate in the incomplete top bucket is rejected.
pub fn reduce_unbiased(vrf_output: &[u8], upper: u64) -> Result<u64, RandomnessError> {
    if upper == 0 {
        return Err(RandomnessError::EmptyRange);
    }
    let zone = (u64::MAX / upper) * upper;

    for counter in 0u32..256 {
        let mut hasher = Sha256::new();
        hasher.update(vrf_output);
        hasher.update(counter.to_be_bytes());
        let digest = hasher.finalize();

        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        let candidate = u64::from_be_bytes(word);
        if candidate < zone {
            return Ok(candidate % upper);
        }
    }
    Err(RandomnessError::Exhausted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vrf_draw_and_verification() {
        let vrf = VrfRandomness::new_random("coin_flip");

        let value = vrf.draw(2).expect("VRF draw failed");
        assert!(value < 2);

        let proofs = vrf.proofs();
        assert_eq!(proofs.len(), 1);
        assert_eq!(proofs[0].value, value);
        assert_eq!(proofs[0].input_message, "coin_flip:0");
        assert!(VrfRandomness::verify_proof(&proofs[0]).expect("Verification failed"));
    }

    #[test]
    fn test_vrf_tamper_detection() {
        let vrf = VrfRandomness::new_random("roulette");
        let value = vrf.draw(37).unwrap();

        let mut proof = vrf.proofs().remove(0);
        proof.value = (value + 1) % 37;
        assert!(!VrfRandomness::verify_proof(&proof).unwrap());

        let mut proof = vrf.proofs().remove(0);
        proof.vrf_output = hex::encode(vec![0xff; 32]);
        assert!(!VrfRandomness::verify_proof(&proof).unwrap());

        let mut proof = vrf.proofs().remove(0);
        proof.input_message = "roulette:99".to_string();
        assert!(!VrfRandomness::verify_proof(&proof).unwrap());
    }

    #[test]
    fn test_nonces_advance() {
        let vrf = VrfRandomness::new_random("d");
        for _ in 0..5 {
            vrf.draw(37).unwrap();
        }
        let nonces: Vec<u64> = vrf.take_proofs().iter().map(|p| p.nonce).collect();
        assert_eq!(nonces, vec![0, 1, 2, 3, 4]);
        assert!(vrf.proofs().is_empty());
    }

    #[test]
    fn test_reduce_is_in_range() {
        for upper in [1u64, 2, 3, 37, 1_000, u64::MAX] {
            let value = reduce_unbiased(&[7u8; 32], upper).unwrap();
            assert!(value < upper);
        }
        assert_eq!(reduce_unbiased(&[0u8; 32], 0), Err(RandomnessError::EmptyRange));
    }

    #[test]
    fn test_retention_is_bounded() {
        let vrf = VrfRandomness::new_random("bounded").with_retention(16);
        for _ in 0..1_000 {
            vrf.draw(2).unwrap();
        }

        let proofs = vrf.proofs();
        assert_eq!(proofs.len(), 16);
        assert_eq!(proofs[0].nonce, 984);
        assert_eq!(proofs[15].nonce, 999);
    }

    #[test]
    fn test_attested_draw_references_its_proof() {
        let vrf = VrfRandomness::new_random("coin_flip");
        let draw = vrf.draw_attested(2).unwrap();

        let proof_ref = draw.proof_ref.expect("VRF draws carry a proof reference");
        let proof = vrf.proof_for(&proof_ref).expect("proof retained");
        assert_eq!(proof.value, draw.value);
        assert!(VrfRandomness::verify_proof(&proof).unwrap());
        assert!(vrf.proof_for("coin_flip:42").is_none());
    }

    #[test]
    fn test_zero_retention_keeps_nothing() {
        let vrf = VrfRandomness::new_random("none").with_retention(0);
        vrf.draw(37).unwrap();
        assert!(vrf.proofs().is_empty());
    }
}
