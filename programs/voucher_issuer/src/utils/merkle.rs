use anchor_lang::solana_program::hash::hashv;

/// Hashes a raw voucher code into its merkle leaf
pub fn hash_code(code: &str) -> [u8; 32] {
    hashv(&[code.as_bytes()]).to_bytes()
}

/// Hashes two nodes in sorted order, smaller byte string first
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    if a <= b {
        hashv(&[a, b]).to_bytes()
    } else {
        hashv(&[b, a]).to_bytes()
    }
}

/// Verifies that `leaf` is committed under `root`
///
/// Folds the proof over the leaf with sorted-pair hashing and compares the
/// result with the root. A zero root is never accepted: an unset commitment
/// must not match anything, including a zero leaf with an empty proof.
pub fn verify(proof: &[[u8; 32]], root: [u8; 32], leaf: [u8; 32]) -> bool {
    if root == [0; 32] {
        return false;
    }

    let computed_hash = proof
        .iter()
        .fold(leaf, |running, sibling| hash_pair(&running, sibling));

    computed_hash == root
}
