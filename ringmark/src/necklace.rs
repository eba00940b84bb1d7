//! Cyclic bit rotation and canonical (minimum-rotation) forms.
//!
//! A ring code of `bits` bits is read around the marker, so every cyclic
//! rotation of it describes the same physical marker seen at a different
//! orientation. The canonical form picks the numerically smallest rotation
//! as the representative of that class.

use smallvec::SmallVec;

/// All rotations of a code. 16 is the widest supported ring.
pub type Rotations = SmallVec<[u32; 16]>;

fn mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Rotate `code` left by `n` positions within a `bits`-wide word.
pub fn rotate_left(code: u32, bits: u32, n: u32) -> u32 {
    let n = n % bits;
    let code = code & mask(bits);
    if n == 0 {
        return code;
    }
    ((code << n) | (code >> (bits - n))) & mask(bits)
}

/// Every rotation of `code`, starting with the code itself (r = 0).
pub fn rotations(code: u32, bits: u32) -> Rotations {
    (0..bits).map(|r| rotate_left(code, bits, r)).collect()
}

/// The smallest integer among all rotations of `code`.
pub fn canonical(code: u32, bits: u32) -> u32 {
    let code = code & mask(bits);
    let mut best = code;
    for r in 1..bits {
        let v = rotate_left(code, bits, r);
        if v < best {
            best = v;
        }
    }
    best
}

/// Whether `code` is already its own canonical representative.
pub fn is_canonical(code: u32, bits: u32) -> bool {
    code == canonical(code, bits)
}

/// All-zero and all-one rings carry no detectable structure.
pub fn is_degenerate(code: u32, bits: u32) -> bool {
    code == 0 || code == mask(bits)
}
