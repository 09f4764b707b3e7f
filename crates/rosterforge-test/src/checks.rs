//! Checks over hour patterns.
//!
//! # Example
//!
//! ```
//! use rosterforge_test::checks::{bits_of, is_single_block, run_lengths};
//!
//! let bits = bits_of(0b0110_1100, 8);
//! assert_eq!(run_lengths(&bits), vec![2, 2]);
//! assert!(!is_single_block(&bits));
//! ```

/// The low `n` bits of `mask`, least significant first.
pub fn bits_of(mask: u32, n: usize) -> Vec<bool> {
    (0..n).map(|i| (mask >> i) & 1 == 1).collect()
}

/// Lengths of the maximal runs of `true`, in order.
pub fn run_lengths(bits: &[bool]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut current = 0;
    for &bit in bits {
        if bit {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    runs
}

/// True when the set positions are empty or form one contiguous range.
pub fn is_single_block(bits: &[bool]) -> bool {
    run_lengths(bits).len() <= 1
}

/// Expands a list of worked hours into a pattern of length `n`.
pub fn hours_to_bits(hours: &[u32], n: usize) -> Vec<bool> {
    let mut bits = vec![false; n];
    for &h in hours {
        if let Some(bit) = bits.get_mut(h as usize) {
            *bit = true;
        }
    }
    bits
}
