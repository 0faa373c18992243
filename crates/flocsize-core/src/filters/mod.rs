pub mod clahe;
pub mod nl_means;

pub use clahe::{clahe, ClaheParams};
pub use nl_means::{nl_means_denoise, NlMeansParams};

/// Mirror an out-of-range index back into `0..n` without repeating the edge
/// sample (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect_101(i: isize, n: usize) -> usize {
    let n = n as isize;
    if n <= 1 {
        return 0;
    }
    let mut i = i;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * (n - 1) - i;
        } else {
            return i as usize;
        }
    }
}
