//! Random display names for anonymous subscribers.

use rand::Rng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of generated display names.
pub const DISPLAY_NAME_LEN: usize = 4;

/// Generate a display name of [`DISPLAY_NAME_LEN`] ASCII letters.
pub fn random_display_name() -> String {
    let mut rng = rand::thread_rng();
    (0..DISPLAY_NAME_LEN)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}
