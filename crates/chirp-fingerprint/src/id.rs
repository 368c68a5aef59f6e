use rand::Rng;

/// Exclusive upper bound of the random draw behind a message ID.
pub const MESSAGE_ID_SPACE: u32 = 1_000_000_000;

/// Width of a rendered message ID.
pub const MESSAGE_ID_WIDTH: usize = 10;

/// Draw a message ID: a uniform integer in `[0, 1_000_000_000)` rendered as
/// ten zero-padded decimal digits.
///
/// IDs are NOT checked for uniqueness. With a billion possible values,
/// collisions are unlikely for a personal message log but not impossible,
/// and callers must not treat the ID as a key.
pub fn generate_message_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let n = rng.random_range(0..MESSAGE_ID_SPACE);
    format!("{:0width$}", n, width = MESSAGE_ID_WIDTH)
}
