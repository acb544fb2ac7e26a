use crate::state_set::WORD_BITS;

/// Number of states every capacity is a multiple of.
///
/// Matches the width of a 256-bit register so word loops over a row never need a
/// tail case.
pub const STATE_BLOCK: usize = 256;

pub trait FromU32 {
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        src as Self
    }
}

/// Rounds `states` up to the next multiple of [`STATE_BLOCK`], with one block at least.
#[inline(always)]
pub const fn aligned_capacity(states: usize) -> usize {
    let blocks = states.div_ceil(STATE_BLOCK);
    if blocks == 0 {
        STATE_BLOCK
    } else {
        blocks * STATE_BLOCK
    }
}

/// Capacity reached by doubling from [`STATE_BLOCK`] until `states` slots fit.
#[inline(always)]
pub const fn grown_capacity(states: usize) -> usize {
    let capacity = states.next_power_of_two();
    if capacity < STATE_BLOCK {
        STATE_BLOCK
    } else {
        capacity
    }
}

/// Number of 64-bit words backing a set of `capacity` states.
#[inline(always)]
pub const fn words_for(capacity: usize) -> usize {
    capacity.div_ceil(WORD_BITS)
}
