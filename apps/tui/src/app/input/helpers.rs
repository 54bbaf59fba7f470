pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Moves `index` by `delta` rows, clamped to `0..len`.
pub fn step_clamped(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_handles_empty_and_edges() {
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_increment(0, 0), 0);
    }

    #[test]
    fn clamped_steps_stay_in_range() {
        assert_eq!(step_clamped(0, -5, 10), 0);
        assert_eq!(step_clamped(8, 5, 10), 9);
        assert_eq!(step_clamped(3, 1, 0), 0);
    }
}
