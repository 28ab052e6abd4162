use time::OffsetDateTime;

// 2^64 / golden ratio, spreads consecutive indices over the whole word
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Base seed taken from the wall clock.
pub fn clock_seed() -> u64 {
    // low 64 bits of the nanosecond timestamp are the ones that change
    OffsetDateTime::now_utc().unix_timestamp_nanos() as u64
}

/// Seed for thread `tid`: the base seed XOR a spread copy of the index.
pub fn thread_seed(base: u64, tid: usize) -> u64 {
    base ^ (tid as u64).wrapping_mul(SEED_SPREAD)
}

/// Logical CPUs visible to this process.
pub fn available_cores() -> usize {
    num_cpus::get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_thread_seeds_distinct() {
        let base = 0xDEAD_BEEF;
        let seeds: HashSet<u64> = (0..1000).map(|tid| thread_seed(base, tid)).collect();
        assert_eq!(seeds.len(), 1000);
        assert_eq!(thread_seed(base, 0), base);
    }

    #[test]
    fn test_available_cores_nonzero() {
        assert!(available_cores() >= 1);
    }
}
