use std::mem;

/// Reads `CLOCK_MONOTONIC` in microseconds.
///
/// clock_gettime(2) is async-signal-safe, so this can be called while filling
/// a sample from a signal handler.
pub fn monotonic_micros() -> u64 {
    let mut ts: libc::timespec = unsafe { mem::zeroed() };
    let err = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
    if err != 0 {
        return 0;
    }
    (ts.tv_sec as u64)
        .saturating_mul(1_000_000)
        .saturating_add(ts.tv_nsec as u64 / 1_000)
}
