use std::time::Duration;

/// How much longer to hold the dispatch so the peer radio gets its full
/// enable budget, counted from the start of the handover.
///
/// `None` means dispatch now: either the peer is not activating its radio on
/// its own, or the budget is already spent.
pub fn remote_readiness_delay(
    remote_activating: bool,
    elapsed: Duration,
    budget: Duration,
) -> Option<Duration> {
    if !remote_activating {
        return None;
    }

    budget
        .checked_sub(elapsed)
        .filter(|remaining| !remaining.is_zero())
}
