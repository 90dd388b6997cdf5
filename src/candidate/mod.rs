//! Candidate positions and the cross-label acceptance set.

pub(crate) mod accept;
pub(crate) mod peak;
