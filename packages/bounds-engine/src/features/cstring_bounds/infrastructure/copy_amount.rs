//! How many bytes a bounded copy or concatenation moves
//!
//! The amount is only decided when exactly one side of the comparison is
//! feasible; otherwise it stays unknown rather than being guessed.

use tracing::trace;

use crate::features::symbolic::{BinaryOp, ProgramState, SVal, SValBuilder};

/// `strncpy`/`strncat`/`strlcpy`: `bound` when the source provably fills
/// it, the source length when it provably does not, unknown otherwise.
///
/// Returns the amount and the state carrying the decided branch.
pub fn select_amount_copied(
    state: &ProgramState,
    src_len: &SVal,
    bound: &SVal,
) -> (SVal, ProgramState) {
    let too_long = SValBuilder::fold_binop(state, BinaryOp::Ge, src_len, bound);
    match state.assume_dual(&too_long) {
        (Some(truncated), None) => (bound.clone(), truncated),
        (None, Some(fits)) => (src_len.clone(), fits),
        _ => {
            trace!("cstring: {} >= {} undecided, amount unknown", src_len, bound);
            (SVal::Unknown, state.clone())
        }
    }
}

/// `strlcat`: bytes appended given the total buffer size `bound`.
///
/// `None` when the free space cannot be computed.
pub fn select_strlcat_amount(
    state: &ProgramState,
    src_len: &SVal,
    bound: &SVal,
    dst_len: &SVal,
) -> Option<SVal> {
    let free = SValBuilder::fold_binop(state, BinaryOp::Sub, bound, dst_len);
    if !free.is_nonloc() {
        return None;
    }
    let free = SValBuilder::fold_binop(state, BinaryOp::Sub, &free, &SVal::Int(1));
    if !free.is_nonloc() {
        return None;
    }
    let fits = SValBuilder::fold_binop(state, BinaryOp::Le, src_len, &free);
    Some(match state.assume_dual(&fits) {
        (Some(_), None) => src_len.clone(),
        (None, Some(_)) => free,
        _ => SVal::Unknown,
    })
}
