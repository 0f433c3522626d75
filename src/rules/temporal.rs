//! Temporal induction between consecutive events.
//!
//! Invoked once per cycle from the new-task drain, between the
//! best-ranked time-bound judgment of the drain and the previous event.
//! The premises' stamps were already merged by the caller; overlap means
//! the caller never gets here.

use crate::memory::Memory;
use crate::sentence::Sentence;
use crate::term::{TemporalOrder, Term};
use crate::truth;

/// From events `old` then `new`, derive the predictive implication
/// `<old ==> new>`, its retrodictive converse, and the equivalence,
/// with induction and comparison truth. Events closer together than the
/// configured duration count as concurrent.
pub(crate) fn temporal_induction(new_event: &Sentence, old_event: &Sentence, memory: &mut Memory) {
    let (Some(t_new), Some(t_old)) = (new_event.truth().copied(), old_event.truth().copied())
    else {
        return;
    };
    let term_new = new_event.content();
    let term_old = old_event.content();
    if term_new == term_old || Term::invalid_statement(term_new, term_old) {
        return;
    }
    let order = match (
        new_event.stamp().occurrence_time().time(),
        old_event.stamp().occurrence_time().time(),
    ) {
        (Some(a), Some(b)) if a.abs_diff(b) < memory.config().duration => {
            TemporalOrder::Concurrent
        }
        _ => TemporalOrder::Forward,
    };
    let horizon = memory.config().horizon;
    let truth_predictive = truth::induction(&t_old, &t_new, horizon);
    let truth_retrodictive = truth::induction(&t_new, &t_old, horizon);
    let truth_equivalence = truth::comparison(&t_old, &t_new, horizon);
    let budget_predictive = memory.forward(Some(&truth_predictive));
    let budget_retrodictive = memory.forward(Some(&truth_retrodictive));
    let budget_equivalence = memory.forward(Some(&truth_equivalence));

    let predictive = Term::implication(term_old, term_new, order);
    let retrodictive = Term::implication(term_new, term_old, order.reverse());
    let equivalence = Term::equivalence(term_old, term_new, order);

    memory.double_premise_task(predictive, Some(truth_predictive), budget_predictive);
    memory.double_premise_task(retrodictive, Some(truth_retrodictive), budget_retrodictive);
    memory.double_premise_task(equivalence, Some(truth_equivalence), budget_equivalence);
}
