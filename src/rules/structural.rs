//! Single-premise inference over compound terms.
//!
//! Every rule here takes the current task's sentence and an indicated
//! component, builds at most a handful of candidate conclusions, and
//! hands each to the memory's single-premise emission. Any construction
//! failure — a degenerate compound, an invalid statement — silently
//! abandons that conclusion; under insufficient resources discarded work
//! is the normal case.

use crate::memory::Memory;
use crate::sentence::{Punctuation, Sentence};
use crate::term::{Connector, Copula, TemporalOrder, Term};
use crate::truth::{self, TruthValue};

/// Cases where the conclusion's inheritance direction flips: the second
/// operand of a difference, and the non-placeholder positions of an
/// image.
fn switch_order(compound: &Term, index: usize) -> bool {
    (matches!(
        compound.connector(),
        Some(Connector::DifferenceExt | Connector::DifferenceInt)
    ) && index == 1)
        || compound
            .relation_index()
            .is_some_and(|relation| relation != index)
}

/// `{<S --> P>, S@(S&T)} |- <(S&T) --> (P&T)>`
/// `{<S --> P>, S@(M-S)} |- <(M-P) --> (M-S)>`
pub(super) fn structural_compose2(
    compound: &Term,
    index: usize,
    statement: &Term,
    side: usize,
    memory: &mut Memory,
) {
    if Some(compound) == statement.component(side) {
        return;
    }
    let Some(mut subject) = statement.subject().cloned() else {
        return;
    };
    let Some(mut predicate) = statement.predicate().cloned() else {
        return;
    };
    if (side == 0 && compound.contains_component(&predicate))
        || (side == 1 && compound.contains_component(&subject))
    {
        return;
    }
    if side == 0 {
        if compound.contains_component(&subject) {
            subject = compound.clone();
            let mut components = compound.components().to_vec();
            components[index] = predicate.clone();
            let Some(rebuilt) = Term::make(compound, components) else {
                return;
            };
            predicate = rebuilt;
        }
    } else if compound.contains_component(&predicate) {
        let mut components = compound.components().to_vec();
        components[index] = subject.clone();
        let Some(rebuilt) = Term::make(compound, components) else {
            return;
        };
        subject = rebuilt;
        predicate = compound.clone();
    }
    let order = statement.temporal_order();
    let content = if switch_order(compound, index) {
        Term::statement_like(statement, predicate, subject, order.reverse())
    } else {
        Term::statement_like(statement, subject, predicate, order)
    };
    let Some(content) = content else {
        return;
    };
    let Some(premise_truth) = memory
        .current_task()
        .and_then(|t| t.sentence().truth().copied())
    else {
        return;
    };
    let reliance = memory.config().reliance;
    let truth = truth::deduction(&premise_truth, reliance);
    let budget = memory.compound_forward(Some(&truth), &content);
    memory.single_premise_task(content, None, Some(truth), budget);
}

/// `{<(S*T) --> (P*T)>, S@(S*T)} |- <S --> P>`
pub(super) fn structural_decompose2(statement: &Term, index: usize, memory: &mut Memory) {
    let Some(subject) = statement.subject() else {
        return;
    };
    let Some(predicate) = statement.predicate() else {
        return;
    };
    let same_shape = match (subject.connector(), predicate.connector()) {
        (Some(a), Some(b)) => a == b,
        (None, None) => {
            subject.is_statement()
                && predicate.is_statement()
                && subject.copula() == predicate.copula()
        }
        _ => false,
    };
    if !same_shape || !subject.is_composite() {
        return;
    }
    if subject.size() != predicate.size() || index >= subject.size() {
        return;
    }
    let t1 = subject.components()[index].clone();
    let t2 = predicate.components()[index].clone();
    let order = statement.temporal_order();
    let content = if switch_order(subject, index) {
        Term::statement_like(statement, t2, t1, order.reverse())
    } else {
        Term::statement_like(statement, t1, t2, order)
    };
    let Some(content) = content else {
        return;
    };
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let sentence = task.sentence();
    let truth = sentence.truth().copied();
    let budget = if sentence.is_question() || sentence.is_quest() {
        memory.compound_backward(&content)
    } else {
        memory.compound_forward(truth.as_ref(), &content)
    };
    memory.single_premise_task(content, None, truth, budget);
}

/// `{<S --> P>, P@(P|Q)} |- <S --> (P|Q)>`
///
/// Composition of one statement side into a compound containing it.
/// Forward inference only; the operator table decides which side
/// composes and whether the deduction is negated.
pub(super) fn structural_compose1(
    compound: &Term,
    index: usize,
    statement: &Term,
    memory: &mut Memory,
) {
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    if !task.sentence().is_judgment() {
        return;
    }
    let Some(component) = compound.component(index).cloned() else {
        return;
    };
    let sentence = task.sentence();
    let order = sentence.temporal_order();
    let Some(premise_truth) = sentence.truth().copied() else {
        return;
    };
    let reliance = memory.config().reliance;
    let truth_ded = truth::deduction(&premise_truth, reliance);
    let truth_nded = truth::negation(&truth::deduction(&premise_truth, reliance));
    let Some(subject) = statement.subject().cloned() else {
        return;
    };
    let Some(predicate) = statement.predicate().cloned() else {
        return;
    };
    if component == subject {
        match compound.connector() {
            Some(Connector::IntersectionExt) => {
                structural_statement(compound.clone(), predicate, order, truth_ded, memory);
            }
            Some(Connector::IntersectionInt) => {
                // no conclusion from this side
            }
            Some(Connector::DifferenceExt) if index == 0 => {
                structural_statement(compound.clone(), predicate, order, truth_ded, memory);
            }
            Some(Connector::DifferenceInt) => {
                if index == 0 {
                    // no conclusion for the minuend
                } else {
                    structural_statement(compound.clone(), predicate, order, truth_nded, memory);
                }
            }
            _ => {}
        }
    } else if component == predicate {
        match compound.connector() {
            Some(Connector::IntersectionExt) => {
                // no conclusion from this side
            }
            Some(Connector::IntersectionInt) => {
                structural_statement(subject, compound.clone(), order, truth_ded, memory);
            }
            Some(Connector::DifferenceExt) => {
                if index == 0 {
                    // no conclusion for the minuend
                } else {
                    structural_statement(subject, compound.clone(), order, truth_nded, memory);
                }
            }
            Some(Connector::DifferenceInt) if index == 0 => {
                structural_statement(subject, compound.clone(), order, truth_ded, memory);
            }
            _ => {}
        }
    }
}

/// `{<(S|T) --> P>, S@(S|T)} |- <S --> P>`
/// `{<S --> (P&T)>, P@(P&T)} |- <S --> P>`
///
/// Decomposition of a compound statement side down to one component.
pub(super) fn structural_decompose1(
    compound: &Term,
    index: usize,
    statement: &Term,
    memory: &mut Memory,
) {
    let Some(component) = compound.component(index).cloned() else {
        return;
    };
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let sentence = task.sentence();
    let order = sentence.temporal_order();
    let Some(premise_truth) = sentence.truth().copied() else {
        return;
    };
    let reliance = memory.config().reliance;
    let truth_ded = truth::deduction(&premise_truth, reliance);
    let truth_nded = truth::negation(&truth::deduction(&premise_truth, reliance));
    let Some(subject) = statement.subject().cloned() else {
        return;
    };
    let Some(predicate) = statement.predicate().cloned() else {
        return;
    };
    if *compound == subject {
        match compound.connector() {
            Some(Connector::IntersectionInt) => {
                structural_statement(component, predicate, order, truth_ded, memory);
            }
            Some(Connector::SetExt) if compound.size() > 1 => {
                if let Some(singleton) = Term::set_ext(vec![component]) {
                    structural_statement(singleton, predicate, order, truth_ded, memory);
                }
            }
            Some(Connector::DifferenceInt) => {
                let truth = if index == 0 { truth_ded } else { truth_nded };
                structural_statement(component, predicate, order, truth, memory);
            }
            _ => {}
        }
    } else if *compound == predicate {
        match compound.connector() {
            Some(Connector::IntersectionExt) => {
                structural_statement(subject, component, order, truth_ded, memory);
            }
            Some(Connector::SetInt) if compound.size() > 1 => {
                if let Some(singleton) = Term::set_int(vec![component]) {
                    structural_statement(subject, singleton, order, truth_ded, memory);
                }
            }
            Some(Connector::DifferenceExt) => {
                let truth = if index == 0 { truth_ded } else { truth_nded };
                structural_statement(subject, component, order, truth, memory);
            }
            _ => {}
        }
    }
}

/// Common emission for compose-1/decompose-1: rebuild the task's
/// statement with the new sides and a forward budget.
fn structural_statement(
    subject: Term,
    predicate: Term,
    order: TemporalOrder,
    truth: TruthValue,
    memory: &mut Memory,
) {
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let old_content = task.content();
    if !old_content.is_statement() {
        return;
    }
    let Some(content) = Term::statement_like(old_content, subject, predicate, order) else {
        return;
    };
    let budget = memory.compound_forward(Some(&truth), &content);
    memory.single_premise_task(content, None, Some(truth), budget);
}

/// `{<S --> {P}>} |- <S <-> {P}>` and the converse directions.
///
/// Only singleton sets qualify. For an inheritance premise the
/// conclusion is the similarity; for a similarity premise the conclusion
/// is the inheritance pointed away from the set side.
pub(super) fn transform_set_relation(
    compound: &Term,
    statement: &Term,
    side: usize,
    memory: &mut Memory,
) {
    if compound.size() > 1 {
        return;
    }
    let is_inheritance = statement.copula() == Some(Copula::Inheritance);
    if is_inheritance
        && ((compound.has_connector(Connector::SetExt) && side == 0)
            || (compound.has_connector(Connector::SetInt) && side == 1))
    {
        return;
    }
    let Some(subject) = statement.subject() else {
        return;
    };
    let Some(predicate) = statement.predicate() else {
        return;
    };
    let content = if is_inheritance {
        Term::similarity(subject, predicate)
    } else if (compound.has_connector(Connector::SetExt) && side == 0)
        || (compound.has_connector(Connector::SetInt) && side == 1)
    {
        Term::inheritance(predicate, subject)
    } else {
        Term::inheritance(subject, predicate)
    };
    let Some(content) = content else {
        return;
    };
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let sentence = task.sentence();
    let truth = sentence.truth().copied();
    let budget = if sentence.is_judgment() {
        memory.compound_forward(truth.as_ref(), &content)
    } else {
        memory.compound_backward(&content)
    };
    memory.single_premise_task(content, None, truth, budget);
}

/// Equivalent transformation between products and images:
/// `{<(*,S,M) --> P>, S@(*,S,M)} |- <S --> (/,P,_,M)>`
/// `{<S --> (/,P,_,M)>, P@(/,P,_,M)} |- <(*,S,M) --> P>`
/// `{<S --> (/,P,_,M)>, M@(/,P,_,M)} |- <M --> (/,P,S,_)>`
///
/// When the inheritance is nested inside a statement, a conjunction or a
/// higher-order condition, the outer structure is rebuilt around the
/// transformed inheritance at the recorded index path.
pub(super) fn transform_product_image(
    inheritance: &Term,
    old_content: &Term,
    indices: &[usize],
    memory: &mut Memory,
) {
    let Some(inh_subject) = inheritance.subject().cloned() else {
        return;
    };
    let Some(inh_predicate) = inheritance.predicate().cloned() else {
        return;
    };
    if inheritance == old_content {
        if inh_subject.is_compound() {
            transform_subject_product_image(&inh_subject, &inh_predicate, memory);
        }
        if inh_predicate.is_compound() {
            transform_predicate_product_image(&inh_subject, &inh_predicate, memory);
        }
        return;
    }
    if indices.len() < 2 {
        return;
    }
    let index = indices[indices.len() - 1];
    let side = indices[indices.len() - 2];
    let Some(compound) = inheritance.component(side).cloned() else {
        return;
    };
    let Some((new_subject, new_predicate)) =
        transformed_sides(&compound, side, index, &inh_subject, &inh_predicate)
    else {
        return;
    };
    let Some(new_inheritance) = Term::inheritance(&new_subject, &new_predicate) else {
        return;
    };

    let content = if indices.len() == 2 {
        Some(new_inheritance)
    } else if old_content.is_statement() && indices[0] == 1 {
        old_content.component(0).cloned().and_then(|first| {
            Term::statement_like(
                old_content,
                first,
                new_inheritance,
                old_content.temporal_order(),
            )
        })
    } else {
        rebuild_outer(old_content, new_inheritance, indices)
    };
    let Some(content) = content else {
        return;
    };
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let sentence = task.sentence();
    let truth = sentence.truth().copied();
    let budget = if sentence.is_question() || sentence.is_quest() {
        memory.compound_backward(&content)
    } else {
        memory.compound_forward(truth.as_ref(), &content)
    };
    memory.single_premise_task(content, None, truth, budget);
}

/// New inheritance sides for one step of the product/image equivalence.
fn transformed_sides(
    compound: &Term,
    side: usize,
    index: usize,
    inh_subject: &Term,
    inh_predicate: &Term,
) -> Option<(Term, Term)> {
    if compound.has_connector(Connector::Product) {
        if side == 0 {
            let subject = compound.component(index)?.clone();
            let predicate = Term::image_ext(compound, inh_predicate, index)?;
            Some((subject, predicate))
        } else {
            let subject = Term::image_int(compound, inh_subject, index)?;
            let predicate = compound.component(index)?.clone();
            Some((subject, predicate))
        }
    } else if compound.has_connector(Connector::ImageExt) && side == 1 {
        if Some(index) == compound.relation_index() {
            let subject = Term::product_from_image(compound, inh_subject, index)?;
            let predicate = compound.component(index)?.clone();
            Some((subject, predicate))
        } else {
            let subject = compound.component(index)?.clone();
            let predicate = Term::image_ext_from_image(compound, inh_subject, index)?;
            Some((subject, predicate))
        }
    } else if compound.has_connector(Connector::ImageInt) && side == 0 {
        if Some(index) == compound.relation_index() {
            let subject = compound.component(index)?.clone();
            let predicate = Term::product_from_image(compound, inh_predicate, index)?;
            Some((subject, predicate))
        } else {
            let subject = Term::image_int_from_image(compound, inh_predicate, index)?;
            let predicate = compound.component(index)?.clone();
            Some((subject, predicate))
        }
    } else {
        None
    }
}

/// Substitute the transformed inheritance back into a conjunction, an
/// implication condition or an equivalence side.
fn rebuild_outer(old_content: &Term, new_inheritance: Term, indices: &[usize]) -> Option<Term> {
    let higher_order = matches!(
        old_content.copula(),
        Some(Copula::Implication | Copula::Equivalence)
    );
    let condition = old_content.component(0)?;
    if higher_order && condition.has_connector(Connector::Conjunction) {
        let mut components = condition.components().to_vec();
        let slot = components.get_mut(*indices.get(1)?)?;
        *slot = new_inheritance;
        let new_condition = Term::make(condition, components)?;
        Term::statement_like(
            old_content,
            new_condition,
            old_content.predicate()?.clone(),
            old_content.temporal_order(),
        )
    } else {
        let mut components = old_content.components().to_vec();
        let slot = components.get_mut(*indices.first()?)?;
        *slot = new_inheritance;
        if old_content.has_connector(Connector::Conjunction) {
            Term::make(old_content, components)
        } else if higher_order {
            let subject = components.first()?.clone();
            let predicate = components.get(1)?.clone();
            Term::statement_like(
                old_content,
                subject,
                predicate,
                old_content.temporal_order(),
            )
        } else {
            None
        }
    }
}

/// Product or intensional image on the subject side: one conclusion per
/// argument position.
fn transform_subject_product_image(subject: &Term, predicate: &Term, memory: &mut Memory) {
    let truth = memory
        .current_task()
        .and_then(|t| t.sentence().truth().copied());
    if subject.has_connector(Connector::Product) {
        for i in 0..subject.size() {
            let new_subject = subject.components()[i].clone();
            let Some(new_predicate) = Term::image_ext(subject, predicate, i) else {
                continue;
            };
            emit_transformed(new_subject, new_predicate, truth, memory);
        }
    } else if subject.has_connector(Connector::ImageInt) {
        let Some(relation_index) = subject.relation_index() else {
            return;
        };
        for i in 0..subject.size() {
            let pair = if i == relation_index {
                Term::product_from_image(subject, predicate, relation_index)
                    .map(|product| (subject.components()[relation_index].clone(), product))
            } else {
                Term::image_int_from_image(subject, predicate, i)
                    .map(|image| (image, subject.components()[i].clone()))
            };
            if let Some((new_subject, new_predicate)) = pair {
                emit_transformed(new_subject, new_predicate, truth, memory);
            }
        }
    }
}

/// Product or extensional image on the predicate side; the dual walk.
fn transform_predicate_product_image(subject: &Term, predicate: &Term, memory: &mut Memory) {
    let truth = memory
        .current_task()
        .and_then(|t| t.sentence().truth().copied());
    if predicate.has_connector(Connector::Product) {
        for i in 0..predicate.size() {
            let Some(new_subject) = Term::image_int(predicate, subject, i) else {
                continue;
            };
            let new_predicate = predicate.components()[i].clone();
            emit_transformed(new_subject, new_predicate, truth, memory);
        }
    } else if predicate.has_connector(Connector::ImageExt) {
        let Some(relation_index) = predicate.relation_index() else {
            return;
        };
        for i in 0..predicate.size() {
            let pair = if i == relation_index {
                Term::product_from_image(predicate, subject, relation_index)
                    .map(|product| (product, predicate.components()[relation_index].clone()))
            } else {
                Term::image_ext_from_image(predicate, subject, i)
                    .map(|image| (predicate.components()[i].clone(), image))
            };
            if let Some((new_subject, new_predicate)) = pair {
                emit_transformed(new_subject, new_predicate, truth, memory);
            }
        }
    }
}

fn emit_transformed(
    subject: Term,
    predicate: Term,
    truth: Option<TruthValue>,
    memory: &mut Memory,
) {
    let Some(inheritance) = Term::inheritance(&subject, &predicate) else {
        return;
    };
    let budget = match truth.as_ref() {
        None => memory.compound_backward(&inheritance),
        Some(t) => memory.compound_forward(Some(t), &inheritance),
    };
    memory.single_premise_task(inheritance, None, truth, budget);
}

/// `{(&&, A, B), A@(&&, A, B)} |- A`, or answering `(&&, A, B)?` with A.
///
/// Suppressed for non-initial components of a sequential conjunction.
/// The four truth sub-cases hinge on whether the sentence is a judgment,
/// whether the compound came from the task, and whether the connector is
/// a conjunction; the mismatched case routes through double negation.
pub(super) fn structural_compound(
    compound: &Term,
    component: &Term,
    compound_task: bool,
    index: usize,
    memory: &mut Memory,
) {
    if !component.is_constant() {
        return;
    }
    if compound.has_connector(Connector::Conjunction)
        && compound.temporal_order() == TemporalOrder::Forward
        && index != 0
    {
        return;
    }
    let content = if compound_task {
        component.clone()
    } else {
        compound.clone()
    };
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let sentence = task.sentence();
    let mut truth = sentence.truth().copied();
    let budget;
    if sentence.is_question() || sentence.is_quest() {
        budget = memory.compound_backward(&content);
    } else {
        let Some(premise_truth) = truth else {
            return;
        };
        let reliance = memory.config().reliance;
        let is_conjunction = compound.has_connector(Connector::Conjunction);
        if sentence.is_judgment() == (compound_task == is_conjunction) {
            truth = Some(truth::deduction(&premise_truth, reliance));
        } else if sentence.is_goal() {
            truth = Some(truth::deduction(&premise_truth, reliance));
        } else {
            let negated = truth::negation(&premise_truth);
            let deduced = truth::deduction(&negated, reliance);
            truth = Some(truth::negation(&deduced));
        }
        budget = memory.forward(truth.as_ref());
    }
    memory.single_premise_task(content, None, truth, budget);
}

/// `{A, A@(--, A)} |- (--, A)`
pub(super) fn transform_negation(content: &Term, memory: &mut Memory) {
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let sentence = task.sentence();
    let mut truth = sentence.truth().copied();
    let budget;
    if sentence.is_judgment() || sentence.is_goal() {
        let Some(premise_truth) = truth else {
            return;
        };
        truth = Some(truth::negation(&premise_truth));
        budget = memory.compound_forward(truth.as_ref(), content);
    } else {
        budget = memory.compound_backward(content);
    }
    memory.single_premise_task(content.clone(), None, truth, budget);
}

/// `{<A ==> B>} |- <(--,B) ==> (--,A)>`, with the temporal order
/// reversed. Punctuation is set explicitly: questions stay questions
/// with a weak backward budget, everything else becomes a judgment with
/// contraposed truth.
pub(crate) fn contraposition(statement: &Term, sentence: &Sentence, memory: &mut Memory) {
    let Some(subject) = statement.subject() else {
        return;
    };
    let Some(predicate) = statement.predicate() else {
        return;
    };
    let content = Term::statement_like(
        statement,
        Term::negation(predicate),
        Term::negation(subject),
        statement.temporal_order().reverse(),
    );
    let Some(content) = content else {
        return;
    };
    let mut truth = sentence.truth().copied();
    if sentence.is_question() || sentence.is_quest() {
        let budget = if content.copula() == Some(Copula::Implication) {
            memory.compound_backward_weak(&content)
        } else {
            memory.compound_backward(&content)
        };
        memory.single_premise_task(content, Some(Punctuation::Question), truth, budget);
    } else {
        if content.copula() == Some(Copula::Implication) {
            let horizon = memory.config().horizon;
            truth = truth.map(|t| truth::contraposition(&t, horizon));
        }
        let budget = memory.compound_forward(truth.as_ref(), &content);
        memory.single_premise_task(content, Some(Punctuation::Judgment), truth, budget);
    }
}
