//! Rule dispatch.
//!
//! Entry points called from concept firing: [`reason`] routes a selected
//! task-link/term-link pair to the structural rules according to the two
//! link kinds, and [`transform_task`] handles transform-type task links
//! (the product/image equivalence). The syllogistic, compositional and
//! variable-handling families consume the same contracts but are layered
//! above this kernel and do not appear here.

mod structural;
mod temporal;

pub(crate) use temporal::temporal_induction;

use crate::link::{LinkKind, TaskLink};
use crate::memory::Memory;
use crate::term::{Connector, Copula, Term};

/// Reason the current task against the belief term selected by the
/// current term link.
///
/// Looks up a non-overlapping belief for the belief term (parking the
/// merged stamp for double-premise use), then dispatches on the pair of
/// link kinds.
pub(crate) fn reason(task_link: &TaskLink, memory: &mut Memory) {
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let Some(belief_link) = memory.current_belief_link().cloned() else {
        return;
    };
    let task_term = task.content().clone();
    let belief_term = belief_link.target().clone();

    let belief = memory.belief_for(&belief_term, &task);
    memory.set_current_belief(belief);
    // matching and revision against the belief are layered above the
    // structural kernel
    if !memory.no_result() && task.sentence().is_judgment() {
        return;
    }

    let t_index = task_link.index(0);
    let b_index = belief_link.index(0);
    match (task_link.kind(), belief_link.kind()) {
        (LinkKind::SelfRef, LinkKind::Component) => {
            if let Some(index) = b_index {
                compound_and_self(&task_term, &belief_term, true, index, memory);
            }
        }
        (LinkKind::SelfRef, LinkKind::Compound) => {
            if let Some(index) = b_index {
                compound_and_self(&belief_term, &task_term, false, index, memory);
            }
        }
        (LinkKind::Compound, LinkKind::CompoundStatement) => {
            if let (Some(ti), Some(bi)) = (t_index, b_index) {
                compound_and_statement(&task_term, ti, &belief_term, bi, memory);
            }
        }
        (LinkKind::CompoundStatement, LinkKind::Component) => {
            if let (Some(ti), Some(bi), Some(current_term)) =
                (t_index, b_index, memory.current_term().cloned())
            {
                component_and_statement(&current_term, bi, &task_term, ti, memory);
            }
        }
        (LinkKind::CompoundStatement, LinkKind::Compound) => {
            if let (Some(ti), Some(bi)) = (t_index, b_index) {
                compound_and_statement(&belief_term, bi, &task_term, ti, memory);
            }
        }
        // the remaining pairings feed the syllogistic and conditional
        // families layered above this kernel
        _ => {}
    }
}

/// A compound against one of its components, with no third term
/// involved: conjunction/disjunction extraction and the negation
/// transform.
fn compound_and_self(
    compound: &Term,
    component: &Term,
    compound_task: bool,
    index: usize,
    memory: &mut Memory,
) {
    match compound.connector() {
        Some(Connector::Conjunction | Connector::Disjunction) => {
            if memory.current_belief().is_some() {
                // two-premise decomposition belongs to the compositional
                // family
            } else if compound.contains_component(component) {
                structural::structural_compound(compound, component, compound_task, index, memory);
            }
        }
        Some(Connector::Negation) => {
            if compound_task {
                if let Some(inner) = compound.component(0).cloned() {
                    structural::transform_negation(&inner, memory);
                }
            } else {
                structural::transform_negation(compound, memory);
            }
        }
        _ => {}
    }
}

/// A compound term against a statement containing the concept's term:
/// composition into the compound.
fn compound_and_statement(
    compound: &Term,
    index: usize,
    statement: &Term,
    side: usize,
    memory: &mut Memory,
) {
    let Some(component) = compound.component(index).cloned() else {
        return;
    };
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    if !statement.is_statement() {
        return;
    }
    if component.is_statement() && component.copula() == statement.copula() {
        // same-order component and statement feed variable handling,
        // which is layered above this kernel
        return;
    }
    if !task.is_structural() && task.sentence().is_judgment() {
        match statement.copula() {
            Some(Copula::Inheritance) => {
                structural::structural_compose1(compound, index, statement, memory);
                if !matches!(
                    compound.connector(),
                    Some(Connector::SetExt | Connector::SetInt | Connector::Negation)
                ) {
                    structural::structural_compose2(compound, index, statement, side, memory);
                }
            }
            Some(Copula::Similarity) => {
                if !compound.has_connector(Connector::Conjunction) {
                    structural::structural_compose2(compound, index, statement, side, memory);
                }
            }
            _ => {}
        }
    }
}

/// The concept's compound term against a statement that is the task:
/// decomposition out of the compound, set-relation transforms, and
/// contraposition under negation.
fn component_and_statement(
    compound: &Term,
    index: usize,
    statement: &Term,
    side: usize,
    memory: &mut Memory,
) {
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    if task.is_structural() || !statement.is_statement() {
        return;
    }
    match statement.copula() {
        Some(Copula::Inheritance) => {
            structural::structural_decompose1(compound, index, statement, memory);
            if matches!(
                compound.connector(),
                Some(Connector::SetExt | Connector::SetInt)
            ) {
                structural::transform_set_relation(compound, statement, side, memory);
            } else {
                structural::structural_decompose2(statement, index, memory);
            }
        }
        Some(Copula::Similarity) => {
            structural::structural_decompose2(statement, index, memory);
            if matches!(
                compound.connector(),
                Some(Connector::SetExt | Connector::SetInt)
            ) {
                structural::transform_set_relation(compound, statement, side, memory);
            }
        }
        Some(Copula::Implication) if compound.has_connector(Connector::Negation) => {
            if index == 0 {
                let sentence = task.sentence().clone();
                structural::contraposition(statement, &sentence, memory);
            } else if let Some(belief) = memory.current_belief().cloned() {
                structural::contraposition(statement, &belief, memory);
            }
        }
        _ => {}
    }
}

/// Handle a transform-type task link: locate the inheritance the link's
/// index path points at — the whole content, a component of it, or a
/// conjunct inside a higher-order condition — and run the product/image
/// equivalence on it.
pub(crate) fn transform_task(task_link: &TaskLink, memory: &mut Memory) {
    let Some(task) = memory.current_task().cloned() else {
        return;
    };
    let content = task.content().clone();
    let indices = task_link.indices();
    let inheritance = if indices.len() == 2 || content.copula() == Some(Copula::Inheritance) {
        Some(content.clone())
    } else if indices.len() == 3 {
        content.component(indices[0]).cloned()
    } else if indices.len() == 4 {
        match content.component(indices[0]) {
            Some(condition)
                if condition.has_connector(Connector::Conjunction)
                    && ((content.copula() == Some(Copula::Implication) && indices[0] == 0)
                        || content.copula() == Some(Copula::Equivalence)) =>
            {
                condition.component(indices[1]).cloned()
            }
            _ => None,
        }
    } else {
        None
    };
    let Some(inheritance) = inheritance else {
        return;
    };
    if inheritance.copula() == Some(Copula::Inheritance) {
        structural::transform_product_image(&inheritance, &content, indices, memory);
    }
}
