//! Statement constructors.
//!
//! A statement relates a subject and a predicate through a copula,
//! optionally with a temporal order. Construction rejects the forms the
//! logic forbids: a term related to itself, a compound related to one of
//! its own direct components (images excepted), mirrored statement pairs,
//! and higher-order copulas nested where they may not appear. Symmetric
//! copulas canonicalize their operand order; an implication whose
//! predicate is itself an implication folds its condition into a
//! conjunction.

use super::{interner, Connector, Copula, TemporalOrder, Term, TermData, TermKind};

fn build(copula: Copula, subject: Term, predicate: Term, order: TemporalOrder) -> Term {
    let name = format!(
        "<{} {} {}>",
        subject.name(),
        copula.glyph(order),
        predicate.name()
    );
    let complexity = 1 + subject.complexity() + predicate.complexity();
    let constant = subject.is_constant() && predicate.is_constant();
    Term(interner::intern(TermData {
        kind: TermKind::Statement { copula },
        components: vec![subject, predicate],
        temporal_order: order,
        name,
        complexity,
        constant,
    }))
}

/// Whether `t1` is a compound containing `t2` as a direct component.
/// Images are exempt: their components legitimately recur in related
/// statements.
fn invalid_reflexive(t1: &Term, t2: &Term) -> bool {
    if !t1.is_composite() {
        return false;
    }
    if matches!(
        t1.connector(),
        Some(Connector::ImageExt | Connector::ImageInt)
    ) {
        return false;
    }
    t1.contains_component(t2)
}

impl Term {
    /// Whether a statement relating `subject` and `predicate` is a
    /// forbidden form.
    pub fn invalid_statement(subject: &Term, predicate: &Term) -> bool {
        if subject == predicate {
            return true;
        }
        if invalid_reflexive(subject, predicate) || invalid_reflexive(predicate, subject) {
            return true;
        }
        if subject.is_statement() && predicate.is_statement() {
            let (s1, p1) = (subject.subject(), subject.predicate());
            let (s2, p2) = (predicate.subject(), predicate.predicate());
            if s1 == p2 && p1 == s2 {
                return true;
            }
        }
        false
    }

    /// An inheritance statement `<subject --> predicate>`.
    pub fn inheritance(subject: &Term, predicate: &Term) -> Option<Term> {
        Term::statement(
            Copula::Inheritance,
            subject.clone(),
            predicate.clone(),
            TemporalOrder::None,
        )
    }

    /// A similarity statement `<subject <-> predicate>`.
    pub fn similarity(subject: &Term, predicate: &Term) -> Option<Term> {
        Term::statement(
            Copula::Similarity,
            subject.clone(),
            predicate.clone(),
            TemporalOrder::None,
        )
    }

    /// An implication `<subject ==> predicate>` with the given order.
    pub fn implication(subject: &Term, predicate: &Term, order: TemporalOrder) -> Option<Term> {
        Term::statement(Copula::Implication, subject.clone(), predicate.clone(), order)
    }

    /// An equivalence `<subject <=> predicate>` with the given order.
    pub fn equivalence(subject: &Term, predicate: &Term, order: TemporalOrder) -> Option<Term> {
        Term::statement(Copula::Equivalence, subject.clone(), predicate.clone(), order)
    }

    /// General statement constructor.
    pub fn statement(
        copula: Copula,
        subject: Term,
        predicate: Term,
        order: TemporalOrder,
    ) -> Option<Term> {
        if Term::invalid_statement(&subject, &predicate) {
            return None;
        }
        match copula {
            Copula::Inheritance => Some(build(copula, subject, predicate, TemporalOrder::None)),
            Copula::Similarity => {
                let (subject, predicate) = if subject > predicate {
                    (predicate, subject)
                } else {
                    (subject, predicate)
                };
                Some(build(copula, subject, predicate, TemporalOrder::None))
            }
            Copula::Implication => {
                if subject.copula() == Some(Copula::Implication)
                    || subject.copula() == Some(Copula::Equivalence)
                    || predicate.copula() == Some(Copula::Equivalence)
                {
                    return None;
                }
                if predicate.copula() == Some(Copula::Implication) {
                    // <A ==> <B ==> C>> folds into <(&&, A, B) ==> C>
                    let old_condition = predicate.subject()?.clone();
                    if old_condition.has_connector(Connector::Conjunction)
                        && old_condition.contains_component(&subject)
                    {
                        return None;
                    }
                    let new_condition =
                        Term::conjunction_pair(&subject, &old_condition, order)?;
                    let consequent = predicate.predicate()?.clone();
                    return Term::statement(copula, new_condition, consequent, order);
                }
                Some(build(copula, subject, predicate, order))
            }
            Copula::Equivalence => {
                for side in [&subject, &predicate] {
                    if matches!(
                        side.copula(),
                        Some(Copula::Implication | Copula::Equivalence)
                    ) {
                        return None;
                    }
                }
                match order {
                    TemporalOrder::Backward => {
                        Some(build(copula, predicate, subject, TemporalOrder::Forward))
                    }
                    TemporalOrder::Forward => Some(build(copula, subject, predicate, order)),
                    _ => {
                        let (subject, predicate) = if subject > predicate {
                            (predicate, subject)
                        } else {
                            (subject, predicate)
                        };
                        Some(build(copula, subject, predicate, order))
                    }
                }
            }
        }
    }

    /// Rebuild a statement of `template`'s copula from new sides.
    pub fn statement_like(
        template: &Term,
        subject: Term,
        predicate: Term,
        order: TemporalOrder,
    ) -> Option<Term> {
        let copula = template.copula()?;
        Term::statement(copula, subject, predicate, order)
    }
}
