//! The term algebra.
//!
//! Terms are the vocabulary of the reasoner: atoms, compounds built from a
//! connector and an ordered tuple of children, and statements relating two
//! terms through a copula. Every term is canonicalized at construction —
//! commutative operands sorted, set operands deduplicated, identity
//! elements collapsed, forbidden forms rejected — and hash-consed, so two
//! terms that compare equal share one allocation and are interchangeable
//! anywhere.
//!
//! Constructors live in [`compound`] and [`statement`]; they return
//! `Option<Term>` and answer `None` for degenerate forms. A failed
//! construction is an ordinary outcome, not an error.

mod compound;
mod interner;
mod statement;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Temporal relation carried by statements and sequential conjunctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemporalOrder {
    #[default]
    None,
    Forward,
    Concurrent,
    Backward,
}

impl TemporalOrder {
    /// Swap forward and backward; none and concurrent are their own
    /// reverses.
    pub fn reverse(self) -> Self {
        match self {
            TemporalOrder::Forward => TemporalOrder::Backward,
            TemporalOrder::Backward => TemporalOrder::Forward,
            other => other,
        }
    }
}

/// The relation of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Copula {
    Inheritance,
    Similarity,
    Implication,
    Equivalence,
}

impl Copula {
    /// Symmetric copulas canonicalize their operand order.
    pub fn is_symmetric(self) -> bool {
        matches!(self, Copula::Similarity | Copula::Equivalence)
    }

    pub(crate) fn glyph(self, order: TemporalOrder) -> &'static str {
        match (self, order) {
            (Copula::Inheritance, _) => "-->",
            (Copula::Similarity, _) => "<->",
            (Copula::Implication, TemporalOrder::Forward) => "=/>",
            (Copula::Implication, TemporalOrder::Concurrent) => "=|>",
            (Copula::Implication, TemporalOrder::Backward) => "=\\>",
            (Copula::Implication, TemporalOrder::None) => "==>",
            (Copula::Equivalence, TemporalOrder::Forward) => "</>",
            (Copula::Equivalence, TemporalOrder::Concurrent) => "<|>",
            (Copula::Equivalence, _) => "<=>",
        }
    }
}

/// The operator of a compound term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    Product,
    ImageExt,
    ImageInt,
    SetExt,
    SetInt,
    IntersectionExt,
    IntersectionInt,
    DifferenceExt,
    DifferenceInt,
    Conjunction,
    Disjunction,
    Negation,
}

impl Connector {
    pub(crate) fn glyph(self, order: TemporalOrder) -> &'static str {
        match (self, order) {
            (Connector::Product, _) => "*",
            (Connector::ImageExt, _) => "/",
            (Connector::ImageInt, _) => "\\",
            (Connector::SetExt, _) => "{}",
            (Connector::SetInt, _) => "[]",
            (Connector::IntersectionExt, _) => "&",
            (Connector::IntersectionInt, _) => "|",
            (Connector::DifferenceExt, _) => "-",
            (Connector::DifferenceInt, _) => "~",
            (Connector::Conjunction, TemporalOrder::Forward) => "&/",
            (Connector::Conjunction, TemporalOrder::Concurrent) => "&|",
            (Connector::Conjunction, _) => "&&",
            (Connector::Disjunction, _) => "||",
            (Connector::Negation, _) => "--",
        }
    }

    /// Whether operand order is immaterial (and operands are sorted).
    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            Connector::SetExt
                | Connector::SetInt
                | Connector::IntersectionExt
                | Connector::IntersectionInt
                | Connector::Disjunction
                | Connector::Conjunction
        )
    }
}

/// Discriminant of a term.
#[derive(Debug)]
pub(crate) enum TermKind {
    Atom,
    Compound {
        connector: Connector,
        /// For images: the component slot standing for the missing
        /// argument (currently occupied by the relation term). Zero for
        /// every other connector.
        relation_index: usize,
    },
    Statement {
        copula: Copula,
    },
}

#[derive(Debug)]
pub(crate) struct TermData {
    pub(crate) kind: TermKind,
    pub(crate) components: Vec<Term>,
    pub(crate) temporal_order: TemporalOrder,
    pub(crate) name: String,
    pub(crate) complexity: usize,
    pub(crate) constant: bool,
}

/// A persistent, hash-consed term.
///
/// Cloning is an `Arc` bump. Equality, ordering and hashing go through
/// the canonical name, with a pointer fast path for interned twins.
#[derive(Clone)]
pub struct Term(pub(crate) Arc<TermData>);

impl Term {
    /// An atomic term with the given name.
    ///
    /// Names beginning with `$`, `#` or `?` denote open places supplied
    /// by external layers; terms containing them are not constant and
    /// never index a concept.
    pub fn atom(name: &str) -> Term {
        let constant = !name.starts_with(['$', '#', '?']);
        Term(interner::intern(TermData {
            kind: TermKind::Atom,
            components: Vec::new(),
            temporal_order: TemporalOrder::None,
            name: name.to_string(),
            complexity: 1,
            constant,
        }))
    }

    /// The canonical textual form; doubles as the term's identity.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Syntactic size: one for an atom, one plus the children's total for
    /// anything composite.
    pub fn complexity(&self) -> usize {
        self.0.complexity
    }

    /// Whether the term is free of open places.
    pub fn is_constant(&self) -> bool {
        self.0.constant
    }

    pub fn is_atom(&self) -> bool {
        matches!(self.0.kind, TermKind::Atom)
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.0.kind, TermKind::Compound { .. })
    }

    pub fn is_statement(&self) -> bool {
        matches!(self.0.kind, TermKind::Statement { .. })
    }

    /// Compound or statement: anything with children.
    pub fn is_composite(&self) -> bool {
        !self.0.components.is_empty()
    }

    /// The connector, for compounds.
    pub fn connector(&self) -> Option<Connector> {
        match self.0.kind {
            TermKind::Compound { connector, .. } => Some(connector),
            _ => None,
        }
    }

    /// Whether this is a compound with the given connector.
    pub fn has_connector(&self, connector: Connector) -> bool {
        self.connector() == Some(connector)
    }

    /// The copula, for statements.
    pub fn copula(&self) -> Option<Copula> {
        match self.0.kind {
            TermKind::Statement { copula } => Some(copula),
            _ => None,
        }
    }

    /// The placeholder slot of an image.
    pub fn relation_index(&self) -> Option<usize> {
        match self.0.kind {
            TermKind::Compound {
                connector: Connector::ImageExt | Connector::ImageInt,
                relation_index,
            } => Some(relation_index),
            _ => None,
        }
    }

    pub fn temporal_order(&self) -> TemporalOrder {
        self.0.temporal_order
    }

    /// The ordered children. Empty for atoms; `[subject, predicate]` for
    /// statements.
    pub fn components(&self) -> &[Term] {
        &self.0.components
    }

    pub fn size(&self) -> usize {
        self.0.components.len()
    }

    pub fn component(&self, index: usize) -> Option<&Term> {
        self.0.components.get(index)
    }

    /// The subject of a statement.
    pub fn subject(&self) -> Option<&Term> {
        if self.is_statement() {
            self.0.components.first()
        } else {
            None
        }
    }

    /// The predicate of a statement.
    pub fn predicate(&self) -> Option<&Term> {
        if self.is_statement() {
            self.0.components.get(1)
        } else {
            None
        }
    }

    /// Whether `term` is a direct child.
    pub fn contains_component(&self, term: &Term) -> bool {
        self.0.components.contains(term)
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.name.cmp(&other.0.name)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_identity() {
        let a = Term::atom("bird");
        let b = Term::atom("bird");
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn test_atom_constancy() {
        assert!(Term::atom("bird").is_constant());
        assert!(!Term::atom("$x").is_constant());
        assert!(!Term::atom("#y").is_constant());
        assert!(!Term::atom("?what").is_constant());
    }

    #[test]
    fn test_ordering_is_by_name() {
        let a = Term::atom("a");
        let b = Term::atom("b");
        assert!(a < b);
    }

    #[test]
    fn test_temporal_order_reverse() {
        assert_eq!(TemporalOrder::Forward.reverse(), TemporalOrder::Backward);
        assert_eq!(TemporalOrder::Backward.reverse(), TemporalOrder::Forward);
        assert_eq!(TemporalOrder::None.reverse(), TemporalOrder::None);
        assert_eq!(
            TemporalOrder::Concurrent.reverse(),
            TemporalOrder::Concurrent
        );
    }
}
