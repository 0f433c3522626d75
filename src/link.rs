//! Task links and term links.
//!
//! A concept reaches the rest of memory through links. A term link
//! connects the concept's term to a structurally related term — component
//! to compound or compound to component — with an index path recording
//! where the relation sits. A task link points at a task worth revisiting
//! and remembers which term links it has recently been reasoned against,
//! so a firing never grinds the same premise pair twice in short order.
//!
//! Link templates are computed once per concept from the structure of its
//! term, down to three levels: deep enough to reach the arguments of a
//! product or image inside a statement inside a condition.

use crate::bag::Item;
use crate::budget::BudgetValue;
use crate::term::{Connector, Copula, Term};
use crate::task::Task;

/// Structural role of a link relative to the concept holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Task link to the concept's own term
    SelfRef,
    /// From a compound to one of its components
    Component,
    /// From a component up to a compound containing it
    Compound,
    /// From a statement to one of its sides
    ComponentStatement,
    /// From a side up to a statement containing it
    CompoundStatement,
    /// From a higher-order statement to a piece of its condition
    ComponentCondition,
    /// From a condition piece up to the higher-order statement
    CompoundCondition,
    /// Marks a product/image position reachable by equivalence transform
    Transform,
}

impl LinkKind {
    /// The component-side counterpart of a compound-side kind.
    fn toward_component(self) -> LinkKind {
        match self {
            LinkKind::Compound => LinkKind::Component,
            LinkKind::CompoundStatement => LinkKind::ComponentStatement,
            LinkKind::CompoundCondition => LinkKind::ComponentCondition,
            other => other,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            LinkKind::SelfRef => "S",
            LinkKind::Component => "c",
            LinkKind::Compound => "C",
            LinkKind::ComponentStatement => "cs",
            LinkKind::CompoundStatement => "CS",
            LinkKind::ComponentCondition => "cc",
            LinkKind::CompoundCondition => "CC",
            LinkKind::Transform => "T",
        }
    }
}

fn link_key(kind: LinkKind, indices: &[usize], target: &str) -> String {
    let mut key = String::from("@(");
    key.push_str(kind.tag());
    for i in indices {
        key.push('-');
        key.push_str(&i.to_string());
    }
    key.push(')');
    key.push_str(target);
    key
}

/// A budgeted pointer from a concept to a structurally related term.
#[derive(Debug, Clone)]
pub struct TermLink {
    target: Term,
    kind: LinkKind,
    indices: Vec<usize>,
    budget: BudgetValue,
    key: String,
}

impl TermLink {
    /// A template: kind and indices as seen from the compound's side,
    /// with no budget yet.
    pub fn template(target: Term, kind: LinkKind, indices: Vec<usize>) -> Self {
        let key = link_key(kind, &indices, target.name());
        Self {
            target,
            kind,
            indices,
            budget: BudgetValue::default(),
            key,
        }
    }

    /// Instantiate a template for `target`. When the target is the
    /// template's own target the link runs from compound to component
    /// and the kind flips to its component-side counterpart.
    pub fn from_template(target: Term, template: &TermLink, budget: BudgetValue) -> Self {
        let kind = if template.target == target {
            template.kind.toward_component()
        } else {
            template.kind
        };
        let key = link_key(kind, &template.indices, target.name());
        Self {
            target,
            kind,
            indices: template.indices.clone(),
            budget,
            key,
        }
    }

    pub fn target(&self) -> &Term {
        &self.target
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// First index of the path, when present.
    pub fn index(&self, i: usize) -> Option<usize> {
        self.indices.get(i).copied()
    }
}

impl Item for TermLink {
    fn key(&self) -> &str {
        &self.key
    }

    fn budget(&self) -> &BudgetValue {
        &self.budget
    }

    fn budget_mut(&mut self) -> &mut BudgetValue {
        &mut self.budget
    }
}

/// A budgeted pointer from a concept to a task, with novelty tracking.
#[derive(Debug, Clone)]
pub struct TaskLink {
    task: Task,
    kind: LinkKind,
    indices: Vec<usize>,
    budget: BudgetValue,
    key: String,
    /// Ring of recently reasoned term-link keys and when they were used
    recorded: Vec<(String, u64)>,
    recording_length: usize,
}

impl TaskLink {
    pub fn new(
        task: Task,
        template: Option<&TermLink>,
        budget: BudgetValue,
        recording_length: usize,
    ) -> Self {
        let (kind, indices) = match template {
            Some(t) => (t.kind, t.indices.clone()),
            None => (LinkKind::SelfRef, Vec::new()),
        };
        let key = format!(
            "{}:{}",
            link_key(kind, &indices, ""),
            crate::bag::Item::key(&task)
        );
        Self {
            task,
            kind,
            indices,
            budget,
            key,
            recorded: Vec::new(),
            recording_length,
        }
    }

    pub fn target_task(&self) -> &Task {
        &self.task
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn index(&self, i: usize) -> Option<usize> {
        self.indices.get(i).copied()
    }

    /// Whether reasoning this task against `term_link` would be news.
    ///
    /// A pairing against the task's own content is never novel. A pairing
    /// recorded within the last `recording_length` cycles is stale; older
    /// records are refreshed and the pairing allowed again.
    pub fn novel(&mut self, term_link: &TermLink, current_time: u64) -> bool {
        if term_link.target() == self.task.content() {
            return false;
        }
        let link_key = crate::bag::Item::key(term_link);
        for slot in &mut self.recorded {
            if slot.0 == link_key {
                if current_time < slot.1 + self.recording_length as u64 {
                    return false;
                }
                slot.1 = current_time;
                return true;
            }
        }
        if self.recorded.len() >= self.recording_length {
            self.recorded.remove(0);
        }
        self.recorded.push((link_key.to_string(), current_time));
        true
    }
}

impl Item for TaskLink {
    fn key(&self) -> &str {
        &self.key
    }

    fn budget(&self) -> &BudgetValue {
        &self.budget
    }

    fn budget_mut(&mut self) -> &mut BudgetValue {
        &mut self.budget
    }
}

/// Compute the term-link templates of a composite term.
///
/// Constant components at depth one get plain component links. Products
/// and images at depth two or three get transform links carrying the full
/// index path. The condition side of a higher-order statement recurses
/// with condition-kind links, which is what lets detachment and transform
/// reach inside `<(&&, ...) ==> ...>`.
pub fn prepare_component_links(whole: &Term) -> Vec<TermLink> {
    let mut links = Vec::new();
    let kind = if whole.is_statement() {
        LinkKind::CompoundStatement
    } else {
        LinkKind::Compound
    };
    walk(&mut links, kind, whole, whole);
    links
}

fn is_transformable(t: &Term) -> bool {
    t.has_connector(Connector::Product) || t.relation_index().is_some()
}

fn walk(links: &mut Vec<TermLink>, kind: LinkKind, whole: &Term, t: &Term) {
    for (i, t1) in t.components().iter().enumerate() {
        if t1.is_constant() {
            links.push(TermLink::template(t1.clone(), kind, vec![i]));
        }
        let conditional = (whole.copula() == Some(Copula::Equivalence)
            || (whole.copula() == Some(Copula::Implication) && i == 0))
            && (t1.has_connector(Connector::Conjunction)
                || t1.has_connector(Connector::Negation));
        if conditional {
            walk(links, LinkKind::CompoundCondition, whole, t1);
        } else if t1.is_composite() {
            for (j, t2) in t1.components().iter().enumerate() {
                if t2.is_constant() {
                    if is_transformable(t1) {
                        let indices = if kind == LinkKind::CompoundCondition {
                            vec![0, i, j]
                        } else {
                            vec![i, j]
                        };
                        links.push(TermLink::template(
                            t2.clone(),
                            LinkKind::Transform,
                            indices,
                        ));
                    } else {
                        links.push(TermLink::template(t2.clone(), kind, vec![i, j]));
                    }
                }
                if is_transformable(t2) {
                    for (k, t3) in t2.components().iter().enumerate() {
                        if t3.is_constant() {
                            let indices = if kind == LinkKind::CompoundCondition {
                                vec![0, i, j, k]
                            } else {
                                vec![i, j, k]
                            };
                            links.push(TermLink::template(
                                t3.clone(),
                                LinkKind::Transform,
                                indices,
                            ));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Sentence;
    use crate::stamp::{OccurrenceTime, Stamp};
    use crate::term::TemporalOrder;
    use crate::truth::TruthValue;

    fn atom(name: &str) -> Term {
        Term::atom(name)
    }

    fn task(content: Term) -> Task {
        Task::input(
            Sentence::judgment(
                content,
                TruthValue::new(1.0, 0.9),
                Stamp::input(1, 0, OccurrenceTime::Eternal),
            ),
            BudgetValue::new(0.8, 0.8, 0.9),
        )
    }

    #[test]
    fn test_statement_templates() {
        let s = Term::inheritance(&atom("bird"), &atom("animal")).unwrap();
        let templates = prepare_component_links(&s);
        assert_eq!(templates.len(), 2);
        assert!(templates
            .iter()
            .all(|t| t.kind() == LinkKind::CompoundStatement));
        assert_eq!(templates[0].indices(), &[0]);
        assert_eq!(templates[1].indices(), &[1]);
    }

    #[test]
    fn test_product_statement_gets_transform_links() {
        // <(*,tom,mary) --> uncle>
        let p = Term::product(vec![atom("tom"), atom("mary")]).unwrap();
        let s = Term::inheritance(&p, &atom("uncle")).unwrap();
        let templates = prepare_component_links(&s);
        let transforms: Vec<_> = templates
            .iter()
            .filter(|t| t.kind() == LinkKind::Transform)
            .collect();
        assert_eq!(transforms.len(), 2);
        assert_eq!(transforms[0].indices(), &[0, 0]);
        assert_eq!(transforms[1].indices(), &[0, 1]);
    }

    #[test]
    fn test_condition_links_under_implication() {
        // <(&&,a,b) ==> c>
        let cond = Term::conjunction_pair(&atom("a"), &atom("b"), TemporalOrder::None).unwrap();
        let s = Term::implication(&cond, &atom("c"), TemporalOrder::None).unwrap();
        let templates = prepare_component_links(&s);
        assert!(templates
            .iter()
            .any(|t| t.kind() == LinkKind::CompoundCondition && t.target() == &atom("a")));
        // the consequent side stays a plain statement link
        assert!(templates
            .iter()
            .any(|t| t.kind() == LinkKind::CompoundStatement && t.target() == &atom("c")));
    }

    #[test]
    fn test_template_instantiation_flips_kind() {
        let s = Term::inheritance(&atom("bird"), &atom("animal")).unwrap();
        let templates = prepare_component_links(&s);
        let template = &templates[0];
        let toward_component = TermLink::from_template(
            template.target().clone(),
            template,
            BudgetValue::default(),
        );
        assert_eq!(toward_component.kind(), LinkKind::ComponentStatement);
        let toward_compound =
            TermLink::from_template(s.clone(), template, BudgetValue::default());
        assert_eq!(toward_compound.kind(), LinkKind::CompoundStatement);
    }

    #[test]
    fn test_novelty_ring() {
        let content = Term::inheritance(&atom("a"), &atom("b")).unwrap();
        let mut task_link = TaskLink::new(task(content.clone()), None, BudgetValue::default(), 3);
        let other = TermLink::template(atom("c"), LinkKind::CompoundStatement, vec![0]);
        assert!(task_link.novel(&other, 0));
        // same pairing again within the window is stale
        assert!(!task_link.novel(&other, 1));
        // after the window it refreshes
        assert!(task_link.novel(&other, 10));
        // a link to the task's own content is never novel
        let own = TermLink::template(content, LinkKind::CompoundStatement, vec![0]);
        assert!(!task_link.novel(&own, 0));
    }
}
