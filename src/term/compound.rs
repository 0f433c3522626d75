//! Compound constructors.
//!
//! Each constructor canonicalizes and rejects degenerate forms: set
//! operands are sorted and deduplicated, commutative intersections and
//! junctions are flattened one level and collapse to their single member,
//! differences of equal terms vanish, double negation unwraps, and the
//! product/image pair reduces when composing an image with its own
//! product. `None` means the algebra has nothing to say — the caller
//! abandons that derivation.

use super::{interner, Connector, TemporalOrder, Term, TermData, TermKind};

fn render_name(
    connector: Connector,
    components: &[Term],
    order: TemporalOrder,
    relation_index: usize,
) -> String {
    let joined = |sep: &str| {
        components
            .iter()
            .map(Term::name)
            .collect::<Vec<_>>()
            .join(sep)
    };
    match connector {
        Connector::SetExt => format!("{{{}}}", joined(",")),
        Connector::SetInt => format!("[{}]", joined(",")),
        Connector::ImageExt | Connector::ImageInt => {
            let mut name = format!(
                "({},{}",
                connector.glyph(order),
                components[relation_index].name()
            );
            for (i, component) in components.iter().enumerate() {
                name.push(',');
                if i == relation_index {
                    name.push('_');
                } else {
                    name.push_str(component.name());
                }
            }
            name.push(')');
            name
        }
        _ => format!("({},{})", connector.glyph(order), joined(",")),
    }
}

fn build(
    connector: Connector,
    components: Vec<Term>,
    order: TemporalOrder,
    relation_index: usize,
) -> Term {
    let name = render_name(connector, &components, order, relation_index);
    let complexity = 1 + components.iter().map(Term::complexity).sum::<usize>();
    let constant = components.iter().all(Term::is_constant);
    Term(interner::intern(TermData {
        kind: TermKind::Compound {
            connector,
            relation_index,
        },
        components,
        temporal_order: order,
        name,
        complexity,
        constant,
    }))
}

fn sort_dedup(mut components: Vec<Term>) -> Vec<Term> {
    components.sort();
    components.dedup();
    components
}

/// Collapse to the single member, reject the empty set, build otherwise.
fn junction_from_set(connector: Connector, set: Vec<Term>) -> Option<Term> {
    let comps = sort_dedup(set);
    match comps.len() {
        0 => None,
        1 => comps.into_iter().next(),
        _ => Some(build(connector, comps, TemporalOrder::None, 0)),
    }
}

impl Term {
    /// A product `(*, x1, …, xn)`.
    pub fn product(components: Vec<Term>) -> Option<Term> {
        if components.is_empty() {
            return None;
        }
        Some(build(Connector::Product, components, TemporalOrder::None, 0))
    }

    /// Rebuild a product from an image, filling slot `index` with
    /// `component`. The slot currently holding the relation is the one
    /// being vacated, so `(/,R,_,M)` with `S` at 0 yields `(*,S,M)`.
    pub fn product_from_image(image: &Term, component: &Term, index: usize) -> Option<Term> {
        if !image.is_compound() || index >= image.size() {
            return None;
        }
        let mut comps = image.components().to_vec();
        comps[index] = component.clone();
        Term::product(comps)
    }

    /// An extensional image of `product` with the placeholder at `index`.
    ///
    /// `(/,R,_,M)` stores the relation in the vacated slot; building an
    /// image whose relation is the matching product reduces to the plain
    /// argument.
    pub fn image_ext(product: &Term, relation: &Term, index: usize) -> Option<Term> {
        Self::image(Connector::ImageExt, product, relation, index)
    }

    /// An intensional image of `product` with the placeholder at `index`.
    pub fn image_int(product: &Term, relation: &Term, index: usize) -> Option<Term> {
        Self::image(Connector::ImageInt, product, relation, index)
    }

    fn image(
        connector: Connector,
        product: &Term,
        relation: &Term,
        index: usize,
    ) -> Option<Term> {
        if !product.has_connector(Connector::Product) || index >= product.size() {
            return None;
        }
        if relation.has_connector(Connector::Product)
            && product.size() == 2
            && relation.size() == 2
        {
            if index == 0 && product.components()[1] == relation.components()[1] {
                return Some(relation.components()[0].clone());
            }
            if index == 1 && product.components()[0] == relation.components()[0] {
                return Some(relation.components()[1].clone());
            }
        }
        let mut comps = product.components().to_vec();
        comps[index] = relation.clone();
        Some(build(connector, comps, TemporalOrder::None, index))
    }

    /// Move an image's placeholder to `index`, filling the vacated slot
    /// with `component`.
    pub fn image_ext_from_image(old: &Term, component: &Term, index: usize) -> Option<Term> {
        Self::image_from_image(Connector::ImageExt, old, component, index)
    }

    /// Dual of [`Term::image_ext_from_image`].
    pub fn image_int_from_image(old: &Term, component: &Term, index: usize) -> Option<Term> {
        Self::image_from_image(Connector::ImageInt, old, component, index)
    }

    fn image_from_image(
        connector: Connector,
        old: &Term,
        component: &Term,
        index: usize,
    ) -> Option<Term> {
        if !old.has_connector(connector) || index >= old.size() {
            return None;
        }
        let old_relation_index = old.relation_index()?;
        let mut comps = old.components().to_vec();
        let relation = comps[old_relation_index].clone();
        comps[old_relation_index] = component.clone();
        comps[index] = relation;
        Some(build(connector, comps, TemporalOrder::None, index))
    }

    /// An extensional set `{a, b, …}`; sorted, deduplicated, non-empty.
    pub fn set_ext(components: Vec<Term>) -> Option<Term> {
        let comps = sort_dedup(components);
        if comps.is_empty() {
            return None;
        }
        Some(build(Connector::SetExt, comps, TemporalOrder::None, 0))
    }

    /// An intensional set `[a, b, …]`; sorted, deduplicated, non-empty.
    pub fn set_int(components: Vec<Term>) -> Option<Term> {
        let comps = sort_dedup(components);
        if comps.is_empty() {
            return None;
        }
        Some(build(Connector::SetInt, comps, TemporalOrder::None, 0))
    }

    /// Extensional intersection of two terms.
    ///
    /// `[a] & [b]` unions intensional sets, `{a,b} & {b,c}` intersects
    /// extensional sets, nested intersections flatten, and a singleton
    /// result collapses to its member.
    pub fn intersection_ext(a: &Term, b: &Term) -> Option<Term> {
        if a.has_connector(Connector::SetInt) && b.has_connector(Connector::SetInt) {
            let mut comps = a.components().to_vec();
            comps.extend(b.components().iter().cloned());
            return Term::set_int(comps);
        }
        if a.has_connector(Connector::SetExt) && b.has_connector(Connector::SetExt) {
            let comps: Vec<Term> = a
                .components()
                .iter()
                .filter(|t| b.contains_component(t))
                .cloned()
                .collect();
            return Term::set_ext(comps);
        }
        let mut set = Vec::new();
        for t in [a, b] {
            if t.has_connector(Connector::IntersectionExt) {
                set.extend(t.components().iter().cloned());
            } else {
                set.push(t.clone());
            }
        }
        junction_from_set(Connector::IntersectionExt, set)
    }

    /// Intensional intersection of two terms; the dual algebra.
    pub fn intersection_int(a: &Term, b: &Term) -> Option<Term> {
        if a.has_connector(Connector::SetExt) && b.has_connector(Connector::SetExt) {
            let mut comps = a.components().to_vec();
            comps.extend(b.components().iter().cloned());
            return Term::set_ext(comps);
        }
        if a.has_connector(Connector::SetInt) && b.has_connector(Connector::SetInt) {
            let comps: Vec<Term> = a
                .components()
                .iter()
                .filter(|t| b.contains_component(t))
                .cloned()
                .collect();
            return Term::set_int(comps);
        }
        let mut set = Vec::new();
        for t in [a, b] {
            if t.has_connector(Connector::IntersectionInt) {
                set.extend(t.components().iter().cloned());
            } else {
                set.push(t.clone());
            }
        }
        junction_from_set(Connector::IntersectionInt, set)
    }

    /// Extensional difference `(-, a, b)`; equal operands vanish and set
    /// operands subtract.
    pub fn difference_ext(a: &Term, b: &Term) -> Option<Term> {
        if a == b {
            return None;
        }
        if a.has_connector(Connector::SetExt) && b.has_connector(Connector::SetExt) {
            let comps: Vec<Term> = a
                .components()
                .iter()
                .filter(|t| !b.contains_component(t))
                .cloned()
                .collect();
            return Term::set_ext(comps);
        }
        Some(build(
            Connector::DifferenceExt,
            vec![a.clone(), b.clone()],
            TemporalOrder::None,
            0,
        ))
    }

    /// Intensional difference `(~, a, b)`; the dual of
    /// [`Term::difference_ext`].
    pub fn difference_int(a: &Term, b: &Term) -> Option<Term> {
        if a == b {
            return None;
        }
        if a.has_connector(Connector::SetInt) && b.has_connector(Connector::SetInt) {
            let comps: Vec<Term> = a
                .components()
                .iter()
                .filter(|t| !b.contains_component(t))
                .cloned()
                .collect();
            return Term::set_int(comps);
        }
        Some(build(
            Connector::DifferenceInt,
            vec![a.clone(), b.clone()],
            TemporalOrder::None,
            0,
        ))
    }

    /// A conjunction with the given temporal order.
    ///
    /// Backward order is normalized to forward with the operands
    /// reversed. Same-order nested conjunctions flatten one level.
    /// Unordered and concurrent conjunctions sort and deduplicate;
    /// sequential ones keep their operand order.
    pub fn conjunction(components: Vec<Term>, order: TemporalOrder) -> Option<Term> {
        let (components, order) = if order == TemporalOrder::Backward {
            (
                components.into_iter().rev().collect::<Vec<_>>(),
                TemporalOrder::Forward,
            )
        } else {
            (components, order)
        };
        let mut flat = Vec::new();
        for t in components {
            if t.has_connector(Connector::Conjunction) && t.temporal_order() == order {
                flat.extend(t.components().iter().cloned());
            } else {
                flat.push(t);
            }
        }
        let comps = if order == TemporalOrder::Forward {
            flat
        } else {
            sort_dedup(flat)
        };
        match comps.len() {
            0 => None,
            1 => comps.into_iter().next(),
            _ => Some(build(Connector::Conjunction, comps, order, 0)),
        }
    }

    /// Binary conjunction.
    pub fn conjunction_pair(a: &Term, b: &Term, order: TemporalOrder) -> Option<Term> {
        Term::conjunction(vec![a.clone(), b.clone()], order)
    }

    /// A disjunction; sorted, deduplicated, flattened, collapsing to a
    /// single member.
    pub fn disjunction(components: Vec<Term>) -> Option<Term> {
        let mut flat = Vec::new();
        for t in components {
            if t.has_connector(Connector::Disjunction) {
                flat.extend(t.components().iter().cloned());
            } else {
                flat.push(t);
            }
        }
        junction_from_set(Connector::Disjunction, flat)
    }

    /// Binary disjunction.
    pub fn disjunction_pair(a: &Term, b: &Term) -> Option<Term> {
        Term::disjunction(vec![a.clone(), b.clone()])
    }

    /// Negation `(--, a)`. Negating a negation unwraps it.
    pub fn negation(t: &Term) -> Term {
        if t.has_connector(Connector::Negation) {
            return t.components()[0].clone();
        }
        build(
            Connector::Negation,
            vec![t.clone()],
            TemporalOrder::None,
            0,
        )
    }

    /// Rebuild a compound of `template`'s operator from new children,
    /// re-canonicalizing. `None` when the result is degenerate.
    pub fn make(template: &Term, components: Vec<Term>) -> Option<Term> {
        let connector = template.connector()?;
        match connector {
            Connector::Product => Term::product(components),
            Connector::SetExt => Term::set_ext(components),
            Connector::SetInt => Term::set_int(components),
            Connector::IntersectionExt => {
                junction_from_set(Connector::IntersectionExt, components)
            }
            Connector::IntersectionInt => {
                junction_from_set(Connector::IntersectionInt, components)
            }
            Connector::DifferenceExt | Connector::DifferenceInt => match components.len() {
                1 => components.into_iter().next(),
                2 => {
                    if connector == Connector::DifferenceExt {
                        Term::difference_ext(&components[0], &components[1])
                    } else {
                        Term::difference_int(&components[0], &components[1])
                    }
                }
                _ => None,
            },
            Connector::Conjunction => Term::conjunction(components, template.temporal_order()),
            Connector::Disjunction => Term::disjunction(components),
            Connector::Negation => {
                if components.len() == 1 {
                    Some(Term::negation(&components[0]))
                } else {
                    None
                }
            }
            Connector::ImageExt | Connector::ImageInt => {
                let relation_index = template.relation_index()?;
                if relation_index >= components.len() {
                    return None;
                }
                Some(build(
                    connector,
                    components,
                    TemporalOrder::None,
                    relation_index,
                ))
            }
        }
    }
}
