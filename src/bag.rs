//! The priority bag.
//!
//! A bag is a bounded collection that behaves like a probabilistic
//! priority queue: items sit in one of `levels` priority bands, takeout
//! samples a band with probability proportional to its index (so hot
//! items come out overwhelmingly more often, but nothing starves), and
//! when capacity is exceeded the lowest-band item is displaced. Putting
//! an item back decays its priority toward its quality floor, which is
//! how everything in the system is eventually forgotten.
//!
//! All randomness comes from the caller's generator, so a seeded run
//! reproduces the same takeout sequence.

use std::collections::{HashMap, VecDeque};

use rand::Rng;

use crate::budget::{self, BudgetValue};

/// Anything a bag can hold: keyed, budgeted, mergeable.
pub trait Item {
    /// Stable identity within one bag.
    fn key(&self) -> &str;
    fn budget(&self) -> &BudgetValue;
    fn budget_mut(&mut self) -> &mut BudgetValue;

    /// Fold a same-key duplicate into this item.
    fn merge(&mut self, other: &Self) {
        let other_budget = *other.budget();
        self.budget_mut().merge(&other_budget);
    }
}

/// Sizing and decay parameters of one bag.
#[derive(Debug, Clone, Copy)]
pub struct BagConfig {
    pub capacity: usize,
    pub levels: usize,
    /// Cycles an untouched item stays relevant; drives put-back decay
    pub forget_cycles: f32,
    /// Quality floor factor for the decay
    pub relative_threshold: f32,
}

/// A bounded probabilistic priority queue.
#[derive(Debug)]
pub struct Bag<E: Item> {
    config: BagConfig,
    index: HashMap<String, E>,
    levels: Vec<VecDeque<String>>,
}

impl<E: Item> Bag<E> {
    pub fn new(config: BagConfig) -> Self {
        let levels = (0..config.levels).map(|_| VecDeque::new()).collect();
        Self {
            config,
            index: HashMap::new(),
            levels,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&E> {
        self.index.get(key)
    }

    /// Iterate items in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.index.values()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        for level in &mut self.levels {
            level.clear();
        }
    }

    /// The band an item's priority maps to.
    fn level_of(&self, budget: &BudgetValue) -> usize {
        let raw = (budget.priority() * self.config.levels as f32).ceil() as usize;
        raw.saturating_sub(1).min(self.config.levels - 1)
    }

    /// Insert an item. A same-key occupant is merged into the incoming
    /// item. If capacity is exceeded the lowest-band item is displaced
    /// and returned — possibly the incoming item itself.
    pub fn put_in(&mut self, mut item: E) -> Option<E> {
        let key = item.key().to_string();
        if let Some(old) = self.remove(&key) {
            item.merge(&old);
        }
        let level = self.level_of(item.budget());
        self.levels[level].push_back(key.clone());
        self.index.insert(key, item);
        if self.index.len() > self.config.capacity {
            return self.displace_lowest();
        }
        None
    }

    /// Decay the item's priority, then insert it.
    pub fn put_back(&mut self, mut item: E) -> Option<E> {
        budget::forget(
            item.budget_mut(),
            self.config.forget_cycles,
            self.config.relative_threshold,
        );
        self.put_in(item)
    }

    /// Remove and return an item, sampling bands with probability
    /// proportional to their index.
    pub fn take_out<R: Rng>(&mut self, rng: &mut R) -> Option<E> {
        if self.index.is_empty() {
            return None;
        }
        let total: usize = self
            .levels
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(i, _)| i + 1)
            .sum();
        let mut pick = rng.gen_range(0..total);
        for (i, level) in self.levels.iter_mut().enumerate() {
            if level.is_empty() {
                continue;
            }
            let weight = i + 1;
            if pick < weight {
                let key = level.pop_front().expect("non-empty level");
                return self.index.remove(&key);
            }
            pick -= weight;
        }
        unreachable!("weights summed over non-empty levels");
    }

    /// Remove and return the item with the given key.
    pub fn pick_out(&mut self, key: &str) -> Option<E> {
        self.remove(key)
    }

    fn remove(&mut self, key: &str) -> Option<E> {
        let item = self.index.remove(key)?;
        let level = self.level_of(item.budget());
        if let Some(pos) = self.levels[level].iter().position(|k| k == key) {
            self.levels[level].remove(pos);
        }
        Some(item)
    }

    fn displace_lowest(&mut self) -> Option<E> {
        let lowest = self.levels.iter().position(|l| !l.is_empty())?;
        let key = self.levels[lowest].pop_front().expect("non-empty level");
        self.index.remove(&key)
    }
}
