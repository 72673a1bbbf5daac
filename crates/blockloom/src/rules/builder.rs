// ABOUTME: Mutable accumulator building ImportRules with merge-safe operations.
// ABOUTME: Union semantics for cleanup lists and block selectors/variants, replace-by-name transformers.

//! Rule document builder.
//!
//! The builder owns one rule document exclusively and mutates it through
//! named operations; [`RuleBuilder::build`] returns an immutable snapshot.
//!
//! Key behaviors:
//! - `add_cleanup` unions selectors into a phase list, de-duplicating while
//!   preserving first-insertion order.
//! - `add_block` merges by type: scalar fields of the newer rule win,
//!   `selectors` and `variants` become the de-duplicated union, and the
//!   merged rule is re-appended at the tail (the original slot is given
//!   up). See DESIGN.md for the slot-semantics decision.
//! - `add_transformer` replaces by name, no merge.

use crate::rules::{BlockRule, CleanupSelector, ImportRules, TransformRule};

/// Which cleanup phase a selector list targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPhase {
    #[default]
    Start,
    End,
}

/// Accumulator for one rule document.
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    rules: ImportRules,
}

impl RuleBuilder {
    /// Starts from the default document (`root: "main"`, everything empty).
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing rule document.
    pub fn from_rules(rules: ImportRules) -> Self {
        Self { rules }
    }

    /// Unconditionally overwrites the root selector.
    pub fn set_root(&mut self, selector: impl Into<String>) -> &mut Self {
        self.rules.root = selector.into();
        self
    }

    /// Unions selectors into the given cleanup phase, de-duplicating.
    pub fn add_cleanup<I, S>(&mut self, selectors: I, phase: CleanupPhase) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CleanupSelector>,
    {
        let list = match phase {
            CleanupPhase::Start => &mut self.rules.cleanup.start,
            CleanupPhase::End => &mut self.rules.cleanup.end,
        };
        for selector in selectors {
            let selector = selector.into();
            if !list.contains(&selector) {
                list.push(selector);
            }
        }
        self
    }

    /// Adds a block rule, merging with an existing rule of the same type.
    pub fn add_block(&mut self, rule: BlockRule) -> &mut Self {
        let mut rule = rule;
        if let Some(pos) = self
            .rules
            .blocks
            .iter()
            .position(|b| b.block_type == rule.block_type)
        {
            let old = self.rules.blocks.remove(pos);
            rule.selectors = union(old.selectors, rule.selectors);
            rule.variants = union(old.variants, rule.variants);
        }
        self.rules.blocks.push(rule);
        self
    }

    /// Adds a transformer, replacing any existing entry with the same name.
    pub fn add_transformer(&mut self, rule: TransformRule) -> &mut Self {
        match self
            .rules
            .transformers
            .iter()
            .position(|t| t.name == rule.name)
        {
            Some(pos) => self.rules.transformers[pos] = rule,
            None => self.rules.transformers.push(rule),
        }
        self
    }

    /// Looks up a block rule by type.
    pub fn find_block(&self, block_type: &str) -> Option<&BlockRule> {
        self.rules.blocks.iter().find(|b| b.block_type == block_type)
    }

    /// Looks up a transformer by name.
    pub fn find_transformer(&self, name: &str) -> Option<&TransformRule> {
        self.rules.transformers.iter().find(|t| t.name == name)
    }

    /// Returns the current immutable snapshot.
    pub fn build(&self) -> ImportRules {
        self.rules.clone()
    }
}

fn union(mut base: Vec<String>, extra: Vec<String>) -> Vec<String> {
    for item in extra {
        if !base.contains(&item) {
            base.push(item);
        }
    }
    base
}
