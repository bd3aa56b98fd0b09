//! Ordered rule tables with first-match-wins evaluation.
//!
//! A scorer first reduces a bar to a small context of booleans, then walks its
//! table top to bottom and returns the value of the first rule whose predicate
//! holds. Rule order is therefore the specificity order: the most specific
//! combination is listed first. No match scores 0.

/// One row of a rule table.
pub struct Rule<C> {
    pub name: &'static str,
    pub value: f64,
    pub when: fn(&C) -> bool,
}

impl<C> std::fmt::Debug for Rule<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

/// An ordered list of rules over a context type `C`.
pub struct RuleTable<C: 'static> {
    rules: &'static [Rule<C>],
}

impl<C: 'static> RuleTable<C> {
    pub const fn new(rules: &'static [Rule<C>]) -> Self {
        Self { rules }
    }

    /// First matching rule, if any.
    pub fn first_match(&self, ctx: &C) -> Option<&'static Rule<C>> {
        self.rules.iter().find(|rule| (rule.when)(ctx))
    }

    /// Value of the first matching rule, or 0 when nothing matches.
    pub fn score(&self, ctx: &C) -> f64 {
        self.first_match(ctx).map_or(0.0, |rule| rule.value)
    }

    /// Smallest and largest value the table can produce (0 included, since
    /// "no match" is always possible in principle).
    pub fn bounds(&self) -> (f64, f64) {
        self.rules
            .iter()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), r| (lo.min(r.value), hi.max(r.value)))
    }

    pub fn rules(&self) -> &'static [Rule<C>] {
        self.rules
    }
}
