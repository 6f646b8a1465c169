use crate::dsl::Expr;
use crate::error::{Error, Result};
use crate::variable::VariableKey;

#[derive(Clone, Debug)]
pub struct Rules<T>(pub(crate) Vec<Rule<T>>);

impl<T> Rules<T> {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// The consequence must be a single `variable.is(term)`; anything compound is rejected.
    pub fn add(&mut self, premise: Expr<T>, consequence: Expr<T>) -> Result<()> {
        let Expr::Is(output, term) = consequence else {
            return Err(Error::CompoundConsequence);
        };

        self.0.push(Rule {
            premise,
            output,
            term,
        });

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for Rules<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Rule<T> {
    pub(crate) premise: Expr<T>,
    pub(crate) output: VariableKey,
    pub(crate) term: T,
}
