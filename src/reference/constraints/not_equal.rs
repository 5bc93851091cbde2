use crate::{
    error::Result,
    reference::constraint::{Constraint, ConstraintDescriptor},
    solver::{semantics::DomainSemantics, solution::Solution, VariableId},
};

/// A constraint that ensures two variables never take the same value.
#[derive(Debug, Clone)]
pub struct NotEqualConstraint<S: DomainSemantics + std::fmt::Debug> {
    pub vars: [VariableId; 2],
    _phantom: std::marker::PhantomData<S>,
}

impl<S: DomainSemantics + std::fmt::Debug> NotEqualConstraint<S> {
    pub fn new(a: VariableId, b: VariableId) -> Self {
        Self {
            vars: [a, b],
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S: DomainSemantics + std::fmt::Debug> Constraint<S> for NotEqualConstraint<S> {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "NotEqualConstraint".to_string(),
            description: format!("?{} != ?{}", self.vars[0], self.vars[1]),
        }
    }

    fn revise(
        &self,
        target_var: VariableId,
        solution: &Solution<S>,
    ) -> Result<Option<Solution<S>>> {
        let other_var = if target_var == self.vars[0] {
            self.vars[1]
        } else {
            self.vars[0]
        };

        let other_domain = solution.domains.get(&other_var).unwrap();
        if !other_domain.is_singleton() {
            return Ok(None);
        }
        let value_to_remove = other_domain.get_singleton_value().unwrap();

        let target_domain = solution.domains.get(&target_var).unwrap();
        let original_size = target_domain.len();
        let new_domain = target_domain.retain(&|val| *val != value_to_remove);

        if new_domain.len() < original_size {
            let new_domains = solution.domains.update(target_var, new_domain);
            Ok(Some(Solution {
                domains: new_domains,
                semantics: solution.semantics.clone(),
            }))
        } else {
            Ok(None)
        }
    }
}
