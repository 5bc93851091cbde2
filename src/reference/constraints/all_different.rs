use im::HashSet;

use crate::{
    error::Result,
    reference::constraint::{Constraint, ConstraintDescriptor},
    solver::{semantics::DomainSemantics, solution::Solution, VariableId},
};

/// A constraint that ensures every variable in a group takes a unique value.
#[derive(Debug, Clone)]
pub struct AllDifferentConstraint<S: DomainSemantics + std::fmt::Debug> {
    pub vars: Vec<VariableId>,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: DomainSemantics + std::fmt::Debug> AllDifferentConstraint<S> {
    pub fn new(vars: Vec<VariableId>) -> Self {
        Self {
            vars,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S: DomainSemantics + std::fmt::Debug> Constraint<S> for AllDifferentConstraint<S> {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        let vars_str = self
            .vars
            .iter()
            .map(|v| format!("?{}", v))
            .collect::<Vec<_>>()
            .join(", ");
        ConstraintDescriptor {
            name: "AllDifferentConstraint".to_string(),
            description: format!("AllDifferent({})", vars_str),
        }
    }

    fn revise(
        &self,
        target_var: VariableId,
        solution: &Solution<S>,
    ) -> Result<Option<Solution<S>>> {
        let mut fixed_values_to_remove = HashSet::new();
        for var in &self.vars {
            if *var != target_var {
                if let Some(domain) = solution.domains.get(var) {
                    if let Some(fixed_value) = domain.get_singleton_value() {
                        fixed_values_to_remove.insert(fixed_value);
                    }
                }
            }
        }

        if fixed_values_to_remove.is_empty() {
            return Ok(None);
        }

        if let Some(target_domain) = solution.domains.get(&target_var) {
            let original_size = target_domain.len();
            let new_domain = target_domain.retain(&|val| !fixed_values_to_remove.contains(val));
            if new_domain.len() < original_size {
                let new_domains = solution.domains.update(target_var, new_domain);
                return Ok(Some(Solution {
                    domains: new_domains,
                    semantics: solution.semantics.clone(),
                }));
            }
        }

        Ok(None)
    }
}
