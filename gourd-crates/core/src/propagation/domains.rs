use crate::environment::Environment;
use crate::variables::VarId;
use crate::variables::Variables;

/// Read-only access to the current domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    pub(crate) environment: &'a Environment,
    pub(crate) variables: &'a Variables,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(environment: &'a Environment, variables: &'a Variables) -> Self {
        Domains {
            environment,
            variables,
        }
    }
}

/// Queries on the current domains, implemented by every context handed to propagators.
pub trait ReadDomains {
    #[doc(hidden)]
    fn domains(&self) -> Domains<'_>;

    fn lower_bound(&self, variable: VarId) -> i32 {
        let domains = self.domains();
        domains.variables.lower_bound(domains.environment, variable)
    }

    fn upper_bound(&self, variable: VarId) -> i32 {
        let domains = self.domains();
        domains.variables.upper_bound(domains.environment, variable)
    }

    fn size(&self, variable: VarId) -> u64 {
        let domains = self.domains();
        domains.variables.size(domains.environment, variable)
    }

    fn contains(&self, variable: VarId, value: i32) -> bool {
        let domains = self.domains();
        domains
            .variables
            .contains(domains.environment, variable, value)
    }

    fn is_fixed(&self, variable: VarId) -> bool {
        let domains = self.domains();
        domains.variables.is_fixed(domains.environment, variable)
    }

    fn fixed_value(&self, variable: VarId) -> Option<i32> {
        let domains = self.domains();
        domains.variables.fixed_value(domains.environment, variable)
    }

    /// The smallest value in the domain of `variable` which is strictly larger than `value`.
    fn next_value(&self, variable: VarId, value: i32) -> Option<i32> {
        let domains = self.domains();
        domains
            .variables
            .next_value(domains.environment, variable, value)
    }

    /// The largest value in the domain of `variable` which is strictly smaller than `value`.
    fn previous_value(&self, variable: VarId, value: i32) -> Option<i32> {
        let domains = self.domains();
        domains
            .variables
            .previous_value(domains.environment, variable, value)
    }
}

impl ReadDomains for Domains<'_> {
    fn domains(&self) -> Domains<'_> {
        *self
    }
}
