use super::VarId;
use crate::containers::HashMap;

/// Optional human readable names of variables, used in logs and for lookups by name.
#[derive(Debug, Default)]
pub(crate) struct VariableNames {
    names: HashMap<VarId, String>,
    variable_by_name: HashMap<String, VarId>,
}

impl VariableNames {
    pub(crate) fn get_name(&self, variable: VarId) -> Option<&str> {
        self.names.get(&variable).map(String::as_str)
    }

    pub(crate) fn get_variable_by_name(&self, name: &str) -> Option<VarId> {
        self.variable_by_name.get(name).copied()
    }

    /// Names `variable`, replacing any earlier name it had.
    pub(crate) fn add(&mut self, variable: VarId, name: String) {
        if let Some(old_name) = self.names.insert(variable, name.clone()) {
            let _ = self.variable_by_name.remove(&old_name);
        }
        let _ = self.variable_by_name.insert(name, variable);
    }
}
