use crate::types::RowValues;

/// The ordered values contributed by a single clause call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterGroup(pub Vec<RowValues>);

/// Ordered list of parameter groups for the current statement construction.
///
/// Groups are stored in call order; flattening concatenates them in group
/// order then intra-group order, which must line up one-to-one with the `?`
/// markers in the statement text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBinder {
    groups: Vec<ParameterGroup>,
}

impl ParameterBinder {
    /// Register the values of one clause call as a new group.
    pub(crate) fn push_group(&mut self, values: Vec<RowValues>) {
        self.groups.push(ParameterGroup(values));
    }

    /// All groups, in call order.
    #[must_use]
    pub fn groups(&self) -> &[ParameterGroup] {
        &self.groups
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One ordered sequence of scalar values matching placeholder order in
    /// the statement text.
    #[must_use]
    pub fn flatten(&self) -> Vec<RowValues> {
        self.groups
            .iter()
            .flat_map(|group| group.0.iter().cloned())
            .collect()
    }

    /// Return to the freshly-constructed state. Idempotent.
    pub fn reset(&mut self) {
        self.groups.clear();
    }
}
