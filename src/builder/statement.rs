/// What kind of top-level statement is currently being accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    /// Nothing accumulated yet (or the last statement already executed)
    #[default]
    None,
    /// A SELECT chain is in progress
    Select,
    /// A mutation chain is in progress
    Mutation,
}

/// The mutable SQL text buffer plus its clause-state flags.
///
/// One instance per logical query construction. `in_group` is true only
/// while a parenthesized sub-predicate is being rendered; it gates the
/// WHERE-keyword-insertion decision so the keyword is never emitted inside a
/// group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementBuilder {
    text: String,
    in_group: bool,
    kind: StatementKind,
}

impl StatementBuilder {
    /// The accumulated SQL text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    #[must_use]
    pub fn in_group(&self) -> bool {
        self.in_group
    }

    pub(crate) fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub(crate) fn set_kind(&mut self, kind: StatementKind) {
        self.kind = kind;
    }

    /// Set the group flag, returning the previous value so nested groups can
    /// restore it on exit.
    pub(crate) fn set_in_group(&mut self, in_group: bool) -> bool {
        std::mem::replace(&mut self.in_group, in_group)
    }

    /// Whether a WHERE keyword already appears in the accumulated text.
    #[must_use]
    pub fn contains_where(&self) -> bool {
        self.text.to_ascii_uppercase().contains("WHERE")
    }

    /// Return to the freshly-constructed state. Idempotent.
    pub fn reset(&mut self) {
        self.text.clear();
        self.in_group = false;
        self.kind = StatementKind::None;
    }
}
