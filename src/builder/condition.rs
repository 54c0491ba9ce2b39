use std::fmt;

use crate::types::RowValues;

/// Joining keyword between predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prefix {
    #[default]
    And,
    Or,
}

impl Prefix {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Prefix::And => "AND",
            Prefix::Or => "OR",
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the wildcard lands on a LIKE needle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikePosition {
    /// Match anywhere: `%needle%`
    #[default]
    Any,
    /// Match at the end: `%needle`
    Prefix,
    /// Match at the start: `needle%`
    Suffix,
}

/// A where-style predicate argument.
///
/// Three shapes: one comparison, a run of comparisons joined by the call's
/// prefix, or a parenthesized sub-predicate carrying its own joiner. The
/// value slot of every triple is replaced by a `?` marker during flattening;
/// the values themselves travel to the parameter binder in triple order.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// One `column operator value` comparison
    Flat(String, String, RowValues),
    /// A run of comparisons, joined by the enclosing call's prefix
    All(Vec<(String, String, RowValues)>),
    /// A parenthesized sub-predicate; children are joined by the group's own
    /// prefix and may nest further groups
    Group(Vec<Condition>, Prefix),
}

impl Condition {
    pub fn flat(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<RowValues>,
    ) -> Self {
        Condition::Flat(column.into(), operator.into(), value.into())
    }

    pub fn all<C, O, V, I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (C, O, V)>,
        C: Into<String>,
        O: Into<String>,
        V: Into<RowValues>,
    {
        Condition::All(
            triples
                .into_iter()
                .map(|(c, o, v)| (c.into(), o.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn group(children: Vec<Condition>, prefix: Prefix) -> Self {
        Condition::Group(children, prefix)
    }
}

/// Flatten a condition into placeholder-bearing text plus the ordered values
/// the markers stand for.
///
/// The last element of each triple is the value; it is replaced by `?` and
/// the remaining elements are joined with single spaces. Runs of triples are
/// joined by `prefix`; groups render their own parentheses and join children
/// by their own prefix. The number of markers in the returned text always
/// equals the number of returned values.
pub(crate) fn flatten(condition: &Condition, prefix: Prefix) -> (String, Vec<RowValues>) {
    match condition {
        Condition::Flat(column, operator, value) => {
            (format!("{column} {operator} ?"), vec![value.clone()])
        }
        Condition::All(triples) => {
            let mut fragments = Vec::with_capacity(triples.len());
            let mut values = Vec::with_capacity(triples.len());
            for (column, operator, value) in triples {
                fragments.push(format!("{column} {operator} ?"));
                values.push(value.clone());
            }
            (fragments.join(&format!(" {prefix} ")), values)
        }
        Condition::Group(children, inner) => {
            let mut text = String::from("(");
            let mut values = Vec::new();
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    text.push_str(&format!(" {inner} "));
                }
                let (fragment, child_values) = flatten(child, *inner);
                text.push_str(&fragment);
                values.extend(child_values);
            }
            text.push(')');
            (text, values)
        }
    }
}

/// Wrap a LIKE needle with `%` wildcards according to the match position.
#[must_use]
pub(crate) fn wrap_needle(needle: &str, position: LikePosition) -> String {
    match position {
        LikePosition::Any => format!("%{needle}%"),
        LikePosition::Prefix => format!("%{needle}"),
        LikePosition::Suffix => format!("{needle}%"),
    }
}
