//! Filter types for roster queries.

/// A filter condition for querying records.
///
/// Filters combine with logical AND to build the roster's compound
/// conditions; there is no OR in the browsing surface.
///
/// # Example
///
/// ```
/// use skatedeck_lib::query::Filter;
///
/// // Substring filter
/// let filter = Filter::contains("email", "alice");
///
/// // Combined filter
/// let filter = Filter::contains("email", "alice")
///     .and_also(Filter::eq("stance", "goofy"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Case-insensitive substring match on a text field.
    Contains(String, String),
    /// Exact match on a text field.
    Eq(String, String),
    /// Logical AND of multiple filters.
    And(Vec<Filter>),
}

impl Filter {
    /// Creates a substring filter on a text field.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains(field.into(), value.into())
    }

    /// Creates an equality filter on a text field.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Creates a logical AND of multiple filters.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Combines this filter with another using logical AND.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            _ => Filter::And(vec![self, other]),
        }
    }
}
