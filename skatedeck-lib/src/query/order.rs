//! Ordering types for roster queries.

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the wire form used in query strings ("asc"/"desc").
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    /// Parses a direction from its wire form. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Direction> {
        match s {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }
}

/// Columns the roster can be sorted by.
///
/// The set is closed; query strings naming any other column fall back to
/// the default sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Age,
    Email,
    Stats,
    Stance,
    DeckPrice,
}

impl SortColumn {
    /// Returns the wire form of this column, which doubles as the SQL
    /// column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Age => "age",
            SortColumn::Email => "email",
            SortColumn::Stats => "stats",
            SortColumn::Stance => "stance",
            SortColumn::DeckPrice => "deck_price",
        }
    }

    /// Returns the SQL column this sort targets. Differs from the wire form
    /// only for the price column, which is stored as whole cents.
    pub(crate) fn sql_column(&self) -> &'static str {
        match self {
            SortColumn::DeckPrice => "deck_price_cents",
            _ => self.as_str(),
        }
    }

    /// Parses a sort column from its wire form. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<SortColumn> {
        match s {
            "name" => Some(SortColumn::Name),
            "age" => Some(SortColumn::Age),
            "email" => Some(SortColumn::Email),
            "stats" => Some(SortColumn::Stats),
            "stance" => Some(SortColumn::Stance),
            "deck_price" => Some(SortColumn::DeckPrice),
            _ => None,
        }
    }
}

/// Specifies the ordering of query results.
///
/// The roster sorts by a single column at a time.
///
/// # Example
///
/// ```
/// use skatedeck_lib::query::{OrderBy, SortColumn};
///
/// let order = OrderBy::desc(SortColumn::DeckPrice);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    /// The column to sort by.
    pub column: SortColumn,
    /// The sort direction.
    pub direction: Direction,
}

impl OrderBy {
    /// Creates an ascending order on a column.
    pub fn asc(column: SortColumn) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    /// Creates a descending order on a column.
    pub fn desc(column: SortColumn) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }
}
