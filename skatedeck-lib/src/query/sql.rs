//! SQL fragment generation for record queries.

use super::Direction;
use super::Filter;
use super::OrderBy;

/// Converts a `Filter` to a SQL predicate, pushing bound values onto
/// `params` in positional order.
///
/// Field names come from the closed set the codec constructs; only values
/// travel as parameters.
pub(crate) fn filter_to_sql(filter: &Filter, params: &mut Vec<String>) -> String {
    match filter {
        Filter::Eq(field, value) => {
            params.push(value.clone());
            format!("{} = ?", field)
        }
        Filter::Contains(field, value) => {
            // SQLite LIKE is case-insensitive for ASCII, matching the
            // substring filter's contract.
            params.push(format!("%{}%", escape_like(value)));
            format!("{} LIKE ? ESCAPE '\\'", field)
        }
        Filter::And(filters) => {
            if filters.is_empty() {
                return String::new();
            }
            let parts: Vec<_> = filters.iter().map(|f| filter_to_sql(f, params)).collect();
            format!("({})", parts.join(" AND "))
        }
    }
}

/// Converts an `OrderBy` to a SQL `ORDER BY` fragment.
pub(crate) fn order_to_sql(order: &OrderBy) -> String {
    let direction = match order.direction {
        Direction::Asc => "ASC",
        Direction::Desc => "DESC",
    };
    format!("{} {}", order.column.sql_column(), direction)
}

/// Escapes LIKE wildcards so filter text matches literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Direction;
    use crate::query::SortColumn;

    #[test]
    fn test_eq_filter() {
        let mut params = Vec::new();
        let sql = filter_to_sql(&Filter::eq("stance", "goofy"), &mut params);
        assert_eq!(sql, "stance = ?");
        assert_eq!(params, vec!["goofy"]);
    }

    #[test]
    fn test_contains_filter() {
        let mut params = Vec::new();
        let sql = filter_to_sql(&Filter::contains("email", "alice"), &mut params);
        assert_eq!(sql, "email LIKE ? ESCAPE '\\'");
        assert_eq!(params, vec!["%alice%"]);
    }

    #[test]
    fn test_combined_filter() {
        let mut params = Vec::new();
        let filter = Filter::and([
            Filter::contains("email", "alice"),
            Filter::eq("stance", "goofy"),
        ]);
        let sql = filter_to_sql(&filter, &mut params);
        assert_eq!(sql, "(email LIKE ? ESCAPE '\\' AND stance = ?)");
        assert_eq!(params, vec!["%alice%", "goofy"]);
    }

    #[test]
    fn test_like_wildcards_match_literally() {
        let mut params = Vec::new();
        filter_to_sql(&Filter::contains("email", "100%_a"), &mut params);
        assert_eq!(params, vec!["%100\\%\\_a%"]);
    }

    #[test]
    fn test_order_to_sql() {
        assert_eq!(
            order_to_sql(&OrderBy::asc(SortColumn::Email)),
            "email ASC"
        );
        assert_eq!(
            order_to_sql(&OrderBy {
                column: SortColumn::DeckPrice,
                direction: Direction::Desc,
            }),
            "deck_price_cents DESC"
        );
    }
}
