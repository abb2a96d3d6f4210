//! Browse state and its query-string codec.

use crate::model::Stance;

use super::Direction;
use super::Filter;
use super::OrderBy;
use super::SortColumn;

/// Centralized default values for browse parameters.
///
/// Every fallback in the codec goes through [`DEFAULTS`]; no call site
/// carries its own literal.
#[derive(Debug, Clone, Copy)]
pub struct QueryDefaults {
    /// Default page number (1-based).
    pub page: usize,
    /// Default records per page.
    pub items: usize,
    /// Default sort column.
    pub sort: SortColumn,
    /// Default sort direction.
    pub order: Direction,
}

/// The defaults applied wherever a parameter is absent or unusable.
pub const DEFAULTS: QueryDefaults = QueryDefaults {
    page: 1,
    items: 10,
    sort: SortColumn::Email,
    order: Direction::Asc,
};

/// The browse state for the server-controlled view.
///
/// This tuple fully determines what the view displays. It round-trips
/// losslessly through a URL-style query string: `parse` then `encode` (or
/// the reverse) always converge on the same state.
///
/// # Example
///
/// ```
/// use skatedeck_lib::query::QueryState;
///
/// let state = QueryState::parse("page=2&items=20&email=alice");
/// assert_eq!(state.page, 2);
/// assert_eq!(state.email.as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// 1-based page number.
    pub page: usize,
    /// Records per page.
    pub items: usize,
    /// Sort column.
    pub sort: SortColumn,
    /// Sort direction.
    pub order: Direction,
    /// Substring filter on the email field, if any.
    pub email: Option<String>,
    /// Exact-match filter on stance, if any.
    pub stance: Option<Stance>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: DEFAULTS.page,
            items: DEFAULTS.items,
            sort: DEFAULTS.sort,
            order: DEFAULTS.order,
            email: None,
            stance: None,
        }
    }
}

impl QueryState {
    /// Parses browse state from a query string.
    ///
    /// Absent parameters take their defaults. Unusable values (non-numeric
    /// or zero page/items, unknown sort column, order, or stance) clamp to
    /// the defaults rather than erroring. A repeated parameter keeps its
    /// last occurrence.
    pub fn parse(query: &str) -> Self {
        let mut state = Self::default();

        for (name, value) in split_pairs(query) {
            match name.as_str() {
                "page" => {
                    if let Some(page) = parse_positive(&value) {
                        state.page = page;
                    }
                }
                "items" => {
                    if let Some(items) = parse_positive(&value) {
                        state.items = items;
                    }
                }
                "sort" => {
                    if let Some(sort) = SortColumn::parse(&value) {
                        state.sort = sort;
                    }
                }
                "order" => {
                    if let Some(order) = Direction::parse(&value) {
                        state.order = order;
                    }
                }
                "email" => {
                    state.email = if value.is_empty() { None } else { Some(value) };
                }
                "stance" => {
                    state.stance = Stance::parse(&value);
                }
                _ => {}
            }
        }

        state
    }

    /// Encodes this state as a complete query string.
    ///
    /// Pagination and sort parameters are always emitted; filters are
    /// emitted only when set. A cleared filter is absent from the string,
    /// never serialized as a literal "null".
    pub fn encode(&self) -> String {
        let mut params = vec![
            format!("page={}", self.page),
            format!("items={}", self.items),
            format!("sort={}", self.sort.as_str()),
            format!("order={}", self.order.as_str()),
        ];

        if let Some(ref email) = self.email {
            if !email.is_empty() {
                params.push(format!("email={}", urlencoding::encode(email)));
            }
        }
        if let Some(stance) = self.stance {
            params.push(format!("stance={}", stance.as_str()));
        }

        params.join("&")
    }

    /// Lowers this state to the database query it describes.
    ///
    /// Offset is `(page - 1) * items` and limit is `items`. Filters combine
    /// with AND; when neither is set the query carries no filter clause at
    /// all.
    pub fn to_query(&self) -> RecordQuery {
        let mut filters = Vec::new();
        if let Some(ref email) = self.email {
            if !email.is_empty() {
                filters.push(Filter::contains("email", email.clone()));
            }
        }
        if let Some(stance) = self.stance {
            filters.push(Filter::eq("stance", stance.as_str()));
        }

        RecordQuery {
            limit: self.items,
            offset: (self.page - 1) * self.items,
            filter: filters.into_iter().reduce(Filter::and_also),
            order: OrderBy {
                column: self.sort,
                direction: self.order,
            },
        }
    }
}

/// A concrete database query derived from browse state.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    /// Maximum number of records to return.
    pub limit: usize,
    /// Number of matching records to skip.
    pub offset: usize,
    /// Filter predicate, absent when no filters are set.
    pub filter: Option<Filter>,
    /// Single-column ordering.
    pub order: OrderBy,
}

/// A single parameter change to merge into a query string.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamUpdate {
    /// Set the parameter to a new value, replacing any existing one.
    Set(String, String),
    /// Remove the parameter entirely.
    Remove(String),
}

impl ParamUpdate {
    /// Creates an update that sets `name` to `value`.
    pub fn set(name: impl Into<String>, value: impl ToString) -> Self {
        ParamUpdate::Set(name.into(), value.to_string())
    }

    /// Creates an update that removes `name`.
    pub fn remove(name: impl Into<String>) -> Self {
        ParamUpdate::Remove(name.into())
    }
}

/// Merges a set of parameter updates into an existing query string,
/// producing the new complete query string.
///
/// Parameters not named by any update pass through unchanged, in order. A
/// `Set` replaces the parameter in place (or appends it); a `Remove`
/// deletes it rather than leaving a "null" value behind.
///
/// # Example
///
/// ```
/// use skatedeck_lib::query::{merge_query_string, ParamUpdate};
///
/// let next = merge_query_string(
///     "page=3&email=alice",
///     &[ParamUpdate::set("page", 1), ParamUpdate::remove("email")],
/// );
/// assert_eq!(next, "page=1");
/// ```
pub fn merge_query_string(current: &str, updates: &[ParamUpdate]) -> String {
    let mut pairs = split_pairs(current);

    for update in updates {
        match update {
            ParamUpdate::Set(name, value) => {
                match pairs.iter_mut().find(|(n, _)| n == name) {
                    Some((_, v)) => *v = value.clone(),
                    None => pairs.push((name.clone(), value.clone())),
                }
            }
            ParamUpdate::Remove(name) => {
                pairs.retain(|(n, _)| n != name);
            }
        }
    }

    pairs
        .into_iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(&name),
                urlencoding::encode(&value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Splits a query string into decoded name/value pairs, skipping anything
/// that fails to percent-decode.
fn split_pairs(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);

    query
        .split('&')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (name, value) = part.split_once('=').unwrap_or((part, ""));
            let name = urlencoding::decode(name).ok()?;
            let value = urlencoding::decode(value).ok()?;
            Some((name.into_owned(), value.into_owned()))
        })
        .collect()
}

fn parse_positive(value: &str) -> Option<usize> {
    value.parse::<usize>().ok().filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_yields_defaults() {
        let state = QueryState::parse("");
        assert_eq!(state, QueryState::default());
        assert_eq!(state.page, 1);
        assert_eq!(state.items, 10);
        assert_eq!(state.sort, SortColumn::Email);
        assert_eq!(state.order, Direction::Asc);
        assert_eq!(state.email, None);
        assert_eq!(state.stance, None);
    }

    #[test]
    fn test_parse_clamps_unusable_values() {
        let state = QueryState::parse("page=0&items=abc&sort=height&order=sideways&stance=regular");
        assert_eq!(state, QueryState::default());
    }

    #[test]
    fn test_round_trip() {
        let states = [
            QueryState::default(),
            QueryState {
                page: 7,
                items: 30,
                sort: SortColumn::DeckPrice,
                order: Direction::Desc,
                email: Some("alice".into()),
                stance: Some(Stance::Goofy),
            },
            QueryState {
                email: Some("a b+c@example.com".into()),
                ..QueryState::default()
            },
        ];

        for state in states {
            assert_eq!(QueryState::parse(&state.encode()), state);
        }
    }

    #[test]
    fn test_encode_omits_cleared_filters() {
        let encoded = QueryState::default().encode();
        assert!(!encoded.contains("email"));
        assert!(!encoded.contains("stance"));
        assert!(!encoded.contains("null"));
    }

    #[test]
    fn test_parse_keeps_last_occurrence() {
        let state = QueryState::parse("page=2&page=5");
        assert_eq!(state.page, 5);
    }

    #[test]
    fn test_merge_sets_and_removes() {
        let next = merge_query_string(
            "page=3&items=20&email=alice&stance=mongo",
            &[
                ParamUpdate::set("page", 1),
                ParamUpdate::remove("stance"),
                ParamUpdate::set("order", "desc"),
            ],
        );
        assert_eq!(next, "page=1&items=20&email=alice&order=desc");
    }

    #[test]
    fn test_merge_preserves_unknown_parameters() {
        let next = merge_query_string("theme=dark&page=2", &[ParamUpdate::set("page", 3)]);
        assert_eq!(next, "theme=dark&page=3");
    }

    #[test]
    fn test_offset_law() {
        for (page, items) in [(1, 10), (2, 10), (10, 10), (3, 25)] {
            let state = QueryState {
                page,
                items,
                ..QueryState::default()
            };
            let query = state.to_query();
            assert_eq!(query.offset, (page - 1) * items);
            assert_eq!(query.limit, items);
        }
    }

    #[test]
    fn test_filters_combine_with_and() {
        let state = QueryState {
            email: Some("alice".into()),
            stance: Some(Stance::Goofy),
            ..QueryState::default()
        };
        assert_eq!(
            state.to_query().filter,
            Some(Filter::and([
                Filter::contains("email", "alice"),
                Filter::eq("stance", "goofy"),
            ]))
        );
    }

    #[test]
    fn test_no_filters_means_no_clause() {
        assert_eq!(QueryState::default().to_query().filter, None);

        // An empty email filter is treated as absent, not as an
        // always-true clause.
        let state = QueryState {
            email: Some(String::new()),
            ..QueryState::default()
        };
        assert_eq!(state.to_query().filter, None);
    }

    #[test]
    fn test_single_filter_stays_plain() {
        let state = QueryState {
            stance: Some(Stance::Mongo),
            ..QueryState::default()
        };
        assert_eq!(
            state.to_query().filter,
            Some(Filter::eq("stance", "mongo"))
        );
    }

    #[test]
    fn test_default_order_is_email_ascending() {
        let query = QueryState::parse("").to_query();
        assert_eq!(query.order, OrderBy::asc(SortColumn::Email));
    }
}
