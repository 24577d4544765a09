//! Sort placeholder templating for dataset SQL.
//!
//! A query may carry one sort marker:
//! - `/*sort*/` is replaced with `order by <clause>` when a clause is given,
//!   and left in place otherwise.
//! - `/*sort:<default>*/` is replaced with `order by <clause>`, falling back to
//!   `<default>` when no clause is given.
//!
//! Malformed markers leave the query untouched.

const MARKER_OPEN: &str = "/*sort";
const MARKER_CLOSE: &str = "*/";

/// Rewrite the first sort marker in `sql` with an ORDER BY clause.
pub fn apply_sort(sql: &str, order_by: &str) -> String {
    let Some(idx) = sql.find(MARKER_OPEN) else {
        return sql.to_string();
    };

    let after_open = &sql[idx + MARKER_OPEN.len()..];
    if let Some(rest) = after_open.strip_prefix(':') {
        let Some(close) = rest.find(MARKER_CLOSE) else {
            return sql.to_string();
        };

        let default = &rest[..close];
        let clause = if order_by.is_empty() { default } else { order_by };
        if clause.is_empty() {
            return sql.to_string();
        }

        let tail = &rest[close + MARKER_CLOSE.len()..];
        return format!("{}order by {}{}", &sql[..idx], clause, tail);
    }

    let Some(tail) = after_open.strip_prefix(MARKER_CLOSE) else {
        return sql.to_string();
    };
    if order_by.is_empty() {
        return sql.to_string();
    }
    format!("{}order by {}{}", &sql[..idx], order_by, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sort_table() {
        let cases = [
            ("select * from t /*sort*/", "", "select * from t /*sort*/"),
            ("select * from t /*sort*/", "id", "select * from t order by id"),
            ("select * from t /*sort:*/", "", "select * from t /*sort:*/"),
            ("select * from t /*sort:*/", "id", "select * from t order by id"),
            ("select * from t /*sort:id*/", "", "select * from t order by id"),
            ("select * from t /*sort:id*/", "name", "select * from t order by name"),
            ("select * from t /* sort:id*/", "name", "select * from t /* sort:id*/"),
        ];

        for (i, (sql, ob, expected)) in cases.into_iter().enumerate() {
            assert_eq!(apply_sort(sql, ob), expected, "case {} failed", i);
        }
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(apply_sort("select 1", "id"), "select 1");
        assert_eq!(apply_sort("", ""), "");
    }

    #[test]
    fn test_unterminated_default() {
        let sql = "select * from t /*sort:id";
        assert_eq!(apply_sort(sql, ""), sql);
        assert_eq!(apply_sort(sql, "name"), sql);
    }

    #[test]
    fn test_only_first_opening_is_considered() {
        let sql = "select /*sorted*/ * from t /*sort*/";
        assert_eq!(apply_sort(sql, "id"), sql);
        assert_eq!(apply_sort(sql, ""), sql);

        assert_eq!(
            apply_sort("select * from t /*sort*/ /*sort*/", "id"),
            "select * from t order by id /*sort*/"
        );
    }

    #[test]
    fn test_marker_at_end_of_text() {
        assert_eq!(apply_sort("select * from t /*sort", "id"), "select * from t /*sort");
    }

    #[test]
    fn test_text_after_marker_is_kept() {
        assert_eq!(
            apply_sort("select * from t /*sort:id desc*/ limit 10", ""),
            "select * from t order by id desc limit 10"
        );
        assert_eq!(
            apply_sort("select * from t /*sort*/ limit 10", "name desc"),
            "select * from t order by name desc limit 10"
        );
    }

    #[test]
    fn test_first_marker_only() {
        assert_eq!(
            apply_sort("select * from (select * from a /*sort*/) x /*sort*/", "id"),
            "select * from (select * from a order by id) x /*sort*/"
        );
        assert_eq!(
            apply_sort("select /*sort:a*/ /*sort:b*/", ""),
            "select order by a /*sort:b*/"
        );
    }
}
