//! Query Facade
//!
//! A [`Listing`] describes a sorted, filtered view over one record kind. It
//! does nothing until fetched and can be fetched any number of times. Sort
//! keys and filter fields are per-kind enums that map to fixed SQL
//! expressions; filter values are always bound, never spliced into SQL.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    marker::PhantomData,
};

use sqlx::{FromRow, QueryBuilder, Sqlite, Transaction, sqlite::SqliteRow};
use uuid::Uuid;

/// A sortable or filterable column of a record kind.
pub trait Column: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// SQL expression for this column.
    fn expr(self) -> &'static str;
}

/// A record kind that can be listed through the facade.
pub trait RecordKind: Send + Sync + 'static {
    /// Row type produced by a listing.
    type Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    /// Keys a listing may be ordered by.
    type SortKey: Column;

    /// Fields a listing may be filtered on.
    type Field: Column;

    /// `SELECT … FROM …` producing [`Self::Record`] rows, without `WHERE`.
    const SELECT: &'static str;

    /// Condition every listed row must satisfy, e.g. excluding deleted rows.
    const LIVE: Option<&'static str> = None;
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,

    /// Largest first.
    Descending,
}

impl Direction {
    /// Pick a direction from a "descending?" flag.
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// A value compared against a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Compared as text.
    Text(String),

    /// Compared as an integer, e.g. a product code.
    Integer(i64),

    /// Compared against a stored identifier.
    Uuid(Uuid),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// A filter over one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<F> {
    /// Case-insensitive substring match. An empty needle matches everything.
    Contains(F, String),

    /// Exact equality.
    Equals(F, Value),
}

impl<F> Predicate<F> {
    /// Case-insensitive substring match on `field`.
    pub fn contains(field: F, needle: impl Into<String>) -> Self {
        Self::Contains(field, needle.into())
    }

    /// Exact match on `field`.
    pub fn equals(field: F, value: impl Into<Value>) -> Self {
        Self::Equals(field, value.into())
    }
}

/// A lazy, restartable view over one record kind.
pub struct Listing<K: RecordKind> {
    sort: Option<(K::SortKey, Direction)>,
    predicates: Vec<Predicate<K::Field>>,
    limit: Option<u32>,
    kind: PhantomData<fn() -> K>,
}

impl<K: RecordKind> Listing<K> {
    /// Every live record, in whatever order the store yields them.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sort: None,
            predicates: Vec::new(),
            limit: None,
            kind: PhantomData,
        }
    }

    /// Every live record ordered by `key`.
    #[must_use]
    pub fn sorted(key: K::SortKey, direction: Direction) -> Self {
        Self::new().sort_by(key, direction)
    }

    /// Replace the sort key.
    #[must_use]
    pub fn sort_by(mut self, key: K::SortKey, direction: Direction) -> Self {
        self.sort = Some((key, direction));
        self
    }

    /// Narrow the listing. Predicates accumulate and must all hold.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate<K::Field>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Return at most `limit` records.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Current sort key and direction, if any.
    pub fn sort(&self) -> Option<(K::SortKey, Direction)> {
        self.sort
    }

    /// Filters applied so far.
    pub fn predicates(&self) -> &[Predicate<K::Field>] {
        &self.predicates
    }

    /// Run the listing inside `tx`.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or a row cannot be decoded.
    pub async fn fetch_all(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<K::Record>, sqlx::Error> {
        let mut builder = self.build();

        builder
            .build_query_as::<K::Record>()
            .fetch_all(&mut **tx)
            .await
    }

    /// The SQL this listing runs, with `?` placeholders for bound values.
    pub fn to_sql(&self) -> String {
        self.build().into_sql()
    }

    fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(K::SELECT);
        let mut conditions = 0_usize;

        let mut next_condition = |builder: &mut QueryBuilder<'static, Sqlite>| {
            builder.push(if conditions == 0 { " WHERE " } else { " AND " });
            conditions += 1;
        };

        if let Some(live) = K::LIVE {
            next_condition(&mut builder);
            builder.push(live);
        }

        for predicate in &self.predicates {
            next_condition(&mut builder);

            match predicate {
                Predicate::Contains(field, needle) => {
                    builder
                        .push("instr(lower(")
                        .push(field.expr())
                        .push("), lower(")
                        .push_bind(needle.clone())
                        .push(")) > 0");
                }
                Predicate::Equals(field, value) => {
                    builder.push(field.expr()).push(" = ");

                    match value {
                        Value::Text(text) => builder.push_bind(text.clone()),
                        Value::Integer(integer) => builder.push_bind(*integer),
                        Value::Uuid(uuid) => builder.push_bind(*uuid),
                    };
                }
            }
        }

        if let Some((key, direction)) = self.sort {
            builder
                .push(" ORDER BY ")
                .push(key.expr())
                .push(" ")
                .push(direction.as_sql());
        }

        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        builder
    }
}

impl<K: RecordKind> Default for Listing<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RecordKind> Clone for Listing<K> {
    fn clone(&self) -> Self {
        Self {
            sort: self.sort,
            predicates: self.predicates.clone(),
            limit: self.limit,
            kind: PhantomData,
        }
    }
}

impl<K: RecordKind> Debug for Listing<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Listing")
            .field("sort", &self.sort)
            .field("predicates", &self.predicates)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<K: RecordKind> PartialEq for Listing<K> {
    fn eq(&self, other: &Self) -> bool {
        self.sort == other.sort && self.predicates == other.predicates && self.limit == other.limit
    }
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::*;

    struct Widgets;

    #[derive(Debug)]
    struct Widget;

    impl<'r> FromRow<'r, SqliteRow> for Widget {
        fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
            let _name: String = row.try_get("name")?;

            Ok(Self)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum WidgetColumn {
        Name,
        Size,
    }

    impl Column for WidgetColumn {
        fn expr(self) -> &'static str {
            match self {
                Self::Name => "w.name",
                Self::Size => "w.size",
            }
        }
    }

    impl RecordKind for Widgets {
        type Record = Widget;
        type SortKey = WidgetColumn;
        type Field = WidgetColumn;

        const SELECT: &'static str = "SELECT w.name FROM widgets w";
        const LIVE: Option<&'static str> = Some("w.deleted_at IS NULL");
    }

    #[test]
    fn bare_listing_only_filters_live_rows() {
        let sql = Listing::<Widgets>::new().to_sql();

        assert_eq!(sql, "SELECT w.name FROM widgets w WHERE w.deleted_at IS NULL");
    }

    #[test]
    fn predicates_are_bound_and_joined_with_and() {
        let sql = Listing::<Widgets>::new()
            .filter(Predicate::contains(WidgetColumn::Name, "'; DROP TABLE widgets; --"))
            .filter(Predicate::equals(WidgetColumn::Size, 3_i64))
            .to_sql();

        assert_eq!(
            sql,
            "SELECT w.name FROM widgets w WHERE w.deleted_at IS NULL \
             AND instr(lower(w.name), lower(?)) > 0 AND w.size = ?"
        );
    }

    #[test]
    fn sort_and_limit_are_appended() {
        let sql = Listing::<Widgets>::sorted(WidgetColumn::Size, Direction::Descending)
            .limit(10)
            .to_sql();

        assert_eq!(
            sql,
            "SELECT w.name FROM widgets w WHERE w.deleted_at IS NULL ORDER BY w.size DESC LIMIT ?"
        );
    }

    #[test]
    fn direction_from_descending_flag() {
        assert_eq!(Direction::from_descending(true), Direction::Descending);
        assert_eq!(Direction::from_descending(false), Direction::Ascending);
    }

    #[test]
    fn listing_is_reusable_after_clone() {
        let listing = Listing::<Widgets>::sorted(WidgetColumn::Name, Direction::Ascending)
            .filter(Predicate::contains(WidgetColumn::Name, "bolt"));

        assert_eq!(listing.clone(), listing);
        assert_eq!(listing.clone().to_sql(), listing.to_sql());
    }
}
