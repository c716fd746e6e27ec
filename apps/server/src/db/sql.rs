//! Partial-update SET clause builder
//!
//! Turns a sparse set of logical fields into an ordered `SET` fragment with
//! positional placeholders, plus the bind values in the same order. Column
//! names only ever come from the static allow-lists declared next to each
//! repository; request input never reaches the SQL text.

use crate::{Error, Result};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{Query, QueryAs};

/// Logical field name to physical column name. Fields without an entry map to
/// a column of the same name.
pub type ColumnMap = &'static [(&'static str, &'static str)];

/// Value bound to one placeholder of a SET clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    /// Nullable text column. `None` writes SQL NULL.
    NullableText(Option<String>),
    Integer(i32),
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        Self::NullableText(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

/// Ordered, sparse set of logical fields to write.
///
/// Insertion order is preserved. Setting a field twice replaces the earlier
/// value in its original position.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: Vec<(&'static str, SqlValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &'static str, value: impl Into<SqlValue>) -> &mut Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    /// Sets `field` only when a value is present.
    pub fn set_opt<T: Into<SqlValue>>(&mut self, field: &'static str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }
}

/// A rendered SET clause and its bind values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetClause {
    /// `"col1"=$1, "col2"=$2, ...`
    pub fragment: String,
    pub values: Vec<SqlValue>,
}

impl SetClause {
    /// Placeholder index for the first parameter after the SET values,
    /// typically the `WHERE` key.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// `UPDATE <table> SET <fragment> WHERE <key_column> = $n`
    pub fn update_statement(&self, table: &str, key_column: &str) -> String {
        format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            table,
            self.fragment,
            key_column,
            self.next_placeholder()
        )
    }

    /// Binds the SET values, in order, onto `query`.
    pub fn bind<'q>(
        self,
        mut query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        for value in self.values {
            query = match value {
                SqlValue::Text(v) => query.bind(v),
                SqlValue::NullableText(v) => query.bind(v),
                SqlValue::Integer(v) => query.bind(v),
            };
        }
        query
    }

    /// Same as [`SetClause::bind`] for typed queries.
    pub fn bind_as<'q, O>(
        self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for value in self.values {
            query = match value {
                SqlValue::Text(v) => query.bind(v),
                SqlValue::NullableText(v) => query.bind(v),
                SqlValue::Integer(v) => query.bind(v),
            };
        }
        query
    }
}

/// Builds the SET clause for a partial update.
///
/// Placeholders are numbered from 1 in the field set's order. An empty field
/// set is rejected with [`Error::InvalidInput`].
pub fn sql_for_partial_update(fields: FieldSet, columns: ColumnMap) -> Result<SetClause> {
    if fields.is_empty() {
        return Err(Error::InvalidInput("No data".to_string()));
    }

    let mut assignments = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());

    for (idx, (field, value)) in fields.fields.into_iter().enumerate() {
        let column = columns
            .iter()
            .find(|(logical, _)| *logical == field)
            .map(|(_, physical)| *physical)
            .unwrap_or(field);
        assignments.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(value);
    }

    Ok(SetClause {
        fragment: assignments.join(", "),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_RENAMES: ColumnMap = &[];

    #[test]
    fn numbers_placeholders_in_insertion_order() {
        let mut fields = FieldSet::new();
        fields.set("firstName", "Aliya").set("age", 32);

        let clause =
            sql_for_partial_update(fields, &[("firstName", "first_name")]).unwrap();

        assert_eq!(clause.fragment, "\"first_name\"=$1, \"age\"=$2");
        assert_eq!(
            clause.values,
            vec![SqlValue::Text("Aliya".into()), SqlValue::Integer(32)]
        );
        assert_eq!(clause.next_placeholder(), 3);
    }

    #[test]
    fn unmapped_fields_use_their_own_name() {
        let mut fields = FieldSet::new();
        fields.set("city", "Boston");

        let clause = sql_for_partial_update(fields, NO_RENAMES).unwrap();
        assert_eq!(clause.fragment, "\"city\"=$1");
        assert_eq!(clause.values, vec![SqlValue::Text("Boston".into())]);
    }

    #[test]
    fn empty_field_set_is_invalid_input() {
        let err = sql_for_partial_update(FieldSet::new(), NO_RENAMES).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg == "No data"));
    }

    #[test]
    fn resetting_a_field_keeps_its_position() {
        let mut fields = FieldSet::new();
        fields.set("name", "a").set("email", "a@b.c").set("name", "b");

        let clause = sql_for_partial_update(fields, NO_RENAMES).unwrap();
        assert_eq!(clause.fragment, "\"name\"=$1, \"email\"=$2");
        assert_eq!(clause.values[0], SqlValue::Text("b".into()));
    }

    #[test]
    fn explicit_null_is_bound_as_nullable() {
        let mut fields = FieldSet::new();
        fields.set("apartment_number", None::<String>);
        fields.set_opt::<String>("city", None);

        let clause = sql_for_partial_update(fields, NO_RENAMES).unwrap();
        assert_eq!(clause.fragment, "\"apartment_number\"=$1");
        assert_eq!(clause.values, vec![SqlValue::NullableText(None)]);
    }

    #[test]
    fn update_statement_appends_key_placeholder() {
        let mut fields = FieldSet::new();
        fields.set("bio", "hi").set("provider_type", "Therapist");

        let clause = sql_for_partial_update(fields, NO_RENAMES).unwrap();
        assert_eq!(
            clause.update_statement("providers", "provider_id"),
            "UPDATE providers SET \"bio\"=$1, \"provider_type\"=$2 WHERE provider_id = $3"
        );
    }
}
