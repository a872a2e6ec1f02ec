// Backend-neutral query description plus typed fetch helpers
use crate::error::{DatabaseError, DatabaseResult};
use crate::Datastore;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// A single row filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: JsonValue },
    /// `column IN (values)`
    In { column: String, values: Vec<JsonValue> },
    /// Case-insensitive substring match on a text column. `*` matches any
    /// run of characters; every other character is literal.
    ILike { column: String, needle: String },
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. } | Self::In { column, .. } | Self::ILike { column, .. } => column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Columns pulled in from a related table through a foreign key on this one.
///
/// The related row lands under a key named after `table`, or `null` when the
/// foreign key does not resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub table: String,
    pub foreign_key: String,
    pub columns: Vec<String>,
}

/// "Select rows from table X filtered/ordered/limited"
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
    pub embeds: Vec<Embed>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
            embeds: Vec::new(),
        }
    }

    /// Restrict the returned columns; all columns are returned when never called
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn in_list<V: Into<JsonValue>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filters.push(Filter::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn ilike(mut self, column: impl Into<String>, needle: impl Into<String>) -> Self {
        self.filters.push(Filter::ILike {
            column: column.into(),
            needle: needle.into(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn embed(mut self, table: impl Into<String>, foreign_key: impl Into<String>, columns: &[&str]) -> Self {
        self.embeds.push(Embed {
            table: table.into(),
            foreign_key: foreign_key.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        });
        self
    }

    /// PostgREST query-string parameters for this query
    pub fn to_postgrest_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        let mut select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };
        for embed in &self.embeds {
            let columns = if embed.columns.is_empty() {
                "*".to_string()
            } else {
                embed.columns.join(",")
            };
            select.push_str(&format!(",{}({columns})", embed.table));
        }
        params.push(("select".to_string(), select));

        for filter in &self.filters {
            let expr = match filter {
                Filter::Eq { value: JsonValue::Null, .. } => "is.null".to_string(),
                Filter::Eq { value, .. } => format!("eq.{}", postgrest_literal(value)),
                Filter::In { values, .. } => {
                    let list: Vec<String> = values.iter().map(postgrest_list_item).collect();
                    format!("in.({})", list.join(","))
                }
                Filter::ILike { needle, .. } => format!("ilike.*{}*", escape_like(needle)),
            };
            params.push((filter.column().to_string(), expr));
        }

        if let Some(order) = &self.order {
            let direction = match order.direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            params.push((
                "order".to_string(),
                format!("{}.{direction}.nullslast", order.column),
            ));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

fn postgrest_literal(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// PostgREST turns `*` into `%`; escape the LIKE metacharacters it leaves alone
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn postgrest_list_item(value: &JsonValue) -> String {
    let literal = postgrest_literal(value);
    if literal.contains([',', '(', ')', '"', ' ']) {
        format!("\"{}\"", literal.replace('"', "\\\""))
    } else {
        literal
    }
}

/// Execute a query and decode all rows
pub async fn fetch_all<T: DeserializeOwned>(
    store: &dyn Datastore,
    query: &Query,
) -> DatabaseResult<Vec<T>> {
    store
        .select(query)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(DatabaseError::from))
        .collect()
}

/// Execute a query and decode the first row, if any
pub async fn fetch_optional<T: DeserializeOwned>(
    store: &dyn Datastore,
    query: &Query,
) -> DatabaseResult<Option<T>> {
    let limited = query.clone().limit(1);
    match store.select(&limited).await?.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}

/// Fetch a row by primary key, failing with `NotFound` when absent
pub async fn fetch_by_id<T: DeserializeOwned>(
    store: &dyn Datastore,
    table: &str,
    id: &str,
) -> DatabaseResult<T> {
    fetch_optional(store, &Query::table(table).eq("id", id))
        .await?
        .ok_or_else(|| DatabaseError::not_found(table, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_postgrest_params_for_pending_tasks() {
        let query = Query::table("tasks")
            .in_list("status", ["pending", "inProgress"])
            .order_by("priority", Direction::Descending)
            .limit(5)
            .embed("patients", "patient_id", &["name"]);

        assert_eq!(
            query.to_postgrest_params(),
            vec![
                ("select".to_string(), "*,patients(name)".to_string()),
                ("status".to_string(), "in.(pending,inProgress)".to_string()),
                ("order".to_string(), "priority.desc.nullslast".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_ilike_needle_escapes_like_metacharacters() {
        let params = Query::table("patients").ilike("name", "o_neil 100%").to_postgrest_params();
        assert_eq!(params[1], ("name".to_string(), r"ilike.*o\_neil 100\%*".to_string()));

        let params = Query::table("patients").ilike("name", "ada*lace").to_postgrest_params();
        assert_eq!(params[1], ("name".to_string(), "ilike.*ada*lace*".to_string()));
    }

    #[test]
    fn test_postgrest_literals() {
        let query = Query::table("patients")
            .columns(&["id", "name"])
            .eq("status", "active")
            .eq("room_number", JsonValue::Null)
            .eq("priority", 3)
            .ilike("name", "smith")
            .in_list("primary_condition", [json!("COPD, end stage")]);

        let params = query.to_postgrest_params();
        assert_eq!(params[0], ("select".to_string(), "id,name".to_string()));
        assert_eq!(params[1], ("status".to_string(), "eq.active".to_string()));
        assert_eq!(params[2], ("room_number".to_string(), "is.null".to_string()));
        assert_eq!(params[3], ("priority".to_string(), "eq.3".to_string()));
        assert_eq!(params[4], ("name".to_string(), "ilike.*smith*".to_string()));
        assert_eq!(
            params[5],
            (
                "primary_condition".to_string(),
                "in.(\"COPD, end stage\")".to_string()
            )
        );
    }
}
