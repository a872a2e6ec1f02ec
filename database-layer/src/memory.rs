// In-memory datastore for tests and offline development
use crate::error::{DatabaseError, DatabaseResult};
use crate::query::{Direction, Embed, Filter, Query};
use crate::Datastore;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

/// Table-name → rows store honouring the same `Query` semantics as the REST backend
pub struct InMemoryDatastore {
    tables: Arc<DashMap<String, Vec<JsonValue>>>,
}

impl InMemoryDatastore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(DashMap::new()),
        }
    }

    /// Seed a table, replacing whatever it held
    pub fn with_rows(self, table: &str, rows: Vec<JsonValue>) -> Self {
        self.tables.insert(table.to_string(), rows);
        self
    }

    /// Snapshot of a table's rows in insertion order
    pub fn rows(&self, table: &str) -> Vec<JsonValue> {
        self.tables
            .get(table)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }

    fn find_by_id(&self, table: &str, id: &JsonValue) -> Option<JsonValue> {
        self.tables.get(table).and_then(|rows| {
            rows.iter()
                .find(|row| row.get("id").is_some_and(|row_id| ids_equal(row_id, id)))
                .cloned()
        })
    }

    fn embed_related(&self, row: &mut JsonValue, embed: &Embed) {
        let related = row
            .get(&embed.foreign_key)
            .and_then(|fk| self.find_by_id(&embed.table, fk))
            .map_or(JsonValue::Null, |found| project(&found, &embed.columns));

        if let Some(object) = row.as_object_mut() {
            object.insert(embed.table.clone(), related);
        }
    }
}

impl Default for InMemoryDatastore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Datastore for InMemoryDatastore {
    async fn select(&self, query: &Query) -> DatabaseResult<Vec<JsonValue>> {
        let mut rows: Vec<JsonValue> = self
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|filter| matches_filter(row, filter)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                compare_nulls_last(a.get(&order.column), b.get(&order.column), order.direction)
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                let mut projected = project(&row, &query.columns);
                for embed in &query.embeds {
                    self.embed_related(&mut projected, embed);
                }
                projected
            })
            .collect();

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: JsonValue) -> DatabaseResult<JsonValue> {
        let JsonValue::Object(mut object) = row else {
            return Err(DatabaseError::query_failed(table, "row must be a JSON object"));
        };

        object
            .entry("id")
            .or_insert_with(|| JsonValue::String(Uuid::new_v4().to_string()));
        object
            .entry("created_at")
            .or_insert_with(|| JsonValue::String(Utc::now().to_rfc3339()));

        let row = JsonValue::Object(object);
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, patch: JsonValue) -> DatabaseResult<JsonValue> {
        let JsonValue::Object(patch) = patch else {
            return Err(DatabaseError::query_failed(table, "patch must be a JSON object"));
        };

        let mut rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| DatabaseError::not_found(table, id))?;

        let key = JsonValue::String(id.to_string());
        let row = rows
            .iter_mut()
            .find(|row| row.get("id").is_some_and(|row_id| ids_equal(row_id, &key)))
            .ok_or_else(|| DatabaseError::not_found(table, id))?;

        if let Some(object) = row.as_object_mut() {
            object.extend(patch);
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> DatabaseResult<()> {
        let key = JsonValue::String(id.to_string());
        if let Some(mut rows) = self.tables.get_mut(table) {
            rows.retain(|row| !row.get("id").is_some_and(|row_id| ids_equal(row_id, &key)));
        }
        Ok(())
    }
}

fn matches_filter(row: &JsonValue, filter: &Filter) -> bool {
    let cell = row.get(filter.column()).unwrap_or(&JsonValue::Null);
    match filter {
        Filter::Eq { value, .. } => cell == value,
        Filter::In { values, .. } => values.contains(cell),
        Filter::ILike { needle, .. } => cell
            .as_str()
            .is_some_and(|text| ilike_matches(&text.to_lowercase(), &needle.to_lowercase())),
    }
}

/// `*` in the needle matches any run of characters, as it does in PostgREST
fn ilike_matches(text: &str, needle: &str) -> bool {
    let mut rest = text;
    for part in needle.split('*').filter(|part| !part.is_empty()) {
        match rest.find(part) {
            Some(at) => rest = rest.get(at + part.len()..).unwrap_or_default(),
            None => return false,
        }
    }
    true
}

/// Ids compare by their text, so `7` and `"7"` name the same row
fn id_text(value: &JsonValue) -> Cow<'_, str> {
    match value {
        JsonValue::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

fn ids_equal(a: &JsonValue, b: &JsonValue) -> bool {
    id_text(a) == id_text(b)
}

/// Nulls and missing cells sort after everything, in either direction
fn compare_nulls_last(a: Option<&JsonValue>, b: Option<&JsonValue>, direction: Direction) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ordering = compare_values(x, y);
            match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        }
    }
}

fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn project(row: &JsonValue, columns: &[String]) -> JsonValue {
    if columns.is_empty() {
        return row.clone();
    }
    let mut projected = Map::new();
    for column in columns {
        if let Some(value) = row.get(column) {
            projected.insert(column.clone(), value.clone());
        }
    }
    JsonValue::Object(projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> InMemoryDatastore {
        InMemoryDatastore::new()
            .with_rows(
                "patients",
                vec![
                    json!({"id": "p1", "name": "Ada Lovelace", "status": "active"}),
                    json!({"id": "p2", "name": "Grace Hopper", "status": "discharged"}),
                ],
            )
            .with_rows(
                "tasks",
                vec![
                    json!({"id": "t1", "patient_id": "p1", "status": "pending", "priority": 2}),
                    json!({"id": "t2", "patient_id": "p2", "status": "completed", "priority": 4}),
                    json!({"id": "t3", "patient_id": "p1", "status": "inProgress", "priority": 4}),
                    json!({"id": "t4", "patient_id": "p9", "status": "pending", "priority": null}),
                ],
            )
    }

    #[tokio::test]
    async fn test_filter_order_limit_and_embed() {
        let store = seeded();
        let query = Query::table("tasks")
            .in_list("status", ["pending", "inProgress"])
            .order_by("priority", Direction::Descending)
            .embed("patients", "patient_id", &["name"]);

        let rows = store.select(&query).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["t3", "t1", "t4"]);
        assert_eq!(rows[0]["patients"], json!({"name": "Ada Lovelace"}));
        assert_eq!(rows[2]["patients"], JsonValue::Null);

        let limited = store.select(&query.clone().limit(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_ilike_is_case_insensitive_substring() {
        let store = seeded();
        let rows = store
            .select(&Query::table("patients").ilike("name", "HOPP"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "p2");
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let store = InMemoryDatastore::new();
        let row = store
            .insert("tasks", json!({"title": "Call family", "status": "pending"}))
            .await
            .unwrap();
        let id = row["id"].as_str().unwrap().to_string();
        assert!(row.get("created_at").is_some());

        let updated = store
            .update("tasks", &id, json!({"status": "completed"}))
            .await
            .unwrap();
        assert_eq!(updated["status"], "completed");
        assert_eq!(updated["title"], "Call family");

        store.delete("tasks", &id).await.unwrap();
        assert!(store.rows("tasks").is_empty());
    }

    #[tokio::test]
    async fn test_numeric_ids_are_updated_and_deleted() {
        let store = InMemoryDatastore::new().with_rows(
            "tasks",
            vec![json!({"id": 7, "title": "Order oxygen", "status": "pending"})],
        );

        let updated = store
            .update("tasks", "7", json!({"status": "inProgress"}))
            .await
            .unwrap();
        assert_eq!(updated["id"], 7);
        assert_eq!(updated["status"], "inProgress");

        store.delete("tasks", "7").await.unwrap();
        assert!(store.rows("tasks").is_empty());
    }

    #[tokio::test]
    async fn test_ilike_star_is_a_wildcard() {
        let store = seeded();
        let rows = store
            .select(&Query::table("patients").ilike("name", "ada*lace"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        let rows = store
            .select(&Query::table("patients").ilike("name", "lace*ada"))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = seeded();
        let err = store
            .update("tasks", "nope", json!({"status": "completed"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
