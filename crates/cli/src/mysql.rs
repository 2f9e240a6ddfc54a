//! MySQL collaborators: schema introspection, language registry and
//! statement execution.

use lingo_core::{EngineError, EngineResult, Language, StatementExecutor};
use lingo_ir::{Column, LanguageList, Schema, Table};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Row;

const COLUMNS_QUERY: &str = "SELECT TABLE_NAME AS table_name, COLUMN_NAME AS column_name, \
     CAST(COLUMN_TYPE AS CHAR) AS column_type, IS_NULLABLE AS is_nullable \
     FROM information_schema.columns \
     WHERE table_schema = DATABASE() \
     ORDER BY TABLE_NAME, ORDINAL_POSITION";

const LANGUAGES_QUERY: &str =
    "SELECT code, full_name FROM language WHERE is_enabled = 1 ORDER BY `order`";

/// Connect to `url`
pub async fn connect(url: &str) -> EngineResult<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(2)
        .connect(url)
        .await
        .map_err(|e| EngineError::Connection(e.to_string()))
}

/// One row of `information_schema.columns`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub column_type: String,
    pub is_nullable: String,
}

/// Group column rows, already ordered by table and ordinal position,
/// into tables.
pub fn tables_from_rows(rows: impl IntoIterator<Item = ColumnRow>) -> Vec<Table> {
    let mut tables: Vec<Table> = Vec::new();

    for row in rows {
        let column = Column {
            name: row.column_name,
            db_type: row.column_type,
            allow_null: row.is_nullable.eq_ignore_ascii_case("YES"),
        };
        match tables.last_mut() {
            Some(table) if table.name == row.table_name => table.columns.push(column),
            _ => tables.push(Table::new(row.table_name).with_column(column)),
        }
    }

    tables
}

/// Read every table of the current database
pub async fn introspect(pool: &MySqlPool) -> EngineResult<Schema> {
    let rows = sqlx::query(COLUMNS_QUERY)
        .fetch_all(pool)
        .await
        .map_err(|e| EngineError::SchemaRead(e.to_string()))?;

    let mut column_rows = Vec::with_capacity(rows.len());
    for row in rows {
        column_rows.push(ColumnRow {
            table_name: get_string(&row, "table_name")?,
            column_name: get_string(&row, "column_name")?,
            column_type: get_string(&row, "column_type")?,
            is_nullable: get_string(&row, "is_nullable")?,
        });
    }

    let schema = Schema::from_tables(tables_from_rows(column_rows));
    tracing::debug!(tables = schema.table_count(), "schema introspected");
    Ok(schema)
}

fn get_string(row: &sqlx::mysql::MySqlRow, column: &str) -> EngineResult<String> {
    row.try_get::<String, _>(column)
        .map_err(|e| EngineError::SchemaRead(format!("{}: {}", column, e)))
}

/// Enabled languages from the `language` table, in operator order
pub async fn load_languages(pool: &MySqlPool) -> EngineResult<LanguageList> {
    let rows = sqlx::query(LANGUAGES_QUERY)
        .fetch_all(pool)
        .await
        .map_err(|e| EngineError::with_context("loading languages", e.to_string()))?;

    let mut languages = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let code: String = row
            .try_get("code")
            .map_err(|e| EngineError::with_context("loading languages", e.to_string()))?;
        let full_name: String = row
            .try_get("full_name")
            .map_err(|e| EngineError::with_context("loading languages", e.to_string()))?;
        languages.push(Language::new(code, full_name).with_order(index as i32));
    }

    Ok(LanguageList::new(languages))
}

/// Runs statements on a MySQL pool
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StatementExecutor for MySqlExecutor {
    async fn execute(&self, sql: &str) -> EngineResult<()> {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| EngineError::execution(sql, e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(table: &str, column: &str, ty: &str, nullable: &str) -> ColumnRow {
        ColumnRow {
            table_name: table.to_string(),
            column_name: column.to_string(),
            column_type: ty.to_string(),
            is_nullable: nullable.to_string(),
        }
    }

    #[test]
    fn test_tables_from_rows_keeps_order() {
        let tables = tables_from_rows([
            row("page", "id", "int(11)", "NO"),
            row("page", "name_en", "varchar(128)", "NO"),
            row("post", "id", "int(11)", "NO"),
            row("post", "title_en", "varchar(255)", "YES"),
            row("post", "title_fr", "varchar(255)", "YES"),
        ]);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "page");
        assert_eq!(
            tables[1].column_names().collect::<Vec<_>>(),
            vec!["id", "title_en", "title_fr"]
        );
        assert!(!tables[1].columns[0].allow_null);
        assert!(tables[1].columns[1].allow_null);
        assert_eq!(tables[1].columns[2].db_type, "varchar(255)");
    }

    #[test]
    fn test_tables_from_no_rows() {
        assert!(tables_from_rows(Vec::new()).is_empty());
    }
}
