/// A fluent builder for the parameterised SQLite statements the SQL engine
/// issues.
///
/// The builder only produces SQL text with `?` placeholders. Values are bound
/// by the caller in placeholder order: insert/update columns first, then
/// `WHERE` values.
///
/// # Example
///
/// ```ignore
/// let sql = QueryBuilder::new("customers")
///     .where_in("id", 3)
///     .order_by("name", true)
///     .limit(10)
///     .build_select(&["id", "name"])?;
/// // SELECT id, name FROM customers WHERE id IN (?, ?, ?) ORDER BY name ASC LIMIT 10
/// ```
/// SQLite reads integer literals above this as REAL and rejects them in
/// `LIMIT`/`OFFSET`.
const MAX_ROW_BOUND: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Do not validate or quote identifiers.
    Raw,
    /// Validate identifiers against a conservative pattern.
    Validate,
    /// Validate and quote identifiers with double quotes.
    Quote,
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    conditions: Vec<Condition>,
    order: Vec<(String, bool)>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
    identifier_policy: IdentifierPolicy,
}

#[derive(Debug, Clone)]
enum Condition {
    Eq(String),
    In(String, usize),
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
            identifier_policy: IdentifierPolicy::Validate,
        }
    }

    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    /// `column = ?`, one bind value.
    pub fn where_eq(mut self, column: &str) -> Self {
        self.conditions.push(Condition::Eq(column.to_string()));
        self
    }

    /// `column IN (?, ...)` with `count` bind values. Zero values match nothing.
    pub fn where_in(mut self, column: &str, count: usize) -> Self {
        self.conditions.push(Condition::In(column.to_string(), count));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    /// Bounds above `i64::MAX` are clamped to it.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    pub fn build_select(&self, columns: &[&str]) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        let columns = self.ident_list(columns)?;
        let mut sql = format!("SELECT {columns} FROM {table}");
        self.append_where(&mut sql)?;
        self.append_order(&mut sql)?;
        self.append_limit_offset(&mut sql);
        Ok(sql)
    }

    pub fn build_count(&self) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        let mut sql = format!("SELECT COUNT(*) FROM {table}");
        self.append_where(&mut sql)?;
        Ok(sql)
    }

    pub fn build_delete(&self) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        let mut sql = format!("DELETE FROM {table}");
        self.append_where(&mut sql)?;
        Ok(sql)
    }

    /// `INSERT INTO t (cols) VALUES (...) RETURNING returning`.
    pub fn build_insert(&self, columns: &[&str], returning: &[&str]) -> Result<String, QueryError> {
        let mut sql = self.insert_head(columns)?;
        sql.push_str(&format!(" RETURNING {}", self.ident_list(returning)?));
        Ok(sql)
    }

    /// Insert-or-update keyed on `conflict_column`: every other inserted
    /// column is overwritten with the incoming value.
    pub fn build_upsert(
        &self,
        conflict_column: &str,
        columns: &[&str],
        returning: &[&str],
    ) -> Result<String, QueryError> {
        let mut sql = self.insert_head(columns)?;
        let conflict = self.ident(conflict_column, "column")?;
        let mut assignments = Vec::with_capacity(columns.len());
        for col in columns.iter().filter(|c| **c != conflict_column) {
            let col = self.ident(col, "column")?;
            assignments.push(format!("{col} = excluded.{col}"));
        }
        if assignments.is_empty() {
            sql.push_str(&format!(" ON CONFLICT ({conflict}) DO NOTHING"));
        } else {
            sql.push_str(&format!(
                " ON CONFLICT ({conflict}) DO UPDATE SET {}",
                assignments.join(", ")
            ));
        }
        sql.push_str(&format!(" RETURNING {}", self.ident_list(returning)?));
        Ok(sql)
    }

    fn insert_head(&self, columns: &[&str]) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        if columns.is_empty() {
            return Ok(format!("INSERT INTO {table} DEFAULT VALUES"));
        }
        let cols = self.ident_list(columns)?;
        Ok(format!(
            "INSERT INTO {table} ({cols}) VALUES ({})",
            placeholders(columns.len())
        ))
    }

    fn append_where(&self, sql: &mut String) -> Result<(), QueryError> {
        if self.conditions.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(self.conditions.len());
        for cond in &self.conditions {
            match cond {
                Condition::Eq(col) => {
                    let col = self.ident(col, "column")?;
                    clauses.push(format!("{col} = ?"));
                }
                Condition::In(_, 0) => clauses.push("1 = 0".to_string()),
                Condition::In(col, count) => {
                    let col = self.ident(col, "column")?;
                    clauses.push(format!("{col} IN ({})", placeholders(*count)));
                }
            }
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
        Ok(())
    }

    fn append_order(&self, sql: &mut String) -> Result<(), QueryError> {
        if self.order.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(self.order.len());
        for (col, asc) in &self.order {
            let col = self.ident(col, "column")?;
            clauses.push(format!("{col} {}", if *asc { "ASC" } else { "DESC" }));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    fn append_limit_offset(&self, sql: &mut String) {
        let limit = self.limit_val.map(|v| v.min(MAX_ROW_BOUND));
        let offset = self.offset_val.map(|v| v.min(MAX_ROW_BOUND));
        match (limit, offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }
    }

    fn ident_list(&self, columns: &[&str]) -> Result<String, QueryError> {
        let mut out = Vec::with_capacity(columns.len());
        for col in columns {
            out.push(self.ident(col, "column")?);
        }
        Ok(out.join(", "))
    }

    fn ident(&self, ident: &str, kind: &'static str) -> Result<String, QueryError> {
        if self.identifier_policy == IdentifierPolicy::Raw {
            return Ok(ident.to_string());
        }
        if !is_valid_identifier(ident) {
            return Err(QueryError::InvalidIdentifier {
                kind,
                ident: ident.to_string(),
            });
        }
        match self.identifier_policy {
            IdentifierPolicy::Quote => Ok(quote_identifier(ident)),
            IdentifierPolicy::Raw | IdentifierPolicy::Validate => Ok(ident.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

fn is_valid_identifier(ident: &str) -> bool {
    !ident.is_empty() && ident.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn quote_identifier(ident: &str) -> String {
    ident
        .split('.')
        .map(|part| format!("\"{part}\""))
        .collect::<Vec<_>>()
        .join(".")
}
