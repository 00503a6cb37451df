use super::value::SqlValue;

/// Builds an UPDATE statement covering only the columns the caller supplied.
///
/// Column names come from the resource's fixed enumeration of updatable
/// fields; values are always bound parameters. `$1` is reserved for the row
/// id, assignments start at `$2`, and `updated_at = now()` is stamped on
/// every statement.
#[derive(Debug, Default)]
pub struct UpdateBuilder {
    assignments: Vec<String>,
    params: Vec<SqlValue>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one `column = $n` assignment. `column` must be a trusted
    /// compile-time identifier, never caller input.
    pub fn set(&mut self, column: &'static str, value: impl Into<SqlValue>) {
        // $1 is the id, so the first assignment binds $2
        let placeholder = self.params.len() + 2;
        self.assignments.push(format!("{} = ${}", column, placeholder));
        self.params.push(value.into());
    }

    pub fn set_opt(&mut self, column: &'static str, value: Option<impl Into<SqlValue>>) {
        if let Some(v) = value {
            self.set(column, v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Render the full statement and hand back the bind parameters in
    /// placeholder order (not including the id, which the store binds as $1).
    pub fn into_sql(self, table: &str, returning: &str) -> (String, Vec<SqlValue>) {
        let sql = format!(
            "UPDATE {} SET {}, updated_at = now() WHERE id = $1 RETURNING {}",
            table,
            self.assignments.join(", "),
            returning
        );
        (sql, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let update = UpdateBuilder::new();
        assert!(update.is_empty());
        assert_eq!(update.len(), 0);
    }

    #[test]
    fn numbers_placeholders_after_the_id() {
        let mut update = UpdateBuilder::new();
        update.set("name", "Alicia");
        update.set("phone_number", "+6591234567");

        let (sql, params) = update.into_sql("proxys.proxy_list", "id, name");
        assert_eq!(
            sql,
            "UPDATE proxys.proxy_list SET name = $2, phone_number = $3, \
             updated_at = now() WHERE id = $1 RETURNING id, name"
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], SqlValue::Text("Alicia".to_string()));
    }

    #[test]
    fn set_opt_skips_absent_fields() {
        let mut update = UpdateBuilder::new();
        update.set_opt("name", None::<String>);
        assert!(update.is_empty());

        update.set_opt("name", Some("Fern"));
        assert_eq!(update.len(), 1);
    }

    #[test]
    fn always_stamps_updated_at() {
        let mut update = UpdateBuilder::new();
        update.set("notes", "water twice a week");
        let (sql, _) = update.into_sql("reminders.reminder_list", "*");
        assert!(sql.contains("updated_at = now()"));
        assert!(sql.ends_with("RETURNING *"));
    }
}
