//! SQL statement generation
//!
//! Produces the four canonical statements of a mapped type. Templates only ever
//! contain quoted identifiers and `?` placeholders; values are bound by the executor.

/// Quote an identifier with backticks so reserved words are usable as names
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `?, ?, ...` with `count` placeholders
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Count the `?` placeholders of a statement, ignoring those inside string literals
pub fn count_placeholders(sql: &str) -> usize {
    let mut in_literal = false;
    sql.chars()
        .filter(|c| {
            if *c == '\'' {
                in_literal = !in_literal;
            }
            !in_literal && *c == '?'
        })
        .count()
}

/// Generated statements of one mapped type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTemplates {
    pub select: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

impl SqlTemplates {
    /// Build the statements for `table`, keyed by `primary_key`, over `columns` in order.
    ///
    /// Argument order for insert and update is `columns` followed by the primary key.
    pub fn build(table: &str, primary_key: &str, columns: &[&str]) -> Self {
        let table = quote_identifier(table);
        let primary_key = quote_identifier(primary_key);
        let quoted: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();

        let select = if quoted.is_empty() {
            format!("select {} from {}", primary_key, table)
        } else {
            format!("select {}, {} from {}", primary_key, quoted.join(", "), table)
        };

        let insert = if quoted.is_empty() {
            format!("insert into {} ({}) values ({})", table, primary_key, placeholders(1))
        } else {
            format!(
                "insert into {} ({}, {}) values ({})",
                table,
                quoted.join(", "),
                primary_key,
                placeholders(quoted.len() + 1)
            )
        };

        // A key-only type still needs a well-formed statement taking one argument
        let assignments = if quoted.is_empty() {
            format!("{}={}", primary_key, primary_key)
        } else {
            quoted
                .iter()
                .map(|c| format!("{}=?", c))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let update = format!("update {} set {} where {}=?", table, assignments, primary_key);

        let delete = format!("delete from {} where {}=?", table, primary_key);

        Self {
            select,
            insert,
            update,
            delete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_templates() {
        let templates = SqlTemplates::build("users", "id", &["email", "passwd", "admin"]);

        assert_eq!(
            templates.select,
            "select `id`, `email`, `passwd`, `admin` from `users`"
        );
        assert_eq!(
            templates.insert,
            "insert into `users` (`email`, `passwd`, `admin`, `id`) values (?, ?, ?, ?)"
        );
        assert_eq!(
            templates.update,
            "update `users` set `email`=?, `passwd`=?, `admin`=? where `id`=?"
        );
        assert_eq!(templates.delete, "delete from `users` where `id`=?");
    }

    #[test]
    fn test_placeholder_counts_match_argument_lists() {
        let columns = ["a", "b", "c", "d"];
        let templates = SqlTemplates::build("t", "id", &columns);
        assert_eq!(count_placeholders(&templates.insert), columns.len() + 1);
        assert_eq!(count_placeholders(&templates.update), columns.len() + 1);
        assert_eq!(count_placeholders(&templates.delete), 1);
        assert_eq!(count_placeholders(&templates.select), 0);
    }

    #[test]
    fn test_key_only_type() {
        let templates = SqlTemplates::build("tags", "name", &[]);
        assert_eq!(templates.select, "select `name` from `tags`");
        assert_eq!(templates.insert, "insert into `tags` (`name`) values (?)");
        assert_eq!(templates.update, "update `tags` set `name`=`name` where `name`=?");
        assert_eq!(count_placeholders(&templates.update), 1);
    }

    #[test]
    fn test_reserved_words_are_quoted() {
        let templates = SqlTemplates::build("order", "key", &["group"]);
        assert_eq!(templates.select, "select `key`, `group` from `order`");
    }

    #[test]
    fn test_deterministic() {
        let a = SqlTemplates::build("t", "id", &["x", "y"]);
        let b = SqlTemplates::build("t", "id", &["x", "y"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_count_placeholders_skips_literals() {
        assert_eq!(count_placeholders("select * from t where a = '?' and b = ?"), 1);
    }
}
