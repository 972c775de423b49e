//! Placeholder and identifier-quoting dialects
//!
//! Statements are written with `?` placeholders and backtick-quoted identifiers.
//! MySQL and SQLite accept that form directly; Postgres needs `$n` placeholders and
//! double-quoted identifiers. Single-quoted string literals are copied untouched.

use std::borrow::Cow;

use config::Driver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
    Postgres,
}

impl From<Driver> for Dialect {
    fn from(driver: Driver) -> Self {
        match driver {
            Driver::MySql => Dialect::MySql,
            Driver::Sqlite => Dialect::Sqlite,
            Driver::Postgres => Dialect::Postgres,
        }
    }
}

impl Dialect {
    /// Rewrite a `?`/backtick statement into this dialect's native form
    pub fn translate<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self {
            Dialect::MySql | Dialect::Sqlite => Cow::Borrowed(sql),
            Dialect::Postgres => Cow::Owned(Self::to_numbered(sql)),
        }
    }

    fn to_numbered(sql: &str) -> String {
        let mut out = String::with_capacity(sql.len() + 8);
        let mut in_literal = false;
        let mut index = 0;

        for c in sql.chars() {
            if in_literal {
                out.push(c);
                if c == '\'' {
                    in_literal = false;
                }
                continue;
            }
            match c {
                '\'' => {
                    in_literal = true;
                    out.push(c);
                }
                '?' => {
                    index += 1;
                    out.push('$');
                    out.push_str(&index.to_string());
                }
                '`' => out.push('"'),
                _ => out.push(c),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_and_sqlite_pass_through() {
        let sql = "select `id` from `users` where `id`=?";
        assert!(matches!(Dialect::MySql.translate(sql), Cow::Borrowed(s) if s == sql));
        assert!(matches!(Dialect::Sqlite.translate(sql), Cow::Borrowed(s) if s == sql));
    }

    #[test]
    fn test_postgres_numbers_placeholders_and_requotes() {
        let sql = "update `users` set `name`=?, `email`=? where `id`=?";
        assert_eq!(
            Dialect::Postgres.translate(sql),
            "update \"users\" set \"name\"=$1, \"email\"=$2 where \"id\"=$3"
        );
    }

    #[test]
    fn test_postgres_leaves_literals_alone() {
        let sql = "select `id` from `t` where `a` = 'what?' and `b` = ? and `c` = 'it''s `x`'";
        assert_eq!(
            Dialect::Postgres.translate(sql),
            "select \"id\" from \"t\" where \"a\" = 'what?' and \"b\" = $1 and \"c\" = 'it''s `x`'"
        );
    }

    #[test]
    fn test_from_driver() {
        assert_eq!(Dialect::from(Driver::MySql), Dialect::MySql);
        assert_eq!(Dialect::from(Driver::Postgres), Dialect::Postgres);
        assert_eq!(Dialect::from(Driver::Sqlite), Dialect::Sqlite);
    }
}
