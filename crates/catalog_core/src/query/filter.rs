//! Filter predicates over product columns.

use rusqlite::types::Value;

/// Boolean condition over product rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact name match.
    NameEq(String),
    /// Substring match on name.
    NameContains { needle: String, ignore_case: bool },
    /// Inclusive price range.
    PriceBetween { min: i64, max: i64 },
    /// Inclusive stock range.
    StockBetween { min: i64, max: i64 },
    And(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn name_eq(name: impl Into<String>) -> Self {
        Self::NameEq(name.into())
    }

    pub fn name_contains(needle: impl Into<String>) -> Self {
        Self::NameContains {
            needle: needle.into(),
            ignore_case: false,
        }
    }

    /// Both sides fold through the `unicode_lower` connection function, so
    /// non-ASCII letters match regardless of case.
    pub fn name_contains_ignore_case(needle: impl Into<String>) -> Self {
        Self::NameContains {
            needle: needle.into(),
            ignore_case: true,
        }
    }

    pub fn price_between(min: i64, max: i64) -> Self {
        Self::PriceBetween { min, max }
    }

    pub fn stock_between(min: i64, max: i64) -> Self {
        Self::StockBetween { min, max }
    }

    pub fn and(self, other: Predicate) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Appends this predicate as SQL to `sql`, pushing bind values in order.
    pub(crate) fn render(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::NameEq(name) => {
                sql.push_str("name = ?");
                binds.push(Value::Text(name.clone()));
            }
            Self::NameContains {
                needle,
                ignore_case: false,
            } => {
                sql.push_str("instr(name, ?) > 0");
                binds.push(Value::Text(needle.clone()));
            }
            Self::NameContains {
                needle,
                ignore_case: true,
            } => {
                sql.push_str("instr(unicode_lower(name), unicode_lower(?)) > 0");
                binds.push(Value::Text(needle.clone()));
            }
            Self::PriceBetween { min, max } => {
                sql.push_str("price BETWEEN ? AND ?");
                binds.push(Value::Integer(*min));
                binds.push(Value::Integer(*max));
            }
            Self::StockBetween { min, max } => {
                sql.push_str("stock BETWEEN ? AND ?");
                binds.push(Value::Integer(*min));
                binds.push(Value::Integer(*max));
            }
            Self::And(left, right) => {
                sql.push('(');
                left.render(sql, binds);
                sql.push_str(" AND ");
                right.render(sql, binds);
                sql.push(')');
            }
        }
    }
}
