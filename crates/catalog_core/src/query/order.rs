//! Multi-field sort specification.

use super::QueryError;
use crate::model::product::ProductField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: ProductField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(field: ProductField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: ProductField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<SortOrder>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(orders: impl IntoIterator<Item = SortOrder>) -> Self {
        Self {
            orders: orders.into_iter().collect(),
        }
    }

    /// Appends a lower-precedence key.
    pub fn and(mut self, order: SortOrder) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    /// Parses `field[:asc|:desc]` keys separated by commas, e.g.
    /// `price:asc,stock:desc`. Direction defaults to ascending.
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        let mut orders = Vec::new();
        for key in value.split(',').map(str::trim).filter(|key| !key.is_empty()) {
            let (field_text, direction_text) = match key.split_once(':') {
                Some((field, direction)) => (field, Some(direction.trim())),
                None => (key, None),
            };
            let field = ProductField::parse(field_text)
                .ok_or_else(|| QueryError::UnknownField(field_text.trim().to_string()))?;
            let direction = match direction_text.map(str::to_ascii_lowercase).as_deref() {
                None | Some("asc") => Direction::Asc,
                Some("desc") => Direction::Desc,
                Some(other) => return Err(QueryError::InvalidDirection(other.to_string())),
            };
            orders.push(SortOrder { field, direction });
        }
        Ok(Self { orders })
    }

    /// Renders ` ORDER BY ...` with `number ASC` as the final tie breaker.
    pub(crate) fn render(&self) -> String {
        let mut keys: Vec<String> = self
            .orders
            .iter()
            .map(|order| format!("{} {}", order.field.column(), order.direction.sql()))
            .collect();
        if !self
            .orders
            .iter()
            .any(|order| order.field == ProductField::Number)
        {
            keys.push("number ASC".to_string());
        }
        format!(" ORDER BY {}", keys.join(", "))
    }
}
