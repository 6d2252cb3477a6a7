use std::collections::BTreeMap;

/// A single field value inside a [`Row`].
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Plain display rendering, before any column format is applied.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    /// Ordering used for column sorts: numbers before text, nulls last.
    pub fn sort_cmp(&self, other: &CellValue) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => match (self.is_null(), other.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.display().cmp(&other.display()),
            },
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(n) => Some(*n as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// A keyed record. Identity is the key; field order is irrelevant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    key: String,
    fields: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replaces the key, for sources that assign ids on insert.
    pub fn assign_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &CellValue)> {
        self.fields.iter()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(field.into(), value.into());
    }
}

/// How a column renders its values for display and clipboard export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueFormat {
    Plain,
    /// Symbol prefix plus thousands separators, e.g. `₩1,234,567`.
    Currency { symbol: String },
}

impl ValueFormat {
    pub fn render(&self, value: &CellValue) -> String {
        match self {
            ValueFormat::Plain => value.display(),
            ValueFormat::Currency { symbol } => match value {
                CellValue::Int(n) => format!("{symbol}{}", group_thousands(*n)),
                CellValue::Float(f) => format!("{symbol}{}", group_thousands(f.round() as i64)),
                other => other.display(),
            },
        }
    }
}

fn group_thousands(n: i64) -> String {
    let neg = n < 0;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if neg {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == lead % 3 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Column definition fed to the renderer. The checkbox column is a renderer
/// affordance and is never part of this list.
#[derive(Clone, Debug)]
pub struct Column {
    pub field: String,
    pub title: String,
    pub format: ValueFormat,
    pub width: u16,
    pub sortable: bool,
    pub filterable: bool,
}

impl Column {
    pub fn new(field: impl Into<String>, title: impl Into<String>, width: u16) -> Self {
        Self {
            field: field.into(),
            title: title.into(),
            format: ValueFormat::Plain,
            width,
            sortable: true,
            filterable: true,
        }
    }

    pub fn currency(mut self, symbol: impl Into<String>) -> Self {
        self.format = ValueFormat::Currency {
            symbol: symbol.into(),
        };
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Formatted display string for this column's value in `row`.
    pub fn render_value(&self, row: &Row) -> String {
        row.get(&self.field)
            .map(|v| self.format.render(v))
            .unwrap_or_default()
    }
}

/// A logical cell coordinate in rendered order: `row` indexes the rendered
/// (filtered/sorted) rows, `col` the visible data columns. The checkbox
/// column is excluded. Never a screen position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        let fmt = ValueFormat::Currency {
            symbol: "₩".to_string(),
        };
        assert_eq!(fmt.render(&CellValue::Int(0)), "₩0");
        assert_eq!(fmt.render(&CellValue::Int(999)), "₩999");
        assert_eq!(fmt.render(&CellValue::Int(65_000_000)), "₩65,000,000");
        assert_eq!(fmt.render(&CellValue::Int(-1234)), "₩-1,234");
    }

    #[test]
    fn currency_ignores_non_numeric() {
        let fmt = ValueFormat::Currency {
            symbol: "$".to_string(),
        };
        assert_eq!(fmt.render(&CellValue::Text("n/a".into())), "n/a");
        assert_eq!(fmt.render(&CellValue::Null), "");
    }

    #[test]
    fn sort_puts_numbers_before_text_and_nulls_last() {
        use std::cmp::Ordering;
        assert_eq!(
            CellValue::Int(2).sort_cmp(&CellValue::Float(10.0)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Int(1).sort_cmp(&CellValue::Text("a".into())),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Text("a".into()).sort_cmp(&CellValue::Null),
            Ordering::Less
        );
    }

    #[test]
    fn column_renders_missing_field_as_empty() {
        let col = Column::new("salary", "Salary", 12).currency("₩");
        let row = Row::new("1").with("name", "kim");
        assert_eq!(col.render_value(&row), "");
    }
}
