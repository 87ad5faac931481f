/// One entry in a SELECT list.
///
/// `Column` entries are qualified with the owning table when they carry no
/// qualifier of their own; `Raw` entries pass through untouched, which is the
/// escape hatch for computed columns (`COUNT(*) AS total`, `users.*`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectExpr {
    Column(String),
    Raw(String),
}

impl SelectExpr {
    pub fn column(name: impl Into<String>) -> Self {
        SelectExpr::Column(name.into())
    }

    pub fn raw(expr: impl Into<String>) -> Self {
        SelectExpr::Raw(expr.into())
    }
}

impl From<&str> for SelectExpr {
    fn from(name: &str) -> Self {
        SelectExpr::Column(name.to_string())
    }
}

impl From<String> for SelectExpr {
    fn from(name: String) -> Self {
        SelectExpr::Column(name)
    }
}
