use serde::Serialize;

/// One settled operation matching the category filter.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySpendingRow {
    pub date: String,
    pub card: String,
    pub status: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
}

/// Mean settled spend for one operation date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyMeanRow {
    pub date: String,
    pub mean_amount: f64,
}

/// Workday/weekend mean split. A partition with no operations has no mean,
/// not a zero.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkdaySplit {
    pub workday: Option<f64>,
    pub weekend: Option<f64>,
}
