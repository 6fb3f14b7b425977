use serde::{Deserialize, Serialize};

/// Status value of a settled operation. Spending reports only count these.
pub const STATUS_OK: &str = "OK";

/// Column headers of the source export, shared by the CSV and XLSX readers.
pub mod columns {
    pub const OCCURRED_AT: &str = "Дата операции";
    pub const CARD: &str = "Номер карты";
    pub const STATUS: &str = "Статус";
    pub const AMOUNT: &str = "Сумма платежа";
    pub const CURRENCY: &str = "Валюта платежа";
    pub const CASHBACK: &str = "Кэшбэк";
    pub const CATEGORY: &str = "Категория";
    pub const DESCRIPTION: &str = "Описание";
}

/// One row of a bank card operation export.
///
/// Date and amount keep their source string form (optional time-of-day
/// suffix, decimal commas); reports normalize them at the point of use so a
/// row that never reaches arithmetic never has to parse cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    /// Operation timestamp, `dd.mm.yyyy` with an optional ` HH:MM:SS` tail.
    #[serde(rename = "Дата операции")]
    pub occurred_at: String,
    /// Card label as exported, e.g. `*7197`. Only the final digits carry
    /// meaning.
    #[serde(rename = "Номер карты", default)]
    pub card: String,
    #[serde(rename = "Статус", default)]
    pub status: String,
    /// Signed payment amount; spending is negative.
    #[serde(rename = "Сумма платежа")]
    pub amount: String,
    #[serde(rename = "Валюта платежа", default)]
    pub currency: String,
    /// Reward amount. Absent on most rows.
    #[serde(rename = "Кэшбэк", default)]
    pub cashback: Option<String>,
    #[serde(rename = "Категория", default)]
    pub category: String,
    #[serde(rename = "Описание", default)]
    pub description: String,
}

impl Operation {
    pub fn new(occurred_at: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            occurred_at: occurred_at.into(),
            card: String::new(),
            status: STATUS_OK.to_string(),
            amount: amount.into(),
            currency: "RUB".to_string(),
            cashback: None,
            category: String::new(),
            description: String::new(),
        }
    }

    pub fn with_card(mut self, card: impl Into<String>) -> Self {
        self.card = card.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_cashback(mut self, cashback: impl Into<String>) -> Self {
        self.cashback = Some(cashback.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
