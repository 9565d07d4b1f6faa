// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const GST_RATE_MAX: u32 = 28;
pub const TDS_RATE_MAX: u32 = 20;
pub const MARGIN_PCT_MAX: u32 = 80;

/// Largest magnitude accepted for any money field. Tax and summary
/// arithmetic on values up to this bound stays far inside `Decimal`'s range.
pub const AMOUNT_MAX: i64 = 1_000_000_000_000_000;

/// Closed set of string-labelled values with an explicit lookup table.
///
/// `parse` matches the canonical label or one of the aliases, ignoring
/// ASCII case and surrounding whitespace. Callers decide the fallback.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        if needle.is_empty() {
            return None;
        }
        Self::ALL.iter().copied().find(|c| {
            c.as_str().eq_ignore_ascii_case(needle)
                || c.aliases().iter().any(|a| a.eq_ignore_ascii_case(needle))
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    Income,
    #[default]
    Expense,
}

impl Choice for RecordType {
    const ALL: &'static [Self] = &[RecordType::Income, RecordType::Expense];

    fn as_str(self) -> &'static str {
        match self {
            RecordType::Income => "Income",
            RecordType::Expense => "Expense",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            RecordType::Income => &["in", "credit", "receipt"],
            RecordType::Expense => &["out", "debit", "payment"],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Planned,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl Status {
    /// Terminal states are never left by engine passes.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Paid | Status::Cancelled)
    }
}

impl Choice for Status {
    const ALL: &'static [Self] = &[
        Status::Planned,
        Status::Pending,
        Status::Paid,
        Status::Overdue,
        Status::Cancelled,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Status::Planned => "Planned",
            Status::Pending => "Pending",
            Status::Paid => "Paid",
            Status::Overdue => "Overdue",
            Status::Cancelled => "Cancelled",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Status::Pending => &["confirmed", "invoiced", "due"],
            Status::Paid => &["received", "settled"],
            Status::Cancelled => &["canceled", "void"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
    Aed,
    Sgd,
    Aud,
    Cad,
}

impl Choice for Currency {
    const ALL: &'static [Self] = &[
        Currency::Inr,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Aed,
        Currency::Sgd,
        Currency::Aud,
        Currency::Cad,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Aed => "AED",
            Currency::Sgd => "SGD",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Currency::Inr => &["₹", "rs", "rupee"],
            Currency::Usd => &["$"],
            Currency::Eur => &["€"],
            Currency::Gbp => &["£"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Sales,
    Services,
    Sponsorship,
    Consulting,
    Rent,
    Salaries,
    Marketing,
    Logistics,
    Vendors,
    Utilities,
    Software,
    Travel,
    Compliance,
    Taxes,
    #[default]
    Other,
}

impl Choice for Category {
    const ALL: &'static [Self] = &[
        Category::Sales,
        Category::Services,
        Category::Sponsorship,
        Category::Consulting,
        Category::Rent,
        Category::Salaries,
        Category::Marketing,
        Category::Logistics,
        Category::Vendors,
        Category::Utilities,
        Category::Software,
        Category::Travel,
        Category::Compliance,
        Category::Taxes,
        Category::Other,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Category::Sales => "Sales",
            Category::Services => "Services",
            Category::Sponsorship => "Sponsorship",
            Category::Consulting => "Consulting",
            Category::Rent => "Rent",
            Category::Salaries => "Salaries",
            Category::Marketing => "Marketing",
            Category::Logistics => "Logistics",
            Category::Vendors => "Vendors",
            Category::Utilities => "Utilities",
            Category::Software => "Software",
            Category::Travel => "Travel",
            Category::Compliance => "Compliance",
            Category::Taxes => "Taxes",
            Category::Other => "Other",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Category::Salaries => &["payroll", "salary"],
            Category::Vendors => &["vendor"],
            Category::Taxes => &["tax"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Bank,
    #[serde(rename = "UPI")]
    Upi,
    Card,
    Cash,
    Cheque,
}

impl Choice for PaymentMethod {
    const ALL: &'static [Self] = &[
        PaymentMethod::Bank,
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::Cash,
        PaymentMethod::Cheque,
    ];

    fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Bank => "Bank",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Cheque => "Cheque",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            PaymentMethod::Bank => &["bank transfer", "neft", "imps", "rtgs", "wire"],
            PaymentMethod::Card => &["credit card", "debit card"],
            PaymentMethod::Cheque => &["check"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Calendar months per period; `None` for the fixed seven-day step.
    pub fn months(self) -> Option<u32> {
        match self {
            Frequency::Weekly => None,
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::Yearly => Some(12),
        }
    }
}

impl Choice for Frequency {
    const ALL: &'static [Self] = &[
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Yearly => "Yearly",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Frequency::Yearly => &["annual", "annually"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    RecordCreated,
    RecordUpdated,
    RecordDeleted,
    StatusChanged,
    OverdueMarked,
    RecurringSpawned,
    ImportCsv,
    ImportJson,
    ExportCsv,
    ExportJson,
    BudgetSaved,
    SettingsChanged,
    #[default]
    Other,
}

impl Choice for AuditAction {
    const ALL: &'static [Self] = &[
        AuditAction::RecordCreated,
        AuditAction::RecordUpdated,
        AuditAction::RecordDeleted,
        AuditAction::StatusChanged,
        AuditAction::OverdueMarked,
        AuditAction::RecurringSpawned,
        AuditAction::ImportCsv,
        AuditAction::ImportJson,
        AuditAction::ExportCsv,
        AuditAction::ExportJson,
        AuditAction::BudgetSaved,
        AuditAction::SettingsChanged,
        AuditAction::Other,
    ];

    fn as_str(self) -> &'static str {
        match self {
            AuditAction::RecordCreated => "RecordCreated",
            AuditAction::RecordUpdated => "RecordUpdated",
            AuditAction::RecordDeleted => "RecordDeleted",
            AuditAction::StatusChanged => "StatusChanged",
            AuditAction::OverdueMarked => "OverdueMarked",
            AuditAction::RecurringSpawned => "RecurringSpawned",
            AuditAction::ImportCsv => "ImportCsv",
            AuditAction::ImportJson => "ImportJson",
            AuditAction::ExportCsv => "ExportCsv",
            AuditAction::ExportJson => "ExportJson",
            AuditAction::BudgetSaved => "BudgetSaved",
            AuditAction::SettingsChanged => "SettingsChanged",
            AuditAction::Other => "Other",
        }
    }
}

macro_rules! display_via_choice {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_choice!(
    RecordType,
    Status,
    Currency,
    Category,
    PaymentMethod,
    Frequency,
    AuditAction
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurring {
    pub enabled: bool,
    pub freq: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run: Option<NaiveDate>,
}

/// A single income or expense ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRecord {
    pub id: String,
    pub r#type: RecordType,
    pub status: Status,
    pub amount: Decimal,
    pub currency: Currency,
    pub gst_rate: Decimal,
    pub gst_included: bool,
    pub tds_rate: Decimal,
    pub date: NaiveDate, // YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: Category,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_title: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurring>,
}

impl FinanceRecord {
    /// `YYYY-MM` of the effective date.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCosts {
    pub rent: Decimal,
    pub salaries: Decimal,
    pub marketing: Decimal,
    pub misc: Decimal,
    pub logistics: Decimal,
    pub compliance: Decimal,
}

impl FixedCosts {
    pub fn total(&self) -> Decimal {
        self.rent + self.salaries + self.marketing + self.misc + self.logistics + self.compliance
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub month: String, // YYYY-MM
    pub revenue_target: Decimal,
    pub expense_cap: Decimal,
    pub gross_margin_target_pct: Decimal,
    pub fixed_costs: FixedCosts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub at: DateTime<Utc>,
    pub actor_role: String,
    pub action: AuditAction,
    pub detail: String,
}

/// JSON backup document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub settings: serde_json::Value,
    pub budgets: Vec<BudgetLine>,
    pub txs: Vec<FinanceRecord>,
    pub audit: Vec<AuditEntry>,
}

pub const BACKUP_VERSION: u32 = 1;
