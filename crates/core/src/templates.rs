//! Predefined double-entry transaction patterns.
//!
//! Each template names the suggested chart codes and the debit/credit role
//! of every leg; the user picks the concrete account IDs when executing
//! one. Exposed read-only so adapters can guide users through common
//! postings.

use serde::Serialize;

use crate::chart::SYSTEM_ACCOUNTS;

/// One side of a template transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    /// Suggested chart-of-accounts code.
    pub coa_code: i32,
    /// Human label like "Cash account" or "Revenue account".
    pub role: &'static str,
    /// Whether this leg is the debit side.
    pub is_debit: bool,
}

/// A reusable transaction pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Short name.
    pub name: &'static str,
    /// What the pattern records and why the legs point the way they do.
    pub description: &'static str,
    /// The legs, debit side first.
    pub entries: &'static [TemplateEntry],
}

/// The predefined transaction templates.
pub const TEMPLATES: &[Template] = &[
    Template {
        name: "Capital Injection",
        description: "Owner puts money into the business. The receiving asset increases (debit), Capital equity increases (credit).",
        entries: &[
            TemplateEntry { coa_code: 1010, role: "Receiving account (e.g. Cash, Reserves)", is_debit: true },
            TemplateEntry { coa_code: 3099, role: "Capital account", is_debit: false },
        ],
    },
    Template {
        name: "Customer Deposit",
        description: "Customer deposits funds. Cash increases (debit), Customer liability increases — we owe them (credit).",
        entries: &[
            TemplateEntry { coa_code: 1010, role: "Cash account", is_debit: true },
            TemplateEntry { coa_code: 2020, role: "Customer account", is_debit: false },
        ],
    },
    Template {
        name: "Customer Withdrawal",
        description: "Customer withdraws funds. Customer liability decreases — we owe them less (debit), Cash decreases (credit).",
        entries: &[
            TemplateEntry { coa_code: 2020, role: "Customer account", is_debit: true },
            TemplateEntry { coa_code: 1010, role: "Cash account", is_debit: false },
        ],
    },
    Template {
        name: "Record Service Revenue",
        description: "Earn income from services. Receivable increases — they owe us (debit), Revenue increases (credit).",
        entries: &[
            TemplateEntry { coa_code: 1020, role: "Receivable account", is_debit: true },
            TemplateEntry { coa_code: 4010, role: "Revenue account", is_debit: false },
        ],
    },
    Template {
        name: "Receive Payment",
        description: "Customer pays an invoice. Cash increases (debit), Receivable decreases — debt settled (credit).",
        entries: &[
            TemplateEntry { coa_code: 1010, role: "Cash account", is_debit: true },
            TemplateEntry { coa_code: 1020, role: "Receivable account", is_debit: false },
        ],
    },
    Template {
        name: "Pay Supplier",
        description: "Pay a supplier invoice. Payable decreases — debt settled (debit), Cash decreases (credit).",
        entries: &[
            TemplateEntry { coa_code: 2010, role: "Payable account", is_debit: true },
            TemplateEntry { coa_code: 1010, role: "Cash account", is_debit: false },
        ],
    },
    Template {
        name: "Pay Operating Expense",
        description: "Pay a business expense. Expense increases (debit), Cash decreases (credit).",
        entries: &[
            TemplateEntry { coa_code: 5010, role: "Expense account", is_debit: true },
            TemplateEntry { coa_code: 1010, role: "Cash account", is_debit: false },
        ],
    },
    Template {
        name: "Pay Salaries",
        description: "Pay employee wages. Salary expense increases (debit), Cash decreases (credit).",
        entries: &[
            TemplateEntry { coa_code: 5030, role: "Salary expense account", is_debit: true },
            TemplateEntry { coa_code: 1010, role: "Cash account", is_debit: false },
        ],
    },
    Template {
        name: "Collect Tax",
        description: "Record tax collected from a sale. Cash increases (debit), Tax liability increases — we owe the authority (credit).",
        entries: &[
            TemplateEntry { coa_code: 1010, role: "Cash account", is_debit: true },
            TemplateEntry { coa_code: 2098, role: "Tax liability account", is_debit: false },
        ],
    },
    Template {
        name: "Charge Customer Fee",
        description: "Deduct a fee from customer balance. Customer liability decreases (debit), Fee income recorded (credit).",
        entries: &[
            TemplateEntry { coa_code: 2020, role: "Customer account", is_debit: true },
            TemplateEntry { coa_code: 4090, role: "Fee income account", is_debit: false },
        ],
    },
    Template {
        name: "Write Off Bad Debt",
        description: "Write off an uncollectible amount. Write-off expense increases (debit), Receivable decreases (credit).",
        entries: &[
            TemplateEntry { coa_code: 5091, role: "Write-off account", is_debit: true },
            TemplateEntry { coa_code: 1020, role: "Receivable account", is_debit: false },
        ],
    },
    Template {
        name: "Earn Interest",
        description: "Record interest earned. Cash increases (debit), Interest revenue increases (credit).",
        entries: &[
            TemplateEntry { coa_code: 1010, role: "Cash account", is_debit: true },
            TemplateEntry { coa_code: 4099, role: "Interest income account", is_debit: false },
        ],
    },
];

/// The default account ID for a chart code: system accounts use their `~`
/// ID, regular accounts use the code itself.
#[must_use]
pub fn default_account_for_code(code: i32) -> String {
    SYSTEM_ACCOUNTS
        .iter()
        .find(|sa| sa.code == code)
        .map_or_else(|| code.to_string(), |sa| sa.id.to_string())
}
