//! Report assembly from store rows.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use lariledger_shared::types::money::{to_gel, WILDCARD_CURRENCY};

use super::types::{
    AccountBalanceRow, BalanceSheet, BalanceSheetLine, CategoryCodeBalance, CurrencyPosition,
    OpenCurrencyPosition, RegulatoryRatios, TrialBalance, TrialBalanceLine,
};
use crate::chart::{Account, Category};
use crate::ledger::EntryInput;

/// Pure report assembly over balance rows read from the store.
pub struct ReportService;

impl ReportService {
    /// Builds the balance sheet from per-account balance rows.
    ///
    /// Rows must already be filtered to non-zero balances and ordered by
    /// code. Wildcard-currency accounts are skipped: their multi-currency
    /// sum is meaningless (the currency position report covers them).
    /// Revenue and expense rows do not appear on a balance sheet and are
    /// ignored.
    #[must_use]
    pub fn balance_sheet(rows: Vec<AccountBalanceRow>) -> BalanceSheet {
        let mut report = BalanceSheet {
            assets: Vec::new(),
            liabilities: Vec::new(),
            equity: Vec::new(),
            total_assets: 0,
            total_liabilities: 0,
            total_equity: 0,
            balanced: false,
            generated_at: Utc::now(),
        };

        for row in rows {
            if row.currency == WILDCARD_CURRENCY {
                continue;
            }

            let gel = to_gel(row.balance, &row.currency);
            let line = BalanceSheetLine {
                account_id: row.account_id,
                account_name: row.account_name,
                balance: row.balance,
                currency: row.currency,
            };
            match row.category {
                Category::Assets => {
                    report.assets.push(line);
                    report.total_assets += gel;
                }
                Category::Liabilities => {
                    report.liabilities.push(line);
                    report.total_liabilities += gel;
                }
                Category::Equity => {
                    report.equity.push(line);
                    report.total_equity += gel;
                }
                Category::Revenue | Category::Expenses => {}
            }
        }

        // Liabilities and equity are stored negative, so the accounting
        // equation nets to zero in the reporting currency.
        report.balanced =
            report.total_assets + report.total_liabilities + report.total_equity == 0;
        report
    }

    /// Builds the trial balance from per-account balance rows.
    ///
    /// A positive balance is presented as a debit, a negative one as a
    /// credit in absolute value.
    #[must_use]
    pub fn trial_balance(rows: Vec<AccountBalanceRow>) -> TrialBalance {
        let mut report = TrialBalance {
            lines: Vec::new(),
            total_debit: 0,
            total_credit: 0,
            balanced: false,
            generated_at: Utc::now(),
        };

        for row in rows {
            let (debit, credit) = if row.balance > 0 {
                (row.balance, 0)
            } else {
                (0, -row.balance)
            };
            report.total_debit += debit;
            report.total_credit += credit;
            report.lines.push(TrialBalanceLine {
                account_id: row.account_id,
                account_name: row.account_name,
                debit,
                credit,
                currency: row.currency,
            });
        }

        report.balanced = report.total_debit == report.total_credit;
        report
    }

    /// Builds the open currency position from per-account balance rows.
    ///
    /// Every currency present on a real (non-wildcard) account gets a row,
    /// including currencies whose position is currently flat. Long is the
    /// asset-side sum; short and equity are negated from their credit-normal
    /// storage sign.
    #[must_use]
    pub fn open_currency_position(rows: &[AccountBalanceRow]) -> OpenCurrencyPosition {
        #[derive(Default)]
        struct Bucket {
            assets: i64,
            liabilities: i64,
            equity: i64,
            net: i64,
        }

        let mut by_currency: BTreeMap<&str, Bucket> = BTreeMap::new();
        for row in rows {
            if row.currency == WILDCARD_CURRENCY {
                continue;
            }
            let bucket = by_currency.entry(row.currency.as_str()).or_default();
            bucket.net += row.balance;
            match row.category {
                Category::Assets => bucket.assets += row.balance,
                Category::Liabilities => bucket.liabilities += -row.balance,
                Category::Equity => bucket.equity += -row.balance,
                Category::Revenue | Category::Expenses => {}
            }
        }

        let mut total_gel = 0;
        let positions = by_currency
            .into_iter()
            .map(|(currency, bucket)| {
                let gel_equivalent = to_gel(bucket.net, currency);
                total_gel += gel_equivalent;
                CurrencyPosition {
                    currency: currency.to_string(),
                    assets: bucket.assets,
                    liabilities: bucket.liabilities,
                    equity: bucket.equity,
                    net: bucket.net,
                    gel_equivalent,
                }
            })
            .collect();

        OpenCurrencyPosition {
            positions,
            total_gel,
            generated_at: Utc::now(),
        }
    }

    /// Computes the regulatory ratios from (category, code) balance groups.
    #[must_use]
    pub fn regulatory_ratios(rows: &[CategoryCodeBalance]) -> RegulatoryRatios {
        let mut ratios = RegulatoryRatios::default();
        for row in rows {
            Self::bucket_ratio_amount(&mut ratios, row.category, row.code, row.balance);
        }
        Self::recompute_percentages(&mut ratios);
        ratios
    }

    /// Projects the ratios after applying a set of proposed entries.
    ///
    /// Pure and store-free: adapters use it to show pre-trade impact.
    /// Entries on accounts absent from the map are skipped.
    #[must_use]
    pub fn project_ratios(
        current: &RegulatoryRatios,
        entries: &[EntryInput],
        accounts: &HashMap<String, Account>,
    ) -> RegulatoryRatios {
        let mut projected = current.clone();
        for entry in entries {
            let Some(account) = accounts.get(&entry.account_id) else {
                continue;
            };
            Self::bucket_ratio_amount(&mut projected, account.category, account.code, entry.amount);
        }
        Self::recompute_percentages(&mut projected);
        projected
    }

    /// The single bucketing rule shared by stored and projected ratios.
    fn bucket_ratio_amount(
        ratios: &mut RegulatoryRatios,
        category: Category,
        code: i32,
        amount: i64,
    ) {
        match category {
            Category::Assets => {
                ratios.total_assets += amount;
                if code == 1060 {
                    ratios.reserves += amount;
                }
            }
            // Credit-normal groups are stored negative; negate to report
            // positive magnitudes.
            Category::Equity => ratios.equity += -amount,
            Category::Liabilities => {
                if code == 2020 {
                    ratios.customer_deposits += -amount;
                }
            }
            Category::Revenue | Category::Expenses => {}
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn recompute_percentages(ratios: &mut RegulatoryRatios) {
        ratios.capital_adequacy = 0.0;
        ratios.leverage_ratio = 0.0;
        ratios.reserve_ratio = 0.0;
        if ratios.total_assets > 0 {
            ratios.capital_adequacy = ratios.equity as f64 / ratios.total_assets as f64 * 100.0;
            ratios.leverage_ratio = ratios.capital_adequacy;
        }
        if ratios.customer_deposits > 0 {
            ratios.reserve_ratio =
                ratios.reserves as f64 / ratios.customer_deposits as f64 * 100.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(
        account_id: &str,
        category: Category,
        currency: &str,
        balance: i64,
    ) -> AccountBalanceRow {
        AccountBalanceRow {
            account_id: account_id.to_string(),
            account_name: account_id.to_uppercase(),
            category,
            currency: currency.to_string(),
            balance,
        }
    }

    #[test]
    fn test_balance_sheet_sections_and_totals() {
        // 500.00 USD of assets against 500.00 USD of customer liabilities.
        let report = ReportService::balance_sheet(vec![
            row("1010-cash", Category::Assets, "USD", 50_000),
            row("2020-alice", Category::Liabilities, "USD", -50_000),
        ]);

        assert_eq!(report.assets.len(), 1);
        assert_eq!(report.liabilities.len(), 1);
        assert!(report.equity.is_empty());
        assert_eq!(report.total_assets, to_gel(50_000, "USD"));
        assert_eq!(report.total_liabilities, to_gel(-50_000, "USD"));
        assert_eq!(report.total_equity, 0);
        assert!(report.balanced);
    }

    #[test]
    fn test_balance_sheet_skips_wildcard_accounts() {
        let report = ReportService::balance_sheet(vec![
            row("~fx", Category::Assets, "*", -123),
            row("1010-cash", Category::Assets, "USD", 100),
            row("2020-a", Category::Liabilities, "USD", -100),
        ]);
        assert_eq!(report.assets.len(), 1);
        assert_eq!(report.assets[0].account_id, "1010-cash");
        assert!(report.balanced);
    }

    #[test]
    fn test_balance_sheet_unbalanced_across_currencies() {
        // Same nominal figures in different currencies do not cancel in GEL.
        let report = ReportService::balance_sheet(vec![
            row("1010-cash", Category::Assets, "USD", 10_000),
            row("2020-a", Category::Liabilities, "EUR", -10_000),
        ]);
        assert!(!report.balanced);
    }

    #[test]
    fn test_trial_balance_columns() {
        let report = ReportService::trial_balance(vec![
            row("1010-cash", Category::Assets, "USD", 50_000),
            row("2020-alice", Category::Liabilities, "USD", -30_000),
            row("4010-fees", Category::Revenue, "USD", -20_000),
        ]);

        assert_eq!(report.lines.len(), 3);
        assert_eq!(report.lines[0].debit, 50_000);
        assert_eq!(report.lines[0].credit, 0);
        assert_eq!(report.lines[1].credit, 30_000);
        assert_eq!(report.total_debit, 50_000);
        assert_eq!(report.total_credit, 50_000);
        assert!(report.balanced);
    }

    #[test]
    fn test_open_currency_position_buckets() {
        let report = ReportService::open_currency_position(&[
            row("1010-usd", Category::Assets, "USD", 100_000),
            row("2020-usd", Category::Liabilities, "USD", -80_000),
            row("3010", Category::Equity, "USD", -20_000),
            row("1010-eur", Category::Assets, "EUR", 5_000),
            row("~fx", Category::Assets, "*", -12_345),
        ]);

        assert_eq!(report.positions.len(), 2);
        let eur = &report.positions[0];
        assert_eq!(eur.currency, "EUR");
        assert_eq!(eur.net, 5_000);

        let usd = &report.positions[1];
        assert_eq!(usd.assets, 100_000);
        assert_eq!(usd.liabilities, 80_000);
        assert_eq!(usd.equity, 20_000);
        assert_eq!(usd.net, 0);
        assert_eq!(usd.gel_equivalent, 0);

        assert_eq!(report.total_gel, to_gel(5_000, "EUR"));
    }

    #[test]
    fn test_open_currency_position_keeps_flat_currencies() {
        let report = ReportService::open_currency_position(&[
            row("1010-gbp", Category::Assets, "GBP", 0),
        ]);
        assert_eq!(report.positions.len(), 1);
        assert_eq!(report.positions[0].currency, "GBP");
        assert_eq!(report.positions[0].net, 0);
    }

    #[test]
    fn test_regulatory_ratios_fixture() {
        // Assets 10,000,000; equity 1,200,000; reserves 1,500,000 on 1060;
        // customer deposits 8,000,000 on 2020.
        let rows = vec![
            CategoryCodeBalance { category: Category::Assets, code: 1010, balance: 8_500_000 },
            CategoryCodeBalance { category: Category::Assets, code: 1060, balance: 1_500_000 },
            CategoryCodeBalance { category: Category::Liabilities, code: 2020, balance: -8_000_000 },
            CategoryCodeBalance { category: Category::Liabilities, code: 2040, balance: -800_000 },
            CategoryCodeBalance { category: Category::Equity, code: 3010, balance: -1_200_000 },
        ];
        let ratios = ReportService::regulatory_ratios(&rows);

        assert_eq!(ratios.total_assets, 10_000_000);
        assert_eq!(ratios.equity, 1_200_000);
        assert_eq!(ratios.reserves, 1_500_000);
        assert_eq!(ratios.customer_deposits, 8_000_000);
        assert!((ratios.capital_adequacy - 12.0).abs() < f64::EPSILON);
        assert!((ratios.leverage_ratio - 12.0).abs() < f64::EPSILON);
        assert!((ratios.reserve_ratio - 18.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratios_zero_denominators() {
        let ratios = ReportService::regulatory_ratios(&[]);
        assert_eq!(ratios.capital_adequacy, 0.0);
        assert_eq!(ratios.reserve_ratio, 0.0);
    }

    #[test]
    fn test_project_ratios_applies_bucketing() {
        let current = ReportService::regulatory_ratios(&[
            CategoryCodeBalance { category: Category::Assets, code: 1010, balance: 10_000_000 },
            CategoryCodeBalance { category: Category::Equity, code: 3010, balance: -1_200_000 },
            CategoryCodeBalance { category: Category::Liabilities, code: 2020, balance: -8_000_000 },
        ]);

        let mut accounts = HashMap::new();
        accounts.insert(
            "1060-reserve".to_string(),
            Account {
                id: "1060-reserve".into(),
                name: "Reserves".into(),
                code: 1060,
                category: Category::Assets,
                currency: "USD".into(),
                is_system: false,
                created_at: Utc::now(),
            },
        );
        accounts.insert(
            "2020-alice".to_string(),
            Account {
                id: "2020-alice".into(),
                name: "Alice".into(),
                code: 2020,
                category: Category::Liabilities,
                currency: "USD".into(),
                is_system: false,
                created_at: Utc::now(),
            },
        );

        // A deposit routed straight to reserves: both sides grow.
        let entries = vec![
            EntryInput { account_id: "1060-reserve".into(), amount: 500_000, currency: "USD".into() },
            EntryInput { account_id: "2020-alice".into(), amount: -500_000, currency: "USD".into() },
        ];

        let projected = ReportService::project_ratios(&current, &entries, &accounts);
        assert_eq!(projected.total_assets, current.total_assets + 500_000);
        assert_eq!(projected.reserves, current.reserves + 500_000);
        assert_eq!(projected.customer_deposits, current.customer_deposits + 500_000);
        // Equity unchanged, assets grew: CAR falls.
        assert!(projected.capital_adequacy < current.capital_adequacy);
    }

    #[test]
    fn test_project_ratios_skips_unknown_accounts() {
        let current = RegulatoryRatios::default();
        let entries = vec![EntryInput {
            account_id: "ghost".into(),
            amount: 1_000,
            currency: "USD".into(),
        }];
        let projected = ReportService::project_ratios(&current, &entries, &HashMap::new());
        assert_eq!(projected, current);
    }
}
