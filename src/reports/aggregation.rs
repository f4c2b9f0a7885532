//! Aggregations over transaction lists
//!
//! Pure functions shared by the dashboard, reports and insights. Every
//! function accepts any slice of transactions; callers decide what is in
//! scope.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::{AccountType, Money, Transaction, TransactionType};

/// Income, expenses and balance of a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Money,
    pub expenses: Money,
    /// Always `income - expenses`
    pub balance: Money,
    pub income_count: usize,
    pub expense_count: usize,
}

/// Expense total of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
    pub count: usize,
    /// Share of total expenses, in percent
    pub percentage: f64,
}

/// Income and expenses of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub income: Money,
    pub expenses: Money,
}

impl MonthlyPoint {
    /// Year-month key ("2025-01")
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for txn in transactions {
        match txn.transaction_type {
            TransactionType::Income => {
                totals.income += txn.amount;
                totals.income_count += 1;
            }
            TransactionType::Expense => {
                totals.expenses += txn.amount;
                totals.expense_count += 1;
            }
        }
    }
    totals.balance = totals.income - totals.expenses;
    totals
}

/// Totals restricted to one account type (all transactions when `None`)
pub fn totals_for_account(transactions: &[Transaction], account_type: Option<AccountType>) -> Totals {
    match account_type {
        None => totals(transactions),
        Some(kind) => {
            let scoped: Vec<Transaction> = transactions
                .iter()
                .filter(|t| t.account_type == kind)
                .cloned()
                .collect();
            totals(&scoped)
        }
    }
}

/// Expense amounts per category, largest first
///
/// Ties are broken by category name so the order is stable. Empty categories
/// are grouped under "Uncategorized".
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<&str, (Money, usize)> = HashMap::new();
    let mut total = Money::zero();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let entry = by_category
            .entry(txn.display_category())
            .or_insert((Money::zero(), 0));
        entry.0 += txn.amount;
        entry.1 += 1;
        total += txn.amount;
    }

    let mut breakdown: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (amount, count))| CategoryTotal {
            category: category.to_string(),
            amount,
            count,
            percentage: amount.percent_of(total),
        })
        .collect();

    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
    breakdown
}

/// Per-month income and expenses, oldest month first
pub fn monthly_series(transactions: &[Transaction]) -> Vec<MonthlyPoint> {
    use chrono::Datelike;

    let mut months: BTreeMap<(i32, u32), (Money, Money)> = BTreeMap::new();
    for txn in transactions {
        let entry = months
            .entry((txn.date.year(), txn.date.month()))
            .or_insert((Money::zero(), Money::zero()));
        if txn.is_income() {
            entry.0 += txn.amount;
        } else {
            entry.1 += txn.amount;
        }
    }

    months
        .into_iter()
        .map(|((year, month), (income, expenses))| MonthlyPoint {
            year,
            month,
            income,
            expenses,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use chrono::NaiveDate;

    fn txn(kind: TransactionType, cents: i64, category: &str, y: i32, m: u32, d: u32) -> Transaction {
        let mut t = Transaction::new(
            UserId::new(),
            kind,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        );
        t.category = category.to_string();
        t
    }

    fn sample() -> Vec<Transaction> {
        use TransactionType::*;
        vec![
            txn(Income, 300000, "Salary", 2025, 1, 1),
            txn(Expense, 120000, "Housing", 2025, 1, 2),
            txn(Expense, 4550, "Groceries", 2025, 1, 9),
            txn(Expense, 2575, "Groceries", 2025, 2, 3),
            txn(Expense, 1800, "", 2025, 2, 4),
            txn(Income, 25000, "Freelance", 2025, 2, 20),
            txn(Expense, 1800, "Dining", 2024, 12, 31),
        ]
    }

    #[test]
    fn test_balance_is_income_minus_expenses() {
        let t = totals(&sample());
        assert_eq!(t.income.cents(), 325000);
        assert_eq!(t.expenses.cents(), 130725);
        assert_eq!(t.balance, t.income - t.expenses);
        assert_eq!(t.income_count, 2);
        assert_eq!(t.expense_count, 5);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(totals(&[]), Totals::default());
        assert!(category_breakdown(&[]).is_empty());
        assert!(monthly_series(&[]).is_empty());
    }

    #[test]
    fn test_breakdown_sums_to_total_expenses() {
        let data = sample();
        let breakdown = category_breakdown(&data);
        let sum: Money = breakdown.iter().map(|c| c.amount).sum();
        assert_eq!(sum, totals(&data).expenses);

        let pct: f64 = breakdown.iter().map(|c| c.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_sorted_descending_with_stable_ties() {
        let breakdown = category_breakdown(&sample());
        let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Housing", "Groceries", "Dining", "Uncategorized"]);
        assert_eq!(breakdown[1].count, 2);
    }

    #[test]
    fn test_monthly_series_ordered() {
        let series = monthly_series(&sample());
        let keys: Vec<String> = series.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["2024-12", "2025-01", "2025-02"]);
        assert_eq!(series[1].income.cents(), 300000);
        assert_eq!(series[1].expenses.cents(), 124550);
        assert_eq!(series[2].net().cents(), 25000 - 2575 - 1800);
    }

    #[test]
    fn test_totals_for_account() {
        let mut data = sample();
        data[0].account_type = AccountType::Business;
        let business = totals_for_account(&data, Some(AccountType::Business));
        assert_eq!(business.income.cents(), 300000);
        assert_eq!(business.expenses, Money::zero());
        let all = totals_for_account(&data, None);
        assert_eq!(all, totals(&data));
    }
}
