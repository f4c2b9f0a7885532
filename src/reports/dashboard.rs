//! Dashboard
//!
//! Headline totals, recent activity, spending by category and the monthly
//! income/expense series for one user, optionally scoped to an account type.

use serde::Serialize;

use crate::display::truncate;
use crate::models::{AccountType, Money, Transaction};

use super::aggregation::{
    category_breakdown, monthly_series, totals_for_account, CategoryTotal, MonthlyPoint, Totals,
};

/// Number of recent transactions shown
pub const RECENT_COUNT: usize = 5;

/// Width of the longest bar in the monthly chart
const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub account_type: Option<AccountType>,
    pub totals: Totals,
    pub recent: Vec<Transaction>,
    pub categories: Vec<CategoryTotal>,
    pub monthly: Vec<MonthlyPoint>,
}

impl Dashboard {
    pub fn generate(transactions: &[Transaction], account_type: Option<AccountType>) -> Self {
        let mut scoped: Vec<Transaction> = transactions
            .iter()
            .filter(|t| account_type.map_or(true, |a| t.account_type == a))
            .cloned()
            .collect();
        scoped.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        Self {
            account_type,
            totals: totals_for_account(transactions, account_type),
            categories: category_breakdown(&scoped),
            monthly: monthly_series(&scoped),
            recent: scoped.into_iter().take(RECENT_COUNT).collect(),
        }
    }

    fn scope_label(&self) -> &'static str {
        match self.account_type {
            None => "All Transactions",
            Some(AccountType::Personal) => "Personal Transactions",
            Some(AccountType::Business) => "Business Transactions",
        }
    }

    /// Format the dashboard for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Dashboard: {}\n", self.scope_label()));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Income:   {:>14}\n", self.totals.income));
        output.push_str(&format!("Expenses: {:>14}\n", self.totals.expenses));
        output.push_str(&format!("Balance:  {:>14}\n", self.totals.balance));

        output.push_str("\nRecent transactions\n");
        if self.recent.is_empty() {
            output.push_str("  No data\n");
        }
        for txn in &self.recent {
            let sign = if txn.is_income() { "+" } else { "-" };
            output.push_str(&format!(
                "  {} {:<24} {:<16} {}{}\n",
                txn.date,
                truncate(&txn.description, 24),
                truncate(txn.display_category(), 16),
                sign,
                txn.amount
            ));
        }

        output.push_str("\nSpending by category\n");
        if self.categories.is_empty() {
            output.push_str("  No data\n");
        }
        for category in &self.categories {
            output.push_str(&format!(
                "  {:<24} {:>12} {:>6.1}%\n",
                truncate(&category.category, 24),
                category.amount,
                category.percentage
            ));
        }

        output.push_str("\nMonthly income / expenses\n");
        if self.monthly.is_empty() {
            output.push_str("  No data\n");
        }
        let peak = self
            .monthly
            .iter()
            .map(|m| m.income.max(m.expenses))
            .max()
            .unwrap_or_default();
        for point in &self.monthly {
            output.push_str(&format!(
                "  {}  in  {:>12} {}\n",
                point.key(),
                point.income,
                bar(point.income, peak)
            ));
            output.push_str(&format!(
                "           out {:>12} {}\n",
                point.expenses,
                bar(point.expenses, peak)
            ));
        }
        output
    }
}

fn bar(amount: Money, peak: Money) -> String {
    if !peak.is_positive() {
        return String::new();
    }
    let width = (amount.cents() as f64 / peak.cents() as f64 * BAR_WIDTH as f64).round() as usize;
    "#".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionType, UserId};
    use chrono::NaiveDate;

    fn txn(kind: TransactionType, cents: i64, account: AccountType, month: u32, day: u32) -> Transaction {
        let mut t = Transaction::new(
            UserId::new(),
            kind,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
        );
        t.account_type = account;
        t.category = "General".into();
        t
    }

    #[test]
    fn test_dashboard_scope_and_recent() {
        let transactions: Vec<Transaction> = (1..=8)
            .map(|day| txn(TransactionType::Expense, 1000, AccountType::Personal, 1, day))
            .chain(std::iter::once(txn(
                TransactionType::Income,
                50000,
                AccountType::Business,
                2,
                1,
            )))
            .collect();

        let all = Dashboard::generate(&transactions, None);
        assert_eq!(all.recent.len(), RECENT_COUNT);
        assert_eq!(all.recent[0].date.to_string(), "2025-02-01");
        assert_eq!(all.totals.balance.cents(), 42000);
        assert_eq!(all.monthly.len(), 2);

        let personal = Dashboard::generate(&transactions, Some(AccountType::Personal));
        assert_eq!(personal.totals.income.cents(), 0);
        assert_eq!(personal.totals.expenses.cents(), 8000);
        assert_eq!(personal.monthly.len(), 1);
    }

    #[test]
    fn test_empty_dashboard_says_no_data() {
        let dashboard = Dashboard::generate(&[], None);
        let text = dashboard.format_terminal();
        assert!(text.contains("No data"));
        assert!(text.contains("Balance:"));
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(Money::from_cents(50), Money::from_cents(100)).len(), 15);
        assert_eq!(bar(Money::zero(), Money::zero()), "");
    }
}
