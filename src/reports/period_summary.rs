//! Period Summary
//!
//! Weekly or monthly summary of a user's income and expenses: totals,
//! per-category flows, top categories and a day-by-day series.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::models::{Money, PeriodKind, SummaryPeriod, Transaction};

/// Number of categories listed in the top lists
pub const TOP_CATEGORIES: usize = 5;

/// Income and expense flow of one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryFlow {
    pub category: String,
    pub income: Money,
    pub income_count: usize,
    pub expenses: Money,
    pub expense_count: usize,
}

/// Income and expenses on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub income: Money,
    pub expenses: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub period: SummaryPeriod,
    pub income: Money,
    pub income_count: usize,
    pub expenses: Money,
    pub expense_count: usize,
    /// Every category with activity, by name
    pub categories: Vec<CategoryFlow>,
    /// Largest expense categories, at most five
    pub top_expenses: Vec<(String, Money)>,
    /// Largest income categories, at most five
    pub top_income: Vec<(String, Money)>,
    /// One point for every day of the period
    pub daily: Vec<DailyPoint>,
}

impl PeriodSummary {
    /// Summarize the transactions that fall inside `period`
    pub fn generate(transactions: &[Transaction], period: SummaryPeriod) -> Self {
        let mut categories: BTreeMap<String, CategoryFlow> = BTreeMap::new();
        let mut days: BTreeMap<NaiveDate, (Money, Money)> = period
            .days()
            .into_iter()
            .map(|d| (d, (Money::zero(), Money::zero())))
            .collect();

        let mut income = Money::zero();
        let mut expenses = Money::zero();
        let mut income_count = 0;
        let mut expense_count = 0;

        for txn in transactions.iter().filter(|t| period.contains(t.date)) {
            let flow = categories
                .entry(txn.display_category().to_string())
                .or_insert_with(|| CategoryFlow {
                    category: txn.display_category().to_string(),
                    ..Default::default()
                });
            let day = days.entry(txn.date).or_insert((Money::zero(), Money::zero()));

            if txn.is_income() {
                income += txn.amount;
                income_count += 1;
                flow.income += txn.amount;
                flow.income_count += 1;
                day.0 += txn.amount;
            } else {
                expenses += txn.amount;
                expense_count += 1;
                flow.expenses += txn.amount;
                flow.expense_count += 1;
                day.1 += txn.amount;
            }
        }

        let categories: Vec<CategoryFlow> = categories.into_values().collect();
        let top = |pick: fn(&CategoryFlow) -> Money| {
            let mut ranked: Vec<(String, Money)> = categories
                .iter()
                .map(|c| (c.category.clone(), pick(c)))
                .filter(|(_, amount)| amount.is_positive())
                .collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            ranked.truncate(TOP_CATEGORIES);
            ranked
        };
        let top_expenses = top(|c| c.expenses);
        let top_income = top(|c| c.income);

        let daily = days
            .into_iter()
            .map(|(date, (income, expenses))| DailyPoint {
                date,
                income,
                expenses,
            })
            .collect();

        Self {
            period,
            income,
            income_count,
            expenses,
            expense_count,
            categories,
            top_expenses,
            top_income,
            daily,
        }
    }

    pub fn net(&self) -> Money {
        self.income - self.expenses
    }

    pub fn is_empty(&self) -> bool {
        self.income_count + self.expense_count == 0
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} ({} to {})\n",
            self.period.label(),
            self.period.start_date(),
            self.period.end_date()
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No transactions in this period.\n");
            return output;
        }

        output.push_str(&format!(
            "Income:   {:>14}  ({} transactions)\n",
            self.income, self.income_count
        ));
        output.push_str(&format!(
            "Expenses: {:>14}  ({} transactions)\n",
            self.expenses, self.expense_count
        ));
        output.push_str(&format!("Net:      {:>14}\n", self.net()));

        if !self.top_expenses.is_empty() {
            output.push_str("\nTop expense categories\n");
            for (category, amount) in &self.top_expenses {
                output.push_str(&format!("  {:<28} {:>14}\n", category, amount));
            }
        }
        if !self.top_income.is_empty() {
            output.push_str("\nTop income categories\n");
            for (category, amount) in &self.top_income {
                output.push_str(&format!("  {:<28} {:>14}\n", category, amount));
            }
        }

        output.push_str(&format!(
            "\n{:<12} {:>14} {:>14}\n",
            "Day", "Income", "Expenses"
        ));
        output.push_str(&"-".repeat(42));
        output.push('\n');
        for point in &self.daily {
            output.push_str(&format!(
                "{:<12} {:>14} {:>14}\n",
                point.date.format("%a %d"),
                point.income,
                point.expenses
            ));
        }
        output
    }
}

/// Periods of the given kind that contain at least one transaction, newest first
pub fn periods_covered(
    transactions: &[Transaction],
    kind: PeriodKind,
    week_start: Weekday,
) -> Vec<SummaryPeriod> {
    let periods: BTreeSet<SummaryPeriod> = transactions
        .iter()
        .map(|t| SummaryPeriod::containing(kind, t.date, week_start))
        .collect();
    periods.into_iter().rev().collect()
}
