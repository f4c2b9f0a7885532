//! Spending insights
//!
//! Compares a month's expenses with the previous month: the categories
//! taking the largest share, categories whose spend jumped, and short
//! recommendations derived from both.

use serde::Serialize;

use crate::models::{Money, SummaryPeriod, Transaction};

use super::aggregation::category_breakdown;

/// Number of top categories reported
pub const TOP_INSIGHT_CATEGORIES: usize = 3;

/// Growth over the previous month, in percent, that counts as an anomaly
pub const ANOMALY_GROWTH_PERCENT: f64 = 25.0;

/// Smallest absolute increase that counts as an anomaly
const ANOMALY_MIN_INCREASE: Money = Money::from_cents(100);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    pub category: String,
    pub amount: Money,
    /// Share of the month's expenses, in percent
    pub percentage: f64,
    /// Change of that share versus the previous month, in percentage points
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub category: String,
    pub current: Money,
    pub previous: Money,
    /// Growth over the previous month, in percent
    pub growth: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingInsights {
    pub period: SummaryPeriod,
    pub total_spent: Money,
    pub previous_total: Money,
    pub top_categories: Vec<TopCategory>,
    pub anomalies: Vec<Anomaly>,
    pub recommendations: Vec<String>,
}

impl SpendingInsights {
    /// Insights for the month containing `month`, from all of a user's transactions
    pub fn generate(transactions: &[Transaction], month: SummaryPeriod) -> Self {
        let previous = month.prev();
        let in_period = |period: SummaryPeriod| -> Vec<Transaction> {
            transactions
                .iter()
                .filter(|t| period.contains(t.date))
                .cloned()
                .collect()
        };

        let current_breakdown = category_breakdown(&in_period(month));
        let previous_breakdown = category_breakdown(&in_period(previous));
        let previous_of = |category: &str| {
            previous_breakdown
                .iter()
                .find(|c| c.category == category)
        };

        let top_categories = current_breakdown
            .iter()
            .take(TOP_INSIGHT_CATEGORIES)
            .map(|c| TopCategory {
                category: c.category.clone(),
                amount: c.amount,
                percentage: c.percentage,
                change: c.percentage - previous_of(&c.category).map_or(0.0, |p| p.percentage),
            })
            .collect::<Vec<_>>();

        let mut anomalies = Vec::new();
        for current in &current_breakdown {
            let Some(prev) = previous_of(&current.category) else {
                continue;
            };
            if !prev.amount.is_positive() || current.amount - prev.amount < ANOMALY_MIN_INCREASE {
                continue;
            }
            let growth = (current.amount - prev.amount).percent_of(prev.amount);
            if growth >= ANOMALY_GROWTH_PERCENT {
                anomalies.push(Anomaly {
                    category: current.category.clone(),
                    current: current.amount,
                    previous: prev.amount,
                    growth,
                    message: format!(
                        "Your {} expenses are {:.0}% higher than last month.",
                        current.category.to_lowercase(),
                        growth
                    ),
                });
            }
        }

        let mut recommendations: Vec<String> = anomalies
            .iter()
            .map(|a| {
                format!(
                    "Review your {} spending; it rose from {} to {}.",
                    a.category.to_lowercase(),
                    a.previous,
                    a.current
                )
            })
            .collect();
        for top in top_categories.iter().filter(|t| t.change <= 0.0) {
            if previous_of(&top.category).is_some() {
                recommendations.push(format!(
                    "Your {} spending is well managed this month.",
                    top.category.to_lowercase()
                ));
            }
        }
        if recommendations.is_empty() && !current_breakdown.is_empty() {
            recommendations.push("Your spending is in line with last month.".to_string());
        }

        Self {
            period: month,
            total_spent: current_breakdown.iter().map(|c| c.amount).sum(),
            previous_total: previous_breakdown.iter().map(|c| c.amount).sum(),
            top_categories,
            anomalies,
            recommendations,
        }
    }

    /// Format the insights for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Spending Insights: {}\n", self.period.label()));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.top_categories.is_empty() {
            output.push_str("No expenses recorded this month.\n");
            return output;
        }

        output.push_str(&format!(
            "Spent {} (previous month {})\n\n",
            self.total_spent, self.previous_total
        ));

        output.push_str("Top categories\n");
        for top in &self.top_categories {
            output.push_str(&format!(
                "  {:<24} {:>12} {:>6.1}% ({:+.1} pts)\n",
                top.category, top.amount, top.percentage, top.change
            ));
        }

        if !self.anomalies.is_empty() {
            output.push_str("\nUnusual spending\n");
            for anomaly in &self.anomalies {
                output.push_str(&format!("  {}: {}\n", anomaly.category, anomaly.message));
            }
        }

        output.push_str("\nRecommendations\n");
        for recommendation in &self.recommendations {
            output.push_str(&format!("  - {}\n", recommendation));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionType, UserId};
    use chrono::NaiveDate;

    fn expense(cents: i64, category: &str, month: u32, day: u32) -> Transaction {
        let mut t = Transaction::new(
            UserId::new(),
            TransactionType::Expense,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
        );
        t.category = category.into();
        t
    }

    #[test]
    fn test_anomaly_detected_at_growth_threshold() {
        let transactions = vec![
            expense(10000, "Dining", 1, 10),
            expense(12500, "Dining", 2, 10),
            expense(20000, "Groceries", 1, 5),
            expense(18000, "Groceries", 2, 5),
        ];
        let insights =
            SpendingInsights::generate(&transactions, SummaryPeriod::Monthly { year: 2025, month: 2 });

        assert_eq!(insights.total_spent.cents(), 30500);
        assert_eq!(insights.anomalies.len(), 1);
        let anomaly = &insights.anomalies[0];
        assert_eq!(anomaly.category, "Dining");
        assert!((anomaly.growth - 25.0).abs() < 1e-9);
        assert_eq!(
            anomaly.message,
            "Your dining expenses are 25% higher than last month."
        );
        assert!(insights
            .recommendations
            .iter()
            .any(|r| r.contains("groceries spending is well managed")));
    }

    #[test]
    fn test_small_increase_is_not_an_anomaly() {
        let transactions = vec![expense(200, "Coffee", 1, 1), expense(290, "Coffee", 2, 1)];
        let insights =
            SpendingInsights::generate(&transactions, SummaryPeriod::Monthly { year: 2025, month: 2 });
        assert!(insights.anomalies.is_empty());
    }

    #[test]
    fn test_top_categories_change_in_points() {
        let transactions = vec![
            expense(5000, "Dining", 1, 1),
            expense(5000, "Travel", 1, 2),
            expense(7500, "Dining", 2, 1),
            expense(2500, "Travel", 2, 2),
        ];
        let insights =
            SpendingInsights::generate(&transactions, SummaryPeriod::Monthly { year: 2025, month: 2 });

        assert_eq!(insights.top_categories[0].category, "Dining");
        assert!((insights.top_categories[0].percentage - 75.0).abs() < 1e-9);
        assert!((insights.top_categories[0].change - 25.0).abs() < 1e-9);
        assert!((insights.top_categories[1].change + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_expenses() {
        let insights = SpendingInsights::generate(&[], SummaryPeriod::Monthly { year: 2025, month: 2 });
        assert!(insights.top_categories.is_empty());
        assert!(insights.recommendations.is_empty());
        assert!(insights.format_terminal().contains("No expenses"));
    }
}
