//! Report CLI commands
//!
//! Financial reports with terminal, CSV, JSON and PDF output, plus period
//! summaries and spending insights.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};
use tracing::warn;

use crate::config::settings::Settings;
use crate::error::{TallyError, TallyResult};
use crate::models::{NotificationKind, PeriodKind, SummaryPeriod, UserProfile};
use crate::reports::{periods_covered, FinancialReport, PeriodSummary, ReportFilter, SpendingInsights};
use crate::services::notification::report_ready_message;
use crate::services::{NotificationService, TransactionFilter, TransactionService, UserService};
use crate::storage::Storage;

use super::{parse_optional_date, parse_optional_kind, today};

/// Output format for a financial report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Print to the terminal
    Terminal,
    /// Comma-separated values
    Csv,
    /// Machine-readable JSON
    Json,
    /// Paginated PDF document
    #[value(alias = "document")]
    Pdf,
}

impl ReportFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::Terminal => "txt",
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Pdf => "PDF",
        }
    }
}

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate a financial report
    Generate {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// personal or business
        #[arg(short, long)]
        account: Option<String>,
        /// Only these categories (repeat or comma separate)
        #[arg(short, long, value_delimiter = ',')]
        category: Vec<String>,
        /// income or expense
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: ReportFormat,
        /// Output file, defaults to financial-report-<date> in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the weeks or months that have transactions
    Periods {
        /// List weeks instead of months
        #[arg(long)]
        weekly: bool,
    },
    /// Summarize one week or month
    Summary {
        /// Month (YYYY-MM) or any day of a week (YYYY-MM-DD); defaults to the current period
        period: Option<String>,
        /// Summarize a week instead of a month
        #[arg(long)]
        weekly: bool,
        /// Step back this many periods
        #[arg(long, default_value = "0", conflicts_with = "next")]
        previous: u32,
        /// Step forward this many periods
        #[arg(long, default_value = "0")]
        next: u32,
    },
    /// Spending insights for a month compared with the one before
    Insights {
        /// Month (YYYY-MM), defaults to the current month
        month: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> TallyResult<()> {
    let user = UserService::new(storage).current(settings)?;
    let transactions = TransactionService::new(storage).list(&user, &TransactionFilter::new())?;

    match cmd {
        ReportCommands::Generate {
            from,
            to,
            account,
            category,
            transaction_type,
            format,
            output,
        } => {
            let filter = ReportFilter {
                start: parse_optional_date(from.as_deref())?,
                end: parse_optional_date(to.as_deref())?,
                account_type: parse_optional_kind(account.as_deref())?,
                categories: category,
                transaction_type: parse_optional_kind(transaction_type.as_deref())?,
            };
            let report = FinancialReport::generate_with_format(
                &transactions,
                filter,
                user.name(),
                &settings.date_format,
            );

            if format == ReportFormat::Terminal {
                print!("{}", report.format_terminal());
                return Ok(());
            }
            if report.is_empty() {
                println!("No data for the selected filters. Nothing was written.");
                return Ok(());
            }

            let path = output.unwrap_or_else(|| PathBuf::from(report.file_name(format.extension())));
            write_report(&report, format, &path)?;
            println!("Report written to {}", path.display());
            notify_report_ready(storage, &user, format);
        }

        ReportCommands::Periods { weekly } => {
            let kind = if weekly { PeriodKind::Weekly } else { PeriodKind::Monthly };
            let periods = periods_covered(&transactions, kind, settings.week_start());
            if periods.is_empty() {
                println!("No transactions recorded yet.");
            }
            for period in periods {
                println!("{:<12} {}", period.to_string(), period.label());
            }
        }

        ReportCommands::Summary {
            period,
            weekly,
            previous,
            next,
        } => {
            let week_start = settings.week_start();
            let mut period = match period {
                Some(text) => SummaryPeriod::parse(&text, week_start)
                    .map_err(|e| TallyError::Validation(e.to_string()))?,
                None => {
                    let kind = if weekly { PeriodKind::Weekly } else { PeriodKind::Monthly };
                    SummaryPeriod::containing(kind, today(), week_start)
                }
            };
            for _ in 0..previous {
                period = period.prev();
            }
            for _ in 0..next {
                period = period.next();
            }

            let summary = PeriodSummary::generate(&transactions, period);
            print!("{}", summary.format_terminal());
            println!();
            println!("Previous: {}   Next: {}", period.prev(), period.next());
        }

        ReportCommands::Insights { month } => {
            let month = match month {
                Some(text) => match SummaryPeriod::parse(&text, settings.week_start()) {
                    Ok(period @ SummaryPeriod::Monthly { .. }) => period,
                    _ => {
                        return Err(TallyError::Validation(format!(
                            "Invalid month '{}'. Use YYYY-MM",
                            text
                        )))
                    }
                },
                None => SummaryPeriod::month_containing(today()),
            };
            let insights = SpendingInsights::generate(&transactions, month);
            print!("{}", insights.format_terminal());
        }
    }

    Ok(())
}

fn write_report(report: &FinancialReport, format: ReportFormat, path: &Path) -> TallyResult<()> {
    let create = || {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|e| TallyError::Export(format!("Cannot create {}: {}", path.display(), e)))
    };

    match format {
        ReportFormat::Csv => report.export_csv(create()?),
        ReportFormat::Json => report.export_json(create()?),
        ReportFormat::Pdf => report.export_pdf(create()?),
        ReportFormat::Terminal => {
            std::fs::write(path, report.format_terminal()).map_err(|e| {
                TallyError::Export(format!("Cannot write {}: {}", path.display(), e))
            })
        }
    }
}

fn notify_report_ready(storage: &Storage, user: &UserProfile, format: ReportFormat) {
    let result = NotificationService::new(storage).notify(
        user.id,
        NotificationKind::Report,
        "Report Ready",
        report_ready_message(format.label()),
    );
    if let Err(e) = result {
        warn!(user = %user.id, error = %e, "failed to create report notification");
    }
}
