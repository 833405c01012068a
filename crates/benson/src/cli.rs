//! Command-line surface of the portal.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use benson_core::costing::{Estimate, EstimateStatus, JobCostRecord, JobLaborRecord, JobRevenueRecord, JobStatus};
use benson_core::invoicing::PaymentTerms;
use benson_core::receipts::ReceiptDraft;
use benson_core::storage::{DataStore, DateRange};

use crate::fetch::Fetched;
use crate::services::{NewInvoice, PaymentEntry};
use crate::state::Portal;

/// Benson - Job costing, invoicing and reporting for a contracting business
#[derive(Parser, Debug)]
#[command(name = "benson")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pretty, global = true)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Indented JSON of the data only.
    Pretty,
    /// One line of JSON including cache metadata.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Jobs and their budget-versus-actual costing.
    #[command(subcommand)]
    Jobs(JobsCommand),

    /// Company-wide reports.
    #[command(subcommand)]
    Reports(ReportsCommand),

    /// The purchased item catalog.
    #[command(subcommand)]
    Items(ItemsCommand),

    /// Receipt intake.
    #[command(subcommand)]
    Receipts(ReceiptsCommand),

    /// Invoices and payments.
    #[command(subcommand)]
    Invoices(InvoicesCommand),

    /// Response cache maintenance.
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List every job.
    List,

    /// Show one job.
    Show { id: Uuid },

    /// Costing summary of every active job.
    Dashboard,

    /// Budget-versus-actual summary of one job.
    Summary { id: Uuid },

    /// Costs of one job per category.
    Breakdown { id: Uuid },

    /// Change a job's status (active, completed, on_hold, cancelled).
    Status { id: Uuid, status: String },

    /// Record an estimate for a job.
    Estimate {
        id: Uuid,
        #[arg(long)]
        amount: f64,
        /// draft, sent, accepted or rejected
        #[arg(long, default_value = "accepted")]
        status: String,
    },

    /// Record a manual cost against a job.
    Cost {
        id: Uuid,
        #[arg(long, default_value = "materials")]
        category: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: f64,
        /// Format: YYYY-MM-DD (defaults to today)
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },

    /// Record crew time against a job.
    Labor {
        id: Uuid,
        #[arg(long)]
        staff: String,
        #[arg(long)]
        hours: f64,
        /// Total labor cost for the entry.
        #[arg(long)]
        total: f64,
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },

    /// Record revenue received for a job.
    Revenue {
        id: Uuid,
        #[arg(long)]
        amount: f64,
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
        #[arg(long, value_name = "UUID")]
        invoice: Option<Uuid>,
    },
}

/// Inclusive report window. Defaults to the current year to date.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Format: YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Format: YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,
}

impl RangeArgs {
    fn resolve(&self, today: NaiveDate) -> anyhow::Result<DateRange> {
        let default = DateRange::year_to_date(today);
        Ok(DateRange::new(
            self.start.unwrap_or(default.start),
            self.end.unwrap_or(default.end),
        )?)
    }
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// Revenue, costs and monthly trend.
    Financial(RangeArgs),

    /// Receipt spend per vendor.
    Vendors(RangeArgs),

    /// Jobs currently in progress.
    Jobs,
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    /// List the whole catalog.
    List,

    /// Search items by name fragment.
    Search { keyword: String },

    /// Price history of one item.
    History { id: Uuid },

    /// Check whether a price strays from the item's average.
    Check {
        name: String,
        #[arg(long)]
        price: f64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReceiptsCommand {
    /// Save a reviewed receipt draft from a JSON file.
    Ingest { path: PathBuf },

    /// Suggest jobs for a receipt from its extracted text.
    Suggest { path: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum InvoicesCommand {
    /// List invoices, newest first.
    List {
        /// Only invoices whose number contains this text.
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one invoice.
    Show { id: Uuid },

    /// Issue a new draft invoice.
    Issue {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long, value_name = "UUID")]
        job: Option<Uuid>,
        /// Net 15, Net 30, Net 60 or Due on Receipt
        #[arg(long, default_value = "Net 30")]
        terms: String,
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },

    /// Record a payment against an invoice.
    Pay {
        id: Uuid,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        method: String,
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Drop cached responses.
    Clear {
        /// Glob over cache keys, e.g. "report_*" (defaults to everything)
        #[arg(long)]
        pattern: Option<String>,
    },
}

fn print_fetched<T: Serialize>(format: Format, fetched: &Fetched<T>) -> anyhow::Result<()> {
    tracing::debug!(from_cache = fetched.from_cache, "Read complete");
    match (format, &fetched.data) {
        (Format::Json, _) => println!("{}", serde_json::to_string(fetched)?),
        (Format::Pretty, Some(data)) => println!("{}", serde_json::to_string_pretty(data)?),
        (Format::Pretty, None) => println!("No data"),
    }
    Ok(())
}

fn print_value<T: Serialize>(format: Format, value: &T) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(value)?),
        Format::Pretty => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Runs one command against the portal.
pub async fn run<R: DataStore + 'static>(
    cli: Cli,
    portal: &Portal<R>,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Jobs(command) => run_jobs(command, portal, format, today).await,
        Command::Reports(command) => run_reports(command, portal, format, today).await,
        Command::Items(command) => run_items(command, portal, format).await,
        Command::Receipts(command) => run_receipts(command, portal, format, today).await,
        Command::Invoices(command) => run_invoices(command, portal, format, today).await,
        Command::Cache(CacheCommand::Clear { pattern }) => {
            portal.clear_cache(pattern.as_deref()).await;
            Ok(())
        }
    }
}

async fn run_jobs<R: DataStore + 'static>(
    command: JobsCommand,
    portal: &Portal<R>,
    format: Format,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match command {
        JobsCommand::List => print_fetched(format, &portal.jobs().await?),
        JobsCommand::Show { id } => print_fetched(format, &portal.job(id).await?),
        JobsCommand::Dashboard => print_fetched(format, &portal.active_jobs_costing().await?),
        JobsCommand::Summary { id } => print_fetched(format, &portal.job_summary(id).await?),
        JobsCommand::Breakdown { id } => print_fetched(format, &portal.job_breakdown(id).await?),
        JobsCommand::Status { id, status } => {
            let Some(status) = JobStatus::parse(&status) else {
                bail!("Unknown job status: {status}");
            };
            let Some(job) = portal.job(id).await?.data else {
                bail!("Job not found: {id}");
            };
            let job = job.with_status(status);
            portal.update_job(&job).await?;
            print_value(format, &job)
        }
        JobsCommand::Estimate { id, amount, status } => {
            let Some(status) = EstimateStatus::parse(&status) else {
                bail!("Unknown estimate status: {status}");
            };
            let estimate = Estimate::new(id, amount, status);
            portal.record_estimate(&estimate).await?;
            print_value(format, &estimate)
        }
        JobsCommand::Cost {
            id,
            category,
            description,
            amount,
            date,
        } => {
            let cost = JobCostRecord::new(id, category, description, amount, date.unwrap_or(today));
            portal.record_job_cost(&cost).await?;
            print_value(format, &cost)
        }
        JobsCommand::Labor {
            id,
            staff,
            hours,
            total,
            date,
        } => {
            let labor = JobLaborRecord::new(id, staff, hours, total, date.unwrap_or(today));
            portal.record_labor(&labor).await?;
            print_value(format, &labor)
        }
        JobsCommand::Revenue {
            id,
            amount,
            date,
            invoice,
        } => {
            let mut revenue = JobRevenueRecord::new(id, amount, date.unwrap_or(today));
            if let Some(invoice_id) = invoice {
                revenue = revenue.with_invoice(invoice_id);
            }
            portal.record_revenue(&revenue).await?;
            print_value(format, &revenue)
        }
    }
}

async fn run_reports<R: DataStore + 'static>(
    command: ReportsCommand,
    portal: &Portal<R>,
    format: Format,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match command {
        ReportsCommand::Financial(range) => {
            print_fetched(format, &portal.financial_report(range.resolve(today)?).await?)
        }
        ReportsCommand::Vendors(range) => {
            print_fetched(format, &portal.vendor_analysis(range.resolve(today)?).await?)
        }
        ReportsCommand::Jobs => print_fetched(format, &portal.job_performance().await?),
    }
}

async fn run_items<R: DataStore + 'static>(
    command: ItemsCommand,
    portal: &Portal<R>,
    format: Format,
) -> anyhow::Result<()> {
    match command {
        ItemsCommand::List => print_fetched(format, &portal.item_library().await?),
        ItemsCommand::Search { keyword } => {
            print_fetched(format, &portal.search_items(&keyword).await?)
        }
        ItemsCommand::History { id } => print_fetched(format, &portal.item_history(id).await?),
        ItemsCommand::Check { name, price } => {
            let warning = portal.price_warning(&name, price).await?;
            print_value(format, &json!({ "item_name": name, "price": price, "warning": warning }))
        }
    }
}

async fn run_receipts<R: DataStore + 'static>(
    command: ReceiptsCommand,
    portal: &Portal<R>,
    format: Format,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match command {
        ReceiptsCommand::Ingest { path } => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let draft: ReceiptDraft = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid receipt draft in {}", path.display()))?;

            let saved = portal.save_receipt(draft, today).await?;
            let failed: Vec<String> = saved.ledger.failures().map(ToString::to_string).collect();
            for failure in &failed {
                tracing::warn!(error = %failure, "Item ledger line failed");
            }
            let summary = saved.ledger.summary();
            print_value(
                format,
                &json!({
                    "receipt": saved.receipt,
                    "items_added": summary.added,
                    "items_updated": summary.updated,
                    "failed_lines": failed,
                    "job_costs": saved.job_costs,
                }),
            )
        }
        ReceiptsCommand::Suggest { path } => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            print_value(format, &portal.suggest_jobs(&text).await?)
        }
    }
}

async fn run_invoices<R: DataStore + 'static>(
    command: InvoicesCommand,
    portal: &Portal<R>,
    format: Format,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match command {
        InvoicesCommand::List { search } => {
            print_fetched(format, &portal.invoices(search.as_deref()).await?)
        }
        InvoicesCommand::Show { id } => print_fetched(format, &portal.invoice(id).await?),
        InvoicesCommand::Issue {
            amount,
            customer,
            job,
            terms,
            date,
        } => {
            let invoice = portal
                .issue_invoice(NewInvoice {
                    job_id: job,
                    customer_name: customer,
                    invoice_date: date.unwrap_or(today),
                    terms: PaymentTerms::from_label(&terms),
                    total_amount: amount,
                })
                .await?;
            print_value(format, &invoice)
        }
        InvoicesCommand::Pay {
            id,
            amount,
            method,
            date,
            notes,
        } => {
            let invoice = portal
                .record_payment(
                    id,
                    PaymentEntry {
                        amount,
                        payment_date: date.unwrap_or(today),
                        payment_method: method,
                        notes,
                    },
                )
                .await?;
            print_value(format, &invoice)
        }
    }
}
