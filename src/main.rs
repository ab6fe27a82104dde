mod batch;
mod catalog;
mod db;
mod error;
mod model;
mod parser;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use catalog::{ContactFilter, ProjectFilter};
use db::Store;
use model::ContactForm;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "bds_import",
    about = "Normalize, import and browse real-estate project listings"
)]
struct Cli {
    /// SQLite database path (overrides BDS_DB_PATH and bds_import.toml)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw scraped JSON array into the project schema
    Normalize {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Import normalized projects, skipping names already stored
    Import {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Normalize + import in one pipeline
    Run {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Project catalog table
    List {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        district: Option<String>,
        /// Substring of the investor name
        #[arg(long)]
        investor: Option<String>,
        #[arg(long)]
        legal_status: Option<String>,
        /// Search name, slogan, summary and address
        #[arg(short, long)]
        search: Option<String>,
        /// Minimum price (first number of the per-m² price)
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(short, long, default_value = "1")]
        page: usize,
        #[arg(
            long,
            default_value = "20",
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        page_size: usize,
    },
    /// Print one stored project as JSON
    Show { id: String },
    /// Replace a stored project with a normalized JSON document
    Update {
        id: String,
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Delete a stored project
    Delete { id: String },
    /// Store a contact-form submission
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        service: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Contact submissions table
    Contacts {
        /// Service to show ("all" for every service)
        #[arg(long)]
        service: Option<String>,
        /// Substring of the submitter's name
        #[arg(long)]
        name: Option<String>,
        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show store statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }
    info!(db = %settings.db_path, "settings loaded");
    let opts = settings.extract_options();

    let result = match cli.command {
        Commands::Normalize { input, output } => {
            let (records, stats) = batch::normalize_file(&input, &output, &opts)?;
            println!(
                "Normalized {} projects ({} sparse) -> {}",
                records.len(),
                stats.sparse,
                output.display()
            );
            Ok(())
        }
        Commands::Import { input } => {
            let records: Vec<model::NormalizedRecord> = batch::read_json(&input)?;
            if records.is_empty() {
                println!("No projects in {}.", input.display());
                return Ok(());
            }
            let store = Store::open(&settings.db_path)?;
            println!("Importing {} projects...", records.len());
            let stats = batch::import_records(&store, &records)?;
            stats.print();
            Ok(())
        }
        Commands::Run { input, output } => {
            let t_normalize = Instant::now();
            let (records, stats) = batch::normalize_file(&input, &output, &opts)?;
            println!(
                "Normalized {} projects ({} sparse) in {:.1}s",
                stats.total,
                stats.sparse,
                t_normalize.elapsed().as_secs_f64()
            );

            let store = Store::open(&settings.db_path)?;
            println!("Importing {} projects...", records.len());
            let stats = batch::import_records(&store, &records)?;
            stats.print();
            Ok(())
        }
        Commands::List {
            city,
            district,
            investor,
            legal_status,
            search,
            min_price,
            max_price,
            page,
            page_size,
        } => {
            let store = Store::open(&settings.db_path)?;
            let filter = ProjectFilter {
                city,
                district,
                investor,
                legal_status,
                search,
                min_price,
                max_price,
            };
            let found = catalog::filter_projects(store.fetch_projects()?, &filter);
            let page_no = page.max(1);
            let page = catalog::paginate(found, page_no, page_size);
            if page.items.is_empty() {
                println!("No projects found.");
                return Ok(());
            }

            println!(
                "{:<20} | {:<28} | {:<14} | {:<12} | {:<22} | {:<18}",
                "ID", "Project", "District", "City", "Investor", "Price/m²"
            );
            println!("{}", "-".repeat(128));
            for p in &page.items {
                let r = &p.record;
                println!(
                    "{:<20} | {:<28} | {:<14} | {:<12} | {:<22} | {:<18}",
                    p.id,
                    truncate(&r.project_name, 28),
                    truncate(&r.location.district, 14),
                    truncate(&r.location.city, 12),
                    truncate(&r.investor, 22),
                    truncate(&r.pricing.price_per_sqm, 18),
                );
            }

            let more = if page.has_more { " | more: --page <n+1>" } else { "" };
            println!("\n{} of {} projects | page {}{}", page.items.len(), page.total, page_no, more);
            Ok(())
        }
        Commands::Show { id } => {
            let store = Store::open(&settings.db_path)?;
            match store.get_project(&id)? {
                Some(p) => {
                    println!("{}", serde_json::to_string_pretty(&p)?);
                    Ok(())
                }
                None => bail!("no project with id {}", id),
            }
        }
        Commands::Update { id, input } => {
            let record: model::NormalizedRecord = batch::read_json(&input)?;
            let store = Store::open(&settings.db_path)?;
            if !store.update_project(&id, &record)? {
                bail!("no project with id {}", id);
            }
            println!("Updated {} ({})", id, record.project_name);
            Ok(())
        }
        Commands::Delete { id } => {
            let store = Store::open(&settings.db_path)?;
            if !store.delete_project(&id)? {
                bail!("no project with id {}", id);
            }
            println!("Deleted {}", id);
            Ok(())
        }
        Commands::Contact {
            name,
            email,
            phone,
            service,
            message,
        } => {
            if name.trim().is_empty() {
                bail!("contact name must not be empty");
            }
            let store = Store::open(&settings.db_path)?;
            let id = store.insert_contact(&ContactForm {
                name,
                email,
                phone,
                service,
                message,
            })?;
            println!("Saved contact {}", id);
            Ok(())
        }
        Commands::Contacts {
            service,
            name,
            from,
            to,
            limit,
        } => {
            let store = Store::open(&settings.db_path)?;
            let filter = ContactFilter {
                service,
                name,
                start_date: from,
                end_date: to,
            };
            let found = catalog::filter_contacts(store.fetch_contacts()?, &filter);
            if found.is_empty() {
                println!("No contacts found.");
                return Ok(());
            }

            println!(
                "{:<19} | {:<22} | {:<26} | {:<12} | {:<12} | {:<30}",
                "Created", "Name", "Email", "Phone", "Service", "Message"
            );
            println!("{}", "-".repeat(136));
            for c in found.iter().take(limit) {
                println!(
                    "{:<19} | {:<22} | {:<26} | {:<12} | {:<12} | {:<30}",
                    c.created_at,
                    truncate(&c.form.name, 22),
                    truncate(&c.form.email, 26),
                    truncate(&c.form.phone, 12),
                    truncate(&c.form.service, 12),
                    truncate(&c.form.message, 30),
                );
            }
            println!("\n{} of {} contacts", found.len().min(limit), found.len());
            Ok(())
        }
        Commands::Stats => {
            let store = Store::open(&settings.db_path)?;
            let s = store.get_stats()?;
            println!("Projects: {}", s.projects);
            println!("Contacts: {}", s.contacts);
            if !s.by_city.is_empty() {
                println!("\n--- By city ---");
                for (city, n) in &s.by_city {
                    let city = if city.is_empty() { "(none)" } else { city.as_str() };
                    println!("  {:<16} {}", city, n);
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
