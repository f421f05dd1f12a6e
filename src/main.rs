// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use sfinance::{
    export_csv, init_logging, Category, CategoryFilter, ExpenseFilter, ExpenseStore, QueryResult,
    Settings, TimeFilter, ValidationError,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sfinance",
    version,
    about = "Record expenses and evaluate them by time window and category"
)]
struct Cli {
    /// Directory holding expenses.db
    #[arg(long, global = true, env = "SFINANCE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level for sfinance events (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "SFINANCE_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new expense
    Add {
        #[arg(long, short)]
        description: String,

        /// Food, Transport, Entertainment, Health, Utilities or Other
        #[arg(long, short)]
        category: Category,

        /// Defaults to today
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,

        /// Either `.` or `,` as decimal separator
        #[arg(long, short, allow_hyphen_values = true)]
        amount: String,

        #[arg(long, default_value = "")]
        comment: String,
    },

    /// List categories present in the database
    Categories,

    /// Show matching expenses and their total
    Query(FilterArgs),

    /// Write matching expenses to a CSV file
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, short)]
        output: PathBuf,
    },

    /// Interactive terminal UI (default)
    Ui,
}

#[derive(Args, Debug, Clone, Default)]
#[command(group(
    ArgGroup::new("window")
        .required(true)
        .args(["day", "week", "month", "from"])
))]
struct FilterArgs {
    /// Expenses on this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    day: Option<String>,

    /// Expenses in the ISO week of this date (any year)
    #[arg(long, value_name = "YYYY-MM-DD")]
    week: Option<String>,

    #[arg(long, value_name = "MM/YYYY")]
    month: Option<String>,

    /// Range start, inclusive
    #[arg(long, value_name = "YYYY-MM-DD", requires = "to")]
    from: Option<String>,

    /// Range end, inclusive
    #[arg(long, value_name = "YYYY-MM-DD", requires = "from")]
    to: Option<String>,

    /// Restrict to one stored category ("All Categories" for none)
    #[arg(long)]
    category: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> Result<ExpenseFilter, ValidationError> {
        let time = match (&self.day, &self.week, &self.month, &self.from, &self.to) {
            (Some(day), ..) => TimeFilter::day(day)?,
            (_, Some(week), ..) => TimeFilter::week(week)?,
            (_, _, Some(month), ..) => TimeFilter::month_from_str(month)?,
            (_, _, _, Some(from), Some(to)) => TimeFilter::custom_range(from, to)?,
            // clap enforces one window; an incomplete range lands here
            _ => return Err(ValidationError::InvalidDate(String::new())),
        };

        Ok(ExpenseFilter::new(time).with_category(CategoryFilter::from(self.category.clone())))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.data_dir.clone(), cli.log_level.clone());

    let command = cli.command.unwrap_or(Command::Ui);

    // The TUI owns the terminal, so its events go to a file
    let log_file = matches!(command, Command::Ui).then(|| settings.log_path());
    init_logging(&settings, log_file.as_deref()).context("Failed to set up logging")?;

    let db_path = settings.database_path();
    let store = ExpenseStore::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    match command {
        Command::Add {
            description,
            category,
            date,
            amount,
            comment,
        } => {
            let date = date.unwrap_or_else(today);
            let id = store
                .insert(&description, category, &date, &amount, &comment)
                .context("Expense not added")?;
            println!("✓ Expense added (id {})", id);
        }
        Command::Categories => {
            for category in store.distinct_categories()? {
                println!("{}", category);
            }
        }
        Command::Query(args) => {
            let filter = args.to_filter()?;
            let result = store.query(&filter)?;
            print_result(&filter, &result);
        }
        Command::Export { filter, output } => {
            let filter = filter.to_filter()?;
            let result = store.query(&filter)?;
            let written = export_csv(&output, &result)?;
            println!("✓ Exported {} expense(s) to {}", written, output.display());
            println!("Total Sum: {} €", result.total_display());
        }
        Command::Ui => run_ui_mode(&store)?,
    }

    Ok(())
}

fn today() -> String {
    chrono::Local::now()
        .date_naive()
        .format(sfinance::expense::DATE_FORMAT)
        .to_string()
}

fn print_result(filter: &ExpenseFilter, result: &QueryResult) {
    let scope = match &filter.category {
        CategoryFilter::All => sfinance::ALL_CATEGORIES.to_string(),
        CategoryFilter::Only(category) => category.clone(),
    };
    println!("📊 {} expense(s), {}, {}", result.len(), filter.time, scope);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for expense in &result.rows {
        println!(
            "{:<10}  {:<14}  {:>10}  {}{}",
            expense.date,
            expense.category,
            expense.amount_display(),
            expense.description,
            if expense.comment.is_empty() {
                String::new()
            } else {
                format!("  ({})", expense.comment)
            }
        );
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total Sum: {} €", result.total_display());
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: &ExpenseStore) -> Result<()> {
    let mut app = ui::App::new(store)?;
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: &ExpenseStore) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the CLI: sfinance query --help");
    std::process::exit(1);
}
