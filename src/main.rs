// Shift Calendar
// Command line front end over the shift database

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use shift_calendar::calendar::ScheduleCalendar;
use shift_calendar::models::filter::ShiftFilter;
use shift_calendar::models::shift::{EmployeeId, Shift};
use shift_calendar::services::persistence::SqliteShiftRepository;
use shift_calendar::services::render::text::render_month;
use shift_calendar::services::settings::ConfigService;
use shift_calendar::services::shift::ShiftService;
use shift_calendar::services::store::ShiftStore;
use shift_calendar::utils::date::MonthKey;

#[derive(Parser)]
#[command(name = "shift-calendar")]
#[command(version)]
#[command(about = "Inspect and exchange staff shift schedules", long_about = None)]
struct Cli {
    /// Config file, defaults to the platform config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Shift database, overrides the configured path
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the month grid with shift counts
    Show {
        /// Month as YYYY-MM
        month: String,

        /// Only count shifts of this employee
        #[arg(short, long)]
        employee: Option<String>,
    },
    /// List employees booked more than once on the same day
    Conflicts {
        /// Month as YYYY-MM
        month: String,
    },
    /// Load shifts from a JSON file, keeping their ids
    Import {
        file: PathBuf,
    },
    /// Write shifts to a JSON file
    Export {
        file: PathBuf,

        /// Only export this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let config = config_service.load_or_default();
    let db_path = cli
        .database
        .clone()
        .unwrap_or_else(|| config_service.database_path(&config));
    let repository = open_repository(&db_path)?;

    match cli.command {
        Commands::Show { month, employee } => {
            let month = parse_month(&month)?;
            let store = ShiftStore::load(Box::new(repository))?;
            let mut calendar = ScheduleCalendar::new(store, month, &config);
            if let Some(employee) = employee {
                calendar.set_filter(ShiftFilter::for_employee(EmployeeId::new(employee)));
            }

            print!("{}", render_month(calendar.snapshot()));
            for cell in calendar.snapshot().cells.iter().filter(|c| !c.shifts.is_empty()) {
                for view in &cell.shifts {
                    println!("{}", describe_shift(&view.shift));
                }
            }
        }
        Commands::Conflicts { month } => {
            let month = parse_month(&month)?;
            let store = ShiftStore::load(Box::new(repository))?;
            let bookings = store.double_bookings(month);
            if bookings.is_empty() {
                println!("No double-bookings in {}", month);
            }
            for booking in bookings {
                println!(
                    "{} {} has {} shifts",
                    booking.date,
                    booking.employee_id,
                    booking.shift_ids.len()
                );
            }
        }
        Commands::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let shifts: Vec<Shift> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a shift list", file.display()))?;
            let service = ShiftService::new(repository.database().connection());
            let count = service.import(&shifts)?;
            log::info!("Imported {} shifts from {}", count, file.display());
            println!("Imported {} shifts", count);
        }
        Commands::Export { file, month } => {
            let service = ShiftService::new(repository.database().connection());
            let shifts = match month {
                Some(month) => service.find_by_month(parse_month(&month)?)?,
                None => service.list_all()?,
            };
            let json = serde_json::to_string_pretty(&shifts)?;
            fs::write(&file, json)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            println!("Exported {} shifts", shifts.len());
        }
    }

    Ok(())
}

fn open_repository(path: &Path) -> Result<SqliteShiftRepository> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    log::info!("Using shift database {}", path.display());
    SqliteShiftRepository::open(&path.to_string_lossy())
}

fn parse_month(value: &str) -> Result<MonthKey> {
    MonthKey::parse(value).ok_or_else(|| anyhow!("Expected a month as YYYY-MM, got '{}'", value))
}

fn describe_shift(shift: &Shift) -> String {
    let mut line = format!(
        "{} {}-{} {} {} ({})",
        shift.date,
        shift.start_time.format("%H:%M"),
        shift.end_time.format("%H:%M"),
        shift.employee_id,
        shift.location,
        shift.shift_type.as_str()
    );
    if let Some(theme) = &shift.theme {
        line.push_str(&format!(" \"{}\"", theme));
    }
    line
}
