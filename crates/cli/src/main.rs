use api_shared::auth::hash_password;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracker_core::constants::{DEFAULT_DATABASE_PATH, MAX_PAGE_SIZE};
use tracker_core::districts::districts_for_state;
use tracker_core::{
    export, Database, ExportFormat, ListFilter, ListQuery, PatientService, Report, ReportService,
    ReportState, SortOrder, StaffService, TrackerResult,
};
use tracker_types::NonEmptyText;

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Patient tracker administration CLI")]
struct Cli {
    /// SQLite database file (defaults to $TRACKER_DATABASE, then tracker.sqlite3)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and apply migrations
    Migrate,
    /// Create a staff account
    ///
    /// The password is read from $TRACKER_STAFF_PASSWORD, or else from the first line of stdin.
    CreateStaff {
        /// Login name
        username: String,
        /// Create an account without access to the review pages
        #[arg(long)]
        no_staff: bool,
    },
    /// List staff accounts
    ListStaff,
    /// List reports, optionally only those in one state
    ListReports {
        /// reported, verified, converted or invalid
        #[arg(long)]
        state: Option<String>,
    },
    /// List all patients
    ListPatients,
    /// Write the patient table to stdout
    Export {
        /// csv, json, latex or tsv
        #[arg(long, default_value = "csv")]
        format: String,
    },
    /// Print the known districts of a state
    Districts {
        /// State name (case-insensitive)
        state: String,
    },
}

fn database_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("TRACKER_DATABASE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
}

/// Read a new account's password without putting it on the command line.
///
/// # Returns
///
/// The value of `TRACKER_STAFF_PASSWORD` if set, otherwise the first line of stdin with the
/// line ending removed.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the password is empty.
fn read_password() -> Result<String, Box<dyn std::error::Error>> {
    let password = match std::env::var("TRACKER_STAFF_PASSWORD") {
        Ok(password) => password,
        Err(_) => {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        return Err("password cannot be empty".into());
    }
    Ok(password)
}

/// Walk every page of reports, optionally restricted to one state.
fn reports_in_state(
    service: &ReportService,
    state: Option<ReportState>,
    page_size: usize,
) -> TrackerResult<Vec<Report>> {
    let mut query = ListQuery::first_page(page_size);
    let mut reports = Vec::new();
    loop {
        let page = service.list_in_state(state, &query)?;
        let done = page.items.is_empty() || query.page as u64 >= page.num_pages();
        reports.extend(page.items);
        if done {
            return Ok(reports);
        }
        let next = query.page + 1;
        query = query.with_page(next);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let path = database_path(cli.database);

    match cli.command {
        Some(Commands::Migrate) => {
            let db = Database::open(&path)?;
            println!(
                "Database {} is at schema version {}",
                path.display(),
                db.schema_version()?
            );
        }
        Some(Commands::CreateStaff { username, no_staff }) => {
            let password = read_password()?;
            let service = StaffService::new(Database::open(&path)?);
            let staff = service.create(
                NonEmptyText::new(&username)?,
                hash_password(&password),
                !no_staff,
            )?;
            println!("Created account {} (id {})", staff.username, staff.id);
        }
        Some(Commands::ListStaff) => {
            let service = StaffService::new(Database::open(&path)?);
            let accounts = service.list()?;
            if accounts.is_empty() {
                println!("No accounts found.");
            }
            for staff in accounts {
                println!(
                    "ID: {}, Username: {}, Staff: {}, Created: {}",
                    staff.id,
                    staff.username,
                    staff.is_staff,
                    staff.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Some(Commands::ListReports { state }) => {
            let state = match state.as_deref() {
                None => None,
                Some(name) => Some(
                    ReportState::parse(name).ok_or_else(|| format!("unknown state '{name}'"))?,
                ),
            };
            let service = ReportService::new(Database::open(&path)?);
            let reports = reports_in_state(&service, state, MAX_PAGE_SIZE)?;
            for report in &reports {
                println!(
                    "ID: {}, State: {}, District: {}, {}, Submitted: {}",
                    report.id,
                    report.report_state,
                    report.fields.detected_district,
                    report.fields.detected_state,
                    report.created_at.format("%Y-%m-%d %H:%M")
                );
            }
            if reports.is_empty() {
                println!("No reports found.");
            }
        }
        Some(Commands::ListPatients) => {
            let service = PatientService::new(Database::open(&path)?);
            let patients = service.list_all(&ListFilter::default(), SortOrder::default())?;
            if patients.is_empty() {
                println!("No patients found.");
            }
            for patient in patients {
                println!(
                    "ID: {}, Name: {}, District: {}, {}, Created: {}",
                    patient.id,
                    patient.fields.name.as_deref().unwrap_or("-"),
                    patient.fields.detected_district,
                    patient.fields.detected_state,
                    patient.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Some(Commands::Export { format }) => {
            let format = ExportFormat::parse(&format)
                .ok_or_else(|| format!("unknown export format '{format}'"))?;
            let service = PatientService::new(Database::open(&path)?);
            let patients = service.list_all(&ListFilter::default(), SortOrder::default())?;
            print!("{}", export::render(&patients, format)?);
        }
        Some(Commands::Districts { state }) => match districts_for_state(&state) {
            Some(districts) => {
                for district in districts {
                    println!("{district}");
                }
            }
            None => eprintln!("Unknown state: {state}"),
        },
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::PatientFields;

    fn submit(service: &ReportService, count: usize) {
        for _ in 0..count {
            let fields = PatientFields::new(
                NonEmptyText::new("Pune").unwrap(),
                NonEmptyText::new("Maharashtra").unwrap(),
            );
            service.submit(fields).unwrap();
        }
    }

    #[test]
    fn test_list_reports_walks_every_page() {
        let service = ReportService::new(Database::open_in_memory().unwrap());
        submit(&service, 5);

        let reports = reports_in_state(&service, None, 2).unwrap();
        assert_eq!(reports.len(), 5);
        let mut ids: Vec<_> = reports.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_list_reports_with_no_reports() {
        let service = ReportService::new(Database::open_in_memory().unwrap());
        let reports = reports_in_state(&service, Some(ReportState::Reported), 2).unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_create_staff_rejects_password_argument() {
        assert!(Cli::try_parse_from(["tracker", "create-staff", "amit"]).is_ok());
        assert!(
            Cli::try_parse_from(["tracker", "create-staff", "amit", "--password", "hunter2"])
                .is_err()
        );
    }
}
