//! HAMS command line interface
//!
//! # Usage
//!
//! ```bash
//! # Provision a hall and its rooms
//! hams hall-add "Peace Hall" --gender female --total-rooms 2
//! hams room-add <hall-id> 101 --capacity 4
//!
//! # Register a student and book a room
//! hams student-add CSC/2020/001 "Ada Obi" ada@example.edu --gender female
//! hams verify-payment CSC/2020/001
//! hams book CSC/2020/001 --hall <hall-id>
//!
//! # Reports
//! hams slip CSC/2020/001
//! hams summary
//! ```

use clap::{Parser, Subcommand};
use uuid::Uuid;

use hams_core::models::{Gender, Hall, Payment, PaymentStatus, Room, Student};
use hams_core::{reports, BookingEngine, BookingRequest, Database, HamsConfig, TracingNotifier};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Hall allocation management system
#[derive(Parser, Debug)]
#[command(name = "hams")]
#[command(about = "Student hall room allocation")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Database file (overrides the configured location)
    #[arg(long)]
    database: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a hall
    HallAdd {
        name: String,
        #[arg(long, value_parser = parse_gender)]
        gender: Gender,
        #[arg(long)]
        total_rooms: u32,
    },
    /// Register a room in a hall
    RoomAdd {
        hall_id: Uuid,
        room_number: String,
        #[arg(long, default_value = "4")]
        capacity: u32,
    },
    /// Register a student
    StudentAdd {
        matric_number: String,
        full_name: String,
        email: String,
        #[arg(long, value_parser = parse_gender)]
        gender: Gender,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        level: Option<String>,
    },
    /// Record a hostel fee payment for a student
    PaymentAdd {
        matric_number: String,
        reference: String,
        /// Amount in minor currency units (kobo)
        amount: i64,
    },
    /// Mark a student's hostel fee as verified
    VerifyPayment { matric_number: String },
    /// Book a room for a student
    Book {
        matric_number: String,
        #[arg(long)]
        hall: Uuid,
        /// Explicit room choice; omitted means first fit
        #[arg(long)]
        room: Option<Uuid>,
    },
    /// Check whether a student can book, without booking
    Eligibility { matric_number: String },
    /// Flip a room's maintenance flag
    ToggleMaintenance {
        room_id: Uuid,
        #[arg(long)]
        actor: String,
    },
    /// Recompute hall availability caches from room occupancy
    Reconcile,
    /// List halls with vacancies for a gender
    Halls {
        #[arg(long, value_parser = parse_gender)]
        gender: Gender,
    },
    /// Print a student's allocation slip
    Slip { matric_number: String },
    /// Print allocation counts and per-hall occupancy
    Summary,
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    match raw.to_ascii_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        other => Err(format!("unknown gender '{other}' (expected male or female)")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let config = HamsConfig::load()?;
    let path = match &args.database {
        Some(path) => path.clone(),
        None => config.database_path()?,
    };
    let db = Database::open_with_busy_timeout(&path, config.busy_timeout())?;
    tracing::debug!(
        path = %path.display(),
        schema_version = db.schema_version(),
        "Database ready"
    );

    run(db, args.command)?;
    Ok(())
}

fn run(db: Database, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::HallAdd {
            name,
            gender,
            total_rooms,
        } => {
            let hall = Hall::new(name, gender, total_rooms);
            db.halls().create(&hall)?;
            println!("Hall registered: {} ({})", hall.name, hall.id);
        }
        Command::RoomAdd {
            hall_id,
            room_number,
            capacity,
        } => {
            let room = Room::new(hall_id, room_number, capacity);
            db.rooms().create(&room)?;
            println!("Room registered: {} ({})", room.room_number, room.id);
        }
        Command::StudentAdd {
            matric_number,
            full_name,
            email,
            gender,
            department,
            level,
        } => {
            let mut student = Student::new(matric_number, full_name, email, gender);
            student.department = department;
            student.level = level;
            db.students().create(&student)?;
            println!("Student registered: {} ({})", student.matric_number, student.id);
        }
        Command::PaymentAdd {
            matric_number,
            reference,
            amount,
        } => {
            let payment = Payment::new(matric_number, reference, amount).verified();
            db.payments().create(&payment)?;
            println!("Payment recorded: {}", payment.payment_reference);
        }
        Command::VerifyPayment { matric_number } => {
            let student = db
                .students()
                .find_by_matric(&matric_number)?
                .ok_or(hams_core::Error::StudentNotFound)?;
            db.students()
                .set_payment_status(student.id, PaymentStatus::Verified)?;
            println!("Payment verified for {}", matric_number);
        }
        Command::Book {
            matric_number,
            hall,
            room,
        } => {
            let request = match room {
                Some(room_id) => BookingRequest::explicit(matric_number, hall, room_id),
                None => BookingRequest::first_fit(matric_number, hall),
            };
            let mut engine = BookingEngine::new(db);
            let confirmation = engine.book_room(&request, &TracingNotifier)?;
            println!(
                "Booked room {} in {} (ref {}, receipt {})",
                confirmation.room_number,
                confirmation.hall_name,
                confirmation.transaction_ref,
                confirmation.receipt_id
            );
        }
        Command::Eligibility { matric_number } => {
            let mut engine = BookingEngine::new(db);
            engine.check_eligibility(&matric_number)?;
            println!("{} is eligible to book", matric_number);
        }
        Command::ToggleMaintenance { room_id, actor } => {
            let mut engine = BookingEngine::new(db);
            let change = engine.toggle_maintenance(room_id, &actor)?;
            println!(
                "Room {} in {} is now {}",
                change.room_number,
                change.hall_name,
                if change.is_under_maintenance {
                    "under maintenance"
                } else {
                    "in service"
                }
            );
        }
        Command::Reconcile => {
            let mut engine = BookingEngine::new(db);
            let report = engine.reconcile_available_rooms()?;
            if report.is_clean() {
                println!("Checked {} halls, no drift", report.halls_checked);
            } else {
                for drift in &report.repaired {
                    println!(
                        "Repaired {}: cached {} -> derived {}",
                        drift.hall_name, drift.cached, drift.derived
                    );
                }
            }
        }
        Command::Halls { gender } => {
            for hall in reports::open_halls(&db, gender)? {
                println!(
                    "{}  {}  ({} of {} rooms open)",
                    hall.id, hall.name, hall.available_rooms, hall.total_rooms
                );
            }
        }
        Command::Slip { matric_number } => {
            let slip = reports::allocation_slip(&db, &matric_number)?;
            println!("{}", serde_json::to_string_pretty(&slip)?);
        }
        Command::Summary => {
            let summary = reports::dashboard_summary(&db)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
