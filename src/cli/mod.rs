use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::application::{AppError, LedgerService};
use crate::domain::{Tenths, format_hours, parse_hours, split_subjects};
use crate::io::{Exporter, workbook_filename};
use crate::storage::Store;

/// Tutorbook - Tutoring Session Ledger
#[derive(Parser)]
#[command(name = "tutorbook")]
#[command(about = "A local-first ledger for tutoring sessions and payments")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, default_value = "tutoring_data.txt")]
    pub data: String,

    /// Audit log file path
    #[arg(short, long, default_value = "tutoring_log.txt")]
    pub log: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Student management commands
    #[command(subcommand)]
    Student(StudentCommands),

    /// Session log commands
    #[command(subcommand)]
    Session(SessionCommands),

    /// Payment log commands
    #[command(subcommand)]
    Payment(PaymentCommands),

    /// Show totals for one student or the whole ledger
    Summary {
        /// Student name (omit for all students)
        student: Option<String>,
    },

    /// Export the ledger to a workbook, CSV files, or JSON
    Export {
        /// Output file name prefix
        #[arg(short, long, default_value = "tutoring_")]
        prefix: String,

        /// Output directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Format: xlsx, csv, json
        #[arg(short, long, default_value = "xlsx")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum StudentCommands {
    /// Add a new student
    Add {
        /// Student name (must be unique)
        name: String,

        /// Comma-separated subjects (e.g. "Math,English")
        #[arg(short, long, default_value = "")]
        subjects: String,
    },

    /// List all students in ledger order
    List,

    /// Replace the student list order with the given permutation
    Reorder {
        /// All student names, in the new order
        names: Vec<String>,
    },

    /// Replace a student's subject list
    Subjects {
        /// Student name
        name: String,

        /// Comma-separated subjects
        subjects: String,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Record a session
    Add {
        /// Student name
        student: String,

        /// Session date (YYYY-MM-DD)
        date: String,

        /// Duration in hours (e.g. "1.5")
        hours: String,
    },

    /// List a student's sessions with running cumulative hours
    List {
        /// Student name
        student: String,
    },

    /// Modify a session by its list index
    Edit {
        /// Student name
        student: String,

        /// Index from `session list`
        index: usize,

        /// New date (YYYY-MM-DD, keeps current if omitted)
        #[arg(long)]
        date: Option<String>,

        /// New duration in hours (keeps current if omitted)
        #[arg(long)]
        hours: Option<String>,
    },

    /// Delete sessions by their list indices
    Delete {
        /// Student name
        student: String,

        /// Indices from `session list`
        indices: Vec<usize>,
    },
}

#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Record a payment against accrued hours
    Add {
        /// Student name
        student: String,

        /// Payment date (YYYY-MM-DD)
        date: String,

        /// Settled hours (e.g. "2.0")
        hours: String,
    },

    /// List a student's payments with running cumulative paid hours
    List {
        /// Student name
        student: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let store = Store::new(&self.data, &self.log);
        let mut service = LedgerService::open(store)?;

        match self.command {
            Commands::Student(cmd) => run_student_command(&mut service, cmd)?,
            Commands::Session(cmd) => run_session_command(&mut service, cmd)?,
            Commands::Payment(cmd) => run_payment_command(&mut service, cmd)?,
            Commands::Summary { student } => run_summary_command(&service, student.as_deref())?,
            Commands::Export {
                prefix,
                dir,
                format,
            } => run_export_command(&service, &prefix, &dir, &format)?,
        }

        Ok(())
    }
}

fn run_student_command(service: &mut LedgerService, cmd: StudentCommands) -> Result<()> {
    match cmd {
        StudentCommands::Add { name, subjects } => {
            service.add_student(&name, split_subjects(&subjects))?;
            let student = service.student(name.trim())?;
            println!(
                "Added student: {} (subjects: {})",
                student.name,
                student.subjects.join(", ")
            );
        }

        StudentCommands::List => {
            let students = service.students();
            if students.is_empty() {
                println!("No students found.");
            } else {
                for (i, student) in students.iter().enumerate() {
                    println!("{:>3}  {:<20} {}", i, student.name, student.subjects.join(", "));
                }
            }
        }

        StudentCommands::Reorder { names } => {
            service.reorder_students(&names)?;
            println!("Reordered students: {}", names.join(", "));
        }

        StudentCommands::Subjects { name, subjects } => {
            service.modify_subjects(&name, split_subjects(&subjects))?;
            println!(
                "Subjects for {}: {}",
                name,
                service.student(&name)?.subjects.join(", ")
            );
        }
    }
    Ok(())
}

fn run_session_command(service: &mut LedgerService, cmd: SessionCommands) -> Result<()> {
    match cmd {
        SessionCommands::Add {
            student,
            date,
            hours,
        } => {
            let date = parse_date_arg(&date)?;
            let duration = parse_hours_arg(&hours)?;
            service.add_session(&student, date, duration)?;
            println!(
                "Recorded {} hour session for {} on {}",
                format_hours(duration),
                student,
                date
            );
        }

        SessionCommands::List { student } => {
            let entries = service.student(&student)?.cumulative_sessions();
            if entries.is_empty() {
                println!("No sessions for {}.", student);
            } else {
                println!("{:>3}  {:<12} {:>8} {:>12}", "IDX", "DATE", "HOURS", "CUMULATIVE");
                for (i, (session, cumulative)) in entries.iter().enumerate() {
                    println!(
                        "{:>3}  {:<12} {:>8} {:>12}",
                        i,
                        session.date.to_string(),
                        format_hours(session.duration),
                        format_hours(*cumulative)
                    );
                }
                println!(
                    "Total: {} hours",
                    format_hours(service.total_hours(&student)?)
                );
            }
        }

        SessionCommands::Edit {
            student,
            index,
            date,
            hours,
        } => {
            let sessions = &service.student(&student)?.sessions;
            let current = sessions.get(index).copied().ok_or(AppError::IndexOutOfRange {
                index,
                len: sessions.len(),
            })?;

            let new_date = match date {
                Some(d) => parse_date_arg(&d)?,
                None => current.date,
            };
            let new_duration = match hours {
                Some(h) => parse_hours_arg(&h)?,
                None => current.duration,
            };

            service.modify_session(&student, index, new_date, new_duration)?;
            println!(
                "Modified session {} for {}: {} hours on {}",
                index,
                student,
                format_hours(new_duration),
                new_date
            );
        }

        SessionCommands::Delete { student, indices } => {
            service.delete_sessions(&student, &indices)?;
            println!("Deleted {} session(s) for {}", indices.len(), student);
        }
    }
    Ok(())
}

fn run_payment_command(service: &mut LedgerService, cmd: PaymentCommands) -> Result<()> {
    match cmd {
        PaymentCommands::Add {
            student,
            date,
            hours,
        } => {
            let date = parse_date_arg(&date)?;
            let hours = parse_hours_arg(&hours)?;
            service.add_payment(&student, date, hours)?;
            println!(
                "Recorded {} hour payment for {} on {} (remaining: {})",
                format_hours(hours),
                student,
                date,
                format_hours(service.remaining_hours(&student)?)
            );
        }

        PaymentCommands::List { student } => {
            let entries = service.student(&student)?.cumulative_payments();
            if entries.is_empty() {
                println!("No payments for {}.", student);
            } else {
                println!("{:<12} {:>8} {:>12}", "DATE", "HOURS", "CUMULATIVE");
                for (payment, cumulative) in &entries {
                    println!(
                        "{:<12} {:>8} {:>12}",
                        payment.date.to_string(),
                        format_hours(payment.hours),
                        format_hours(*cumulative)
                    );
                }
                println!(
                    "Paid: {} hours, remaining: {} hours",
                    format_hours(service.total_paid(&student)?),
                    format_hours(service.remaining_hours(&student)?)
                );
            }
        }
    }
    Ok(())
}

fn run_summary_command(service: &LedgerService, student: Option<&str>) -> Result<()> {
    let summaries = match student {
        Some(name) => vec![service.summary(name)?],
        None => service.summaries(),
    };

    if summaries.is_empty() {
        println!("No students found.");
        return Ok(());
    }

    println!(
        "{:<20} {:<24} {:>8} {:>8} {:>10}",
        "STUDENT", "SUBJECTS", "TOTAL", "PAID", "REMAINING"
    );
    println!("{}", "-".repeat(74));
    for summary in summaries {
        println!(
            "{:<20} {:<24} {:>8} {:>8} {:>10}",
            summary.name,
            summary.subjects.join(", "),
            format_hours(summary.total_hours),
            format_hours(summary.total_paid),
            format_hours(summary.remaining_hours)
        );
    }
    Ok(())
}

fn run_export_command(
    service: &LedgerService,
    prefix: &str,
    dir: &std::path::Path,
    format: &str,
) -> Result<()> {
    let exporter = Exporter::new(service);
    let stamp = chrono::Local::now().format("%Y%m%d");

    let result = match format {
        "xlsx" => {
            let path = dir.join(workbook_filename(prefix));
            exporter.export_workbook(&path).map(|sheets| {
                println!("Exported {} sheet(s) to {}", sheets, path.display());
                path.display().to_string()
            })
        }
        "csv" => {
            let overview_path = dir.join(format!("{prefix}{stamp}_overview.csv"));
            (|| -> Result<String> {
                let file = File::create(&overview_path)
                    .with_context(|| format!("Failed to create {}", overview_path.display()))?;
                exporter.export_overview_csv(file)?;
                for student in service.students() {
                    let sessions_path =
                        dir.join(format!("{}{}_{}_sessions.csv", prefix, stamp, student.name));
                    exporter.export_sessions_csv(File::create(&sessions_path)?, &student.name)?;
                    let payments_path =
                        dir.join(format!("{}{}_{}_payments.csv", prefix, stamp, student.name));
                    exporter.export_payments_csv(File::create(&payments_path)?, &student.name)?;
                }
                println!("Exported CSV files to {}", dir.display());
                Ok(overview_path.display().to_string())
            })()
        }
        "json" => {
            let path = dir.join(format!("{prefix}{stamp}.json"));
            (|| -> Result<String> {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                exporter.export_full_json(file)?;
                println!("Exported JSON snapshot to {}", path.display());
                Ok(path.display().to_string())
            })()
        }
        other => Err(anyhow::anyhow!(
            "Unknown export format '{}'. Valid formats: xlsx, csv, json",
            other
        )),
    };

    match result {
        Ok(target) => {
            service.audit(&format!("Data exported to {target}"));
            Ok(())
        }
        Err(e) => {
            service.audit(&format!("Data export failed: {e}"));
            Err(AppError::Export(e).into())
        }
    }
}

fn parse_date_arg(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", input))
}

fn parse_hours_arg(input: &str) -> Result<Tenths> {
    parse_hours(input).with_context(|| format!("Invalid hours format '{}'. Use '1.5' or '2'", input))
}
