use chrono::Datelike;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use rollcall_cli::issue::issue_numbers;
use rollcall_cli::seeder::{self, SeedConfig};
use rollcall_db::PgPool;

#[derive(Parser)]
#[command(name = "rollcall-cli")]
#[command(about = "Rollcall CLI - Administrative tools for Rollcall", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Issue registration numbers for a specialty
    IssueNumbers {
        /// Specialty code, e.g. EB
        #[arg(short = 's', long)]
        specialty: String,

        /// How many numbers to issue
        #[arg(short = 'c', long, default_value = "1")]
        count: u32,

        /// Calendar year of the intake (defaults to the current year)
        #[arg(short = 'y', long)]
        year: Option<i32>,
    },
    /// Seed the database with fake specialties, teachers, students and schedules
    Seed {
        /// Number of specialties to create
        #[arg(short = 's', long, default_value = "3")]
        specialties: usize,

        /// Number of modules per specialty
        #[arg(long, default_value = "6")]
        modules: usize,

        /// Number of teachers
        #[arg(long, default_value = "8")]
        teachers: usize,

        /// Number of students per specialty
        #[arg(long, default_value = "30")]
        students: usize,

        /// Calendar year of the intake
        #[arg(short = 'y', long, default_value = "2025")]
        year: i32,
    },
    /// Clear all seeded data
    ClearSeed {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("❌ DATABASE_URL must be set");
        std::process::exit(1);
    };

    let pool = match rollcall_db::init_db_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::IssueNumbers {
            specialty,
            count,
            year,
        } => handle_issue_numbers(&pool, &specialty, count, year).await,
        Commands::Seed {
            specialties,
            modules,
            teachers,
            students,
            year,
        } => handle_seed(&pool, specialties, modules, teachers, students, year).await,
        Commands::ClearSeed { yes } => handle_clear_seed(&pool, yes).await,
    }
}

async fn handle_migrate(pool: &PgPool) {
    match rollcall_db::run_migrations(pool).await {
        Ok(()) => println!("✅ Migrations applied"),
        Err(e) => {
            eprintln!("\n❌ Error applying migrations: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_issue_numbers(pool: &PgPool, specialty: &str, count: u32, year: Option<i32>) {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());

    match issue_numbers(pool, specialty, count, year).await {
        Ok(issued) => {
            println!(
                "\n✅ Issued {} registration numbers for {} ({})",
                issued.numbers.len(),
                issued.specialty_name,
                issued.academic_year
            );
            for number in &issued.numbers {
                println!("   {}", number);
            }
        }
        Err(e) => {
            eprintln!("\n❌ Error issuing registration numbers: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(
    pool: &PgPool,
    specialties: usize,
    modules: usize,
    teachers: usize,
    students: usize,
    year: i32,
) {
    let config = SeedConfig::new(specialties)
        .with_modules(modules)
        .with_teachers(teachers)
        .with_students(students)
        .with_year(year);

    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &PgPool, yes: bool) {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete all seeded specialties, teachers and students?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("Aborted");
            return;
        }
    }

    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
