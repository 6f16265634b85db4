use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use scholaris::cli::create_super_admin;
use scholaris::cli::seeder::{SeedConfig, clear_seeded_data, seed_database};
use scholaris_db::{PgPool, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "scholaris-cli")]
#[command(about = "Scholaris CLI - Administrative tools for Scholaris", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a super admin account
    CreateSuperAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake schools, teachers and students
    Seed {
        /// Number of schools to create
        #[arg(short = 's', long, default_value = "3")]
        schools: usize,

        /// Number of teachers per school
        #[arg(long, default_value = "5")]
        teachers: usize,

        /// Number of students per school
        #[arg(long, default_value = "20")]
        students: usize,
    },
    /// Clear all seeded data (keeps super admins)
    ClearSeed,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let pool = init_db_pool()
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateSuperAdmin {
            name,
            email,
            password,
        } => handle_create_super_admin(&pool, name, email, password).await,
        Commands::Seed {
            schools,
            teachers,
            students,
        } => {
            seed_database(
                &pool,
                SeedConfig {
                    schools,
                    teachers_per_school: teachers,
                    students_per_school: students,
                },
            )
            .await
        }
        Commands::ClearSeed => clear_seeded_data(&pool).await,
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("✅ Migrations applied");
            Ok(())
        }
    }
}

async fn handle_create_super_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Name")
            .interact_text()
            .context("Failed to read name")?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let admin = create_super_admin(pool, &name, &email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Error creating super admin: {}", e.error))?;

    println!("\n✅ Super admin created successfully!");
    println!("   Email: {}", admin.email);
    println!("   Name: {}", admin.name);
    Ok(())
}
