use chrono::Local;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing_subscriber::EnvFilter;

use shift_roster::display::{print_week_schedule, write_schedule_to_file};
use shift_roster::roster::RosterStore;
use shift_roster::schedule::{allocate, AllocatorConfig};
use shift_roster::slot::week_calendar;
use shift_roster::web;

/// Reads capacity overrides from the environment, keeping the defaults
/// (3 shifts per student, 4 students per shift) otherwise.
fn capacity_from_env() -> Result<AllocatorConfig, Box<dyn std::error::Error>> {
    let mut config = AllocatorConfig::default();
    if let Ok(value) = std::env::var("SHIFT_MAX_PER_WEEK") {
        config.max_per_week = value.parse()?;
    }
    if let Ok(value) = std::env::var("SHIFT_VACANCIES_PER_SHIFT") {
        config.vacancies_per_shift = value.parse()?;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = capacity_from_env()?;
    let default_roster =
        std::env::var("SHIFT_ROSTER").unwrap_or_else(|_| "data/roster.csv".to_string());

    // Check if we should run in web mode
    if args.len() > 1 && args[1] == "web" {
        let port = args
            .get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let store = RosterStore::new(&default_roster);

        tracing::info!("starting web server on port {}", port);
        println!("Access the site at http://localhost:{}", port);

        web::start_server(port, store, config).await?;
        return Ok(());
    }

    // CLI mode: load the roster, build the week, print and save it
    let roster_path = args.get(1).cloned().unwrap_or(default_roster);
    let store = RosterStore::new(&roster_path);
    let students = store.load()?;
    tracing::info!("loaded {} students from {}", students.len(), roster_path);

    if students.is_empty() {
        println!("No students registered yet.");
        return Ok(());
    }

    // SHIFT_SEED makes a run reproducible; otherwise draw from entropy.
    let mut rng = match std::env::var("SHIFT_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    {
        Some(seed) => ChaChaRng::seed_from_u64(seed),
        None => ChaChaRng::from_entropy(),
    };

    let calendar = week_calendar();
    let schedule = allocate(&students, &calendar, &config, &mut rng)?;
    let week_start = Local::now().date_naive();

    print_week_schedule(&schedule, &calendar, week_start);
    write_schedule_to_file(&schedule, &calendar, week_start, "schedule_week.txt")?;
    println!("\nSchedule saved to schedule_week.txt");

    Ok(())
}
