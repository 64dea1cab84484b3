//! Workforce scheduler demo binary.
//!
//! Run with: cargo run
//!
//! Generates a synthetic two-week roster against a synthetic demand matrix,
//! solves it, and prints the resulting schedule.

use rand::rngs::StdRng;
use rand::SeedableRng;

use workforce_scheduler::config::SchedulerConfig;
use workforce_scheduler::domain::Roster;
use workforce_scheduler::fixtures::{create_dummy_employees, generate_demand};
use workforce_scheduler::solver::Scheduler;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let demand = generate_demand(14, 16, 3, 2);
    let mut roster = Roster::new();
    let mut rng = StdRng::seed_from_u64(0);
    let met_demand = create_dummy_employees(&mut roster, None, &demand, false, 0, &mut rng);
    tracing::info!(employees = roster.count(), met_demand, "generated demo roster");

    let config = SchedulerConfig {
        time_limit_secs: Some(30),
        ..SchedulerConfig::default()
    };

    let scheduler = match Scheduler::new(roster, demand, config) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            eprintln!("failed to build scheduler: {err}");
            std::process::exit(1);
        }
    };

    match scheduler.run(None) {
        Ok(report) => {
            println!("status: {:?}", report.status);
            println!("objective: {:.3}", report.objective_value);
            println!("total excess periods: {}", report.total_excess_periods);
            for employee in &report.employees {
                let days_off = employee.assignments.iter().filter(|a| a.is_none()).count();
                println!(
                    "employee {}: {} days off, weekly hours {:?}",
                    employee.employee_id, days_off, employee.weekly_hours
                );
            }
        }
        Err(err) => {
            eprintln!("solve failed: {err}");
            std::process::exit(1);
        }
    }
}
