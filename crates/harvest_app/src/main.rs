mod logging;
mod runner;
mod scheduler;
mod state_store;

use runner::{HarvestRunner, SessionRunner};
use scheduler::{RunScheduler, SchedulerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::Both);

    let runner = HarvestRunner::default();
    // `once` runs a single harvest and exits; the default is the
    // supervised daily schedule.
    if std::env::args().nth(1).as_deref() == Some("once") {
        return runner.run().await;
    }

    let mut scheduler = RunScheduler::new(SchedulerSettings::default(), runner);
    scheduler.run().await;
    Ok(())
}
