use anyhow::Context;
use calendar_harvest::{
    HarvestConfig, HarvestEnv, HolidayHarvester, Job, LoadFromEnv, ScrapingContext,
    WorldCupConfig, config::jobs_from_env, world_cup,
};
use log::{LevelFilter, info};

async fn run_holiday_job(env: &HarvestEnv) -> anyhow::Result<()> {
    let config = HarvestConfig::from_env(env).context("invalid holiday scraper config")?;
    let ctx = ScrapingContext::new(config).context("failed to set up holiday scraper")?;
    let summary = HolidayHarvester::new(&ctx)
        .run()
        .await
        .context("holiday harvest aborted")?;
    info!(
        "DONE. {} countries, {} pages, {} rows -> {}",
        summary.countries,
        summary.pages,
        summary.total_rows,
        summary.output_path.display()
    );
    Ok(())
}

async fn run_world_cup_job(env: &HarvestEnv) -> anyhow::Result<()> {
    let config = WorldCupConfig::from_env(env);
    let summary = world_cup::collect(&config)
        .await
        .context("world cup aggregation failed")?;
    info!(
        "DONE. {} hosts, {} rows -> {}",
        summary.hosts,
        summary.rows,
        summary.output_path.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let env = HarvestEnv::load_from_env()?;
    for job in jobs_from_env(&env)? {
        match job {
            Job::WorldCup => run_world_cup_job(&env).await?,
            Job::Holidays => run_holiday_job(&env).await?,
        }
    }
    Ok(())
}
