/*!
 * Entrance Exam Simulator Binary
 * Runs one full exam: `exam-sim <place-count> <start-delay-secs>`
 */

use exam_sim::{DeanProcess, ExamConfig, ExamError, RegionManager};
use log::error;
use std::time::Duration;

fn parse_args() -> Result<(usize, Duration), ExamError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 2 {
        return Err(ExamError::InvalidArgument(
            "usage: exam-sim <place-count> <start-delay-secs>".to_string(),
        ));
    }

    let places: usize = args[0]
        .parse()
        .map_err(|_| ExamError::InvalidArgument(format!("invalid place count '{}'", args[0])))?;
    let delay: u64 = args[1]
        .parse()
        .map_err(|_| ExamError::InvalidArgument(format!("invalid start delay '{}'", args[1])))?;
    Ok((places, Duration::from_secs(delay)))
}

fn run() -> Result<(), ExamError> {
    let (places, delay) = parse_args()?;
    let config = ExamConfig::generate(places, delay)?;

    let dean = DeanProcess::new(config, RegionManager::new());
    let report = dean.run()?;
    print!("{}", report.render());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("exam-sim: {}", e);
        std::process::exit(1);
    }
}
