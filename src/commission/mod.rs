/*!
 * Grading Commissions
 * Worker pools posing questions and grading loops scoring answered seats
 */

mod grading;
mod process;
mod worker;

pub use grading::{GradingLoop, GradingState};
pub use process::CommissionProcess;
pub use worker::WorkerPool;
