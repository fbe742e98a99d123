/*!
 * Dean Orchestration
 * Configuration generation and the exam lifecycle controller
 */

mod config;
mod process;

pub use config::ExamConfig;
pub use process::{DeanProcess, DeanState};
