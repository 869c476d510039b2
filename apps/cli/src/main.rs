//! CourseForge CLI — batch course-content generation tool.
//!
//! Turns a tabular course outline into per-step markdown artifacts and,
//! on demand, renders them to styled HTML.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
