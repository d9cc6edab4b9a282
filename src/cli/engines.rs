//! List the available template engines.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::templating::{Engine, EngineRegistry};

/// Command to list engines.
#[derive(Args, Debug)]
pub struct EnginesCommand {}

impl EnginesCommand {
    /// Print one line per registered engine.
    pub fn execute(self) -> Result<()> {
        for line in engine_lines(&EngineRegistry::with_builtins()) {
            println!("{line}");
        }
        Ok(())
    }
}

fn engine_lines(registry: &EngineRegistry) -> Vec<String> {
    registry
        .names()
        .into_iter()
        .map(|name| {
            let description = match name.parse::<Engine>() {
                Ok(engine) if engine == Engine::default() => {
                    format!("{} (default)", engine.display_name())
                }
                Ok(engine) => engine.display_name().to_string(),
                Err(_) => "custom".to_string(),
            };
            format!("{:<12} {}", name.bold(), description.dimmed())
        })
        .collect()
}
