//! Fireworks core engine: platform-agnostic launchers, shells and particles.

pub mod config;
pub mod launcher;
pub mod particle;
pub mod runner;
pub mod shell;
pub mod show;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, PatternMode, ShowConfig};
pub use launcher::Launcher;
pub use particle::Particle;
pub use runner::{Flow, Runner, StopSignal};
pub use shell::{Pattern, Shell, ShellState};
pub use show::{Show, ShowStats};
