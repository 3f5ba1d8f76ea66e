use anyhow::{anyhow, Context};
use choreo::core::{builtin, EngineConfig, Scenario, Speed};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[command(author, version, about = "Plays a choreographed scenario without a screen", long_about = None)]
pub struct Config {
	/// Playback speed multiplier (1 or 2)
	#[arg(long, env = "CINEMA_SPEED", default_value = "1")]
	pub speed: u32,

	/// Start with audio cues muted
	#[arg(long, env = "CINEMA_MUTED", default_value = "false")]
	pub muted: bool,

	/// Engine tick interval in milliseconds
	#[arg(long, env = "CINEMA_TICK_MS", default_value = "100")]
	pub tick_ms: u64,

	/// Scenario JSON file; the built-in presentation when absent
	#[arg(long, env = "CINEMA_SCENARIO")]
	pub scenario: Option<PathBuf>,

	/// Automatic replays once the summary is reached
	#[arg(long, env = "CINEMA_REPLAYS", default_value = "0")]
	pub replays: u32,

	/// Click start at once instead of waiting for the intro
	#[arg(long, env = "CINEMA_SKIP_INTRO", default_value = "false")]
	pub skip_intro: bool,

	/// Print every published snapshot as a JSON line on stdout
	#[arg(long, env = "CINEMA_JSON", default_value = "false")]
	pub json: bool,
}

impl Config {
	pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
		let speed = Speed::try_from(self.speed)?;
		let config = EngineConfig::default().with_speed(speed).with_muted(self.muted).with_tick_interval(self.tick_ms);
		config.validate().map_err(|e| anyhow!("invalid engine configuration: {e}"))?;
		Ok(config)
	}

	pub fn load_scenario(&self) -> anyhow::Result<Scenario> {
		match &self.scenario {
			Some(path) => Scenario::from_path(path).with_context(|| format!("loading scenario from {}", path.display())),
			None => Ok(builtin::scenario()),
		}
	}
}
