use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "academy", version, about = "Terminal dashboard for a music academy roster")]
pub struct Args {
    /// Theme name, overrides the configured one (e.g., "latte", "Catppuccin Mocha")
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Roster file made of [[students]] tables
    #[arg(short, long)]
    pub roster: Option<PathBuf>,

    /// Ticks per second
    #[arg(long, default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frames per second
    #[arg(long, default_value_t = 30.0)]
    pub frame_rate: f64,
}
