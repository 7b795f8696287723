use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "room-viewer")]
#[command(about = "Walk-through viewer for a textured, lit room")]
pub struct Cli {
    /// Directory holding the glTF models and textures
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Initial vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,

    /// JSON file overriding camera tuning
    #[arg(long)]
    pub settings: Option<PathBuf>,
}
