pub mod app;
pub mod camera;
pub mod cli;
pub mod core;
pub mod frame;
pub mod lighting;
pub mod loaders;
pub mod mesh;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod traits;
pub mod types;
pub mod window;

pub use app::{HostRequest, Viewer};
pub use camera::{CameraController, MoveKey, ViewState};
pub use lighting::{LightSwitch, SceneLightingState};
pub use settings::CameraSettings;
