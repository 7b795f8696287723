pub mod clock;
pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod window;

pub use clock::{FrameClock, SystemClock};
pub use controller::{Action, InputEvent};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitInput;
pub use window::WindowDimensions;
