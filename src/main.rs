use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window as WinitWindow, WindowId},
};

use room_viewer::camera::{initial_view, CameraController};
use room_viewer::cli::Cli;
use room_viewer::core::{SystemClock, WindowDimensions, WinitInput};
use room_viewer::renderer::SceneRenderer;
use room_viewer::scene::SceneAssets;
use room_viewer::settings::CameraSettings;
use room_viewer::window::Window;
use room_viewer::{HostRequest, Viewer};

const FPS_UPDATE_INTERVAL: f32 = 1.0;
const WINDOW_TITLE: &str = "3D Scene: Textured Room";

struct App {
    cli: Cli,
    settings: CameraSettings,
    window: Option<Window>,
    renderer: Option<SceneRenderer>,
    viewer: Option<Viewer<SystemClock>>,
    input: WinitInput,
    frame_count: u32,
    fps_update_timer: f32,
}

impl App {
    fn new(cli: Cli, settings: CameraSettings) -> Self {
        Self {
            cli,
            settings,
            window: None,
            renderer: None,
            viewer: None,
            input: WinitInput::new(),
            frame_count: 0,
            fps_update_timer: 0.0,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop.create_window(
                WinitWindow::default_attributes()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(winit::dpi::PhysicalSize::new(
                        self.cli.width,
                        self.cli.height,
                    )),
            )?,
        );

        let assets = SceneAssets::load(&self.cli.assets)?;
        let mut renderer = pollster::block_on(SceneRenderer::new(window.clone(), &assets))?;

        let camera = CameraController::from_view_matrix(initial_view(), self.settings);
        let viewer = Viewer::new(camera, SystemClock::new(), renderer.dimensions());
        viewer.attach(&mut renderer);

        self.window = Some(Window::new(window));
        self.renderer = Some(renderer);
        self.viewer = Some(viewer);
        Ok(())
    }

    fn update_fps(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            let fps = self.frame_count as f32 / self.fps_update_timer;
            log::debug!("FPS: {:.1}", fps);
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, request: HostRequest) {
        match request {
            HostRequest::None => {}
            HostRequest::Exit => event_loop.exit(),
            HostRequest::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            HostRequest::LookMode(looking) => {
                if let Some(window) = &self.window {
                    window.set_look_mode(looking);
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(viewer), Some(renderer)) = (&mut self.viewer, &mut self.renderer) else {
            return;
        };

        match viewer.frame(renderer) {
            Ok(frame) => self.update_fps(frame.delta),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("Application failed to initialise: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            event => {
                if let WindowEvent::Resized(size) = event {
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(WindowDimensions::from(size));
                    }
                }

                let Some(input) = self.input.process_window_event(&event) else {
                    return;
                };
                let (Some(viewer), Some(renderer)) = (&mut self.viewer, &mut self.renderer) else {
                    return;
                };
                let request = viewer.handle(input, renderer);
                self.apply(event_loop, request);
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(input) = self.input.process_device_event(&event) else {
            return;
        };
        if let (Some(viewer), Some(renderer)) = (&mut self.viewer, &mut self.renderer) {
            viewer.handle(input, renderer);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn print_controls() {
    println!();
    println!("Use:");
    println!("  WASD or arrow keys to navigate");
    println!("  QE or PgUp/PgDn to move the camera down and up");
    println!("  Shift to speed up your movement");
    println!("  Drag with the left mouse button to look around");
    println!("  Mouse wheel to zoom, middle button to reset the zoom");
    println!();
    println!("  1 to switch lamp #1 on/off");
    println!("  2 to switch lamp #2 on/off");
    println!("  9 to switch the directional light on/off");
    println!("  0 to switch the ambient light on/off");
    println!("  F11 for fullscreen, Esc to quit");
    println!();
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = match &cli.settings {
        Some(path) => CameraSettings::load(path)?,
        None => CameraSettings::default(),
    };
    if let Some(fov) = cli.fov {
        settings = settings.with_default_fov(fov)?;
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, settings);

    print_controls();
    event_loop.run_app(&mut app)?;

    Ok(())
}
