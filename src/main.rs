//! Entry point.
//!
//! Runs one ordered sequence:
//! 1. Acquire the adapter and device, configure the presentation target
//! 2. Draw the triangle
//! 3. Run the compute kernel and read its output back
//!
//! Every failure is written to the diagnostic output (stdout) before it
//! ends the program. In windowed mode the event loop then keeps the
//! triangle on screen until the window closes.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use hello_webgpu::{
    compute::ComputeKernel,
    config::Args,
    cpu_ref,
    diagnostics::{reported, Diagnostics},
    error::{InitError, PassError},
    gpu::{self, GpuContext},
    offscreen::{self, OffscreenTarget},
    surface::{frame_recovery, FrameRecovery, PresentationSurface},
    triangle::TrianglePass,
};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

const PREVIEW_VALUES: usize = 8;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut diagnostics = Diagnostics::stdout();

    if args.is_headless() {
        return pollster::block_on(run_headless(&args, &mut diagnostics));
    }
    run_windowed(&args, diagnostics)
}

async fn connect<W: Write>(
    instance: wgpu::Instance,
    args: &Args,
    surface: Option<&wgpu::Surface<'_>>,
    diagnostics: &mut Diagnostics<W>,
) -> anyhow::Result<GpuContext> {
    let gpu = reported(diagnostics, GpuContext::new(instance, &args.gpu_config(), surface).await)?;
    diagnostics.adapter(&gpu.adapter_report())?;
    Ok(gpu)
}

async fn run_headless<W: Write>(args: &Args, diagnostics: &mut Diagnostics<W>) -> anyhow::Result<()> {
    let instance = reported(diagnostics, gpu::create_instance(args.backends()))?;
    let gpu = connect(instance, args, None, diagnostics).await?;

    let target = reported(diagnostics, OffscreenTarget::new(&gpu, args.width, args.height).await)?;
    let triangle = reported(diagnostics, TrianglePass::new(&gpu, target.format()).await)?;
    reported(diagnostics, triangle.draw(&gpu, target.view()).await)?;

    if let Some(path) = &args.save_frame {
        let pixels = reported(diagnostics, target.capture(&gpu).await)?;
        let (width, height) = target.size();
        reported(diagnostics, offscreen::save_png(path, &pixels, width, height))?;
        log::info!("Saved frame to {}", path.display());
    }

    run_compute(&gpu, diagnostics).await
}

fn run_windowed(args: &Args, mut diagnostics: Diagnostics<std::io::Stdout>) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("hello_webgpu")
            .with_inner_size(PhysicalSize::new(args.width, args.height))
            .build(&event_loop)?,
    );

    let instance = reported(&mut diagnostics, gpu::create_instance(args.backends()))?;
    let surface = reported(
        &mut diagnostics,
        instance.create_surface(window.clone()).map_err(InitError::from),
    )?;
    let gpu = pollster::block_on(connect(instance, args, Some(&surface), &mut diagnostics))?;

    let size = window.inner_size();
    let mut presentation = reported(
        &mut diagnostics,
        PresentationSurface::configure(surface, &gpu, size.width, size.height),
    )?;
    let triangle = reported(
        &mut diagnostics,
        pollster::block_on(TrianglePass::new(&gpu, presentation.format())),
    )?;
    reported(&mut diagnostics, render_frame(&gpu, &presentation, &triangle))?;

    pollster::block_on(run_compute(&gpu, &mut diagnostics))?;

    let mut fatal: Option<PassError> = None;
    event_loop.run(|event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        let Event::WindowEvent { event, .. } = event else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape | KeyCode::KeyQ),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => elwt.exit(),
            WindowEvent::Resized(size) => {
                presentation.resize(&gpu, size.width, size.height);
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let Err(error) = render_frame(&gpu, &presentation, &triangle) else {
                    return;
                };
                match frame_recovery(&error) {
                    FrameRecovery::Reconfigure => {
                        presentation.reconfigure(&gpu);
                        window.request_redraw();
                    }
                    FrameRecovery::Retry => {
                        log::warn!("Render error: {error}");
                        window.request_redraw();
                    }
                    FrameRecovery::Fatal => {
                        if let Err(io_error) = diagnostics.failure(&error) {
                            log::error!("Could not write diagnostic output: {io_error}");
                        }
                        fatal = Some(error);
                        elwt.exit();
                    }
                }
            }
            _ => {}
        }
    })?;

    match fatal {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn render_frame(
    gpu: &GpuContext,
    presentation: &PresentationSurface,
    triangle: &TrianglePass,
) -> Result<(), PassError> {
    let frame = presentation.current_frame()?;
    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
    pollster::block_on(triangle.draw(gpu, &view))?;
    frame.present();
    Ok(())
}

async fn run_compute<W: Write>(gpu: &GpuContext, diagnostics: &mut Diagnostics<W>) -> anyhow::Result<()> {
    let kernel = reported(diagnostics, ComputeKernel::new(gpu).await)?;
    let output = reported(diagnostics, kernel.run(gpu).await)?;
    reported(diagnostics, cpu_ref::verify(&output.values))?;

    let preview = &output.values[..output.values.len().min(PREVIEW_VALUES)];
    log::info!(
        "Compute readback: {} bytes, {} values, starting {:?}",
        output.bytes.len(),
        output.values.len(),
        preview
    );
    Ok(())
}
