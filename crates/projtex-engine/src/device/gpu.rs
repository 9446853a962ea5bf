use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{self, Attachments};
use super::{FrameAttachments, GpuFrame, GpuInit, SurfaceErrorAction};

/// Device, queue and the window surface they present to.
///
/// Besides the swapchain this owns the size-dependent attachments every
/// frame renders into (multisampled color and depth), and keeps them in sync
/// with the surface on resize.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    surface_config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,

    device: wgpu::Device,
    queue: wgpu::Queue,

    sample_count: u32,
    depth_format: Option<wgpu::TextureFormat>,
    attachments: Attachments,
}

async fn select_adapter(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
) -> Result<wgpu::Adapter> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("no GPU adapter can present to this window")?;

    let info = adapter.get_info();
    log::info!("using adapter {:?} ({:?})", info.name, info.backend);
    Ok(adapter)
}

async fn open_device(
    adapter: &wgpu::Adapter,
    init: &GpuInit,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    // Optional features are requested only when the adapter has them.
    let features = init.required_features | (init.optional_features & adapter.features());

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("projtex device"),
            required_features: features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to open GPU device")?;

    // Errors outside an explicit error scope are logged instead of panicking.
    device.on_uncaptured_error(Arc::new(|error| {
        log::error!("uncaptured wgpu error: {error}");
    }));

    Ok((device, queue))
}

impl<'w> Gpu<'w> {
    /// Opens a device able to present to `window` and configures its surface.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = select_adapter(&instance, &surface).await?;
        let (device, queue) = open_device(&adapter, &init).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .context("surface reports no formats")?;

        let mut formats = vec![format];
        formats.extend(init.depth_format);
        let sample_count = surface::choose_sample_count(&adapter, &formats, init.sample_count);
        if sample_count != init.sample_count {
            log::warn!(
                "{}x MSAA unsupported with {format:?}; falling back to {sample_count}x",
                init.sample_count
            );
        }

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode: surface::choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &surface_config);
        log::debug!("surface {format:?} {}x{}, {sample_count}x MSAA", size.width, size.height);

        let attachments =
            surface::create_attachments(&device, &surface_config, sample_count, init.depth_format);

        Ok(Self {
            surface,
            surface_config,
            size,
            device,
            queue,
            sample_count,
            depth_format: init.depth_format,
            attachments,
        })
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// MSAA sample count pipelines drawing into the frame must use.
    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    #[inline]
    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        self.depth_format
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Attachments for a pass whose final color target is `surface_view`.
    ///
    /// With MSAA the pass draws into the multisampled texture and resolves
    /// into `surface_view`.
    pub fn attachments<'a>(&'a self, surface_view: &'a wgpu::TextureView) -> FrameAttachments<'a> {
        let depth = self.attachments.depth.as_ref();
        match self.attachments.msaa.as_ref() {
            Some(msaa) => FrameAttachments {
                color: msaa,
                resolve: Some(surface_view),
                depth,
            },
            None => FrameAttachments {
                color: surface_view,
                resolve: None,
                depth,
            },
        }
    }

    /// Follows a window resize. A zero-sized window defers reconfiguration.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let reconfigured = surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.surface_config,
            &mut self.size,
            new_size,
        );
        if reconfigured {
            self.attachments = surface::create_attachments(
                &self.device,
                &self.surface_config,
                self.sample_count,
                self.depth_format,
            );
        }
    }

    /// Acquires the next swapchain texture along with a fresh encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("projtex frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the frame's commands and presents its texture.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Decides how to continue after `err`, reconfiguring the surface if needed.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.surface_config, self.size, err)
    }
}
