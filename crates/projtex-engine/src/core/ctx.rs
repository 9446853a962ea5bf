use anyhow::{bail, Result};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::render::RenderCtx;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the drawable size as `(width, height)` in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

/// Outcome of [`FrameCtx::render`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// The draw callback ran and the frame was presented.
    Presented,
    /// No surface texture could be acquired; nothing was drawn.
    Skipped,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    /// Simulation clock reading in seconds. Apps derive frame deltas from it
    /// with their own `time::FrameClock`, ticked only on frames they draw.
    pub sim_time: f32,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the next surface texture, opens one render pass that clears
    /// color and depth, calls `draw` with a ready [`RenderCtx`] and the pass,
    /// then presents.
    ///
    /// `draw` only runs once a surface texture has been acquired. Transient
    /// surface errors yield `Ok(FrameStatus::Skipped)`; fatal ones are
    /// returned as errors, as is any error from `draw`.
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> Result<FrameStatus>
    where
        F: FnOnce(&RenderCtx<'_>, &mut wgpu::RenderPass<'_>) -> Result<()>,
    {
        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface texture unavailable: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => bail!("surface error is unrecoverable"),
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Ok(FrameStatus::Skipped)
                    }
                };
            }
        };

        let GpuFrame {
            surface_texture,
            view,
            mut encoder,
        } = frame;

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.sample_count(),
            self.gpu.depth_format(),
        );

        // With MSAA only the resolved surface view needs to survive the pass.
        let attachments = self.gpu.attachments(&view);
        let color_store = if attachments.resolve.is_some() {
            wgpu::StoreOp::Discard
        } else {
            wgpu::StoreOp::Store
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("projtex scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachments.color,
                    resolve_target: attachments.resolve,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: color_store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: attachments.depth.map(|depth| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Discard,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            draw(&rctx, &mut pass)?;
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(GpuFrame {
            surface_texture,
            view,
            encoder,
        });

        Ok(FrameStatus::Presented)
    }
}
