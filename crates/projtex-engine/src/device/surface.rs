use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let preferred = if prefer_srgb {
        [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ]
    } else {
        [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Rgba8Unorm,
        ]
    };

    preferred
        .into_iter()
        .find(|f| caps.formats.contains(f))
        .or_else(|| caps.formats.iter().copied().find(|f| f.is_srgb() == prefer_srgb))
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Largest supported sample count not above `requested` for every given format.
pub(crate) fn choose_sample_count(
    adapter: &wgpu::Adapter,
    formats: &[wgpu::TextureFormat],
    requested: u32,
) -> u32 {
    let mut count = requested.max(1).next_power_of_two();
    while count > 1 {
        let supported = formats.iter().all(|&f| {
            adapter
                .get_texture_format_features(f)
                .flags
                .sample_count_supported(count)
        });
        if supported {
            return count;
        }
        count /= 2;
    }
    1
}

/// Size-dependent render attachments (MSAA color + depth).
pub(crate) struct Attachments {
    pub msaa: Option<wgpu::TextureView>,
    pub depth: Option<wgpu::TextureView>,
}

pub(crate) fn create_attachments(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
    depth_format: Option<wgpu::TextureFormat>,
) -> Attachments {
    let size = wgpu::Extent3d {
        width: config.width.max(1),
        height: config.height.max(1),
        depth_or_array_layers: 1,
    };

    let msaa = (sample_count > 1).then(|| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("projtex msaa color"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: config.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    });

    let depth = depth_format.map(|format| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("projtex depth"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    });

    Attachments { msaa, depth }
}

/// Applies a new drawable size; returns `true` when the surface was reconfigured.
///
/// wgpu does not support configuring a surface with a 0x0 size; in that case,
/// only `size` is updated and configuration is deferred.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = SurfaceErrorAction::classify(&err);
    if action == SurfaceErrorAction::Reconfigured && size.width > 0 && size.height > 0 {
        surface.configure(device, config);
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        let mut caps = wgpu::SurfaceCapabilities::default();
        caps.formats = formats.to_vec();
        caps.alpha_modes = vec![wgpu::CompositeAlphaMode::Opaque];
        caps
    }

    // ── surface format ─────────────────────────────────────────────────────

    #[test]
    fn no_formats_yields_none() {
        assert_eq!(choose_surface_format(&caps(&[]), true), None);
    }

    #[test]
    fn linear_format_preferred_when_srgb_off() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Bgra8Unorm,
        ]);
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn falls_back_to_first_format() {
        let c = caps(&[wgpu::TextureFormat::Rgba16Float]);
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Rgba16Float));
    }

    // ── alpha mode ─────────────────────────────────────────────────────────

    #[test]
    fn unsupported_alpha_mode_is_replaced() {
        let c = caps(&[wgpu::TextureFormat::Bgra8Unorm]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&c, None), wgpu::CompositeAlphaMode::Opaque);
    }
}
