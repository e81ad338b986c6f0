use wgpu::{Adapter, Device, Instance, Queue, Surface};

use crate::error::{RenderError, RenderResult};

/// Adapter, device and queue shared by every pass. Owned by the render thread
/// for the life of the process.
pub struct GpuContext {
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Pick an adapter able to present to `compatible_surface` (if given) and
    /// open a device on it.
    pub async fn new(
        instance: &Instance,
        compatible_surface: Option<&Surface<'_>>,
    ) -> RenderResult<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        log::info!("GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("relief device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }
}

/// Run `build` inside a validation error scope and hand back whatever wgpu
/// reported while it ran. Callers map the error to their own diagnostic.
pub fn validation_scope<T>(
    device: &Device,
    build: impl FnOnce() -> T,
) -> Result<T, wgpu::Error> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = build();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(err),
        None => Ok(value),
    }
}
