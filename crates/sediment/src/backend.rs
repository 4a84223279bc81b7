use sediment_core::error::SedimentError;
use wgpu::{Instance, InstanceDescriptor, PowerPreference, RequestAdapterOptions};

/// Result of looking for a GPU adapter. The CPU kernels run either way; this
/// only tells an embedding renderer whether it can create a device for the
/// instance buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    pub available: bool,
    pub adapter_name: Option<String>,
    pub backend: Option<String>,
}

/// Request a high-performance adapter on the primary backends and report it.
pub fn probe() -> BackendInfo {
    match request_adapter() {
        Ok(adapter) => {
            let info = adapter.get_info();
            log::info!("Adapter: {} ({:?})", info.name, info.backend);
            BackendInfo {
                available: true,
                adapter_name: Some(info.name),
                backend: Some(format!("{:?}", info.backend)),
            }
        }
        Err(e) => {
            log::warn!("{e}");
            BackendInfo {
                available: false,
                adapter_name: None,
                backend: None,
            }
        }
    }
}

pub fn is_available() -> bool {
    probe().available
}

/// Blocks on the adapter request.
pub fn request_adapter() -> Result<wgpu::Adapter, SedimentError> {
    let instance = Instance::new(&InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });
    pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
        power_preference: PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok_or_else(|| SedimentError::BackendUnavailable("no suitable GPU adapter found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_is_consistent() {
        // Runs on machines with and without a GPU.
        let info = probe();
        assert_eq!(info.available, info.adapter_name.is_some());
        assert_eq!(info.available, info.backend.is_some());
    }
}
