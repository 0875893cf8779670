// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! WGPU edge mirror
//!
//! Device-resident weight mirror using WGPU (Metal on macOS, Vulkan on
//! Linux, DirectX 12 on Windows). Weight deltas are applied by a compute
//! shader doing the same per-slot f32 addition as the host path, so both
//! execution paths stay numerically identical.

use super::EdgeMirror;
use crate::error::{Result, RuntimeError};
use neuroweave_graph::EdgeCollection;

const WORKGROUP_SIZE: u32 = 256;

const APPLY_DELTAS_SHADER: &str = r#"
@group(0) @binding(0) var<storage, read_write> weights: array<f32>;
@group(0) @binding(1) var<storage, read> deltas: array<f32>;
@group(0) @binding(2) var<storage, read> active_mask: array<u32>;

@compute @workgroup_size(256)
fn apply_deltas(@builtin(global_invocation_id) gid: vec3<u32>) {
    let i = gid.x;
    if (i >= arrayLength(&weights)) {
        return;
    }
    if (active_mask[i] != 0u) {
        weights[i] = weights[i] + deltas[i];
    }
}
"#;

/// GPU-resident mirror of the edge weight buffer
pub struct WgpuMirror {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    buffers: Option<MirrorBuffers>,
    adapter_name: String,
}

struct MirrorBuffers {
    capacity: usize,
    weights: wgpu::Buffer,
    deltas: wgpu::Buffer,
    active_mask: wgpu::Buffer,
    staging: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl WgpuMirror {
    /// Initialize the GPU device and the delta-application pipeline.
    pub fn new() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| RuntimeError::MirrorTransfer("no WGPU adapter found".to_string()))?;

        let adapter_info = adapter.get_info();
        let adapter_name = format!("{} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("neuroweave edge mirror"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        ))
        .map_err(|e| RuntimeError::MirrorTransfer(format!("device request failed: {e}")))?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("apply_deltas"),
            source: wgpu::ShaderSource::Wgsl(APPLY_DELTAS_SHADER.into()),
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("apply_deltas"),
            layout: None,
            module: &module,
            entry_point: "apply_deltas",
        });

        tracing::info!(adapter = %adapter_name, "WGPU edge mirror initialized");

        Ok(Self {
            device,
            queue,
            pipeline,
            buffers: None,
            adapter_name,
        })
    }

    /// Adapter the mirror is running on
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn buffers(&self) -> Result<&MirrorBuffers> {
        self.buffers
            .as_ref()
            .ok_or(RuntimeError::MirrorNotAllocated("WgpuMirror"))
    }

    fn check_capacity(&self, edges: &EdgeCollection) -> Result<&MirrorBuffers> {
        let buffers = self.buffers()?;
        if buffers.capacity != edges.capacity() {
            return Err(RuntimeError::MirrorSizeMismatch {
                expected: edges.capacity(),
                got: buffers.capacity,
            });
        }
        Ok(buffers)
    }

    fn upload_active_mask(&self, edges: &EdgeCollection) -> Result<()> {
        let buffers = self.buffers()?;
        let mask: Vec<u32> = edges
            .active_mask()
            .iter()
            .map(|&a| if a { 1u32 } else { 0u32 })
            .collect();
        self.queue
            .write_buffer(&buffers.active_mask, 0, bytemuck::cast_slice(&mask));
        Ok(())
    }

    /// Blocking readback of the device weight buffer.
    fn read_back_weights(&self, capacity: usize) -> Result<Vec<f32>> {
        let buffers = self.buffers()?;
        let byte_len = (capacity * std::mem::size_of::<f32>()) as u64;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("weights readback"),
            });
        encoder.copy_buffer_to_buffer(&buffers.weights, 0, &buffers.staging, 0, byte_len);
        self.queue.submit(Some(encoder.finish()));

        let slice = buffers.staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| RuntimeError::MirrorTransfer("readback channel closed".to_string()))?
            .map_err(|e| RuntimeError::MirrorTransfer(format!("buffer map failed: {e:?}")))?;

        let data = slice.get_mapped_range();
        let weights: Vec<f32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        buffers.staging.unmap();
        Ok(weights)
    }
}

impl EdgeMirror for WgpuMirror {
    fn name(&self) -> &'static str {
        "WgpuMirror"
    }

    fn allocate(&mut self, edges: &EdgeCollection) -> Result<()> {
        let capacity = edges.capacity();
        let byte_len = (capacity * std::mem::size_of::<f32>()) as u64;

        let make_storage = |label: &str, extra: wgpu::BufferUsages| {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: byte_len,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST | extra,
                mapped_at_creation: false,
            })
        };

        let weights = make_storage("edge weights", wgpu::BufferUsages::COPY_SRC);
        let deltas = make_storage("weight deltas", wgpu::BufferUsages::empty());
        let active_mask = make_storage("active mask", wgpu::BufferUsages::empty());
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("weights staging"),
            size: byte_len,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("apply_deltas"),
            layout: &self.pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: weights.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: deltas.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: active_mask.as_entire_binding(),
                },
            ],
        });

        self.buffers = Some(MirrorBuffers {
            capacity,
            weights,
            deltas,
            active_mask,
            staging,
            bind_group,
        });
        tracing::debug!(capacity, "WGPU mirror buffers allocated");
        Ok(())
    }

    fn deallocate(&mut self) {
        self.buffers = None;
        tracing::debug!("WGPU mirror buffers released");
    }

    fn is_allocated(&self) -> bool {
        self.buffers.is_some()
    }

    fn copy_to_device(&mut self, edges: &EdgeCollection) -> Result<()> {
        let buffers = self.check_capacity(edges)?;
        self.queue
            .write_buffer(&buffers.weights, 0, bytemuck::cast_slice(edges.weights()));
        self.upload_active_mask(edges)?;
        // write_buffer is staged; submit an empty batch so the barrier
        // semantics hold when the call returns
        self.queue.submit(std::iter::empty());
        self.device.poll(wgpu::Maintain::Wait);
        Ok(())
    }

    fn copy_from_device(&mut self, edges: &mut EdgeCollection) -> Result<()> {
        self.check_capacity(edges)?;
        let weights = self.read_back_weights(edges.capacity())?;
        edges.weights_mut().copy_from_slice(&weights);
        Ok(())
    }

    fn apply_weight_deltas(&mut self, edges: &mut EdgeCollection, deltas: &[f32]) -> Result<()> {
        let buffers = self.check_capacity(edges)?;
        if deltas.len() != edges.capacity() {
            return Err(RuntimeError::MirrorSizeMismatch {
                expected: edges.capacity(),
                got: deltas.len(),
            });
        }

        self.queue
            .write_buffer(&buffers.deltas, 0, bytemuck::cast_slice(deltas));
        self.upload_active_mask(edges)?;

        let buffers = self.buffers()?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("apply_deltas"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("apply_deltas"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &buffers.bind_group, &[]);
            let workgroups = (edges.capacity() as u32).div_ceil(WORKGROUP_SIZE);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }
        self.queue.submit(Some(encoder.finish()));

        // Read the result straight back so the host copy matches the
        // device copy when the call returns.
        let weights = self.read_back_weights(edges.capacity())?;
        edges.weights_mut().copy_from_slice(&weights);
        Ok(())
    }
}
