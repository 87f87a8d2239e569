//! Blocking GPU -> CPU readback for the headless runner and GPU tests.

use std::sync::mpsc;

use half::f16;
use lumen_core::error::LumenError;
use lumen_core::math::padded_bytes_per_row;
use lumen_core::types::Resolution;

fn map_blocking(device: &wgpu::Device, staging: &wgpu::Buffer) -> Result<(), LumenError> {
    let (tx, rx) = mpsc::channel();
    staging
        .slice(..)
        .map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
    device.poll(wgpu::Maintain::Wait);
    match rx.recv() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(LumenError::ReadbackFailed(e.to_string())),
        Err(e) => Err(LumenError::ReadbackFailed(e.to_string())),
    }
}

/// Copy a whole 2-D texture to the CPU, returning tightly packed rows.
pub fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    resolution: Resolution,
    bytes_per_texel: u32,
) -> Result<Vec<u8>, LumenError> {
    let row_bytes = resolution.width * bytes_per_texel;
    let padded_row = padded_bytes_per_row(row_bytes);
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback-texture-staging"),
        size: padded_row as u64 * resolution.height as u64,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("readback-texture-encoder"),
    });
    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(resolution.height),
            },
        },
        wgpu::Extent3d {
            width: resolution.width,
            height: resolution.height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    map_blocking(device, &staging)?;
    let mut out = Vec::with_capacity((row_bytes * resolution.height) as usize);
    {
        let data = staging.slice(..).get_mapped_range();
        for row in data.chunks(padded_row as usize) {
            out.extend_from_slice(&row[..row_bytes as usize]);
        }
    }
    staging.unmap();
    Ok(out)
}

/// Copy the first `size` bytes of a buffer to the CPU.
pub fn read_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    size: u64,
) -> Result<Vec<u8>, LumenError> {
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback-buffer-staging"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("readback-buffer-encoder"),
    });
    encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    map_blocking(device, &staging)?;
    let out = staging.slice(..).get_mapped_range().to_vec();
    staging.unmap();
    Ok(out)
}

/// Decode packed Rgba16Float texels.
pub fn decode_rgba16f(bytes: &[u8]) -> Vec<[f32; 4]> {
    bytes
        .chunks_exact(8)
        .map(|texel| {
            let mut out = [0.0; 4];
            for (c, pair) in texel.chunks_exact(2).enumerate() {
                out[c] = f16::from_le_bytes([pair[0], pair[1]]).to_f32();
            }
            out
        })
        .collect()
}

/// Number of texels with any non-zero color channel.
pub fn lit_texel_count(texels: &[[f32; 4]]) -> usize {
    texels
        .iter()
        .filter(|t| t[0] != 0.0 || t[1] != 0.0 || t[2] != 0.0)
        .count()
}
