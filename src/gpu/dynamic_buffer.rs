//! GPU buffers that grow when scene data outgrows them.

/// A vertex or index buffer with 2x growth.
///
/// Never shrinks. A reallocation replaces the wgpu buffer, so callers must
/// re-fetch [`DynamicBuffer::buffer`] after [`DynamicBuffer::write`].
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u64,
    usage: wgpu::BufferUsages,
    label: String,
}

const MIN_CAPACITY: u64 = 256;

impl DynamicBuffer {
    /// Empty buffer with a small initial capacity.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            buffer: allocate(device, label, MIN_CAPACITY, usage),
            capacity: MIN_CAPACITY,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    /// Upload `data`, growing if it no longer fits. Returns true on
    /// reallocation.
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = bytes.len() as u64;
        let reallocated = needed > self.capacity;
        if reallocated {
            self.capacity = grown_capacity(self.capacity, needed);
            self.buffer =
                allocate(device, &self.label, self.capacity, self.usage);
            log::debug!("{} grew to {} bytes", self.label, self.capacity);
        }
        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = needed;
        reallocated
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Slice covering the bytes written last.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..self.len)
    }

    /// Bytes written last.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn allocate(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Doubled size, aligned for `write_buffer`.
fn grown_capacity(current: u64, needed: u64) -> u64 {
    let doubled = (needed * 2).max(current + 1024);
    doubled.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
}
