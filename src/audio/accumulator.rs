use tracing::debug;

/// One threshold-crossing's worth of raw audio bytes, processed as an
/// atomic pipeline input. Consumed exactly once by the normalizer.
#[derive(Debug)]
pub struct AudioUnit {
    /// Raw PCM bytes in the session's configured source layout
    pub bytes: Vec<u8>,
    /// 0-indexed position of this unit within its session
    pub sequence: u64,
}

impl AudioUnit {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Buffers inbound byte fragments from the transport and cuts a complete
/// [`AudioUnit`] once the accumulated length crosses the threshold.
///
/// There is no partial carry-over: the whole buffer becomes the unit and
/// bytes arriving afterwards start a fresh accumulation. Accumulation is
/// unbounded up to the threshold; flow control is the transport's job.
#[derive(Debug)]
pub struct ChunkAccumulator {
    buffer: Vec<u8>,
    threshold: usize,
    sequence: u64,
}

impl ChunkAccumulator {
    pub fn new(threshold: usize) -> Self {
        Self {
            buffer: Vec::new(),
            threshold,
            sequence: 0,
        }
    }

    /// Append inbound bytes. Returns a complete unit once accumulated
    /// length exceeds the threshold, `None` otherwise.
    pub fn append(&mut self, bytes: &[u8]) -> Option<AudioUnit> {
        self.buffer.extend_from_slice(bytes);

        if self.buffer.len() <= self.threshold {
            return None;
        }

        let bytes = std::mem::take(&mut self.buffer);
        let unit = AudioUnit {
            bytes,
            sequence: self.sequence,
        };
        self.sequence += 1;

        debug!(
            "Cut audio unit {} ({} bytes, threshold {})",
            unit.sequence,
            unit.len(),
            self.threshold
        );

        Some(unit)
    }

    /// Bytes currently buffered below the threshold
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Units emitted so far
    pub fn units_emitted(&self) -> u64 {
        self.sequence
    }
}
