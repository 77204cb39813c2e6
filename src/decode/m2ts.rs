//! BDAV transport stream (`.m2ts`) framing check

use std::io::Read;
use std::path::Path;

use crate::error::{BdError, Result};

/// 4-byte arrival timestamp followed by a 188-byte TS packet
pub const PACKET_SIZE: usize = 192;
pub const SYNC_BYTE: u8 = 0x47;

/// Packets inspected at the start of a stream file
pub const PROBE_PACKETS: usize = 16;

/// Read the probe window from the start of a stream file
pub fn read_probe(path: &Path) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path)?;
    let mut data = Vec::with_capacity(PACKET_SIZE * PROBE_PACKETS);
    file.take((PACKET_SIZE * PROBE_PACKETS) as u64)
        .read_to_end(&mut data)?;
    Ok(data)
}

/// Verify the sync byte of every complete packet in `data`; returns the
/// number of packets checked
pub fn check_framing(file: &str, data: &[u8]) -> Result<usize> {
    let mut checked = 0;
    for (i, packet) in data.chunks_exact(PACKET_SIZE).enumerate() {
        if packet[4] != SYNC_BYTE {
            return Err(BdError::invalid(
                file,
                format!("packet {} has sync byte {:#04x}", i, packet[4]),
            ));
        }
        checked += 1;
    }

    if checked == 0 {
        return Err(BdError::invalid(
            file,
            format!("shorter than one {}-byte packet", PACKET_SIZE),
        ));
    }
    Ok(checked)
}
