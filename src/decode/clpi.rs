//! Clip-info (`.clpi`) header decoding
//!
//! Only the ProgramInfo block is read: it lists every elementary stream of
//! the clip with its coding type and, for video, the frame rate.

use std::collections::BTreeMap;

use super::reader::PayloadReader;
use super::{check_version, read_coding_info};
use crate::error::{BdError, Result};
use crate::records::TsStream;

const TYPE_INDICATOR: &str = "HDMV";

/// Offset of the ProgramInfo start address in the header
const PROGRAM_INFO_ADDRESS: usize = 12;

/// Streams of a clip-info payload, keyed by PID
pub fn parse_clip_info(file: &str, data: &[u8]) -> Result<BTreeMap<u16, TsStream>> {
    let mut header = PayloadReader::new(file, data);
    let indicator = header.ascii(4, "type indicator")?;
    if indicator != TYPE_INDICATOR {
        return Err(BdError::invalid(
            file,
            format!("type indicator {:?}, expected {:?}", indicator, TYPE_INDICATOR),
        ));
    }
    check_version(file, &header.ascii(4, "version")?)?;

    let mut header = PayloadReader::at(file, data, PROGRAM_INFO_ADDRESS)?;
    let program_info = header.u32("program info address")? as usize;

    let mut block = PayloadReader::at(file, data, program_info)?;
    let length = block.u32("program info length")? as usize;
    let mut block = block.sub(length, "program info")?;
    block.skip(1, "program info reserved")?;
    let program_count = block.u8("program count")?;

    let mut streams = BTreeMap::new();
    for _ in 0..program_count {
        block.skip(4, "SPN program sequence start")?;
        block.skip(2, "program map PID")?;
        let stream_count = block.u8("stream count")?;
        block.skip(1, "group count")?;

        for _ in 0..stream_count {
            let pid = block.u16("stream PID")?;
            let coding_length = block.u8("coding info length")? as usize;
            let mut coding = block.sub(coding_length, "coding info")?;
            let stream = read_coding_info(pid, &mut coding)?;
            streams.entry(pid).or_insert(stream);
        }
    }

    tracing::debug!("Clip {} declares {} streams", file, streams.len());
    Ok(streams)
}
