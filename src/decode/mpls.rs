//! Playlist (`.mpls`) header decoding
//!
//! Reads the MVC base-view flag from AppInfoPlayList and, for every
//! PlayItem, the clip name, the angle clips and the STN table.

use std::collections::BTreeMap;

use super::reader::PayloadReader;
use super::{check_version, read_coding_info};
use crate::error::{BdError, Result};
use crate::records::TsStream;

const TYPE_INDICATOR: &str = "MPLS";

const PLAYLIST_ADDRESS: usize = 8;

/// Flags byte of AppInfoPlayList holding `MVC_base_view_R_flag`
const APP_INFO_FLAGS: usize = 0x38;
const MVC_BASE_VIEW_R: u8 = 0x10;

const MULTI_ANGLE: u16 = 0x0010;

/// One PlayItem, or one alternate angle of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayItem {
    /// Five-character clip id (`00001`)
    pub clip_id: String,
    pub angle_index: u8,
    /// STN streams keyed by PID; shared by all angles of the item
    pub streams: BTreeMap<u16, TsStream>,
}

/// Decoded playlist header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistHeader {
    pub mvc_base_view_r: bool,
    pub items: Vec<PlayItem>,
}

pub fn parse_playlist(file: &str, data: &[u8]) -> Result<PlaylistHeader> {
    let mut header = PayloadReader::new(file, data);
    let indicator = header.ascii(4, "type indicator")?;
    if indicator != TYPE_INDICATOR {
        return Err(BdError::invalid(
            file,
            format!("type indicator {:?}, expected {:?}", indicator, TYPE_INDICATOR),
        ));
    }
    check_version(file, &header.ascii(4, "version")?)?;

    let playlist_start = PayloadReader::at(file, data, PLAYLIST_ADDRESS)?.u32("playlist address")? as usize;
    let flags = PayloadReader::at(file, data, APP_INFO_FLAGS)?.u8("app info flags")?;

    let mut block = PayloadReader::at(file, data, playlist_start)?;
    let length = block.u32("playlist length")? as usize;
    let mut block = block.sub(length, "playlist")?;
    block.skip(2, "playlist reserved")?;
    let item_count = block.u16("play item count")?;
    block.skip(2, "sub path count")?;

    let mut items = Vec::with_capacity(item_count as usize);
    for _ in 0..item_count {
        let item_length = block.u16("play item length")? as usize;
        let mut item = block.sub(item_length, "play item")?;
        read_play_item(&mut item, &mut items)?;
    }

    Ok(PlaylistHeader {
        mvc_base_view_r: flags & MVC_BASE_VIEW_R != 0,
        items,
    })
}

fn read_play_item(item: &mut PayloadReader<'_>, items: &mut Vec<PlayItem>) -> Result<()> {
    let clip_id = item.ascii(5, "clip name")?;
    item.skip(4, "clip codec id")?;
    let flags = item.u16("play item flags")?;
    // STC id, IN/OUT time, UO mask, random access, still mode and time
    item.skip(1 + 4 + 4 + 8 + 1 + 1 + 2, "play item times")?;

    let mut angles = Vec::new();
    if flags & MULTI_ANGLE != 0 {
        let angle_count = item.u8("angle count")?;
        item.skip(1, "angle flags")?;
        for _ in 1..angle_count {
            angles.push(item.ascii(5, "angle clip name")?);
            item.skip(4 + 1, "angle codec and STC id")?;
        }
    }

    let stn_length = item.u16("STN length")? as usize;
    let mut stn = item.sub(stn_length, "STN table")?;
    let streams = read_stn_table(&mut stn)?;

    items.push(PlayItem {
        clip_id,
        angle_index: 0,
        streams: streams.clone(),
    });
    for (i, angle) in angles.into_iter().enumerate() {
        items.push(PlayItem {
            clip_id: angle,
            angle_index: (i + 1) as u8,
            streams: streams.clone(),
        });
    }
    Ok(())
}

/// Primary video, primary audio, PG and IG entries. Secondary streams carry
/// trailing reference lists and are left unread.
fn read_stn_table(stn: &mut PayloadReader<'_>) -> Result<BTreeMap<u16, TsStream>> {
    stn.skip(2, "STN reserved")?;
    let video = stn.u8("video count")? as usize;
    let audio = stn.u8("audio count")? as usize;
    let pg = stn.u8("PG count")? as usize;
    let ig = stn.u8("IG count")? as usize;
    stn.skip(3 + 5, "secondary counts and reserved")?;

    let mut streams = BTreeMap::new();
    for _ in 0..video + audio + pg + ig {
        let entry_length = stn.u8("stream entry length")? as usize;
        let mut entry = stn.sub(entry_length, "stream entry")?;
        let pid = read_entry_pid(&mut entry)?;

        let attr_length = stn.u8("stream attributes length")? as usize;
        let mut attributes = stn.sub(attr_length, "stream attributes")?;
        let stream = read_coding_info(pid, &mut attributes)?;
        streams.entry(pid).or_insert(stream);
    }
    Ok(streams)
}

fn read_entry_pid(entry: &mut PayloadReader<'_>) -> Result<u16> {
    match entry.u8("stream entry type")? {
        1 => {}
        2 | 4 => entry.skip(2, "sub path and sub clip id")?,
        _ => entry.skip(1, "sub path id")?,
    }
    entry.u16("stream PID")
}
