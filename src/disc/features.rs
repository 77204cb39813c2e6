//! Disc feature classification
//!
//! Everything here is advisory: a file that cannot be read leaves the
//! corresponding flag unset instead of failing the disc.

use std::io::Read;
use std::path::Path;

use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

use super::dir::DirHandle;
use super::paths::{find_directory, DiscLayout};

/// Virtual machine directories of the BD+ protection scheme
pub const BD_PLUS_DIRS: [&str; 3] = ["BDSVM", "SLYVM", "ANYVM"];

/// Marker file of D-BOX motion-coded discs, at disc root
pub const DBOX_MARKER: &str = "FilmIndex.xml";

/// Index version token of Ultra HD discs
pub const UHD_INDEX_VERSION: &str = "INDX0300";

const INDEX_FILE: &str = "index.bdmv";
const TITLE_FILE: &str = "bdmt_eng.xml";
const DISCINFO_NS: &str = "urn:BDA:bdmv;discinfo";
const PLACEHOLDER_TITLE: &str = "blu-ray";

/// Feature flags derived once from the disc layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiscFeatures {
    pub is_bd_plus: bool,
    pub is_bd_java: bool,
    pub is_psp: bool,
    pub is_3d: bool,
    pub is_dbox: bool,
    pub is_uhd: bool,
}

impl DiscFeatures {
    pub fn classify(layout: &DiscLayout) -> Self {
        let features = Self {
            is_bd_plus: BD_PLUS_DIRS
                .iter()
                .any(|name| find_directory(name, &layout.root, 0).is_some()),
            is_bd_java: layout.bdjo.as_ref().is_some_and(DirHandle::has_files),
            is_psp: layout.snp.as_ref().is_some_and(has_mnv_files),
            is_3d: layout.ssif.as_ref().is_some_and(DirHandle::has_files),
            is_dbox: layout.root.join(DBOX_MARKER).is_file(),
            is_uhd: is_uhd_index(&layout.bdmv),
        };
        tracing::debug!("Classified disc features: {:?}", features);
        features
    }
}

fn has_mnv_files(snp: &DirHandle) -> bool {
    snp.files()
        .map(|files| {
            files
                .iter()
                .any(|f| f.extension().is_some_and(|e| e.eq_ignore_ascii_case("mnv")))
        })
        .unwrap_or(false)
}

/// Read the index version token from the start of an index file.
/// Returns `None` for an empty stream or bytes that are not text.
pub fn read_index_version<R: Read>(reader: R) -> Option<String> {
    let mut buffer = Vec::with_capacity(UHD_INDEX_VERSION.len());
    reader
        .take(UHD_INDEX_VERSION.len() as u64)
        .read_to_end(&mut buffer)
        .ok()?;
    if buffer.is_empty() {
        return None;
    }
    String::from_utf8(buffer).ok()
}

/// Look for `index.bdmv` (any case) directly under BDMV and test its token
pub fn is_uhd_index(bdmv: &DirHandle) -> bool {
    let Ok(files) = bdmv.files() else {
        return false;
    };
    let Some(index) = files.iter().find(|f| f.name.eq_ignore_ascii_case(INDEX_FILE)) else {
        return false;
    };

    match std::fs::File::open(&index.path) {
        Ok(file) => read_index_version(file).as_deref() == Some(UHD_INDEX_VERSION),
        Err(e) => {
            tracing::debug!("Cannot read {:?}: {}", index.path, e);
            false
        }
    }
}

/// Best-effort read of the disc title from `META/**/bdmt_eng.xml`
pub fn read_disc_title(meta: &DirHandle) -> Option<String> {
    let path = WalkDir::new(meta.path())
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.eq_ignore_ascii_case(TITLE_FILE))
        })?
        .into_path();

    match std::fs::read_to_string(&path) {
        Ok(xml) => parse_disc_title(&xml),
        Err(e) => {
            tracing::debug!("Cannot read disc title from {:?}: {}", path, e);
            None
        }
    }
}

/// Extract `discinfo/title/name` in the disc info namespace from a
/// metadata document. The "Blu-ray" placeholder counts as no title.
pub fn parse_disc_title(xml: &str) -> Option<String> {
    let ns = Regex::new(&format!(
        r#"xmlns(?::([A-Za-z_][\w.-]*))?\s*=\s*["']{}["']"#,
        regex::escape(DISCINFO_NS)
    ))
    .ok()?;
    let prefix = match ns.captures(xml)?.get(1) {
        Some(p) => format!("{}:", regex::escape(p.as_str())),
        None => String::new(),
    };

    let name = Regex::new(&format!(
        r"(?s)<{p}discinfo\b[^>]*>.*?<{p}title\b[^>]*>.*?<{p}name\b[^>]*>(.*?)</{p}name\s*>",
        p = prefix
    ))
    .ok()?;
    let title = unescape_xml(name.captures(xml)?.get(1)?.as_str().trim());

    if title.is_empty() || title.to_lowercase() == PLACEHOLDER_TITLE {
        return None;
    }
    Some(title)
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Total bytes of every file below `root`, leaving out interleaved files
/// whose bytes are already counted through their stream files
pub fn directory_size(root: &Path) -> u64 {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry while sizing disc: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            !entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ssif"))
        })
        .filter_map(|entry| entry.metadata().ok())
        .map(|m| m.len())
        .sum()
}
