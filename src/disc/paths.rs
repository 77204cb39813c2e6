//! Locating the BDMV skeleton

use std::collections::VecDeque;
use std::path::Path;

use super::dir::DirHandle;
use crate::error::{BdError, Result};

pub const BDMV: &str = "BDMV";
pub const BDJO: &str = "BDJO";
pub const CLIPINF: &str = "CLIPINF";
pub const PLAYLIST: &str = "PLAYLIST";
pub const SNP: &str = "SNP";
pub const STREAM: &str = "STREAM";
pub const SSIF: &str = "SSIF";
pub const META: &str = "META";

/// The resolved directories of a disc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscLayout {
    pub root: DirHandle,
    pub bdmv: DirHandle,
    pub clipinf: DirHandle,
    pub playlist: DirHandle,
    pub bdjo: Option<DirHandle>,
    pub snp: Option<DirHandle>,
    pub stream: Option<DirHandle>,
    pub ssif: Option<DirHandle>,
    pub meta: Option<DirHandle>,
}

impl DiscLayout {
    /// Resolve the layout from any directory at, above or inside BDMV
    pub fn resolve(start: &Path, search_depth: usize) -> Result<Self> {
        let bdmv = find_bdmv(start, search_depth)?;
        let root = bdmv.parent().ok_or_else(|| {
            BdError::StructureNotFound(format!("{} has no parent", bdmv.path().display()))
        })?;

        let clipinf = find_directory(CLIPINF, &bdmv, search_depth)
            .ok_or_else(|| missing(CLIPINF, &bdmv))?;
        let playlist = find_directory(PLAYLIST, &bdmv, search_depth)
            .ok_or_else(|| missing(PLAYLIST, &bdmv))?;

        let stream = find_directory(STREAM, &bdmv, search_depth);
        let ssif = stream
            .as_ref()
            .and_then(|s| find_directory(SSIF, s, search_depth));

        let layout = Self {
            bdjo: find_directory(BDJO, &bdmv, search_depth),
            snp: find_directory(SNP, &root, search_depth),
            meta: find_directory(META, &bdmv, search_depth),
            stream,
            ssif,
            clipinf,
            playlist,
            bdmv,
            root,
        };

        tracing::debug!(
            "Resolved disc layout: root={:?}, stream={}, ssif={}, bdjo={}, snp={}, meta={}",
            layout.root.path(),
            layout.stream.is_some(),
            layout.ssif.is_some(),
            layout.bdjo.is_some(),
            layout.snp.is_some(),
            layout.meta.is_some()
        );

        Ok(layout)
    }
}

fn missing(name: &str, parent: &DirHandle) -> BdError {
    BdError::StructureNotFound(format!("no {} directory under {}", name, parent.path().display()))
}

/// Find the BDMV directory: first among `start` and its ancestors, then by
/// a bounded search below `start`
pub fn find_bdmv(start: &Path, search_depth: usize) -> Result<DirHandle> {
    let start = start.canonicalize().map_err(|e| {
        BdError::StructureNotFound(format!("cannot resolve {}: {}", start.display(), e))
    })?;
    if !start.is_dir() {
        return Err(BdError::StructureNotFound(format!(
            "{} is not a directory",
            start.display()
        )));
    }

    if let Some(dir) = start
        .ancestors()
        .find(|dir| dir.file_name().and_then(|n| n.to_str()) == Some(BDMV))
    {
        return Ok(DirHandle::new(dir));
    }

    find_directory(BDMV, &DirHandle::new(&start), search_depth).ok_or_else(|| {
        BdError::StructureNotFound(format!("no {} directory at or below {}", BDMV, start.display()))
    })
}

/// Breadth-first search for a directory called `name` below `dir`.
///
/// Depth 0 only looks at the immediate children; each extra level of depth
/// also looks at the children of those. The shallowest match wins, siblings
/// in name order.
pub fn find_directory(name: &str, dir: &DirHandle, search_depth: usize) -> Option<DirHandle> {
    let mut worklist = VecDeque::new();
    worklist.push_back((dir.clone(), search_depth));

    while let Some((current, depth)) = worklist.pop_front() {
        let children = match current.child_dirs() {
            Ok(children) => children,
            Err(e) => {
                tracing::debug!("Cannot list {:?}: {}", current.path(), e);
                continue;
            }
        };

        if let Some(found) = children.iter().find(|child| child.name() == name) {
            return Some(found.clone());
        }

        if depth > 0 {
            worklist.extend(children.into_iter().map(|child| (child, depth - 1)));
        }
    }

    None
}
