//! Tag reading backed by lofty.

use super::{RawTags, TagReader};
use crate::error::MetadataError;
use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;

/// Reads the primary tag (or the first tag present) with lofty
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<Option<RawTags>, MetadataError> {
        let read_error = |reason: String| MetadataError::Read {
            path: path.to_path_buf(),
            reason,
        };

        let tagged_file = Probe::open(path)
            .map_err(|e| read_error(e.to_string()))?
            .read()
            .map_err(|e| read_error(e.to_string()))?;

        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            return Ok(None);
        };

        Ok(Some(RawTags {
            artist: tag.artist().map(|s| s.into_owned()),
            title: tag.title().map(|s| s.into_owned()),
            album: tag.album().map(|s| s.into_owned()),
            genre: tag.genre().map(|s| s.into_owned()),
        }))
    }
}
