use std::path::Path;

use log::warn;

use dnafeed_core::alphabet::is_base_code;
use dnafeed_core::{Archive, ArchiveOpener};

use crate::errors::{Result, SamplingError};
use crate::policy::AugmentPolicy;
use crate::window::WindowExtractor;

/// Where a window is read from, for error reporting.
pub(crate) struct Draw<'a, A: Archive> {
    pub archive: &'a A,
    pub archive_index: usize,
    pub key: usize,
    pub batch: usize,
    pub fraction: Option<f64>,
}

///
/// Fetch one sequence, place the window and append its base codes to `out`.
///
pub(crate) fn read_window<A: Archive>(
    draw: Draw<'_, A>,
    extractor: &WindowExtractor,
    augment: AugmentPolicy,
    out: &mut Vec<u8>,
) -> Result<()> {
    let key = draw.key.to_string();
    let sequence = draw
        .archive
        .get(&key)
        .map_err(|source| SamplingError::Archive {
            archive: draw.archive_index,
            name: draw.archive.name().to_string(),
            batch: draw.batch,
            source,
        })?;

    if !extractor.fits(sequence.len()) {
        return Err(SamplingError::SequenceTooShort {
            archive: draw.archive_index,
            name: draw.archive.name().to_string(),
            key,
            batch: draw.batch,
            length: sequence.len(),
            window_length: extractor.window_length(),
        });
    }

    let offset = augment.offset(
        draw.fraction.unwrap_or(0.0),
        sequence.len(),
        extractor.window_length(),
    );
    let window = extractor.clip(&sequence, offset);
    if let Some(&code) = window.iter().find(|&&code| !is_base_code(code)) {
        return Err(SamplingError::InvalidBaseCode {
            archive: draw.archive_index,
            name: draw.archive.name().to_string(),
            key,
            batch: draw.batch,
            code,
        });
    }
    out.extend_from_slice(window);
    Ok(())
}

///
/// Open every path, closing the already opened archives if one fails.
///
pub(crate) fn open_archives<O, P>(paths: &[P], opener: &O) -> Result<Vec<O::Archive>>
where
    O: ArchiveOpener,
    P: AsRef<Path>,
{
    let mut archives = Vec::with_capacity(paths.len());
    for path in paths {
        match opener.open(path.as_ref()) {
            Ok(archive) => archives.push(archive),
            Err(source) => {
                close_archives(&mut archives);
                return Err(SamplingError::Open {
                    path: path.as_ref().to_path_buf(),
                    source,
                });
            }
        }
    }
    Ok(archives)
}

/// Close all archives, logging failures instead of stopping at the first one.
pub(crate) fn close_archives<A: Archive>(archives: &mut [A]) {
    for archive in archives.iter_mut() {
        if let Err(err) = archive.close() {
            warn!("Failed to close archive {}: {}", archive.name(), err);
        }
    }
}
