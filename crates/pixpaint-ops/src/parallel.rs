//! Row-parallel versions of the expensive engines, using Rayon.
//!
//! Output rows are disjoint `par_chunks_mut` slices of the destination
//! buffer and every worker reads only the immutable source, so no
//! synchronization is needed beyond the cancellation flag. Results are
//! bit-identical to the serial versions in [`crate::bilateral`].
//!
//! # Example
//!
//! ```rust
//! use pixpaint_core::{PixelBuffer, Rgba8};
//! use pixpaint_ops::{bilateral, parallel};
//!
//! let src = PixelBuffer::filled(64, 64, Rgba8::opaque(10, 20, 30));
//! let params = bilateral::FilterParams::default();
//! assert_eq!(parallel::bilateral(&src, &params), bilateral::apply(&src, &params));
//! ```

use crate::bilateral::{FilterParams, Kernel};
use crate::{CancelToken, OpsResult};
use pixpaint_core::PixelBuffer;
use rayon::prelude::*;
use tracing::debug;

/// Parallel bilateral pass.
pub fn bilateral(src: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    match bilateral_cancellable(src, params, &CancelToken::new()) {
        Ok(out) => out,
        Err(_) => unreachable!("a fresh token is never cancelled"),
    }
}

/// Parallel bilateral pass; each row checks `token` before it starts.
///
/// # Errors
///
/// Returns [`crate::OpsError::Cancelled`] if the token fires. Rows already
/// in flight finish but their output is discarded.
pub fn bilateral_cancellable(
    src: &PixelBuffer,
    params: &FilterParams,
    token: &CancelToken,
) -> OpsResult<PixelBuffer> {
    debug!(
        w = src.width(),
        h = src.height(),
        diameter = params.diameter(),
        threads = rayon::current_num_threads(),
        "parallel::bilateral"
    );
    token.check()?;
    if src.is_empty() {
        return Ok(src.clone());
    }

    let kernel = Kernel::new(params);
    let rows = kernel.rows(src.height());
    let width = src.width() as usize;
    let mut out = src.clone();

    out.data_mut()
        .par_chunks_mut(width)
        .enumerate()
        .skip(rows.start as usize)
        .take(rows.len())
        .try_for_each(|(y, row)| -> OpsResult<()> {
            token.check()?;
            kernel.filter_row(src, y as u32, row);
            Ok(())
        })?;

    Ok(out)
}
