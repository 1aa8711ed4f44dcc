//! Magnify the center of a selection into the selection itself.
//!
//! The source window is the selection shrunk by `scale` about its center
//! (`w/scale x h/scale`). It is resampled nearest-neighbor to fill the
//! selection, so a scale of 1.5 zooms in by half.

use crate::{OpsError, OpsResult};
use pixpaint_core::{PixelBuffer, Rect};
use tracing::debug;

/// Default magnification of the enlarge tool.
pub const DEFAULT_ENLARGE_SCALE: f64 = 1.5;

/// Validates an enlarge scale.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] unless `scale` is finite and > 0.
pub fn check_scale(scale: f64) -> OpsResult<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(OpsError::InvalidParameter(format!(
            "enlarge scale must be finite and > 0, got {scale}"
        )))
    }
}

/// Magnifies the center of `selection` by `scale`, in place.
///
/// The selection is clipped to the buffer; an empty or off-buffer selection
/// is a no-op. Samples are taken from the buffer as it was before the call.
/// With `scale < 1` the source window is larger than the selection and is
/// clamped at the buffer edges.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] for a non-finite or non-positive
/// `scale`.
pub fn enlarge_region(buf: &mut PixelBuffer, selection: Rect, scale: f64) -> OpsResult<()> {
    check_scale(scale)?;
    let Some(sel) = selection.clamp_to(buf.width(), buf.height()) else {
        debug!(%selection, "enlarge selection outside buffer");
        return Ok(());
    };
    debug!(%sel, scale, "enlarge_region");

    let snapshot = buf.clone();
    let cx = sel.x as f64 + sel.width as f64 / 2.0;
    let cy = sel.y as f64 + sel.height as f64 / 2.0;
    let max_x = buf.width() as i64 - 1;
    let max_y = buf.height() as i64 - 1;

    // Column lookup is the same for every row.
    let src_cols: Vec<u32> = (sel.x..sel.right())
        .map(|x| source_coord(x, cx, scale, max_x))
        .collect();

    for y in sel.y..sel.bottom() {
        let sy = source_coord(y, cy, scale, max_y);
        let src_row = snapshot.row(sy);
        let dst_row = &mut buf.row_mut(y)[sel.x as usize..sel.right() as usize];
        for (dst, &sx) in dst_row.iter_mut().zip(&src_cols) {
            *dst = src_row[sx as usize];
        }
    }
    Ok(())
}

/// Nearest source pixel for destination coordinate `d`, sampled at the
/// pixel center.
#[inline]
fn source_coord(d: u32, center: f64, scale: f64, max: i64) -> u32 {
    let s = center + (d as f64 + 0.5 - center) / scale;
    (s.floor() as i64).clamp(0, max) as u32
}
