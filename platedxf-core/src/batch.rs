//! Rendering a range of labels.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::config::LabelConfig;
use crate::error::LabelError;
use crate::label::{LabelItem, RenderedLabel, render_label};
use crate::source::{BitmapSource, OutlineSource};

/// Per-item results of [`render_batch`], in input order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub results: Vec<(LabelItem, Result<RenderedLabel, LabelError>)>,
    /// The cancel flag was seen; later items carry [`LabelError::Cancelled`].
    pub cancelled: bool,
}

impl BatchOutcome {
    /// Items that failed for a reason other than cancellation.
    pub fn failures(&self) -> impl Iterator<Item = (&LabelItem, &LabelError)> {
        self.results.iter().filter_map(|(item, result)| match result {
            Err(LabelError::Cancelled) | Ok(_) => None,
            Err(err) => Some((item, err)),
        })
    }

    pub fn successes(&self) -> impl Iterator<Item = &RenderedLabel> {
        self.results.iter().filter_map(|(_, r)| r.as_ref().ok())
    }
}

/// Render every item independently.
///
/// One item's failure never stops the others. `cancel` is checked before
/// each item; once set, no further item is attempted.
#[must_use]
pub fn render_batch(
    items: &[LabelItem],
    config: &LabelConfig,
    outlines: &dyn OutlineSource,
    bitmaps: &dyn BitmapSource,
    cancel: &AtomicBool,
) -> BatchOutcome {
    let mut cancelled = false;
    let results = items
        .iter()
        .map(|item| {
            cancelled = cancelled || cancel.load(Ordering::Relaxed);
            let result = if cancelled {
                Err(LabelError::Cancelled)
            } else {
                render_label(item, config, outlines, bitmaps)
            };
            if let Err(err) = &result {
                if !cancelled {
                    warn!("{item}: {err}");
                }
            }
            (item.clone(), result)
        })
        .collect();

    let outcome = BatchOutcome { results, cancelled };
    info!(
        "rendered {} of {} labels{}",
        outcome.successes().count(),
        items.len(),
        if cancelled { " (cancelled)" } else { "" }
    );
    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
