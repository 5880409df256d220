//! Memoized segment loading
//!
//! Each track id is fetched at most once per session. Concurrent requests for
//! the same id share one in-flight future; once it settles the outcome
//! (segments or "none") is cached and the in-flight entry is gone. Every
//! failure, including an empty timings file, caches as "none".

use crate::parser::parse_timings;
use crate::source::TimingSource;
use cyfral_core::TrackSegment;
use futures_util::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// Immutable, cheaply cloned segment list
pub type Segments = Arc<[TrackSegment]>;

type PendingLoad = Shared<LocalBoxFuture<'static, Option<Segments>>>;

enum Slot {
    Pending(PendingLoad),
    Resolved(Option<Segments>),
}

/// Synchronous view of the cache for one id
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentLookup {
    /// Never requested
    Unresolved,
    /// Fetch in flight
    Pending,
    /// Settled, `None` when the track has no usable timings
    Resolved(Option<Segments>),
}

struct LoaderState {
    folders: HashMap<String, String>,
    slots: HashMap<String, Slot>,
}

/// Session-scoped segment cache
///
/// Cloning shares the cache.
#[derive(Clone)]
pub struct SegmentLoader {
    source: Rc<dyn TimingSource>,
    state: Rc<RefCell<LoaderState>>,
}

impl SegmentLoader {
    /// Create a loader for the given track id to folder mapping
    pub fn new(source: Rc<dyn TimingSource>, folders: HashMap<String, String>) -> Self {
        Self {
            source,
            state: Rc::new(RefCell::new(LoaderState {
                folders,
                slots: HashMap::new(),
            })),
        }
    }

    /// Whether `track_id` has a timings folder at all
    pub fn has_timings(&self, track_id: &str) -> bool {
        self.state.borrow().folders.contains_key(track_id)
    }

    /// Cache state without triggering a fetch
    pub fn peek(&self, track_id: &str) -> SegmentLookup {
        let state = self.state.borrow();
        if !state.folders.contains_key(track_id) {
            return SegmentLookup::Resolved(None);
        }
        match state.slots.get(track_id) {
            None => SegmentLookup::Unresolved,
            Some(Slot::Pending(_)) => SegmentLookup::Pending,
            Some(Slot::Resolved(segments)) => SegmentLookup::Resolved(segments.clone()),
        }
    }

    /// Segments for `track_id`, fetching on first use
    pub async fn load(&self, track_id: &str) -> Option<Segments> {
        let pending = {
            let mut state = self.state.borrow_mut();
            let Some(folder) = state.folders.get(track_id).cloned() else {
                return None;
            };

            match state.slots.get(track_id) {
                Some(Slot::Resolved(segments)) => return segments.clone(),
                Some(Slot::Pending(pending)) => pending.clone(),
                None => {
                    let pending = fetch_segments(Rc::clone(&self.source), track_id.to_string(), folder)
                        .boxed_local()
                        .shared();
                    state
                        .slots
                        .insert(track_id.to_string(), Slot::Pending(pending.clone()));
                    pending
                }
            }
        };

        let segments = pending.await;
        self.state
            .borrow_mut()
            .slots
            .insert(track_id.to_string(), Slot::Resolved(segments.clone()));
        segments
    }
}

async fn fetch_segments(
    source: Rc<dyn TimingSource>,
    track_id: String,
    folder: String,
) -> Option<Segments> {
    match source.fetch_timings(&folder).await {
        Ok(text) => {
            let segments = parse_timings(&text);
            if segments.is_empty() {
                debug!(track_id, "Timings file has no segments");
                None
            } else {
                debug!(track_id, count = segments.len(), "Timings loaded");
                Some(segments.into())
            }
        }
        Err(e) => {
            debug!(track_id, error = %e, "No timings for track");
            None
        }
    }
}
