//! Latest-wins render slot.
//!
//! Holds the single "live" render result. Every new render takes a ticket;
//! a result may only be published while its ticket is still the newest, so
//! a slow, superseded render can never overwrite a fresher one.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

use crate::error::Result;
use crate::render::Duotone;
use crate::types::{Bitmap, Colour};

/// Identifies a render: which source, which colours, which intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderKey {
    source: u64,
    limit: u32,
    highlight: Colour,
    shadow: Colour,
    intensity: u64,
}

impl RenderKey {
    pub fn new(source: &Bitmap, limit: u32, duotone: &Duotone) -> Self {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);

        Self {
            source: hasher.finish(),
            limit,
            highlight: duotone.highlight,
            shadow: duotone.shadow,
            intensity: duotone.intensity.value().to_bits(),
        }
    }
}

/// Monotonic render ticket handed out by [`RenderSlot::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Live {
    ticket: Ticket,
    key: RenderKey,
    bitmap: Arc<Bitmap>,
}

/// Single-slot, latest-wins holder for the displayed render.
#[derive(Debug, Default)]
pub struct RenderSlot {
    generation: AtomicU64,
    live: Mutex<Option<Live>>,
}

impl RenderSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new render, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        let ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        trace!("render ticket {} issued", ticket.0);
        ticket
    }

    /// Whether `ticket` is still the newest one issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Publish a finished render. Returns `false` if it was superseded.
    pub fn publish(&self, ticket: Ticket, key: RenderKey, bitmap: Bitmap) -> bool {
        self.publish_with(ticket, key, bitmap, |_| Ok(()))
            .unwrap_or(false)
    }

    /// Publish a finished render and run `present` on it while holding the
    /// slot, so presentation (e.g. writing the output file) is sequential.
    ///
    /// Superseded renders are dropped without calling `present`.
    pub fn publish_with<F>(
        &self,
        ticket: Ticket,
        key: RenderKey,
        bitmap: Bitmap,
        present: F,
    ) -> Result<bool>
    where
        F: FnOnce(&Bitmap) -> Result<()>,
    {
        let mut live = self.lock();

        let stale = !self.is_current(ticket)
            || live.as_ref().is_some_and(|current| current.ticket > ticket);
        if stale {
            debug!("dropping superseded render {}", ticket.0);
            return Ok(false);
        }

        present(&bitmap)?;
        *live = Some(Live {
            ticket,
            key,
            bitmap: Arc::new(bitmap),
        });
        Ok(true)
    }

    /// The live bitmap, if it was rendered for exactly `key`.
    pub fn cached(&self, key: &RenderKey) -> Option<Arc<Bitmap>> {
        self.lock()
            .as_ref()
            .filter(|live| live.key == *key)
            .map(|live| Arc::clone(&live.bitmap))
    }

    /// The live bitmap regardless of key.
    pub fn current(&self) -> Option<Arc<Bitmap>> {
        self.lock().as_ref().map(|live| Arc::clone(&live.bitmap))
    }

    /// Drop the live result.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Live>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChromaError;
    use crate::types::Intensity;

    fn source() -> Bitmap {
        Bitmap::from_rgba(2, 1, &[[0, 0, 0, 255], [255, 255, 255, 255]]).unwrap()
    }

    #[test]
    fn test_publish_current_ticket() {
        let slot = RenderSlot::new();
        let duotone = Duotone::default();
        let key = RenderKey::new(&source(), 2000, &duotone);

        let ticket = slot.begin();
        assert!(slot.publish(ticket, key, duotone.apply(&source())));
        assert_eq!(slot.cached(&key).as_deref(), Some(&duotone.apply(&source())));
    }

    #[test]
    fn test_superseded_render_is_dropped() {
        let slot = RenderSlot::new();
        let src = source();
        let old = Duotone::default().with_intensity(Intensity::new(0.2).unwrap());
        let new = Duotone::default();

        let first = slot.begin();
        let second = slot.begin();
        assert!(!slot.is_current(first));

        // The newer render finishes first, then the stale one arrives.
        assert!(slot.publish(second, RenderKey::new(&src, 2000, &new), new.apply(&src)));
        assert!(!slot.publish(first, RenderKey::new(&src, 2000, &old), old.apply(&src)));

        assert_eq!(slot.current().as_deref(), Some(&new.apply(&src)));
    }

    #[test]
    fn test_stale_render_not_presented() {
        let slot = RenderSlot::new();
        let src = source();
        let key = RenderKey::new(&src, 2000, &Duotone::default());

        let stale = slot.begin();
        slot.begin();

        let mut presented = false;
        let accepted = slot
            .publish_with(stale, key, src.clone(), |_| {
                presented = true;
                Ok(())
            })
            .unwrap();

        assert!(!accepted);
        assert!(!presented);
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_present_error_keeps_previous() {
        let slot = RenderSlot::new();
        let src = source();
        let key = RenderKey::new(&src, 2000, &Duotone::default());

        let ticket = slot.begin();
        let result = slot.publish_with(ticket, key, src, |_| {
            Err(ChromaError::Watch {
                message: "boom".to_string(),
            })
        });

        assert!(result.is_err());
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_cache_miss_on_parameter_change() {
        let slot = RenderSlot::new();
        let src = source();
        let duotone = Duotone::default();
        let key = RenderKey::new(&src, 2000, &duotone);

        let ticket = slot.begin();
        slot.publish(ticket, key, duotone.apply(&src));

        let other_intensity = RenderKey::new(&src, 2000, &duotone.with_intensity(Intensity::NONE));
        let other_shadow = RenderKey::new(
            &src,
            2000,
            &Duotone {
                shadow: Colour::BLACK,
                ..duotone
            },
        );
        let other_limit = RenderKey::new(&src, 100, &duotone);

        assert!(slot.cached(&key).is_some());
        assert!(slot.cached(&other_intensity).is_none());
        assert!(slot.cached(&other_shadow).is_none());
        assert!(slot.cached(&other_limit).is_none());

        slot.clear();
        assert!(slot.cached(&key).is_none());
    }
}
