/*!
The tag registry: pluggable interpretation of major type 6.

A [`TagHandler`] claims one tag number. When the decoder meets that tag it
parses the enclosed item first, then asks the handler whether the item is an
acceptable operand. Tags nobody claimed are kept as plain [`Tagged`] items.
*/

use super::*;
use alloc::{collections::BTreeMap, sync::Arc};
use core::fmt;
use item::{DataItem, Tagged};
use length::Argument;
use normalize::{Normalize, Normalized};

pub mod standard;

/// The extension point for major type 6.
pub trait TagHandler: Send + Sync {
    /// The tag number this handler is registered under.
    fn tag(&self) -> u64;

    fn name(&self) -> &'static str;

    /// Validates the enclosed item, failing with [`Error::InvalidTagOperand`]
    /// when it has the wrong shape. `tag` is the header the tag number was
    /// read with.
    fn check(&self, tag: &Argument, item: &DataItem) -> Result<(), Error> {
        let _ = (tag, item);
        Ok(())
    }

    /// Projects a tagged item onto its native value.
    ///
    /// The default keeps the tag number around the normalized operand.
    fn normalize(&self, tagged: &Tagged) -> Result<Normalized, Error> {
        Ok(Normalized::Tagged(
            tagged.tag(),
            Box::new(tagged.item().normalize()?),
        ))
    }
}

/// Tag number to handler. Cheap to clone and safe to share between decoders.
#[derive(Clone)]
pub struct TagRegistry {
    handlers: BTreeMap<u64, Arc<dyn TagHandler>>,
}

impl Default for TagRegistry {
    /// A registry holding the [`standard`] handlers.
    fn default() -> Self {
        let mut r = Self::empty();
        standard::register_all(&mut r);
        r
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(tag, h)| (tag, h.name())))
            .finish()
    }
}

impl TagRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registers `handler` under the tag number it reports, replacing and
    /// returning any handler previously registered there.
    pub fn register<H>(&mut self, handler: H) -> Option<Arc<dyn TagHandler>>
    where
        H: TagHandler + 'static,
    {
        self.register_arc(Arc::new(handler))
    }

    pub fn register_arc(&mut self, handler: Arc<dyn TagHandler>) -> Option<Arc<dyn TagHandler>> {
        let tag = handler.tag();
        let prev = self.handlers.insert(tag, handler);
        if let Some(prev) = &prev {
            debug!("Tag {tag} handler '{}' replaced", prev.name());
        }
        prev
    }

    pub fn unregister(&mut self, tag: u64) -> Option<Arc<dyn TagHandler>> {
        self.handlers.remove(&tag)
    }

    pub fn get(&self, tag: u64) -> Option<&Arc<dyn TagHandler>> {
        self.handlers.get(&tag)
    }

    pub fn contains(&self, tag: u64) -> bool {
        self.handlers.contains_key(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = u64> + '_ {
        self.handlers.keys().copied()
    }

    /// Builds the tagged item for `tag` around an already decoded `item`.
    ///
    /// Unregistered tags produce a generic [`Tagged`] that keeps the tag
    /// header and item untouched.
    pub fn resolve(&self, tag: Argument, item: DataItem) -> Result<Tagged, Error> {
        let Some(handler) = self.handlers.get(&tag.value()) else {
            trace!("Unregistered tag {}", tag.value());
            return Ok(Tagged::from_parts(tag, item, None));
        };

        handler.check(&tag, &item).inspect_err(|e| {
            debug!("Tag {} '{}' rejected its operand: {e}", tag.value(), handler.name());
        })?;
        Ok(Tagged::from_parts(tag, item, Some(handler.clone())))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;

    struct Even;

    impl TagHandler for Even {
        fn tag(&self) -> u64 {
            1000
        }

        fn name(&self) -> &'static str {
            "even"
        }

        fn check(&self, _: &Argument, item: &DataItem) -> Result<(), Error> {
            match item.to_u64() {
                Ok(v) if v % 2 == 0 => Ok(()),
                _ => Err(Error::InvalidTagOperand {
                    tag: 1000,
                    expected: "an even number",
                }),
            }
        }
    }

    struct Odd;

    impl TagHandler for Odd {
        fn tag(&self) -> u64 {
            1000
        }

        fn name(&self) -> &'static str {
            "odd"
        }
    }

    struct ShortestOnly;

    impl TagHandler for ShortestOnly {
        fn tag(&self) -> u64 {
            1002
        }

        fn name(&self) -> &'static str {
            "shortest only"
        }

        fn check(&self, tag: &Argument, _: &DataItem) -> Result<(), Error> {
            if tag.is_shortest() {
                Ok(())
            } else {
                Err(Error::InvalidTagOperand {
                    tag: 1002,
                    expected: "a shortest-form tag header",
                })
            }
        }
    }

    #[test]
    fn handler_sees_header() {
        let mut r = TagRegistry::empty();
        r.register(ShortestOnly);
        assert!(r.resolve(Argument::U16(1002), DataItem::null()).is_ok());
        assert!(matches!(
            r.resolve(Argument::U32(1002), DataItem::null()),
            Err(Error::InvalidTagOperand { tag: 1002, .. })
        ));
    }

    #[test]
    fn resolve() {
        let mut r = TagRegistry::empty();
        assert!(r.register(Even).is_none());

        let t = r
            .resolve(length::compute_length(1000), DataItem::from(2u8))
            .unwrap();
        assert_eq!(t.name(), Some("even"));
        assert!(matches!(
            r.resolve(length::compute_length(1000), DataItem::from(3u8)),
            Err(Error::InvalidTagOperand { tag: 1000, .. })
        ));

        let t = r
            .resolve(length::compute_length(1001), vec![DataItem::from(3u8)].into())
            .unwrap();
        assert_eq!(t.tag(), 1001);
        assert!(t.handler().is_none());
        assert_eq!(t.item(), &DataItem::from(vec![DataItem::from(3u8)]));
    }

    #[test]
    fn last_registration_wins() {
        let mut r = TagRegistry::empty();
        r.register(Even);
        assert_eq!(r.register(Odd).map(|h| h.name()), Some("even"));
        assert!(
            r.resolve(length::compute_length(1000), DataItem::from(3u8))
                .is_ok()
        );
        assert_eq!(r.tags().count(), 1);
        assert!(r.unregister(1000).is_some());
        assert!(!r.contains(1000));
    }

    #[test]
    fn standard_set() {
        let r = TagRegistry::default();
        for tag in [0, 1, 2, 3, 4, 5, 21, 22, 23, 24, 32, 33, 34, 36, 55799] {
            assert!(r.contains(tag), "tag {tag}");
        }
        assert!(!r.contains(6));
    }
}
