/*!
The simple-value registry: pluggable interpretation of major type 7.

Handlers are keyed by additional information (0..=27). The break marker
(31) never reaches the registry; the decoder handles it while reading
indefinite-length items.
*/

use super::*;
use alloc::{collections::BTreeMap, sync::Arc};
use core::fmt;
use item::Simple;

/// The extension point for major type 7.
pub trait SimpleHandler: Send + Sync {
    /// The additional information values this handler claims.
    fn additional_information(&self) -> &[u8];

    fn name(&self) -> &'static str;

    /// Builds the value from its header and the `data` that followed it.
    ///
    /// The value must encode back to the same additional information and
    /// `data`; the registry rejects it otherwise.
    fn construct(&self, additional_information: u8, data: &[u8]) -> Result<Simple, Error>;
}

#[derive(Clone)]
pub struct SimpleRegistry {
    handlers: BTreeMap<u8, Arc<dyn SimpleHandler>>,
}

impl Default for SimpleRegistry {
    /// A registry holding false, true, null, undefined, the one-byte simple
    /// value and the three float widths.
    fn default() -> Self {
        let mut r = Self::empty();
        for h in [
            Arc::new(Booleans) as Arc<dyn SimpleHandler>,
            Arc::new(Null),
            Arc::new(Undefined),
            Arc::new(SimpleValue),
            Arc::new(Floats),
        ] {
            // Standard handlers only claim 20..=27
            let _ = r.register_arc(h);
        }
        r
    }
}

impl fmt::Debug for SimpleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(ai, h)| (ai, h.name())))
            .finish()
    }
}

impl SimpleRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registers `handler` under every additional information value it
    /// claims. Later registrations replace earlier ones.
    ///
    /// Values above 27 cannot be registered: 28..=30 are reserved and 31 is
    /// the break marker.
    pub fn register<H>(&mut self, handler: H) -> Result<(), Error>
    where
        H: SimpleHandler + 'static,
    {
        self.register_arc(Arc::new(handler))
    }

    pub fn register_arc(&mut self, handler: Arc<dyn SimpleHandler>) -> Result<(), Error> {
        if let Some(ai) = handler
            .additional_information()
            .iter()
            .find(|ai| **ai > length::LENGTH_8_BYTES)
        {
            return Err(Error::InvalidSimpleValue(*ai));
        }

        for ai in handler.additional_information() {
            if let Some(prev) = self.handlers.insert(*ai, handler.clone()) {
                debug!("Simple value {ai} handler '{}' replaced", prev.name());
            }
        }
        Ok(())
    }

    pub fn unregister(&mut self, additional_information: u8) -> Option<Arc<dyn SimpleHandler>> {
        self.handlers.remove(&additional_information)
    }

    pub fn get(&self, additional_information: u8) -> Option<&Arc<dyn SimpleHandler>> {
        self.handlers.get(&additional_information)
    }

    pub fn contains(&self, additional_information: u8) -> bool {
        self.handlers.contains_key(&additional_information)
    }

    /// Builds the simple value for `additional_information`, falling back to
    /// [`Simple::generic`] when no handler is registered.
    ///
    /// A handler result that would not re-encode to the same header fails
    /// with [`Error::InvalidSimpleValue`].
    pub fn resolve(&self, additional_information: u8, data: &[u8]) -> Result<Simple, Error> {
        match self.handlers.get(&additional_information) {
            Some(handler) => {
                let value = handler
                    .construct(additional_information, data)
                    .inspect_err(|e| {
                        debug!("Simple value handler '{}' failed: {e}", handler.name());
                    })?;
                if value.additional_information() != additional_information
                    || value.trailing_bytes() != data
                {
                    debug!(
                        "Simple value handler '{}' changed the header of {additional_information}",
                        handler.name()
                    );
                    return Err(Error::InvalidSimpleValue(additional_information));
                }
                Ok(value)
            }
            None => {
                trace!("Unregistered simple value {additional_information}");
                Simple::generic(additional_information, data)
            }
        }
    }
}

fn expect_empty(additional_information: u8, data: &[u8]) -> Result<(), Error> {
    if data.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidSimpleValue(additional_information))
    }
}

/// false (20) and true (21).
#[derive(Debug, Clone, Copy)]
pub struct Booleans;

impl SimpleHandler for Booleans {
    fn additional_information(&self) -> &[u8] {
        &[20, 21]
    }

    fn name(&self) -> &'static str {
        "boolean"
    }

    fn construct(&self, additional_information: u8, data: &[u8]) -> Result<Simple, Error> {
        expect_empty(additional_information, data)?;
        match additional_information {
            20 => Ok(Simple::False),
            21 => Ok(Simple::True),
            _ => Err(Error::InvalidSimpleValue(additional_information)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Null;

impl SimpleHandler for Null {
    fn additional_information(&self) -> &[u8] {
        &[22]
    }

    fn name(&self) -> &'static str {
        "null"
    }

    fn construct(&self, additional_information: u8, data: &[u8]) -> Result<Simple, Error> {
        expect_empty(additional_information, data).map(|_| Simple::Null)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Undefined;

impl SimpleHandler for Undefined {
    fn additional_information(&self) -> &[u8] {
        &[23]
    }

    fn name(&self) -> &'static str {
        "undefined"
    }

    fn construct(&self, additional_information: u8, data: &[u8]) -> Result<Simple, Error> {
        expect_empty(additional_information, data).map(|_| Simple::Undefined)
    }
}

/// A simple value in the following byte. Values below 32 must use the
/// one-byte form, so they are rejected here.
#[derive(Debug, Clone, Copy)]
pub struct SimpleValue;

impl SimpleHandler for SimpleValue {
    fn additional_information(&self) -> &[u8] {
        &[length::LENGTH_1_BYTE]
    }

    fn name(&self) -> &'static str {
        "simple value"
    }

    fn construct(&self, additional_information: u8, data: &[u8]) -> Result<Simple, Error> {
        match data {
            [v] if *v >= 32 => Ok(Simple::Value(*v)),
            _ => Err(Error::InvalidSimpleValue(additional_information)),
        }
    }
}

/// Half, single and double precision floats (25, 26, 27).
#[derive(Debug, Clone, Copy)]
pub struct Floats;

impl SimpleHandler for Floats {
    fn additional_information(&self) -> &[u8] {
        &[
            length::LENGTH_2_BYTES,
            length::LENGTH_4_BYTES,
            length::LENGTH_8_BYTES,
        ]
    }

    fn name(&self) -> &'static str {
        "float"
    }

    fn construct(&self, additional_information: u8, data: &[u8]) -> Result<Simple, Error> {
        let invalid = || Error::InvalidSimpleValue(additional_information);
        match additional_information {
            length::LENGTH_2_BYTES => data
                .try_into()
                .map(|b| Simple::Half(half::f16::from_be_bytes(b)))
                .map_err(|_| invalid()),
            length::LENGTH_4_BYTES => data
                .try_into()
                .map(|b| Simple::Single(f32::from_be_bytes(b)))
                .map_err(|_| invalid()),
            length::LENGTH_8_BYTES => data
                .try_into()
                .map(|b| Simple::Double(f64::from_be_bytes(b)))
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}
