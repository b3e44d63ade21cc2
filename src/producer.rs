//! Definition producers and the callback protocol.
//!
//! A producer supplies the definitions of one schema by emitting them through a
//! [`ProducerCallback`]. Producers are invoked exactly once per schema load and
//! never touch the registry directly, which keeps the source of definitions
//! (embedded tables, files, remote fetches) separate from the store that
//! validates and indexes them.

use crate::error::ProducerError;
use crate::registry::{Loading, SchemaRegistry};
use crate::schema::{SchemaBundle, SchemaDescriptor, SchemaObject};

use std::fmt;
use std::sync::Arc;

/// Receiver for definitions emitted by a producer.
pub trait ProducerCallback {
    /// Called once per definition. `oid` must equal the definition's own OID.
    fn definition_produced(&mut self, producer: &str, oid: &str, definition: SchemaObject);
}

/// Source of schema definitions.
///
/// The registry passed to [`produce`](SchemaProducer::produce) is the registry
/// being built, holding every schema loaded so far. It is read-only.
pub trait SchemaProducer: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Emit every definition through `callback`.
    ///
    /// Returning an error discards everything already emitted for the schema.
    fn produce(
        &self,
        registry: &SchemaRegistry<Loading>,
        callback: &mut dyn ProducerCallback,
    ) -> Result<(), ProducerError>;
}

impl SchemaProducer for SchemaBundle {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn produce(
        &self,
        _registry: &SchemaRegistry<Loading>,
        callback: &mut dyn ProducerCallback,
    ) -> Result<(), ProducerError> {
        for definition in self.definitions() {
            let oid = definition.oid().to_string();
            callback.definition_produced(self.name(), &oid, definition);
        }
        Ok(())
    }
}

/// Producer backed by a closure.
///
/// Useful for definitions computed at runtime or fetched from elsewhere.
pub struct FnProducer<F> {
    name: String,
    produce: F,
}

impl<F> FnProducer<F>
where
    F: Fn(&SchemaRegistry<Loading>, &mut dyn ProducerCallback) -> Result<(), ProducerError>
        + Send
        + Sync,
{
    pub fn new(name: impl Into<String>, produce: F) -> Self {
        Self {
            name: name.into(),
            produce,
        }
    }
}

impl<F> SchemaProducer for FnProducer<F>
where
    F: Fn(&SchemaRegistry<Loading>, &mut dyn ProducerCallback) -> Result<(), ProducerError>
        + Send
        + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn produce(
        &self,
        registry: &SchemaRegistry<Loading>,
        callback: &mut dyn ProducerCallback,
    ) -> Result<(), ProducerError> {
        (self.produce)(registry, callback)
    }
}

impl<F> fmt::Debug for FnProducer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProducer").field("name", &self.name).finish()
    }
}

/// A schema descriptor together with the producers that populate it.
#[derive(Clone)]
pub struct SchemaSource {
    pub descriptor: SchemaDescriptor,
    producers: Vec<Arc<dyn SchemaProducer>>,
}

impl SchemaSource {
    /// Create a source with no producers yet.
    pub fn new(descriptor: SchemaDescriptor) -> Self {
        Self {
            descriptor,
            producers: Vec::new(),
        }
    }

    /// Add a producer. Producers run in the order they were added.
    pub fn with_producer<P: SchemaProducer + 'static>(mut self, producer: P) -> Self {
        self.producers.push(Arc::new(producer));
        self
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn producers(&self) -> &[Arc<dyn SchemaProducer>] {
        &self.producers
    }
}

impl From<SchemaBundle> for SchemaSource {
    fn from(bundle: SchemaBundle) -> Self {
        Self::new(bundle.descriptor.clone()).with_producer(bundle)
    }
}

impl fmt::Debug for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let producers: Vec<&str> = self.producers.iter().map(|p| p.name()).collect();
        f.debug_struct("SchemaSource")
            .field("descriptor", &self.descriptor)
            .field("producers", &producers)
            .finish()
    }
}

/// Callback that stages emitted definitions for one schema load.
#[derive(Debug, Default)]
pub(crate) struct StagingCallback {
    pub(crate) definitions: Vec<StagedDefinition>,
}

#[derive(Debug)]
pub(crate) struct StagedDefinition {
    pub(crate) producer: String,
    pub(crate) announced_oid: String,
    pub(crate) definition: SchemaObject,
}

impl ProducerCallback for StagingCallback {
    fn definition_produced(&mut self, producer: &str, oid: &str, definition: SchemaObject) {
        self.definitions.push(StagedDefinition {
            producer: producer.to_string(),
            announced_oid: oid.to_string(),
            definition,
        });
    }
}
