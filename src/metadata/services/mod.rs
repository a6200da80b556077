//! Metadata services: descriptor construction, element building,
//! hierarchy aggregation and caching.

pub mod aggregator;
pub mod descriptors;
pub mod elements;
pub mod manager;

pub use aggregator::BeanMetaDataBuilder;
pub use descriptors::ConstraintDescriptorFactory;
pub use elements::ConstrainedElementBuilder;
pub use manager::BeanMetaDataManager;
