//! Repository factory trait
//!
//! Repositories themselves are defined per entity in [`crate::repositories`];
//! each is an object-safe trait so callers can hold `Arc<dyn ...>` and tests
//! can substitute in-memory doubles.

/// A trait for database repository factories
///
/// This trait defines a factory for creating repository instances.
/// It is generic over the repository type and the configuration type.
pub trait RepositoryFactory<R, C> {
    /// Create a new repository instance from the given configuration.
    fn create_repository(&self, config: C) -> R;
}
