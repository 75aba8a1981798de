//! Collection management core: view state machine, pure projection, and
//! mutation coordination.

pub mod mutation;
pub mod projector;
pub mod view;

pub use mutation::MutationCoordinator;
pub use projector::project;
pub use view::{CollectionSnapshot, CollectionView, PagingMode};
