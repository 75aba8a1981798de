//! Typed client library for the Tally admin console REST API.
//!
//! The console's management screens all follow the same data flow: fetch a
//! paginated, filterable collection; hold it as local view state; derive the
//! visible slice; and reconcile after create/update/delete round-trips. This
//! crate packages that flow in four layers:
//!
//! - [`TallyLinkClient`] — HTTP entry point: login plus typed per-resource
//!   [`RestCollection`] handles with envelope normalization and a single
//!   refresh-and-retry after a 401.
//! - [`CollectionView`] — the state machine owning the canonical collection,
//!   view parameters, and fetch status, with a sequence-number staleness
//!   guard so a slow early request never overwrites a newer one.
//! - [`project`] — pure derivation of the visible slice (search, stable
//!   sort, page slice).
//! - [`MutationCoordinator`] — create/update/delete with per-identifier
//!   in-flight guarding and refresh-after-mutation reconciliation.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tally_link::{
//!     CollectionView, MutationCoordinator, TallyLinkClient,
//!     models::{Product, ProductDraft},
//!     notify::LogNotifier,
//! };
//!
//! # async fn example() -> tally_link::Result<()> {
//! let client = TallyLinkClient::builder()
//!     .base_url("http://localhost:3000/api")
//!     .bearer_token("eyJhbGc...")
//!     .build()?;
//!
//! let products = Arc::new(client.collection::<Product>());
//! let view = Arc::new(CollectionView::new(products.clone()));
//! view.reload().await?;
//!
//! let mutations = MutationCoordinator::new(products, view.clone(), Arc::new(LogNotifier));
//! mutations
//!     .create(ProductDraft {
//!         name: "USB cable".into(),
//!         sku: None,
//!         category: None,
//!         price: 4.5,
//!         stock: 20,
//!         active: true,
//!     })
//!     .await?;
//!
//! for product in view.visible().await {
//!     println!("{} — {}", product.name, product.price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod collection;
pub mod error;
pub mod models;
pub mod normalize;
pub mod notify;
pub mod resource;
pub mod session;
pub mod timeouts;

pub use auth::{ArcTokenSource, AuthProvider, ResolvedAuth, TokenSource};
pub use client::{TallyLinkClient, TallyLinkClientBuilder};
pub use collection::{CollectionSnapshot, CollectionView, MutationCoordinator, PagingMode};
pub use collection::projector::project;
pub use error::{FieldError, Result, TallyLinkError};
pub use models::{
    CollectionItem, EntityId, FetchPhase, ListQuery, ListResult, MutationKind, MutationRecord,
    SortDirection, ViewParams, ViewParamsPatch,
};
pub use notify::{ArcNotifier, LogNotifier, Notifier, NullNotifier};
pub use resource::{RemoteCollection, RestCollection};
pub use session::{MemorySessionStore, Session, SessionStore, SessionTokenSource};
pub use timeouts::TallyLinkTimeouts;
