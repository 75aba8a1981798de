//! Data models for the tally-link client library.

pub mod entity;
pub mod login;
pub mod page;
pub mod params;
pub mod records;
pub mod status;

pub use entity::{CollectionItem, EntityId};
pub use login::{LoginRequest, LoginResponse, SessionUser};
pub use page::{total_pages, ListResult, PageInfo};
pub use params::{
    ListQuery, SortDirection, ViewParams, ViewParamsPatch, DEFAULT_PAGE_SIZE,
};
pub use records::{
    Cashier, CashierDraft, Payment, PaymentDraft, Price, PriceDraft, Product, ProductDraft, Sale,
    SaleDraft, User, UserDraft,
};
pub use status::{FetchPhase, MutationKind, MutationRecord};
