//! Standard record models for modelcheck.
//!
//! Each model pairs a typed struct with its record spec and custom
//! validators. Derived values (order totals, discounted prices) are computed
//! on demand from the typed structs with exact decimal arithmetic.

pub mod books;
pub mod catalog;
pub mod customers;
pub mod derived;
pub mod model;
pub mod orders;
pub mod params;
pub mod products;
pub mod users;

pub use books::Book;
pub use catalog::ModelCatalog;
pub use customers::{Address, Customer, CustomerStatus};
pub use derived::derived_values;
pub use model::{Model, ModelError};
pub use orders::{Order, OrderItem, OrderSummary};
pub use params::{
    ItemDetails, ItemDetailsQuery, ItemPath, ItemsFilter, ModelName, ModelPath, Pagination,
    RequiredQuery, SquareParams, UserItemPath,
};
pub use products::{Item, Product};
pub use users::{User, UserDraft};
