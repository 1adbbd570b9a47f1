//! `rightsflow-products` — the Product aggregate and its value objects.

pub mod product;
pub mod values;

pub use product::{
    DescriptionUpdated, PriceUpdated, Product, ProductCreated, ProductEvent, ProductObsoleted,
    ProductPublished, ProductStatus, WorkerAssigned, WorkerUnassigned,
};
pub use values::{Currency, Description, Price, ProductName};
