pub mod aggregate;

pub use aggregate::{NewProductDto, Product, ProductId, ProductStatus};
