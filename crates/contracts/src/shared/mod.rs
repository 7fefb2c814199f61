pub mod product_analysis;
