pub mod u501_export_to_marketplaces;
