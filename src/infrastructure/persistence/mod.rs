mod sqlx_driver;

pub use sqlx_driver::SqlxDriver;
