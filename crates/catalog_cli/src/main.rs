//! Catalog smoke executable.
//!
//! Wires `CatalogConfig` from `CATALOG_*` variables into logging, the store
//! and the product service, then saves and reads back one sample product.

use catalog_core::{
    CatalogConfig, ProductDto, ProductRepository, ProductService, SqliteProductDao,
    SqliteProductRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CatalogConfig::from_env();
    let logging_enabled = config.init_logging()?;

    println!("catalog_core ping={}", catalog_core::ping());
    println!("catalog_core version={}", catalog_core::core_version());
    println!("logging enabled={logging_enabled}");

    let conn = config.open_db()?;
    let service = ProductService::new(SqliteProductDao::try_new(&conn)?);
    let saved = service.save_product(&ProductDto::new("펜", 1000, 100))?;
    info!("event=cli_smoke module=cli status=ok number={}", saved.number);

    let fetched = service.get_product(saved.number)?;
    println!(
        "product number={} price={} stock={}",
        fetched.number, fetched.price, fetched.stock
    );

    let repo = SqliteProductRepository::try_new(&conn)?;
    println!("products named={}", repo.find_by_name(&fetched.name)?.len());
    Ok(())
}
