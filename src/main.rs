use prorest::{ExchangeConfig, ProBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Reads PRO_API_KEY, PRO_SECRET_KEY and PRO_PASSPHRASE (and a .env file if present)
    #[cfg(feature = "env-file")]
    let config = ExchangeConfig::from_env_file("PRO")?;
    #[cfg(not(feature = "env-file"))]
    let config = ExchangeConfig::from_env("PRO")?;

    // Sandbox unless PRO_BASE_URL says otherwise
    let client = ProBuilder::new()
        .with_config(config)
        .with_sandbox(true)
        .build()?;

    let time = client.get_server_time().await?;
    println!("Server time: {} ({})", time.iso, time.epoch);

    println!("Fetching products...");
    match client.list_products().await {
        Ok(products) => {
            println!("Found {} products", products.len());
            for product in products.iter().take(5) {
                println!(
                    "Product: {} ({}->{}), Status: {}",
                    product.id, product.base_currency, product.quote_currency, product.status
                );
            }
        }
        Err(e) => {
            println!("Error fetching products: {}", e);
        }
    }

    println!("Fetching accounts...");
    match client.list_accounts().await {
        Ok(accounts) => {
            for account in &accounts {
                println!(
                    "{}: balance {}, available {}, hold {}",
                    account.currency, account.balance, account.available, account.hold
                );
            }
        }
        Err(e) => {
            println!("Error fetching accounts: {}", e);
        }
    }

    Ok(())
}
