//! # `shelf` Command Line
//!
//! Thin front end over the back office commands. Every subcommand prints
//! its result as JSON on stdout; failures print an [`ApiError`] as JSON on
//! stderr and exit non-zero.
//!
//! ```text
//! shelf --username ana --password s3cret sell 12 3
//!   │
//!   ├── AppConfig::load() + --db override
//!   ├── AppState::open()      (migrate, bootstrap admin)
//!   ├── login()               → Session
//!   └── register_sale(&state, &session, 12, 3)
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use shelf_backoffice::commands::{self, ProductInput};
use shelf_backoffice::seed::{seed_catalog, DEFAULT_SEED_COUNT};
use shelf_backoffice::{init_tracing, ApiError, AppConfig, AppState, ErrorCode};
use shelf_core::catalog::{BRANDS, STYLES, TYPES};
use shelf_core::{Money, NewUser, ProductFields, Role, Session, UserProfile};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf back office: catalog, sales and reports")]
#[command(version)]
struct Cli {
    /// SQLite database file (overrides SHELF_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Account to act as
    #[arg(long, global = true, env = "SHELF_USER")]
    username: Option<String>,

    /// Password for --username
    #[arg(long, global = true, env = "SHELF_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Products {
        /// Only products with stock on hand
        #[arg(long)]
        in_stock: bool,
    },

    /// Show one product
    Product { id: i64 },

    /// Search by name or brand (case-insensitive)
    Search { query: String },

    /// Create a product, or replace one wholesale with --id
    AddProduct {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        brand: String,
        #[arg(long, default_value = "")]
        style: String,
        #[arg(long = "type", default_value = "")]
        product_type: String,
        /// Unit price, e.g. 15.00
        #[arg(long)]
        price: String,
        #[arg(long, default_value_t = 0)]
        quantity: i64,
        /// Expiration date, free text
        #[arg(long)]
        expires: Option<String>,
        /// Replace this product id
        #[arg(long)]
        id: Option<i64>,
        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Change some fields of a product; the rest are kept
    UpdateProduct {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        style: Option<String>,
        #[arg(long = "type")]
        product_type: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        expires: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Remove a product (no-op if it does not exist)
    DeleteProduct { id: i64 },

    /// Register a sale
    Sell { product_id: i64, quantity: i64 },

    /// Stock, revenue and recent sales
    Report,

    /// Every sale with product and seller names
    Sales,

    /// Create an account
    AddUser {
        /// Login name of the new account
        login: String,
        #[arg(long, default_value = "client")]
        role: Role,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// List accounts
    Users,

    /// Fill an empty catalog with demo products
    Seed {
        #[arg(long, default_value_t = DEFAULT_SEED_COUNT)]
        count: usize,
    },

    /// Suggested brands, styles and types
    Categories,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let body = serde_json::to_string_pretty(&e).unwrap_or_else(|_| e.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ApiError> {
    if let Commands::Categories = cli.command {
        return print_json(&serde_json::json!({
            "brands": BRANDS,
            "styles": STYLES,
            "types": TYPES,
        }));
    }

    let mut config = AppConfig::load()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    info!(db_path = %config.db_path.display(), "Opening store");

    let state = AppState::open(config).await?;
    let session = open_session(&state, cli.username.as_deref(), cli.password.as_deref()).await?;

    let result = dispatch(&state, &session, cli.command).await;
    state.db().close().await;
    result
}

async fn open_session(
    state: &AppState,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<Session, ApiError> {
    match (username, password) {
        (Some(username), Some(password)) => commands::login(state, username, password).await,
        _ => Err(ApiError::new(
            ErrorCode::Unauthorized,
            "Credentials required: --username/--password or SHELF_USER/SHELF_PASSWORD",
        )),
    }
}

async fn dispatch(state: &AppState, session: &Session, command: Commands) -> Result<(), ApiError> {
    match command {
        Commands::Products { in_stock } => {
            let products = if in_stock {
                commands::list_products_in_stock(state, session).await?
            } else {
                commands::list_products(state, session).await?
            };
            print_json(&products)
        }

        Commands::Product { id } => {
            let product = commands::get_product(state, session, id).await?;
            print_json(&commands::ProductDto::from(product))
        }

        Commands::Search { query } => {
            print_json(&commands::search_products(state, session, &query).await?)
        }

        Commands::AddProduct {
            name,
            brand,
            style,
            product_type,
            price,
            quantity,
            expires,
            id,
            image,
        } => {
            let input = ProductInput {
                id,
                fields: ProductFields {
                    name,
                    brand,
                    style,
                    product_type,
                    price_cents: parse_price(&price)?,
                    quantity,
                    expiration_date: expires,
                },
                image: read_image(image.as_ref())?,
            };
            let product = commands::upsert_product(state, session, input).await?;
            print_json(&commands::ProductDto::from(product))
        }

        Commands::UpdateProduct {
            id,
            name,
            brand,
            style,
            product_type,
            price,
            quantity,
            expires,
            image,
        } => {
            let current = commands::get_product(state, session, id).await?;
            let fields = ProductFields {
                name: name.unwrap_or(current.name),
                brand: brand.unwrap_or(current.brand),
                style: style.unwrap_or(current.style),
                product_type: product_type.unwrap_or(current.product_type),
                price_cents: match price {
                    Some(price) => parse_price(&price)?,
                    None => current.price_cents,
                },
                quantity: quantity.unwrap_or(current.quantity),
                expiration_date: expires.or(current.expiration_date),
            };
            let image = read_image(image.as_ref())?;
            let product = commands::update_product(state, session, id, fields, image).await?;
            print_json(&commands::ProductDto::from(product))
        }

        Commands::DeleteProduct { id } => {
            let removed = commands::delete_product(state, session, id).await?;
            print_json(&serde_json::json!({ "id": id, "removed": removed }))
        }

        Commands::Sell {
            product_id,
            quantity,
        } => print_json(&commands::register_sale(state, session, product_id, quantity).await?),

        Commands::Report => {
            let report = commands::get_aggregate_report(state, session).await?;
            print_json(&serde_json::json!({
                "store": state.config().store_name,
                "report": report,
            }))
        }

        Commands::Sales => print_json(&commands::get_sales_report(state, session).await?),

        Commands::AddUser {
            login,
            role,
            name,
            new_password,
            email,
            phone,
        } => {
            let new_user = NewUser {
                username: login,
                password: new_password,
                role,
                name,
                profile: UserProfile {
                    email,
                    phone,
                    ..UserProfile::default()
                },
            };
            print_json(&commands::create_user(state, session, new_user).await?)
        }

        Commands::Users => print_json(&commands::list_users(state, session).await?),

        Commands::Seed { count } => print_json(&seed_catalog(state, session, count).await?),

        Commands::Categories => Ok(()),
    }
}

fn parse_price(raw: &str) -> Result<i64, ApiError> {
    Money::parse_decimal(raw)
        .map(|m| m.cents())
        .map_err(|e| ApiError::validation(e.to_string()))
}

fn read_image(path: Option<&PathBuf>) -> Result<Option<Vec<u8>>, ApiError> {
    path.map(|p| {
        std::fs::read(p)
            .map_err(|e| ApiError::validation(format!("Cannot read image {}: {}", p.display(), e)))
    })
    .transpose()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Cannot serialize output: {}", e)))?;
    println!("{}", body);
    Ok(())
}
