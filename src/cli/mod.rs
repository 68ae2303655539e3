use std::{io, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;
use valise::{
    catalog::ProductResponse,
    config::{LoggingConfig, StoreConfig},
    fixtures::Scenario,
    items::NewLineItem,
    prices::NumericInput,
    repository::encode,
    storage::FileStorage,
    store::CartStore,
    summary::write_cart,
};

pub(crate) mod logging;

#[derive(Debug, Parser)]
#[command(name = "valise", about = "Valise cart CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add units of a variant to the cart
    Add(AddArgs),

    /// Add a variant picked from a product detail response
    AddFromCatalog(AddFromCatalogArgs),

    /// Remove a variant's line from the cart
    Remove(RemoveArgs),

    /// Empty the cart
    Clear,

    /// Print the cart
    Show(ShowArgs),

    /// Dispatch the commands of a scenario file against the cart
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Variant identifier
    #[arg(long)]
    variant_id: String,

    /// Parent product identifier
    #[arg(long)]
    product_id: String,

    /// Product title
    #[arg(long, default_value = "")]
    product_title: String,

    /// Variant title
    #[arg(long, default_value = "")]
    variant_title: String,

    /// Unit price
    #[arg(long)]
    price: String,

    /// Units to add
    #[arg(long, default_value = "1")]
    quantity: String,
}

#[derive(Debug, Args)]
struct AddFromCatalogArgs {
    /// Product detail JSON, as returned by the product API
    #[arg(long)]
    product: PathBuf,

    /// Size option
    #[arg(long)]
    size: Option<String>,

    /// Colour option
    #[arg(long)]
    color: Option<String>,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Variant identifier
    variant_id: String,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Print the persisted JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ReplayArgs {
    /// Scenario YAML file
    path: PathBuf,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        let currency = self.store.currency().map_err(|error| error.to_string())?;
        let options = self
            .store
            .store_options()
            .map_err(|error| error.to_string())?;

        let mut store = CartStore::open(FileStorage::new(&self.store.storage_dir), options);

        match self.command {
            Commands::Add(args) => {
                let item = NewLineItem::new(
                    args.variant_id,
                    args.product_id,
                    NumericInput::from(args.price),
                    NumericInput::from(args.quantity),
                )
                .titled(args.product_title, args.variant_title);

                store
                    .add_to_cart(item)
                    .map_err(|error| format!("failed to save cart: {error}"))?;
            }
            Commands::AddFromCatalog(args) => {
                let item = catalog_line_item(&args)?;

                store
                    .add_to_cart(item)
                    .map_err(|error| format!("failed to save cart: {error}"))?;
            }
            Commands::Remove(args) => {
                let change = store
                    .remove_from_cart(&args.variant_id)
                    .map_err(|error| format!("failed to save cart: {error}"))?;

                if !change.is_changed() {
                    info!(variant_id = %args.variant_id, "variant not in cart");
                }
            }
            Commands::Clear => {
                store
                    .clear_cart()
                    .map_err(|error| format!("failed to save cart: {error}"))?;
            }
            Commands::Show(ShowArgs { json: true }) => {
                let encoded = encode(store.cart()).map_err(|error| error.to_string())?;

                print_line(&encoded);

                return Ok(());
            }
            Commands::Show(ShowArgs { json: false }) => {}
            Commands::Replay(args) => {
                let scenario = Scenario::from_file(&args.path).map_err(|error| error.to_string())?;

                info!(scenario = %scenario.name, commands = scenario.commands.len(), "replaying");

                for command in scenario.commands {
                    store
                        .dispatch(command)
                        .map_err(|error| format!("failed to save cart: {error}"))?;
                }
            }
        }

        write_cart(io::stdout().lock(), store.cart(), currency).map_err(|error| error.to_string())
    }
}

fn catalog_line_item(args: &AddFromCatalogArgs) -> Result<NewLineItem, String> {
    let raw = std::fs::read_to_string(&args.product)
        .map_err(|error| format!("failed to read {}: {error}", args.product.display()))?;

    let product = serde_json::from_str::<ProductResponse>(&raw)
        .map_err(|error| format!("failed to parse product: {error}"))?
        .product;

    let (default_size, default_color) = product.default_selection().unwrap_or((None, None));

    let size = args.size.as_deref().or(default_size).unwrap_or_default();
    let color = args.color.as_deref().or(default_color).unwrap_or_default();

    let variant = product
        .select_variant(size, color)
        .ok_or_else(|| format!("no variant of {} with options {size} / {color}", product.title))?;

    Ok(product.line_item(variant, args.quantity))
}

#[expect(clippy::print_stdout, reason = "the CLI prints the cart document.")]
fn print_line(line: &str) {
    println!("{line}");
}
