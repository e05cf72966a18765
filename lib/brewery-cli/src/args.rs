use anyhow::{Context, Result, bail};
use brewery_client::BeerQuery;
use brewery_client::model::{Beer, BeerStyle};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

pub const USAGE: &str = "\
Usage: brewery <COMMAND> [OPTIONS]

Commands:
  list   [--name N] [--style S] [--inventory] [--page P] [--size S]
  get    <ID>
  create --name N --style S --upc U --price P --quantity Q
  update <ID> [--name N] [--style S] [--upc U] [--price P] [--quantity Q]
  delete <ID>

The API is configured with BREWERY_* environment variables (BREWERY_ROOT_URL is required).
";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(BeerQuery),
    Get(Uuid),
    Create(Beer),
    Update(Uuid, BeerChanges),
    Delete(Uuid),
    Help,
}

/// Fields to change on an existing beer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeerChanges {
    pub name: Option<String>,
    pub style: Option<BeerStyle>,
    pub upc: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}

impl BeerChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, beer: &mut Beer) {
        if let Some(name) = self.name {
            beer.beer_name = name;
        }
        if let Some(style) = self.style {
            beer.beer_style = style;
        }
        if let Some(upc) = self.upc {
            beer.upc = upc;
        }
        if let Some(price) = self.price {
            beer.price = price;
        }
        if let Some(quantity) = self.quantity {
            beer.quantity_on_hand = Some(quantity);
        }
    }
}

impl Command {
    pub fn parse(mut pargs: pico_args::Arguments) -> Result<Self> {
        if pargs.contains(["-h", "--help"]) {
            return Ok(Self::Help);
        }

        let subcommand = pargs.subcommand().context("parsing subcommand")?;
        let command = match subcommand.as_deref() {
            Some("list") => Self::List(parse_query(&mut pargs)?),
            Some("get") => Self::Get(parse_id(&mut pargs)?),
            Some("create") => Self::Create(parse_beer(&mut pargs)?),
            Some("update") => {
                let id = parse_id(&mut pargs)?;
                let changes = parse_changes(&mut pargs)?;
                if changes.is_empty() {
                    bail!("nothing to update, provide at least one of --name, --style, --upc, --price, --quantity");
                }
                Self::Update(id, changes)
            }
            Some("delete") => Self::Delete(parse_id(&mut pargs)?),
            Some(other) => bail!("unknown command '{other}'\n\n{USAGE}"),
            None => Self::Help,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(command)
    }
}

fn parse_id(pargs: &mut pico_args::Arguments) -> Result<Uuid> {
    pargs.free_from_str().context("parsing beer id")
}

fn parse_query(pargs: &mut pico_args::Arguments) -> Result<BeerQuery> {
    let mut query = BeerQuery::new();
    if let Some(name) = pargs
        .opt_value_from_str::<_, String>("--name")
        .context("parsing name argument")?
    {
        query = query.with_beer_name(name);
    }
    if let Some(style) = pargs
        .opt_value_from_str("--style")
        .context("parsing style argument")?
    {
        query = query.with_beer_style(style);
    }
    if pargs.contains("--inventory") {
        query = query.with_show_inventory(true);
    }
    if let Some(page) = pargs
        .opt_value_from_str("--page")
        .context("parsing page argument")?
    {
        query = query.with_page_number(page);
    }
    if let Some(size) = pargs
        .opt_value_from_str("--size")
        .context("parsing size argument")?
    {
        query = query.with_page_size(size);
    }
    Ok(query)
}

fn parse_changes(pargs: &mut pico_args::Arguments) -> Result<BeerChanges> {
    Ok(BeerChanges {
        name: pargs
            .opt_value_from_str("--name")
            .context("parsing name argument")?,
        style: pargs
            .opt_value_from_str("--style")
            .context("parsing style argument")?,
        upc: pargs
            .opt_value_from_str("--upc")
            .context("parsing upc argument")?,
        price: pargs
            .opt_value_from_str("--price")
            .context("parsing price argument")?,
        quantity: pargs
            .opt_value_from_str("--quantity")
            .context("parsing quantity argument")?,
    })
}

fn parse_beer(pargs: &mut pico_args::Arguments) -> Result<Beer> {
    let name: String = pargs
        .value_from_str("--name")
        .context("parsing name argument")?;
    let style: BeerStyle = pargs
        .value_from_str("--style")
        .context("parsing style argument")?;
    let upc: String = pargs
        .value_from_str("--upc")
        .context("parsing upc argument")?;
    let price: Decimal = pargs
        .value_from_str("--price")
        .context("parsing price argument")?;
    let quantity: i32 = pargs
        .value_from_str("--quantity")
        .context("parsing quantity argument")?;

    Ok(Beer::new(name, style, upc, price, quantity))
}
