use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lancer_catalog::{ServiceQuery, SortOrder, category_facets, load_listings, search};
use serde_json::json;

use crate::{print_json, read_json};

#[derive(Debug, Parser)]
pub struct ServicesCli {
    #[command(subcommand)]
    pub command: ServicesSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicesSubcommand {
    /// Filter and sort listings from a JSON file.
    Search(SearchArgs),
}

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Listings JSON (array, or wrapped in `services` / `data`).
    #[arg(long = "file", short = 'f')]
    pub file: PathBuf,

    /// Free-text terms; all must match.
    #[arg(long = "text", short = 't')]
    pub text: Option<String>,

    #[arg(long = "category")]
    pub category: Option<String>,

    #[arg(long = "min-price")]
    pub min_price: Option<f64>,

    #[arg(long = "max-price")]
    pub max_price: Option<f64>,

    #[arg(long = "min-rating")]
    pub min_rating: Option<f64>,

    /// relevance, price_asc, price_desc, rating or newest.
    #[arg(long = "sort", default_value = "relevance")]
    pub sort: SortOrder,
}

pub(crate) fn run(cli: &ServicesCli) -> anyhow::Result<()> {
    match &cli.command {
        ServicesSubcommand::Search(args) => {
            let listings = load_listings(&read_json(&args.file)?);
            let query = ServiceQuery {
                text: args.text.clone(),
                category: args.category.clone(),
                min_price: args.min_price,
                max_price: args.max_price,
                min_rating: args.min_rating,
                sort: args.sort,
            };
            let results = search(&listings, &query);
            print_json(&json!({
                "total": listings.len(),
                "matched": results.len(),
                "sort": args.sort,
                "facets": category_facets(&listings),
                "results": results,
            }))
        }
    }
}
