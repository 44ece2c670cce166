mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::commands::{
    RecipeFields, cmd_add, cmd_category_add, cmd_category_delete, cmd_category_list, cmd_delete,
    cmd_edit, cmd_fav, cmd_import, cmd_list, cmd_show, cmd_suggest_ingredient,
    cmd_suggest_measurement, cmd_suggest_method, open_store,
};
use crate::config::Config;
use recipebox_core::query::RecipeQuery;

#[derive(Parser)]
#[command(
    name = "recipebox",
    version,
    about = "A personal recipe box for the terminal"
)]
struct Cli {
    /// Log filter (e.g. warn, debug, recipebox_core=trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new recipe
    Add {
        /// Recipe title
        title: String,
        #[command(flatten)]
        fields: RecipeFields,
        /// Mark as a favorite
        #[arg(long)]
        favorite: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing recipe
    Edit {
        /// Recipe id or unique id prefix
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: RecipeFields,
        /// Drop existing ingredients before adding the given ones
        #[arg(long)]
        clear_ingredients: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe in full
    Show {
        /// Recipe id or unique id prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recipe
    Delete {
        /// Recipe id or unique id prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle the favorite flag on a recipe
    Fav {
        /// Recipe id or unique id prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recipes, optionally filtered
    List {
        /// Only recipes in this category ("All" for every category)
        #[arg(short, long, default_value = "All")]
        category: String,
        /// Case-insensitive text to match against title and description
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only favorites
        #[arg(short, long)]
        favorites: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Autocomplete helpers for ingredient rows
    Suggest {
        #[command(subcommand)]
        command: SuggestCommands,
    },
    /// Import a recipe from a Cooklang (.cook) file
    Import {
        /// Path to .cook file
        file: PathBuf,
        /// Override the recipe title
        #[arg(long)]
        title: Option<String>,
        /// Category to file it under (default: Dinner)
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories with recipe counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a custom category
    Add {
        /// Category name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a custom category (recipes keep their tag)
    Delete {
        /// Category name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SuggestCommands {
    /// Common ingredients containing the text
    Ingredient {
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Common measurements containing the text
    Measurement {
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// All cook methods
    Method {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run_suggest(command: SuggestCommands) -> Result<()> {
    match command {
        SuggestCommands::Ingredient { query, json } => cmd_suggest_ingredient(&query, json),
        SuggestCommands::Measurement { query, json } => cmd_suggest_measurement(&query, json),
        SuggestCommands::Method { json } => cmd_suggest_method(json),
    }
}

fn run(cli: Cli) -> Result<()> {
    // Suggestions only read the built-in catalog
    let command = match cli.command {
        Commands::Suggest { command } => return run_suggest(command),
        other => other,
    };

    let config = Config::load()?;
    let mut store = open_store(&config)?;

    match command {
        Commands::Add {
            title,
            fields,
            favorite,
            json,
        } => cmd_add(&mut store, &title, fields, favorite, json),
        Commands::Edit {
            id,
            title,
            fields,
            clear_ingredients,
            json,
        } => cmd_edit(&mut store, &id, title, fields, clear_ingredients, json),
        Commands::Show { id, json } => cmd_show(&store, &id, json),
        Commands::Delete { id, json } => cmd_delete(&mut store, &id, json),
        Commands::Fav { id, json } => cmd_fav(&mut store, &id, json),
        Commands::List {
            category,
            search,
            favorites,
            json,
        } => {
            let query = RecipeQuery::default()
                .category(&category)
                .search(&search)
                .favorites_only(favorites);
            cmd_list(&store, &query, json)
        }
        Commands::Category { command } => match command {
            CategoryCommands::List { json } => cmd_category_list(&store, json),
            CategoryCommands::Add { name, json } => cmd_category_add(&mut store, &name, json),
            CategoryCommands::Delete { name, json } => {
                cmd_category_delete(&mut store, &name, json)
            }
        },
        Commands::Import {
            file,
            title,
            category,
            json,
        } => cmd_import(&mut store, &file, title, category, json),
        Commands::Suggest { command } => run_suggest(command),
    }
}
