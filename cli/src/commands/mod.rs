mod category;
mod helpers;
mod import;
mod recipe;
mod suggest;

use anyhow::Result;

use recipebox_core::blob::SqliteBlobStore;
use recipebox_core::store::RecipeStore;

use crate::config::Config;

pub(crate) use category::{cmd_category_add, cmd_category_delete, cmd_category_list};
pub(crate) use import::cmd_import;
pub(crate) use recipe::{
    RecipeFields, cmd_add, cmd_delete, cmd_edit, cmd_fav, cmd_list, cmd_show,
};
pub(crate) use suggest::{cmd_suggest_ingredient, cmd_suggest_measurement, cmd_suggest_method};

pub(crate) type Store = RecipeStore<SqliteBlobStore>;

pub(crate) fn open_store(config: &Config) -> Result<Store> {
    let blobs = SqliteBlobStore::open(&config.db_path)?;
    Ok(RecipeStore::load(blobs))
}
