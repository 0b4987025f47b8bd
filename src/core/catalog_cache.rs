//! Read-through cache for the ingredient and recipe catalogs.
//!
//! Listing pages, autocomplete and the cost calculator all read the full
//! ingredient catalog, so it is loaded once and served from memory until its
//! time-to-live runs out. The refresh interval is [`CatalogCache::ttl`]
//! (five minutes unless configured otherwise).
//!
//! Every write path that changes ingredients or recipes calls
//! [`CatalogCache::invalidate`] right after committing, so a session always reads
//! its own writes. Writes made by other processes become visible at the latest
//! one TTL later.

use crate::{
    entities::{Ingredient, Recipe, ingredient, recipe},
    errors::Result,
};
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, trace};

struct Snapshot<T> {
    loaded_at: Instant,
    items: Arc<Vec<T>>,
}

type Slot<T> = RwLock<Option<Snapshot<T>>>;

/// Time-boxed snapshots of all ingredients and all recipes.
pub struct CatalogCache {
    ttl: Duration,
    ingredients: Slot<ingredient::Model>,
    recipes: Slot<recipe::Model>,
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl CatalogCache {
    /// Creates an empty cache whose snapshots stay fresh for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            ingredients: RwLock::new(None),
            recipes: RwLock::new(None),
        }
    }

    /// The refresh interval.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// All ingredients ordered by name, reloaded when the snapshot is stale.
    pub async fn ingredients<C>(&self, db: &C) -> Result<Arc<Vec<ingredient::Model>>>
    where
        C: ConnectionTrait,
    {
        read_through(&self.ingredients, self.ttl, "ingredients", || async {
            Ingredient::find()
                .order_by_asc(ingredient::Column::Name)
                .all(db)
                .await
        })
        .await
    }

    /// One ingredient from the cached catalog, `None` if it does not exist.
    pub async fn ingredient<C>(&self, db: &C, ingredient_id: i64) -> Result<Option<ingredient::Model>>
    where
        C: ConnectionTrait,
    {
        let ingredients = self.ingredients(db).await?;
        Ok(ingredients.iter().find(|i| i.id == ingredient_id).cloned())
    }

    /// All recipes ordered by name, reloaded when the snapshot is stale.
    pub async fn recipes<C>(&self, db: &C) -> Result<Arc<Vec<recipe::Model>>>
    where
        C: ConnectionTrait,
    {
        read_through(&self.recipes, self.ttl, "recipes", || async {
            Recipe::find().order_by_asc(recipe::Column::Name).all(db).await
        })
        .await
    }

    /// Drops both snapshots so the next read goes to the database.
    pub async fn invalidate(&self) {
        *self.ingredients.write().await = None;
        *self.recipes.write().await = None;
        debug!("Catalog cache invalidated.");
    }
}

async fn read_through<T, F, Fut>(
    slot: &Slot<T>,
    ttl: Duration,
    label: &str,
    load: F,
) -> Result<Arc<Vec<T>>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<Vec<T>, sea_orm::DbErr>>,
{
    {
        let guard = slot.read().await;
        if let Some(snapshot) = guard.as_ref() {
            if snapshot.loaded_at.elapsed() < ttl {
                trace!("Serving {label} from cache ({} items).", snapshot.items.len());
                return Ok(Arc::clone(&snapshot.items));
            }
        }
    }

    let mut guard = slot.write().await;
    // Another reader may have refreshed while we waited for the write lock
    if let Some(snapshot) = guard.as_ref() {
        if snapshot.loaded_at.elapsed() < ttl {
            return Ok(Arc::clone(&snapshot.items));
        }
    }

    let items = Arc::new(load().await?);
    debug!("Refreshed {label} cache with {} items.", items.len());
    *guard = Some(Snapshot {
        loaded_at: Instant::now(),
        items: Arc::clone(&items),
    });
    Ok(items)
}
