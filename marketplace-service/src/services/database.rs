use crate::models::{Listing, LISTING_COLLECTION};
use crate::services::filter::ListingFilter;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

/// Handle to the marketplace database.
///
/// Cloning is cheap; the driver pools connections internally.
#[derive(Clone)]
pub struct MarketplaceDb {
    client: MongoClient,
    db: Database,
}

impl MarketplaceDb {
    /// Create a client for `uri` and select `database`.
    ///
    /// The driver connects lazily, so this only fails on an invalid URI.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for marketplace-service");

        let listings = self.listings();

        let recency_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        listings
            .create_index(recency_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_at index on listing collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on listing.created_at");

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("category_recency".to_string())
                    .build(),
            )
            .build();

        listings
            .create_index(category_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create category index on listing collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on listing.(category, created_at)");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub async fn insert_listing(&self, listing: &Listing) -> Result<(), AppError> {
        self.listings()
            .insert_one(listing, None)
            .await
            .map_err(|e| {
                tracing::error!(listing_id = %listing.id, "Failed to insert listing: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Newest listings matching `filter`, at most `limit` of them.
    pub async fn find_listings(
        &self,
        filter: &ListingFilter,
        limit: i64,
    ) -> Result<Vec<Listing>, AppError> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .build();

        let mut cursor = self
            .listing_documents()
            .find(filter.to_document(), find_options)
            .await
            .map_err(AppError::from)?;

        let mut listings = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(AppError::from)? {
            if let Some(listing) = decode_listing(document) {
                listings.push(listing);
            }
        }
        Ok(listings)
    }

    pub async fn find_listing(&self, id: ObjectId) -> Result<Option<Listing>, AppError> {
        let document = self
            .listing_documents()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)?;

        match document {
            None => Ok(None),
            Some(document) => bson::from_document(document).map(Some).map_err(|e| {
                tracing::error!(listing_id = %id, "Stored listing has an unreadable shape: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Angebot konnte nicht gelesen werden"))
            }),
        }
    }

    pub async fn collection_names(&self) -> Result<Vec<String>, AppError> {
        self.db
            .list_collection_names(None)
            .await
            .map_err(AppError::from)
    }

    pub fn listings(&self) -> Collection<Listing> {
        self.db.collection(LISTING_COLLECTION)
    }

    /// The listing collection without a fixed document shape.
    ///
    /// Reads go through this handle; the collection is also edited by
    /// external tools, so a single malformed document must not fail a query.
    pub fn listing_documents(&self) -> Collection<Document> {
        self.db.collection(LISTING_COLLECTION)
    }

    pub fn name(&self) -> &str {
        self.db.name()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Decode one stored document, skipping it when it does not fit `Listing`.
fn decode_listing(document: Document) -> Option<Listing> {
    let id = document.get_object_id("_id").ok();
    match bson::from_document(document) {
        Ok(listing) => Some(listing),
        Err(e) => {
            tracing::warn!(listing_id = ?id, "Skipping unreadable listing document: {}", e);
            None
        }
    }
}
