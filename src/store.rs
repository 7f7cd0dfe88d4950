use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tokio::sync::OnceCell;

use crate::booking::Booking;
use crate::error::Error;
use crate::event::{Event, EventPatch};

const EVENTS: &str = "events";
const BOOKINGS: &str = "bookings";

pub struct Config {
    pub uri: String,
    pub database: String,
}

pub struct Store {
    config: Config,
    handle: OnceCell<Database>,
}

impl Store {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            handle: OnceCell::new(),
        }
    }

    /// Connects on first use. Concurrent callers share a single in-flight
    /// attempt; a failed attempt leaves the cell empty so the next call
    /// retries, a successful one is kept for the process lifetime.
    async fn database(&self) -> Result<&Database, Error> {
        let database = self.handle.get_or_try_init(|| self.connect()).await?;
        Ok(database)
    }

    async fn connect(&self) -> Result<Database, mongodb::error::Error> {
        tracing::info!(database = %self.config.database, "connecting to document store");

        let client = Client::with_uri_str(&self.config.uri).await?;
        let database = client.database(&self.config.database);

        let unique_slug = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        database
            .collection::<Event>(EVENTS)
            .create_index(unique_slug, None)
            .await?;

        let by_event = IndexModel::builder().keys(doc! { "eventId": 1 }).build();
        database
            .collection::<Booking>(BOOKINGS)
            .create_index(by_event, None)
            .await?;

        tracing::info!("document store ready");

        Ok(database)
    }

    /// Establishes the connection eagerly so indexes exist before the first
    /// request. Failure is not fatal, the next store access retries.
    pub async fn warm_up(&self) -> Result<(), Error> {
        self.database().await.map(|_| ())
    }

    async fn events(&self) -> Result<Collection<Event>, Error> {
        Ok(self.database().await?.collection(EVENTS))
    }

    async fn bookings(&self) -> Result<Collection<Booking>, Error> {
        Ok(self.database().await?.collection(BOOKINGS))
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, Error> {
        let options = FindOptions::builder()
            .sort(doc! { "date": 1, "time": 1 })
            .build();

        let cursor = self.events().await?.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn event_by_slug(&self, slug: &str) -> Result<Event, Error> {
        self.events()
            .await?
            .find_one(doc! { "slug": slug }, None)
            .await?
            .ok_or_else(|| Error::NotFound(slug.to_string()))
    }

    pub async fn event_exists(&self, id: &ObjectId) -> Result<bool, Error> {
        let event = self
            .events()
            .await?
            .find_one(doc! { "_id": id }, None)
            .await?;

        Ok(event.is_some())
    }

    pub async fn create_event(&self, mut event: Event) -> Result<Event, Error> {
        let inserted = self
            .events()
            .await?
            .insert_one(&event, None)
            .await
            .map_err(|err| write_error(err, &event.slug))?;

        event.id = inserted.inserted_id.as_object_id();

        tracing::info!(slug = %event.slug, "event created");

        Ok(event)
    }

    pub async fn update_event(&self, slug: &str, patch: EventPatch) -> Result<Event, Error> {
        let mut event = self.event_by_slug(slug).await?;

        if patch.apply(&mut event)? {
            self.events()
                .await?
                .replace_one(doc! { "slug": slug }, &event, None)
                .await
                .map_err(|err| write_error(err, &event.slug))?;

            tracing::info!(slug = %event.slug, "event updated");
        }

        Ok(event)
    }

    /// The existence check resolves before anything is written; a booking
    /// never commits against a missing event.
    pub async fn create_booking(&self, mut booking: Booking) -> Result<Booking, Error> {
        if !self.event_exists(&booking.event_id).await? {
            return Err(Error::DanglingReference(booking.event_id.to_hex()));
        }

        let inserted = self.bookings().await?.insert_one(&booking, None).await?;
        booking.id = inserted.inserted_id.as_object_id();

        tracing::info!(event = %booking.event_id, "seat booked");

        Ok(booking)
    }
}

fn write_error(err: mongodb::error::Error, slug: &str) -> Error {
    if is_duplicate_key(&err) {
        return Error::DuplicateKey(slug.to_string());
    }

    Error::DependencyFailure(err)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == 11000
    )
}
