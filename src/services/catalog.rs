use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::core::{BookableProduct, BookingError, ProductCatalog};
use crate::models::{DurationUnit, PostId, QueryArgs};

/// Errors that can occur while loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid catalog file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Duplicate post id in catalog: {0}")]
    DuplicateId(PostId),
}

/// WooCommerce-style product types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    Simple,
    Variable,
    Booking,
    AccommodationBooking,
}

/// Duration unit as configured on a booking product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfiguredUnit {
    #[default]
    Day,
    Hour,
}

/// Existing booking occupying one slot of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedRange {
    pub start: NaiveDate,
    /// Last booked day, inclusive
    pub end: NaiveDate,
    #[serde(default = "default_one")]
    pub persons: u32,
    /// `HH:MM` slot for hour-based products
    #[serde(default)]
    pub time: Option<String>,
}

/// A post as stored in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPost {
    pub id: PostId,
    pub post_type: String,
    #[serde(default)]
    pub product: Option<ProductRecord>,
}

/// Booking configuration of a product post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_type: ProductType,
    #[serde(default)]
    pub duration_unit: ConfiguredUnit,
    #[serde(default = "default_one")]
    pub min_persons: u32,
    #[serde(default)]
    pub max_persons: Option<u32>,
    #[serde(default = "default_one")]
    pub min_duration: u32,
    #[serde(default)]
    pub max_duration: Option<u32>,
    /// Concurrent bookings allowed per slot, or persons when
    /// `persons_as_bookings` is set
    #[serde(default = "default_one")]
    pub capacity: u32,
    /// Each person takes one place of `capacity` instead of each booking
    #[serde(default)]
    pub persons_as_bookings: bool,
    #[serde(default)]
    pub bookings: Vec<BookedRange>,
}

fn default_one() -> u32 { 1 }

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    posts: Vec<CatalogPost>,
}

impl ProductRecord {
    /// Requested span as `[first, last]` days, inclusive
    fn requested_span(&self, start: NaiveDate, duration: u32) -> Option<(NaiveDate, NaiveDate)> {
        match self.duration_unit() {
            DurationUnit::Hour => Some((start, start)),
            DurationUnit::Day | DurationUnit::Night => {
                let days = i64::from(duration.max(1)) - 1;
                let last = start.checked_add_signed(Duration::try_days(days)?)?;
                Some((start, last))
            }
        }
    }

    fn overlaps(&self, booking: &BookedRange, first: NaiveDate, last: NaiveDate, time: Option<&str>) -> bool {
        if booking.start > last || booking.end < first {
            return false;
        }
        match (self.duration_unit(), time, booking.time.as_deref()) {
            (DurationUnit::Hour, Some(wanted), Some(taken)) => wanted == taken,
            _ => true,
        }
    }
}

impl BookableProduct for ProductRecord {
    fn duration_unit(&self) -> DurationUnit {
        match (self.product_type, self.duration_unit) {
            (ProductType::AccommodationBooking, _) => DurationUnit::Night,
            (_, ConfiguredUnit::Hour) => DurationUnit::Hour,
            (_, ConfiguredUnit::Day) => DurationUnit::Day,
        }
    }

    fn is_booking_type(&self) -> bool {
        matches!(
            self.product_type,
            ProductType::Booking | ProductType::AccommodationBooking
        )
    }

    fn is_bookable(&self, args: &QueryArgs) -> Result<bool, BookingError> {
        if args.persons < self.min_persons {
            return Err(BookingError::TooFewPersons { min: self.min_persons });
        }
        if let Some(max) = self.max_persons {
            if args.persons > max {
                return Err(BookingError::TooManyPersons { max });
            }
        }
        if args.duration < self.min_duration {
            return Err(BookingError::DurationTooShort { min: self.min_duration });
        }
        if let Some(max) = self.max_duration {
            if args.duration > max {
                return Err(BookingError::DurationTooLong { max });
            }
        }

        let start = args.start_date().ok_or_else(|| {
            BookingError::InvalidDate(format!(
                "{}-{}-{}",
                args.start_date_year, args.start_date_month, args.start_date_day
            ))
        })?;
        let (first, last) = self
            .requested_span(start, args.duration)
            .ok_or_else(|| BookingError::InvalidDate(format!("{} + {} days", start, args.duration)))?;

        let places = |persons: u32| if self.persons_as_bookings { persons } else { 1 };
        let taken: u32 = self
            .bookings
            .iter()
            .filter(|b| self.overlaps(b, first, last, args.start_date_time.as_deref()))
            .map(|b| places(b.persons))
            .fold(0, u32::saturating_add);

        Ok(taken.saturating_add(places(args.persons)) <= self.capacity)
    }
}

/// File-backed product catalog acting as a local booking engine
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    post_ids: Vec<PostId>,
    products: HashMap<PostId, ProductRecord>,
}

impl InMemoryCatalog {
    /// Build a catalog from posts, rejecting duplicate ids
    pub fn from_posts(posts: Vec<CatalogPost>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        let mut seen = HashSet::with_capacity(posts.len());

        for post in posts {
            if !seen.insert(post.id) {
                return Err(CatalogError::DuplicateId(post.id));
            }
            catalog.post_ids.push(post.id);

            match post.product {
                Some(record) if post.post_type == "product" => {
                    catalog.products.insert(post.id, record);
                }
                Some(_) => {
                    tracing::warn!(
                        "Post {} has product settings but post type '{}', ignoring them",
                        post.id,
                        post.post_type
                    );
                }
                None => {}
            }
        }

        Ok(catalog)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents)?;
        Self::from_posts(file.posts)
    }

    /// Load a catalog from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml_str(&contents)?;

        tracing::info!(
            "Loaded catalog from {} ({} posts, {} products)",
            path.as_ref().display(),
            catalog.post_ids.len(),
            catalog.products.len()
        );

        Ok(catalog)
    }

    /// Every post id, in file order
    pub fn post_ids(&self) -> &[PostId] {
        &self.post_ids
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

impl ProductCatalog for InMemoryCatalog {
    type Product = ProductRecord;

    fn product(&self, id: PostId) -> Option<&ProductRecord> {
        self.products.get(&id)
    }
}
