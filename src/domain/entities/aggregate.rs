use std::collections::BTreeSet;

use serde_json::Value;

use crate::domain::entities::resource::{Row, RowKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NestedCollection {
    Images,
    Flights,
    Hotels,
    Itinerary,
}

impl NestedCollection {
    pub const ALL: [NestedCollection; 4] = [
        NestedCollection::Images,
        NestedCollection::Flights,
        NestedCollection::Hotels,
        NestedCollection::Itinerary,
    ];

    pub fn field(self) -> &'static str {
        match self {
            NestedCollection::Images => "images",
            NestedCollection::Flights => "flights",
            NestedCollection::Hotels => "hotels",
            NestedCollection::Itinerary => "itinerary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NestedCollection::Images => "Images",
            NestedCollection::Flights => "Flights",
            NestedCollection::Hotels => "Hotels",
            NestedCollection::Itinerary => "Itinerary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Overview,
    Nested(NestedCollection),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackageAggregate {
    pub package: Row,
    pub images: Vec<Row>,
    pub flights: Vec<Row>,
    pub hotels: Vec<Row>,
    pub itinerary: Vec<Row>,
}

impl PackageAggregate {
    /// Accepts `{ data: {...} }` or the bare object; missing nested arrays are empty.
    pub fn from_value(value: Value) -> Option<Self> {
        let body = match value {
            Value::Object(mut map) => match map.remove("data") {
                Some(inner @ Value::Object(_)) => inner,
                Some(other) => {
                    map.insert("data".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            },
            _ => return None,
        };
        let mut package = Row::from_value(body)?;

        let mut take = |collection: NestedCollection| -> Vec<Row> {
            match package.fields.remove(collection.field()) {
                Some(Value::Array(items)) => items.into_iter().filter_map(Row::from_value).collect(),
                _ => Vec::new(),
            }
        };
        let images = take(NestedCollection::Images);
        let flights = take(NestedCollection::Flights);
        let hotels = take(NestedCollection::Hotels);
        let itinerary = take(NestedCollection::Itinerary);

        Some(Self {
            package,
            images,
            flights,
            hotels,
            itinerary,
        })
    }

    pub fn collection(&self, collection: NestedCollection) -> &[Row] {
        match collection {
            NestedCollection::Images => &self.images,
            NestedCollection::Flights => &self.flights,
            NestedCollection::Hotels => &self.hotels,
            NestedCollection::Itinerary => &self.itinerary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailViewState {
    pub active_tab: DetailTab,
    /// Collections share key spaces (a hotel and a flight can both be id 3).
    pub expanded: BTreeSet<(NestedCollection, RowKey)>,
}

impl DetailViewState {
    pub fn select_tab(&mut self, tab: DetailTab) {
        self.active_tab = tab;
    }

    pub fn toggle_expanded(&mut self, collection: NestedCollection, key: RowKey) {
        let entry = (collection, key);
        if !self.expanded.remove(&entry) {
            self.expanded.insert(entry);
        }
    }

    pub fn is_expanded(&self, collection: NestedCollection, key: &RowKey) -> bool {
        self.expanded.contains(&(collection, key.clone()))
    }
}
