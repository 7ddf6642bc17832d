//! Queue service response models.
//!
//! Mirrors the queues endpoint's JSON (api-version 1.3). Keys are
//! kebab-case throughout, except the two resort-part identifiers which
//! carry uppercase Roman numerals and need explicit renames. Dates are
//! `yyyy-MM-dd`. Everything the engine does not read is either optional
//! or absent from the model — unknown keys are ignored.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::geo::{distance_m, Coordinate};

/// Paging metadata. `count` is the total number of matching records
/// across all pages.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub count: u32,
    pub page: u32,
    pub limit: u32,
}

/// Page navigation URLs as the service reports them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    pub first: Option<String>,
    pub prev: Option<String>,
    #[serde(rename = "self")]
    pub current: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

/// One queue listing: a (provider, place, benefit) row with its wait
/// statistics. `id` is the service's stable identifier and is what
/// cross-region de-duplication keys on.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: Attributes,
}

impl QueueRecord {
    /// The facility's position, when the service knows it.
    pub fn location(&self) -> Option<Coordinate> {
        let latitude = self.attributes.latitude?;
        let longitude = self.attributes.longitude?;
        Coordinate::new(latitude, longitude).ok()
    }

    /// Great-circle distance in meters from `from` to the facility.
    pub fn distance_from(&self, from: Coordinate) -> Option<f64> {
        self.location().map(|at| distance_m(from, at))
    }

    /// First available appointment date, if reported.
    pub fn first_available(&self) -> Option<NaiveDate> {
        self.attributes.dates.as_ref()?.date
    }

    /// Number of people currently in the queue, if reported.
    pub fn awaiting(&self) -> Option<i64> {
        Some(self.attributes.statistics.as_ref()?.provider_data.as_ref()?.awaiting)
    }

    /// Average wait in days, preferring the provider-reported figure over
    /// the service-computed one.
    pub fn average_wait_days(&self) -> Option<i64> {
        let statistics = self.attributes.statistics.as_ref()?;
        statistics
            .provider_data
            .as_ref()
            .and_then(|p| p.average_period)
            .or_else(|| statistics.computed_data.as_ref().and_then(|c| c.average_period))
    }
}

/// Everything the service says about one queue listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Attributes {
    /// Case urgency class: 1 = stable, 2 = urgent.
    pub case: i64,
    pub benefit: Option<String>,
    pub many_places: Option<String>,
    pub provider: Option<String>,
    pub provider_code: Option<String>,
    pub regon_provider: Option<String>,
    pub nip_provider: Option<String>,
    pub teryt_provider: Option<String>,
    pub place: Option<String>,
    pub address: Option<String>,
    pub locality: Option<String>,
    pub phone: Option<String>,
    pub teryt_place: Option<String>,
    pub registry_number: Option<String>,
    #[serde(rename = "id-resort-part-VII")]
    pub id_resort_part_vii: Option<String>,
    #[serde(rename = "id-resort-part-VIII")]
    pub id_resort_part_viii: Option<String>,
    /// "Y"/"N" flags as the service sends them.
    pub benefits_for_children: Option<String>,
    pub covid_19: Option<String>,
    pub toilet: Option<String>,
    pub ramp: Option<String>,
    pub car_park: Option<String>,
    pub elevator: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub statistics: Option<Statistics>,
    pub dates: Option<Dates>,
    pub benefits_provided: Option<BenefitsProvided>,
}

/// Queue statistics, split into what the provider reported and what the
/// service computed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Statistics {
    pub provider_data: Option<ProviderData>,
    pub computed_data: Option<ComputedData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderData {
    pub awaiting: i64,
    pub removed: i64,
    pub average_period: Option<i64>,
    /// Reporting month, `yyyy-MM`.
    pub update: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComputedData {
    pub average_period: Option<i64>,
    pub update: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BenefitsProvided {
    pub type_of_benefit: Option<i64>,
    pub year: Option<i64>,
    pub amount: Option<f64>,
}

/// Appointment dates attached to a listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Dates {
    pub applicable: Option<bool>,
    /// First available appointment.
    pub date: Option<NaiveDate>,
    pub date_situation_as_at: Option<NaiveDate>,
}

/// One page of the queues endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub meta: Meta,
    pub links: Option<Links>,
    pub data: Vec<QueueRecord>,
}

/// One page of the benefit-name lookup endpoint; `data` is plain name
/// strings.
#[derive(Debug, Clone, Deserialize)]
pub struct BenefitsResponse {
    pub meta: Meta,
    pub data: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RECORD: &str = r#"{
        "type": "queue",
        "id": "052c59b2-e88b-e5ad-ced6-81b549bbf263",
        "attributes": {
            "case": 1,
            "benefit": "PORADNIA ORTOPEDYCZNA",
            "many-places": "N",
            "provider": "SZPITAL UNIWERSYTECKI W KRAKOWIE",
            "provider-code": "061/100207",
            "regon-provider": "000288685",
            "nip-provider": "6751130234",
            "teryt-provider": "1261011",
            "place": "PORADNIA URAZOWO-ORTOPEDYCZNA",
            "address": "UL. JAKUBOWSKIEGO 2",
            "locality": "KRAKÓW",
            "phone": "+48 12 400 12 00",
            "teryt-place": "1261011",
            "registry-number": "000000018526-W-12",
            "id-resort-part-VII": "001",
            "id-resort-part-VIII": "1580",
            "benefits-for-children": "N",
            "covid-19": "N",
            "toilet": "Y",
            "ramp": "Y",
            "car-park": "Y",
            "elevator": "Y",
            "latitude": 50.0163,
            "longitude": 19.9689,
            "statistics": {
                "provider-data": {
                    "awaiting": 1284,
                    "removed": 41,
                    "average-period": 93,
                    "update": "2024-04"
                },
                "computed-data": {
                    "average-period": 101,
                    "update": "2024-05"
                }
            },
            "dates": {
                "applicable": true,
                "date": "2024-09-12",
                "date-situation-as-at": "2024-05-16"
            },
            "benefits-provided": {
                "type-of-benefit": 0,
                "year": 2023,
                "amount": 7318.0
            }
        }
    }"#;

    #[test]
    fn test_full_record_deserialize() {
        let record: QueueRecord = serde_json::from_str(FULL_RECORD).unwrap();

        assert_eq!(record.kind, "queue");
        assert_eq!(record.id, "052c59b2-e88b-e5ad-ced6-81b549bbf263");
        assert_eq!(record.attributes.case, 1);
        assert_eq!(
            record.attributes.provider.as_deref(),
            Some("SZPITAL UNIWERSYTECKI W KRAKOWIE")
        );
        assert_eq!(record.attributes.id_resort_part_vii.as_deref(), Some("001"));
        assert_eq!(record.attributes.id_resort_part_viii.as_deref(), Some("1580"));
        assert_eq!(record.attributes.covid_19.as_deref(), Some("N"));
        assert_eq!(record.attributes.car_park.as_deref(), Some("Y"));

        assert_eq!(record.awaiting(), Some(1284));
        assert_eq!(record.average_wait_days(), Some(93));
        assert_eq!(
            record.first_available(),
            NaiveDate::from_ymd_opt(2024, 9, 12)
        );
    }

    #[test]
    fn test_record_location_and_distance() {
        let record: QueueRecord = serde_json::from_str(FULL_RECORD).unwrap();

        let location = record.location().unwrap();
        assert!((location.latitude - 50.0163).abs() < 1e-9);
        assert!((location.longitude - 19.9689).abs() < 1e-9);

        // Kraków main square is a couple of kilometers away
        let rynek = Coordinate::new(50.0617, 19.9373).unwrap();
        let distance = record.distance_from(rynek).unwrap();
        assert!((2_000.0..10_000.0).contains(&distance), "distance: {}", distance);
    }

    #[test]
    fn test_sparse_record_deserialize() {
        // Minimal listing: no statistics, no dates, no position
        let json = r#"{
            "type": "queue",
            "id": "abc",
            "attributes": {
                "case": 2,
                "benefit": "ODDZIAŁ CHIRURGII URAZOWO-ORTOPEDYCZNEJ"
            }
        }"#;

        let record: QueueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.attributes.case, 2);
        assert_eq!(record.location(), None);
        assert_eq!(record.first_available(), None);
        assert_eq!(record.awaiting(), None);
        assert_eq!(record.average_wait_days(), None);
    }

    #[test]
    fn test_average_wait_falls_back_to_computed() {
        let json = r#"{
            "type": "queue",
            "id": "abc",
            "attributes": {
                "case": 1,
                "statistics": {
                    "provider-data": {
                        "awaiting": 12,
                        "removed": 0,
                        "update": "2024-04"
                    },
                    "computed-data": {
                        "average-period": 55,
                        "update": "2024-05"
                    }
                }
            }
        }"#;

        let record: QueueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.average_wait_days(), Some(55));
    }

    #[test]
    fn test_response_page_deserialize() {
        let json = r#"{
            "meta": {
                "context": "https://api.example/schema",
                "count": 30,
                "title": "queue",
                "page": 1,
                "url": "https://api.example/queues",
                "limit": 25,
                "provider": "Narodowy Fundusz Zdrowia",
                "date-published": "2019-02-26T10:49:23+01:00",
                "description": "",
                "keywords": "",
                "language": "PL",
                "content-type": "application/json; charset=utf-8"
            },
            "links": {
                "first": "/app-itl-api/queues?page=1&limit=25",
                "prev": null,
                "self": "/app-itl-api/queues?page=1&limit=25",
                "next": "/app-itl-api/queues?page=2&limit=25",
                "last": "/app-itl-api/queues?page=2&limit=25"
            },
            "data": [
                {"type": "queue", "id": "one", "attributes": {"case": 1}},
                {"type": "queue", "id": "two", "attributes": {"case": 1}}
            ]
        }"#;

        let page: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.meta.count, 30);
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.meta.limit, 25);
        assert_eq!(page.data.len(), 2);

        let links = page.links.unwrap();
        assert!(links.next.is_some());
        assert_eq!(links.prev, None);
        assert_eq!(
            links.current.as_deref(),
            Some("/app-itl-api/queues?page=1&limit=25")
        );
    }

    #[test]
    fn test_benefits_response_deserialize() {
        let json = r#"{
            "meta": {"count": 3, "page": 1, "limit": 25},
            "links": {"first": "x", "last": "x"},
            "data": [
                "PORADNIA ORTOPEDYCZNA",
                "PORADNIA ORTOPEDYCZNA DLA DZIECI",
                "ODDZIAŁ ORTOPEDYCZNY"
            ]
        }"#;

        let benefits: BenefitsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(benefits.meta.count, 3);
        assert_eq!(benefits.data.len(), 3);
        assert_eq!(benefits.data[0], "PORADNIA ORTOPEDYCZNA");
    }

    #[test]
    fn test_null_date_tolerated() {
        let json = r#"{
            "type": "queue",
            "id": "abc",
            "attributes": {
                "case": 1,
                "dates": {
                    "applicable": false,
                    "date": null,
                    "date-situation-as-at": "2024-05-16"
                }
            }
        }"#;

        let record: QueueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.first_available(), None);
        let dates = record.attributes.dates.unwrap();
        assert_eq!(dates.applicable, Some(false));
        assert_eq!(
            dates.date_situation_as_at,
            NaiveDate::from_ymd_opt(2024, 5, 16)
        );
    }
}
