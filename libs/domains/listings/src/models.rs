use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Main category name for real-estate listings.
pub const MAIN_ESTATE: &str = "estate";
/// Main category name for phones and computers.
pub const MAIN_DIGITAL: &str = "digitalEquipment";
/// Sub category name for phone/tablet listings.
pub const SUB_CELL_PHONES: &str = "cellPhoneAndTablets";
/// Sub category name for computer listings.
pub const SUB_COMPUTERS: &str = "computer";

/// Collection holding soft-delete audit records.
pub const DELETIONS_COLLECTION: &str = "listing_deletions";

/// The physical collection a listing lives in, determined once at
/// creation time by its (main, sub) category pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingKind {
    Estate,
    CellPhone,
    Computer,
}

impl ListingKind {
    pub const ALL: [ListingKind; 3] = [
        ListingKind::Estate,
        ListingKind::CellPhone,
        ListingKind::Computer,
    ];

    pub fn collection_name(&self) -> &'static str {
        match self {
            ListingKind::Estate => "estates",
            ListingKind::CellPhone => "cell_phones",
            ListingKind::Computer => "computers",
        }
    }

    pub fn main_category(&self) -> &'static str {
        match self {
            ListingKind::Estate => MAIN_ESTATE,
            ListingKind::CellPhone | ListingKind::Computer => MAIN_DIGITAL,
        }
    }

    pub fn sub_category(&self) -> Option<&'static str> {
        match self {
            ListingKind::Estate => None,
            ListingKind::CellPhone => Some(SUB_CELL_PHONES),
            ListingKind::Computer => Some(SUB_COMPUTERS),
        }
    }

    /// Resolve the collection from category names, case-insensitively.
    ///
    /// Digital listings require a sub category; estates ignore it.
    pub fn from_categories(main_category: &str, sub_category: Option<&str>) -> Option<Self> {
        if main_category.eq_ignore_ascii_case(MAIN_ESTATE) {
            return Some(ListingKind::Estate);
        }
        if main_category.eq_ignore_ascii_case(MAIN_DIGITAL) {
            return match sub_category {
                Some(sub) if sub.eq_ignore_ascii_case(SUB_CELL_PHONES) => {
                    Some(ListingKind::CellPhone)
                }
                Some(sub) if sub.eq_ignore_ascii_case(SUB_COMPUTERS) => Some(ListingKind::Computer),
                _ => None,
            };
        }
        None
    }
}

/// Parse a composite listing key of the form `id,mainCategory[,subCategory]`.
///
/// This is the O(1) dispatch path: the category tag picks the one correct
/// collection without probing all three.
pub fn parse_composite_key(key: &str) -> Option<(Uuid, ListingKind)> {
    let mut parts = key.splitn(3, ',');
    let id = Uuid::parse_str(parts.next()?.trim()).ok()?;
    let main = parts.next()?.trim();
    let sub = parts.next().map(str::trim).filter(|s| !s.is_empty());
    let kind = ListingKind::from_categories(main, sub)?;
    Some((id, kind))
}

/// Estate transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionType {
    Sell,
    Rent,
}

/// Real-estate listing (stored in the `estates` collection)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstateListing {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub regular_price: f64,
    pub discount_price: Option<f64>,
    /// When set, the discount price is meaningful
    pub offer: bool,
    pub image_urls: Vec<String>,
    /// Owning user
    pub user_ref: Uuid,
    /// Category names denormalized at creation time
    pub main_category: String,
    pub bedrooms: u32,
    pub bath: u32,
    pub furnished: bool,
    pub parking: bool,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub is_deleted: bool,
    pub is_approved: bool,
    pub is_rejected: bool,
    pub rejected_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Phone/tablet listing (stored in the `cell_phones` collection)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CellPhoneListing {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub regular_price: f64,
    pub discount_price: Option<f64>,
    pub offer: bool,
    pub image_urls: Vec<String>,
    pub user_ref: Uuid,
    pub main_category: String,
    pub sub_category: String,
    pub brand: String,
    pub model: Option<String>,
    pub sim: Option<String>,
    pub storage: String,
    pub ram: String,
    pub color: String,
    pub condition: Option<String>,
    pub is_deleted: bool,
    pub is_approved: bool,
    pub is_rejected: bool,
    pub rejected_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Computer listing (stored in the `computers` collection)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComputerListing {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub regular_price: f64,
    pub discount_price: Option<f64>,
    pub offer: bool,
    pub image_urls: Vec<String>,
    pub user_ref: Uuid,
    pub main_category: String,
    pub sub_category: String,
    pub brand: String,
    pub storage: String,
    pub ram: String,
    pub is_deleted: bool,
    pub is_approved: bool,
    pub is_rejected: bool,
    pub rejected_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One logical listing, physically stored in one of three collections.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Listing {
    Estate(EstateListing),
    CellPhone(CellPhoneListing),
    Computer(ComputerListing),
}

impl Listing {
    pub fn kind(&self) -> ListingKind {
        match self {
            Listing::Estate(_) => ListingKind::Estate,
            Listing::CellPhone(_) => ListingKind::CellPhone,
            Listing::Computer(_) => ListingKind::Computer,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Listing::Estate(l) => l.id,
            Listing::CellPhone(l) => l.id,
            Listing::Computer(l) => l.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Listing::Estate(l) => &l.name,
            Listing::CellPhone(l) => &l.name,
            Listing::Computer(l) => &l.name,
        }
    }

    pub fn user_ref(&self) -> Uuid {
        match self {
            Listing::Estate(l) => l.user_ref,
            Listing::CellPhone(l) => l.user_ref,
            Listing::Computer(l) => l.user_ref,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Listing::Estate(l) => l.created_at,
            Listing::CellPhone(l) => l.created_at,
            Listing::Computer(l) => l.created_at,
        }
    }

    pub fn is_approved(&self) -> bool {
        match self {
            Listing::Estate(l) => l.is_approved,
            Listing::CellPhone(l) => l.is_approved,
            Listing::Computer(l) => l.is_approved,
        }
    }

    pub fn is_rejected(&self) -> bool {
        match self {
            Listing::Estate(l) => l.is_rejected,
            Listing::CellPhone(l) => l.is_rejected,
            Listing::Computer(l) => l.is_rejected,
        }
    }

    pub fn image_urls(&self) -> &[String] {
        match self {
            Listing::Estate(l) => &l.image_urls,
            Listing::CellPhone(l) => &l.image_urls,
            Listing::Computer(l) => &l.image_urls,
        }
    }
}

/// Append-only audit record written when a listing is soft-deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletionRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub product_id: Uuid,
    pub collection_name: String,
    pub deleted_by: Uuid,
    pub reason: String,
    pub deleted_at: DateTime<Utc>,
}

impl DeletionRecord {
    pub fn new(product_id: Uuid, kind: ListingKind, deleted_by: Uuid, reason: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            product_id,
            collection_name: kind.collection_name().to_string(),
            deleted_by,
            reason,
            deleted_at: Utc::now(),
        }
    }
}

/// DTO for creating an estate listing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEstate {
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[validate(length(min = 2, max = 2000))]
    pub description: String,
    #[validate(length(min = 2, max = 300))]
    pub address: String,
    #[validate(range(min = 0.0))]
    pub regular_price: f64,
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub bedrooms: u32,
    pub bath: u32,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// DTO for creating a phone/tablet listing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCellPhone {
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[validate(length(min = 2, max = 2000))]
    pub description: String,
    #[validate(length(min = 2, max = 300))]
    pub address: String,
    #[validate(range(min = 0.0))]
    pub regular_price: f64,
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    pub model: Option<String>,
    pub sim: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub storage: String,
    #[validate(length(min = 1, max = 50))]
    pub ram: String,
    #[validate(length(min = 1, max = 50))]
    pub color: String,
    pub condition: Option<String>,
}

/// DTO for creating a computer listing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComputer {
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[validate(length(min = 2, max = 2000))]
    pub description: String,
    #[validate(length(min = 2, max = 300))]
    pub address: String,
    #[validate(range(min = 0.0))]
    pub regular_price: f64,
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    #[validate(length(min = 1, max = 50))]
    pub storage: String,
    #[validate(length(min = 1, max = 50))]
    pub ram: String,
}

impl EstateListing {
    pub fn new(user_ref: Uuid, input: CreateEstate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            address: input.address,
            regular_price: input.regular_price,
            discount_price: input.discount_price,
            offer: input.offer,
            image_urls: input.image_urls,
            user_ref,
            main_category: MAIN_ESTATE.to_string(),
            bedrooms: input.bedrooms,
            bath: input.bath,
            furnished: input.furnished,
            parking: input.parking,
            transaction_type: input.transaction_type,
            is_deleted: false,
            is_approved: false,
            is_rejected: false,
            rejected_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl CellPhoneListing {
    pub fn new(user_ref: Uuid, input: CreateCellPhone) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            address: input.address,
            regular_price: input.regular_price,
            discount_price: input.discount_price,
            offer: input.offer,
            image_urls: input.image_urls,
            user_ref,
            main_category: MAIN_DIGITAL.to_string(),
            sub_category: SUB_CELL_PHONES.to_string(),
            brand: input.brand,
            model: input.model,
            sim: input.sim,
            storage: input.storage,
            ram: input.ram,
            color: input.color,
            condition: input.condition,
            is_deleted: false,
            is_approved: false,
            is_rejected: false,
            rejected_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ComputerListing {
    pub fn new(user_ref: Uuid, input: CreateComputer) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            address: input.address,
            regular_price: input.regular_price,
            discount_price: input.discount_price,
            offer: input.offer,
            image_urls: input.image_urls,
            user_ref,
            main_category: MAIN_DIGITAL.to_string(),
            sub_category: SUB_COMPUTERS.to_string(),
            brand: input.brand,
            storage: input.storage,
            ram: input.ram,
            is_deleted: false,
            is_approved: false,
            is_rejected: false,
            rejected_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Owner-editable fields, shared by all three collections. Absent fields
/// are left untouched.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateListing {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 2, max = 300))]
    pub address: Option<String>,
    #[validate(range(min = 0.0))]
    pub regular_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
    pub offer: Option<bool>,
    pub image_urls: Option<Vec<String>>,
    pub bedrooms: Option<u32>,
    pub bath: Option<u32>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub sim: Option<String>,
    pub storage: Option<String>,
    pub ram: Option<String>,
    pub color: Option<String>,
    pub condition: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_categories() {
        assert_eq!(
            ListingKind::from_categories("estate", None),
            Some(ListingKind::Estate)
        );
        assert_eq!(
            ListingKind::from_categories("Estate", Some("ignored")),
            Some(ListingKind::Estate)
        );
        assert_eq!(
            ListingKind::from_categories("digitalEquipment", Some("cellPhoneAndTablets")),
            Some(ListingKind::CellPhone)
        );
        assert_eq!(
            ListingKind::from_categories("DIGITALEQUIPMENT", Some("Computer")),
            Some(ListingKind::Computer)
        );
        assert_eq!(ListingKind::from_categories("digitalEquipment", None), None);
        assert_eq!(ListingKind::from_categories("vehicles", None), None);
    }

    #[test]
    fn test_parse_composite_key() {
        let id = Uuid::now_v7();
        let key = format!("{id},digitalEquipment,computer");
        assert_eq!(parse_composite_key(&key), Some((id, ListingKind::Computer)));

        let key = format!("{id},estate");
        assert_eq!(parse_composite_key(&key), Some((id, ListingKind::Estate)));

        assert_eq!(parse_composite_key("not-a-uuid,estate"), None);
        assert_eq!(parse_composite_key(&id.to_string()), None);
    }

    #[test]
    fn test_new_listing_starts_pending() {
        let estate = EstateListing::new(
            Uuid::now_v7(),
            CreateEstate {
                name: "Cozy flat".into(),
                description: "Two rooms near the park".into(),
                address: "12 Main St".into(),
                regular_price: 1200.0,
                discount_price: None,
                offer: false,
                image_urls: vec![],
                bedrooms: 2,
                bath: 1,
                furnished: true,
                parking: false,
                transaction_type: TransactionType::Rent,
            },
        );
        assert!(!estate.is_approved);
        assert!(!estate.is_rejected);
        assert!(!estate.is_deleted);
        assert_eq!(estate.main_category, MAIN_ESTATE);
    }
}
