//! Filter construction for listing searches.
//!
//! Malformed or missing parameters degrade to permissive defaults and
//! never produce an error at this layer.

use mongodb::bson::{Bson, Document, doc};
use serde::{Deserialize, Deserializer};
use utoipa::IntoParams;

/// Default page size for single-collection searches.
pub const DEFAULT_LIMIT: i64 = 9;

/// Whose reads the filter serves: the public sees approved listings only,
/// owners and admins see everything not soft-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Unrestricted,
}

/// Raw search parameters as sent by the client.
///
/// `storage`, `ram` and `color` arrive in a bracketed-index encoding
/// (`storage[0]=64GB&storage[1]=128GB`) that the query-string
/// deserializer cannot express, so they are parsed separately from the
/// raw query via [`SearchParams::with_indexed_facets`].
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct SearchParams {
    pub search_term: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub min_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub max_price: Option<f64>,
    pub offer: Option<String>,
    pub furnished: Option<String>,
    pub parking: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub brand: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub limit: Option<i64>,
    #[serde(deserialize_with = "lenient_number")]
    pub start_index: Option<u64>,
    pub order: Option<String>,
    pub sort: Option<String>,
    #[serde(skip)]
    pub storage: Vec<String>,
    #[serde(skip)]
    pub ram: Vec<String>,
    #[serde(skip)]
    pub color: Vec<String>,
}

impl SearchParams {
    /// Fill the set-membership facets from the raw (undecoded) query string.
    pub fn with_indexed_facets(mut self, raw_query: Option<&str>) -> Self {
        if let Some(raw) = raw_query {
            self.storage = parse_indexed(raw, "storage");
            self.ram = parse_indexed(raw, "ram");
            self.color = parse_indexed(raw, "color");
        }
        self
    }

    pub fn limit(&self) -> i64 {
        match self.limit {
            Some(l) if l > 0 => l,
            _ => DEFAULT_LIMIT,
        }
    }

    pub fn skip(&self) -> u64 {
        self.start_index.unwrap_or(0)
    }

    /// Sort document over a whitelisted field, newest first by default.
    pub fn sort_doc(&self) -> Document {
        let field = match self.order.as_deref() {
            Some("regular_price") | Some("regularPrice") => "regular_price",
            _ => "created_at",
        };
        let direction = match self.sort.as_deref() {
            Some("asc") => 1,
            _ => -1,
        };
        doc! { field: direction }
    }

    /// Filter over the fields every collection shares.
    fn base_filter(&self, visibility: Visibility) -> Document {
        let mut filter = doc! { "is_deleted": false };
        if visibility == Visibility::Public {
            filter.insert("is_approved", true);
        }
        if let Some(term) = self.search_term.as_deref().filter(|t| !t.is_empty()) {
            filter.insert(
                "name",
                doc! { "$regex": escape_regex(term), "$options": "i" },
            );
        }
        if let Some(price) = self.price_condition() {
            filter.insert(
                "$or",
                vec![
                    doc! { "regular_price": price.clone() },
                    doc! { "discount_price": price },
                ],
            );
        }
        filter.insert("offer", bool_facet(self.offer.as_deref()));
        filter
    }

    /// Price bounds, with the documented escape hatches: no bounds or
    /// both bounds zero means unconstrained, a zero bound on one side
    /// means only the other side applies.
    fn price_condition(&self) -> Option<Document> {
        let min = self.min_price.unwrap_or(0.0);
        let max = self.max_price.unwrap_or(0.0);
        if min == 0.0 && max == 0.0 {
            None
        } else if max == 0.0 {
            Some(doc! { "$gte": min })
        } else if min == 0.0 {
            Some(doc! { "$lte": max })
        } else {
            Some(doc! { "$gte": min, "$lte": max })
        }
    }

    pub fn estate_filter(&self, visibility: Visibility) -> Document {
        let mut filter = self.base_filter(visibility);
        filter.insert("furnished", bool_facet(self.furnished.as_deref()));
        filter.insert("parking", bool_facet(self.parking.as_deref()));
        filter.insert("type", transaction_facet(self.transaction_type.as_deref()));
        filter
    }

    pub fn cell_phone_filter(&self, visibility: Visibility) -> Document {
        let mut filter = self.base_filter(visibility);
        self.insert_brand(&mut filter);
        insert_membership(&mut filter, "storage", &self.storage);
        insert_membership(&mut filter, "ram", &self.ram);
        insert_membership(&mut filter, "color", &self.color);
        filter
    }

    pub fn computer_filter(&self, visibility: Visibility) -> Document {
        let mut filter = self.base_filter(visibility);
        self.insert_brand(&mut filter);
        insert_membership(&mut filter, "storage", &self.storage);
        insert_membership(&mut filter, "ram", &self.ram);
        filter
    }

    fn insert_brand(&self, filter: &mut Document) {
        if let Some(brand) = self
            .brand
            .as_deref()
            .filter(|b| !b.is_empty() && !b.eq_ignore_ascii_case("all"))
        {
            filter.insert("brand", brand);
        }
    }
}

/// Numeric parameters arrive as query-string text; anything that does
/// not parse falls back to `None` so the filter stays permissive
/// instead of rejecting the request.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// Boolean facets match both values when unset. The literal string
/// "false" is treated the same as unset; only an explicit other value
/// narrows the filter to `true`.
fn bool_facet(value: Option<&str>) -> Bson {
    match value {
        None | Some("false") | Some("") => Bson::Document(doc! { "$in": [true, false] }),
        Some(_) => Bson::Boolean(true),
    }
}

fn transaction_facet(value: Option<&str>) -> Bson {
    match value {
        None | Some("all") | Some("") => Bson::Document(doc! { "$in": ["sell", "rent"] }),
        Some(v) => Bson::String(v.to_string()),
    }
}

fn insert_membership(filter: &mut Document, field: &str, values: &[String]) {
    if !values.is_empty() {
        filter.insert(field, doc! { "$in": values });
    }
}

/// Collect `key[0]=a&key[1]=b` pairs from a raw query string, in index order.
fn parse_indexed(raw_query: &str, key: &str) -> Vec<String> {
    let mut indexed: Vec<(usize, String)> = Vec::new();
    for pair in raw_query.split('&') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = match urlencoding::decode(name) {
            Ok(n) => n,
            Err(_) => continue,
        };
        let Some(index) = name
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('['))
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|idx| idx.parse::<usize>().ok())
        else {
            continue;
        };
        if let Ok(value) = urlencoding::decode(value) {
            indexed.push((index, value.into_owned()));
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, value)| value).collect()
}

/// Escape regex metacharacters so user input matches literally.
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(
            c,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_lower_bound_only() {
        let params = SearchParams {
            min_price: Some(100.0),
            max_price: Some(0.0),
            ..Default::default()
        };
        let filter = params.estate_filter(Visibility::Public);
        let or = filter.get_array("$or").unwrap();
        assert_eq!(
            or[0].as_document().unwrap().get_document("regular_price"),
            Ok(&doc! { "$gte": 100.0 })
        );
    }

    #[test]
    fn test_price_both_zero_is_unconstrained() {
        let params = SearchParams {
            min_price: Some(0.0),
            max_price: Some(0.0),
            ..Default::default()
        };
        assert!(!params.estate_filter(Visibility::Public).contains_key("$or"));
    }

    fn from_query(query: &str) -> SearchParams {
        let uri: axum::http::Uri = format!("/estates?{query}").parse().unwrap();
        let axum::extract::Query(params) =
            axum::extract::Query::<SearchParams>::try_from_uri(&uri).unwrap();
        params
    }

    #[test]
    fn test_malformed_numeric_params_degrade_to_defaults() {
        let params = from_query("min_price=abc&max_price=&limit=xyz&start_index=-4");
        assert!(params.min_price.is_none());
        assert!(params.max_price.is_none());
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.skip(), 0);
        assert!(!params.estate_filter(Visibility::Public).contains_key("$or"));
    }

    #[test]
    fn test_numeric_params_parse_from_query_string() {
        let params = from_query("min_price=100&max_price=0&limit=5&start_index=9");
        assert_eq!(params.min_price, Some(100.0));
        assert_eq!(params.max_price, Some(0.0));
        assert_eq!(params.limit(), 5);
        assert_eq!(params.skip(), 9);
    }

    #[test]
    fn test_bool_facet_false_matches_both() {
        assert_eq!(
            bool_facet(Some("false")),
            Bson::Document(doc! { "$in": [true, false] })
        );
        assert_eq!(bool_facet(None), Bson::Document(doc! { "$in": [true, false] }));
        assert_eq!(bool_facet(Some("true")), Bson::Boolean(true));
    }

    #[test]
    fn test_transaction_facet_defaults_to_both() {
        assert_eq!(
            transaction_facet(Some("all")),
            Bson::Document(doc! { "$in": ["sell", "rent"] })
        );
        assert_eq!(transaction_facet(Some("rent")), Bson::String("rent".into()));
    }

    #[test]
    fn test_visibility_scoping() {
        let params = SearchParams::default();
        let public = params.estate_filter(Visibility::Public);
        assert_eq!(public.get_bool("is_approved"), Ok(true));
        assert_eq!(public.get_bool("is_deleted"), Ok(false));

        let unrestricted = params.estate_filter(Visibility::Unrestricted);
        assert!(!unrestricted.contains_key("is_approved"));
        assert_eq!(unrestricted.get_bool("is_deleted"), Ok(false));
    }

    #[test]
    fn test_parse_indexed_facets() {
        let params = SearchParams::default()
            .with_indexed_facets(Some("storage%5B0%5D=64GB&storage[1]=128%20GB&ram[0]=8GB"));
        assert_eq!(params.storage, vec!["64GB", "128 GB"]);
        assert_eq!(params.ram, vec!["8GB"]);
        assert!(params.color.is_empty());
    }

    #[test]
    fn test_brand_all_is_unconstrained() {
        let params = SearchParams {
            brand: Some("all".into()),
            ..Default::default()
        };
        assert!(
            !params
                .cell_phone_filter(Visibility::Public)
                .contains_key("brand")
        );

        let params = SearchParams {
            brand: Some("samsung".into()),
            ..Default::default()
        };
        assert_eq!(
            params
                .cell_phone_filter(Visibility::Public)
                .get_str("brand"),
            Ok("samsung")
        );
    }

    #[test]
    fn test_search_term_is_escaped() {
        let params = SearchParams {
            search_term: Some("c++ (used)".into()),
            ..Default::default()
        };
        let filter = params.computer_filter(Visibility::Public);
        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex"), Ok(r"c\+\+ \(used\)"));
        assert_eq!(name.get_str("$options"), Ok("i"));
    }

    #[test]
    fn test_defaults() {
        let params = SearchParams::default();
        assert_eq!(params.limit(), 9);
        assert_eq!(params.skip(), 0);
        assert_eq!(params.sort_doc(), doc! { "created_at": -1 });

        let params = SearchParams {
            order: Some("regularPrice".into()),
            sort: Some("asc".into()),
            ..Default::default()
        };
        assert_eq!(params.sort_doc(), doc! { "regular_price": 1 });
    }
}
