//! Collection assembly.

use footprints_core::config::DEFAULT_STORAGE_ACCOUNT;
use footprints_core::error::Result;
use footprints_core::models::dataset::{LICENSE, LICENSE_URL, PARQUET_MEDIA_TYPE};
use footprints_core::models::stac::{
    SpatialExtent, TemporalExtent, ITEM_ASSETS_EXTENSION, STAC_VERSION, TABLE_EXTENSION,
};
use footprints_core::models::{
    Asset, Collection, DatasetSchema, Extent, Fields, Link, Provider, TableColumn,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Start of the temporal extent shared by every footprint collection
pub const COLLECTION_START: &str = "2014-01-01T00:00:00Z";

/// Caller-supplied adjustments to the generated collection
#[derive(Debug, Clone)]
pub struct CollectionOptions {
    /// Replaces the schema's default description
    pub description: Option<String>,

    /// Top-level fields merged over the defaults; these win on collision
    pub extra_fields: Option<Fields>,

    pub storage_account: String,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            description: None,
            extra_fields: None,
            storage_account: DEFAULT_STORAGE_ACCOUNT.to_string(),
        }
    }
}

/// Build the static collection record for a dataset variant.
///
/// The output depends only on the arguments, so identical inputs serialize to
/// identical bytes.
pub fn create_collection(schema: &DatasetSchema, options: &CollectionOptions) -> Result<Collection> {
    let description = options
        .description
        .clone()
        .unwrap_or_else(|| schema.collection_description.to_string());

    let mut assets = BTreeMap::new();
    if let Some(href) = schema.thumbnail {
        let mut thumbnail = Asset::new(href);
        thumbnail.title = Some("Thumbnail".to_string());
        thumbnail.media_type = Some("image/png".to_string());
        thumbnail.roles = vec!["thumbnail".to_string()];
        assets.insert("thumbnail".to_string(), thumbnail);
    }

    let mut extra_fields = Fields::new();
    extra_fields.insert("item_assets".to_string(), item_assets(schema, &options.storage_account)?);

    let collection = Collection {
        object_type: "Collection".to_string(),
        stac_version: STAC_VERSION.to_string(),
        stac_extensions: vec![ITEM_ASSETS_EXTENSION.to_string(), TABLE_EXTENSION.to_string()],
        id: schema.collection_id.to_string(),
        title: Some(schema.collection_title.to_string()),
        description,
        keywords: schema.keywords.iter().map(|k| k.to_string()).collect(),
        license: LICENSE.to_string(),
        providers: vec![Provider {
            name: "Microsoft".to_string(),
            roles: vec!["producer".to_string(), "processor".to_string(), "host".to_string()],
            url: Some(schema.provider_url.to_string()),
        }],
        extent: Extent {
            spatial: SpatialExtent { bbox: vec![[-180.0, -90.0, 180.0, 90.0].into()] },
            temporal: TemporalExtent { interval: vec![[Some(COLLECTION_START.to_string()), None]] },
        },
        links: vec![Link {
            rel: "license".to_string(),
            href: LICENSE_URL.to_string(),
            media_type: Some("text/html".to_string()),
            title: Some(format!("{} License", LICENSE)),
        }],
        assets,
        extra_fields,
    };

    match &options.extra_fields {
        Some(extra) if !extra.is_empty() => merge_fields(collection, extra),
        _ => Ok(collection),
    }
}

/// `item_assets` block describing the data asset every item carries
fn item_assets(schema: &DatasetSchema, storage_account: &str) -> Result<Value> {
    let geometry = TableColumn::new(schema.geometry_column, "byte_array")
        .with_description(schema.geometry_description);

    Ok(json!({
        "data": {
            "type": PARQUET_MEDIA_TYPE,
            "title": schema.asset_title,
            "description": schema.asset_description,
            "roles": ["data"],
            "table:storage_options": { "account_name": storage_account },
            "table:columns": [serde_json::to_value(geometry)?],
        }
    }))
}

/// Overlay top-level fields on a serialized collection and read it back
fn merge_fields(collection: Collection, extra: &Fields) -> Result<Collection> {
    let mut value = serde_json::to_value(&collection)?;
    if let Value::Object(map) = &mut value {
        for (key, field) in extra {
            map.insert(key.clone(), field.clone());
        }
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprints_core::models::DatasetVariant;

    fn serialize(collection: &Collection) -> String {
        serde_json::to_string(collection).unwrap()
    }

    #[test]
    fn test_ms_buildings_collection() {
        let collection =
            create_collection(&DatasetSchema::ms_buildings(), &CollectionOptions::default())
                .unwrap();
        let value = serde_json::to_value(&collection).unwrap();

        assert_eq!(value["type"], "Collection");
        assert_eq!(value["id"], "ms-buildings");
        assert_eq!(value["license"], "ODbL-1.0");
        assert_eq!(value["extent"]["spatial"]["bbox"], json!([[-180.0, -90.0, 180.0, 90.0]]));
        assert_eq!(value["extent"]["temporal"]["interval"], json!([["2014-01-01T00:00:00Z", null]]));
        assert_eq!(value["providers"][0]["roles"], json!(["producer", "processor", "host"]));
        assert_eq!(value["links"][0]["rel"], "license");
        assert_eq!(value["assets"]["thumbnail"]["type"], "image/png");
        assert_eq!(value["keywords"].as_array().unwrap().len(), 5);

        let data = &value["item_assets"]["data"];
        assert_eq!(data["type"], "application/x-parquet");
        assert_eq!(data["title"], "Building Footprints");
        assert_eq!(data["table:storage_options"]["account_name"], "bingmlbuildings");
        assert_eq!(data["table:columns"][0]["description"], "Building footprint polygons");
    }

    #[test]
    fn test_bing_collection_has_no_thumbnail() {
        let collection =
            create_collection(&DatasetSchema::bing_buildings(), &CollectionOptions::default())
                .unwrap();
        assert_eq!(collection.id, "bing-buildings");
        assert!(collection.assets.is_empty());
        assert!(collection.keywords.is_empty());
        assert_eq!(
            collection.providers[0].url.as_deref(),
            Some("https://github.com/stac-utils/stactools")
        );
    }

    #[test]
    fn test_description_override() {
        let options = CollectionOptions {
            description: Some("Custom".to_string()),
            ..CollectionOptions::default()
        };
        let collection = create_collection(&DatasetSchema::ms_buildings(), &options).unwrap();
        assert_eq!(collection.description, "Custom");
    }

    #[test]
    fn test_extra_fields_win() {
        let extra = Fields::from([
            ("msft:short_description".to_string(), json!("Footprints")),
            ("title".to_string(), json!("Overridden")),
        ]);
        let options = CollectionOptions {
            extra_fields: Some(extra),
            ..CollectionOptions::default()
        };
        let collection = create_collection(&DatasetSchema::ms_buildings(), &options).unwrap();

        assert_eq!(collection.title.as_deref(), Some("Overridden"));
        assert_eq!(collection.extra_fields["msft:short_description"], "Footprints");
        assert!(collection.extra_fields.contains_key("item_assets"));
    }

    #[test]
    fn test_deterministic() {
        let extra = Fields::from([("msft:region".to_string(), json!("westeurope"))]);
        let options = CollectionOptions {
            extra_fields: Some(extra),
            ..CollectionOptions::default()
        };

        for variant in [
            DatasetVariant::MsBuildings,
            DatasetVariant::MsBuildingsDelta,
            DatasetVariant::BingBuildings,
        ] {
            let first = create_collection(&variant.schema(), &options).unwrap();
            let second = create_collection(&variant.schema(), &options).unwrap();
            assert_eq!(serialize(&first), serialize(&second));
        }
    }
}
