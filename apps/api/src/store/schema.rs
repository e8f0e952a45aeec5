use super::{CollectionSchema, FieldSchema};

/// Schema of the jobs collection. `job_id` doubles as the default sort key.
pub fn jobs_collection_schema(name: &str) -> CollectionSchema {
    CollectionSchema {
        name: name.to_string(),
        fields: vec![
            field("job_id", "int32", false),
            field("title", "string", false),
            field("company", "string", true),
            // Ratings may be null, which the engine only accepts on optional fields.
            FieldSchema {
                optional: true,
                ..field("rating", "float", false)
            },
            field("location", "string", true),
            field("source", "string", true),
            field("description", "string", false),
            field("application_method", "string", false),
            field("posted_date", "string", false),
        ],
        default_sorting_field: "job_id".to_string(),
    }
}

fn field(name: &str, field_type: &str, facet: bool) -> FieldSchema {
    FieldSchema {
        name: name.to_string(),
        field_type: field_type.to_string(),
        facet,
        optional: false,
    }
}
