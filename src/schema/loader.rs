//! Schema loader and in-memory schema registry
//!
//! - Built-in schemas are embedded in the crate
//! - Extra schemas may be stored at metadata/schemas/schema_<id>_<version>.json
//! - One file per schema version; a registered version never changes

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Identifier of the conference record schema
pub const CONFERENCES_SCHEMA: &str = "conferences";

const BUILTIN_SCHEMAS: &[(&str, &str)] = &[(
    "conferences.json",
    include_str!("../../schemas/conferences.json"),
)];

/// Schema loader that reads schema files and maintains an in-memory registry.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by (schema_id, schema_version)
    schemas: HashMap<(String, String), Schema>,
}

impl SchemaLoader {
    /// Creates an empty loader for the given data directory.
    ///
    /// Schema files are expected at `<data_dir>/metadata/schemas/`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            schema_dir: data_dir.join("metadata").join("schemas"),
            schemas: HashMap::new(),
        }
    }

    /// Creates a loader holding only the schemas embedded in the crate.
    pub fn builtin() -> SchemaResult<Self> {
        let mut loader = Self {
            schema_dir: PathBuf::new(),
            schemas: HashMap::new(),
        };
        loader.register_builtin()?;
        Ok(loader)
    }

    /// Creates a loader for `data_dir` with the built-in schemas preloaded.
    pub fn with_builtin(data_dir: &Path) -> SchemaResult<Self> {
        let mut loader = Self::new(data_dir);
        loader.register_builtin()?;
        Ok(loader)
    }

    fn register_builtin(&mut self) -> SchemaResult<()> {
        for (name, content) in BUILTIN_SCHEMAS {
            let schema = parse_schema(name, content)?;
            self.register(schema)?;
        }
        Ok(())
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads all schema files from the schema directory.
    ///
    /// A missing directory is not an error; a malformed file is.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            debug!(dir = %self.schema_dir.display(), "schema directory absent, nothing to load");
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }

        // Directory order is platform dependent
        paths.sort();
        for path in &paths {
            self.load_schema_file(path)?;
        }

        info!(
            dir = %self.schema_dir.display(),
            files = paths.len(),
            "schemas loaded"
        );
        Ok(())
    }

    /// Loads a single schema file.
    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let schema = parse_schema(&path.display().to_string(), &content)?;
        self.register(schema)
    }

    /// Registers a schema directly.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(&schema.schema_id, e))?;

        let key = (schema.schema_id.clone(), schema.schema_version.clone());

        if self.schemas.contains_key(&key) {
            return Err(SchemaError::schema_immutable(
                &schema.schema_id,
                &schema.schema_version,
            ));
        }

        debug!(
            schema = %schema.schema_id,
            version = %schema.schema_version,
            "schema registered"
        );
        self.schemas.insert(key, schema);
        Ok(())
    }

    /// Gets a schema by ID and version.
    pub fn get(&self, schema_id: &str, schema_version: &str) -> Option<&Schema> {
        self.schemas.get(&(schema_id.to_string(), schema_version.to_string()))
    }

    /// Gets the highest registered version of a schema.
    ///
    /// Versions compare numerically when both parse as integers, otherwise
    /// as strings.
    pub fn latest(&self, schema_id: &str) -> Option<&Schema> {
        self.schemas
            .values()
            .filter(|s| s.schema_id == schema_id)
            .max_by(|a, b| {
                match (a.schema_version.parse::<u64>(), b.schema_version.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => a.schema_version.cmp(&b.schema_version),
                }
            })
    }

    /// Checks if a schema exists.
    pub fn exists(&self, schema_id: &str, schema_version: &str) -> bool {
        self.get(schema_id, schema_version).is_some()
    }

    /// Checks if any version of a schema ID exists.
    pub fn schema_id_exists(&self, schema_id: &str) -> bool {
        self.schemas.keys().any(|(id, _)| id == schema_id)
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Saves a schema to the schema directory.
    pub fn save_schema(&self, schema: &Schema) -> SchemaResult<PathBuf> {
        let filename = format!(
            "schema_{}_{}.json",
            schema.schema_id, schema.schema_version
        );
        let path = self.schema_dir.join(&filename);

        if path.exists() {
            return Err(SchemaError::schema_immutable(
                &schema.schema_id,
                &schema.schema_version,
            ));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(schema).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })?;

        Ok(path)
    }
}

fn parse_schema(origin: &str, content: &str) -> SchemaResult<Schema> {
    let schema: Schema = serde_json::from_str(content)
        .map_err(|e| SchemaError::malformed_schema(origin, format!("Invalid JSON: {}", e)))?;

    schema
        .validate_structure()
        .map_err(|e| SchemaError::malformed_schema(origin, e))?;

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::errors::SchemaErrorCode;
    use super::super::types::FieldDef;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_schema(version: &str) -> Schema {
        let mut fields = BTreeMap::new();
        fields.insert("name".into(), FieldDef::required_string());
        Schema::new("seminars", version, fields)
    }

    #[test]
    fn test_builtin_has_conferences() {
        let loader = SchemaLoader::builtin().unwrap();
        assert!(loader.schema_id_exists(CONFERENCES_SCHEMA));
        let schema = loader.latest(CONFERENCES_SCHEMA).unwrap();
        assert!(schema.fields.contains_key("_collections"));
        assert!(schema.fields.contains_key("titles"));
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema("1")).unwrap();

        let schema = loader.get("seminars", "1");
        assert_eq!(schema.unwrap().schema_id, "seminars");
    }

    #[test]
    fn test_schema_immutability() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema("1")).unwrap();

        let result = loader.register(sample_schema("1"));
        assert_eq!(result.unwrap_err().code(), SchemaErrorCode::SchemaImmutable);
    }

    #[test]
    fn test_latest_compares_numerically() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema("2")).unwrap();
        loader.register(sample_schema("10")).unwrap();
        loader.register(sample_schema("9")).unwrap();

        assert_eq!(loader.latest("seminars").unwrap().schema_version, "10");
        assert!(loader.latest("workshops").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());

        let path = loader.save_schema(&sample_schema("1")).unwrap();
        assert!(path.ends_with("schema_seminars_1.json"));

        let mut loader2 = SchemaLoader::with_builtin(temp_dir.path()).unwrap();
        loader2.load_all().unwrap();

        assert!(loader2.exists("seminars", "1"));
        assert!(loader2.schema_id_exists(CONFERENCES_SCHEMA));
        assert_eq!(loader2.schema_count(), 2);
    }

    #[test]
    fn test_save_twice_is_immutable() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());

        loader.save_schema(&sample_schema("1")).unwrap();
        let err = loader.save_schema(&sample_schema("1")).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        fs::create_dir_all(loader.schema_dir()).unwrap();
        fs::write(loader.schema_dir().join("broken.json"), "{ not json").unwrap();

        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(err.message().contains("broken.json"));
    }

    #[test]
    fn test_non_json_files_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        fs::create_dir_all(loader.schema_dir()).unwrap();
        fs::write(loader.schema_dir().join("README.txt"), "notes").unwrap();

        loader.load_all().unwrap();
        assert_eq!(loader.schema_count(), 0);
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        assert!(loader.load_all().is_ok());
        assert_eq!(loader.schema_count(), 0);
    }
}
