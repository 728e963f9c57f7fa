//! Schemagen Command-Line Tool
//!
//! Derives a relational schema from an entity catalog file and prints it as
//! MySQL DDL, JSON, or a table summary.

mod error;
mod formatter;

use clap::Parser;
use error::CliError;
use formatter::OutputFormat;
use schemagen_core::{derive_schema, EntityCatalog, GeneratorConfig, MysqlTypes, TypeRef};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "schemagen_core=info,schemagen=info";

/// Schemagen Command-Line Tool
#[derive(Parser, Debug)]
#[command(name = "schemagen")]
#[command(version, about = "Derive a relational schema from an entity catalog")]
pub struct Args {
    /// Entity catalog (JSON)
    pub catalog: PathBuf,

    /// Seed entity to derive from (repeatable); defaults to the catalog's
    /// seeds, then to every declared entity
    #[arg(short, long = "seed", value_name = "KIND")]
    pub seeds: Vec<String>,

    /// Output format
    #[arg(long, default_value = "sql", value_enum)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit CREATE TABLE IF NOT EXISTS
    #[arg(long)]
    pub if_not_exists: bool,

    /// Prefix the script with DROP TABLE IF EXISTS statements
    #[arg(long)]
    pub drop_existing: bool,

    /// Table options appended to every CREATE TABLE (e.g. "ENGINE=InnoDB")
    #[arg(long, value_name = "OPTIONS")]
    pub engine: Option<String>,

    /// Do not align column definitions
    #[arg(long)]
    pub no_align: bool,

    /// Use CRLF line endings
    #[arg(long)]
    pub crlf: bool,
}

impl Args {
    /// DDL settings selected by the flags.
    fn generator_config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::new()
            .with_align_columns(!self.no_align)
            .with_if_not_exists(self.if_not_exists)
            .with_drop_existing(self.drop_existing);
        if self.crlf {
            config = config.with_eol("\r\n");
        }
        if let Some(engine) = &self.engine {
            config = config.with_table_options(engine);
        }
        config
    }
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let catalog = EntityCatalog::from_path(&args.catalog)?;
    debug!(path = %args.catalog.display(), entities = catalog.len(), "loaded catalog");

    let seeds = resolve_seeds(&catalog, &args.seeds)?;
    let schema = derive_schema(&catalog, &MysqlTypes, &seeds)?;

    let formatter = formatter::create_formatter(args.format, args.generator_config());
    let output = formatter.format_schema(&schema)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, output).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), format = %args.format, "wrote schema");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| CliError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
    }
    Ok(())
}

/// Seeds from the command line, else the catalog's own, else every entity.
fn resolve_seeds(catalog: &EntityCatalog, explicit: &[String]) -> Result<Vec<TypeRef>, CliError> {
    if !explicit.is_empty() {
        return explicit
            .iter()
            .map(|seed| {
                seed.parse::<TypeRef>().map_err(|source| CliError::InvalidSeed {
                    seed: seed.clone(),
                    source,
                })
            })
            .collect();
    }
    if !catalog.seeds().is_empty() {
        return Ok(catalog.seeds().to_vec());
    }
    if catalog.is_empty() {
        return Err(CliError::EmptyCatalog);
    }
    Ok(catalog.entity_names().map(TypeRef::entity).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "entities": [
            {"name": "Blog", "fields": [
                {"name": "id", "type": "uint32", "tags": ["primaryKey", "autoIncrement"]},
                {"name": "posts", "type": "[]Post"}
            ]},
            {"name": "Post", "fields": [
                {"name": "id", "type": "uint32", "tags": ["primaryKey", "autoIncrement"]},
                {"name": "title", "type": "string", "tags": ["width:200"]}
            ]}
        ]
    }"#;

    fn catalog_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn args(catalog: &tempfile::NamedTempFile, extra: &[&str]) -> Args {
        let path = catalog.path().to_string_lossy().into_owned();
        let mut argv = vec!["schemagen".to_string(), path];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::parse_from(argv)
    }

    #[test]
    fn test_args_defaults() {
        let file = catalog_file(CATALOG);
        let args = args(&file, &[]);

        assert_eq!(args.format, OutputFormat::Sql);
        assert!(args.seeds.is_empty());
        assert_eq!(args.generator_config(), GeneratorConfig::default());
    }

    #[test]
    fn test_args_config_flags() {
        let file = catalog_file(CATALOG);
        let args = args(
            &file,
            &["--no-align", "--crlf", "--if-not-exists", "--engine", "ENGINE=InnoDB"],
        );

        let config = args.generator_config();
        assert!(!config.align_columns);
        assert_eq!(config.eol, "\r\n");
        assert!(config.if_not_exists);
        assert_eq!(config.table_options.as_deref(), Some("ENGINE=InnoDB"));
    }

    #[test]
    fn test_seeds_fall_back_to_all_entities() {
        let catalog = EntityCatalog::from_json_str(CATALOG).unwrap();
        let seeds = resolve_seeds(&catalog, &[]).unwrap();
        assert_eq!(seeds, vec![TypeRef::entity("Blog"), TypeRef::entity("Post")]);

        let seeds = resolve_seeds(&catalog, &["*Post".to_string()]).unwrap();
        assert_eq!(seeds, vec![TypeRef::pointer("Post")]);

        let empty = EntityCatalog::new();
        assert!(matches!(
            resolve_seeds(&empty, &[]),
            Err(CliError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_run_writes_output_file() {
        let file = catalog_file(CATALOG);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("schema.sql");

        let args = args(
            &file,
            &["--seed", "Blog", "--output", out.to_str().unwrap(), "--drop-existing"],
        );
        run(&args).unwrap();

        let sql = std::fs::read_to_string(&out).unwrap();
        assert!(sql.starts_with("DROP TABLE IF EXISTS Post;\nDROP TABLE IF EXISTS Blog;\n"));
        assert!(sql.contains("CREATE TABLE Post ("));
        assert!(sql.contains(
            "FOREIGN KEY (Blog_id) REFERENCES Blog(id) ON UPDATE CASCADE ON DELETE CASCADE"
        ));
    }

    #[test]
    fn test_run_reports_validation_error() {
        let file = catalog_file(
            r#"{"entities": [{"name": "Bad", "fields": [{"name": "a_b", "type": "int32"}]}]}"#,
        );
        let err = run(&args(&file, &[])).unwrap_err();
        assert!(err.to_string().contains("a_b"), "{}", err);
    }

    #[test]
    fn test_run_rejects_invalid_seed() {
        let file = catalog_file(CATALOG);
        let err = run(&args(&file, &["--seed", "**Blog"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidSeed { .. }));
    }
}
