//! Command definitions and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ruby_id::{
    next_ulid, CaseId, CaseTypeId, CasePolicy, CodecRegistry, CodecRegistryBuilder, IdKind,
    ItemId, ItemTypeId, OutboxMessageId, Ulid, UserId, DECODE_CASE_POLICY,
};
use ruby_model::{open_case, Case, CaseType, ItemRarity, ItemType, OutboxMessage, User};
use ruby_wire::{
    define_wire_object, GraphSerializer, ReferencePolicy, SchemaIntrospector, SerializerOptions,
    Shared,
};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Inspect ruby identifiers, wire output and API schema.
#[derive(Debug, Parser)]
#[command(name = "ruby-schema", author, version, about, long_about = None)]
pub struct Cli {
    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, env = "RUBY_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true, env = "RUBY_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the component schema catalog for every response type.
    Schema {
        /// Pretty-print the document.
        #[arg(long)]
        pretty: bool,
    },

    /// Decode an identifier and show what it carries.
    Decode {
        /// Identifier kind, by wire name.
        #[arg(value_parser = parse_kind)]
        kind: IdKind,

        /// Encoded identifier.
        value: String,

        /// Reject lowercase input.
        #[arg(long)]
        strict: bool,
    },

    /// Generate fresh identifiers, one per line.
    Generate {
        /// Identifier kind, by wire name.
        #[arg(value_parser = parse_kind)]
        kind: IdKind,

        /// How many to generate.
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,
    },

    /// Serialize a freshly opened sample case.
    Sample {
        /// Pretty-print the document.
        #[arg(long)]
        pretty: bool,

        /// How repeated shared objects are flattened.
        #[arg(long, value_enum, default_value = "ignore-repeated")]
        references: PolicyArg,
    },
}

/// Parses an identifier kind by its wire name (`case_id`, `ulid`, ...).
fn parse_kind(name: &str) -> Result<IdKind, String> {
    IdKind::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = IdKind::ALL.iter().map(|k| k.name()).collect();
        format!("unknown kind '{name}', expected one of: {}", known.join(", "))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    IgnoreRepeated,
    IgnoreCycles,
}

impl From<PolicyArg> for ReferencePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::IgnoreRepeated => ReferencePolicy::IgnoreRepeated,
            PolicyArg::IgnoreCycles => ReferencePolicy::IgnoreCycles,
        }
    }
}

define_wire_object! {
    /// Everything the sample command renders in one document.
    struct SampleDocument {
        user: User,
        case: Shared<Case>,
        outbox: OutboxMessage,
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let registry = build_registry()?;
        debug!(kinds = IdKind::COUNT, "codec registry ready");

        match self.command {
            Commands::Schema { pretty } => schema(&registry, pretty),
            Commands::Decode {
                kind,
                value,
                strict,
            } => decode(&registry, kind, &value, strict),
            Commands::Generate { kind, count } => {
                generate(&registry, kind, count);
                Ok(())
            }
            Commands::Sample { pretty, references } => sample(registry, pretty, references.into()),
        }
    }
}

/// Registers every identifier type; a missing one stops startup.
fn build_registry() -> Result<CodecRegistry> {
    finish_registry(
        CodecRegistry::builder()
            .register::<UserId>()
            .register::<ItemId>()
            .register::<ItemTypeId>()
            .register::<CaseId>()
            .register::<CaseTypeId>()
            .register::<OutboxMessageId>()
            .register::<Ulid>(),
    )
}

/// The fault is returned, not logged; `main` reports it once.
fn finish_registry(builder: CodecRegistryBuilder) -> Result<CodecRegistry> {
    builder.build().context("failed to build codec registry")
}

fn schema(registry: &CodecRegistry, pretty: bool) -> Result<()> {
    let mut introspector = SchemaIntrospector::new(registry);
    ruby_model::document_all(&mut introspector);
    let catalog = introspector
        .finish()
        .context("failed to build schema catalog")?;

    let document = catalog.to_json();
    let out = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{out}");
    Ok(())
}

fn decode(registry: &CodecRegistry, kind: IdKind, value: &str, strict: bool) -> Result<()> {
    let out = describe_identifier(registry, kind, value, strict)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn describe_identifier(
    registry: &CodecRegistry,
    kind: IdKind,
    value: &str,
    strict: bool,
) -> Result<Value> {
    let policy = if strict {
        CasePolicy::Strict
    } else {
        DECODE_CASE_POLICY
    };
    let codec = registry.codec(kind);
    let ulid = codec
        .decode_with(value, policy)
        .with_context(|| format!("invalid {kind} {value:?}"))?;

    Ok(json!({
        "kind": kind.name(),
        "canonical": codec.encode(ulid),
        "raw": format!("{:032x}", ulid.0),
        "timestamp_ms": ulid.timestamp_ms(),
    }))
}

fn generate(registry: &CodecRegistry, kind: IdKind, count: usize) {
    let codec = registry.codec(kind);
    for _ in 0..count {
        println!("{}", codec.encode(next_ulid()));
    }
    info!(kind = %kind, count, "generated identifiers");
}

fn sample(registry: CodecRegistry, pretty: bool, references: ReferencePolicy) -> Result<()> {
    let user = User::new("sample");
    let knife = ItemType::new("Karambit", ItemRarity::Legendary, 125_000);
    let sticker = ItemType::new("Sticker", ItemRarity::Common, 30);
    let case_type = CaseType::new("Starter Case", 250);

    let case = open_case(case_type, &[knife, sticker.clone(), sticker], Some(user.id));
    let case_id = case.borrow().id;

    let serializer = GraphSerializer::with_options(
        Arc::new(registry),
        SerializerOptions {
            references,
            pretty,
        },
    );
    let payload = json!({ "case_id": case_id.encode(), "opened_by": user.id.encode() });
    let outbox = OutboxMessage::pending("case_opened", payload, case_id.ulid());

    let document = SampleDocument { user, case, outbox };
    let out = serializer
        .to_string(&document)
        .context("failed to serialize sample")?;
    println!("{out}");

    debug!(case = %case_id, references = ?references, "rendered sample case");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_every_kind_is_selectable() {
        for kind in IdKind::ALL {
            assert_eq!(parse_kind(kind.name()), Ok(kind));
        }
        assert!(parse_kind("order_id").unwrap_err().contains("case_id"));
    }

    #[test]
    fn test_registry_builds() {
        assert!(build_registry().is_ok());
    }

    #[test]
    fn test_incomplete_registry_error_names_the_kind_once() {
        let err = finish_registry(CodecRegistry::builder().register::<UserId>()).unwrap_err();
        let report = format!("{err:#}");
        assert_eq!(
            report,
            "failed to build codec registry: no codec registered for identifier kind 'item_id'"
        );
        assert_eq!(report.matches("item_id").count(), 1);
    }

    #[test]
    fn test_describe_identifier_folds_lowercase_unless_strict() {
        let registry = build_registry().unwrap();
        let lower = "01hv4z2wqxkjnm8gpqy6vbkc3d";

        let out = describe_identifier(&registry, IdKind::Case, lower, false).unwrap();
        assert_eq!(out["kind"], json!("case_id"));
        assert_eq!(out["canonical"], json!("01HV4Z2WQXKJNM8GPQY6VBKC3D"));

        let err = describe_identifier(&registry, IdKind::Case, lower, true).unwrap_err();
        assert!(format!("{err:#}").contains("invalid identifier character 'h' at position 2"));
    }

    #[test]
    fn test_parse_sample_policy() {
        let cli = Cli::try_parse_from(["ruby-schema", "sample", "--references", "ignore-cycles"])
            .unwrap();
        match cli.command {
            Commands::Sample { references, .. } => assert_eq!(references, PolicyArg::IgnoreCycles),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
