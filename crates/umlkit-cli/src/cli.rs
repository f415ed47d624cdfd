//! Command-line interface for the umlkit utility
//!
//! Lists the registered diagram types, builds sample diagrams through the
//! editing operations, exercises the clipboard on them and checks that
//! every prototype survives a trip through its property bag.

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::colorizer::colorize_tree;
use crate::scenarios::build_sample;
use umlkit::prelude::*;

/// umlkit - Inspect UML diagram types and their editing behavior
#[derive(Parser)]
#[command(name = "umlkit")]
#[command(about = "Inspect UML diagram types, sample diagrams and property bags")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Effective log level and format; `UMLKIT_LOG_LEVEL`, `RUST_LOG` and
    /// `UMLKIT_LOG_FORMAT` override the flags
    pub fn log_settings(&self) -> (String, String) {
        let level = std::env::var("UMLKIT_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.log_level.as_str().to_string());
        let format = std::env::var("UMLKIT_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| self.log_format.as_str().to_string());
        (level, format)
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show registered diagram types and their prototypes
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Build the sample diagram of a type and print it
    Demo {
        /// Diagram type (class|state|object)
        diagram_type: String,

        /// Copy the whole diagram and paste it this many times
        #[arg(long, default_value_t = 0)]
        paste: usize,

        /// Paste offset as DX,DY (defaults to 10,10)
        #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
        offset: Option<(i32, i32)>,

        /// Dump every element's property bag as JSON
        #[arg(long)]
        json: bool,

        /// When to use colors in output
        #[arg(
            long,
            value_enum,
            default_value_t = ColorChoice::Auto
        )]
        color: ColorChoice,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Round-trip every prototype of a diagram type through its property bag
    Check {
        /// Diagram type (class|state|object)
        diagram_type: String,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Parse a `DX,DY` paste offset
fn parse_offset(value: &str) -> Result<(i32, i32), String> {
    let (dx, dy) = value
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, found '{}'", value))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid offset '{}': {}", part, e))
    };
    Ok((parse(dx)?, parse(dy)?))
}

#[derive(Serialize)]
struct TypeSummary {
    name: &'static str,
    description: &'static str,
    nodes: Vec<&'static str>,
    edges: Vec<String>,
}

#[derive(Serialize)]
struct DiagramDump {
    diagram_type: &'static str,
    nodes: Vec<NodeDump>,
    edges: Vec<EdgeDump>,
}

#[derive(Serialize)]
struct NodeDump {
    id: String,
    #[serde(rename = "type")]
    type_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    properties: Map<String, Value>,
}

#[derive(Serialize)]
struct EdgeDump {
    id: String,
    #[serde(rename = "type")]
    type_name: &'static str,
    start: Option<String>,
    end: Option<String>,
    properties: Map<String, Value>,
}

/// Main CLI application
pub struct UmlkitApp {
    registry: DiagramRegistry,
}

impl UmlkitApp {
    /// Create an application with every built-in diagram type
    pub fn new() -> Self {
        Self::with_registry(DiagramRegistry::with_all_plugins())
    }

    pub fn with_registry(registry: DiagramRegistry) -> Self {
        Self { registry }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("umlkit v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Types { json } => self.types_command(json, cli.verbose),
            Commands::Demo {
                diagram_type,
                paste,
                offset,
                json,
                color,
                output,
            } => self.demo_command(
                &diagram_type,
                paste,
                offset,
                json,
                color,
                output,
                cli.verbose,
            ),
            Commands::Check { diagram_type } => self.check_command(&diagram_type, cli.verbose),
        }
    }

    /// Handle the types command
    fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing {} registered diagram types", self.registry.len());
        }
        let rendered = self.render_types(json)?;
        self.write_output(None, &rendered)
    }

    fn render_types(&self, json: bool) -> Result<String> {
        let summaries: Vec<TypeSummary> = self
            .registry
            .types()
            .map(|diagram_type| TypeSummary {
                name: diagram_type.name(),
                description: diagram_type.description(),
                nodes: diagram_type
                    .node_prototypes()
                    .iter()
                    .map(NodeKind::type_name)
                    .collect(),
                edges: diagram_type
                    .edge_prototypes()
                    .into_iter()
                    .map(edge_prototype_label)
                    .collect(),
            })
            .collect();

        if json {
            let types = serde_json::json!({
                "diagram_types": summaries,
                "total": summaries.len(),
            });
            return Ok(serde_json::to_string_pretty(&types)?);
        }

        let width = summaries
            .iter()
            .map(|summary| summary.name.len())
            .max()
            .unwrap_or(0);
        let mut out = String::from("Registered diagram types:\n");
        for summary in &summaries {
            writeln!(
                out,
                "  {:width$}  - {}",
                summary.name,
                summary.description,
                width = width
            )?;
            writeln!(out, "  {:width$}    nodes: {}", "", summary.nodes.join(", "), width = width)?;
            writeln!(out, "  {:width$}    edges: {}", "", summary.edges.join(", "), width = width)?;
        }
        writeln!(out)?;
        write!(out, "Total: {} diagram types", summaries.len())?;
        Ok(out)
    }

    /// Handle the demo command
    #[allow(clippy::too_many_arguments)]
    fn demo_command(
        &self,
        diagram_type: &str,
        paste: usize,
        offset: Option<(i32, i32)>,
        json: bool,
        color: ColorChoice,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let diagram = self.build_demo(diagram_type, paste, offset)?;

        if verbose {
            eprintln!(
                "Built {} diagram with {} nodes and {} edges",
                diagram.name(),
                diagram.node_count(),
                diagram.edge_count()
            );
        }

        let rendered = if json {
            render_json(&diagram)?
        } else {
            let tree = render_tree(&diagram)?;
            if self.should_colorize(&output, color) {
                colorize_tree(&tree)
            } else {
                tree
            }
        };
        self.write_output(output, &rendered)
    }

    /// Build the sample of `diagram_type`, then copy all of it and paste
    /// it `paste` times
    fn build_demo(
        &self,
        diagram_type: &str,
        paste: usize,
        offset: Option<(i32, i32)>,
    ) -> Result<Diagram> {
        let mut diagram = build_sample(&self.registry, diagram_type)?;
        debug!(diagram_type, nodes = diagram.node_count(), "Built sample diagram");
        if paste == 0 {
            return Ok(diagram);
        }

        let config = match offset {
            Some((dx, dy)) => ClipboardConfig::with_offset(dx, dy),
            None => ClipboardConfig::default(),
        };
        let mut clipboard = Clipboard::new(config);
        let selection: SelectionList = diagram
            .root_nodes()
            .iter()
            .copied()
            .map(ElementRef::from)
            .collect();
        clipboard.copy(&diagram, &selection);
        for _ in 0..paste {
            clipboard.paste(&mut diagram)?;
        }
        info!(
            diagram_type,
            paste,
            nodes = diagram.node_count(),
            edges = diagram.edge_count(),
            "Pasted sample"
        );
        Ok(diagram)
    }

    /// Handle the check command
    fn check_command(&self, diagram_type: &str, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Checking prototypes of {} diagrams", diagram_type);
        }
        let (report, failures) = self.render_check(diagram_type)?;
        self.write_output(None, &report)?;
        if failures > 0 {
            bail!("{} prototype(s) failed to round-trip", failures);
        }
        Ok(())
    }

    /// Report one line per prototype, and the number of failures
    fn render_check(&self, diagram_type: &str) -> Result<(String, usize)> {
        let diagram_type = self.registry.get(diagram_type)?;
        let mut results = Vec::new();
        for kind in diagram_type.node_prototypes() {
            results.push((kind.type_name().to_string(), check_node(kind)));
        }
        for kind in diagram_type.edge_prototypes() {
            results.push((edge_prototype_label(kind), check_edge(kind)));
        }

        let mut out = String::new();
        let mut failures = 0;
        for (label, result) in &results {
            match result {
                Ok(()) => writeln!(out, "✓ {}", label)?,
                Err(e) => {
                    failures += 1;
                    writeln!(out, "✗ {}: {}", label, e)?;
                }
            }
        }
        write!(
            out,
            "{} of {} {} prototypes round-trip",
            results.len() - failures,
            results.len(),
            diagram_type.name()
        )?;
        Ok((out, failures))
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for UmlkitApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Prototype name with its enumeration attributes, e.g.
/// `GeneralizationEdge(Implementation)`
fn edge_prototype_label(kind: EdgeKind) -> String {
    let properties = Edge::new(kind).properties();
    let variants: Vec<&str> = properties
        .iter()
        .filter_map(|(_, value)| match value {
            PropertyValue::Enum(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    if variants.is_empty() {
        kind.type_name().to_string()
    } else {
        format!("{}({})", kind.type_name(), variants.join(", "))
    }
}

fn check_node(kind: NodeKind) -> Result<()> {
    let mut original = Node::new(kind).with_name("Sample");
    original.translate(17, 23);
    let properties = original.properties();

    let fresh = NodeKind::from_type_name(original.type_name())
        .ok_or_else(|| anyhow!("unknown node type {}", original.type_name()))?;
    let mut restored = Node::new(fresh);
    restored.initialize(&properties)?;
    if restored != original {
        bail!("restored node differs: {}", restored);
    }
    if original.clone() != original {
        bail!("clone differs from original");
    }
    Ok(())
}

fn check_edge(kind: EdgeKind) -> Result<()> {
    let mut original = Edge::new(kind);
    original.set_start_label("0..1");
    original.set_middle_label("sample");
    original.set_end_label("*");
    let properties = original.properties();

    let fresh = EdgeKind::from_type_name(original.type_name())
        .ok_or_else(|| anyhow!("unknown edge type {}", original.type_name()))?;
    let mut restored = Edge::new(fresh);
    restored.initialize(&properties)?;
    if restored != original {
        bail!("restored edge differs: {}", restored);
    }
    if original.clone() != original {
        bail!("clone differs from original");
    }
    Ok(())
}

/// Containment tree followed by the edge list
fn render_tree(diagram: &Diagram) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{} diagram {} ({} nodes, {} edges)",
        diagram.name(),
        diagram.id(),
        diagram.node_count(),
        diagram.edge_count()
    )?;
    let roots = diagram.root_nodes();
    for (index, &id) in roots.iter().enumerate() {
        render_subtree(diagram, id, "", index + 1 == roots.len(), &mut out)?;
    }
    if diagram.edge_count() > 0 {
        writeln!(out, "edges:")?;
        for (id, edge) in diagram.edges() {
            writeln!(out, "  {}: {}", id, edge)?;
        }
    }
    Ok(out)
}

fn render_subtree(
    diagram: &Diagram,
    id: NodeId,
    prefix: &str,
    last: bool,
    out: &mut String,
) -> Result<()> {
    let Some(node) = diagram.node(id) else {
        return Ok(());
    };
    let branch = if last { "└──" } else { "├──" };
    write!(out, "{}{} {}: {}", prefix, branch, id, node.type_name())?;
    if let Some(name) = node.kind().name() {
        if !name.text().is_empty() {
            write!(out, " {:?}", name.text())?;
        }
    }
    writeln!(out, " at {}", node.bounds())?;

    let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
    let children = node.children();
    for (index, &child) in children.iter().enumerate() {
        render_subtree(diagram, child, &child_prefix, index + 1 == children.len(), out)?;
    }
    Ok(())
}

/// Every element's property bag, nodes in containment pre-order
fn render_json(diagram: &Diagram) -> Result<String> {
    let nodes = diagram
        .preorder()
        .into_iter()
        .filter_map(|id| diagram.node(id).map(|node| (id, node)))
        .map(|(id, node)| NodeDump {
            id: id.to_string(),
            type_name: node.type_name(),
            parent: node.parent().map(|parent| parent.to_string()),
            properties: property_map(&node.properties()),
        })
        .collect();
    let edges = diagram
        .edges()
        .map(|(id, edge)| EdgeDump {
            id: id.to_string(),
            type_name: edge.type_name(),
            start: edge.start().map(|node| node.to_string()),
            end: edge.end().map(|node| node.to_string()),
            properties: property_map(&edge.properties()),
        })
        .collect();
    let dump = DiagramDump {
        diagram_type: diagram.name(),
        nodes,
        edges,
    };
    Ok(serde_json::to_string_pretty(&dump)?)
}

fn property_map(properties: &Properties) -> Map<String, Value> {
    properties
        .iter()
        .map(|(key, value)| {
            let value = match value {
                PropertyValue::Int(number) => Value::from(*number),
                PropertyValue::Bool(flag) => Value::Bool(*flag),
                PropertyValue::String(text) | PropertyValue::Enum(text) => {
                    Value::from(text.as_str())
                }
            };
            (key.to_string(), value)
        })
        .collect()
}
