//! Reading GraphML files and simplifying them into [`Graph`]s.
//!
//! The reader understands the subset of GraphML produced by common graph tools: typed
//! `<key>` declarations with optional defaults, a single `<graph>` and its `<node>` and
//! `<edge>` elements with `<data>` children. Parallel edges, self-loops and directed edges are
//! all accepted here and dealt with by [`RawGraph::simplify`].

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::{self, Component, Path, PathBuf},
};

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::{
    edge::Edge,
    graph::{AttrValue, Attributes, Graph},
    Error, Result,
};

/// A graph as it appears in the file, before simplification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGraph {
    /// Whether `edgedefault` declared the edges directed.
    pub directed: bool,
    /// Nodes in file order.
    pub nodes: Vec<(String, Attributes)>,
    /// Edges in file order, possibly parallel, reversed or looping.
    pub edges: Vec<(String, String, Attributes)>,
}

impl RawGraph {
    /// Rebuilds the graph as a simple undirected graph.
    ///
    /// Every node is copied with its attributes. Edges between distinct nodes are inserted in file
    /// order, so when a pair appears several times (in any direction) the last attributes win.
    /// Self-loops are dropped.
    pub fn simplify(self) -> Graph<String> {
        let mut graph = Graph::new();

        for (node, attributes) in self.nodes {
            graph.add_node(node, attributes);
        }

        let mut loops = 0usize;
        for (source, target, attributes) in self.edges {
            if source == target {
                loops += 1;
                continue;
            }
            graph.insert_with(Edge::new(source, target), attributes);
        }

        if loops > 0 {
            tracing::warn!(loops, "dropped self-loops");
        }

        graph
    }
}

/// Reads a GraphML file.
///
/// Fails with [`Error::NotFound`], carrying the resolved absolute path, when the file doesn't
/// exist.
pub fn read_graphml(path: &Path) -> Result<RawGraph> {
    if !path.exists() {
        return Err(Error::NotFound(resolve(path)));
    }

    tracing::debug!(path = %path.display(), "reading GraphML");
    parse(BufReader::new(File::open(path)?))
}

/// Makes `path` absolute, following symlinks and `..` components as far as the path exists.
/// Whatever doesn't exist is resolved lexically.
fn resolve(path: &Path) -> PathBuf {
    let absolute = path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => {
                resolved.push(other);
                if let Ok(canonical) = resolved.canonicalize() {
                    resolved = canonical;
                }
            }
        }
    }

    resolved
}

/// A `<key>` declaration.
#[derive(Debug)]
struct Key {
    name: String,
    ty: KeyType,
    domain: Domain,
    default: Option<AttrValue>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum KeyType {
    Boolean,
    Int,
    Float,
    String,
}

impl KeyType {
    fn from_attr(ty: &str) -> Self {
        match ty {
            "boolean" => Self::Boolean,
            "int" | "long" => Self::Int,
            "float" | "double" => Self::Float,
            _ => Self::String,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Float => "double",
            Self::String => "string",
        }
    }
}

/// What a key applies to.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Domain {
    Node,
    Edge,
    All,
    Other,
}

impl Domain {
    fn from_attr(domain: &str) -> Self {
        match domain {
            "node" => Self::Node,
            "edge" => Self::Edge,
            "all" => Self::All,
            _ => Self::Other,
        }
    }

    fn covers(self, other: Domain) -> bool {
        self == other || self == Self::All
    }
}

impl Key {
    fn decode(&self, raw: &str) -> Result<AttrValue> {
        let invalid = || Error::InvalidValue {
            key: self.name.clone(),
            ty: self.ty.name(),
            value: raw.to_string(),
        };
        let trimmed = raw.trim();

        Ok(match self.ty {
            KeyType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => AttrValue::Bool(true),
                "false" | "0" => AttrValue::Bool(false),
                _ => return Err(invalid()),
            },
            KeyType::Int => AttrValue::Int(trimmed.parse().map_err(|_| invalid())?),
            KeyType::Float => AttrValue::Float(trimmed.parse().map_err(|_| invalid())?),
            KeyType::String => AttrValue::Str(raw.to_string()),
        })
    }
}

/// The element whose `<data>` children are being collected.
enum Owner {
    Graph,
    Node(String),
    Edge(String, String),
}

/// Parser state carried between events.
#[derive(Default)]
struct State {
    keys: HashMap<String, Key>,
    /// The key being declared and whether we're inside its `<default>`.
    current_key: Option<(String, bool)>,
    owner: Option<(Owner, Attributes)>,
    /// The key of the open `<data>` element and its text so far.
    data: Option<(String, String)>,
    graph_depth: usize,
    raw: RawGraph,
}

/// Parses GraphML from a reader.
///
/// # Examples
///
/// ```
/// use marvelstats::graphml::parse;
///
/// let xml = r#"<graphml>
///   <key id="d0" for="edge" attr.name="weight" attr.type="double"/>
///   <graph edgedefault="undirected">
///     <node id="Thor"/><node id="Loki"/>
///     <edge source="Thor" target="Loki"><data key="d0">2.5</data></edge>
///   </graph>
/// </graphml>"#;
///
/// let graph = parse(xml.as_bytes()).unwrap().simplify();
/// assert_eq!(graph.vertex_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub fn parse<R: BufRead>(reader: R) -> Result<RawGraph> {
    let mut reader = Reader::from_reader(reader);
    reader.trim_text(false);

    let mut state = State::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => state.open(&e, false)?,
            Event::Empty(e) => {
                state.open(&e, true)?;
                state.close(e.local_name().as_ref())?;
            }
            Event::End(e) => state.close(e.local_name().as_ref())?,
            Event::Text(t) => state.text(&t.unescape()?),
            Event::CData(t) => state.text(&String::from_utf8_lossy(&t.into_inner())),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(
        nodes = state.raw.nodes.len(),
        edges = state.raw.edges.len(),
        directed = state.raw.directed,
        "parsed GraphML"
    );

    Ok(state.raw)
}

impl State {
    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        match e.local_name().as_ref() {
            b"key" => {
                let id = required(e, "key", "id")?;
                let name = attribute(e, "attr.name")?.unwrap_or_else(|| id.clone());
                let ty = KeyType::from_attr(&attribute(e, "attr.type")?.unwrap_or_default());
                let domain = Domain::from_attr(&attribute(e, "for")?.unwrap_or_else(|| "all".into()));

                self.keys.insert(
                    id.clone(),
                    Key {
                        name,
                        ty,
                        domain,
                        default: None,
                    },
                );
                if !empty {
                    self.current_key = Some((id, false));
                }
            }
            b"default" => {
                if let Some((_, in_default)) = self.current_key.as_mut() {
                    *in_default = true;
                    self.data = Some((String::new(), String::new()));
                }
            }
            b"graph" => {
                self.graph_depth += 1;
                if self.graph_depth > 1 {
                    return Err(Error::Unsupported("nested graphs"));
                }
                self.raw.directed = attribute(e, "edgedefault")?.as_deref() == Some("directed");
                self.owner = Some((Owner::Graph, Attributes::new()));
            }
            b"node" => {
                let id = required(e, "node", "id")?;
                self.owner = Some((Owner::Node(id), Attributes::new()));
            }
            b"edge" => {
                let source = required(e, "edge", "source")?;
                let target = required(e, "edge", "target")?;
                self.owner = Some((Owner::Edge(source, target), Attributes::new()));
            }
            b"hyperedge" => return Err(Error::Unsupported("hyperedges")),
            b"data" => {
                let key = required(e, "data", "key")?;
                self.data = Some((key, String::new()));
            }
            _ => {}
        }

        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<()> {
        match name {
            b"key" => self.current_key = None,
            b"default" => {
                if let Some((id, in_default)) = self.current_key.as_mut() {
                    *in_default = false;
                    let text = self.data.take().map(|(_, text)| text).unwrap_or_default();
                    if let Some(key) = self.keys.get_mut(id.as_str()) {
                        key.default = Some(key.decode(&text)?);
                    }
                }
            }
            b"data" => {
                if let Some((key_id, text)) = self.data.take() {
                    let key = self
                        .keys
                        .get(&key_id)
                        .ok_or_else(|| Error::UnknownKey(key_id.clone()))?;
                    let value = key.decode(&text)?;
                    if let Some((_, attributes)) = self.owner.as_mut() {
                        attributes.insert(key.name.clone(), value);
                    }
                }
            }
            b"node" => {
                if let Some((Owner::Node(id), attributes)) = self.owner.take() {
                    let attributes = self.with_defaults(Domain::Node, attributes);
                    self.raw.nodes.push((id, attributes));
                }
                self.owner = Some((Owner::Graph, Attributes::new()));
            }
            b"edge" => {
                if let Some((Owner::Edge(source, target), attributes)) = self.owner.take() {
                    let attributes = self.with_defaults(Domain::Edge, attributes);
                    self.raw.edges.push((source, target, attributes));
                }
                self.owner = Some((Owner::Graph, Attributes::new()));
            }
            b"graph" => {
                self.graph_depth = self.graph_depth.saturating_sub(1);
                self.owner = None;
            }
            _ => {}
        }

        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some((_, buffer)) = self.data.as_mut() {
            buffer.push_str(text);
        }
    }

    /// Fills in declared defaults for attributes the element didn't set.
    fn with_defaults(&self, domain: Domain, mut attributes: Attributes) -> Attributes {
        for key in self.keys.values() {
            if let (true, Some(default)) = (key.domain.covers(domain), &key.default) {
                attributes
                    .entry(key.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }

        attributes
    }
}

/// Returns the unescaped value of an XML attribute, if present.
fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }

    Ok(None)
}

fn required(e: &BytesStart<'_>, element: &'static str, name: &'static str) -> Result<String> {
    attribute(e, name)?.ok_or(Error::MissingAttribute {
        element,
        attribute: name,
    })
}
